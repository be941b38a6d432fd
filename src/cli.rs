// CLI module - command-line argument parsing and handlers
//
// `blipdesk` with no subcommand runs the panel over stdin/stdout.
// Subcommands manage the config file:
// - config --show: Display effective configuration
// - config --reset: Regenerate config file with defaults
// - config --path: Print the config file location

use anyhow::{bail, Context, Result};
use blipdesk::config::{Config, VERSION};
use clap::{Parser, Subcommand};
use std::io::Write;

/// blipdesk - headless control panel for map markers
#[derive(Parser, Debug)]
#[command(name = "blipdesk")]
#[command(version = VERSION)]
#[command(about = "Control panel core for host-managed map markers", long_about = None)]
pub struct Cli {
    /// Replay a scripted host session instead of waiting for a host
    #[arg(long)]
    pub demo: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

/// Run a subcommand. Returns true if one was handled (exit after).
pub fn handle_cli(cli: &Cli) -> Result<bool> {
    match cli.command {
        Some(Commands::Config { show, reset, path }) => {
            if path {
                handle_config_path()?;
            } else if show {
                handle_config_show()?;
            } else if reset {
                handle_config_reset()?;
            } else {
                println!("Usage: blipdesk config [--show|--reset|--path]");
                println!();
                println!("Options:");
                println!("  --show    Display effective configuration");
                println!("  --reset   Reset config file to defaults");
                println!("  --path    Show config file path");
            }
            Ok(true)
        }
        None => Ok(false),
    }
}

fn require_config_path() -> Result<std::path::PathBuf> {
    match Config::config_path() {
        Some(path) => Ok(path),
        None => bail!("Could not determine config path"),
    }
}

fn handle_config_path() -> Result<()> {
    println!("{}", require_config_path()?.display());
    Ok(())
}

fn handle_config_show() -> Result<()> {
    let config = Config::load()?;

    println!("# Effective configuration (env > file > defaults)");
    println!();
    print!("{}", config.to_toml());

    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
    Ok(())
}

fn handle_config_reset() -> Result<()> {
    let path = require_config_path()?;

    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        std::io::stderr().flush().context("Failed to flush prompt")?;

        let mut input = String::new();
        std::io::stdin()
            .read_line(&mut input)
            .context("Failed to read answer")?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    Config::write_default(&path)?;
    println!("Config reset to defaults: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_runs_the_panel() {
        let cli = Cli::try_parse_from(["blipdesk"]).unwrap();
        assert!(!cli.demo);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_demo_flag() {
        let cli = Cli::try_parse_from(["blipdesk", "--demo"]).unwrap();
        assert!(cli.demo);
    }

    #[test]
    fn test_config_subcommand_flags() {
        let cli = Cli::try_parse_from(["blipdesk", "config", "--path"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                path: true,
                show: false,
                reset: false
            })
        ));
    }
}
