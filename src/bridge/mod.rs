// Headless runtime: newline-delimited JSON in, newline-delimited JSON out
//
// Stdin carries host envelopes (`{"action": ..., "data": ...}`) and operator
// actions (`{"op": ...}`), one per line. Stdout carries host calls
// (`{"call": ..., "data": ...}`) and panel snapshots (`{"snapshot": ...}`).
// A snapshot is only written when it differs from the last one written.
//
// The panel is owned by a single task; readers feed it through a channel so
// the demo script and stdin look the same to the loop.

use crate::events::{HostCall, HostEvent, NuiMessage};
use crate::panel::{OperatorAction, Panel, PanelSnapshot};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, oneshot};


/// One inbound line
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Inbound {
    Host(NuiMessage),
    Operator(OperatorAction),
}

/// One outbound line
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Outbound<'a> {
    Call(&'a HostCall),
    Snapshot { snapshot: &'a PanelSnapshot },
}

/// Parse one stdin line. Blank lines and malformed JSON yield `None`.
pub fn parse_line(line: &str) -> Option<Inbound> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str(line) {
        Ok(inbound) => Some(inbound),
        Err(e) => {
            tracing::warn!("Ignoring unreadable input line: {}", e);
            None
        }
    }
}

/// Forward parsed lines until EOF or until the loop goes away
pub async fn read_lines<R>(reader: R, tx: mpsc::Sender<Inbound>) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        let Some(inbound) = parse_line(&line) else {
            continue;
        };
        if tx.send(inbound).await.is_err() {
            break;
        }
    }
    tracing::debug!("Input closed");
    Ok(())
}

fn dispatch(panel: &mut Panel, inbound: Inbound) {
    match inbound {
        Inbound::Host(message) => {
            if let Some(event) = HostEvent::from_message(message) {
                panel.handle_host_event(event);
            }
        }
        Inbound::Operator(action) => panel.handle_action(action),
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => {
            tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
        }
        None => std::future::pending::<()>().await,
    }
}

async fn write_line<W>(out: &mut W, line: &Outbound<'_>) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut bytes = serde_json::to_vec(line).context("Failed to encode output")?;
    bytes.push(b'\n');
    out.write_all(&bytes)
        .await
        .context("Failed to write output")
}

/// Drive the panel until every inbound sender is gone or shutdown fires
pub async fn run<W>(
    mut panel: Panel,
    mut calls: mpsc::Receiver<HostCall>,
    mut inbound: mpsc::Receiver<Inbound>,
    out: &mut W,
    mut shutdown: oneshot::Receiver<()>,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut last_written: Option<PanelSnapshot> = None;

    loop {
        let deadline = panel.next_deadline();

        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Shutdown requested");
                break;
            }

            message = inbound.recv() => match message {
                Some(message) => dispatch(&mut panel, message),
                None => {
                    tracing::info!("All inputs closed");
                    break;
                }
            },

            _ = wait_until(deadline) => {
                panel.poll_search(Instant::now());
            }
        }

        while let Ok(call) = calls.try_recv() {
            write_line(out, &Outbound::Call(&call)).await?;
        }

        let snapshot = panel.snapshot();
        if last_written.as_ref() != Some(&snapshot) {
            write_line(out, &Outbound::Snapshot { snapshot: &snapshot }).await?;
            last_written = Some(snapshot);
        }

        out.flush().await.context("Failed to flush output")?;
    }

    // Calls queued by the last event still go out
    while let Ok(call) = calls.try_recv() {
        write_line(out, &Outbound::Call(&call)).await?;
    }
    out.flush().await.context("Failed to flush output")?;
    Ok(())
}
