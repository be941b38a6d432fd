// Export / import files
//
// The host serializes the collection itself and hands the panel an opaque
// string; the panel only decides where it lands on disk. Imports go the
// other way: read a file and pass its contents to the host untouched.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use std::path::{Path, PathBuf};

/// Writes host exports into one directory
#[derive(Debug, Clone)]
pub struct ExportWriter {
    dir: PathBuf,
}

impl ExportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name for an export taken on `date`
    pub fn file_name(date: NaiveDate) -> String {
        format!("blipdesk-export-{}.json", date.format("%Y-%m-%d"))
    }

    /// Save under today's (UTC) file name. A second export on the same day
    /// replaces the first.
    pub fn save(&self, data: &str) -> Result<PathBuf> {
        self.save_dated(data, Utc::now().date_naive())
    }

    pub fn save_dated(&self, data: &str, date: NaiveDate) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create export directory: {}", self.dir.display())
        })?;

        let path = self.dir.join(Self::file_name(date));
        std::fs::write(&path, data)
            .with_context(|| format!("Failed to write export: {}", path.display()))?;

        tracing::info!("Saved blip export to {}", path.display());
        Ok(path)
    }
}

/// Read an import file as-is; the host validates the contents
pub fn read_import(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read import file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(ExportWriter::file_name(date), "blipdesk-export-2024-03-09.json");
    }

    #[test]
    fn test_save_creates_directory_and_writes_verbatim() {
        let temp = tempfile::tempdir().unwrap();
        let writer = ExportWriter::new(temp.path().join("nested").join("exports"));
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

        let path = writer.save_dated(r#"[{"id":1}]"#, date).unwrap();

        assert_eq!(path, writer.dir().join("blipdesk-export-2024-01-02.json"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), r#"[{"id":1}]"#);
    }

    #[test]
    fn test_same_day_export_overwrites() {
        let temp = tempfile::tempdir().unwrap();
        let writer = ExportWriter::new(temp.path());
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

        writer.save_dated("first", date).unwrap();
        let path = writer.save_dated("second", date).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "second");
    }

    #[test]
    fn test_read_import_round_trips_contents() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("import.json");
        std::fs::write(&path, "{\"1\": {}}").unwrap();

        assert_eq!(read_import(&path).unwrap(), "{\"1\": {}}");
    }

    #[test]
    fn test_read_import_missing_file_has_context() {
        let temp = tempfile::tempdir().unwrap();
        let err = read_import(&temp.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read import file"));
    }
}
