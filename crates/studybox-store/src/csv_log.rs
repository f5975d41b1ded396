//! CSV activity log

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use studybox_api::{LogRow, LOG_HEADER};
use tracing::{debug, info};

use crate::{ActivityLog, StoreResult};

/// Activity log stored as a CSV file, one row per rollover
#[derive(Debug, Clone)]
pub struct CsvActivityLog {
    path: PathBuf,
}

impl CsvActivityLog {
    /// Open the log at `path`, creating it with a header row if it is
    /// missing or empty
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let log = Self { path };
        let file = log.open_for_append()?;
        log.write_header_if_empty(&file)?;
        Ok(log)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records in the log, header included
    pub fn read_records(&self) -> StoreResult<Vec<Vec<String>>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(&self.path)?;

        let mut records = Vec::new();
        for record in reader.records() {
            records.push(record?.iter().map(str::to_string).collect());
        }
        Ok(records)
    }

    fn open_for_append(&self) -> StoreResult<File> {
        Ok(OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?)
    }

    fn write_header_if_empty(&self, file: &File) -> StoreResult<()> {
        if file.metadata()?.len() > 0 {
            return Ok(());
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(LOG_HEADER)?;
        writer.flush()?;

        info!(path = %self.path.display(), "Activity log created");
        Ok(())
    }
}

impl ActivityLog for CsvActivityLog {
    fn append(&self, row: &LogRow) -> StoreResult<()> {
        let file = self.open_for_append()?;
        self.write_header_if_empty(&file)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&file);
        writer.write_record(row.fields())?;
        writer.flush()?;
        file.sync_data()?;

        debug!(path = %self.path.display(), timestamp = %row.timestamp, "Activity row appended");
        Ok(())
    }
}
