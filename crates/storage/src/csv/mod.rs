use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use survey_core::model::EvaluationRecord;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::repository::{EvaluationLog, Storage, StorageError};

mod codec;

pub use codec::{DecodeError, decode, encode_row, escape_field};

/// Evaluation log kept as a flat CSV file.
///
/// Every append opens the file, writes one complete row and closes it again.
/// Appends through clones of one log are serialised, and the header row is
/// written by whichever append finds the file empty, so a pre-created or
/// truncated file still gets exactly one header.
#[derive(Debug, Clone)]
pub struct CsvEvaluationLog {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl CsvEvaluationLog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write_row(&self, header: &str, row: &str) -> std::io::Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        let mut chunk = String::with_capacity(header.len() + row.len());
        if file.metadata().await?.len() == 0 {
            chunk.push_str(header);
        }
        chunk.push_str(row);

        file.write_all(chunk.as_bytes()).await?;
        file.flush().await
    }
}

#[async_trait]
impl EvaluationLog for CsvEvaluationLog {
    async fn append(&self, record: &EvaluationRecord) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let header = encode_row(&record.columns());
        let row = encode_row(&record.cells());

        if let Err(err) = self.write_row(&header, &row).await {
            warn!(path = %self.path.display(), error = %err, "failed to append evaluation");
            return Err(err.into());
        }

        debug!(
            path = %self.path.display(),
            image = record.image_filename(),
            "appended evaluation row"
        );
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<EvaluationRecord>, StorageError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let rows = decode(&content).map_err(|e| StorageError::Malformed {
            row: e.row,
            reason: e.reason.to_string(),
        })?;

        let mut rows = rows.into_iter();
        let Some(header) = rows.next() else {
            return Ok(Vec::new());
        };

        let mut out = Vec::new();
        for (idx, cells) in rows.enumerate() {
            let record =
                EvaluationRecord::from_row(&header, &cells).map_err(|e| StorageError::Malformed {
                    // header is row 1
                    row: idx + 2,
                    reason: e.to_string(),
                })?;
            out.push(record);
        }
        Ok(out)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

impl Storage {
    /// Build a `Storage` that appends to the CSV file at `path`.
    #[must_use]
    pub fn csv(path: impl Into<PathBuf>) -> Self {
        let evaluations: Arc<dyn EvaluationLog> = Arc::new(CsvEvaluationLog::new(path));
        Self::new(evaluations)
    }
}

/// Render records as a CSV document with a single header row.
///
/// The header comes from the first record; an empty slice yields an empty
/// string.
#[must_use]
pub fn render_csv(records: &[EvaluationRecord]) -> String {
    let Some(first) = records.first() else {
        return String::new();
    };
    let mut out = encode_row(&first.columns());
    for record in records {
        out.push_str(&encode_row(&record.cells()));
    }
    out
}
