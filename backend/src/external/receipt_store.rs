//! Filesystem store for sale receipts
//!
//! Receipts are plain-text files named `<receipt id>.txt` in one directory.
//! A receipt file appears only once its text is complete, and is never
//! overwritten.

use std::io;
use std::path::{Path, PathBuf};

use shared::{is_safe_receipt_name, parse_receipt_id, ReceiptSummary};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::AppError;

const RECEIPT_EXTENSION: &str = "txt";
const PARTIAL_EXTENSION: &str = "partial";

#[derive(Debug, Error)]
pub enum ReceiptStoreError {
    #[error("invalid receipt name: {0}")]
    InvalidName(String),

    #[error("receipt {0} already exists")]
    AlreadyExists(String),

    #[error("receipt {0} not found")]
    NotFound(String),

    #[error("receipt storage I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<ReceiptStoreError> for AppError {
    fn from(err: ReceiptStoreError) -> Self {
        match err {
            ReceiptStoreError::InvalidName(name) => AppError::validation(
                "receipt_id",
                &format!("Invalid receipt id {}", name),
                &format!("Identificador de recibo inválido {}", name),
            ),
            ReceiptStoreError::NotFound(name) => AppError::NotFound(format!("Receipt {}", name)),
            other => AppError::StorageError(other.to_string()),
        }
    }
}

/// Receipt writer backed by a directory
#[derive(Debug, Clone)]
pub struct ReceiptStore {
    directory: PathBuf,
}

impl ReceiptStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, ReceiptStoreError> {
        if !is_safe_receipt_name(name) {
            return Err(ReceiptStoreError::InvalidName(name.to_string()));
        }
        Ok(self
            .directory
            .join(format!("{}.{}", name, RECEIPT_EXTENSION)))
    }

    /// Write a new receipt and return its path.
    ///
    /// The text goes to `<name>.partial` first and is linked to
    /// `<name>.txt` only once it is fully on disk, so a failed write never
    /// leaves a receipt behind.
    pub async fn write(&self, name: &str, text: &str) -> Result<PathBuf, ReceiptStoreError> {
        let path = self.path_for(name)?;
        let partial = self.directory.join(format!("{}.{}", name, PARTIAL_EXTENSION));
        fs::create_dir_all(&self.directory).await?;

        let result = write_and_link(&partial, &path, text).await;

        if let Err(e) = fs::remove_file(&partial).await {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(receipt_id = %name, "Could not remove partial receipt: {}", e);
            }
        }

        match result {
            Ok(()) => {
                tracing::debug!(receipt_id = %name, path = %path.display(), "Receipt written");
                Ok(path)
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                Err(ReceiptStoreError::AlreadyExists(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Read a receipt's text
    pub async fn read(&self, name: &str) -> Result<String, ReceiptStoreError> {
        let path = self.path_for(name)?;
        match fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(ReceiptStoreError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// List stored receipts, newest first. Files whose names are not
    /// receipt ids are skipped.
    pub async fn list(&self) -> Result<Vec<ReceiptSummary>, ReceiptStoreError> {
        let mut entries = match fs::read_dir(&self.directory).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut receipts = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RECEIPT_EXTENSION) {
                continue;
            }
            if let Some(summary) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(parse_receipt_id)
            {
                receipts.push(summary);
            }
        }

        receipts.sort_by(|a, b| b.issued_at.cmp(&a.issued_at).then_with(|| b.id.cmp(&a.id)));
        Ok(receipts)
    }
}

/// Write `text` to `partial`, then hard-link it to `path`. Linking fails if
/// `path` exists, so a receipt is never replaced.
async fn write_and_link(partial: &Path, path: &Path, text: &str) -> io::Result<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(partial)
        .await?;
    file.write_all(text.as_bytes()).await?;
    file.sync_all().await?;
    drop(file);

    fs::hard_link(partial, path).await
}
