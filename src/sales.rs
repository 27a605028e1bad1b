use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::error::AppError;

/// Append-only text file holding one bill total per line.
#[derive(Debug, Clone)]
pub struct SalesLog {
    path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesReport {
    pub entries: usize,
    pub skipped: usize,
    pub total: f64,
}

impl SalesLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(&self, amount: f64) -> Result<(), AppError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|err| self.unavailable("open", err))?;

        file.write_all(format!("{amount}\n").as_bytes())
            .await
            .map_err(|err| self.unavailable("write", err))?;
        file.flush()
            .await
            .map_err(|err| self.unavailable("flush", err))?;

        debug!(path = %self.path.display(), amount, "sale recorded");
        Ok(())
    }

    /// Sums every line of the log. `Ok(None)` means there is no log yet.
    pub async fn report(&self) -> Result<Option<SalesReport>, AppError> {
        let contents = match tokio::fs::read(&self.path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.unavailable("read", err)),
        };

        Ok(Some(summarize(&contents)))
    }

    fn unavailable(&self, action: &str, err: std::io::Error) -> AppError {
        AppError::PersistenceUnavailable(format!(
            "failed to {action} {}: {err}",
            self.path.display()
        ))
    }
}

/// Each line is decoded on its own; undecodable lines count as skipped.
fn summarize(contents: &[u8]) -> SalesReport {
    let mut report = SalesReport {
        entries: 0,
        skipped: 0,
        total: 0.0,
    };

    for (index, raw) in contents.split(|&byte| byte == b'\n').enumerate() {
        if raw.trim_ascii().is_empty() {
            continue;
        }

        match parse_line(index + 1, raw) {
            Ok(amount) => {
                report.entries += 1;
                report.total += amount;
            }
            Err(err) => {
                report.skipped += 1;
                warn!(error = %err, "skipping sales log entry");
            }
        }
    }

    report
}

fn parse_line(line: usize, raw: &[u8]) -> Result<f64, AppError> {
    match std::str::from_utf8(raw) {
        Ok(text) => parse_amount(line, text.trim()),
        Err(_) => Err(AppError::MalformedLogEntry {
            line,
            content: String::from_utf8_lossy(raw).trim().to_string(),
        }),
    }
}

fn parse_amount(line: usize, raw: &str) -> Result<f64, AppError> {
    raw.parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| AppError::MalformedLogEntry {
            line,
            content: raw.to_string(),
        })
}
