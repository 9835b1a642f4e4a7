// src/output/writer.rs
//! Executes output operations by performing actual I/O.
//!
//! This module is the only place where file I/O operations occur,
//! keeping the rest of the codebase pure and testable.

use crate::error::PageFailure;
use crate::pipeline::{PageSink, RenderedPage};
use std::path::{Path, PathBuf};

/// Writes rendered pages to the local filesystem.
///
/// Each write goes to a temporary sibling first and is then renamed over
/// the target, so a reader sees either the previous file or the new one.
#[derive(Debug, Clone, Default)]
pub struct FileSink;

impl FileSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl PageSink for FileSink {
    async fn write(&self, page: &RenderedPage) -> Result<u64, PageFailure> {
        write_file(&page.path, &page.content)
            .await
            .map_err(|e| PageFailure::WriteFailure {
                path: page.path.clone(),
                cause: e.to_string(),
            })
    }
}

/// Writes content to a file, creating parent directories if needed.
async fn write_file(path: &Path, content: &str) -> std::io::Result<u64> {
    log::debug!("Writing {} bytes to {}", content.len(), path.display());

    if let Some(parent) = path.parent() {
        create_directory(parent).await?;
    }

    let tmp = temp_path(path);
    if let Err(e) = tokio::fs::write(&tmp, content).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e);
    }
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e);
    }

    log::debug!("Wrote file: {}", path.display());
    Ok(content.len() as u64)
}

/// Creates a directory; an existing directory is fine.
async fn create_directory(path: &Path) -> std::io::Result<()> {
    if path.as_os_str().is_empty() {
        return Ok(());
    }
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => return Ok(()),
        Ok(_) => {
            return Err(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("Path exists but is not a directory: {}", path.display()),
            ))
        }
        Err(_) => {}
    }

    tokio::fs::create_dir_all(path).await?;
    log::debug!("Created directory: {}", path.display());
    Ok(())
}

/// `index.md` -> `.index.md.<random>.tmp` in the same directory, so the
/// final rename never crosses filesystems.
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_name = format!(".{}.{}.tmp", name, uuid::Uuid::new_v4().as_simple());
    path.with_file_name(tmp_name)
}
