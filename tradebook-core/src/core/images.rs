//! Turns user-selected screenshots into self-contained `data:` URLs.

use crate::{Result, TradebookError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::{Path, PathBuf};

/// One image selected for upload.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// An image file on disk, read when the batch is encoded.
    File(PathBuf),
    /// Image bytes already in memory; `name` is used to guess the MIME type.
    Bytes { name: String, data: Vec<u8> },
}

impl ImageSource {
    pub fn name(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Bytes { name, .. } => name.clone(),
        }
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        Self::File(path.to_path_buf())
    }
}

/// Encodes `data` as a `data:<mime>;base64,...` URL, guessing the MIME type from `name`.
pub fn to_data_url(name: &str, data: &[u8]) -> String {
    let mime = mime_guess::from_path(name).first_or_octet_stream();
    format!("data:{};base64,{}", mime.essence_str(), STANDARD.encode(data))
}

async fn encode_one(source: ImageSource) -> Result<String> {
    match source {
        ImageSource::File(path) => {
            let data = tokio::fs::read(&path)
                .await
                .map_err(|e| TradebookError::ImageRead {
                    name: path.display().to_string(),
                    reason: e.to_string(),
                })?;
            Ok(to_data_url(&path.to_string_lossy(), &data))
        }
        ImageSource::Bytes { name, data } => Ok(to_data_url(&name, &data)),
    }
}

/// Encodes every source concurrently and returns the data URLs in input order.
///
/// The batch is all-or-nothing: the first failing source (in input order)
/// is reported, reads still in flight are aborted and no encoded images are
/// returned.
///
/// # Errors
///
/// Returns [`TradebookError::ImageRead`] if any file cannot be read.
pub async fn encode_batch<I>(sources: I) -> Result<Vec<String>>
where
    I: IntoIterator,
    I::Item: Into<ImageSource>,
{
    let tasks: Vec<_> = sources
        .into_iter()
        .map(|item| {
            let source: ImageSource = item.into();
            let name = source.name();
            (name, tokio::spawn(encode_one(source)))
        })
        .collect();

    let mut encoded = Vec::with_capacity(tasks.len());
    let mut pending = tasks.into_iter();
    while let Some((name, task)) = pending.next() {
        let result = task.await.unwrap_or_else(|e| {
            Err(TradebookError::ImageRead {
                name,
                reason: e.to_string(),
            })
        });
        match result {
            Ok(url) => encoded.push(url),
            Err(e) => {
                for (_, rest) in pending {
                    rest.abort();
                }
                return Err(e);
            }
        }
    }
    log::debug!("encoded {} screenshot(s)", encoded.len());
    Ok(encoded)
}
