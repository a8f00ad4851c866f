//! Image references for product types and products.
//!
//! Clients submit either a base64 data URI (`data:image/png;base64,...`) or a
//! reference the record already holds. New images are decoded and checked
//! up front, and only written once the whole request has validated.

use std::path::PathBuf;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::ImageFormat;
use sha2::{Digest, Sha256};

use crate::error::{AppError, AppResult};

/// Formats accepted for catalog images.
const SUPPORTED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::WebP,
    ImageFormat::Gif,
];

/// A validated image reference, possibly with bytes still to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedAsset {
    pub reference: String,
    pending: Option<PendingFile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingFile {
    file_name: String,
    bytes: Vec<u8>,
}

impl PreparedAsset {
    pub fn is_new(&self) -> bool {
        self.pending.is_some()
    }
}

#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Decodes and checks `raw` without touching storage. `existing` holds
    /// the references the record already owns; resubmitting one of them
    /// keeps it as is.
    fn prepare(&self, raw: &str, existing: &[String], field: &'static str)
    -> AppResult<PreparedAsset>;

    /// Writes the bytes of every new asset.
    async fn persist(&self, assets: &[PreparedAsset]) -> AppResult<()>;
}

/// Stores images as `<root>/<sha256>.<ext>`, served under `url_prefix`.
#[derive(Debug, Clone)]
pub struct LocalAssetStore {
    root: PathBuf,
    url_prefix: String,
}

impl LocalAssetStore {
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    fn prepare(
        &self,
        raw: &str,
        existing: &[String],
        field: &'static str,
    ) -> AppResult<PreparedAsset> {
        let raw = raw.trim();
        if existing.iter().any(|reference| reference == raw) {
            return Ok(PreparedAsset {
                reference: raw.to_string(),
                pending: None,
            });
        }

        let bytes = decode_data_uri(raw).ok_or(AppError::InvalidImage { field })?;
        let format = image::guess_format(&bytes).map_err(|_| AppError::InvalidImage { field })?;
        if !SUPPORTED_FORMATS.contains(&format) {
            return Err(AppError::InvalidImage { field });
        }
        let extension = format
            .extensions_str()
            .first()
            .copied()
            .ok_or(AppError::InvalidImage { field })?;

        let hash = hex::encode(Sha256::digest(&bytes));
        let file_name = format!("{hash}.{extension}");
        Ok(PreparedAsset {
            reference: format!("{}/{file_name}", self.url_prefix),
            pending: Some(PendingFile { file_name, bytes }),
        })
    }

    async fn persist(&self, assets: &[PreparedAsset]) -> AppResult<()> {
        let pending: Vec<&PendingFile> = assets
            .iter()
            .filter_map(|asset| asset.pending.as_ref())
            .collect();
        if pending.is_empty() {
            return Ok(());
        }

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|err| anyhow::anyhow!("create media root {:?}: {err}", self.root))?;
        for file in pending {
            let path = self.root.join(&file.file_name);
            // Content addressed: an existing file already has these bytes.
            if tokio::fs::try_exists(&path).await.unwrap_or(false) {
                continue;
            }
            tokio::fs::write(&path, &file.bytes)
                .await
                .map_err(|err| anyhow::anyhow!("write asset {path:?}: {err}"))?;
            tracing::debug!(path = %path.display(), size = file.bytes.len(), "asset stored");
        }
        Ok(())
    }
}

/// Accepts `data:<mime>;base64,<payload>` as well as bare base64.
fn decode_data_uri(raw: &str) -> Option<Vec<u8>> {
    let payload = match raw.strip_prefix("data:") {
        Some(rest) => {
            let (header, payload) = rest.split_once(',')?;
            if !header.ends_with(";base64") {
                return None;
            }
            payload
        }
        None => raw,
    };
    let bytes = STANDARD.decode(payload.trim()).ok()?;
    (!bytes.is_empty()).then_some(bytes)
}
