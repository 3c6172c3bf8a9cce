use crate::error::{AppError, AppResult, InputError};
use std::path::Path;
use tokio::fs;

/// 待提取的 PDF 字节流
///
/// 提取完成后即被丢弃。
#[derive(Clone)]
pub struct PdfSource {
    /// 日志和错误信息中使用的名称（通常是文件名）
    pub label: String,
    pub bytes: Vec<u8>,
}

impl PdfSource {
    pub fn from_bytes(label: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            label: label.into(),
            bytes,
        }
    }
}

impl std::fmt::Debug for PdfSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfSource")
            .field("label", &self.label)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// 从磁盘读取 PDF 文件
pub async fn load_pdf(path: &Path) -> AppResult<PdfSource> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        return Err(InputError::FileNotFound {
            path: path.display().to_string(),
        }
        .into());
    }

    let bytes = fs::read(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

    let label = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    tracing::debug!("已读取 {} ({} 字节)", label, bytes.len());

    Ok(PdfSource::from_bytes(label, bytes))
}
