//! PDF 文本提取器 - 基础设施层
//!
//! 唯一接触 MuPDF 的模块，只暴露"按页提取文本"的能力

use mupdf::{Document, TextPageFlags};
use tracing::debug;

use crate::error::{AppError, AppResult, ExtractionError};
use crate::models::{Paragraph, PdfSource};

/// 单个文档的提取结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// 有文本的页，按页序排列
    pub paragraphs: Vec<Paragraph>,
    /// 文档总页数
    pub page_count: usize,
}

impl Extraction {
    /// 被丢弃的空白页数量
    pub fn blank_pages(&self) -> usize {
        self.page_count - self.paragraphs.len()
    }
}

/// PDF 文本提取器
///
/// 职责：
/// - 打开 PDF 字节流
/// - 逐页按阅读顺序提取纯文本
/// - 丢弃空白页，不保留页码
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    /// 提取 PDF 的段落（每个非空页一段）
    ///
    /// 文件不是合法 PDF 时返回错误，不做恢复。
    pub fn extract(&self, source: &PdfSource) -> AppResult<Extraction> {
        let pages = self.extract_pages(source)?;
        let page_count = pages.len();

        let paragraphs: Vec<Paragraph> = pages.iter().filter_map(|t| Paragraph::new(t)).collect();

        debug!(
            "📄 {}: 共 {} 页，提取到 {} 段文本",
            source.label,
            page_count,
            paragraphs.len()
        );

        Ok(Extraction {
            paragraphs,
            page_count,
        })
    }

    /// 在阻塞线程池中提取
    ///
    /// MuPDF 文档不能跨线程，所以整个提取过程都在同一个阻塞任务里完成。
    pub async fn extract_blocking(&self, source: PdfSource) -> AppResult<Extraction> {
        let extractor = *self;
        let label = source.label.clone();
        tokio::task::spawn_blocking(move || extractor.extract(&source))
            .await
            .map_err(|e| {
                AppError::Extraction(ExtractionError::TaskFailed {
                    label,
                    message: e.to_string(),
                })
            })?
    }

    /// 逐页提取原始文本（包含空白页）
    fn extract_pages(&self, source: &PdfSource) -> AppResult<Vec<String>> {
        let label = source.label.as_str();

        let document = Document::from_bytes(&source.bytes, "pdf")
            .map_err(|e| AppError::pdf_open_failed(label, e))?;

        let mut pages_text = Vec::new();

        let pages = document
            .pages()
            .map_err(|e| AppError::pdf_open_failed(label, e))?;

        for (index, page_result) in pages.enumerate() {
            let page_number = index + 1;
            let page_failed = |e: mupdf::Error| {
                AppError::Extraction(ExtractionError::PageFailed {
                    label: label.to_string(),
                    page: page_number,
                    message: e.to_string(),
                })
            };

            let page = page_result.map_err(page_failed)?;
            let text_page = page
                .to_text_page(text_flags())
                .map_err(page_failed)?;

            // 按块、行输出，每行以换行结束
            let mut page_text = String::new();
            for block in text_page.blocks() {
                for line in block.lines() {
                    let line_text: String = line
                        .chars()
                        .map(|c| c.char().unwrap_or('\u{FFFD}'))
                        .collect();
                    page_text.push_str(&line_text);
                    page_text.push('\n');
                }
            }

            debug!("{} 第 {} 页: {} 字符", label, page_number, page_text.chars().count());
            pages_text.push(page_text);
        }

        Ok(pages_text)
    }
}

/// 保留连字与原始空白，丢弃页面框之外的文字
fn text_flags() -> TextPageFlags {
    TextPageFlags::PRESERVE_LIGATURES | TextPageFlags::PRESERVE_WHITESPACE | TextPageFlags::CLIP
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_flags() {
        let flags = text_flags();
        assert!(flags.contains(TextPageFlags::CLIP));
        assert!(flags.contains(TextPageFlags::PRESERVE_LIGATURES));
        assert!(flags.contains(TextPageFlags::PRESERVE_WHITESPACE));
    }

    #[test]
    fn test_invalid_bytes_fail() {
        let source = PdfSource::from_bytes("broken.pdf", b"this is not a pdf".to_vec());
        let err = PdfExtractor::new().extract(&source).unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }

    #[test]
    fn test_blank_pages_count() {
        let extraction = Extraction {
            paragraphs: vec![Paragraph::new("a").unwrap()],
            page_count: 3,
        };
        assert_eq!(extraction.blank_pages(), 2);
    }
}
