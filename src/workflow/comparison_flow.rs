//! 对照处理流程 - 流程层
//!
//! 核心职责：定义"一次对照"的完整处理流程
//!
//! 流程顺序：
//! 1. 检查参考译文是否覆盖全部原文段落
//! 2. 按顺序逐段翻译（失败写入错误标记，不中断）
//! 3. 按位置对齐
//! 4. 逐行计算相似度

use tracing::{debug, info};

use crate::config::ApiKey;
use crate::error::{AlignmentError, AppResult};
use crate::models::{ComparisonRow, ComparisonTable, Paragraph, TranslationOutcome};
use crate::services::{align, ensure_reference_covers, similarity_percent, translate_paragraph, Translate};
use crate::utils::truncate_text;
use crate::workflow::paragraph_ctx::ParagraphCtx;

/// 对照处理流程
///
/// - 只依赖业务能力（services）
/// - 不读写文件
/// - 同一时间只有一个翻译请求在途
pub struct ComparisonFlow<T: Translate> {
    translator: T,
    verbose_logging: bool,
}

impl<T: Translate> ComparisonFlow<T> {
    pub fn new(translator: T, verbose_logging: bool) -> Self {
        Self {
            translator,
            verbose_logging,
        }
    }

    pub fn translator(&self) -> &T {
        &self.translator
    }

    pub async fn run(
        &self,
        chinese: &[Paragraph],
        reference: &[Paragraph],
        credential: &ApiKey,
    ) -> AppResult<ComparisonTable> {
        ensure_reference_covers(chinese.len(), reference.len())?;

        let translations = self.translate_all(chinese, credential).await;
        let table = build_table(chinese, &translations, reference)?;

        info!("✓ 对照完成: 共 {} 行", table.len());
        Ok(table)
    }

    /// 逐段翻译，输出顺序与输入一致
    pub async fn translate_all(
        &self,
        chinese: &[Paragraph],
        credential: &ApiKey,
    ) -> Vec<TranslationOutcome> {
        let total = chinese.len();
        let mut translations = Vec::with_capacity(total);

        for (i, paragraph) in chinese.iter().enumerate() {
            let ctx = ParagraphCtx::new(i + 1, total);
            info!("{} 🌐 正在翻译...", ctx);

            if self.verbose_logging {
                debug!("{} 原文: {}", ctx, truncate_text(paragraph.as_str(), 80));
            }

            let outcome = translate_paragraph(&self.translator, paragraph.as_str(), credential).await;

            if self.verbose_logging && !outcome.is_failed() {
                debug!("{} 译文: {}", ctx, truncate_text(&outcome.text(), 80));
            }

            translations.push(outcome);
        }

        translations
    }
}

/// 对齐并打分
///
/// 错误标记照常参与打分，该行记为失败。
pub fn build_table(
    chinese: &[Paragraph],
    translations: &[TranslationOutcome],
    reference: &[Paragraph],
) -> Result<ComparisonTable, AlignmentError> {
    let rows = align(chinese, translations, reference)?
        .into_iter()
        .map(|row| {
            let machine_translation = row.translation.text();
            let similarity = similarity_percent(&machine_translation, row.reference.as_str());
            ComparisonRow {
                chinese: row.chinese.to_string(),
                machine_translation,
                reference: row.reference.to_string(),
                similarity,
                failed: row.translation.is_failed(),
            }
        })
        .collect();

    Ok(ComparisonTable::new(rows))
}
