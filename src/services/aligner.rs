//! 按位置对齐
//!
//! 第 i 段原文、第 i 段译文与第 i 段参考译文组成一行，不做内容匹配。

use tracing::warn;

use crate::error::AlignmentError;
use crate::models::{Paragraph, TranslationOutcome};

/// 对齐后的一行，尚未计算相似度
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedRow<'a> {
    pub chinese: &'a Paragraph,
    pub translation: &'a TranslationOutcome,
    pub reference: &'a Paragraph,
}

/// 按位置对齐三列
///
/// - 译文数量必须等于原文段落数
/// - 参考译文少于原文段落数时报错
/// - 参考译文多出的部分被截断
pub fn align<'a>(
    chinese: &'a [Paragraph],
    translations: &'a [TranslationOutcome],
    reference: &'a [Paragraph],
) -> Result<Vec<AlignedRow<'a>>, AlignmentError> {
    if translations.len() != chinese.len() {
        return Err(AlignmentError::TranslationCountMismatch {
            paragraphs: chinese.len(),
            translations: translations.len(),
        });
    }

    ensure_reference_covers(chinese.len(), reference.len())?;

    if reference.len() > chinese.len() {
        warn!(
            "⚠️ 参考译文比原文多 {} 段，多出部分不参与对照",
            reference.len() - chinese.len()
        );
    }

    Ok(chinese
        .iter()
        .zip(translations)
        .zip(reference)
        .map(|((chinese, translation), reference)| AlignedRow {
            chinese,
            translation,
            reference,
        })
        .collect())
}

/// 参考译文至少要覆盖全部原文段落
///
/// 在翻译开始前即可检查。
pub fn ensure_reference_covers(chinese: usize, reference: usize) -> Result<(), AlignmentError> {
    if reference < chinese {
        return Err(AlignmentError::ReferenceTooShort {
            required: chinese,
            available: reference,
        });
    }
    Ok(())
}
