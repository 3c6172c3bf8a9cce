//! 对照表数据模型
//!
//! 所有实体只在一次运行内存在于内存中，导出后即丢弃。

use std::fmt;

/// 表头，顺序固定
pub const COLUMN_HEADERS: [&str; 4] = [
    "Chinese Text",
    "Machine Translation",
    "Reference English",
    "Similarity %",
];

/// 段落：PDF 单页提取出的、去除首尾空白后的非空文本
///
/// 名为段落，实际粒度是页。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph(String);

impl Paragraph {
    /// 空白文本返回 `None`
    pub fn new(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Paragraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Paragraph {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// 单段翻译结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    /// 翻译成功
    Translated(String),
    /// 翻译失败，保留引擎名与错误信息
    Failed { backend: String, message: String },
}

impl TranslationOutcome {
    pub fn failed(backend: impl Into<String>, message: impl Into<String>) -> Self {
        TranslationOutcome::Failed {
            backend: backend.into(),
            message: message.into(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, TranslationOutcome::Failed { .. })
    }

    /// 写入表格、参与相似度计算的文本
    ///
    /// 失败时为 `[<Backend> Error: <message>]`。
    pub fn text(&self) -> String {
        match self {
            TranslationOutcome::Translated(text) => text.clone(),
            TranslationOutcome::Failed { backend, message } => {
                format!("[{} Error: {}]", backend, message)
            }
        }
    }
}

impl fmt::Display for TranslationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// 对照表的一行
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub chinese: String,
    pub machine_translation: String,
    pub reference: String,
    /// 0–100，保留两位小数
    pub similarity: f64,
    /// 机器翻译一栏是否为错误标记
    pub failed: bool,
}

impl ComparisonRow {
    /// 按表头顺序输出的文本单元格，分数保留 `decimals` 位小数
    pub fn cells(&self, decimals: usize) -> [String; 4] {
        [
            self.chinese.clone(),
            self.machine_translation.clone(),
            self.reference.clone(),
            format!("{:.*}", decimals, self.similarity),
        ]
    }
}

/// 对照表
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonTable {
    pub rows: Vec<ComparisonRow>,
}

/// 对照表统计
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableSummary {
    pub rows: usize,
    pub failed: usize,
    /// 全部行的平均相似度
    pub mean_similarity: Option<f64>,
    /// 仅成功翻译行的平均相似度
    pub mean_similarity_translated: Option<f64>,
}

impl ComparisonTable {
    pub fn new(rows: Vec<ComparisonRow>) -> Self {
        Self { rows }
    }

    pub fn headers(&self) -> [&'static str; 4] {
        COLUMN_HEADERS
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn summary(&self) -> TableSummary {
        let failed = self.rows.iter().filter(|r| r.failed).count();
        TableSummary {
            rows: self.rows.len(),
            failed,
            mean_similarity: mean(self.rows.iter().map(|r| r.similarity)),
            mean_similarity_translated: mean(
                self.rows.iter().filter(|r| !r.failed).map(|r| r.similarity),
            ),
        }
    }

    /// 分数列统一使用的小数位数
    ///
    /// 取能无损表示整列分数的最少位数，至少 1 位，最多 2 位：
    /// 全是整数时显示 `100.0`，有一个 `66.67` 时整列两位。
    pub fn score_decimals(&self) -> usize {
        self.rows
            .iter()
            .map(|row| decimals_needed(row.similarity))
            .max()
            .unwrap_or(1)
    }
}

fn decimals_needed(value: f64) -> usize {
    (1..2)
        .find(|&d| format!("{:.*}", d, value).parse::<f64>() == Ok(value))
        .unwrap_or(2)
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
