use crate::config::Engine;
use thiserror::Error;

/// 应用程序错误类型
///
/// 翻译失败不在这里：它们在翻译阶段被记录为 `TranslationOutcome::Failed`。
#[derive(Debug, Error)]
pub enum AppError {
    /// 输入错误（处理开始前检测）
    #[error("输入错误: {0}")]
    Input(#[from] InputError),
    /// PDF 提取错误
    #[error("提取错误: {0}")]
    Extraction(#[from] ExtractionError),
    /// 对齐错误
    #[error("对齐错误: {0}")]
    Alignment(#[from] AlignmentError),
    /// 导出错误
    #[error("导出错误: {0}")]
    Export(#[from] ExportError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 输入错误
#[derive(Debug, Error)]
pub enum InputError {
    #[error("请提供中文 PDF")]
    MissingChinesePdf,
    #[error("请提供英文参考 PDF")]
    MissingEnglishPdf,
    #[error("请提供 {engine} API 密钥")]
    MissingCredential { engine: Engine },
    #[error("文件不存在: {path}")]
    FileNotFound { path: String },
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// PDF 提取错误
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("无法打开 PDF ({label}): {message}")]
    OpenFailed { label: String, message: String },
    #[error("无法提取第 {page} 页文本 ({label}): {message}")]
    PageFailed {
        label: String,
        page: usize,
        message: String,
    },
    #[error("提取任务异常终止 ({label}): {message}")]
    TaskFailed { label: String, message: String },
}

/// 对齐错误
#[derive(Debug, Error)]
pub enum AlignmentError {
    #[error("参考译文段落不足: 需要 {required} 段，只有 {available} 段")]
    ReferenceTooShort { required: usize, available: usize },
    #[error("译文数量与原文段落数不一致: 原文 {paragraphs} 段，译文 {translations} 段")]
    TranslationCountMismatch {
        paragraphs: usize,
        translations: usize,
    },
}

/// 导出错误
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("生成表格失败: {source}")]
    Spreadsheet {
        #[source]
        source: zip::result::ZipError,
    },
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("未知的翻译引擎: {value} (可选: openai, deepl)")]
    UnknownEngine { value: String },
    #[error("读取设置文件失败 ({path}): {source}")]
    SettingsReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("设置文件解析失败 ({path}): {source}")]
    SettingsParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Input(InputError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建 PDF 打开错误
    pub fn pdf_open_failed(label: impl Into<String>, message: impl ToString) -> Self {
        AppError::Extraction(ExtractionError::OpenFailed {
            label: label.into(),
            message: message.to_string(),
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Export(ExportError::WriteFailed {
            path: path.into(),
            source,
        })
    }
}

impl From<zip::result::ZipError> for AppError {
    fn from(err: zip::result::ZipError) -> Self {
        AppError::Export(ExportError::Spreadsheet { source: err })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
