//! # PDF Translate Compare
//!
//! 把中文 PDF 逐段机器翻译成英文，再与英文参考译文按位置对照并打分
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有 PDF 解析能力
//! - `PdfExtractor` - 每页一段文本，丢弃空白页
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单段文本或单张表
//! - `Translate` / `TranslatorBackend` - OpenAI / DeepL 翻译能力
//! - `align` - 按位置对齐
//! - `similarity_percent` - 最长匹配块相似度
//! - `ExcelWriter` / `HtmlWriter` - 导出能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次对照"的完整处理流程
//! - `ParagraphCtx` - 上下文封装（第几段 / 共几段）
//! - `ComparisonFlow` - 流程编排（translate → align → score）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 校验输入、读取 PDF、运行流程、导出结果
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{ApiKey, Config, Engine};
pub use error::{AppError, AppResult};
pub use infrastructure::PdfExtractor;
pub use models::{ComparisonRow, ComparisonTable, Paragraph, TranslationOutcome};
pub use orchestrator::App;
pub use services::{similarity_percent, Translate, TranslatorBackend};
pub use workflow::{ComparisonFlow, ParagraphCtx};
