//! 应用编排 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责一次对照的资源管理和阶段调度。
//!
//! ## 核心功能
//!
//! 1. **输入校验**：缺少 PDF 或密钥时在处理开始前报错
//! 2. **读取与提取**：依次读取两份 PDF，在阻塞线程上提取文本
//! 3. **流程委托**：选定翻译引擎，交给 `ComparisonFlow` 翻译、对齐、打分
//! 4. **导出**：写出 xlsx 和 HTML 两份结果
//! 5. **全局统计**：预览结果并输出汇总

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::{ApiKey, Config};
use crate::error::{AppError, AppResult, InputError};
use crate::infrastructure::{Extraction, PdfExtractor};
use crate::models::{load_pdf, ComparisonTable};
use crate::services::{ExcelWriter, HtmlWriter, Translate, TranslatorBackend};
use crate::utils::logging;
use crate::workflow::ComparisonFlow;

/// 应用主结构
///
/// 只能通过 `initialize` 构造，构造成功即说明输入齐全。
pub struct App {
    config: Config,
    credential: ApiKey,
    chinese_pdf: PathBuf,
    english_pdf: PathBuf,
    extractor: PdfExtractor,
}

impl App {
    /// 校验输入并初始化应用
    pub async fn initialize(config: Config) -> AppResult<Self> {
        let chinese_pdf = config
            .chinese_pdf
            .clone()
            .ok_or(InputError::MissingChinesePdf)?;
        let english_pdf = config
            .english_pdf
            .clone()
            .ok_or(InputError::MissingEnglishPdf)?;
        let credential = config
            .credential
            .clone()
            .ok_or(InputError::MissingCredential {
                engine: config.engine,
            })?;

        for path in [&chinese_pdf, &english_pdf] {
            ensure_exists(path).await?;
        }

        logging::log_startup(&config);

        Ok(Self {
            config,
            credential,
            chinese_pdf,
            english_pdf,
            extractor: PdfExtractor::new(),
        })
    }

    /// 使用配置中选定的翻译引擎运行
    pub async fn run(&self) -> AppResult<ComparisonTable> {
        let backend = TranslatorBackend::from_config(&self.config);
        self.run_with(backend).await
    }

    /// 使用指定的翻译实现运行完整流程
    pub async fn run_with<T: Translate>(&self, translator: T) -> AppResult<ComparisonTable> {
        let (chinese, english) = self.extract_both().await?;

        info!(
            "\n🔄 开始翻译: {} 段，引擎 {}",
            chinese.paragraphs.len(),
            translator.name()
        );

        let flow = ComparisonFlow::new(translator, self.config.verbose_logging);
        let table = flow
            .run(&chinese.paragraphs, &english.paragraphs, &self.credential)
            .await?;

        self.export(&table).await?;

        logging::log_preview(&table);
        logging::print_final_stats(
            &table.summary(),
            &self.config.excel_path(),
            &self.config.html_path(),
        );

        Ok(table)
    }

    /// 读取并提取两份 PDF
    async fn extract_both(&self) -> AppResult<(Extraction, Extraction)> {
        info!("\n📖 正在读取 PDF...");

        let chinese_source = load_pdf(&self.chinese_pdf).await?;
        let chinese = self.extractor.extract_blocking(chinese_source).await?;

        let english_source = load_pdf(&self.english_pdf).await?;
        let english = self.extractor.extract_blocking(english_source).await?;

        logging::log_extracted("中文原文", chinese.paragraphs.len(), chinese.blank_pages());
        logging::log_extracted("英文参考", english.paragraphs.len(), english.blank_pages());

        Ok((chinese, english))
    }

    /// 写出两份结果文件
    async fn export(&self, table: &ComparisonTable) -> AppResult<()> {
        let output_dir = &self.config.output_dir;
        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|e| AppError::file_write_failed(output_dir.display().to_string(), e))?;

        info!("\n💾 正在导出结果...");
        ExcelWriter::new()
            .write(table, &self.config.excel_path())
            .await?;
        HtmlWriter::new()
            .write(table, &self.config.html_path())
            .await?;

        Ok(())
    }
}

async fn ensure_exists(path: &Path) -> AppResult<()> {
    match tokio::fs::try_exists(path).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(InputError::FileNotFound {
            path: path.display().to_string(),
        }
        .into()),
        Err(e) => Err(AppError::file_read_failed(path.display().to_string(), e)),
    }
}
