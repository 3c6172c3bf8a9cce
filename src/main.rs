use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use pdf_translate_compare::config::{ApiKey, Config, Engine, SettingsFile};
use pdf_translate_compare::utils::logging;
use pdf_translate_compare::App;

/// 把中文 PDF 机器翻译成英文，并与英文参考译文逐段对照打分
#[derive(Debug, Parser)]
#[command(name = "pdf-translate-compare", version)]
struct Cli {
    /// 中文原文 PDF
    #[arg(long, value_name = "PDF")]
    chinese: Option<PathBuf>,

    /// 英文参考译文 PDF
    #[arg(long, value_name = "PDF")]
    english: Option<PathBuf>,

    /// 翻译引擎: openai 或 deepl
    #[arg(long)]
    engine: Option<Engine>,

    /// 所选引擎的 API 密钥（也可通过 OPENAI_API_KEY / DEEPL_API_KEY 提供）
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,

    /// 输出目录
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// TOML 设置文件
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// 显示详细日志
    #[arg(long, short)]
    verbose: bool,
}

impl Cli {
    /// 设置文件 → 环境变量 → 命令行，后者覆盖前者
    fn into_config(self) -> Result<Config> {
        let mut config = Config::default();
        if let Some(path) = &self.config {
            config = config.with_settings(SettingsFile::load(path)?)?;
        }
        let mut config = config.with_env()?;

        if let Some(engine) = self.engine {
            config.engine = engine;
        }
        if let Some(key) = self.api_key.and_then(ApiKey::new) {
            config.credential = Some(key);
        }
        if self.chinese.is_some() {
            config.chinese_pdf = self.chinese;
        }
        if self.english.is_some() {
            config.english_pdf = self.english;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        config.verbose_logging |= self.verbose;

        Ok(config.with_env_credential())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Cli::parse().into_config()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    App::initialize(config).await?.run().await?;

    Ok(())
}
