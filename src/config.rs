//! 程序配置
//!
//! 配置来源优先级：命令行参数 > 环境变量 > TOML 设置文件 > 默认值。
//! API 密钥只来自命令行或环境变量，永远不会写入磁盘。

use crate::error::{AppError, AppResult, ConfigError};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// 翻译引擎
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Engine {
    /// 通用 chat-completion 接口
    #[default]
    OpenAi,
    /// DeepL 专用翻译接口
    DeepL,
}

impl Engine {
    /// 用于错误标记和日志的名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Engine::OpenAi => "OpenAI",
            Engine::DeepL => "DeepL",
        }
    }

    /// 该引擎对应的密钥环境变量
    pub fn credential_env_var(&self) -> &'static str {
        match self {
            Engine::OpenAi => "OPENAI_API_KEY",
            Engine::DeepL => "DEEPL_API_KEY",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Engine {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Engine::OpenAi),
            "deepl" => Ok(Engine::DeepL),
            _ => Err(ConfigError::UnknownEngine {
                value: s.to_string(),
            }),
        }
    }
}

/// API 密钥
///
/// `Debug` / `Display` 只输出脱敏后的形式。
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// 空白密钥视为未提供
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    fn redacted(&self) -> String {
        let tail: String = self
            .0
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        if self.0.chars().count() > 8 {
            format!("****{}", tail)
        } else {
            "****".to_string()
        }
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({})", self.redacted())
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 翻译引擎
    pub engine: Engine,
    /// 当前引擎的 API 密钥
    pub credential: Option<ApiKey>,
    /// 中文原文 PDF
    pub chinese_pdf: Option<PathBuf>,
    /// 英文参考译文 PDF
    pub english_pdf: Option<PathBuf>,
    /// 输出目录
    pub output_dir: PathBuf,
    pub excel_file_name: String,
    pub html_file_name: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- OpenAI 配置 ---
    pub openai_api_base_url: String,
    pub openai_model_name: String,
    // --- DeepL 配置 ---
    /// 为空时根据密钥类型自动选择（免费密钥以 `:fx` 结尾）
    pub deepl_api_base_url: Option<String>,
    pub deepl_target_lang: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: Engine::default(),
            credential: None,
            chinese_pdf: None,
            english_pdf: None,
            output_dir: PathBuf::from("."),
            excel_file_name: "translation_comparison.xlsx".to_string(),
            html_file_name: "translation_comparison.html".to_string(),
            verbose_logging: false,
            openai_api_base_url: "https://api.openai.com/v1".to_string(),
            openai_model_name: "gpt-4o-mini".to_string(),
            deepl_api_base_url: None,
            deepl_target_lang: "EN-US".to_string(),
        }
    }
}

/// TOML 设置文件
///
/// 所有字段可选，缺省时沿用默认值。文件中没有密钥字段。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    pub engine: Option<String>,
    pub output_dir: Option<String>,
    pub excel_file_name: Option<String>,
    pub html_file_name: Option<String>,
    pub verbose_logging: Option<bool>,
    pub openai: Option<OpenAiSettings>,
    pub deepl: Option<DeepLSettings>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiSettings {
    pub api_base_url: Option<String>,
    pub model_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeepLSettings {
    pub api_base_url: Option<String>,
    pub target_lang: Option<String>,
}

impl SettingsFile {
    pub fn from_toml_str(content: &str, path: &Path) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| {
            AppError::Config(ConfigError::SettingsParseFailed {
                path: path.display().to_string(),
                source: e,
            })
        })
    }

    pub fn load(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(ConfigError::SettingsReadFailed {
                path: path.display().to_string(),
                source: e,
            })
        })?;
        Self::from_toml_str(&content, path)
    }
}

impl Config {
    /// 默认值 + 环境变量
    pub fn from_env() -> AppResult<Self> {
        Ok(Self::default().with_env()?.with_env_credential())
    }

    /// 把设置文件合并到当前配置上
    pub fn with_settings(mut self, settings: SettingsFile) -> AppResult<Self> {
        if let Some(engine) = settings.engine {
            self.engine = engine.parse()?;
        }
        if let Some(dir) = settings.output_dir {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(name) = settings.excel_file_name {
            self.excel_file_name = name;
        }
        if let Some(name) = settings.html_file_name {
            self.html_file_name = name;
        }
        if let Some(verbose) = settings.verbose_logging {
            self.verbose_logging = verbose;
        }
        if let Some(openai) = settings.openai {
            if let Some(url) = openai.api_base_url {
                self.openai_api_base_url = url;
            }
            if let Some(model) = openai.model_name {
                self.openai_model_name = model;
            }
        }
        if let Some(deepl) = settings.deepl {
            if deepl.api_base_url.is_some() {
                self.deepl_api_base_url = deepl.api_base_url;
            }
            if let Some(lang) = deepl.target_lang {
                self.deepl_target_lang = lang;
            }
        }
        Ok(self)
    }

    /// 用环境变量覆盖当前配置（不含密钥）
    pub fn with_env(self) -> AppResult<Self> {
        self.with_vars(|name| std::env::var(name).ok())
    }

    /// 尚无密钥时，从当前引擎对应的环境变量读取
    ///
    /// 要在引擎最终确定之后调用。
    pub fn with_env_credential(self) -> Self {
        self.credential_from_vars(|name| std::env::var(name).ok())
    }

    fn with_vars(mut self, var: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        if let Some(engine) = var("TRANSLATION_ENGINE") {
            self.engine = engine.parse()?;
        }
        if let Some(url) = var("OPENAI_API_BASE_URL") {
            self.openai_api_base_url = url;
        }
        if let Some(model) = var("OPENAI_MODEL_NAME") {
            self.openai_model_name = model;
        }
        if let Some(url) = var("DEEPL_API_BASE_URL") {
            self.deepl_api_base_url = Some(url);
        }
        if let Some(lang) = var("DEEPL_TARGET_LANG") {
            self.deepl_target_lang = lang;
        }
        if let Some(dir) = var("OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        self.verbose_logging = var("VERBOSE_LOGGING")
            .and_then(|v| v.parse().ok())
            .unwrap_or(self.verbose_logging);
        Ok(self)
    }

    fn credential_from_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if self.credential.is_none() {
            self.credential = var(self.engine.credential_env_var()).and_then(ApiKey::new);
        }
        self
    }

    pub fn excel_path(&self) -> PathBuf {
        self.output_dir.join(&self.excel_file_name)
    }

    pub fn html_path(&self) -> PathBuf {
        self.output_dir.join(&self.html_file_name)
    }
}
