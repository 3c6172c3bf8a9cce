//! 翻译能力 - 业务能力层
//!
//! 只负责"翻译一段文本"，不关心流程和对齐

use anyhow::Result;
use tracing::warn;

use crate::config::{ApiKey, Config, Engine};
use crate::models::TranslationOutcome;
use crate::services::{DeepLTranslator, OpenAiTranslator};

/// 翻译能力
///
/// 每次调用独立、无状态；密钥在调用时传入，不由实现方持有。
#[allow(async_fn_in_trait)]
pub trait Translate {
    /// 错误标记中使用的引擎名称
    fn name(&self) -> &str;

    /// 翻译一段文本
    async fn translate(&self, text: &str, credential: &ApiKey) -> Result<String>;
}

/// 翻译一段文本，失败时转成错误标记而不是中断
///
/// 这是整个流程中唯一吞掉错误的地方。
pub async fn translate_paragraph<T: Translate>(
    translator: &T,
    text: &str,
    credential: &ApiKey,
) -> TranslationOutcome {
    match translator.translate(text, credential).await {
        Ok(translation) => TranslationOutcome::Translated(translation),
        Err(e) => {
            warn!("{} 翻译失败: {:#}", translator.name(), e);
            TranslationOutcome::failed(translator.name(), format!("{:#}", e))
        }
    }
}

/// 已选定的翻译引擎
///
/// 在配置阶段选定一次，之后每次调用不再判断。
pub enum TranslatorBackend {
    OpenAi(OpenAiTranslator),
    DeepL(DeepLTranslator),
}

impl TranslatorBackend {
    pub fn from_config(config: &Config) -> Self {
        match config.engine {
            Engine::OpenAi => TranslatorBackend::OpenAi(OpenAiTranslator::new(config)),
            Engine::DeepL => TranslatorBackend::DeepL(DeepLTranslator::new(config)),
        }
    }

    pub fn engine(&self) -> Engine {
        match self {
            TranslatorBackend::OpenAi(_) => Engine::OpenAi,
            TranslatorBackend::DeepL(_) => Engine::DeepL,
        }
    }
}

impl Translate for TranslatorBackend {
    fn name(&self) -> &str {
        match self {
            TranslatorBackend::OpenAi(t) => t.name(),
            TranslatorBackend::DeepL(t) => t.name(),
        }
    }

    async fn translate(&self, text: &str, credential: &ApiKey) -> Result<String> {
        match self {
            TranslatorBackend::OpenAi(t) => t.translate(text, credential).await,
            TranslatorBackend::DeepL(t) => t.translate(text, credential).await,
        }
    }
}
