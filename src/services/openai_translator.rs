//! OpenAI 翻译服务 - 业务能力层
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务
//! - 每段只请求一次，失败不重试

use std::time::Duration;

use anyhow::{Context, Result};
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use tracing::debug;

use crate::config::{ApiKey, Config};
use crate::services::translator::Translate;

/// 固定的系统指令
const SYSTEM_INSTRUCTION: &str = "You are a translator from Chinese to English.";

/// OpenAI chat-completion 翻译
///
/// 职责：
/// - 把一段中文作为用户消息发送
/// - 温度为 0，保证输出确定
/// - 返回第一个候选的内容（去除首尾空白）
pub struct OpenAiTranslator {
    api_base_url: String,
    model_name: String,
}

impl OpenAiTranslator {
    pub fn new(config: &Config) -> Self {
        Self {
            api_base_url: config.openai_api_base_url.clone(),
            model_name: config.openai_model_name.clone(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn client(&self, credential: &ApiKey) -> Client<OpenAIConfig> {
        let openai_config = OpenAIConfig::new()
            .with_api_key(credential.expose())
            .with_api_base(&self.api_base_url);

        Client::with_config(openai_config).with_backoff(no_retry())
    }

    fn build_request(&self, text: &str) -> Result<CreateChatCompletionRequest> {
        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(SYSTEM_INSTRUCTION)
            .build()?;
        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(text)
            .build()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![
                ChatCompletionRequestMessage::System(system_msg),
                ChatCompletionRequestMessage::User(user_msg),
            ])
            .temperature(0.0)
            .build()?;

        Ok(request)
    }
}

/// 不重试的退避策略：第一次失败后立即放弃
fn no_retry() -> backoff::ExponentialBackoff {
    backoff::ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build()
}

impl Translate for OpenAiTranslator {
    fn name(&self) -> &str {
        "OpenAI"
    }

    async fn translate(&self, text: &str, credential: &ApiKey) -> Result<String> {
        debug!(
            "调用 OpenAI API，模型: {}，原文长度: {} 字符",
            self.model_name,
            text.chars().count()
        );

        let request = self.build_request(text)?;

        let response = self
            .client(credential)
            .chat()
            .create(request)
            .await
            .context("OpenAI API 调用失败")?;

        debug!("OpenAI API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .context("OpenAI 返回内容为空")?;

        Ok(content.trim().to_string())
    }
}
