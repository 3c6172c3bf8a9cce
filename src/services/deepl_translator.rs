//! DeepL 翻译服务 - 业务能力层
//!
//! 直接调用 DeepL REST 接口 `POST /v2/translate`

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ApiKey, Config};
use crate::services::translator::Translate;

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    text: Vec<&'a str>,
    target_lang: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    text: String,
}

/// DeepL 翻译
pub struct DeepLTranslator {
    client: Client,
    /// 为空时按密钥类型选择免费版或专业版地址
    api_base_url: Option<String>,
    target_lang: String,
}

impl DeepLTranslator {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            api_base_url: config.deepl_api_base_url.clone(),
            target_lang: config.deepl_target_lang.clone(),
        }
    }

    fn endpoint(&self, credential: &ApiKey) -> String {
        let base = match &self.api_base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None if credential.expose().ends_with(":fx") => {
                "https://api-free.deepl.com".to_string()
            }
            None => "https://api.deepl.com".to_string(),
        };
        format!("{}/v2/translate", base)
    }
}

impl Translate for DeepLTranslator {
    fn name(&self) -> &str {
        "DeepL"
    }

    async fn translate(&self, text: &str, credential: &ApiKey) -> Result<String> {
        let endpoint = self.endpoint(credential);
        debug!(
            "调用 DeepL API: {}，原文长度: {} 字符",
            endpoint,
            text.chars().count()
        );

        let request = TranslateRequest {
            text: vec![text],
            target_lang: &self.target_lang,
        };

        let response = self
            .client
            .post(&endpoint)
            .header(
                "Authorization",
                format!("DeepL-Auth-Key {}", credential.expose()),
            )
            .json(&request)
            .send()
            .await
            .context("DeepL 请求失败")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("{}", describe_failure(status, &body));
        }

        let parsed: TranslateResponse = response
            .json()
            .await
            .context("DeepL 响应解析失败")?;

        let translation = parsed
            .translations
            .into_iter()
            .next()
            .context("DeepL 返回结果为空")?;

        debug!("DeepL API 调用成功");

        Ok(translation.text)
    }
}

/// 把失败状态码翻成可读信息
fn describe_failure(status: StatusCode, body: &str) -> String {
    let reason = match status.as_u16() {
        403 => "Authorization failure, check auth_key",
        456 => "Quota for this billing period has been exceeded",
        429 => "Too many requests",
        400 => "Bad request",
        _ => "Request failed",
    };
    let body = body.trim();
    if body.is_empty() {
        format!("{} (HTTP {})", reason, status.as_u16())
    } else {
        format!("{} (HTTP {}): {}", reason, status.as_u16(), body)
    }
}
