//! 翻译服务核心模块
//!
//! 通过 chat completion 接口翻译单个片段。每次调用只包含一条系统指令和一条用户消息，
//! 调用之间不共享任何会话状态。

use crate::error::{Result, TranslationError};
use crate::types::{
    ApiType, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, TranslationConfig,
};
use reqwest::{Client, StatusCode};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// 翻译接口
///
/// 文档处理流程只依赖这个 trait，翻译客户端作为参数显式传入。
pub trait Translate {
    /// 翻译一段文本，返回服务给出的译文
    fn translate(&self, text: &str) -> impl Future<Output = Result<String>> + Send;
}

/// 基于 chat completion 接口的翻译客户端
///
/// # 示例
///
/// ```rust,no_run
/// use docs_en_translator::{ChatTranslator, Translate, TranslationConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = TranslationConfig {
///         api_key: Some("sk-...".to_string()),
///         ..TranslationConfig::default()
///     };
///     let translator = ChatTranslator::new(config)?;
///
///     let result = translator.translate("# 接口说明\n").await?;
///     println!("{}", result);
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct ChatTranslator {
    client: Client,
    api_key: String,
    endpoint: String,
    config: TranslationConfig,
}

impl ChatTranslator {
    /// 创建翻译客户端
    ///
    /// 缺少 API 密钥时返回 `TranslationError::Config`。
    pub fn new(config: TranslationConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| TranslationError::Config("OPENAI_API_KEY is not set".to_string()))?;

        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self::with_client(config, api_key, client))
    }

    /// 使用现成的 HTTP 客户端
    pub(crate) fn with_client(config: TranslationConfig, api_key: String, client: Client) -> Self {
        Self {
            client,
            api_key,
            endpoint: completion_endpoint(&config),
            config,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn config(&self) -> &TranslationConfig {
        &self.config
    }

    async fn request_completion(&self, text: &str) -> Result<String> {
        let request = build_request(&self.config, text);
        debug!(endpoint = %self.endpoint, chars = text.len(), "sending completion request");

        let builder = self.client.post(&self.endpoint).json(&request);
        let builder = match self.config.api_type {
            ApiType::OpenAi => builder.bearer_auth(&self.api_key),
            ApiType::Azure => builder.header("api-key", &self.api_key),
        };
        let response = builder.send().await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(%status, "completion response received");

        if !status.is_success() {
            return Err(api_error(status, &body));
        }
        extract_content(&body)
    }
}

impl Translate for ChatTranslator {
    fn translate(&self, text: &str) -> impl Future<Output = Result<String>> + Send {
        self.request_completion(text)
    }
}

/// 构造请求体：固定的系统指令加上原样的片段文本
pub fn build_request(config: &TranslationConfig, text: &str) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: config.model.clone(),
        messages: vec![
            ChatMessage::system(config.system_prompt.clone()),
            ChatMessage::user(text),
        ],
        temperature: config.temperature,
    }
}

/// 根据接口风格计算请求地址
pub fn completion_endpoint(config: &TranslationConfig) -> String {
    let base = config.api_base.trim_end_matches('/');
    match config.api_type {
        ApiType::OpenAi => format!("{}/chat/completions", base),
        ApiType::Azure => format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            base,
            azure_deployment(&config.model),
            config.api_version
        ),
    }
}

/// Azure 部署名：去掉模型名中的 `.` 和 `:`，例如 `gpt-3.5-turbo` -> `gpt-35-turbo`
pub fn azure_deployment(model: &str) -> String {
    model.chars().filter(|c| !matches!(c, '.' | ':')).collect()
}

/// 取第一个候选结果的内容，不做任何裁剪
pub fn extract_content(body: &str) -> Result<String> {
    let response: ChatCompletionResponse = serde_json::from_str(body)?;
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or(TranslationError::EmptyResponse)
}

fn api_error(status: StatusCode, body: &str) -> TranslationError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .or_else(|| v.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            match trimmed.char_indices().nth(400) {
                Some((idx, _)) => format!("{}...", &trimmed[..idx]),
                None => trimmed.to_string(),
            }
        });

    TranslationError::Api { status: status.as_u16(), message }
}
