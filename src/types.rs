//! 类型定义模块
//!
//! 定义翻译工具中使用的数据结构、配置类型以及 chat completion 接口的请求/响应格式。

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 默认系统指令
///
/// 每次请求都会原样发送，不保留任何会话上下文。
pub const DEFAULT_SYSTEM_PROMPT: &str = "You're an AI Assistant. You will be provided Open API documents in Chinese, \
you need to translate them into English. Please \
1) don't explain the meaning of the document; \
2) don't fix the syntax issue and just treat the document as plain text; \
3) When you encounter <DataRender> tag, change its path attribute's suffix from .json to .en.json, \
i.e. <DataRender path=\"xxx.json\" /> to <DataRender path=\"xxx.en.json\" />";

/// 代码块围栏标记
pub const FENCE_MARKER: &str = "```";

/// 待翻译文档类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Markdown,
    Json,
}

impl DocumentKind {
    /// 源文件扩展名（含点）
    pub fn extension(self) -> &'static str {
        match self {
            DocumentKind::Markdown => ".md",
            DocumentKind::Json => ".json",
        }
    }

    /// 英文译本的后缀，例如 `.en.md`
    pub fn localized_suffix(self) -> &'static str {
        match self {
            DocumentKind::Markdown => ".en.md",
            DocumentKind::Json => ".en.json",
        }
    }

    /// 判断路径是否为需要翻译的源文件
    ///
    /// 已经带有 `.en` 后缀的译本返回 `None`，重复运行时不会被当成新的输入。
    pub fn detect(path: &Path) -> Option<Self> {
        let name = path.to_str()?;
        [DocumentKind::Markdown, DocumentKind::Json]
            .into_iter()
            .find(|kind| {
                name.ends_with(kind.extension()) && !name.ends_with(kind.localized_suffix())
            })
    }
}

/// 片段类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// 围栏之间的正文
    Prose,
    /// 从起始围栏到结束围栏（含）的代码块
    Code,
}

/// 文档片段
///
/// `content` 中每一行都以 `\n` 结尾。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub content: String,
    pub kind: SegmentKind,
}

impl Segment {
    pub fn is_code_block(&self) -> bool {
        self.kind == SegmentKind::Code
    }
}

/// 翻译服务的接口风格
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiType {
    /// `{base}/chat/completions`，Bearer 认证
    #[default]
    OpenAi,
    /// `{base}/openai/deployments/{deployment}/chat/completions`，`api-key` 头认证
    Azure,
}

impl std::str::FromStr for ApiType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" | "open_ai" => Ok(ApiType::OpenAi),
            "azure" | "azure_ad" => Ok(ApiType::Azure),
            other => Err(format!("unknown api type `{}`", other)),
        }
    }
}

/// 翻译配置
///
/// 包含翻译服务的所有配置选项。
///
/// # 字段说明
///
/// * `api_type` - 接口风格，OpenAI 或 Azure
/// * `api_base` - 服务地址
/// * `api_key` - 访问密钥，通常从环境变量 `OPENAI_API_KEY` 读取
/// * `api_version` - Azure 接口的 `api-version` 参数
/// * `model` - 模型名称
/// * `temperature` - 采样温度，默认 0 以保证结果可复现
/// * `system_prompt` - 系统指令
/// * `translate_code_blocks` - 代码块是否也发送给翻译服务
/// * `request_timeout_secs` - 请求超时，未设置时使用 HTTP 客户端默认值
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub api_type: ApiType,
    pub api_base: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub api_version: String,
    pub model: String,
    pub temperature: f32,
    pub system_prompt: String,
    pub translate_code_blocks: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            api_type: ApiType::OpenAi,
            api_base: "https://api.openai.com/v1".to_string(),
            api_key: None,
            api_version: "2023-05-15".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.0,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            translate_code_blocks: true,
            request_timeout_secs: None,
        }
    }
}

/// 目录扫描配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    /// 需要扫描的根目录，按顺序处理
    pub folders: Vec<PathBuf>,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            folders: vec![PathBuf::from("static/data/restapi")],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

/// 片段计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentStats {
    pub segments: usize,
    pub prose_segments: usize,
    pub code_segments: usize,
}

impl SegmentStats {
    pub fn record(&mut self, kind: SegmentKind) {
        self.segments += 1;
        match kind {
            SegmentKind::Prose => self.prose_segments += 1,
            SegmentKind::Code => self.code_segments += 1,
        }
    }
}

/// 单个文件的翻译结果统计
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub source: PathBuf,
    pub target: PathBuf,
    pub stats: SegmentStats,
}

/// 单个根目录的处理结果
#[derive(Debug, Clone, Default)]
pub struct RootReport {
    pub root: PathBuf,
    pub files: Vec<FileReport>,
}

impl RootReport {
    pub fn segments(&self) -> usize {
        self.files.iter().map(|f| f.stats.segments).sum()
    }
}
