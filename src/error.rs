//! 错误处理模块
//!
//! 定义翻译工具中使用的错误类型。所有错误都原样向上传递，不做重试。

use std::path::PathBuf;
use thiserror::Error;

/// 翻译错误类型
///
/// # 变体说明
///
/// * `Io` - 读写源文件或译本失败
/// * `Http` - HTTP请求错误
/// * `Api` - 服务返回非 2xx 状态
/// * `EmptyResponse` - 响应中没有任何候选结果
/// * `Parse` - 响应体无法解析
/// * `Config` - 配置错误，例如缺少密钥
#[derive(Error, Debug)]
pub enum TranslationError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("completion response contained no choices")]
    EmptyResponse,

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

impl TranslationError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TranslationError::Io { path: path.into(), source }
    }
}

impl From<String> for TranslationError {
    fn from(error: String) -> Self {
        TranslationError::Config(error)
    }
}

impl From<&str> for TranslationError {
    fn from(error: &str) -> Self {
        TranslationError::Config(error.to_string())
    }
}

/// 翻译结果类型别名
///
/// # 示例
///
/// ```rust
/// use docs_en_translator::{Result, TranslationError};
///
/// fn example_function() -> Result<String> {
///     Err(TranslationError::EmptyResponse)
/// }
///
/// assert!(example_function().is_err());
/// ```
pub type Result<T> = std::result::Result<T, TranslationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_mentions_path() {
        let err = TranslationError::io(
            "docs/a.md",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        let msg = err.to_string();
        assert!(msg.contains("docs/a.md"));
        assert!(msg.contains("missing"));
    }

    #[test]
    fn api_error_display() {
        let err = TranslationError::Api { status: 429, message: "rate limited".into() };
        assert_eq!(err.to_string(), "API error 429: rate limited");
    }
}
