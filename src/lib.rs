//! # Docs EN Translator
//!
//! 把中文 API 文档（Markdown / JSON）翻译成英文，生成并列的 `.en` 译本。
//!
//! ## 处理流程
//!
//! - **目录扫描**: 递归遍历配置的根目录，跳过已经是 `.en.md` / `.en.json` 的译本
//! - **分段**: 以 ```` ``` ```` 开头的行为边界，把文档切分为正文片段和代码块片段
//! - **翻译**: 每个片段单独发送给 chat completion 接口，固定系统指令，温度为 0
//! - **写入**: 译文按原顺序写入译本，每个片段之后追加一个换行
//!
//! 整个过程严格串行，任何错误都会中止当前文件，已写入的内容保留。
//!
//! ## 快速开始
//!
//! ```rust,no_run
//! use docs_en_translator::{walk_roots, ChatTranslator, TranslateOptions, TranslationLibConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = TranslationLibConfig::load_from_default_locations();
//!     config.apply_env()?;
//!
//!     let translator = ChatTranslator::new(config.translation.clone())?;
//!     let options = TranslateOptions::default();
//!
//!     for result in walk_roots(&translator, &config.walk.folders, &options).await {
//!         let report = result?;
//!         println!("{}: {} files", report.root.display(), report.files.len());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## 配置文件支持
//!
//! ```toml
//! [translation]
//! api_type = "openai"
//! api_base = "https://api.openai.com/v1"
//! model = "gpt-3.5-turbo"
//! temperature = 0.0
//! translate_code_blocks = true
//!
//! [walk]
//! folders = ["static/data/restapi"]
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod segmenter;
pub mod translator;
pub mod types;
pub mod walker;

pub use config::TranslationLibConfig;
pub use document::{translate_file, translate_stream, TranslateOptions};
pub use error::{Result, TranslationError};
pub use segmenter::{segment_text, FenceState, Segmenter};
pub use translator::{ChatTranslator, Translate};
pub use types::{
    ApiType, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, DocumentKind,
    FileReport, RootReport, Segment, SegmentKind, SegmentStats, TranslationConfig, WalkConfig,
};
pub use walker::{is_candidate, target_path, walk_root, walk_roots};
