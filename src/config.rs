//! 配置管理模块
//!
//! 提供TOML配置文件的读取、写入和自动发现功能，以及环境变量覆盖。

use crate::error::{Result, TranslationError};
use crate::types::{TranslationConfig, WalkConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// 配置文件的默认查找位置
pub const DEFAULT_CONFIG_LOCATIONS: [&str; 3] = [
    "docs-translator.toml",
    "translation-config.toml",
    "config.toml",
];

/// 翻译工具配置结构
///
/// # 示例
///
/// ```toml
/// [translation]
/// api_type = "azure"
/// api_base = "https://example.openai.azure.com"
/// model = "gpt-3.5-turbo"
/// temperature = 0.0
///
/// [walk]
/// folders = ["docs/restapi", "static/data/restapi"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslationLibConfig {
    /// 翻译配置
    #[serde(default)]
    pub translation: TranslationConfig,
    /// 目录扫描配置
    #[serde(default)]
    pub walk: WalkConfig,
}

impl TranslationLibConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| TranslationError::io(path, e))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| TranslationError::io(path, e))?;
        Ok(())
    }

    /// Load configuration from multiple possible locations
    pub fn load_from_default_locations() -> Self {
        for path in &DEFAULT_CONFIG_LOCATIONS {
            if Path::new(path).exists() {
                match Self::from_file(path) {
                    Ok(config) => {
                        info!("Loaded configuration from: {}", path);
                        return config;
                    }
                    Err(e) => {
                        warn!("Failed to load config from {}: {}", path, e);
                    }
                }
            }
        }

        info!("No configuration file found, using defaults");
        Self::default()
    }

    /// Generate example configuration file
    pub fn generate_example_config<P: AsRef<Path>>(path: P) -> Result<()> {
        Self::default().save_to_file(path)
    }

    /// 用进程环境变量覆盖配置
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// 用给定的查找函数覆盖配置
    ///
    /// 支持 `OPENAI_API_KEY`、`OPENAI_BASE_URL`、`OPENAI_API_TYPE`、
    /// `OPENAI_API_VERSION` 和 `OPENAI_MODEL`，空值视为未设置。
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let t = &mut self.translation;

        if let Some(key) = get("OPENAI_API_KEY") {
            t.api_key = Some(key);
        }
        if let Some(base) = get("OPENAI_BASE_URL") {
            t.api_base = base;
        }
        if let Some(api_type) = get("OPENAI_API_TYPE") {
            t.api_type = api_type.parse().map_err(TranslationError::Config)?;
        }
        if let Some(version) = get("OPENAI_API_VERSION") {
            t.api_version = version;
        }
        if let Some(model) = get("OPENAI_MODEL") {
            t.model = model;
        }
        Ok(())
    }
}
