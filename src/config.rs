//! 配置管理模块
//!
//! 提供TOML配置文件的读取、写入和自动发现功能。

use crate::error::{Result, TranslationError};
use crate::types::{ChunkingConfig, PathConfig, PromptConfig, RetryConfig, TranslationConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// 翻译库配置结构
///
/// 包含所有翻译相关的配置选项，支持从TOML文件加载和保存。
/// 缺省的段落使用默认值。
///
/// # 示例
///
/// ```rust,no_run
/// use markdown_relay_translator::TranslationLibConfig;
///
/// // 从默认位置加载配置
/// let config = TranslationLibConfig::load_from_default_locations();
///
/// // 从指定文件加载配置
/// let config = TranslationLibConfig::from_file("config.toml").unwrap();
///
/// // 保存配置到文件
/// config.save_to_file("output.toml").unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslationLibConfig {
    /// 翻译服务配置
    #[serde(default)]
    pub translation: TranslationConfig,
    /// 重试配置
    #[serde(default)]
    pub retry: RetryConfig,
    /// 分块配置
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// 提示词模板
    #[serde(default)]
    pub prompts: PromptConfig,
    /// 目录配置
    #[serde(default)]
    pub paths: PathConfig,
}

impl TranslationLibConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| TranslationError::io(path, e))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TranslationLibConfig =
            toml::from_str(content).map_err(|e| TranslationError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content =
            toml::to_string_pretty(self).map_err(|e| TranslationError::Config(e.to_string()))?;
        fs::write(path, content).map_err(|e| TranslationError::io(path, e))
    }

    /// Load configuration from multiple possible locations
    pub fn load_from_default_locations() -> Self {
        let possible_paths = [
            "translation-config.toml",
            "config.toml",
            ".translation-config.toml",
        ];

        for path in &possible_paths {
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

    fn validate(&self) -> Result<()> {
        if self.retry.max_attempts == 0 {
            return Err(TranslationError::Config("retry.max_attempts 必须大于 0".into()));
        }
        if self.translation.reasoning_start.is_empty() || self.translation.reasoning_end.is_empty() {
            return Err(TranslationError::Config("思考内容标记不能为空".into()));
        }
        if !self.prompts.prose.contains("{text}") || !self.prompts.navigation.contains("{text}") {
            return Err(TranslationError::Config("提示词模板必须包含 {text} 占位符".into()));
        }
        if self.paths.relink_from.is_empty() || self.paths.relink_from == self.paths.relink_to {
            return Err(TranslationError::Config(
                "paths.relink_from 不能为空且必须与 relink_to 不同".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let config = TranslationLibConfig::from_toml_str(
            r#"
            [translation]
            model = "qwen3:8b"

            [retry]
            backoff_ms = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.translation.model, "qwen3:8b");
        assert_eq!(config.translation.base_url, "http://localhost:11434");
        assert_eq!(config.retry.max_attempts, 10);
        assert_eq!(config.retry.backoff_ms, 10);
        assert_eq!(config.chunking.single_unit_threshold, 4000);
        assert_eq!(config.chunking.navigation_budget, 1024);
        assert_eq!(config.paths.relink_to, "zh");
    }

    #[test]
    fn rejects_template_without_placeholder() {
        let err = TranslationLibConfig::from_toml_str(
            r#"
            [prompts]
            prose = "translate this"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, TranslationError::Config(_)));
    }

    #[test]
    fn example_config_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("translation-config.toml");
        TranslationLibConfig::generate_example_config(&path).unwrap();

        let loaded = TranslationLibConfig::from_file(&path).unwrap();
        assert_eq!(loaded.retry.max_attempts, 10);
        assert!(loaded.prompts.navigation.contains("{text}"));
    }
}
