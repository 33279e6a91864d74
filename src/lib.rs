//! # Markdown Relay Translator
//!
//! 借助本地大模型（Ollama）把整棵 Markdown 文档树从一种语言翻译为另一种语言，
//! 同时保留文档结构。
//!
//! ## 主要特性
//!
//! - **按结构分块**: 正文按一到三级标题分块，目录文档按字符预算分块
//! - **层级恢复**: 记录目录文档每个列表项的缩进，翻译后按原顺序恢复
//! - **有限重试**: 每块最多重试 10 次、间隔 2 秒，去除模型思考内容后为空也会重试
//! - **整篇成败**: 任意一块失败则整篇不写出，重新运行只会翻译失败的文件
//! - **锚点重写**: 按位置配对原文和译文标题，把 `[标签](#slug)` 改写为译文标题
//! - **配置灵活**: 支持TOML配置文件和程序化配置
//!
//! ## 快速开始
//!
//! ```rust,no_run
//! use markdown_relay_translator::{
//!     batch, DocumentKind, OllamaClient, TranslationLibConfig, TranslationService,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TranslationLibConfig::load_from_default_locations();
//!     let service = TranslationService::new(OllamaClient::new(&config.translation), &config)?;
//!
//!     let source = &config.paths.source_dir;
//!     let target = &config.paths.target_dir;
//!     let scan = batch::scan_pending(source, target)?;
//!     let summary =
//!         batch::translate_tree(&service, source, target, &scan.pending, DocumentKind::Prose).await;
//!     println!("成功 {} / {}", summary.succeeded, summary.total);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## 配置文件支持
//!
//! ```toml
//! [translation]
//! base_url = "http://localhost:11434"
//! model = "qwen3:32b"
//!
//! [retry]
//! max_attempts = 10
//! backoff_ms = 2000
//!
//! [paths]
//! source_dir = "en"
//! target_dir = "zh_nr"
//! relink_from = "zh_nr"
//! relink_to = "zh"
//! ```

pub mod batch;
pub mod chunker;
pub mod client;
pub mod config;
pub mod error;
pub mod fs_utils;
pub mod relink;
pub mod translator;
pub mod types;

pub use chunker::{chunk, ChunkedDocument};
pub use client::{Generator, OllamaClient};
pub use config::TranslationLibConfig;
pub use error::{Result, TranslationError};
pub use relink::{build_anchor_map, AnchorMap, Relinker};
pub use translator::{
    restore_levels, retry_with_backoff, ReasoningFilter, TranslatedDocument, TranslationService,
};
pub use types::{
    BatchSummary, ChunkingConfig, DocumentKind, PathConfig, PendingScan, PromptConfig,
    RelinkSummary, RetryConfig, TranslationConfig,
};
