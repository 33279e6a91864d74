//! 翻译服务核心模块
//!
//! 逐块驱动外部生成服务完成翻译：固定间隔的有限次重试、去除模型思考内容、
//! 按原顺序拼接译文，以及目录文档的缩进恢复。
//! 任何一块最终失败时整篇文档放弃，不产生部分译文。

use crate::chunker::{self, char_len};
use crate::client::Generator;
use crate::config::TranslationLibConfig;
use crate::error::{Result, TranslationError};
use crate::types::{ChunkingConfig, DocumentKind, PromptConfig, RetryConfig};
use regex::Regex;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// 固定间隔的有限次重试
///
/// 可重试错误（见 [`TranslationError::is_retryable`]）在等待 `backoff_ms` 后重新执行，
/// 最后一次失败后不再等待；不可重试的错误立即返回。
///
/// # 返回
///
/// * `Ok(T)` - 某一次尝试成功的结果
/// * `Err(TranslationError)` - 不可重试的错误，或最后一次尝试的错误
pub async fn retry_with_backoff<F, Fut, T>(mut operation: F, config: &RetryConfig) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let attempts = config.max_attempts.max(1);
    let mut last_error = None;

    for attempt in 1..=attempts {
        debug!("    尝试翻译... (第 {} 次)", attempt);

        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if !e.is_retryable() => return Err(e),
            Err(e) => {
                warn!("    第 {}/{} 次尝试失败: {}", attempt, attempts, e);
                if attempt < attempts {
                    sleep(Duration::from_millis(config.backoff_ms)).await;
                }
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or(TranslationError::EmptyResponse))
}

/// 去除模型输出中的思考内容
///
/// 删除第一段由起止标记包围的内容（非贪婪，可跨行），其余文本保持不变。
///
/// ```rust
/// use markdown_relay_translator::ReasoningFilter;
///
/// let filter = ReasoningFilter::new("<think>", "</think>").unwrap();
/// let raw = "<think>\nlet me see\n</think>\n\n# 执行器\n";
/// assert_eq!(filter.strip(raw), "\n\n# 执行器\n");
/// ```
#[derive(Debug, Clone)]
pub struct ReasoningFilter {
    pattern: Regex,
}

impl ReasoningFilter {
    pub fn new(start: &str, end: &str) -> Result<Self> {
        let pattern = format!("(?s){}.*?{}", regex::escape(start), regex::escape(end));
        let pattern = Regex::new(&pattern).map_err(|e| TranslationError::Config(e.to_string()))?;
        Ok(Self { pattern })
    }

    pub fn strip(&self, text: &str) -> String {
        self.pattern.replacen(text, 1, "").into_owned()
    }
}

/// 按记录的层级重新缩进译文
///
/// 第 i 个非空行得到第 i 个层级的空格缩进，行数不一致时返回
/// [`TranslationError::StructuralMismatch`]。
pub fn restore_levels(translated: &str, levels: &[usize]) -> Result<String> {
    let lines: Vec<&str> = translated
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.len() != levels.len() {
        return Err(TranslationError::StructuralMismatch {
            expected: levels.len(),
            actual: lines.len(),
        });
    }

    let mut restored = String::with_capacity(translated.len() + levels.iter().sum::<usize>());
    for (line, level) in lines.iter().zip(levels) {
        restored.extend(std::iter::repeat(' ').take(*level));
        restored.push_str(line);
        restored.push('\n');
    }
    Ok(restored)
}

/// 一篇文档的完整译文，目录文档附带原文的缩进层级
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedDocument {
    pub text: String,
    pub levels: Option<Vec<usize>>,
}

impl TranslatedDocument {
    /// 得到可写入文件的最终文本，目录文档在此恢复缩进
    pub fn finish(self) -> Result<String> {
        match self.levels {
            Some(levels) => restore_levels(&self.text, &levels),
            None => Ok(self.text),
        }
    }
}

/// 翻译服务主类
///
/// 持有生成服务和全部配置；同一时刻只有一个请求在进行，文档和文本块都严格按顺序处理。
///
/// # 示例
///
/// ```rust,no_run
/// use markdown_relay_translator::{
///     DocumentKind, OllamaClient, TranslationLibConfig, TranslationService,
/// };
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = TranslationLibConfig::default();
///     let service = TranslationService::new(OllamaClient::new(&config.translation), &config)?;
///
///     match service.translate("# Actuators\n", DocumentKind::Prose).await? {
///         Some(text) => println!("{}", text),
///         None => eprintln!("翻译失败"),
///     }
///     Ok(())
/// }
/// ```
pub struct TranslationService<G> {
    generator: G,
    retry: RetryConfig,
    chunking: ChunkingConfig,
    prompts: PromptConfig,
    reasoning: ReasoningFilter,
}

impl<G: Generator> TranslationService<G> {
    /// 创建新的翻译服务实例
    pub fn new(generator: G, config: &TranslationLibConfig) -> Result<Self> {
        Ok(Self {
            generator,
            retry: config.retry.clone(),
            chunking: config.chunking.clone(),
            prompts: config.prompts.clone(),
            reasoning: ReasoningFilter::new(
                &config.translation.reasoning_start,
                &config.translation.reasoning_end,
            )?,
        })
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// 翻译单个文本块
    ///
    /// 所有尝试都失败时返回 `None`，不向上抛出错误。
    pub async fn translate_unit(&self, text: &str, kind: DocumentKind) -> Option<String> {
        let prompt = self.prompts.render(kind, text);
        let prompt = prompt.as_str();
        let generator = &self.generator;
        let reasoning = &self.reasoning;

        let result = retry_with_backoff(
            move || async move {
                let raw = generator.generate(prompt).await?;
                let cleaned = reasoning.strip(&raw);
                if cleaned.trim().is_empty() {
                    Err(TranslationError::EmptyResponse)
                } else {
                    Ok(cleaned)
                }
            },
            &self.retry,
        )
        .await;

        match result {
            Ok(translated) => {
                debug!("    翻译成功");
                Some(translated)
            }
            Err(e) => {
                error!("    翻译失败，已达到最大重试次数 ({}): {}", self.retry.max_attempts, e);
                None
            }
        }
    }

    /// 翻译整篇文档
    ///
    /// 短文档整体翻译；长文档先分块，再按原顺序逐块翻译，任意一块失败立即放弃并返回 `None`。
    pub async fn translate_document(
        &self,
        text: &str,
        kind: DocumentKind,
    ) -> Option<TranslatedDocument> {
        let length = char_len(text);

        if length <= self.chunking.single_unit_threshold {
            info!("  文件较短({}字符)，直接翻译", length);
            let levels = match kind {
                DocumentKind::Navigation => Some(chunker::structural_levels(text)),
                DocumentKind::Prose => None,
            };
            let translated = self.translate_unit(text, kind).await?;
            return Some(TranslatedDocument { text: translated, levels });
        }

        info!("  文件较长({}字符)，进行分段翻译", length);
        let chunked = chunker::chunk_with_budget(text, kind, self.chunking.navigation_budget);
        let total = chunked.chunks.len();
        info!("  分割为 {} 段", total);

        let mut translated = String::with_capacity(text.len());
        for (i, chunk) in chunked.chunks.iter().enumerate() {
            info!("  翻译第 {}/{} 段 ({}字符)", i + 1, total, char_len(chunk));
            match self.translate_unit(chunk, kind).await {
                Some(part) => translated.push_str(&part),
                None => {
                    error!("  第 {} 段翻译失败，放弃整篇文档", i + 1);
                    return None;
                }
            }
        }

        info!("  分段翻译完成，总长度: {}字符", char_len(&translated));
        Some(TranslatedDocument {
            text: translated,
            levels: chunked.levels,
        })
    }

    /// 翻译文档并恢复目录层级，得到最终文本
    ///
    /// * `Ok(Some(text))` - 翻译成功
    /// * `Ok(None)` - 某一块重试耗尽，文档翻译失败
    /// * `Err(StructuralMismatch)` - 译文行数与目录层级数量不一致
    pub async fn translate(&self, text: &str, kind: DocumentKind) -> Result<Option<String>> {
        match self.translate_document(text, kind).await {
            Some(document) => document.finish().map(Some),
            None => Ok(None),
        }
    }
}
