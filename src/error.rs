//! 错误处理模块
//!
//! 定义翻译库中使用的错误类型和错误处理机制。
//!
//! 错误分为两类：
//!
//! * 可重试的瞬时错误（网络、超时、服务端错误、空响应），由重试机制吸收；
//! * 结构性错误（标题数量不一致、层级数量不一致），只终止当前文档，不重试。

use std::path::PathBuf;
use thiserror::Error;

/// 翻译错误类型
///
/// 包含翻译过程中可能出现的各种错误情况。
#[derive(Error, Debug)]
pub enum TranslationError {
    /// HTTP请求错误
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// 无法连接翻译服务
    #[error("连接失败: {0}")]
    Connection(String),

    /// 请求超时
    #[error("请求超时: {0}")]
    Timeout(String),

    /// 服务端返回错误
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP状态码
        status: u16,
        /// 错误消息
        message: String,
    },

    /// 去除思考内容后响应为空
    #[error("翻译服务返回了空的翻译结果")]
    EmptyResponse,

    /// 响应解析错误
    #[error("Parse error: {0}")]
    Parse(String),

    /// 文件读写错误
    #[error("文件操作失败 {path}: {source}")]
    Io {
        /// 出错的文件路径
        path: PathBuf,
        /// 底层IO错误
        #[source]
        source: std::io::Error,
    },

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 译文非空行数与记录的缩进层级数量不一致
    #[error("层级数量不一致: 记录了 {expected} 个层级, 译文有 {actual} 个非空行")]
    StructuralMismatch {
        /// 记录的层级数量
        expected: usize,
        /// 译文中的非空行数量
        actual: usize,
    },

    /// 原文与译文的标题数量不一致，无法按位置配对
    #[error("标题数量不一致 {path}: 原文 {source_count} 个, 译文 {target_count} 个")]
    HeadingCountMismatch {
        /// 译文路径
        path: PathBuf,
        /// 原文标题数量
        source_count: usize,
        /// 译文标题数量
        target_count: usize,
    },

    /// 路径中不包含需要替换的目录段
    #[error("路径 {path} 中没有目录段 `{segment}`")]
    PathSegmentMissing {
        /// 原路径
        path: PathBuf,
        /// 期望出现的目录段
        segment: String,
    },
}

impl TranslationError {
    /// 检查错误是否可重试
    pub fn is_retryable(&self) -> bool {
        match self {
            TranslationError::Http(_)
            | TranslationError::Connection(_)
            | TranslationError::Timeout(_)
            | TranslationError::Api { .. }
            | TranslationError::EmptyResponse
            | TranslationError::Parse(_) => true,
            TranslationError::Io { .. }
            | TranslationError::Config(_)
            | TranslationError::StructuralMismatch { .. }
            | TranslationError::HeadingCountMismatch { .. }
            | TranslationError::PathSegmentMissing { .. } => false,
        }
    }

    /// 构造带路径信息的IO错误
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TranslationError::Io {
            path: path.into(),
            source,
        }
    }
}

/// 翻译结果类型别名
///
/// 简化返回类型，使用 `TranslationError` 作为错误类型。
///
/// # 示例
///
/// ```rust
/// use markdown_relay_translator::{Result, TranslationError};
///
/// fn example_function() -> Result<String> {
///     Err(TranslationError::EmptyResponse)
/// }
///
/// assert!(example_function().unwrap_err().is_retryable());
/// ```
pub type Result<T> = std::result::Result<T, TranslationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_errors_are_retryable() {
        assert!(TranslationError::Connection("refused".into()).is_retryable());
        assert!(TranslationError::Timeout("60s".into()).is_retryable());
        assert!(TranslationError::EmptyResponse.is_retryable());
        assert!(TranslationError::Api { status: 500, message: "boom".into() }.is_retryable());
    }

    #[test]
    fn structural_errors_are_fatal() {
        let err = TranslationError::StructuralMismatch { expected: 3, actual: 2 };
        assert!(!err.is_retryable());
        assert!(err.to_string().contains('3'));

        let err = TranslationError::HeadingCountMismatch {
            path: PathBuf::from("zh_nr/index.md"),
            source_count: 3,
            target_count: 2,
        };
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("zh_nr/index.md"));
    }
}
