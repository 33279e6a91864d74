//! 类型定义模块
//!
//! 定义翻译库中使用的所有数据结构和配置类型。

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 文档类型，决定分块策略和提示词
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// 普通正文文档，按标题分块
    Prose,
    /// 目录文档（如 SUMMARY.md），按字符预算分块并记录列表缩进
    Navigation,
}

impl DocumentKind {
    /// 由命令行的目录开关得到文档类型
    pub fn from_navigation_flag(navigation: bool) -> Self {
        if navigation {
            DocumentKind::Navigation
        } else {
            DocumentKind::Prose
        }
    }
}

/// 翻译服务配置
///
/// # 字段说明
///
/// * `base_url` - Ollama 服务地址
/// * `model` - 使用的模型名称
/// * `request_timeout_secs` - 单次请求超时时间
/// * `reasoning_start` / `reasoning_end` - 模型思考内容的起止标记
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// Ollama 服务地址
    pub base_url: String,
    /// 模型名称
    pub model: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 思考内容起始标记
    pub reasoning_start: String,
    /// 思考内容结束标记
    pub reasoning_end: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "qwen3:32b".to_string(),
            request_timeout_secs: 600,
            reasoning_start: "<think>".to_string(),
            reasoning_end: "</think>".to_string(),
        }
    }
}

/// 重试配置：固定次数、固定间隔
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: usize,
    pub backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            backoff_ms: 2000,
        }
    }
}

/// 分块配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// 不超过该字符数的文档整体翻译，不分块
    pub single_unit_threshold: usize,
    /// 目录文档每块累计字符数上限
    pub navigation_budget: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            single_unit_threshold: crate::chunker::SINGLE_UNIT_THRESHOLD,
            navigation_budget: crate::chunker::NAVIGATION_BUDGET,
        }
    }
}

/// 提示词模板，`{text}` 会被替换为待翻译内容
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    pub prose: String,
    pub navigation: String,
}

impl PromptConfig {
    /// 按文档类型选择模板并填入原文
    pub fn render(&self, kind: DocumentKind, text: &str) -> String {
        let template = match kind {
            DocumentKind::Prose => &self.prose,
            DocumentKind::Navigation => &self.navigation,
        };
        template.replace("{text}", text)
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            prose: DEFAULT_PROSE_PROMPT.to_string(),
            navigation: DEFAULT_NAVIGATION_PROMPT.to_string(),
        }
    }
}

const DEFAULT_PROSE_PROMPT: &str = "下面是一段英文技术文档，请把它翻译成准确、通顺的中文。
要求:
1. 按原文的 Markdown 格式输出译文，不要输出任何解释或原文中没有的内容。
2. 中括号里的英文同样需要翻译。
3. 保留所有链接地址、代码、警告标记（如 WARNING）原样不动。
4. 专有名词和无法准确翻译的词保留英文。
5. 不要用 ```markdown ``` 包裹输出。

原文：
{text}
";

const DEFAULT_NAVIGATION_PROMPT: &str = "下面是一份英文文档的目录，请只把中括号里的标题翻译成中文。
要求:
1. 每一行对应输出一行，不要合并或拆分行，不要输出任何解释。
2. 圆括号里的链接地址保持不变。
3. 使用行业内通用的术语，无法准确翻译的词保留英文。
4. 不要用 ```markdown ``` 包裹输出。

示例输入：
- [Multicopters](frames_multicopter/index.md)
- [Flight Modes](flight_modes_mc/index.md)

示例输出：
- [多旋翼](frames_multicopter/index.md)
- [飞行模式](flight_modes_mc/index.md)

原文：
{text}
";

/// 目录树配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// 原文目录
    pub source_dir: PathBuf,
    /// 译文目录
    pub target_dir: PathBuf,
    /// 重写链接时，译文路径中被替换的目录段
    pub relink_from: String,
    /// 替换后的目录段
    pub relink_to: String,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("en"),
            target_dir: PathBuf::from("zh_nr"),
            relink_from: "zh_nr".to_string(),
            relink_to: "zh".to_string(),
        }
    }
}

/// Ollama 对话消息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub message: ChatMessage,
}

/// 一次批量翻译的统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    /// 成功率（百分比），没有文件时为 0
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.succeeded as f64 / self.total as f64 * 100.0
        }
    }
}

/// 一次链接重写的统计
#[derive(Debug, Clone, Default)]
pub struct RelinkSummary {
    pub total: usize,
    pub relinked: usize,
    /// 没有对应原文的译文
    pub skipped: usize,
    /// 读写失败
    pub failed: usize,
    /// 标题数量不一致的译文路径
    pub mismatched: Vec<PathBuf>,
}

/// 翻译前的目录检查结果，路径均为相对原文目录的键
#[derive(Debug, Clone, Default)]
pub struct PendingScan {
    /// 需要翻译的文件（包含 `empty` 中的文件）
    pub pending: Vec<String>,
    /// 已有非空译文，跳过
    pub translated: Vec<String>,
    /// 译文存在但为空，需要重新翻译
    pub empty: Vec<String>,
}
