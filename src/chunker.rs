//! 文档分块模块
//!
//! 把一篇文档切分为按顺序翻译的文本块。
//!
//! * 正文文档遇到一到三级标题时开始新块，所有块按顺序拼接后与原文完全一致；
//! * 目录文档丢弃空行，按累计字符数切分，并记录每个列表行的缩进，
//!   以便翻译后恢复嵌套层级。

use crate::types::DocumentKind;

/// 不超过该字符数的文档整体翻译
pub const SINGLE_UNIT_THRESHOLD: usize = 4000;

/// 目录文档每块的累计字符预算
pub const NAVIGATION_BUDGET: usize = 1024;

/// 分块结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkedDocument {
    /// 按原文顺序排列的文本块
    pub chunks: Vec<String>,
    /// 目录文档中每个列表行的缩进空格数，正文文档为 `None`
    pub levels: Option<Vec<usize>>,
}

/// 使用默认字符预算分块
pub fn chunk(text: &str, kind: DocumentKind) -> ChunkedDocument {
    chunk_with_budget(text, kind, NAVIGATION_BUDGET)
}

/// 按文档类型分块，`budget` 只对目录文档生效
pub fn chunk_with_budget(text: &str, kind: DocumentKind, budget: usize) -> ChunkedDocument {
    match kind {
        DocumentKind::Prose => ChunkedDocument {
            chunks: split_by_headings(text),
            levels: None,
        },
        DocumentKind::Navigation => ChunkedDocument {
            chunks: split_navigation(text, budget),
            levels: Some(structural_levels(text)),
        },
    }
}

/// 文档字符数（按 Unicode 字符计）
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn is_chunk_heading(line: &str) -> bool {
    line.starts_with("# ") || line.starts_with("## ") || line.starts_with("### ")
}

/// 一到三级标题处切分；当前块非空时才开始新块
fn split_by_headings(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in text.split_inclusive('\n') {
        if is_chunk_heading(line) && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }
        current.push_str(line);
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    if chunks.is_empty() {
        chunks.push(String::new());
    }

    chunks
}

/// 记录每个非空列表行（首个非空格字符为 `-`）前的空格数
pub fn structural_levels(text: &str) -> Vec<usize> {
    text.split('\n')
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let indent = line.chars().take_while(|c| *c == ' ').count();
            line[indent..].starts_with('-').then_some(indent)
        })
        .collect()
}

/// 丢弃空行，累计字符数超过预算后在下一行之前切分
fn split_navigation(text: &str, budget: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut used = 0usize;

    for line in text.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
        if used > budget {
            chunks.push(join_lines(&current));
            current.clear();
            used = 0;
        }
        current.push(line);
        used += char_len(line);
    }

    if !current.is_empty() {
        chunks.push(join_lines(&current));
    }

    chunks
}

fn join_lines(lines: &[&str]) -> String {
    let mut joined = lines.join("\n");
    joined.push('\n');
    joined
}
