//! 目录树批量处理
//!
//! 翻译前检查原文目录与译文目录，找出需要（重新）翻译的文件；
//! 逐个翻译并统计成败；翻译完成后对整棵译文树重写锚点链接。
//! 单个文件的任何失败都只影响该文件，不会中断整个批次。

use crate::chunker::char_len;
use crate::client::Generator;
use crate::error::{Result, TranslationError};
use crate::fs_utils;
use crate::relink::Relinker;
use crate::translator::TranslationService;
use crate::types::{BatchSummary, DocumentKind, PendingScan, RelinkSummary};
use std::path::Path;
use tracing::{error, info, warn};

/// 列出超过阈值的原文文件（相对路径, 字符数），按大小降序
pub fn find_large_files(source: &Path, threshold: usize) -> Result<Vec<(String, usize)>> {
    info!("检查大文件 (>{}字符)...", threshold);

    let mut large = Vec::new();
    for path in fs_utils::markdown_files(source)? {
        match fs_utils::read_to_string(&path) {
            Ok(content) => {
                let length = char_len(&content);
                if length > threshold {
                    large.push((fs_utils::relative_key(&path, source), length));
                }
            }
            Err(e) => warn!("读取文件出错: {}", e),
        }
    }
    large.sort_by(|a, b| b.1.cmp(&a.1));

    if large.is_empty() {
        info!("未发现大文件");
    } else {
        info!("发现 {} 个大文件 (>{}字符):", large.len(), threshold);
        for (key, length) in large.iter().take(5) {
            info!("  - {}: {} 字符", key, length);
        }
        if large.len() > 5 {
            info!("  ... 还有 {} 个大文件", large.len() - 5);
        }
        info!("这些文件将进行分段翻译");
    }

    Ok(large)
}

/// 对比原文和译文目录，决定哪些文件需要翻译
///
/// 译文不存在或内容为空的文件需要翻译；已有非空译文的文件跳过。
pub fn scan_pending(source: &Path, target: &Path) -> Result<PendingScan> {
    info!("正在检查文件状态...");

    let files = fs_utils::markdown_files(source)?;
    info!("找到 {} 个源文件", files.len());

    let mut scan = PendingScan::default();
    for path in &files {
        let key = fs_utils::relative_key(path, source);
        let target_path = target.join(&key);

        if !target_path.exists() {
            scan.pending.push(key);
            continue;
        }
        match fs_utils::has_content(&target_path) {
            Ok(true) => scan.translated.push(key),
            Ok(false) => {
                scan.empty.push(key.clone());
                scan.pending.push(key);
            }
            Err(e) => {
                warn!("  读取译文出错，将重新翻译: {}", e);
                scan.pending.push(key);
            }
        }
    }

    info!("文件检查结果:");
    info!("总源文件: {}", files.len());
    info!("需要翻译: {}", scan.pending.len());
    info!("已翻译(跳过): {}", scan.translated.len());
    info!("空文件(重新翻译): {}", scan.empty.len());

    if scan.pending.len() <= 5 {
        for key in &scan.pending {
            info!("  - {}", key);
        }
    } else {
        for key in scan.pending.iter().take(3) {
            info!("  - {}", key);
        }
        info!("  ... 还有 {} 个文件", scan.pending.len() - 3);
    }

    Ok(scan)
}

/// 翻译单个文件，成功时整体写入译文并返回 `true`
///
/// 重试耗尽返回 `Ok(false)`，不写文件；读写失败和结构性错误返回 `Err`。
pub async fn translate_file<G: Generator>(
    service: &TranslationService<G>,
    source_path: &Path,
    target_path: &Path,
    kind: DocumentKind,
) -> Result<bool> {
    let content = fs_utils::read_to_string(source_path)?;
    info!("  文件大小: {} 字符", char_len(&content));

    match service.translate(&content, kind).await? {
        Some(translated) if !translated.trim().is_empty() => {
            fs_utils::write_atomic(target_path, &translated)?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// 按顺序翻译给定的文件（相对原文目录的键）
pub async fn translate_tree<G: Generator>(
    service: &TranslationService<G>,
    source: &Path,
    target: &Path,
    files: &[String],
    kind: DocumentKind,
) -> BatchSummary {
    let mut summary = BatchSummary {
        total: files.len(),
        ..BatchSummary::default()
    };
    info!("开始翻译 {} 个文件...", summary.total);

    for (index, key) in files.iter().enumerate() {
        let source_path = source.join(key);
        let target_path = target.join(key);
        info!("处理文件 [{}/{}]: {}", index + 1, summary.total, key);

        match translate_file(service, &source_path, &target_path, kind).await {
            Ok(true) => {
                summary.succeeded += 1;
                info!("  ✓ 翻译成功并保存: {}", target_path.display());
            }
            Ok(false) => {
                summary.failed += 1;
                error!("  ✗ 翻译失败，跳过创建文件: {}", key);
            }
            Err(e) => {
                summary.failed += 1;
                error!("  ✗ 处理文件时出错: {}", e);
                error!("  跳过创建文件: {}", key);
            }
        }
    }

    info!("翻译完成!");
    info!("待翻译文件: {}", summary.total);
    info!("成功翻译: {}", summary.succeeded);
    info!("失败跳过: {}", summary.failed);
    info!("成功率: {:.1}%", summary.success_rate());

    summary
}

/// 对译文目录中的每个文件重写锚点链接，写入替换目录段后的新目录
///
/// 原文与译文按相对路径配对。标题数量不一致的文件不写出，记录在 `mismatched` 中。
pub fn relink_tree(relinker: &Relinker, source: &Path, target: &Path) -> Result<RelinkSummary> {
    let output_root = relinker.relinked_path(target)?;
    let files = fs_utils::markdown_files(target)?;
    let mut summary = RelinkSummary {
        total: files.len(),
        ..RelinkSummary::default()
    };
    info!(
        "开始重写 {} 个文件的锚点链接, 输出目录: {}",
        summary.total,
        output_root.display()
    );

    for translated_path in &files {
        let key = fs_utils::relative_key(translated_path, target);
        let source_path = source.join(&key);
        if !source_path.exists() {
            warn!("  没有对应的原文，跳过: {}", key);
            summary.skipped += 1;
            continue;
        }

        let output = output_root.join(&key);
        match relinker.relink_file_into(&source_path, translated_path, &output) {
            Ok(()) => {
                summary.relinked += 1;
                info!("  ✓ {}", output.display());
            }
            Err(TranslationError::HeadingCountMismatch { path, source_count, target_count }) => {
                error!(
                    "  ✗ 标题数量不一致 {}: 原文 {} 个, 译文 {} 个",
                    path.display(),
                    source_count,
                    target_count
                );
                summary.mismatched.push(path);
            }
            Err(e) => {
                summary.failed += 1;
                error!("  ✗ 重写链接时出错: {}", e);
            }
        }
    }

    info!(
        "链接重写完成: 成功 {}, 跳过 {}, 标题不一致 {}, 失败 {}",
        summary.relinked,
        summary.skipped,
        summary.mismatched.len(),
        summary.failed
    );
    Ok(summary)
}
