//! 锚点链接重写模块
//!
//! 翻译后标题文本变成了目标语言，文档内 `[标签](#slug)` 形式的链接随之失效。
//! 本模块按位置把原文第 N 个标题与译文第 N 个标题配对，
//! 建立“原文 slug → 译文标题”的映射，并重写译文中的链接目标。

use crate::error::{Result, TranslationError};
use crate::fs_utils;
use crate::types::PathConfig;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 提取所有级别的标题文本（`#` 后跟一个空格），按文档顺序
pub fn extract_headings(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter_map(|line| {
            let rest = line.trim_start_matches('#');
            if rest.len() == line.len() {
                return None;
            }
            rest.strip_prefix(' ')
                .filter(|title| !title.is_empty())
                .map(str::to_string)
        })
        .collect()
}

/// 标题转为锚点 slug：去除首尾空白、转小写、空格替换为连字符
///
/// ```rust
/// use markdown_relay_translator::relink::slugify;
///
/// assert_eq!(slugify(" Flight Modes "), "flight-modes");
/// ```
pub fn slugify(heading: &str) -> String {
    heading.trim().to_lowercase().replace(' ', "-")
}

/// 原文 slug 到译文标题的映射
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorMap {
    entries: HashMap<String, String>,
}

impl AnchorMap {
    pub fn get(&self, slug: &str) -> Option<&str> {
        self.entries.get(slug).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 按位置配对原文和译文标题
///
/// 两边标题数量必须相同，否则返回 [`TranslationError::HeadingCountMismatch`]。
/// 重复的 slug 以后出现的标题为准。
pub fn build_anchor_map(source: &[String], target: &[String]) -> Result<AnchorMap> {
    if source.len() != target.len() {
        return Err(TranslationError::HeadingCountMismatch {
            path: PathBuf::new(),
            source_count: source.len(),
            target_count: target.len(),
        });
    }

    let entries = source
        .iter()
        .zip(target)
        .map(|(src, dst)| (slugify(src), dst.clone()))
        .collect();
    Ok(AnchorMap { entries })
}

/// 链接重写器
pub struct Relinker {
    link: Regex,
    from_segment: String,
    to_segment: String,
}

impl Relinker {
    pub fn new(paths: &PathConfig) -> Result<Self> {
        // slug 中允许一层成对的圆括号，如 `position-mode-(mc)`
        let link = Regex::new(r"(\[.+?\]\(#+)((?:[^()\n]|\([^()\n]*\))+?)\)")
            .map_err(|e| TranslationError::Config(e.to_string()))?;
        Ok(Self {
            link,
            from_segment: paths.relink_from.clone(),
            to_segment: paths.relink_to.clone(),
        })
    }

    /// 替换 `[标签](#slug)` 中映射表里存在的 slug，其余链接原样保留
    pub fn rewrite_links(&self, text: &str, anchors: &AnchorMap) -> String {
        self.link
            .replace_all(text, |caps: &Captures| {
                let slug = &caps[2];
                let target = anchors.get(slug).unwrap_or(slug);
                format!("{}{})", &caps[1], target)
            })
            .into_owned()
    }

    /// 对一对原文/译文文本建立映射并重写译文
    pub fn relink_document(&self, source: &str, translated: &str) -> Result<String> {
        let anchors = build_anchor_map(&extract_headings(source), &extract_headings(translated))?;
        debug!("  建立 {} 个锚点映射", anchors.len());
        Ok(self.rewrite_links(translated, &anchors))
    }

    /// 译文路径中第一个等于 `relink_from` 的目录段替换为 `relink_to`
    pub fn relinked_path(&self, path: &Path) -> Result<PathBuf> {
        let mut replaced = false;
        let mut out = PathBuf::new();
        for component in path.components() {
            let part = component.as_os_str();
            if !replaced && part == self.from_segment.as_str() {
                out.push(&self.to_segment);
                replaced = true;
            } else {
                out.push(part);
            }
        }

        if replaced {
            Ok(out)
        } else {
            Err(TranslationError::PathSegmentMissing {
                path: path.to_path_buf(),
                segment: self.from_segment.clone(),
            })
        }
    }

    /// 读取一对文件，重写后写入替换目录段得到的新路径，返回输出路径
    pub fn relink_file(&self, source_path: &Path, translated_path: &Path) -> Result<PathBuf> {
        let output = self.relinked_path(translated_path)?;
        self.relink_file_into(source_path, translated_path, &output)?;
        Ok(output)
    }

    /// 读取一对文件，重写后写入指定的输出路径
    pub fn relink_file_into(
        &self,
        source_path: &Path,
        translated_path: &Path,
        output: &Path,
    ) -> Result<()> {
        let source = fs_utils::read_to_string(source_path)?;
        let translated = fs_utils::read_to_string(translated_path)?;

        let rewritten = self.relink_document(&source, &translated).map_err(|e| match e {
            TranslationError::HeadingCountMismatch { source_count, target_count, .. } => {
                TranslationError::HeadingCountMismatch {
                    path: translated_path.to_path_buf(),
                    source_count,
                    target_count,
                }
            }
            other => other,
        })?;

        fs_utils::write_atomic(output, &rewritten)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relinker() -> Relinker {
        Relinker::new(&PathConfig::default()).unwrap()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn extracts_all_heading_levels_in_order() {
        let doc = "# Top\ntext\n## Second Level\n  ###### Six\n#NoSpace\n# \n####\n";
        assert_eq!(extract_headings(doc), strings(&["Top", "Second Level", "Six"]));
    }

    #[test]
    fn slug_matches_renderer_convention() {
        assert_eq!(slugify("Position Mode (MC)"), "position-mode-(mc)");
        assert_eq!(slugify("A  B"), "a--b");
    }

    #[test]
    fn anchor_map_pairs_headings_by_position() {
        let map = build_anchor_map(
            &strings(&["Flight Modes", "Position Mode"]),
            &strings(&["飞行模式", "定位模式"]),
        )
        .unwrap();
        assert_eq!(map.get("flight-modes"), Some("飞行模式"));
        assert_eq!(map.get("position-mode"), Some("定位模式"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn anchor_map_rejects_count_mismatch() {
        let err = build_anchor_map(&strings(&["A", "B", "C"]), &strings(&["甲", "乙"])).unwrap_err();
        assert!(matches!(
            err,
            TranslationError::HeadingCountMismatch { source_count: 3, target_count: 2, .. }
        ));
    }

    #[test]
    fn rewrites_only_the_slug_of_mapped_links() {
        let map = build_anchor_map(&strings(&["Flight Modes"]), &strings(&["飞行模式"])).unwrap();
        let text = "见 [flight-modes 说明](#flight-modes)，另见 [外部](#other) 和 [页面](page.md#flight-modes)。\n";
        assert_eq!(
            relinker().rewrite_links(text, &map),
            "见 [flight-modes 说明](#飞行模式)，另见 [外部](#other) 和 [页面](page.md#flight-modes)。\n"
        );
    }

    #[test]
    fn slug_with_parentheses_is_rewritten() {
        let map = build_anchor_map(&strings(&["Position Mode (MC)"]), &strings(&["定位模式（多旋翼）"]))
            .unwrap();
        let text = "[x](#position-mode-(mc)) 与 [y](#other)\n";
        assert_eq!(
            relinker().rewrite_links(text, &map),
            "[x](#定位模式（多旋翼）) 与 [y](#other)\n"
        );
    }

    #[test]
    fn unmapped_links_are_byte_identical() {
        let map = AnchorMap::default();
        let text = "[a](#one) [b](##two)\n";
        assert_eq!(relinker().rewrite_links(text, &map), text);
    }

    #[test]
    fn relink_document_uses_both_heading_sequences() {
        let source = "# Actuators\n## Motor Setup\nSee [setup](#motor-setup).\n";
        let translated = "# 执行器\n## 电机设置\n参见 [设置](#motor-setup)。\n";
        assert_eq!(
            relinker().relink_document(source, translated).unwrap(),
            "# 执行器\n## 电机设置\n参见 [设置](#电机设置)。\n"
        );
    }

    #[test]
    fn relinked_path_replaces_first_matching_segment() {
        let r = relinker();
        assert_eq!(
            r.relinked_path(Path::new("docs/zh_nr/zh_nr/a.md")).unwrap(),
            PathBuf::from("docs/zh/zh_nr/a.md")
        );
        assert!(matches!(
            r.relinked_path(Path::new("docs/zh_nr_old/a.md")),
            Err(TranslationError::PathSegmentMissing { .. })
        ));
    }

    #[test]
    fn relink_file_writes_to_derived_tree() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("en/guide.md");
        let translated = dir.path().join("zh_nr/guide.md");
        fs_utils::write_atomic(&source, "# Intro\n[go](#intro)\n").unwrap();
        fs_utils::write_atomic(&translated, "# 简介\n[前往](#intro)\n").unwrap();

        let output = relinker().relink_file(&source, &translated).unwrap();
        assert_eq!(output, dir.path().join("zh/guide.md"));
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "# 简介\n[前往](#简介)\n");
        assert_eq!(std::fs::read_to_string(&translated).unwrap(), "# 简介\n[前往](#intro)\n");
    }
}
