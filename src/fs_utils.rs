//! 文件和目录工具

use crate::error::{Result, TranslationError};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

/// 递归查找目录下所有 `.md` 文件，按路径排序
pub fn markdown_files<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            TranslationError::io(path, e.into())
        })?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "md") {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

/// 相对 `base` 的路径键，统一使用 `/` 分隔
pub fn relative_key(path: &Path, base: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| TranslationError::io(path, e))
}

/// 目标文件存在且去除空白后非空
pub fn has_content(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    Ok(!read_to_string(path)?.trim().is_empty())
}

/// 整体写入文件：先写同目录临时文件，再重命名覆盖，失败时不会留下半个文件
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| TranslationError::io(parent, e))?;

    let mut file = NamedTempFile::new_in(parent).map_err(|e| TranslationError::io(parent, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| TranslationError::io(path, e))?;
    file.persist(path)
        .map_err(|e| TranslationError::io(path, e.error))?;
    Ok(())
}
