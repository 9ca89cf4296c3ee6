//! 目录扫描模块
//!
//! 递归遍历配置的根目录，挑出还没有英文译本的 `.md` / `.json` 文件并逐个翻译。

use crate::document::{translate_file, TranslateOptions};
use crate::error::Result;
use crate::translator::Translate;
use crate::types::{DocumentKind, RootReport};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use walkdir::WalkDir;

/// 判断文件是否需要翻译
///
/// ```rust
/// use docs_en_translator::walker::is_candidate;
/// use std::path::Path;
///
/// assert!(is_candidate(Path::new("docs/restapi.md")));
/// assert!(!is_candidate(Path::new("docs/restapi.en.md")));
/// assert!(!is_candidate(Path::new("docs/logo.png")));
/// ```
pub fn is_candidate(path: &Path) -> bool {
    DocumentKind::detect(path).is_some()
}

/// 计算译本路径：在扩展名前插入 `.en`
///
/// 只替换结尾的扩展名，目录名中出现的 `.md` 不受影响。
pub fn target_path(path: &Path) -> Option<PathBuf> {
    let kind = DocumentKind::detect(path)?;
    let name = path.to_str()?;
    let stem = name.strip_suffix(kind.extension())?;
    Some(PathBuf::from(format!("{}{}", stem, kind.localized_suffix())))
}

/// 遍历单个根目录
///
/// 无法访问的条目（包括不存在的根目录）记录警告后跳过；
/// 遇到第一个翻译失败的文件时停止遍历该根目录并返回错误。
/// 指向文件的符号链接按普通文件处理，指向目录的符号链接不会进入。
pub async fn walk_root<T: Translate>(
    translator: &T,
    root: &Path,
    options: &TranslateOptions,
) -> Result<RootReport> {
    let mut report = RootReport {
        root: root.to_path_buf(),
        files: Vec::new(),
    };

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(root = %root.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };

        let source = entry.path();
        if !source.is_file() {
            continue;
        }

        let Some(target) = target_path(source) else {
            continue;
        };

        println!("{}", source.display());
        info!(source = %source.display(), "translating file");

        match translate_file(translator, source, &target, options).await {
            Ok(file) => report.files.push(file),
            Err(e) => {
                println!("Completion error: {}", e);
                error!(source = %source.display(), error = %e, "file translation failed");
                return Err(e);
            }
        }
    }

    Ok(report)
}

/// 依次遍历所有根目录
///
/// 每个根目录相互独立：前一个失败不会阻止后面的根目录。
pub async fn walk_roots<T: Translate>(
    translator: &T,
    roots: &[PathBuf],
    options: &TranslateOptions,
) -> Vec<Result<RootReport>> {
    let mut results = Vec::with_capacity(roots.len());
    for root in roots {
        info!(root = %root.display(), "scanning folder");
        results.push(walk_root(translator, root, options).await);
    }
    results
}
