// src/scan.rs
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::classify::classify;
use crate::error::Result;
use crate::resolver::to_slash;

/// ルートディレクトリ以下から対象拡張子のファイルを集め、
/// root → layout → page → error → not_found の順に安定ソートして返す。
pub fn collect_route_files(route_dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(route_dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)));
        if matches {
            files.push(path.to_path_buf());
        }
    }

    files.sort_by_key(|f| classify(&to_slash(f)).rank());
    tracing::debug!(dir = %route_dir.display(), count = files.len(), "collected route files");
    Ok(files)
}
