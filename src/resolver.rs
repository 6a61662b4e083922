// src/resolver.rs
use path_absolutize::Absolutize;
use std::path::{Component, Path, PathBuf};

/// `\` を `/` に揃える
pub fn to_slash(path: impl AsRef<Path>) -> String {
    path.as_ref().to_string_lossy().replace('\\', "/")
}

/// 末尾の拡張子を 1 つだけ取り除く (`[id].index.tsx` → `[id].index`)
pub fn strip_extension(path: &str) -> &str {
    match path.rfind('.') {
        Some(dot) => {
            let ext = &path[dot + 1..];
            if ext.is_empty() || ext.contains('/') {
                path
            } else {
                &path[..dot]
            }
        }
        None => path,
    }
}

/// `from` から見た `to` の相対パスを求める。
///
/// どちらもファイルシステムには触れず字句的に絶対化してから比較する。
/// 絶対化できない場合は `to` をそのまま返す。
pub fn relative_path(from: &Path, to: &Path) -> PathBuf {
    if let Ok(stripped) = to.strip_prefix(from) {
        return stripped.to_path_buf();
    }

    let (Ok(from_abs), Ok(to_abs)) = (from.absolutize(), to.absolutize()) else {
        return to.to_path_buf();
    };

    let from_parts: Vec<Component> = from_abs.components().collect();
    let to_parts: Vec<Component> = to_abs.components().collect();

    // ドライブ (prefix) が異なる場合は相対化できない
    if from_parts.first() != to_parts.first() {
        return to_abs.to_path_buf();
    }

    let common = from_parts
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut out = PathBuf::new();
    for _ in common..from_parts.len() {
        out.push("..");
    }
    for part in &to_parts[common..] {
        out.push(part.as_os_str());
    }
    out
}

/// 生成ファイルから元ファイルを import するための参照文字列を作る。
///
/// - `cwd` なし: `./<ベースディレクトリ名>/<相対パス>` (拡張子なし)
/// - `cwd` あり: `cwd` から見た相対パス。`.` で始まらなければ `./` を付ける
pub fn to_import_path(base_path: &str, relative: &str, cwd: Option<&Path>) -> String {
    let base = Path::new(base_path);

    if let Some(cwd) = cwd {
        let full = to_slash(base.join(relative));
        let full = strip_extension(&full);
        let relative = to_slash(relative_path(cwd, Path::new(full)));

        return if Path::new(&relative).is_absolute() || !relative.starts_with('.') {
            format!("./{}", relative.trim_start_matches('/'))
        } else {
            relative
        };
    }

    let joined = match base.file_name() {
        Some(name) => to_slash(Path::new(name).join(relative)),
        None => to_slash(relative),
    };
    format!("./{}", strip_extension(&joined))
}
