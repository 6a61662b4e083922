// src/route_path.rs
use std::path::Path;

use crate::classify::classify;
use crate::model::{RouteDefinition, RouteKind};
use crate::resolver::{self, to_slash};

/// 予約済みのルートパス
pub const NOT_FOUND_PATH: &str = "*";
pub const ERROR_BOUNDARY_PATH: &str = "__error";

/// ファイルパスとベースディレクトリからルート定義を導出する。
///
/// `cwd` は import パスの計算にだけ使い、ルートパスには影響しない。
pub fn derive_route(file_path: &str, base_path: &str, cwd: Option<&Path>) -> RouteDefinition {
    let file_path = file_path.replace('\\', "/");
    let base_path = base_path.replace('\\', "/");

    let relative = to_slash(resolver::relative_path(
        Path::new(&base_path),
        Path::new(&file_path),
    ));
    let (dir, file_name) = match relative.rsplit_once('/') {
        Some((dir, file_name)) => (dir, file_name),
        None => ("", relative.as_str()),
    };

    let kind = classify(&file_path);
    let import_path = resolver::to_import_path(&base_path, &relative, cwd);
    let mut segments: Vec<&str> = dir.split('/').filter(|s| !s.is_empty()).collect();

    let route = |route_path: String, is_lazy: bool| RouteDefinition {
        file_path: file_path.clone(),
        import_path: import_path.clone(),
        route_path,
        kind,
        is_lazy,
        meta: None,
        error_boundary: false,
    };

    match kind {
        RouteKind::Root => return route(String::new(), false),
        // レイアウト自身のファイル名はパスに含めない
        RouteKind::Layout => return route(format!("/{}", segments.join("/")), false),
        _ => {}
    }

    let is_lazy = file_name.contains(".lazy.") || file_name.contains(".lz.");
    let clean = clean_stem(file_stem(file_name));

    if !is_index_stem(clean) {
        segments.push(clean);
    }

    let joined = replace_spread(&replace_params(&segments.join("/")));
    let route_path = strip_index_suffix(format!("/{joined}"));

    tracing::trace!(file = %file_path, route = %route_path, %kind, "derived route");
    route(route_path, is_lazy)
}

/// 既定の 404 ルート。生成するファイルは `<base>/__not_found.tsx`
pub fn default_not_found_route(base_path: &str) -> RouteDefinition {
    reserved_route(base_path, "__not_found", NOT_FOUND_PATH, RouteKind::NotFound)
}

/// 既定のグローバルなエラーバウンダリ
pub fn default_error_boundary_route(base_path: &str) -> RouteDefinition {
    let mut route = reserved_route(base_path, "__error", ERROR_BOUNDARY_PATH, RouteKind::Error);
    route.error_boundary = true;
    route
}

fn reserved_route(base_path: &str, stem: &str, route_path: &str, kind: RouteKind) -> RouteDefinition {
    let base = base_path.replace('\\', "/");
    let dir_name = Path::new(&base)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    RouteDefinition {
        file_path: to_slash(Path::new(&base).join(format!("{stem}.tsx"))),
        import_path: format!("@/{dir_name}/{stem}"),
        route_path: route_path.to_string(),
        kind,
        is_lazy: false,
        meta: None,
        error_boundary: false,
    }
}

/// 最後の拡張子を除いたファイル名 (先頭のドットは拡張子とみなさない)
fn file_stem(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(dot) if dot > 0 => &file_name[..dot],
        _ => file_name,
    }
}

fn clean_stem(stem: &str) -> &str {
    let stem = stem
        .strip_suffix(".lazy")
        .or_else(|| stem.strip_suffix(".lz"))
        .unwrap_or(stem);
    let stem = stem.strip_suffix(".index").unwrap_or(stem);
    stem.strip_suffix(".page").unwrap_or(stem)
}

fn is_index_stem(stem: &str) -> bool {
    stem.eq_ignore_ascii_case("index") || stem.eq_ignore_ascii_case("page")
}

/// `[name]` を `:name` に、`[...name]` を `*` に置き換える
fn replace_params(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut rest = path;

    while let Some(open) = rest.find('[') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find(']') {
            Some(close) if close > 0 => {
                let name = &after[..close];
                if name.starts_with("...") {
                    out.push('*');
                } else {
                    out.push(':');
                    out.push_str(name);
                }
                rest = &after[close + 1..];
            }
            _ => {
                out.push('[');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn replace_spread(path: &str) -> String {
    path.replace("...", "*")
}

fn strip_index_suffix(mut path: String) -> String {
    for suffix in ["/index", "/page"] {
        let len = path.len();
        if len >= suffix.len()
            && path.is_char_boundary(len - suffix.len())
            && path[len - suffix.len()..].eq_ignore_ascii_case(suffix)
        {
            path.truncate(len - suffix.len());
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_of(file: &str) -> String {
        derive_route(file, "src/routes", None).route_path
    }

    #[test]
    fn root_is_always_empty() {
        let root = derive_route("src/routes/deep/__root.lazy.tsx", "src/routes", None);
        assert_eq!(root.route_path, "");
        assert_eq!(root.kind, RouteKind::Root);
        assert!(!root.is_lazy);
    }

    #[test]
    fn layout_uses_directory_only() {
        assert_eq!(path_of("src/routes/__layout.tsx"), "/");
        assert_eq!(path_of("src/routes/admin/users/__layout.tsx"), "/admin/users");
        assert!(!derive_route("src/routes/a/__layout.lazy.tsx", "src/routes", None).is_lazy);
    }

    #[test]
    fn index_and_page_stems_collapse() {
        assert_eq!(path_of("src/routes/foo/index.tsx"), "/foo");
        assert_eq!(path_of("src/routes/foo/page.tsx"), "/foo");
        assert_eq!(path_of("src/routes/foo/INDEX.tsx"), "/foo");
        assert_eq!(path_of("src/routes/index.tsx"), "/");
        assert_eq!(path_of("src/routes/test/[id].index.tsx"), "/test/:id");
        assert_eq!(path_of("src/routes/about.page.tsx"), "/about");
    }

    #[test]
    fn dynamic_and_catch_all_segments() {
        assert_eq!(path_of("src/routes/blog/[slug].tsx"), "/blog/:slug");
        assert_eq!(path_of("src/routes/[org]/[repo]/issues.tsx"), "/:org/:repo/issues");
        assert_eq!(path_of("src/routes/docs/[...rest].tsx"), "/docs/*");
        assert_eq!(path_of("src/routes/[...a]/x/[...b].tsx"), "/*/x/*");
        assert_eq!(path_of("src/routes/files/....tsx"), "/files/*");
        assert_eq!(path_of("src/routes/post-[id].tsx"), "/post-:id");
    }

    #[test]
    fn lazy_markers_are_detected_and_stripped() {
        let lazy = derive_route("src/routes/reports.lazy.tsx", "src/routes", None);
        assert!(lazy.is_lazy);
        assert_eq!(lazy.route_path, "/reports");

        let lz = derive_route("src/routes/stats/index.lz.tsx", "src/routes", None);
        assert!(lz.is_lazy);
        assert_eq!(lz.route_path, "/stats");
    }

    #[test]
    fn error_and_not_found_files_keep_their_stem() {
        assert_eq!(path_of("src/routes/__error.tsx"), "/__error");
        assert_eq!(path_of("src/routes/__not_found.tsx"), "/__not_found");
    }

    #[test]
    fn trailing_index_directory_is_stripped() {
        assert_eq!(path_of("src/routes/docs/index/intro.tsx"), "/docs/index/intro");
        assert_eq!(path_of("src/routes/docs/Index/page.tsx"), "/docs");
    }

    #[test]
    fn no_trailing_slash_except_bare_root() {
        for file in [
            "src/routes/a/b/c.tsx",
            "src/routes/a/index.tsx",
            "src/routes/a/__layout.tsx",
            "src/routes/[x]/[...y].tsx",
        ] {
            let path = path_of(file);
            assert!(path.starts_with('/'), "{path}");
            assert!(path == "/" || !path.ends_with('/'), "{path}");
        }
    }

    #[test]
    fn windows_separators_are_normalized() {
        let route = derive_route("src\\routes\\blog\\[slug].tsx", "src\\routes", None);
        assert_eq!(route.route_path, "/blog/:slug");
        assert_eq!(route.file_path, "src/routes/blog/[slug].tsx");
        assert_eq!(route.import_path, "./routes/blog/[slug]");
    }

    #[test]
    fn reserved_defaults() {
        let nf = default_not_found_route("src/routes");
        assert_eq!(nf.route_path, "*");
        assert_eq!(nf.import_path, "@/routes/__not_found");
        assert_eq!(nf.file_path, "src/routes/__not_found.tsx");

        let err = default_error_boundary_route("src/routes");
        assert_eq!(err.route_path, "__error");
        assert_eq!(err.kind, RouteKind::Error);
        assert!(err.error_boundary);
    }
}
