// src/classify.rs
use crate::model::RouteKind;

/// ファイル名の接頭辞からルートの種類を判定する。
/// どれにも当てはまらなければ page。
pub fn classify(file_path: &str) -> RouteKind {
    let normalized = file_path.replace('\\', "/");
    let file_name = normalized.rsplit('/').next().unwrap_or(&normalized);

    if file_name.starts_with("__root.") {
        RouteKind::Root
    } else if file_name.starts_with("__layout.") {
        RouteKind::Layout
    } else if file_name.starts_with("__error.") {
        RouteKind::Error
    } else if file_name.starts_with("__not_found.") {
        RouteKind::NotFound
    } else {
        RouteKind::Page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_prefixes() {
        assert_eq!(classify("routes/__root.tsx"), RouteKind::Root);
        assert_eq!(classify("routes/blog/__layout.tsx"), RouteKind::Layout);
        assert_eq!(classify("routes/blog/__error.jsx"), RouteKind::Error);
        assert_eq!(classify("routes\\__not_found.tsx"), RouteKind::NotFound);
    }

    #[test]
    fn everything_else_is_a_page() {
        assert_eq!(classify("routes/index.tsx"), RouteKind::Page);
        assert_eq!(classify("routes/__layout"), RouteKind::Page);
        assert_eq!(classify("routes/__layouts/about.tsx"), RouteKind::Page);
        assert_eq!(classify("routes/my__root.tsx"), RouteKind::Page);
    }
}
