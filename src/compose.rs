// src/compose.rs
use crate::hierarchy::build_hierarchy;
use crate::model::{Composition, CompositionNode, RouteDefinition};
use crate::wrappers::{wrapper_ids, wrapper_index};

/// ルート定義から生成コード上のコンポーネント名を作る。
///
/// `<種類><ファイル名>_<発見順>` の形 (例: `PageIdIndex_2`, `NotFoundNotFound_5`)。
/// 同じ入力からは常に同じ名前になる。
pub fn component_name(route: &RouteDefinition, index: usize) -> String {
    let base = route
        .import_path
        .rsplit('/')
        .next()
        .unwrap_or(&route.import_path);
    let base = strip_script_extension(base);

    let kind = capitalize_words(route.kind.as_str());
    let name = capitalize_words(&format_name(base));
    format!("{kind}{name}_{index}").replace(' ', "")
}

fn strip_script_extension(name: &str) -> &str {
    for ext in [".tsx", ".ts", ".jsx", ".js"] {
        if let Some(stripped) = name.strip_suffix(ext) {
            return stripped;
        }
    }
    name
}

/// 識別子に使えない記号を取り除き、単語をスペースで区切る
fn format_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '[' | ']' | '(' | ')' | '{' | '}' => {}
            '.' | '_' | '-' | '/' | '\\' => out.push(' '),
            '*' => out.push_str("Wildcard"),
            ':' => out.push_str("Param"),
            '?' => out.push_str("Optional"),
            _ => out.push(c),
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn capitalize_words(s: &str) -> String {
    s.replace(['_', '-'], " ")
        .split(' ')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// 子もラッパーも持たないノード列を作る
pub fn plain_nodes(routes: Vec<RouteDefinition>) -> Vec<CompositionNode> {
    routes
        .into_iter()
        .enumerate()
        .map(|(id, route)| CompositionNode {
            id,
            component_name: component_name(&route, id),
            route,
            spinner_name: None,
            spinner_path: None,
            children: Vec::new(),
            wrappers: Vec::new(),
        })
        .collect()
}

/// ルート定義の一覧を合成ノードに変換する。
///
/// ラッパーは添字で解決するので、同じパスの layout と page があっても取り違えない。
pub fn compose(routes: Vec<RouteDefinition>, default_spinner: Option<&str>) -> Composition {
    let index = wrapper_index(&routes);
    let wrappers: Vec<Vec<usize>> = routes
        .iter()
        .map(|r| wrapper_ids(&index, &r.route_path, &routes, &r.route_path))
        .collect();

    let mut nodes = plain_nodes(routes);
    for (node, chain) in nodes.iter_mut().zip(wrappers) {
        let spinner = node
            .route
            .meta
            .as_ref()
            .and_then(|m| m.spinner_path.clone())
            .or_else(|| default_spinner.map(str::to_string));

        if node.route.is_lazy {
            if let Some(path) = spinner {
                node.spinner_name = Some(format!("Spinner_{}", node.id));
                node.spinner_path = Some(path);
            }
        }
        tracing::debug!(
            component = %node.component_name,
            route = %node.route.route_path,
            wrappers = chain.len(),
            "composed node"
        );
        node.wrappers = chain;
    }

    let forest = build_hierarchy(&mut nodes);
    Composition { nodes, forest }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RouteKind, RouteMeta};
    use crate::route_path::{default_not_found_route, derive_route};

    fn def(file: &str) -> RouteDefinition {
        derive_route(file, "./src/routes", None)
    }

    #[test]
    fn component_names_follow_kind_and_file() {
        assert_eq!(component_name(&def("./src/routes/__root.tsx"), 0), "RootRoot_0");
        assert_eq!(component_name(&def("./src/routes/test/__layout.tsx"), 1), "LayoutLayout_1");
        assert_eq!(component_name(&def("./src/routes/test/[id].index.tsx"), 2), "PageIdIndex_2");
        assert_eq!(component_name(&def("./src/routes/index.tsx"), 3), "PageIndex_3");
        assert_eq!(component_name(&default_not_found_route("./src/routes"), 5), "NotFoundNotFound_5");
        assert_eq!(component_name(&def("./src/routes/docs/[...rest].tsx"), 6), "PageRest_6");
        assert_eq!(component_name(&def("./src/routes/user-profile.tsx"), 7), "PageUserProfile_7");
    }

    #[test]
    fn wrappers_resolve_by_index_not_by_path() {
        let composition = compose(
            vec![
                def("./src/routes/blog/__layout.tsx"),
                def("./src/routes/blog/index.tsx"),
                def("./src/routes/blog/[slug].tsx"),
            ],
            None,
        );
        assert_eq!(composition.nodes[2].wrappers, vec![0]);
        assert_eq!(composition.node(0).route.kind, RouteKind::Layout);
        assert!(composition.nodes[1].wrappers.is_empty());
        assert_eq!(composition.forest, vec![0]);
        assert_eq!(composition.nodes[0].children, vec![1, 2]);
    }

    #[test]
    fn spinner_only_for_lazy_nodes() {
        let mut lazy = def("./src/routes/report.lazy.tsx");
        lazy.meta = Some(RouteMeta {
            spinner_path: Some("./Own".into()),
            ..Default::default()
        });
        let composition = compose(
            vec![
                lazy,
                def("./src/routes/stats.lz.tsx"),
                def("./src/routes/eager.tsx"),
            ],
            Some("./Default"),
        );

        assert_eq!(composition.nodes[0].spinner_name.as_deref(), Some("Spinner_0"));
        assert_eq!(composition.nodes[0].spinner_path.as_deref(), Some("./Own"));
        assert_eq!(composition.nodes[1].spinner_path.as_deref(), Some("./Default"));
        assert!(composition.nodes[2].spinner_name.is_none());
        assert!(composition.nodes[2].route.meta.is_none());
    }

    #[test]
    fn lazy_without_any_spinner_has_no_spinner_name() {
        let composition = compose(vec![def("./src/routes/a.lazy.tsx")], None);
        assert!(composition.nodes[0].suspense_wrapper());
        assert!(composition.nodes[0].spinner_name.is_none());
    }
}
