// src/hierarchy.rs
use crate::model::{CompositionNode, RouteDefinition, RouteKind};
use crate::prefix_index::PrefixIndex;

/// レイアウトだけを集めた前方一致インデックス (値は `routes` の添字)
pub fn layout_index(routes: &[RouteDefinition]) -> PrefixIndex {
    PrefixIndex::build(
        routes
            .iter()
            .enumerate()
            .filter(|(_, r)| r.kind == RouteKind::Layout)
            .map(|(i, r)| (r.route_path.as_str(), i)),
    )
}

/// `route_path` を前方一致で含むレイアウトのうち最も長いものを返す
pub fn find_closest_layout<'a>(
    route_path: &str,
    layouts: &[&'a RouteDefinition],
) -> Option<&'a RouteDefinition> {
    let index = PrefixIndex::build(
        layouts
            .iter()
            .enumerate()
            .map(|(i, l)| (l.route_path.as_str(), i)),
    );
    index
        .longest_prefix_of(route_path, |_| false)
        .map(|i| layouts[i])
}

/// 各ノードを最も近いレイアウトの子に付け、最上位のノード列を返す。
///
/// page / error / not_found を先に配置し、その後レイアウト同士を親子付けする。
/// root は生成コード側で全体を包むので、どこにも配置しない。
pub fn build_hierarchy(nodes: &mut [CompositionNode]) -> Vec<usize> {
    let routes: Vec<RouteDefinition> = nodes.iter().map(|n| n.route.clone()).collect();
    let index = layout_index(&routes);
    let mut forest = Vec::new();

    for id in 0..nodes.len() {
        let kind = routes[id].kind;
        if !matches!(kind, RouteKind::Page | RouteKind::Error | RouteKind::NotFound) {
            continue;
        }
        match index.longest_prefix_of(&routes[id].route_path, |_| false) {
            Some(parent) => nodes[parent].children.push(id),
            None => forest.push(id),
        }
    }

    for id in 0..nodes.len() {
        if routes[id].kind != RouteKind::Layout {
            continue;
        }
        let own_path = routes[id].route_path.as_str();
        match index.longest_prefix_of(own_path, |other| routes[other].route_path == own_path) {
            Some(parent) => {
                tracing::trace!(layout = own_path, parent = %routes[parent].route_path, "nested layout");
                nodes[parent].children.push(id);
            }
            None => forest.push(id),
        }
    }

    forest
}
