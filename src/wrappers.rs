// src/wrappers.rs
use crate::model::RouteDefinition;
use crate::prefix_index::PrefixIndex;

/// `route_path` を包む layout / error の一覧を、外側 (短いパス) から順に返す。
///
/// ルートパスが `self_path` と一致する定義は除外する。
/// 生成時は末尾 (最も内側) から順に中身を包んでいく。
pub fn resolve_wrappers<'a>(
    route_path: &str,
    routes: &'a [RouteDefinition],
    self_path: &str,
) -> Vec<&'a RouteDefinition> {
    let index = wrapper_index(routes);
    wrapper_ids(&index, route_path, routes, self_path)
        .into_iter()
        .map(|id| &routes[id])
        .collect()
}

/// layout / error だけを集めたインデックス (値は `routes` の添字)
pub fn wrapper_index(routes: &[RouteDefinition]) -> PrefixIndex {
    PrefixIndex::build(
        routes
            .iter()
            .enumerate()
            .filter(|(_, r)| r.kind.is_wrapper())
            .map(|(i, r)| (r.route_path.as_str(), i)),
    )
}

/// `resolve_wrappers` の添字版。インデックスを使い回したいとき用。
pub fn wrapper_ids(
    index: &PrefixIndex,
    route_path: &str,
    routes: &[RouteDefinition],
    self_path: &str,
) -> Vec<usize> {
    index
        .prefixes_of(route_path)
        .into_iter()
        .filter(|&id| routes[id].route_path != self_path)
        .collect()
}

/// 中身を内側から外側へ順に包む。`wrap` には (中身, ラッパー) が渡る。
pub fn nest_outward<T, W>(inner: T, chain: &[W], mut wrap: impl FnMut(T, &W) -> T) -> T {
    chain.iter().rev().fold(inner, |acc, w| wrap(acc, w))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RouteKind;
    use crate::route_path::{default_error_boundary_route, derive_route};

    fn defs(files: &[&str]) -> Vec<RouteDefinition> {
        files.iter().map(|f| derive_route(f, "routes", None)).collect()
    }

    fn paths(chain: &[&RouteDefinition]) -> Vec<String> {
        chain.iter().map(|r| r.route_path.clone()).collect()
    }

    #[test]
    fn chain_is_ordered_least_specific_first() {
        let routes = defs(&[
            "routes/admin/users/__layout.tsx",
            "routes/__layout.tsx",
            "routes/admin/__layout.tsx",
            "routes/admin/users/[id].tsx",
        ]);
        let chain = resolve_wrappers("/admin/users/:id", &routes, "/admin/users/:id");
        assert_eq!(paths(&chain), vec!["/", "/admin", "/admin/users"]);

        let nested = nest_outward("Page".to_string(), &chain, |inner, w| {
            format!("{}({inner})", w.route_path)
        });
        assert_eq!(nested, "/(/admin(/admin/users(Page)))");
    }

    #[test]
    fn error_boundaries_join_the_chain() {
        let mut routes = defs(&[
            "routes/__layout.tsx",
            "routes/shop/__error.tsx",
            "routes/shop/cart.tsx",
        ]);
        // ファイル由来の error は自分の名前を含むので兄弟ルートの接頭辞にならない
        assert_eq!(paths(&resolve_wrappers("/shop/cart", &routes, "/shop/cart")), vec!["/"]);

        routes[1].route_path = "/shop".to_string();
        let chain = resolve_wrappers("/shop/cart", &routes, "/shop/cart");
        assert_eq!(paths(&chain), vec!["/", "/shop"]);
        assert_eq!(chain[1].kind, RouteKind::Error);
    }

    #[test]
    fn pages_and_self_are_never_wrappers() {
        let routes = defs(&["routes/a/__layout.tsx", "routes/a/index.tsx", "routes/a/b.tsx"]);
        assert!(resolve_wrappers("/a/b", &routes, "/a/b").len() == 1);
        assert!(resolve_wrappers("/a", &routes, "/a").is_empty());
    }

    #[test]
    fn sentinel_error_boundary_wraps_nothing_per_route() {
        let mut routes = defs(&["routes/__layout.tsx", "routes/x.tsx"]);
        routes.push(default_error_boundary_route("routes"));
        let chain = resolve_wrappers("/x", &routes, "/x");
        assert_eq!(paths(&chain), vec!["/"]);
    }

    #[test]
    fn resolving_twice_does_not_disturb_the_input() {
        let routes = defs(&["routes/__layout.tsx", "routes/a/__layout.tsx", "routes/a/b.tsx"]);
        let before = routes.clone();
        let first = paths(&resolve_wrappers("/a/b", &routes, "/a/b"));
        let second = paths(&resolve_wrappers("/a/b", &routes, "/a/b"));
        assert_eq!(first, second);
        assert_eq!(routes, before);
    }
}
