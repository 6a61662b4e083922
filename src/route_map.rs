// src/route_map.rs
use crate::model::{RouteDefinition, StructuredRouteEntry, StructuredRouteMap};

/// 親が見つからないエントリをまとめる合成キー
pub const ROOT_KEY: &str = "__root__";
const ROOT_FILE: &str = "__root.tsx";

/// ルート定義の一覧から、ルートパス同士の親子関係を表す対応表を作る。
///
/// 階層化とは独立しており、パスの短い順に登録してから
/// 右端のセグメントを削りながら既存のキーを親として探す。
/// 同じキーは後から登録したものが上書きする。
pub fn build_structured_map(routes: &[RouteDefinition]) -> StructuredRouteMap {
    let mut sorted: Vec<&RouteDefinition> = routes.iter().collect();
    sorted.sort_by_key(|r| r.route_path.chars().count());

    let mut map = StructuredRouteMap::new();
    for route in sorted {
        let key = if route.route_path.is_empty() {
            "/".to_string()
        } else {
            route.route_path.clone()
        };
        map.insert(
            key,
            StructuredRouteEntry {
                file_path: normalize_file_path(&route.file_path),
                ..Default::default()
            },
        );
    }

    let keys: Vec<String> = map.keys().cloned().collect();
    for key in keys {
        if is_sentinel(&key) {
            continue;
        }

        let parent = find_parent_path(&key, &map).unwrap_or_else(|| ROOT_KEY.to_string());
        let entry = map.entry(parent.clone()).or_insert_with(|| StructuredRouteEntry {
            file_path: ROOT_FILE.to_string(),
            parent: None,
            children: Some(Vec::new()),
        });
        entry.children.get_or_insert_with(Vec::new).push(key.clone());

        if let Some(child) = map.get_mut(&key) {
            child.parent = Some(parent);
        }
    }

    map
}

/// `*` と `/`、それに error / not_found 由来のキーは親を持たない
pub fn is_sentinel(key: &str) -> bool {
    key == "*" || key == "/" || key.contains("__error") || key.contains("__not_found")
}

/// 先頭から最初の `routes/` までを取り除き、区切りを `/` に揃える
pub fn normalize_file_path(file_path: &str) -> String {
    let mut from = 0;
    while let Some(found) = file_path[from..].find("routes") {
        let end = from + found + "routes".len();
        if matches!(file_path[end..].chars().next(), Some('/') | Some('\\')) {
            return file_path[end + 1..].replace('\\', "/");
        }
        from = end;
    }
    file_path.replace('\\', "/")
}

fn find_parent_path(path: &str, map: &StructuredRouteMap) -> Option<String> {
    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    while !segments.is_empty() {
        let candidate = format!("/{}", segments[..segments.len() - 1].join("/"));
        if map.contains_key(&candidate) {
            return Some(candidate);
        }
        segments.pop();
    }
    None
}

/// 永続化用の JSON (挿入順を保つ)
pub fn to_json(map: &StructuredRouteMap) -> crate::Result<String> {
    Ok(serde_json::to_string_pretty(map)?)
}
