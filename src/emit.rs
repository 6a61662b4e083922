// src/emit.rs
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::model::{Composition, CompositionNode, RouteDefinition, RouteKind, RouteMeta};
use crate::route_path::{ERROR_BOUNDARY_PATH, NOT_FOUND_PATH};
use crate::wrappers::nest_outward;

/// ルーターの import 元
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum WouterLib {
    #[default]
    Wouter,
    WouterPreact,
}

impl WouterLib {
    pub fn as_str(self) -> &'static str {
        match self {
            WouterLib::Wouter => "wouter",
            WouterLib::WouterPreact => "wouter-preact",
        }
    }
}

const ROUTE_INDENT: usize = 10;

fn pad(n: usize) -> String {
    " ".repeat(n)
}

/// ノード 1 つ分の import 文
pub fn import_statement(node: &CompositionNode) -> String {
    let name = &node.component_name;
    let path = &node.route.import_path;
    if !node.suspense_wrapper() {
        return format!("import {name} from '{path}';");
    }

    let mut statement = format!("const {name} = React.lazy(() => import('{path}'));");
    if let (Some(spinner), Some(spinner_path)) = (&node.spinner_name, &node.spinner_path) {
        statement.push_str(&format!("\nimport {spinner} from '{spinner_path}';"));
    }
    statement
}

/// ルート全体を包むエラーバウンダリ (`__error` または最上位の `/__error`)
pub fn global_error_boundary(composition: &Composition) -> Option<&CompositionNode> {
    composition.nodes.iter().find(|n| {
        n.route.kind == RouteKind::Error
            && (n.route.route_path == ERROR_BOUNDARY_PATH
                || n.route.route_path == format!("/{ERROR_BOUNDARY_PATH}"))
    })
}

/// `<Route>` 1 つ分。中身を近いラッパーから順に外側へ包む
fn render_route_node(composition: &Composition, node: &CompositionNode, indent: usize) -> String {
    let route_path = if node.route.kind == RouteKind::NotFound {
        NOT_FOUND_PATH
    } else {
        node.route.route_path.as_str()
    };

    let mut inner = format!("<{} />", node.component_name);
    if node.suspense_wrapper() {
        let fallback = match &node.spinner_name {
            Some(spinner) => format!("<{spinner} />"),
            None => "<div>Loading...</div>".to_string(),
        };
        inner = format!(
            "<Suspense fallback={{{fallback}}}>\n{}{inner}\n{}</Suspense>",
            pad(indent + 4),
            pad(indent + 2)
        );
    }

    let chain: Vec<&CompositionNode> = node.wrappers.iter().map(|&id| composition.node(id)).collect();
    let inner = nest_outward(inner, &chain, |inner, wrapper| {
        let name = &wrapper.component_name;
        format!("<{name}>\n{}{inner}\n{}</{name}>", pad(indent + 4), pad(indent + 2))
    });

    format!(
        "{}<Route path=\"{route_path}\" component={{() => (\n{}{inner}\n{})}} />",
        pad(indent),
        pad(indent + 2),
        pad(indent)
    )
}

/// 合成結果からルーターモジュールのソースを組み立てる
pub fn emit_route_file(composition: &Composition, lib: WouterLib) -> String {
    let uses_suspense = composition.nodes.iter().any(CompositionNode::suspense_wrapper);
    let root = composition.find(RouteKind::Root);
    let error_boundary = global_error_boundary(composition);

    // ラッパーでも全体のバウンダリでもない error は描画されないので import しない
    let boundary_id = error_boundary.map(|b| b.id);
    let imports: IndexSet<String> = composition
        .nodes
        .iter()
        .flat_map(|n| {
            let rendered = n.route.kind != RouteKind::Error || Some(n.id) == boundary_id;
            rendered
                .then(|| import_statement(n))
                .into_iter()
                .chain(n.wrappers.iter().map(|&w| import_statement(composition.node(w))))
        })
        .collect();

    let routes: Vec<String> = composition
        .nodes
        .iter()
        .filter(|n| matches!(n.route.kind, RouteKind::Page | RouteKind::NotFound))
        .map(|n| render_route_node(composition, n, ROUTE_INDENT))
        .collect();

    let mut router = format!(
        "<Router>\n  <Switch>\n{}\n  </Switch>\n</Router>",
        routes.join("\n")
    );
    if let Some(boundary) = error_boundary {
        let name = &boundary.component_name;
        router = format!("<{name}>\n{router}\n</{name}>");
    }
    if let Some(root) = root {
        let name = &root.component_name;
        router = format!("<{name}>\n{router}\n</{name}>");
    }

    let mut out = String::from("import React from 'react';\n");
    if uses_suspense {
        out.push_str("import { Suspense } from 'react';\n");
    }
    out.push_str(&format!(
        "import {{ Router, Route, Switch }} from '{}';\n",
        lib.as_str()
    ));
    for statement in &imports {
        out.push_str(statement);
        out.push('\n');
    }
    out.push_str("\nexport function WouterFSRoutes() {\n  return (\n");
    for line in router.lines() {
        out.push_str("    ");
        out.push_str(line);
        out.push('\n');
    }
    out.push_str("  );\n}\n");
    out
}

/// routePath → 統合済みメタデータの JSON。同じパスは後のものが上書きする
pub fn emit_meta_json(routes: &[RouteDefinition]) -> crate::Result<String> {
    let table: IndexMap<&str, RouteMeta> = routes
        .iter()
        .map(|r| (r.route_path.as_str(), r.meta.clone().unwrap_or_default()))
        .collect();
    Ok(serde_json::to_string_pretty(&table)?)
}
