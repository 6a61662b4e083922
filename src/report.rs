// src/report.rs
use crate::model::{Composition, RouteDefinition};

/// Type / Path / File の表
pub fn render_table(routes: &[RouteDefinition]) -> String {
    let rows: Vec<[&str; 3]> = routes
        .iter()
        .map(|r| [r.kind.as_str(), r.route_path.as_str(), r.file_path.as_str()])
        .collect();

    let header = ["Type", "Path", "File"];
    let mut widths = header.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let line = |out: &mut String, cells: [&str; 3]| {
        out.push_str(&format!(
            "{:<w0$}  {:<w1$}  {}\n",
            cells[0],
            cells[1],
            cells[2],
            w0 = widths[0],
            w1 = widths[1]
        ));
    };
    line(&mut out, header);
    let rules = widths.map(|w| "-".repeat(w));
    line(&mut out, [rules[0].as_str(), rules[1].as_str(), rules[2].as_str()]);
    for row in rows {
        line(&mut out, row);
    }
    out
}

/// レイアウト階層を字下げで表す
pub fn render_forest(composition: &Composition) -> String {
    fn walk(composition: &Composition, id: usize, depth: usize, out: &mut String) {
        let node = composition.node(id);
        let path = if node.route.route_path.is_empty() {
            "\"\""
        } else {
            node.route.route_path.as_str()
        };
        out.push_str(&format!(
            "{}{} {} ({})\n",
            "  ".repeat(depth),
            node.route.kind,
            path,
            node.component_name
        ));
        for &child in &node.children {
            walk(composition, child, depth + 1, out);
        }
    }

    let mut out = String::new();
    for &id in &composition.forest {
        walk(composition, id, 0, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::compose;
    use crate::route_path::derive_route;

    fn defs() -> Vec<RouteDefinition> {
        ["routes/__layout.tsx", "routes/blog/__layout.tsx", "routes/blog/[slug].tsx"]
            .iter()
            .map(|f| derive_route(f, "routes", None))
            .collect()
    }

    #[test]
    fn table_has_a_row_per_route() {
        let table = render_table(&defs());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("Type"));
        assert!(lines[4].contains("/blog/:slug"));
        assert!(lines[4].ends_with("routes/blog/[slug].tsx"));
    }

    #[test]
    fn forest_is_indented_by_depth() {
        let forest = render_forest(&compose(defs(), None));
        assert_eq!(
            forest,
            "layout / (LayoutLayout_0)\n  layout /blog (LayoutLayout_1)\n    page /blog/:slug (PageSlug_2)\n"
        );
    }
}
