use swc_common::comments::{CommentKind, SingleThreadedComments};
use swc_common::{sync::Lrc, BytePos, FileName, SourceMap};
use swc_ecma_ast::*;
use swc_ecma_parser::{lexer::Lexer, EsConfig, Parser as SwcParser, StringInput, Syntax, TsConfig};
use swc_ecma_visit::{Visit, VisitWith};

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::{HeadMeta, RouteMeta, SitemapEntry};

/// ルートファイル 1 つを走査した結果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceScan {
    /// 見つかったフィールドが 1 つもなければ None
    pub meta: Option<RouteMeta>,
    /// `export default ...` があるか
    pub has_default_export: bool,
}

/// AST をトラバースして `Head` / `Sitemap` などの宣言を拾う Visitor
#[derive(Default)]
struct MetaVisitor {
    head: Option<serde_json::Value>,
    sitemap: Option<serde_json::Value>,
    is_async: bool,
    has_default_export: bool,
    /// リテラルとして解釈できなかった宣言名
    rejected: Vec<&'static str>,
}

impl MetaVisitor {
    fn record(&mut self, name: &str, init: &Expr) {
        let (slot, label) = match name {
            "Head" => (&mut self.head, "Head"),
            "Sitemap" => (&mut self.sitemap, "Sitemap"),
            _ => return,
        };
        if slot.is_some() {
            return;
        }
        match literal_to_json(init) {
            Some(value) => *slot = Some(value),
            None => self.rejected.push(label),
        }
    }
}

impl Visit for MetaVisitor {
    /// `export const Head = { ... }` のような export 付きの変数宣言
    fn visit_export_decl(&mut self, export: &ExportDecl) {
        if let Decl::Var(var_decl) = &export.decl {
            for declarator in &var_decl.decls {
                if let (Pat::Ident(BindingIdent { id, .. }), Some(init)) =
                    (&declarator.name, &declarator.init)
                {
                    self.record(&id.sym, init);
                }
            }
        }
        export.visit_children_with(self);
    }

    fn visit_export_default_decl(&mut self, export: &ExportDefaultDecl) {
        self.has_default_export = true;
        if let DefaultDecl::Fn(FnExpr { function, .. }) = &export.decl {
            if function.is_async {
                self.is_async = true;
            }
        }
        export.visit_children_with(self);
    }

    fn visit_export_default_expr(&mut self, export: &ExportDefaultExpr) {
        self.has_default_export = true;
        export.visit_children_with(self);
    }

    /// `export { Page as default }`
    fn visit_named_export(&mut self, export: &NamedExport) {
        let is_default = |name: &ModuleExportName| match name {
            ModuleExportName::Ident(ident) => &*ident.sym == "default",
            ModuleExportName::Str(s) => &*s.value == "default",
        };
        for specifier in &export.specifiers {
            match specifier {
                ExportSpecifier::Default(_) => self.has_default_export = true,
                ExportSpecifier::Named(ExportNamedSpecifier { orig, exported, .. }) => {
                    if is_default(exported.as_ref().unwrap_or(orig)) {
                        self.has_default_export = true;
                    }
                }
                ExportSpecifier::Namespace(_) => {}
            }
        }
    }
}

/// 式をリテラルとして JSON に変換する。リテラル以外が混ざれば None
fn literal_to_json(expr: &Expr) -> Option<serde_json::Value> {
    use serde_json::Value;

    match expr {
        Expr::Lit(Lit::Str(Str { value, .. })) => Some(Value::String(value.to_string())),
        Expr::Lit(Lit::Num(Number { value, .. })) => {
            serde_json::Number::from_f64(*value).map(Value::Number)
        }
        Expr::Lit(Lit::Bool(Bool { value, .. })) => Some(Value::Bool(*value)),
        Expr::Lit(Lit::Null(_)) => Some(Value::Null),
        Expr::Unary(UnaryExpr {
            op: UnaryOp::Minus,
            arg,
            ..
        }) => match &**arg {
            Expr::Lit(Lit::Num(Number { value, .. })) => {
                serde_json::Number::from_f64(-*value).map(Value::Number)
            }
            _ => None,
        },
        Expr::Tpl(Tpl { exprs, quasis, .. }) if exprs.is_empty() => quasis
            .first()
            .and_then(|q| q.cooked.as_ref())
            .map(|cooked| Value::String(cooked.to_string())),
        Expr::Array(ArrayLit { elems, .. }) => elems
            .iter()
            .map(|elem| match elem {
                Some(ExprOrSpread { spread: None, expr }) => literal_to_json(expr),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(Value::Array),
        Expr::Object(ObjectLit { props, .. }) => {
            let mut map = serde_json::Map::new();
            for prop in props {
                let PropOrSpread::Prop(prop) = prop else {
                    return None;
                };
                let Prop::KeyValue(KeyValueProp { key, value }) = &**prop else {
                    return None;
                };
                let key = match key {
                    PropName::Ident(ident) => ident.sym.to_string(),
                    PropName::Str(Str { value, .. }) => value.to_string(),
                    PropName::Num(Number { value, .. }) => value.to_string(),
                    _ => return None,
                };
                map.insert(key, literal_to_json(value)?);
            }
            Some(Value::Object(map))
        }
        Expr::Paren(ParenExpr { expr, .. })
        | Expr::TsAs(TsAsExpr { expr, .. })
        | Expr::TsConstAssertion(TsConstAssertion { expr, .. })
        | Expr::TsSatisfies(TsSatisfiesExpr { expr, .. }) => literal_to_json(expr),
        _ => None,
    }
}

fn syntax_for(file_path: &Path) -> Syntax {
    match file_path.extension().and_then(|e| e.to_str()) {
        Some("js") | Some("jsx") | Some("mjs") => Syntax::Es(EsConfig {
            jsx: true,
            ..Default::default()
        }),
        Some("ts") | Some("mts") => Syntax::Typescript(TsConfig {
            decorators: true,
            ..Default::default()
        }),
        _ => Syntax::Typescript(TsConfig {
            tsx: true,
            decorators: true,
            ..Default::default()
        }),
    }
}

/// `// @spinner ./Spinner` の形のコメントからパスを取り出す
fn spinner_from_comment(text: &str) -> Option<String> {
    let rest = text.trim_start().strip_prefix("@spinner")?;
    let path = rest.split_whitespace().next()?;
    Some(path.to_string())
}

/// ソース文字列を解析してメタデータを取り出す。
///
/// 構文エラーは `Error::Parse` として返す。個々の宣言が
/// リテラルとして解釈できない場合はそのフィールドだけを欠落させる。
pub fn scan_source(src: &str, file_path: &Path) -> Result<SourceScan> {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(FileName::Real(file_path.to_path_buf()), src.to_string());
    let comments = SingleThreadedComments::default();

    let lexer = Lexer::new(
        syntax_for(file_path),
        Default::default(),
        StringInput::from(&*fm),
        Some(&comments),
    );
    let mut parser = SwcParser::new_from(lexer);
    let module = parser.parse_module().map_err(|e| Error::Parse {
        path: file_path.to_path_buf(),
        message: format!("{:?}", e),
    })?;

    let mut visitor = MetaVisitor::default();
    visitor.visit_module(&module);

    for name in &visitor.rejected {
        tracing::warn!(file = %file_path.display(), export = name, "ignoring non-literal metadata");
    }

    // 先頭に近い @spinner を採用する
    let spinner_path = {
        let (leading, trailing) = comments.borrow_all();
        let first = leading
            .values()
            .chain(trailing.values())
            .flatten()
            .filter(|c| c.kind == CommentKind::Line)
            .filter_map(|c| spinner_from_comment(&c.text).map(|p| (c.span.lo, p)))
            .min_by_key(|(pos, _): &(BytePos, String)| *pos)
            .map(|(_, path)| path);
        first
    };

    let head = visitor
        .head
        .and_then(|v| deserialize_field::<HeadMeta>(v, "Head", file_path));
    let sitemap = visitor
        .sitemap
        .and_then(|v| deserialize_field::<SitemapEntry>(v, "Sitemap", file_path));

    let found = head.is_some() || sitemap.is_some() || visitor.is_async || spinner_path.is_some();
    let meta = found.then(|| RouteMeta {
        head,
        sitemap,
        is_async: visitor.is_async,
        spinner_path,
    });

    Ok(SourceScan {
        meta,
        has_default_export: visitor.has_default_export,
    })
}

fn deserialize_field<T: serde::de::DeserializeOwned>(
    value: serde_json::Value,
    label: &str,
    file_path: &Path,
) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::warn!(file = %file_path.display(), export = label, error = %e, "ignoring malformed metadata");
            None
        }
    }
}

/// ファイルを読み込んで走査する
pub fn scan_file(file_path: &Path) -> Result<SourceScan> {
    let src = fs::read_to_string(file_path).map_err(|e| Error::io(file_path, e))?;
    tracing::debug!(file = %file_path.display(), bytes = src.len(), "scanning route file");
    scan_source(&src, file_path)
}

/// メタデータ抽出器。構文エラーのファイルはメタデータなしとして扱う
pub fn extract_meta(file_path: &Path) -> Result<Option<RouteMeta>> {
    match scan_file(file_path) {
        Ok(scan) => Ok(scan.meta),
        Err(Error::Parse { path, message }) => {
            tracing::warn!(file = %path.display(), %message, "skipping metadata of unparsable file");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
