// src/model.rs
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// ファイル名の接頭辞から決まるルートの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    Root,
    Layout,
    Error,
    NotFound,
    Page,
}

impl RouteKind {
    /// 探索結果を並べ替えるときの順位 (root → layout → page → error → not_found)
    pub fn rank(self) -> u8 {
        match self {
            RouteKind::Root => 0,
            RouteKind::Layout => 1,
            RouteKind::Page => 2,
            RouteKind::Error => 3,
            RouteKind::NotFound => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RouteKind::Root => "root",
            RouteKind::Layout => "layout",
            RouteKind::Error => "error",
            RouteKind::NotFound => "not_found",
            RouteKind::Page => "page",
        }
    }

    /// layout と error は子ルートを包むラッパーになり得る
    pub fn is_wrapper(self) -> bool {
        matches!(self, RouteKind::Layout | RouteKind::Error)
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 1 ファイル分のルート定義
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDefinition {
    /// 元ファイルのパス (区切りは `/` に正規化済み)
    pub file_path: String,

    /// 生成コードが import に使う参照文字列
    pub import_path: String,

    /// 正規化済みのルートパス (例: "/blog/:slug", "" は root)
    pub route_path: String,

    #[serde(rename = "type")]
    pub kind: RouteKind,

    /// `.lazy` / `.lz` 付きなら遅延ロード
    pub is_lazy: bool,

    /// page は統合済みメタデータ、それ以外は抽出したままのメタデータ
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<RouteMeta>,

    /// 既定のエラーバウンダリとして合成された定義なら true
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub error_boundary: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<HeadMeta>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sitemap: Option<SitemapEntry>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_async: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spinner_path: Option<String>,
}

/// `export const Head = { ... }` の内容
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meta: Vec<MetaTag>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LinkTag>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaTag {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// name / property / content 以外の任意属性
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkTag {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

/// `export const Sitemap = { ... }` の内容
///
/// 統合時は浅い上書きなので、全フィールドを省略可能にしている。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SitemapEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastmod: Option<String>,

    /// 未知の値は None として読む
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_changefreq"
    )]
    pub changefreq: Option<ChangeFreq>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,
}

fn lenient_changefreq<'de, D>(deserializer: D) -> Result<Option<ChangeFreq>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// 生成コード上の 1 コンポーネントに対応するノード
///
/// `children` と `wrappers` は `Composition::nodes` への添字で持つ。
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionNode {
    /// 発見順の添字
    pub id: usize,
    pub route: RouteDefinition,
    pub component_name: String,
    /// 遅延ロードかつスピナーが決まったときだけ Some
    pub spinner_name: Option<String>,
    pub spinner_path: Option<String>,
    pub children: Vec<usize>,
    /// 外側 (短いパス) から内側 (長いパス) の順
    pub wrappers: Vec<usize>,
}

impl CompositionNode {
    pub fn suspense_wrapper(&self) -> bool {
        self.route.is_lazy
    }
}

/// ルート全体の合成結果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composition {
    pub nodes: Vec<CompositionNode>,
    /// どのレイアウトにも属さない最上位ノード
    pub forest: Vec<usize>,
}

impl Composition {
    pub fn node(&self, id: usize) -> &CompositionNode {
        &self.nodes[id]
    }

    pub fn find(&self, kind: RouteKind) -> Option<&CompositionNode> {
        self.nodes.iter().find(|n| n.route.kind == kind)
    }
}

/// サイトマップやナビゲーション向けの親子関係エントリ
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredRouteEntry {
    pub file_path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<String>>,
}

/// 挿入順を保つ routePath → エントリの対応表
pub type StructuredRouteMap = IndexMap<String, StructuredRouteEntry>;

/// 実行結果のまとめ
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    pub route_count: usize,
    pub written: Vec<PathBuf>,
    pub scaffolded: Vec<PathBuf>,
}
