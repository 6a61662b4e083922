// src/merge.rs
use serde::{Deserialize, Serialize};

use crate::model::{HeadMeta, RouteDefinition, RouteKind, RouteMeta, SitemapEntry};
use crate::prefix_index::PrefixIndex;

/// page に継承させるレイアウトのメタデータの選び方
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutSelection {
    /// ファイル順で最初に前方一致したレイアウト
    #[default]
    FirstMatch,
    /// 最も長く前方一致したレイアウト (階層化と同じ規則)
    Closest,
}

/// 既定 (first-match) の規則で page のメタデータを統合する
pub fn merge_metadata(routes: &mut [RouteDefinition]) {
    merge_metadata_with(routes, LayoutSelection::default());
}

/// root → レイアウト → page の順にメタデータを重ね、page の `meta` を書き換える。
///
/// page 以外の定義は抽出したままのメタデータを保持する。
pub fn merge_metadata_with(routes: &mut [RouteDefinition], selection: LayoutSelection) {
    let root = routes
        .iter()
        .find(|r| r.kind == RouteKind::Root)
        .and_then(|r| r.meta.clone());

    let layouts: Vec<(String, Option<RouteMeta>)> = routes
        .iter()
        .filter(|r| r.kind == RouteKind::Layout)
        .map(|r| (r.route_path.clone(), r.meta.clone()))
        .collect();
    let index = PrefixIndex::build(layouts.iter().enumerate().map(|(i, (p, _))| (p.as_str(), i)));

    for route in routes.iter_mut().filter(|r| r.kind == RouteKind::Page) {
        let layout = match selection {
            LayoutSelection::FirstMatch => layouts
                .iter()
                .position(|(prefix, _)| route.route_path.starts_with(prefix.as_str())),
            LayoutSelection::Closest => index.longest_prefix_of(&route.route_path, |_| false),
        }
        .and_then(|i| layouts[i].1.as_ref());

        tracing::trace!(
            route = %route.route_path,
            inherited = layout.is_some(),
            "merging metadata"
        );

        let own = route.meta.take().unwrap_or_default();
        let head = merge_head([
            root.as_ref().and_then(|m| m.head.as_ref()),
            layout.and_then(|m| m.head.as_ref()),
            own.head.as_ref(),
        ]);
        let sitemap = merge_sitemap([
            root.as_ref().and_then(|m| m.sitemap.as_ref()),
            layout.and_then(|m| m.sitemap.as_ref()),
            own.sitemap.as_ref(),
        ]);

        route.meta = Some(RouteMeta {
            head: Some(head),
            sitemap: Some(sitemap),
            is_async: own.is_async,
            spinner_path: own.spinner_path,
        });
    }
}

/// 後の層の文字列フィールドは値があるときだけ上書きし、
/// keywords は和集合、meta / links は連結する。
pub fn merge_head<'a>(layers: impl IntoIterator<Item = Option<&'a HeadMeta>>) -> HeadMeta {
    layers
        .into_iter()
        .flatten()
        .fold(HeadMeta::default(), |acc, next| {
            let mut keywords = acc.keywords;
            for keyword in &next.keywords {
                if !keywords.contains(keyword) {
                    keywords.push(keyword.clone());
                }
            }
            HeadMeta {
                title: override_text(&next.title, acc.title),
                description: override_text(&next.description, acc.description),
                keywords,
                canonical: override_text(&next.canonical, acc.canonical),
                meta: acc.meta.into_iter().chain(next.meta.iter().cloned()).collect(),
                links: acc.links.into_iter().chain(next.links.iter().cloned()).collect(),
            }
        })
}

/// 浅い上書き
pub fn merge_sitemap<'a>(layers: impl IntoIterator<Item = Option<&'a SitemapEntry>>) -> SitemapEntry {
    layers
        .into_iter()
        .flatten()
        .fold(SitemapEntry::default(), |acc, next| SitemapEntry {
            path: next.path.clone().or(acc.path),
            lastmod: next.lastmod.clone().or(acc.lastmod),
            changefreq: next.changefreq.or(acc.changefreq),
            priority: next.priority.or(acc.priority),
        })
}

fn override_text(next: &Option<String>, prev: Option<String>) -> Option<String> {
    match next {
        Some(value) if !value.is_empty() => Some(value.clone()),
        _ => prev,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChangeFreq, MetaTag};
    use crate::route_path::derive_route;

    fn head(title: Option<&str>, keywords: &[&str]) -> HeadMeta {
        HeadMeta {
            title: title.map(str::to_string),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            ..Default::default()
        }
    }

    fn with_head(file: &str, head: HeadMeta) -> RouteDefinition {
        let mut route = derive_route(file, "routes", None);
        route.meta = Some(RouteMeta {
            head: Some(head),
            ..Default::default()
        });
        route
    }

    fn title_of(route: &RouteDefinition) -> Option<&str> {
        route.meta.as_ref()?.head.as_ref()?.title.as_deref()
    }

    #[test]
    fn titles_fall_back_through_the_layers() {
        let mut routes = vec![
            with_head("routes/__root.tsx", head(Some("Site"), &["a"])),
            with_head("routes/blog/__layout.tsx", head(Some("Blog"), &["b", "a"])),
            with_head("routes/blog/post.tsx", head(None, &["c", "b"])),
            with_head("routes/about.tsx", head(Some(""), &[])),
            with_head("routes/blog/titled.tsx", head(Some("Titled"), &[])),
        ];
        merge_metadata(&mut routes);

        assert_eq!(title_of(&routes[2]), Some("Blog"));
        assert_eq!(title_of(&routes[3]), Some("Site"));
        assert_eq!(title_of(&routes[4]), Some("Titled"));

        let keywords = &routes[2].meta.as_ref().unwrap().head.as_ref().unwrap().keywords;
        assert_eq!(keywords, &vec!["a", "b", "c"]);
    }

    #[test]
    fn non_pages_keep_raw_metadata() {
        let mut routes = vec![
            with_head("routes/__root.tsx", head(Some("Site"), &[])),
            with_head("routes/x/__layout.tsx", head(None, &["k"])),
        ];
        let before = routes.clone();
        merge_metadata(&mut routes);
        assert_eq!(routes, before);
    }

    #[test]
    fn meta_tags_and_links_are_concatenated() {
        let tag = |content: &str| MetaTag {
            name: Some("robots".into()),
            content: Some(content.into()),
            ..Default::default()
        };
        let merged = merge_head([
            Some(&HeadMeta { meta: vec![tag("index")], ..Default::default() }),
            None,
            Some(&HeadMeta { meta: vec![tag("index")], ..Default::default() }),
        ]);
        assert_eq!(merged.meta.len(), 2);
    }

    #[test]
    fn sitemap_is_a_shallow_override() {
        let root = SitemapEntry {
            changefreq: Some(ChangeFreq::Weekly),
            priority: Some(0.5),
            ..Default::default()
        };
        let page = SitemapEntry {
            path: Some("/about".into()),
            priority: Some(0.9),
            ..Default::default()
        };
        let merged = merge_sitemap([Some(&root), None, Some(&page)]);
        assert_eq!(merged.path.as_deref(), Some("/about"));
        assert_eq!(merged.changefreq, Some(ChangeFreq::Weekly));
        assert_eq!(merged.priority, Some(0.9));
    }

    #[test]
    fn async_and_spinner_come_from_the_page_only() {
        let mut layout = derive_route("routes/__layout.tsx", "routes", None);
        layout.meta = Some(RouteMeta {
            is_async: true,
            spinner_path: Some("./Spinner".into()),
            ..Default::default()
        });
        let page = derive_route("routes/home.tsx", "routes", None);
        let mut routes = vec![layout, page];
        merge_metadata(&mut routes);

        let meta = routes[1].meta.as_ref().unwrap();
        assert!(!meta.is_async);
        assert!(meta.spinner_path.is_none());
        assert_eq!(meta.head, Some(HeadMeta::default()));
        assert_eq!(meta.sitemap, Some(SitemapEntry::default()));
    }

    #[test]
    fn first_match_and_closest_can_disagree() {
        let build = || {
            vec![
                with_head("routes/__layout.tsx", head(Some("Outer"), &[])),
                with_head("routes/docs/__layout.tsx", head(Some("Docs"), &[])),
                derive_route("routes/docs/intro.tsx", "routes", None),
            ]
        };

        let mut first = build();
        merge_metadata_with(&mut first, LayoutSelection::FirstMatch);
        assert_eq!(title_of(&first[2]), Some("Outer"));

        let mut closest = build();
        merge_metadata_with(&mut closest, LayoutSelection::Closest);
        assert_eq!(title_of(&closest[2]), Some("Docs"));
    }
}
