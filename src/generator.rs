// src/generator.rs
use std::fs;
use std::path::{Path, PathBuf};

use crate::compose::compose;
use crate::config::Options;
use crate::emit::{emit_meta_json, emit_route_file};
use crate::error::{Error, Result};
use crate::merge::merge_metadata_with;
use crate::model::{BuildReport, Composition, RouteDefinition, RouteKind};
use crate::parser::extract_meta;
use crate::resolver::to_slash;
use crate::route_map::{build_structured_map, to_json};
use crate::route_path::{default_error_boundary_route, default_not_found_route, derive_route};
use crate::scaffold::{ensure_default_export, ensure_default_file};
use crate::scan::collect_route_files;

/// 1 回の実行で得られたもの
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub routes: Vec<RouteDefinition>,
    pub composition: Composition,
    pub route_file: String,
    pub meta_json: Option<String>,
    pub route_map_json: Option<String>,
    pub report: BuildReport,
}

/// 探索 → 導出 → メタデータ抽出・統合 → 合成 → 出力 を順に行う
pub struct Generator {
    options: Options,
}

impl Generator {
    pub fn new(options: Options) -> Self {
        Generator { options }
    }

    pub fn run(&self) -> Result<BuildOutput> {
        let opts = &self.options;
        tracing::info!(dir = %opts.route_dir.display(), "starting route generation");

        let mut report = BuildReport::default();
        let mut routes = self.discover(&mut report)?;
        self.add_defaults(&mut routes, &mut report)?;

        merge_metadata_with(&mut routes, opts.meta_inheritance);

        let composition = compose(routes.clone(), opts.default_spinner_path.as_deref());
        let route_file = emit_route_file(&composition, opts.lib);
        let meta_json = match &opts.meta_path {
            Some(_) => Some(emit_meta_json(&routes)?),
            None => None,
        };
        let route_map_json = match &opts.route_map_path {
            Some(_) => Some(to_json(&build_structured_map(&routes))?),
            None => None,
        };

        report.route_count = routes.len();
        if !opts.dry_run {
            write_output(&opts.route_file, &route_file)?;
            report.written.push(opts.route_file.clone());
            for (path, contents) in [
                (&opts.meta_path, &meta_json),
                (&opts.route_map_path, &route_map_json),
            ] {
                if let (Some(path), Some(contents)) = (path, contents) {
                    write_output(path, contents)?;
                    report.written.push(path.clone());
                }
            }
        }

        tracing::info!(routes = report.route_count, written = report.written.len(), "done");
        Ok(BuildOutput {
            routes,
            composition,
            route_file,
            meta_json,
            route_map_json,
            report,
        })
    }

    fn discover(&self, report: &mut BuildReport) -> Result<Vec<RouteDefinition>> {
        let opts = &self.options;
        let base = to_slash(&opts.route_dir);
        let files = collect_route_files(&opts.route_dir, &opts.extensions)?;

        let mut routes = Vec::with_capacity(files.len());
        for file in files {
            let mut route = derive_route(&to_slash(&file), &base, opts.cwd.as_deref());
            if opts.scaffold && !opts.dry_run && ensure_default_export(&file, route.kind)? {
                report.scaffolded.push(file.clone());
            }
            route.meta = extract_meta(&file)?;
            tracing::debug!(route = %route.route_path, kind = %route.kind, file = %route.file_path, "discovered");
            routes.push(route);
        }
        Ok(routes)
    }

    /// 見つからなかった not_found / error を既定のもので補う
    fn add_defaults(&self, routes: &mut Vec<RouteDefinition>, report: &mut BuildReport) -> Result<()> {
        let opts = &self.options;
        let base = to_slash(&opts.route_dir);

        let mut defaults = Vec::new();
        if opts.default_not_found && !routes.iter().any(|r| r.kind == RouteKind::NotFound) {
            defaults.push(default_not_found_route(&base));
        }
        if opts.default_error_boundary && !routes.iter().any(|r| r.kind == RouteKind::Error) {
            defaults.push(default_error_boundary_route(&base));
        }

        for route in defaults {
            if !opts.dry_run && ensure_default_file(&route)? {
                report.scaffolded.push(PathBuf::from(&route.file_path));
            }
            routes.push(route);
        }
        Ok(())
    }
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }
    fs::write(path, contents).map_err(|e| Error::io(path, e))?;
    tracing::info!(file = %path.display(), "wrote");
    Ok(())
}
