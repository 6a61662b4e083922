// src/config.rs
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::emit::WouterLib;
use crate::error::{Error, Result};
use crate::merge::LayoutSelection;

/// 明示されなかったときに探す設定ファイル名
pub const DEFAULT_CONFIG_FILE: &str = "wouter-fs.toml";

/// 設定ファイル (TOML) の内容。すべて省略可能
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub routes: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub meta: Option<PathBuf>,
    pub route_map: Option<PathBuf>,
    pub cwd: Option<PathBuf>,
    pub lib: Option<WouterLib>,
    pub spinner: Option<String>,
    pub default_not_found: Option<bool>,
    pub default_error_boundary: Option<bool>,
    pub meta_inheritance: Option<LayoutSelection>,
    pub extensions: Option<Vec<String>>,
    pub scaffold: Option<bool>,
}

/// コマンドラインで指定された値。設定ファイルより優先する
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub routes: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub meta: Option<PathBuf>,
    pub route_map: Option<PathBuf>,
    pub cwd: Option<PathBuf>,
    pub lib: Option<WouterLib>,
    pub spinner: Option<String>,
    pub default_not_found: bool,
    pub default_error_boundary: bool,
    pub meta_inheritance: Option<LayoutSelection>,
    pub no_scaffold: bool,
    pub dry_run: bool,
}

/// 検証済みの実行オプション
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub route_dir: PathBuf,
    pub route_file: PathBuf,
    pub meta_path: Option<PathBuf>,
    pub route_map_path: Option<PathBuf>,
    pub cwd: Option<PathBuf>,
    pub lib: WouterLib,
    pub default_spinner_path: Option<String>,
    pub default_not_found: bool,
    pub default_error_boundary: bool,
    pub meta_inheritance: LayoutSelection,
    pub extensions: Vec<String>,
    pub scaffold: bool,
    pub dry_run: bool,
}

impl Options {
    /// 設定ファイルの値にコマンドラインの値を重ねて検証する
    pub fn resolve(cli: Overrides, file: FileConfig) -> Result<Self> {
        let route_dir = cli
            .routes
            .or(file.routes)
            .ok_or_else(|| Error::Config("routes directory is not set".into()))?;
        let route_file = cli
            .out
            .or(file.out)
            .ok_or_else(|| Error::Config("output route file is not set".into()))?;

        let extensions = file
            .extensions
            .unwrap_or_else(|| vec!["tsx".to_string(), "jsx".to_string()]);
        if extensions.is_empty() {
            return Err(Error::Config("extensions must not be empty".into()));
        }
        let extensions = extensions
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_string())
            .collect();

        Ok(Options {
            route_dir,
            route_file,
            meta_path: cli.meta.or(file.meta),
            route_map_path: cli.route_map.or(file.route_map),
            cwd: cli.cwd.or(file.cwd),
            lib: cli.lib.or(file.lib).unwrap_or_default(),
            default_spinner_path: cli.spinner.or(file.spinner),
            default_not_found: cli.default_not_found || file.default_not_found.unwrap_or(false),
            default_error_boundary: cli.default_error_boundary
                || file.default_error_boundary.unwrap_or(false),
            meta_inheritance: cli
                .meta_inheritance
                .or(file.meta_inheritance)
                .unwrap_or_default(),
            extensions,
            scaffold: !cli.no_scaffold && file.scaffold.unwrap_or(true),
            dry_run: cli.dry_run,
        })
    }
}

pub fn parse_config(content: &str) -> Result<FileConfig> {
    Ok(toml::from_str(content)?)
}

/// 設定ファイルを読み込む。`path` が None なら既定のファイル名を探し、
/// 無ければ空の設定を返す。
pub fn load_config(path: Option<&Path>) -> Result<FileConfig> {
    let (path, required) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    if !required && !path.exists() {
        return Ok(FileConfig::default());
    }

    let content = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
    let config = parse_config(&content)?;
    tracing::debug!(file = %path.display(), "loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_fields() {
        let config = parse_config(
            r#"
            routes = "src/routes"
            out = "src/routes-core.tsx"
            meta = "src/metadata.json"
            route_map = "src/route-map.json"
            lib = "wouter-preact"
            spinner = "./components/Spinner"
            default_not_found = true
            meta_inheritance = "closest"
            extensions = ["tsx"]
            scaffold = false
            "#,
        )
        .unwrap();

        assert_eq!(config.lib, Some(WouterLib::WouterPreact));
        assert_eq!(config.meta_inheritance, Some(LayoutSelection::Closest));
        assert_eq!(config.scaffold, Some(false));
        assert_eq!(config.routes, Some(PathBuf::from("src/routes")));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(parse_config("route = 'x'"), Err(Error::ConfigParse(_))));
    }

    #[test]
    fn command_line_wins() {
        let file = FileConfig {
            routes: Some("a".into()),
            out: Some("a.tsx".into()),
            lib: Some(WouterLib::WouterPreact),
            default_not_found: Some(true),
            ..Default::default()
        };
        let cli = Overrides {
            routes: Some("b".into()),
            lib: Some(WouterLib::Wouter),
            ..Default::default()
        };
        let options = Options::resolve(cli, file).unwrap();

        assert_eq!(options.route_dir, PathBuf::from("b"));
        assert_eq!(options.route_file, PathBuf::from("a.tsx"));
        assert_eq!(options.lib, WouterLib::Wouter);
        assert!(options.default_not_found);
        assert!(options.scaffold);
        assert_eq!(options.extensions, vec!["tsx", "jsx"]);
        assert_eq!(options.meta_inheritance, LayoutSelection::FirstMatch);
    }

    #[test]
    fn missing_required_values_fail() {
        let err = Options::resolve(Overrides::default(), FileConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let file = FileConfig {
            routes: Some("r".into()),
            out: Some("o".into()),
            extensions: Some(vec![]),
            ..Default::default()
        };
        assert!(Options::resolve(Overrides::default(), file).is_err());
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_config(Some(&missing)).is_err());
    }
}
