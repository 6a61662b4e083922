// src/main.rs

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use wouter_fs::config::{load_config, Options, Overrides};
use wouter_fs::emit::WouterLib;
use wouter_fs::report::{render_forest, render_table};
use wouter_fs::{Generator, LayoutSelection};

/// CLI 引数定義
#[derive(Parser, Debug)]
#[command(
    name = "wouter-fs",
    version,
    about = "ルートディレクトリのファイル配置から wouter のルーター定義を生成する CLI ツール"
)]
struct Cli {
    /// ルートファイルを置いたディレクトリ
    /// 例: `--routes ./src/routes`
    #[arg(short = 'r', long = "routes", value_name = "DIR")]
    routes: Option<PathBuf>,

    /// 生成するルーターモジュール
    #[arg(short = 'o', long = "out", value_name = "FILE")]
    out: Option<PathBuf>,

    /// routePath → メタデータの JSON を書き出す先
    #[arg(long = "meta", value_name = "FILE")]
    meta: Option<PathBuf>,

    /// 親子関係の JSON を書き出す先
    #[arg(long = "route-map", value_name = "FILE")]
    route_map: Option<PathBuf>,

    /// import パスの基準ディレクトリ
    #[arg(long = "cwd", value_name = "DIR")]
    cwd: Option<PathBuf>,

    #[arg(long = "lib", value_enum)]
    lib: Option<WouterLib>,

    /// 遅延ロード時の既定スピナー
    #[arg(long = "spinner", value_name = "PATH")]
    spinner: Option<String>,

    /// __not_found が無ければ既定のものを作る
    #[arg(long)]
    default_not_found: bool,

    /// __error が無ければ既定のものを作る
    #[arg(long)]
    default_error_boundary: bool,

    /// page が継承するレイアウトのメタデータの選び方
    #[arg(long = "meta-inheritance", value_enum)]
    meta_inheritance: Option<LayoutSelection>,

    /// default export の無いファイルを書き換えない
    #[arg(long)]
    no_scaffold: bool,

    /// 何も書き込まずに結果だけ表示する
    #[arg(long)]
    dry_run: bool,

    /// 設定ファイル (既定: ./wouter-fs.toml があれば読む)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            routes: self.routes.clone(),
            out: self.out.clone(),
            meta: self.meta.clone(),
            route_map: self.route_map.clone(),
            cwd: self.cwd.clone(),
            lib: self.lib,
            spinner: self.spinner.clone(),
            default_not_found: self.default_not_found,
            default_error_boundary: self.default_error_boundary,
            meta_inheritance: self.meta_inheritance,
            no_scaffold: self.no_scaffold,
            dry_run: self.dry_run,
        }
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    // 1) CLI 引数と設定ファイルを読み、オプションを確定する
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let file_config = load_config(cli.config.as_deref()).context("loading config")?;
    let options = Options::resolve(cli.overrides(), file_config)?;

    // 2) 生成を実行
    let output = Generator::new(options)
        .run()
        .context("generating routes")?;

    // 3) 結果を標準出力へ
    println!("{}", render_table(&output.routes));
    println!("{}", render_forest(&output.composition));
    if output.report.written.is_empty() {
        print!("{}", output.route_file);
    }
    for path in &output.report.scaffolded {
        tracing::info!(file = %path.display(), "scaffolded");
    }

    Ok(())
}
