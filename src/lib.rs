//! ファイル配置の規約からルーティング表と合成済みのビューツリーを作る。
//!
//! ```text
//! ファイル一覧
//!   → classify / derive_route   (RouteDefinition)
//!   → extract_meta              (生のメタデータ)
//!   → merge_metadata            (page ごとの実効メタデータ)
//!   → compose                   (ラッパー連鎖 + レイアウト階層)
//!   → emit_route_file           (ルーターモジュールのソース)
//!
//! build_structured_map は同じ RouteDefinition の列から独立に作る。
//! ```

pub mod classify;
pub mod compose;
pub mod config;
pub mod emit;
pub mod error;
pub mod generator;
pub mod hierarchy;
pub mod merge;
pub mod model;
pub mod parser;
pub mod prefix_index;
pub mod report;
pub mod resolver;
pub mod route_map;
pub mod route_path;
pub mod scaffold;
pub mod scan;
pub mod wrappers;

pub use classify::classify;
pub use compose::{component_name, compose};
pub use error::{Error, Result};
pub use generator::{BuildOutput, Generator};
pub use hierarchy::{build_hierarchy, find_closest_layout};
pub use merge::{merge_metadata, merge_metadata_with, LayoutSelection};
pub use model::*;
pub use parser::extract_meta;
pub use route_map::build_structured_map;
pub use route_path::derive_route;
pub use wrappers::resolve_wrappers;
