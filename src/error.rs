// src/error.rs
use std::path::PathBuf;

/// 入出力まわりで起こり得るエラー
///
/// ルート解決そのもの (分類・パス導出・統合・階層化) は失敗しない。
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Config(String),

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
