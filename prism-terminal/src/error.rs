//! Error types for the terminal front end

use std::io;
use std::path::PathBuf;

use prism_core::GeometryError;
use thiserror::Error;

/// Failures reading a Wavefront OBJ file
#[derive(Debug, Error)]
pub enum ObjError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: malformed {kind} record")]
    Malformed { line: usize, kind: &'static str },

    #[error("line {line}: vertex index 0 is not valid, OBJ indices start at 1")]
    ZeroIndex { line: usize },

    #[error("line {line}: index {index} is out of range ({vertex_count} vertices so far)")]
    IndexOutOfRange {
        line: usize,
        index: i64,
        vertex_count: usize,
    },

    #[error("line {line}: a face needs at least 3 vertices, found {count}")]
    TooFewVertices { line: usize, count: usize },

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Failures reading the TOML configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Anything that stops the application
#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),

    #[error(transparent)]
    Obj(#[from] ObjError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("none of the {0} models could be loaded")]
    NoModels(usize),

    #[error("{0}")]
    Usage(String),
}
