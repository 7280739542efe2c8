use std::path::PathBuf;

/// Central error type for gmirror.
#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    #[error("missing argument: {name}")]
    MissingArgument { name: String },

    #[error("invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("failed to fetch catalog from {url}: {message}")]
    Transport { url: String, message: String },

    #[error("failed to decode catalog: {message}")]
    Decode { message: String },

    #[error("failed to create directory {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid repository name: {name:?}")]
    InvalidName { name: String },

    #[error("clone of {name} failed: {message}")]
    Clone { name: String, message: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
