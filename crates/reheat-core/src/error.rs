use std::path::PathBuf;
use thiserror::Error;

/// Core error type for reheat operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to parse the bundler `entry` value: expected a string, an array of strings, a keyed map, or a factory, found {found}")]
    UnrecognizedEntry { found: &'static str },

    #[error("A dynamic entry cannot be rendered back to JSON")]
    DynamicNotSerializable,

    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
