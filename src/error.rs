/*!
Error types for each stage of the map generation pipeline.

Mirrors the teacher's hand-rolled `ParserError`: one enum per failing stage,
each implementing [`std::error::Error`] and [`Display`], with a top-level
[`GenerateError`] that wraps whichever stage failed. There is no per-record
recovery; any fetch or decode error aborts the whole generation (spec §7).
*/
use std::fmt::{self, Display, Formatter};
use std::io;

/// Failure to retrieve or decompress one of the two RIB dumps.
#[derive(Debug)]
pub enum FetchError {
    Request { url: String, source: reqwest::Error },
    BadStatus { url: String, status: u16 },
    Decompress { url: String, source: io::Error },
    Dns { server: String, detail: String },
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Request { url, source } => write!(f, "fetch {url} failed: {source}"),
            FetchError::BadStatus { url, status } => {
                write!(f, "fetch {url} failed: unexpected status {status}")
            }
            FetchError::Decompress { url, source } => {
                write!(f, "decompress {url} failed: {source}")
            }
            FetchError::Dns { server, detail } => {
                write!(f, "dns server {server} failed: {detail}")
            }
        }
    }
}

impl std::error::Error for FetchError {}

/// Failure while stream-parsing an MRT blob.
#[derive(Debug)]
pub enum DecodeError {
    ShortRead(String),
    InvalidPrefixLength(u8),
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::ShortRead(s) => write!(f, "short read: {s}"),
            DecodeError::InvalidPrefixLength(n) => write!(f, "invalid prefix length: {n}"),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Failure loading or parsing the pipeline's JSON config file.
#[derive(Debug)]
pub enum ConfigError {
    Read { path: String, source: io::Error },
    Parse { path: String, source: serde_json::Error },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => write!(f, "failed to read {path}: {source}"),
            ConfigError::Parse { path, source } => write!(f, "failed to parse {path}: {source}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Failure writing the serialized snapshot to disk. Non-fatal: the in-memory
/// swap still proceeds (spec §7).
#[derive(Debug)]
pub struct PublishError(pub io::Error);

impl Display for PublishError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "failed to write snapshot to disk: {}", self.0)
    }
}

impl std::error::Error for PublishError {}

/// Top-level error for a full generation run.
#[derive(Debug)]
pub enum GenerateError {
    Fetch(FetchError),
    Decode(DecodeError),
}

impl Display for GenerateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::Fetch(e) => write!(f, "generation aborted: {e}"),
            GenerateError::Decode(e) => write!(f, "generation aborted: {e}"),
        }
    }
}

impl std::error::Error for GenerateError {}

impl From<FetchError> for GenerateError {
    fn from(e: FetchError) -> Self {
        GenerateError::Fetch(e)
    }
}

impl From<DecodeError> for GenerateError {
    fn from(e: DecodeError) -> Self {
        GenerateError::Decode(e)
    }
}
