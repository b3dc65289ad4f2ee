use std::{fmt::Debug, path::PathBuf};

use thiserror::Error;

use crate::utils::downloader_def::downloader::AcquireStage;

pub type EmptyResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;
pub type ResultWithError<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub trait ResultTrait<T, E> {
    fn auto_err(self, desc: &str) -> ResultWithError<T>;
}

impl<T, E> ResultTrait<T, E> for Result<T, E>
where
    E: Debug,
{
    fn auto_err(self, desc: &str) -> ResultWithError<T> {
        match self {
            Ok(t) => Ok(t),
            Err(e) => Err(format!("{desc}: {e:?}").into()),
        }
    }
}

/// Malformed layer version ARN.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected 8 colon-separated segments, found {found}")]
    SegmentCount { found: usize },

    #[error("ARN must start with 'arn', found '{found}'")]
    MissingPrefix { found: String },

    #[error("unknown partition '{found}'")]
    Partition { found: String },

    #[error("expected service 'lambda', found '{found}'")]
    Service { found: String },

    #[error("expected resource type 'layer', found '{found}'")]
    ResourceType { found: String },

    #[error("region is empty")]
    EmptyRegion,

    #[error("region must not contain whitespace, found '{found}'")]
    Region { found: String },

    #[error("account id must be 12 digits, found '{found}'")]
    Account { found: String },

    #[error("invalid layer name '{found}'")]
    Name { found: String },

    #[error("version must be a positive integer, found '{found}'")]
    Version { found: String },
}

/// Failure of the remote layer metadata lookup.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("layer version {arn} not found")]
    NotFound { arn: String },

    #[error("access denied to layer version {arn}: {message}")]
    AccessDenied { arn: String, message: String },

    #[error("Lambda API error: {0}")]
    Service(String),

    #[error("malformed response, field '{field}' is missing or invalid")]
    MalformedResponse { field: &'static str },
}

/// A layer ARN could not be turned into metadata.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// The content location returned by the API is not a valid URL.
#[derive(Error, Debug)]
#[error("invalid content location '{location}': {source}")]
pub struct FormatError {
    pub location: String,
    #[source]
    pub source: url::ParseError,
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("could not write output: {0}")]
    Output(#[from] std::io::Error),
}

/// First failing entry of a batch; the whole batch is abandoned.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Can't diagnose Lambda layer based on the ARN {identifier}: {source}")]
    Entry {
        identifier: String,
        #[source]
        source: LookupError,
    },

    #[error("could not write table: {0}")]
    Output(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded with HTTP {status}")]
    Status { status: u16 },

    #[error("could not write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("could not open archive {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("could not read archive member #{index}: {source}")]
    Member {
        index: usize,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("archive member '{name}' escapes the extraction directory")]
    UnsafePath { name: String },

    #[error("could not write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum AcquireError {
    #[error("Can't prepare export directory {path}: {source}")]
    Destination {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Can't download layer content to {path}: {source}")]
    Download {
        path: PathBuf,
        #[source]
        source: DownloadError,
    },

    #[error("Can't unzip file {path} for exporting layer content: {source}")]
    Extract {
        path: PathBuf,
        #[source]
        source: ExtractError,
    },

    #[error(
        "Can't delete ZIP file {archive} whilst exporting layer content (content was extracted to {extracted}): {source}"
    )]
    Cleanup {
        archive: PathBuf,
        extracted: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AcquireError {
    /// Stage that was running when the acquisition failed.
    pub fn stage(&self) -> AcquireStage {
        match self {
            AcquireError::Destination { .. } => AcquireStage::Idle,
            AcquireError::Download { .. } => AcquireStage::Downloading,
            AcquireError::Extract { .. } => AcquireStage::Extracting,
            AcquireError::Cleanup { .. } => AcquireStage::Extracted,
        }
    }
}

/// Fatal, process-terminating errors.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Need at least one ARN of a Lambda layer, sorry :(")]
    MissingIdentifiers,

    #[error("Can't diagnose Lambda layer based on the ARN {identifier}: {source}")]
    Lookup {
        identifier: String,
        #[source]
        source: LookupError,
    },

    #[error("Can't render provided Lambda layers: {0}")]
    Batch(#[from] BatchError),

    #[error("Can't resolve Lambda layer location: {0}")]
    Render(#[from] RenderError),

    #[error(transparent)]
    Acquire(#[from] AcquireError),

    #[error("Can't write output: {0}")]
    Output(#[from] std::io::Error),
}
