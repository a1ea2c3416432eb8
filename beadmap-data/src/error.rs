//! Errors produced while loading region datasets.

use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised by the loaders.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    /// A dataset the region cannot be drawn without does not exist.
    #[error("required dataset '{dataset}' not found at {path}")]
    MissingRequiredDataset {
        /// Dataset label.
        dataset: String,
        /// Expected location.
        path: Utf8PathBuf,
    },
    /// The source exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Source path.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: io::Error,
    },
    /// The source is not valid GeoJSON.
    #[error("failed to parse {path}: {message}")]
    Parse {
        /// Source path.
        path: Utf8PathBuf,
        /// Parser diagnostic.
        message: String,
    },
    /// The GeoJSON names a coordinate reference the loader cannot convert.
    #[error("unsupported coordinate reference '{crs}' in {path}")]
    UnsupportedCrs {
        /// Source path.
        path: Utf8PathBuf,
        /// CRS name as written in the file.
        crs: String,
    },
    /// A feature carries a geometry the dataset cannot hold.
    #[error("unsupported geometry '{kind}' in {path}")]
    UnsupportedGeometry {
        /// Source path.
        path: Utf8PathBuf,
        /// GeoJSON geometry type.
        kind: String,
    },
    /// Querying the infrastructure database failed.
    #[error("failed to query {path} ({operation}): {source}")]
    Sqlite {
        /// Database path.
        path: Utf8PathBuf,
        /// What the loader was doing.
        operation: &'static str,
        /// Underlying SQLite failure.
        #[source]
        source: rusqlite::Error,
    },
    /// The tabular source is malformed.
    #[error("failed to read table {path}: {source}")]
    Csv {
        /// Table path.
        path: Utf8PathBuf,
        /// Underlying CSV failure.
        #[source]
        source: csv::Error,
    },
    /// The spreadsheet source could not be decoded.
    #[error("failed to read workbook {path}: {source}")]
    Spreadsheet {
        /// Workbook path.
        path: Utf8PathBuf,
        /// Underlying workbook failure.
        #[source]
        source: Box<calamine::Error>,
    },
    /// A region directory could not be listed.
    #[error("failed to list directory {path}: {source}")]
    ReadDirectory {
        /// Directory path.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: io::Error,
    },
}

impl LoadError {
    /// Path of the source that failed.
    #[must_use]
    pub const fn path(&self) -> &Utf8PathBuf {
        match self {
            Self::MissingRequiredDataset { path, .. }
            | Self::Read { path, .. }
            | Self::Parse { path, .. }
            | Self::UnsupportedCrs { path, .. }
            | Self::UnsupportedGeometry { path, .. }
            | Self::Sqlite { path, .. }
            | Self::Csv { path, .. }
            | Self::Spreadsheet { path, .. }
            | Self::ReadDirectory { path, .. } => path,
        }
    }
}
