//! Explicit presence and absence of region datasets.

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};

/// Whether a region can be drawn without a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Absence fails the region.
    Required,
    /// Absence is reported as [`Dataset::Absent`].
    Optional,
}

/// A labelled input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSource {
    /// Human-readable dataset label used in logs and errors.
    pub dataset: String,
    /// Location on disk.
    pub path: Utf8PathBuf,
}

impl DataSource {
    /// Label `path` as `dataset`.
    #[must_use]
    pub fn new(dataset: &str, path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            dataset: dataset.to_owned(),
            path: path.into(),
        }
    }

    /// Borrow the path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.dataset, self.path)
    }
}

/// Why an optional dataset is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbsenceReason {
    /// Nothing exists at the expected path.
    NotFound {
        /// Expected location.
        path: Utf8PathBuf,
    },
    /// The file exists but could not be read or parsed.
    Unreadable {
        /// Source location.
        path: Utf8PathBuf,
        /// Failure description.
        message: String,
    },
    /// No candidate source was configured or discovered.
    NotConfigured,
}

impl fmt::Display for AbsenceReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => write!(f, "not found at {path}"),
            Self::Unreadable { path, message } => write!(f, "unreadable at {path}: {message}"),
            Self::NotConfigured => f.write_str("not configured"),
        }
    }
}

/// A loaded dataset, or the reason it is absent.
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset<T> {
    /// Records read from the source, possibly none.
    Loaded(Vec<T>),
    /// The dataset is missing.
    Absent(AbsenceReason),
}

impl<T> Dataset<T> {
    /// Records when loaded, otherwise an empty slice.
    #[must_use]
    pub fn items(&self) -> &[T] {
        match self {
            Self::Loaded(items) => items,
            Self::Absent(_) => &[],
        }
    }

    /// Consume into the loaded records, empty when absent.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Loaded(items) => items,
            Self::Absent(_) => Vec::new(),
        }
    }

    /// Whether the dataset was loaded and holds at least one record.
    #[must_use]
    pub fn is_available(&self) -> bool {
        !self.items().is_empty()
    }

    /// The absence reason, if any.
    #[must_use]
    pub const fn absence(&self) -> Option<&AbsenceReason> {
        match self {
            Self::Loaded(_) => None,
            Self::Absent(reason) => Some(reason),
        }
    }

    /// Transform loaded records, keeping any absence.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(Vec<T>) -> Vec<U>) -> Dataset<U> {
        match self {
            Self::Loaded(items) => Dataset::Loaded(f(items)),
            Self::Absent(reason) => Dataset::Absent(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn absent_dataset_has_no_items() {
        let dataset: Dataset<u8> = Dataset::Absent(AbsenceReason::NotConfigured);
        assert!(dataset.items().is_empty());
        assert!(!dataset.is_available());
        assert_eq!(dataset.absence(), Some(&AbsenceReason::NotConfigured));
    }

    #[rstest]
    fn empty_loaded_dataset_is_unavailable() {
        let dataset: Dataset<u8> = Dataset::Loaded(Vec::new());
        assert!(!dataset.is_available());
        assert!(dataset.absence().is_none());
    }

    #[rstest]
    fn map_preserves_absence() {
        let reason = AbsenceReason::NotFound {
            path: Utf8PathBuf::from("missing.geojson"),
        };
        let dataset: Dataset<u8> = Dataset::Absent(reason.clone());
        let mapped: Dataset<String> =
            dataset.map(|items| items.iter().map(u8::to_string).collect());
        assert_eq!(mapped.absence(), Some(&reason));
    }
}
