//! Filesystem helpers built on `cap-std` and `camino`.
//!
//! Directory inspection and creation go through capability handles opened
//! with ambient authority. Artefacts are written to a temporary sibling and
//! renamed into place, so readers never observe a partially written file.
#![forbid(unsafe_code)]

use std::io::{self, Write};
use std::path::Component;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use log::debug;
use thiserror::Error;

/// Errors raised while writing an artefact.
#[derive(Debug, Error)]
pub enum ArtifactWriteError {
    /// The destination has no file name component.
    #[error("artefact path '{path}' has no file name")]
    MissingFileName {
        /// Requested destination.
        path: Utf8PathBuf,
    },
    /// The destination directory could not be created.
    #[error("failed to create directory '{path}'")]
    CreateDirectory {
        /// Directory that could not be created.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: io::Error,
    },
    /// Writing the temporary file failed.
    #[error("failed to write temporary file for '{path}'")]
    Write {
        /// Final destination.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: io::Error,
    },
    /// Renaming the temporary file into place failed.
    #[error("failed to move artefact into place at '{path}'")]
    Persist {
        /// Final destination.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: io::Error,
    },
}

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file.
    File,
    /// A directory.
    Directory,
    /// Anything else.
    Other,
}

/// One entry returned by [`list_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Entry name relative to the listed directory.
    pub name: String,
    /// What the entry is.
    pub kind: EntryKind,
}

/// Open `path` as a directory with ambient authority.
pub fn open_dir(path: &Utf8Path) -> io::Result<fs_utf8::Dir> {
    fs_utf8::Dir::open_ambient_dir(path, ambient_authority())
}

/// Split `path` into its parent directory handle and file name.
pub fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("'{path}' has no file name")))?
        .to_owned();
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    Ok((open_dir(parent)?, name))
}

/// Whether `path` exists and is a regular file.
///
/// A missing parent directory reads as `Ok(false)`.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = match open_dir_and_file(path) {
        Ok(pair) => pair,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };
    match dir.metadata(name.as_str()) {
        Ok(meta) => Ok(meta.is_file()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Whether `path` exists and is a directory.
pub fn dir_is_dir(path: &Utf8Path) -> io::Result<bool> {
    match open_dir(path) {
        Ok(dir) => Ok(dir.dir_metadata()?.is_dir()),
        Err(err) if matches!(err.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
            Ok(false)
        }
        Err(err) => Err(err),
    }
}

/// List the entries of `path`, sorted by name.
pub fn list_dir(path: &Utf8Path) -> io::Result<Vec<DirEntry>> {
    let dir = open_dir(path)?;
    let mut entries = Vec::new();
    for listed in dir.entries()? {
        let entry = listed?;
        let file_type = entry.file_type()?;
        let kind = if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };
        entries.push(DirEntry {
            name: entry.file_name()?,
            kind,
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Create `path` and any missing ancestors.
pub fn ensure_dir(path: &Utf8Path) -> io::Result<()> {
    if path.as_str().is_empty() {
        return Ok(());
    }
    let (base, relative) = split_base(path)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base.create_dir_all(&relative)
}

/// Split a path into an ambient base directory and the remainder below it.
///
/// Absolute paths are anchored at their root (or Windows prefix); relative
/// paths at the current directory.
pub fn split_base(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let mut components = path.as_std_path().components();
    let base = match components.next() {
        Some(Component::Prefix(prefix)) => {
            let prefix_str = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            if matches!(components.clone().next(), Some(Component::RootDir)) {
                components.next();
            }
            Utf8PathBuf::from(prefix_str).join(std::path::MAIN_SEPARATOR_STR)
        }
        Some(Component::RootDir) => Utf8PathBuf::from(std::path::MAIN_SEPARATOR_STR),
        _ => {
            components = path.as_std_path().components();
            Utf8PathBuf::from(".")
        }
    };
    let relative = Utf8PathBuf::from_path_buf(components.as_path().to_path_buf())
        .map_err(|_| io::Error::other("non-UTF-8 path"))?;
    Ok((open_dir(&base)?, relative))
}

/// Write `contents` to `path` atomically.
///
/// Missing parent directories are created. The data goes to a temporary file
/// in the destination directory, is flushed to disk, then renamed over
/// `path`. On failure the temporary file is removed and any previous
/// artefact at `path` is left untouched.
///
/// # Errors
/// Returns [`ArtifactWriteError`] when the directory cannot be created or the
/// file cannot be written or moved into place.
pub fn write_artifact(path: &Utf8Path, contents: &[u8]) -> Result<(), ArtifactWriteError> {
    if path.file_name().is_none() {
        return Err(ArtifactWriteError::MissingFileName {
            path: path.to_owned(),
        });
    }
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    ensure_dir(parent).map_err(|source| ArtifactWriteError::CreateDirectory {
        path: parent.to_owned(),
        source,
    })?;

    let write_error = |source| ArtifactWriteError::Write {
        path: path.to_owned(),
        source,
    };
    let mut temp = tempfile::Builder::new()
        .prefix(".beadmap-")
        .suffix(".tmp")
        .tempfile_in(parent.as_std_path())
        .map_err(write_error)?;
    temp.write_all(contents).map_err(write_error)?;
    temp.as_file().sync_all().map_err(write_error)?;
    temp.persist(path.as_std_path())
        .map_err(|err| ArtifactWriteError::Persist {
            path: path.to_owned(),
            source: err.error,
        })?;
    debug!("Wrote {} bytes to {path}", contents.len());
    Ok(())
}
