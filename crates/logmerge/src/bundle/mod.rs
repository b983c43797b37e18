//! Bundle — locate the server logs inside an exported JAMF Cloud log folder
//! or zip archive.
//!
//! Expected layout (optionally wrapped in one top-level folder):
//!
//! ```text
//! <bundle>/
//!   primary/JAMFSoftwareServer/JAMFSoftwareServer_*.log
//!   secondary/JAMFSoftwareServer/JAMFSoftwareServer_*.log
//! ```

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use thiserror::Error;
use tracing::{debug, info, warn};
use zip::result::ZipError;
use zip::ZipArchive;

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("Bundle not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("{} is not a valid zip bundle: {source}", path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: ZipError,
    },

    #[error("{role} log not found under {}", dir.display())]
    MissingLog { role: &'static str, dir: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Node folders searched, in merge order.
pub const NODES: [&str; 2] = ["primary", "secondary"];

const SERVER_DIR: &str = "JAMFSoftwareServer";

/// Server logs found in a bundle.
///
/// For an archive bundle this owns the extraction directory, which is removed
/// when the bundle is dropped. Keep it alive until the logs have been read.
#[derive(Debug)]
pub struct Bundle {
    logs: Vec<PathBuf>,
    extracted: Option<TempDir>,
}

impl Bundle {
    /// Primary then secondary server log.
    pub fn logs(&self) -> &[PathBuf] {
        &self.logs
    }

    pub fn is_extracted(&self) -> bool {
        self.extracted.is_some()
    }
}

impl Drop for Bundle {
    fn drop(&mut self) {
        if let Some(dir) = self.extracted.take() {
            let path = dir.path().to_path_buf();
            match dir.close() {
                Ok(()) => debug!(dir = %path.display(), "removed extracted bundle"),
                Err(e) => warn!(dir = %path.display(), "failed to remove extracted bundle: {}", e),
            }
        }
    }
}

/// Find the primary and secondary server logs of the bundle at `path`, a
/// folder or a zip archive.
pub fn discover(path: &Path) -> Result<Bundle, BundleError> {
    if path.is_file() {
        let extracted = extract(path)?;
        let logs = server_logs(extracted.path())?;
        return Ok(Bundle {
            logs,
            extracted: Some(extracted),
        });
    }
    if !path.is_dir() {
        return Err(BundleError::NotFound(path.to_path_buf()));
    }

    Ok(Bundle {
        logs: server_logs(path)?,
        extracted: None,
    })
}

/// Unpack `archive` into a fresh temporary directory.
fn extract(archive: &Path) -> Result<TempDir, BundleError> {
    let file = File::open(archive).map_err(|source| BundleError::Io {
        path: archive.to_path_buf(),
        source,
    })?;
    let zip_err = |source| BundleError::Archive {
        path: archive.to_path_buf(),
        source,
    };
    let mut zip = ZipArchive::new(file).map_err(zip_err)?;

    let dir = tempfile::Builder::new()
        .prefix("logmerge-")
        .tempdir()
        .map_err(|source| BundleError::Io {
            path: std::env::temp_dir(),
            source,
        })?;
    zip.extract(dir.path()).map_err(zip_err)?;

    info!(
        archive = %archive.display(),
        dir = %dir.path().display(),
        files = zip.len(),
        "extracted log bundle"
    );
    Ok(dir)
}

fn server_logs(path: &Path) -> Result<Vec<PathBuf>, BundleError> {
    let root = bundle_root(path)?;
    info!(root = %root.display(), "reading log bundle");

    NODES
        .iter()
        .map(|&role| {
            let dir = root.join(role).join(SERVER_DIR);
            match first_log(&dir)? {
                Some(log) => {
                    debug!(role, log = %log.display(), "found server log");
                    Ok(log)
                }
                None => Err(BundleError::MissingLog { role, dir }),
            }
        })
        .collect()
}

/// Descend into a single wrapping folder when the node folders are not at
/// the top level.
fn bundle_root(path: &Path) -> Result<PathBuf, BundleError> {
    if path.join(NODES[0]).is_dir() {
        return Ok(path.to_path_buf());
    }

    let mut dirs = Vec::new();
    let mut others = 0;
    for entry in read_dir(path)? {
        let entry_path = entry.path();
        if entry_path.is_dir() {
            dirs.push(entry_path);
        } else {
            others += 1;
        }
    }

    match (dirs.pop(), dirs.is_empty(), others) {
        (Some(only), true, 0) => Ok(only),
        _ => Ok(path.to_path_buf()),
    }
}

/// Alphabetically first `*.log` file directly inside `dir`.
fn first_log(dir: &Path) -> Result<Option<PathBuf>, BundleError> {
    if !dir.is_dir() {
        return Ok(None);
    }

    let mut logs: Vec<PathBuf> = read_dir(dir)?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "log"))
        .collect();
    logs.sort();
    Ok(logs.into_iter().next())
}

fn read_dir(dir: &Path) -> Result<Vec<fs::DirEntry>, BundleError> {
    let io_err = |source| BundleError::Io {
        path: dir.to_path_buf(),
        source,
    };
    fs::read_dir(dir)
        .map_err(io_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_err)
}
