use crate::error::Error;
use chrono::{DateTime, Local};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpg,
    Jpeg,
    Webp,
}

impl ImageKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "png" => Some(ImageKind::Png),
            "jpg" => Some(ImageKind::Jpg),
            "jpeg" => Some(ImageKind::Jpeg),
            "webp" => Some(ImageKind::Webp),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ImageKind::Png => "png",
            ImageKind::Jpg => "jpg",
            ImageKind::Jpeg => "jpeg",
            ImageKind::Webp => "webp",
        }
    }
}

/// A file living directly in the staging directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedImage {
    path: PathBuf,
}

impl StagedImage {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }

    pub fn kind(&self) -> Option<ImageKind> {
        ImageKind::from_path(&self.path)
    }
}

/// Result of a best-effort clear. `failures` holds every entry that could not be removed.
#[derive(Debug, Default)]
pub struct ClearReport {
    pub deleted: usize,
    pub failures: Vec<(PathBuf, io::Error)>,
}

impl ClearReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Owns the staging directory: the only component that creates or deletes files in it.
#[derive(Debug, Clone)]
pub struct StagingStore {
    dir: PathBuf,
}

impl StagingStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Like [`StagingStore::new`] but creates the directory if absent.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, Error> {
        let store = Self::new(dir);
        fs::create_dir_all(&store.dir)?;
        debug!("Staging directory ready at {}", store.dir.display());
        Ok(store)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether `path` names an entry under the staging directory.
    ///
    /// Only the parent is canonicalized, so a symlink living in the staging directory
    /// counts as staged even when its target is elsewhere.
    pub fn contains(&self, path: &Path) -> bool {
        let (Some(parent), Some(file_name)) = (path.parent(), path.file_name()) else {
            return false;
        };
        let parent = if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        };
        match (fs::canonicalize(parent), fs::canonicalize(&self.dir)) {
            (Ok(parent), Ok(dir)) => {
                parent.join(file_name).starts_with(dir) && fs::symlink_metadata(path).is_ok()
            }
            _ => false,
        }
    }

    /// Copy `input` into the staging directory under a fresh timestamped name.
    /// Inputs already under the staging directory are returned unchanged.
    pub fn stage(&self, input: &Path) -> Result<StagedImage, Error> {
        if self.contains(input) {
            trace!("{} is already staged", input.display());
            return Ok(StagedImage::new(input.to_path_buf()));
        }

        let mut reader = File::open(input).map_err(|source| Error::Staging {
            path: input.to_path_buf(),
            source,
        })?;
        let extension = input.extension().map(|e| e.to_string_lossy().into_owned());

        loop {
            let target = self
                .dir
                .join(staged_file_name(Local::now(), extension.as_deref()));

            // create_new guarantees an existing staged file is never overwritten
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&target) {
                Ok(file) => file,
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                    trace!("{} already exists, retrying", target.display());
                    continue;
                }
                Err(source) => return Err(Error::Staging { path: target, source }),
            };

            if let Err(source) = io::copy(&mut reader, &mut file) {
                drop(file);
                let _ = fs::remove_file(&target);
                return Err(Error::Staging { path: target, source });
            }

            debug!("Staged {} as {}", input.display(), target.display());
            return Ok(StagedImage::new(target));
        }
    }

    /// Delete every regular file and symlink directly inside the staging directory.
    /// Subdirectories are left alone. Individual failures don't stop the sweep.
    pub fn clear(&self) -> Result<ClearReport, Error> {
        self.clear_with(|path| fs::remove_file(path))
    }

    fn clear_with<F>(&self, mut remove: F) -> Result<ClearReport, Error>
    where
        F: FnMut(&Path) -> io::Result<()>,
    {
        let mut report = ClearReport::default();

        for entry_result in fs::read_dir(&self.dir)? {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(err) => {
                    error!("Error reading entry in {}: {}", self.dir.display(), err);
                    report.failures.push((self.dir.clone(), err));
                    continue;
                }
            };

            let path = entry.path();
            let file_type = match fs::symlink_metadata(&path) {
                Ok(metadata) => metadata.file_type(),
                Err(err) => {
                    error!("Error getting metadata for {}: {}", path.display(), err);
                    report.failures.push((path, err));
                    continue;
                }
            };

            if !(file_type.is_file() || file_type.is_symlink()) {
                continue;
            }

            match remove(&path) {
                Ok(()) => {
                    trace!("Deleted {}", path.display());
                    report.deleted += 1;
                }
                Err(err) => {
                    error!("Error deleting {}: {}", path.display(), err);
                    report.failures.push((path, err));
                }
            }
        }

        Ok(report)
    }
}

/// `YYYYMMDD_HHMMSS_<microseconds>[.<ext>]`
pub fn staged_file_name(now: DateTime<Local>, extension: Option<&str>) -> String {
    let timestamp = now.format("%Y%m%d_%H%M%S_%6f");
    match extension {
        Some(ext) if !ext.is_empty() => format!("{}.{}", timestamp, ext),
        _ => timestamp.to_string(),
    }
}
