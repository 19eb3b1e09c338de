use crate::staging::{ImageKind, StagedImage};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{trace, warn};

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub image: StagedImage,
    pub modified: SystemTime,
}

impl HistoryEntry {
    pub fn path(&self) -> &Path {
        self.image.path()
    }
}

/// Newest first.
pub type HistoryListing = Vec<HistoryEntry>;

/// Read-only view over the staging directory.
#[derive(Debug, Clone)]
pub struct HistoryCatalog {
    dir: PathBuf,
}

impl HistoryCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Fresh snapshot of the staged images, most recently modified first.
    /// Enumeration failures yield an empty listing.
    pub fn list(&self) -> HistoryListing {
        match self.try_list() {
            Ok(listing) => listing,
            Err(err) => {
                warn!("Error reading history directory {}: {}", self.dir.display(), err);
                Vec::new()
            }
        }
    }

    pub fn try_list(&self) -> io::Result<HistoryListing> {
        let mut listing: HistoryListing = Vec::new();

        for entry_result in fs::read_dir(&self.dir)? {
            let path = match entry_result {
                Ok(entry) => entry.path(),
                Err(err) => {
                    warn!("Skipping unreadable entry in {}: {}", self.dir.display(), err);
                    continue;
                }
            };

            if ImageKind::from_path(&path).is_none() {
                trace!("Skipping non-image {}", path.display());
                continue;
            }

            let modified = match fs::metadata(&path) {
                Ok(metadata) if metadata.is_file() => match metadata.modified() {
                    Ok(modified) => modified,
                    Err(err) => {
                        warn!("No modification time for {}: {}", path.display(), err);
                        continue;
                    }
                },
                Ok(_) => continue,
                Err(err) => {
                    warn!("Error getting metadata for {}: {}", path.display(), err);
                    continue;
                }
            };

            listing.push(HistoryEntry {
                image: StagedImage::new(path),
                modified,
            });
        }

        // Timestamped names sort chronologically, which settles equal mtimes.
        listing.sort_by(|a, b| {
            b.modified
                .cmp(&a.modified)
                .then_with(|| b.path().file_name().cmp(&a.path().file_name()))
        });

        Ok(listing)
    }
}
