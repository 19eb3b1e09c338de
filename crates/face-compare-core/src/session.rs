use crate::comparator::{CommandRunner, ComparatorInvoker, ComparisonOutcome};
use crate::config::AppConfig;
use crate::error::Error;
use crate::history::{HistoryCatalog, HistoryListing};
use crate::progress::{ProgressReporter, SilentReporter};
use crate::selection::{SelectionCoordinator, SelectionEvent, Slot, SlotUpdate};
use crate::staging::{ClearReport, StagedImage, StagingStore};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Result of a comparison submission, always paired with a fresh listing.
#[derive(Debug)]
pub struct Submission {
    pub outcome: ComparisonOutcome,
    pub history: HistoryListing,
}

/// Composition root. Holds everything one user's interaction needs; nothing is global.
pub struct Session {
    staging: StagingStore,
    history: HistoryCatalog,
    comparator: ComparatorInvoker,
    selection: SelectionCoordinator,
    reporter: Box<dyn ProgressReporter>,
}

impl Session {
    /// Builds a session over `config.upload_dir`, creating the directory if needed.
    pub fn open(config: AppConfig) -> Result<Self, Error> {
        let staging = StagingStore::open(config.upload_dir())?;
        let history = HistoryCatalog::new(staging.dir());
        Ok(Self {
            staging,
            history,
            comparator: ComparatorInvoker::new(config),
            selection: SelectionCoordinator::new(),
            reporter: Box::new(SilentReporter),
        })
    }

    pub fn with_runner(mut self, runner: impl CommandRunner + 'static) -> Self {
        self.comparator = self.comparator.with_runner(runner);
        self
    }

    pub fn with_reporter(mut self, reporter: impl ProgressReporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    pub fn upload_dir(&self) -> &Path {
        self.staging.dir()
    }

    /// Stage both inputs, run the comparator on the staged copies and return the
    /// outcome with the refreshed history.
    pub fn submit_comparison(
        &self,
        image_one: Option<&Path>,
        image_two: Option<&Path>,
    ) -> Submission {
        let (Some(image_one), Some(image_two)) = (present(image_one), present(image_two)) else {
            debug!("Submission rejected, input missing");
            return Submission {
                outcome: Error::InputMissing.into(),
                history: self.list_history(),
            };
        };

        let outcome = match self.stage_pair(image_one, image_two) {
            Ok((one, two)) => {
                self.comparator
                    .compare_with(one.path(), two.path(), self.reporter.as_ref())
            }
            Err(err) => {
                error!("Staging failed: {}", err);
                err.into()
            }
        };

        Submission {
            outcome,
            history: self.list_history(),
        }
    }

    fn stage_pair(&self, one: &Path, two: &Path) -> Result<(StagedImage, StagedImage), Error> {
        Ok((self.stage(one)?, self.stage(two)?))
    }

    fn stage(&self, input: &Path) -> Result<StagedImage, Error> {
        let copied = !self.staging.contains(input);
        let staged = self.staging.stage(input)?;
        self.reporter
            .on_stage_complete(input, staged.path(), copied);
        Ok(staged)
    }

    pub fn list_history(&self) -> HistoryListing {
        self.history.list()
    }

    /// Best-effort wipe of the staging directory. A selection pointing at a removed
    /// file is dropped.
    pub fn clear_history(&mut self) -> Result<ClearReport, Error> {
        let report = self.staging.clear()?;
        info!(
            "Cleared history: {} deleted, {} failed",
            report.deleted,
            report.failures.len()
        );
        self.reporter
            .on_history_cleared(report.deleted, report.failures.len());

        if self.selection.selected().is_some_and(|path| !path.exists()) {
            self.selection.clear();
        }
        Ok(report)
    }

    /// Select a history entry. Paths that aren't in a fresh listing are rejected and
    /// leave the current selection as it was.
    pub fn select(&mut self, event: SelectionEvent) -> Result<PathBuf, Error> {
        let listed = self
            .list_history()
            .into_iter()
            .map(|entry| entry.image.into_path())
            .find(|listed| {
                *listed == event.path
                    || (self.staging.contains(&event.path)
                        && listed.file_name() == event.path.file_name())
            })
            .ok_or(Error::NotInHistory { path: event.path })?;

        debug!("Selected {}", listed.display());
        self.selection.select(SelectionEvent::new(listed.clone()));
        Ok(listed)
    }

    /// Select the `index`-th entry (0 = newest) of a fresh listing.
    pub fn select_from_history(&mut self, index: usize) -> Option<PathBuf> {
        let entry = self.list_history().into_iter().nth(index)?;
        let path = entry.image.into_path();
        debug!("Selected {}", path.display());
        self.selection.select(SelectionEvent::new(path.clone()));
        Some(path)
    }

    pub fn selected(&self) -> Option<&Path> {
        self.selection.selected()
    }

    pub fn apply_to(&self, slot: Slot) -> SlotUpdate {
        self.selection.apply_to(slot)
    }
}

fn present(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| !p.as_os_str().is_empty())
}
