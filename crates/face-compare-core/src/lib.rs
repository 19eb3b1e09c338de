pub mod comparator;
pub mod config;
pub mod error;
pub mod history;
pub mod progress;
pub mod selection;
pub mod session;
pub mod staging;

pub use comparator::{CapturedRun, CommandRunner, ComparisonOutcome, Invocation, SystemRunner};
pub use config::AppConfig;
pub use error::{Error, ErrorCategory};
pub use history::{HistoryEntry, HistoryListing};
pub use progress::{ProgressReporter, SilentReporter};
pub use selection::{SelectionEvent, Slot, SlotUpdate, View};
pub use session::{Session, Submission};
pub use staging::{ClearReport, StagedImage};
