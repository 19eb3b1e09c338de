use face_compare_core::{ErrorCategory, Session};
use std::io;
use std::path::Path;
use std::process::ExitCode;
use tracing::error;

use crate::prompt;
use crate::render;

/// Exit status for a finished comparison: 0 on success, otherwise one code per failure kind.
pub fn exit_code(category: Option<ErrorCategory>) -> ExitCode {
    match category {
        None => ExitCode::SUCCESS,
        Some(ErrorCategory::InputMissing) => ExitCode::from(2),
        Some(ErrorCategory::Staging) => ExitCode::from(3),
        Some(ErrorCategory::Invocation) => ExitCode::from(4),
        Some(ErrorCategory::Unknown) => ExitCode::FAILURE,
    }
}

pub fn compare(session: &Session, image_one: &Path, image_two: &Path) -> ExitCode {
    let submission = session.submit_comparison(Some(image_one), Some(image_two));
    render::print_outcome(&submission.outcome);
    println!();
    render::print_history(&submission.history);
    exit_code(submission.outcome.category())
}

/// Clear the staging directory, asking first unless `skip_prompt`.
pub fn clear(session: &mut Session, skip_prompt: bool) -> io::Result<()> {
    if !skip_prompt
        && !prompt::confirm_on_terminal("Delete ALL uploaded images from history?")?
    {
        println!("Nothing deleted.");
        return Ok(());
    }

    match session.clear_history() {
        Ok(report) => render::print_clear_report(&report),
        Err(err) => error!("Could not read {}: {}", session.upload_dir().display(), err),
    }
    Ok(())
}
