use chrono::{DateTime, Local};
use colored::*;
use face_compare_core::staging::ImageKind;
use face_compare_core::{ClearReport, ComparisonOutcome, HistoryListing};

pub fn print_outcome(outcome: &ComparisonOutcome) {
    println!("{}", "Output Result".bold());
    if outcome.is_success() {
        println!("{}", outcome.text().trim_end());
    } else {
        println!("{}", outcome.text().trim_end().red());
    }
}

pub fn print_history(listing: &HistoryListing) {
    if listing.is_empty() {
        println!("{}", "No images in history.".dimmed());
        return;
    }

    println!("{} ({} images, newest first)", "Image History".bold(), listing.len());
    for (index, entry) in listing.iter().enumerate() {
        let modified: DateTime<Local> = entry.modified.into();
        let kind = entry.image.kind().map_or("?", ImageKind::as_str);
        println!(
            "{:>4}  {}  {:<4}  {}",
            format!("{}", index + 1).cyan(),
            modified.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
            kind,
            entry.path().display()
        );
    }
}

pub fn print_clear_report(report: &ClearReport) {
    println!("Deleted {} history files.", format!("{}", report.deleted).green());
    for (path, err) in &report.failures {
        println!("  {} {}: {}", "failed".red(), path.display(), err);
    }
}
