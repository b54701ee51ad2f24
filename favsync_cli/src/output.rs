//! Terminal output for sync runs

use std::path::Path;

use colored::{ColoredString, Colorize};
use favsync_core::orchestrator::{RunOutcome, RunReport};
use favsync_core::track::TrackReference;

/// Render a finished run as human-readable text.
pub fn format_report(report: &RunReport) -> String {
    let mut output = String::new();

    let headline = match report.outcome {
        RunOutcome::Complete => "Sync complete".green().bold(),
        RunOutcome::PartialFailure => "Sync finished with unresolved tracks".yellow().bold(),
    };
    output.push_str(&format!("{headline}\n"));

    output.push_str(&format!(
        "  Matched:   {}\n",
        report.matched.to_string().green()
    ));
    output.push_str(&format!(
        "  Unmatched: {}\n",
        colorize_count(report.unmatched, |s| s.yellow())
    ));
    output.push_str(&format!(
        "  Errors:    {}\n",
        colorize_count(report.errored, |s| s.red())
    ));
    if report.cooldowns > 0 {
        output.push_str(&format!("  Cooldowns: {}\n", report.cooldowns));
    }
    if let Some(collection) = report.collection {
        output.push_str(&format!("  Collection: {collection}\n"));
    }
    output.push_str(&format!(
        "  Took: {:.1}s\n",
        report.total_time.as_secs_f64()
    ));

    if let Some(path) = &report.checkpoint {
        output.push_str(&format!(
            "\nUnresolved tracks were checkpointed to {}\nRun {} to retry them\n",
            path.display(),
            "favsync resume".bold()
        ));
    }

    output
}

/// Render the pending checkpoint contents.
pub fn format_pending(tracks: &[TrackReference], path: &Path) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "{} track(s) pending at {}\n",
        tracks.len().to_string().bold(),
        path.display()
    ));
    for track in tracks {
        output.push_str(&format!("  {track}\n"));
    }
    output.push_str(&format!("\nRun {} to finish them\n", "favsync resume".bold()));
    output
}

/// Print a run report to stdout.
pub fn print_report(report: &RunReport) {
    println!();
    print!("{}", format_report(report));
}

fn colorize_count(count: usize, color: fn(&str) -> ColoredString) -> String {
    if count > 0 {
        color(&count.to_string()).to_string()
    } else {
        count.to_string()
    }
}
