//! Output formatting for CLI commands

use foliosync_sync::events::SyncReport;

/// How command results are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Human,
    /// Machine-readable JSON
    Json,
}

/// Prints a sync report in the selected format.
pub fn print_report(report: &SyncReport, format: OutputFormat) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(report) {
            Ok(json) => println!("{json}"),
            Err(err) => eprintln!("Failed to serialize report: {err}"),
        },
        OutputFormat::Human => {
            println!("Sync finished in {} ms", report.duration_ms);
            println!("  groups created:    {}", report.groups_created);
            println!("  photosets created: {}", report.photosets_created);
            println!("  photos uploaded:   {}", report.photos_uploaded);
            println!("  photos replaced:   {}", report.photos_replaced);
            if report.errors.is_empty() {
                println!("  errors:            none");
            } else {
                println!("  errors:            {}", report.errors.len());
                for error in &report.errors {
                    println!("    - {error}");
                }
            }
        }
    }
}
