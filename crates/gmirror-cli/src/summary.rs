use comfy_table::{Cell, Color, Table};
use console::style;

use gmirror_sync::{MirrorOutcome, MirrorReport};

/// Print cloned and failed repos as a table, then the run totals.
pub fn print(report: &MirrorReport) {
    let rows: Vec<_> = report
        .records
        .iter()
        .filter(|r| r.outcome != MirrorOutcome::Skipped)
        .collect();

    if !rows.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["REPO", "STATUS", "DETAIL"]);
        for record in rows {
            let (color, detail) = match &record.outcome {
                MirrorOutcome::Cloned => (Color::Green, record.clone_url.as_str()),
                MirrorOutcome::Failed(message) => (Color::Red, message.as_str()),
                MirrorOutcome::Skipped => (Color::White, ""),
            };
            table.add_row(vec![
                Cell::new(&record.name),
                Cell::new(record.outcome.to_string()).fg(color),
                Cell::new(detail),
            ]);
        }
        println!("{table}");
    }

    let elapsed = report.finished_at - report.started_at;
    println!(
        "\nMirror complete in {}s: {} cloned | {} skipped | {} failed",
        elapsed.num_seconds(),
        style(report.cloned_count()).green(),
        style(report.skipped_count()).dim(),
        style(report.failed_count()).red()
    );
}
