//! `infleval report show|export`: the report view rendered to the terminal.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::Subcommand;

use infleval_client::{ReportState, ReportView};
use infleval_core::{
    CsvExport, ExportError, RadarPoint, ScoredInfluencer, SortKey, RADAR_DOMAIN_MAX,
};

use crate::App;

const RADAR_BAR_WIDTH: usize = 30;

#[derive(Debug, Subcommand)]
pub(crate) enum ReportCommands {
    /// Show the ranked report and the top performer's radar
    Show {
        /// Brief id (a positive integer)
        brief: Option<String>,
        /// Sort by: trust, auth, rel, res, roas
        #[arg(long, default_value_t = SortKey::Trust)]
        sort: SortKey,
    },
    /// Write the ranked report to a CSV file
    Export {
        /// Brief id (a positive integer)
        brief: Option<String>,
        /// Sort by: trust, auth, rel, res, roas
        #[arg(long, default_value_t = SortKey::Trust)]
        sort: SortKey,
        /// Directory to write into (defaults to `INFLEVAL_EXPORT_DIR`)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

pub(crate) async fn run(app: &App, command: ReportCommands) -> anyhow::Result<()> {
    match command {
        ReportCommands::Show { brief, sort } => {
            let view = load_view(app, brief.as_deref(), sort).await;
            print_report(&view)
        }
        ReportCommands::Export { brief, sort, out } => {
            let view = load_view(app, brief.as_deref(), sort).await;
            fail_on_error(&view)?;
            let dir = out.unwrap_or_else(|| app.config.export_dir.clone());
            let today = chrono::Utc::now().date_naive();
            match export_to_dir(&view, &dir, today)? {
                Some(path) => println!("Wrote {}", path.display()),
                None => println!("Nothing to export yet."),
            }
            Ok(())
        }
    }
}

/// Loads a brief's report into a fresh view and prints it, used after
/// `brief create` and `brief show`.
pub(crate) async fn show_report(
    app: &App,
    raw_brief_id: &str,
    sort: SortKey,
) -> anyhow::Result<()> {
    let view = load_view(app, Some(raw_brief_id), sort).await;
    print_report(&view)
}

async fn load_view(app: &App, raw_brief_id: Option<&str>, sort: SortKey) -> ReportView {
    let mut view = ReportView::new();
    view.set_sort_key(sort);
    view.load(&app.client, raw_brief_id).await;
    view
}

/// Prints the report, or fails with the view's error text.
fn print_report(view: &ReportView) -> anyhow::Result<()> {
    fail_on_error(view)?;
    print!("{}", render_report(view));
    Ok(())
}

fn fail_on_error(view: &ReportView) -> anyhow::Result<()> {
    match view.error() {
        Some(message) => anyhow::bail!("{message}"),
        None => Ok(()),
    }
}

/// Writes the view's CSV into `dir`. Returns `None` without touching the
/// filesystem when there is nothing to export.
pub(crate) fn export_to_dir(
    view: &ReportView,
    dir: &Path,
    date: NaiveDate,
) -> anyhow::Result<Option<PathBuf>> {
    let export = match view.export(date) {
        Ok(export) => export,
        Err(ExportError::NothingToExport) => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    write_export(dir, &export).map(Some)
}

fn write_export(dir: &Path, export: &CsvExport) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .map_err(|e| anyhow::anyhow!("failed to create {}: {e}", dir.display()))?;
    let path = dir.join(&export.filename);
    std::fs::write(&path, export.as_bytes())
        .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))?;
    tracing::info!(path = %path.display(), rows = export.row_count(), "report exported");
    Ok(path)
}

/// Renders whatever state the view is in.
pub(crate) fn render_report(view: &ReportView) -> String {
    let rows = match view.state() {
        ReportState::Idle => return "No brief selected.\n".to_string(),
        ReportState::Loading => return "Loading\u{2026}\n".to_string(),
        ReportState::InvalidBrief | ReportState::Failed(_) => {
            return format!("{}\n", view.error().unwrap_or_default());
        }
        ReportState::Loaded(rows) if rows.is_empty() => return "No data.\n".to_string(),
        ReportState::Loaded(rows) => rows,
    };

    let mut out = String::new();
    if let Some(id) = view.brief_id() {
        let _ = writeln!(
            out,
            "Brief #{id}: {} influencer(s), sorted by {}",
            rows.len(),
            view.sort_key().label()
        );
    }
    out.push_str(&render_table(&view.sorted()));

    if let (Some(top), Some(points)) = (view.top(), view.radar()) {
        let _ = writeln!(out, "\nTop performer: @{}", top.handle);
        out.push_str(&render_radar(&points));
        if !top.top_signals.is_empty() {
            out.push_str("Top signals:\n");
            for signal in &top.top_signals {
                let _ = writeln!(out, "  - {signal}");
            }
        }
    }
    out
}

pub(crate) fn render_table(rows: &[&ScoredInfluencer]) -> String {
    let mut out = format!(
        "{:<24} {:>12} {:>10} {:>10} {:>8} {:>7}\n",
        "Handle", "Authenticity", "Relevance", "Resonance", "ROAS", "Trust"
    );
    for row in rows {
        let handle = format!("@{}", row.handle);
        let roas = format!("\u{d7}{:.2}", row.expected_roas);
        let _ = writeln!(
            out,
            "{handle:<24} {:>12.1} {:>10.1} {:>10.1} {roas:>8} {:>7.1}",
            row.authenticity,
            row.relevance,
            row.resonance,
            row.trust_index,
        );
    }
    out
}

/// One bar per axis, scaled against the chart's fixed domain.
pub(crate) fn render_radar(points: &[RadarPoint]) -> String {
    let mut out = String::new();
    for point in points {
        let filled = bar_cells(point.value);
        let _ = writeln!(
            out,
            "  {:<13} {}{} {:.1}",
            point.axis.label(),
            "#".repeat(filled),
            ".".repeat(RADAR_BAR_WIDTH - filled),
            point.value
        );
    }
    out
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn bar_cells(value: f64) -> usize {
    let ratio = (value / RADAR_DOMAIN_MAX).clamp(0.0, 1.0);
    if ratio.is_nan() {
        return 0;
    }
    (ratio * RADAR_BAR_WIDTH as f64).round() as usize
}
