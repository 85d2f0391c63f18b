//! `infleval brief list|show|create`.

use clap::Subcommand;

use infleval_core::{Brief, BriefId, BriefInput, KpiWeights, SortKey};

use crate::report::show_report;
use crate::{api_failure, App};

#[derive(Debug, Subcommand)]
pub(crate) enum BriefCommands {
    /// List saved briefs
    List,
    /// Show a brief and its report
    Show {
        /// Brief id (a positive integer)
        id: BriefId,
        #[arg(long, default_value_t = SortKey::Trust)]
        sort: SortKey,
    },
    /// Create a brief, then show its report
    Create {
        #[arg(long)]
        brand: String,
        /// Comma-separated keywords
        #[arg(long, default_value = "")]
        keywords: String,
        /// KPI weight as `name=value` with value in [0, 1]; repeatable.
        /// Names: authenticity, relevance, resonance, return
        #[arg(long = "weight", value_parser = parse_weight)]
        weights: Vec<(String, f64)>,
    },
}

pub(crate) async fn run(app: &App, command: BriefCommands) -> anyhow::Result<()> {
    match command {
        BriefCommands::List => run_list(app).await,
        BriefCommands::Show { id, sort } => run_show(app, id, sort).await,
        BriefCommands::Create {
            brand,
            keywords,
            weights,
        } => run_create(app, &brand, &keywords, &weights).await,
    }
}

async fn run_list(app: &App) -> anyhow::Result<()> {
    let briefs = app
        .client
        .list_briefs()
        .await
        .map_err(|e| api_failure(&e, "Failed to load briefs"))?;
    if briefs.is_empty() {
        println!("No briefs found yet.");
        return Ok(());
    }
    println!("{:<6} {:<24} Keywords", "ID", "Brand");
    for brief in &briefs {
        println!("{:<6} {:<24} {}", brief.id, brief.brand, keyword_summary(brief));
    }
    Ok(())
}

async fn run_show(app: &App, id: BriefId, sort: SortKey) -> anyhow::Result<()> {
    let brief = app
        .client
        .get_brief(id)
        .await
        .map_err(|e| api_failure(&e, "Failed to load brief"))?;
    println!("Brief #{}: {}", brief.id, brief.brand);
    println!("Keywords: {}", keyword_summary(&brief));
    if !brief.kpi_weights.is_empty() {
        let weights = brief
            .kpi_weights
            .iter()
            .map(|(name, value)| format!("{name}={value:.2}"))
            .collect::<Vec<_>>()
            .join(", ");
        println!("Weights:  {weights}");
    }
    println!();
    show_report(app, &id.to_string(), sort).await
}

async fn run_create(
    app: &App,
    brand: &str,
    keywords: &str,
    weights: &[(String, f64)],
) -> anyhow::Result<()> {
    let kpi_weights = build_weights(weights)?;
    let input = BriefInput::new(brand, keywords, kpi_weights)?;
    println!(
        "Weight sum: {:.2} (the backend normalizes weights)",
        kpi_weights.sum()
    );

    let brief = app
        .client
        .create_brief(&input)
        .await
        .map_err(|e| api_failure(&e, "Failed to create brief"))?;
    println!("Created brief #{} for {}.", brief.id, brief.brand);
    println!();
    show_report(app, &brief.id.to_string(), SortKey::default()).await
}

fn keyword_summary(brief: &Brief) -> String {
    if brief.keywords.is_empty() {
        "no keywords".to_string()
    } else {
        brief.keywords.join(", ")
    }
}

/// Applies `name=value` overrides on top of the default weights.
pub(crate) fn build_weights(overrides: &[(String, f64)]) -> anyhow::Result<KpiWeights> {
    let mut weights = KpiWeights::default();
    for (name, value) in overrides {
        if !weights.set(name, *value) {
            anyhow::bail!(
                "unknown KPI weight '{name}' (expected one of: {})",
                KpiWeights::NAMES.join(", ")
            );
        }
    }
    Ok(weights)
}

pub(crate) fn parse_weight(raw: &str) -> Result<(String, f64), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("weight '{}' is not a number", value.trim()))?;
    Ok((name.trim().to_ascii_lowercase(), value))
}
