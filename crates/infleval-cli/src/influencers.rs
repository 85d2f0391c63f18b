//! `infleval influencers add|list`.

use clap::Subcommand;

use infleval_core::{parse_handles, InfluencerInput};

use crate::{api_failure, App};

#[derive(Debug, Subcommand)]
pub(crate) enum InfluencerCommands {
    /// Register handles (comma or space separated, `@` optional)
    Add {
        #[arg(required = true)]
        handles: Vec<String>,
        /// Platform for every handle (defaults to `INFLEVAL_PLATFORM`)
        #[arg(long)]
        platform: Option<String>,
    },
    /// List registered influencers
    List,
}

pub(crate) async fn run(app: &App, command: InfluencerCommands) -> anyhow::Result<()> {
    match command {
        InfluencerCommands::Add { handles, platform } => {
            let platform = platform.unwrap_or_else(|| app.config.platform.clone());
            run_add(app, &handles.join(" "), &platform).await
        }
        InfluencerCommands::List => run_list(app).await,
    }
}

async fn run_add(app: &App, raw: &str, platform: &str) -> anyhow::Result<()> {
    let items = build_inputs(raw, platform);
    if items.is_empty() {
        println!("No handles to add.");
        return Ok(());
    }
    let added = app
        .client
        .add_influencers(&items)
        .await
        .map_err(|e| api_failure(&e, "Failed to add influencers"))?;
    println!("Added {} influencer(s):", added.len());
    for influencer in &added {
        println!("  @{:<24} {}", influencer.handle, influencer.platform);
    }
    Ok(())
}

async fn run_list(app: &App) -> anyhow::Result<()> {
    let influencers = app
        .client
        .list_influencers()
        .await
        .map_err(|e| api_failure(&e, "Failed to load influencers"))?;
    if influencers.is_empty() {
        println!("No influencers yet.");
        return Ok(());
    }
    println!("{:<6} {:<25} Platform", "ID", "Handle");
    for influencer in &influencers {
        let handle = format!("@{}", influencer.handle);
        println!("{:<6} {handle:<25} {}", influencer.id, influencer.platform);
    }
    Ok(())
}

/// Normalized, de-duplicated handles paired with one platform.
pub(crate) fn build_inputs(raw: &str, platform: &str) -> Vec<InfluencerInput> {
    let platform = platform.trim().to_ascii_lowercase();
    parse_handles(raw)
        .into_iter()
        .map(|handle| InfluencerInput::new(handle, platform.clone()))
        .collect()
}
