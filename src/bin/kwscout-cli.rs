use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use kwscout::analysis::MAX_KEYWORD_IDEAS;
use kwscout::clock::SystemClock;
use kwscout::config::Config;
use kwscout::export::ExportFormat;
use kwscout::models::KeywordAnalysis;
use kwscout::provider::ProviderKind;
use kwscout::storage::open_store;
use kwscout::{KeywordService, ServiceSettings};

#[derive(Parser)]
#[command(name = "kwscout-cli")]
#[command(about = "Keyword research from the command line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a seed keyword
    Analyze {
        keyword: String,
        /// Print the result as json or csv instead of a summary
        #[arg(long)]
        export: Option<ExportFormat>,
    },
    /// Show recent searches
    History {
        /// Remove all history entries
        #[arg(long, conflicts_with = "export")]
        clear: bool,
        /// Print the history as CSV
        #[arg(long)]
        export: bool,
    },
    /// Generate keyword ideas for a seed
    Ideas {
        keyword: String,
        /// Maximum number of ideas
        #[arg(long, default_value_t = MAX_KEYWORD_IDEAS)]
        count: usize,
    },
    /// List saved favorites
    Favorites,
    /// Analyze a keyword and add it to (or remove it from) favorites
    Favorite { keyword: String },
    /// Export a keyword analysis
    Export {
        keyword: String,
        #[arg(long, default_value = "json")]
        format: ExportFormat,
    },
    /// Show the remaining search quota
    Quota {
        /// Restore the full quota
        #[arg(long)]
        replenish: bool,
    },
    /// List data providers
    Providers {
        /// Persist a provider as the active one
        #[arg(long)]
        select: Option<ProviderKind>,
    },
    /// Remove cached analyses and provider responses
    ClearCache,
    /// Remove history and favorites and restore the quota
    Reset {
        /// Wipe every stored key, including caches and the provider preference
        #[arg(long)]
        all: bool,
    },
}

fn print_summary(analysis: &KeywordAnalysis) {
    let metrics = &analysis.metrics;
    println!("Keyword:      {}", metrics.keyword);
    println!("Provider:     {}", analysis.provider);
    println!("Volume:       {}", metrics.search_volume);
    println!(
        "Difficulty:   {} ({})",
        metrics.difficulty, metrics.competition
    );
    println!("CPC:          ${:.2}", metrics.cpc.unwrap_or(0.0));
    let trend: Vec<String> = metrics.trend.iter().map(|p| p.value.to_string()).collect();
    println!("Trend:        {}", trend.join(" "));
    println!("Suggestions:  {}", analysis.suggestions.join(", "));
    println!("Questions:");
    for question in &analysis.questions {
        println!("  - {}", question);
    }
    println!("SERP:");
    for result in &analysis.serp {
        println!("  {:>2}. {:<40} {}", result.rank, result.title, result.url);
    }
}

async fn run(service: &KeywordService, command: Commands) -> Result<()> {
    match command {
        Commands::Analyze { keyword, export } => {
            let analysis = service.search_keyword(&keyword).await?;
            match export {
                Some(format) => println!("{}", service.export(format).await?),
                None => print_summary(&analysis),
            }
        }
        Commands::History { clear, export } => {
            if clear {
                service.clear_history().await?;
                println!("✓ History cleared");
                return Ok(());
            }
            if export {
                println!("{}", service.export_history().await?);
                return Ok(());
            }

            let history = service.history().await;
            if history.is_empty() {
                println!("No searches yet.");
            } else {
                println!("{:<40} {:>10} {:>10}  {}", "Keyword", "Volume", "Difficulty", "When");
                println!("{}", "-".repeat(80));
                for entry in history {
                    let when = chrono::DateTime::from_timestamp_millis(entry.timestamp)
                        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_else(|| "N/A".to_string());
                    println!(
                        "{:<40} {:>10} {:>10}  {}",
                        entry.keyword, entry.volume, entry.difficulty, when
                    );
                }
            }
        }
        Commands::Ideas { keyword, count } => {
            for idea in service.ai_keywords(&keyword, count).await? {
                println!("{}", idea);
            }
        }
        Commands::Favorites => {
            let favorites = service.favorites().await;
            if favorites.is_empty() {
                println!("No favorites saved.");
            } else {
                for fav in favorites {
                    println!(
                        "{:<40} volume {:>6}  difficulty {:>3}",
                        fav.metrics.keyword, fav.metrics.search_volume, fav.metrics.difficulty
                    );
                }
            }
        }
        Commands::Favorite { keyword } => {
            let analysis = service.search_keyword(&keyword).await?;
            let favorites = service.toggle_favorite(analysis).await?;
            if service.is_favorite(&keyword).await {
                println!("✓ Saved '{}' ({} favorites)", keyword.trim(), favorites.len());
            } else {
                println!("✓ Removed '{}' from favorites", keyword.trim());
            }
        }
        Commands::Export { keyword, format } => {
            service.search_keyword(&keyword).await?;
            println!("{}", service.export(format).await?);
        }
        Commands::Quota { replenish } => {
            let remaining = if replenish {
                service.replenish_quota().await?
            } else {
                service.quota().await
            };
            println!("Searches remaining: {}", remaining);
        }
        Commands::Providers { select } => {
            if let Some(kind) = select {
                service.select_provider(kind).await?;
                println!("✓ Provider set to {}", kind);
            }

            let selected = service.selected_provider().await;
            println!("{:<3} {:<18} {:<25} {}", "", "Id", "Name", "Enabled");
            println!("{}", "-".repeat(60));
            for info in service.providers() {
                let marker = if info.kind == selected { "*" } else { "" };
                println!(
                    "{:<3} {:<18} {:<25} {}",
                    marker, info.kind, info.name, info.enabled
                );
            }
        }
        Commands::ClearCache => {
            let removed = service.clear_cache().await?;
            println!("✓ Cleared caches ({} persisted entries removed)", removed);
        }
        Commands::Reset { all } => {
            if all {
                service.clear_all().await?;
                println!("✓ All stored data cleared");
            } else {
                service.reset_data().await?;
                println!("✓ History, favorites, and quota reset");
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kwscout=warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let store = open_store(&config.storage)
        .await
        .context("failed to open keyword storage")?;
    let service = KeywordService::new(store, Arc::new(SystemClock), ServiceSettings::from(&config));

    let result = run(&service, cli.command).await;
    service.shutdown().await;
    result
}
