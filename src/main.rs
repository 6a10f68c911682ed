use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use console::Emoji;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use podlens::analytics::EpisodeAnalytics;
use podlens::config::DEFAULT_DIRECTORY_URL;
use podlens::summary::PodcastSummary;
use podlens::{
    Clients, Config, EpisodeListRequest, EpisodeListResponse, TranscriptRequest,
    TranscriptResponse, fetch_transcript, list_episodes, podcast_detail, search_podcasts, server,
};

// Emoji with fallback for terminals without Unicode support
static MICROPHONE: Emoji<'_, '_> = Emoji("🎙️  ", "");
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "[~] ");
static HEADPHONES: Emoji<'_, '_> = Emoji("🎧 ", "[i] ");
static CHART: Emoji<'_, '_> = Emoji("📊 ", "[#] ");
static SCROLL: Emoji<'_, '_> = Emoji("📜 ", "[t] ");
static FAILURE: Emoji<'_, '_> = Emoji("❌ ", "[!] ");
static GLOBE: Emoji<'_, '_> = Emoji("🌐 ", "[>] ");
static BULLET: Emoji<'_, '_> = Emoji("• ", "- ");

/// Podcast directory and feed aggregator
#[derive(Parser, Debug)]
#[command(name = "podlens")]
#[command(about = "Look up podcasts, merge directory and RSS episode data, and analyze publishing")]
#[command(version)]
struct Cli {
    /// Base URL of the podcast directory API
    #[arg(long, global = true, default_value = DEFAULT_DIRECTORY_URL)]
    directory_url: String,

    /// Timeout in seconds for each upstream request
    #[arg(long, global = true, default_value = "30")]
    timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List a podcast's episodes with publishing analytics
    Episodes {
        /// Directory podcast ID
        #[arg(short, long)]
        podcast_id: Option<String>,

        /// RSS feed URL (discovered from the directory when omitted)
        #[arg(short, long)]
        feed_url: Option<String>,

        /// Maximum number of episodes to show
        #[arg(short, long, default_value = "100")]
        limit: usize,

        /// Number of episodes to skip
        #[arg(short, long, default_value = "0")]
        offset: usize,

        #[command(flatten)]
        output: Output,
    },

    /// Show the detail record for a podcast
    Podcast {
        /// Directory podcast ID
        id: String,

        #[command(flatten)]
        output: Output,
    },

    /// Search the directory for podcasts
    Search {
        /// Search term
        term: String,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,

        #[command(flatten)]
        output: Output,
    },

    /// Look for a transcript on an episode's web page
    Transcript {
        /// Episode ID echoed back in the response
        #[arg(long)]
        id: Option<String>,

        /// Episode web page to scan
        #[arg(long)]
        url: Option<String>,

        /// Episode audio URL
        #[arg(long)]
        audio_url: Option<String>,

        #[command(flatten)]
        output: Output,
    },

    /// Run the HTTP API
    Serve {
        /// Address to bind to
        #[arg(short, long, default_value = "127.0.0.1:3000")]
        bind: SocketAddr,
    },
}

#[derive(Args, Debug)]
struct Output {
    /// Print raw JSON instead of a summary
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config {
            directory_url: self.directory_url.clone(),
            request_timeout: Duration::from_secs(self.timeout),
            ..Default::default()
        };
        if let Command::Serve { bind } = &self.command {
            config.bind = *bind;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "podlens=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.config();
    let clients = config
        .build_clients()
        .context("Failed to set up upstream clients")?;

    match cli.command {
        Command::Episodes {
            podcast_id,
            feed_url,
            limit,
            offset,
            output,
        } => {
            let mut request =
                EpisodeListRequest::from_params(podcast_id.as_deref(), feed_url.as_deref(), None, None)?;
            request.limit = limit;
            request.offset = offset;

            let response = list_episodes(&clients, &request)
                .await
                .context("Failed to fetch episodes")?;
            emit(&response, output.json, print_episodes)?;
        }

        Command::Podcast { id, output } => {
            let summary = podcast_detail(&clients, Some(&id))
                .await
                .context("Failed to fetch podcast details")?;
            match summary {
                Some(summary) => emit(&summary, output.json, print_podcast)?,
                None => {
                    eprintln!("{FAILURE}{}", "Podcast not found".red().bold());
                    std::process::exit(1);
                }
            }
        }

        Command::Search {
            term,
            limit,
            output,
        } => {
            let results = search_podcasts(&clients, Some(&term), limit)
                .await
                .context("Failed to search podcasts")?;
            emit(&results, output.json, |results| {
                println!(
                    "\n{SEARCH}{} results for {}\n",
                    results.len().to_string().cyan(),
                    term.bold()
                );
                for podcast in results {
                    println!(
                        "  {BULLET}{} {} {}",
                        podcast
                            .collection_name
                            .as_deref()
                            .unwrap_or("Untitled")
                            .bold(),
                        podcast.artist_name.as_deref().unwrap_or("").dimmed(),
                        format!("[{}]", podcast.collection_id).cyan()
                    );
                    if let Some(feed_url) = &podcast.feed_url {
                        println!("      {}", feed_url.dimmed());
                    }
                }
            })?;
        }

        Command::Transcript {
            id,
            url,
            audio_url,
            output,
        } => {
            let request =
                TranscriptRequest::from_params(id.as_deref(), url.as_deref(), audio_url.as_deref())?;
            let response = fetch_transcript(&clients, &request)
                .await
                .context("Failed to fetch transcript")?;
            emit(&response, output.json, print_transcript)?;
        }

        Command::Serve { .. } => {
            serve(clients, config.bind).await?;
        }
    }

    Ok(())
}

async fn serve(clients: Clients, bind: SocketAddr) -> Result<()> {
    println!(
        "\n{}{} {}",
        MICROPHONE,
        "podlens".bold().magenta(),
        "- Podcast API".dimmed()
    );
    println!("{GLOBE}Listening on {}\n", format!("http://{bind}").cyan());

    server::serve(clients, bind)
        .await
        .context("HTTP server stopped")
}

/// Print `value` as pretty JSON or through the human-readable printer
fn emit<T: Serialize>(value: &T, json: bool, print: impl FnOnce(&T)) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
        println!("{text}");
    } else {
        print(value);
    }
    Ok(())
}

fn print_episodes(response: &EpisodeListResponse) {
    println!(
        "\n{HEADPHONES}{} episodes from {} (showing {} from offset {})",
        response.total_episodes.to_string().cyan(),
        response.episode_source.to_string().green(),
        response.episodes.len().to_string().cyan(),
        response.offset
    );
    if let Some(feed_url) = &response.feed_url {
        println!("   {}", feed_url.dimmed());
    }
    println!();

    for episode in &response.episodes {
        let date = episode
            .parsed_release_date()
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "----------".to_string());
        println!(
            "  {} {} {}",
            date.dimmed(),
            truncate_title(&episode.title, 60),
            format!("({})", episode.duration_formatted).cyan()
        );
    }

    if let Some(analytics) = &response.analytics {
        print_analytics(analytics);
    }
}

fn print_analytics(analytics: &EpisodeAnalytics) {
    println!("\n{CHART}{}", "Analytics".bold());
    println!(
        "  {BULLET}Publishing: {}",
        analytics.publishing_frequency.to_string().green()
    );
    if let Some(days) = analytics.average_days_between_episodes {
        println!("  {BULLET}Average gap: {days:.1} days");
    }
    println!(
        "  {BULLET}Duration: {} average, {}s to {}s",
        analytics.average_duration_formatted.cyan(),
        analytics.min_duration_seconds,
        analytics.max_duration_seconds
    );
    println!(
        "  {BULLET}Explicit: {} ({})",
        analytics.explicit_episodes, analytics.explicit_percentage
    );
    for (year, count) in &analytics.episodes_by_year {
        println!("  {BULLET}{year}: {count}");
    }
}

fn print_podcast(summary: &PodcastSummary) {
    println!(
        "\n{MICROPHONE}{} {}",
        summary.name.bold().magenta(),
        summary.publisher.as_deref().unwrap_or("").dimmed()
    );
    if let Some(genre) = &summary.categories.primary_genre {
        println!("   {}", genre.cyan());
    }
    if let Some(description) = &summary.description {
        println!("\n{}", description);
    }

    let stats = &summary.stats;
    println!("\n{CHART}{}", "Stats".bold());
    println!("  {BULLET}Episodes: {}", stats.episode_count.to_string().cyan());
    println!(
        "  {BULLET}Publishing: {}",
        stats.publishing_frequency.to_string().green()
    );
    println!("  {BULLET}Language: {}", stats.language);
    if let Some(latest) = &stats.latest_episode_date {
        println!("  {BULLET}Latest episode: {latest}");
    }
    if stats.explicit {
        println!("  {BULLET}{}", "Explicit".red());
    }
    println!(
        "  {BULLET}Estimated weekly listeners: {} ({} confidence)",
        summary
            .estimated_metrics
            .estimated_weekly_listeners
            .to_string()
            .yellow(),
        summary.estimated_metrics.confidence
    );

    if !summary.recent_episodes.is_empty() {
        println!("\n{HEADPHONES}{}", "Recent episodes".bold());
        for episode in &summary.recent_episodes {
            println!(
                "  {BULLET}{} {}",
                truncate_title(&episode.title, 60),
                format!("({})", episode.duration_formatted).cyan()
            );
        }
    }
}

fn print_transcript(response: &TranscriptResponse) {
    match response {
        TranscriptResponse::Available {
            transcript, stats, ..
        } => {
            println!(
                "\n{SCROLL}{} {} words, {} sentences\n",
                "Transcript found:".bold().green(),
                stats.word_count.to_string().cyan(),
                stats.sentence_count.to_string().cyan()
            );
            println!("{transcript}");
        }
        TranscriptResponse::Unavailable {
            message,
            integration_suggestions,
            ..
        } => {
            println!("\n{FAILURE}{}", message.yellow());
            for (name, url) in integration_suggestions {
                println!(
                    "  {BULLET}{} {}",
                    name.bold(),
                    url.as_str().unwrap_or_default().dimmed()
                );
            }
        }
    }
}

fn truncate_title(title: &str, max_chars: usize) -> String {
    if title.chars().count() <= max_chars {
        title.to_string()
    } else {
        let kept: String = title.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
