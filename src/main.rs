use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use fika_finder::api::FikaApi;
use fika_finder::config::{Overrides, Settings};
use fika_finder::demo;
use fika_finder::display::{self, ListingOptions};
use fika_finder::models::{CityCount, Place, SearchResult};
use fika_finder::search::{self, FilterState, PageButton, PageButtonKind, SearchView};

/// Command-line arguments for the fika-finder binary.
#[derive(Debug, Parser)]
#[command(name = "fika-finder", version, about = "Find Swedish fika places")]
struct Cli {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "FIKA_CONFIG_FILE", value_name = "PATH")]
    config_file: Option<PathBuf>,

    /// Override the API base URL.
    #[arg(long = "api-url", value_name = "URL", global = true)]
    api_url: Option<String>,

    /// Override the response cache lifetime (1-1440 minutes).
    #[arg(long = "cache-minutes", value_name = "MINUTES", global = true)]
    cache_minutes: Option<i64>,

    /// Override the log level.
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    log_level: Option<String>,

    /// Query the remote API instead of the built-in catalogue.
    #[arg(long, global = true)]
    remote: bool,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search places by text and filters.
    Search(SearchArgs),
    /// List places in a city.
    City(CityArgs),
    /// List the best-rated places.
    Featured(FeaturedArgs),
    /// Show how many places each city has.
    Cities,
    /// Check that the configured API answers.
    Ping,
}

#[derive(Debug, Args)]
struct SearchArgs {
    /// Free text matched against name, city, description and tags.
    query: Option<String>,
    /// City key, e.g. `malmo`, or `all`.
    #[arg(long)]
    city: Option<String>,
    /// Seating feature tag, e.g. `outdoor_seating`, or `all`.
    #[arg(long)]
    feature: Option<String>,
    /// Specialty tag, e.g. `kanelbullar`, or `all`.
    #[arg(long)]
    specialty: Option<String>,
    #[arg(long, default_value_t = 1)]
    page: usize,
    #[arg(long = "per-page", default_value_t = search::DEFAULT_PER_PAGE)]
    per_page: usize,
}

#[derive(Debug, Args)]
struct CityArgs {
    /// City key; defaults to the configured default city.
    key: Option<String>,
    #[arg(long, default_value_t = ListingOptions::CITY_LIMIT)]
    limit: usize,
    /// Hide descriptions.
    #[arg(long)]
    brief: bool,
}

#[derive(Debug, Args)]
struct FeaturedArgs {
    #[arg(long, default_value_t = ListingOptions::FEATURED_LIMIT)]
    limit: usize,
    /// Only places in this city (built-in catalogue only).
    #[arg(long)]
    city: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let overrides = Overrides {
        api_url: cli.api_url.clone(),
        cache_minutes: cli.cache_minutes,
        log_level: cli.log_level.clone(),
    };
    let settings = Settings::load(cli.config_file.as_deref(), &overrides)
        .context("Failed to load configuration")?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!("Loaded settings: {:?}", settings);

    match &cli.command {
        Command::Search(args) => run_search(&cli, &settings, args).await,
        Command::City(args) => run_city(&cli, &settings, args).await,
        Command::Featured(args) => run_featured(&cli, &settings, args).await,
        Command::Cities => run_cities(&cli, &settings).await,
        Command::Ping => {
            connect(&settings)?
                .ping()
                .await
                .context("Fika API connection failed")?;
            println!("✅ Connection successful!");
            Ok(())
        }
    }
}

fn connect(settings: &Settings) -> Result<FikaApi> {
    FikaApi::from_settings(settings).context("Failed to create API client")
}

fn catalogue() -> Result<Vec<Place>> {
    demo::places().context("Built-in catalogue is corrupt")
}

async fn run_search(cli: &Cli, settings: &Settings, args: &SearchArgs) -> Result<()> {
    let query = args.query.clone().unwrap_or_default();

    if cli.remote {
        let city = args
            .city
            .as_deref()
            .and_then(search::state::active)
            .map(search::canonical_city)
            .unwrap_or_default();
        for (flag, set) in [
            ("--feature", args.feature.is_some()),
            ("--specialty", args.specialty.is_some()),
            ("--page", args.page != 1),
        ] {
            if set {
                warn!("{} is not supported by the remote search and is ignored", flag);
            }
        }
        info!("Searching fika API for {:?} in {:?}", query, city);
        let result = connect(settings)?
            .search_places(&query, &city)
            .await
            .context("Failed to search places")?;
        return print_result(cli, &remote_search_title(&query, &city), &result);
    }

    let attributes = [
        ("query", query.as_str()),
        ("city", args.city.as_deref().unwrap_or_default()),
        ("feature", args.feature.as_deref().unwrap_or_default()),
        ("specialty", args.specialty.as_deref().unwrap_or_default()),
    ];
    let mut state = FilterState::from_attributes(attributes);
    state.page = args.page.max(1);

    let places = catalogue()?;
    match search::run(&places, &state, args.per_page) {
        SearchView::Default => print_default(cli, &places),
        SearchView::Results {
            title,
            result,
            buttons,
        } => {
            print_result(cli, &title, &result)?;
            if !cli.json {
                print_buttons(&buttons);
            }
            Ok(())
        }
    }
}

async fn run_city(cli: &Cli, settings: &Settings, args: &CityArgs) -> Result<()> {
    let key = args.key.clone().unwrap_or_else(|| settings.default_city.clone());
    let limit = args.limit.max(1);

    if cli.remote {
        let result = connect(settings)?
            .city_places(&key, limit)
            .await
            .context("Failed to load city places")?;
        let title = format!("Places in {}", search::canonical_city(&key));
        return print_result(cli, &title, &result);
    }

    let places = catalogue()?;
    let state = FilterState::from_attributes([("city", key.as_str())]);
    match search::run(&places, &state, limit) {
        SearchView::Default => print_default(cli, &places),
        SearchView::Results { title, result, .. } => {
            let options = ListingOptions::city(key.as_str())
                .with_attributes([("show_description", if args.brief { "false" } else { "true" })]);
            print_listing(cli, &title, &result, &options)
        }
    }
}

async fn run_featured(cli: &Cli, settings: &Settings, args: &FeaturedArgs) -> Result<()> {
    let limit = args.limit.max(1);
    let result = if cli.remote {
        connect(settings)?
            .featured_places(limit)
            .await
            .context("Failed to load featured places")?
    } else {
        let city = args.city.as_deref().map(search::canonical_city);
        SearchResult::single_page(search::featured(&catalogue()?, city.as_deref(), limit))
    };
    print_listing(cli, "Featured fika places", &result, &ListingOptions::featured())
}

async fn run_cities(cli: &Cli, settings: &Settings) -> Result<()> {
    let cities: Vec<CityCount> = if cli.remote {
        connect(settings)?
            .cities()
            .await
            .context("Failed to load cities")?
    } else {
        search::city_counts(&catalogue()?)
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&cities)?);
    } else {
        for entry in &cities {
            println!("{} ({})", entry.city, entry.count);
        }
    }
    Ok(())
}

fn remote_search_title(query: &str, city: &str) -> String {
    match query.trim() {
        "" => format!("Places in {}", city),
        query => format!("Search results for \"{}\"", query),
    }
}

fn print_default(cli: &Cli, places: &[Place]) -> Result<()> {
    let featured = search::featured(places, None, ListingOptions::FEATURED_LIMIT);
    print_listing(
        cli,
        "Featured fika places",
        &SearchResult::single_page(featured),
        &ListingOptions::featured(),
    )
}

fn print_result(cli: &Cli, title: &str, result: &SearchResult) -> Result<()> {
    let options = ListingOptions {
        description_chars: display::DESCRIPTION_PREVIEW_CHARS,
        ..ListingOptions::featured()
    };
    print_listing(cli, title, result, &options)
}

fn print_listing(
    cli: &Cli,
    title: &str,
    result: &SearchResult,
    options: &ListingOptions,
) -> Result<()> {
    if cli.json {
        let out = json!({
            "title": title,
            "result": result,
            "pagination": search::window(result.page, result.pages),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{} ({} results)\n", title, result.total);
    if result.is_empty() {
        println!("No fika places found. Try a different search term or browse by city.");
        return Ok(());
    }
    for (i, place) in result.places.iter().enumerate() {
        println!("{}. {}", i + 1, display::card(place, options));
        println!();
    }
    Ok(())
}

fn print_buttons(buttons: &[PageButton]) {
    if buttons.is_empty() {
        return;
    }
    let labels: Vec<String> = buttons
        .iter()
        .map(|button| match button.kind {
            PageButtonKind::Previous if button.disabled => "(← Previous)".to_string(),
            PageButtonKind::Previous => "← Previous".to_string(),
            PageButtonKind::Next if button.disabled => "(Next →)".to_string(),
            PageButtonKind::Next => "Next →".to_string(),
            PageButtonKind::Number if button.active => format!("[{}]", button.page),
            PageButtonKind::Number => button.page.to_string(),
        })
        .collect();
    println!("{}", labels.join("  "));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_title_names_the_city_without_a_query() {
        assert_eq!(remote_search_title("  ", "Malmö"), "Places in Malmö");
        assert_eq!(remote_search_title(" bullar ", "Malmö"), "Search results for \"bullar\"");
    }

    #[test]
    fn remote_flags_parse() {
        let cli = Cli::try_parse_from([
            "fika-finder",
            "--remote",
            "search",
            "--city",
            "malmo",
            "--feature",
            "wifi",
        ])
        .unwrap();
        assert!(cli.remote);
        let Command::Search(args) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.feature.as_deref(), Some("wifi"));
        assert_eq!(args.query, None);
    }
}
