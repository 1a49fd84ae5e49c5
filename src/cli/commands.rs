//! Command handlers for the Top Movies CLI
//!
//! Each handler builds the components it needs from the loaded
//! [`AppConfig`], runs them, and prints a human-readable result.

use std::sync::Arc;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::app::{
    FetchOutcome, HttpTransport, ListItem, ListModel, LoadedImage, MovieDetails, ResourceCache,
    ResourceDescriptor, ResourceLoader,
};
use crate::cli::{ConfigArgs, DetailsArgs, ImageArgs, ListArgs};
use crate::config::AppConfig;
use crate::errors::{AppError, FetchResult, Result};

/// Handle the list command
pub async fn handle_list(args: ListArgs, config: &AppConfig) -> Result<()> {
    args.validate().map_err(AppError::generic)?;

    let preview_limit = args.limit.unwrap_or(config.list.preview_limit);
    let mut model = fetch_ranked_list(config, args.api_key.as_deref(), preview_limit).await?;

    if let Some(query) = args.search {
        model.set_search_query(query);
    }

    let view = model.derived_view();
    if view.is_empty() {
        if model.search_query().is_empty() {
            println!("The ranked list is empty");
        } else {
            println!("No titles match {:?}", model.search_query());
        }
        return Ok(());
    }

    if model.search_query().is_empty() {
        println!(
            "Top {} of {} ranked titles:",
            view.len(),
            model.all_items().len()
        );
    } else {
        println!("{} titles match {:?}:", view.len(), model.search_query());
    }
    for item in view {
        println!("{}", format_item(item));
    }
    Ok(())
}

/// Handle the image command
///
/// Loads the same image several times through one loader so the second and
/// later loads are served from the resource cache.
pub async fn handle_image(args: ImageArgs, config: &AppConfig) -> Result<()> {
    args.validate().map_err(AppError::generic)?;

    let transport = Arc::new(HttpTransport::with_config(
        &config.client,
        &config.response_cache,
    )?);
    let cache = Arc::new(ResourceCache::new(&config.image_cache));
    let loader = Arc::new(ResourceLoader::with_config(
        Arc::clone(&transport),
        cache,
        config.loader.clone(),
    ));
    let descriptor = ResourceDescriptor::get(args.url.as_str());

    info!("Loading {} {} time(s)", descriptor, args.repeat);
    let results = if args.concurrent {
        load_concurrently(&loader, &descriptor, args.repeat).await
    } else {
        let mut results = Vec::with_capacity(args.repeat);
        for _ in 0..args.repeat {
            let started = Instant::now();
            let result = loader.load_image(&descriptor).await;
            results.push((result, started.elapsed()));
        }
        results
    };

    let mut last_error = None;
    for (attempt, (result, elapsed)) in results.into_iter().enumerate() {
        match result {
            Ok(image) => println!("Load {}: {} in {:?}", attempt + 1, describe_image(&image), elapsed),
            Err(e) => {
                println!("Load {}: no image ({})", attempt + 1, e);
                last_error = Some(e);
            }
        }
    }

    println!();
    println!("Image cache:    {}", loader.cache().stats().summary());
    if let Some(response_cache) = transport.response_cache() {
        println!("Response cache: {}", response_cache.stats().summary());
    }

    // Report failure only when nothing could be shown
    match last_error {
        Some(e) if loader.cache().is_empty() => Err(e.into()),
        _ => Ok(()),
    }
}

/// Handle the details command
pub async fn handle_details(args: DetailsArgs, config: &AppConfig) -> Result<()> {
    let model =
        fetch_ranked_list(config, args.api_key.as_deref(), config.list.preview_limit).await?;

    let item = model
        .find(&args.id)
        .cloned()
        .ok_or_else(|| AppError::generic(format!("No ranked title with id {}", args.id)))?;
    let details = MovieDetails::new(item);
    let item = details.item();

    println!("{}", item.full_title);
    println!("  Rank:   {}", item.rank);
    println!("  Year:   {}", item.year);
    println!("  Crew:   {}", item.crew);
    println!(
        "  Rating: {} ({} votes)",
        item.rating_value, item.rating_count
    );
    println!("  Poster: {}", item.image_path);
    println!();
    println!("Title character counts:");
    let counts: Vec<String> = details
        .title_frequencies()
        .iter()
        .map(|(c, n)| format!("{}:{}", c, n))
        .collect();
    println!("  {}", counts.join(" "));
    Ok(())
}

/// Handle the config command
pub async fn handle_config(args: ConfigArgs, config: &AppConfig) -> Result<()> {
    if args.init {
        let path = AppConfig::default_config_path()
            .ok_or_else(|| AppError::generic("Could not determine user config directory"))?;
        if AppConfig::write_default(&path).await? {
            println!("📁 Created default configuration file:");
        } else {
            println!("Configuration file already exists:");
        }
        println!("   {}", path.display());
        return Ok(());
    }

    match AppConfig::find_config_file() {
        Some(path) => println!("# Loaded from {}", path.display()),
        None => println!("# No config file found, showing defaults"),
    }
    print!("{}", config.redacted().to_toml()?);
    Ok(())
}

/// Build a list model and run its initial fetch behind a spinner
async fn fetch_ranked_list(
    config: &AppConfig,
    cli_key: Option<&str>,
    preview_limit: usize,
) -> Result<ListModel<HttpTransport>> {
    let api_key = config.resolve_api_key(cli_key)?;
    let transport = Arc::new(HttpTransport::with_config(
        &config.client,
        &config.response_cache,
    )?);

    let mut model =
        ListModel::new(transport, config.list_source(api_key)).with_preview_limit(preview_limit);
    model.observe_changes(|items| debug!("List view now shows {} items", items.len()));

    let spinner = spinner("Fetching ranked list...");
    let started = Instant::now();
    let outcome = model.fetch().await;
    spinner.finish_and_clear();

    match outcome {
        FetchOutcome::Loaded { count } => {
            info!("Fetched {} titles in {:?}", count, started.elapsed());
            Ok(model)
        }
        FetchOutcome::ServerError { message } => Err(AppError::generic(format!(
            "Ranking service refused the request: {}",
            message
        ))),
        FetchOutcome::Failed(e) => {
            warn!("Could not fetch the ranked list: {}", e);
            Err(e.into())
        }
    }
}

/// Run `repeat` background loads and collect their results in completion order
async fn load_concurrently(
    loader: &Arc<ResourceLoader<HttpTransport>>,
    descriptor: &ResourceDescriptor,
    repeat: usize,
) -> Vec<(FetchResult<LoadedImage>, Duration)> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    for _ in 0..repeat {
        let tx = tx.clone();
        let started = Instant::now();
        loader.spawn_load(descriptor.clone(), move |result| {
            // Receiver outlives every sender
            let _ = tx.send((result, started.elapsed()));
        });
    }
    drop(tx);

    let mut results = Vec::with_capacity(repeat);
    while let Some(result) = rx.recv().await {
        results.push(result);
    }
    results
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["◐", "◓", "◑", "◒"]);
    spinner.set_style(style);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

fn format_item(item: &ListItem) -> String {
    // Non-numeric ranks are printed as received
    let rank = item
        .rank_number()
        .map(|n| n.to_string())
        .unwrap_or_else(|| item.rank.clone());
    format!(
        "{:>4}. {} ({})  {}",
        rank, item.title, item.year, item.rating_value
    )
}

fn describe_image(image: &LoadedImage) -> String {
    format!(
        "{:?} {}x{} ({} bytes)",
        image.format(),
        image.width(),
        image.height(),
        image.bytes().len()
    )
}
