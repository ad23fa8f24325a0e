mod cli;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

use subscout::config::{self, Config};
use subscout::engine::{EngineOptions, SubtitleEngine};
use subscout::provider::opensubtitles::OpenSubtitlesProvider;
use subscout::provider::ProviderRegistry;
use subscout::scanner;
use subscout::video::VideoKind;
use subscout_common::language;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "subscout=trace,subscout_common=debug,subscout_release=debug".to_string()
        } else {
            "subscout=info,subscout_common=info,subscout_release=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Scan { paths } => scan_paths(&paths, cli.config.as_deref()),
        Commands::List {
            paths,
            languages,
            providers,
            json,
        } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(list_subtitles(
                &paths,
                cli.config.as_deref(),
                &languages,
                &providers,
                json,
            ))
        }
        Commands::Download {
            paths,
            languages,
            providers,
            workers,
            multi,
            force,
        } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(download_subtitles(
                &paths,
                cli.config.as_deref(),
                &languages,
                &providers,
                workers,
                multi,
                force,
            ))
        }
        Commands::Providers => show_providers(cli.config.as_deref()),
        Commands::Languages => {
            for code in language::all_codes() {
                println!("{}", code);
            }
            Ok(())
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("subscout {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Build the provider registry from configuration.
fn build_registry(config: &Config) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    registry.register(Arc::new(OpenSubtitlesProvider::new(
        config.opensubtitles.api_key.clone().unwrap_or_default(),
        config.opensubtitles.username.clone(),
        config.opensubtitles.password.clone(),
    )));
    registry
}

/// Build a configured engine, applying CLI overrides on top of config.
fn build_engine(
    config: &Config,
    options: EngineOptions,
    languages: &[String],
    providers: &[String],
) -> Result<SubtitleEngine> {
    let registry = Arc::new(build_registry(config));
    let mut engine = SubtitleEngine::new(registry, options);

    let languages = if languages.is_empty() {
        &config.languages
    } else {
        languages
    };
    if !languages.is_empty() {
        engine.set_languages(languages)?;
    }

    let providers = if providers.is_empty() {
        &config.providers
    } else {
        providers
    };
    if !providers.is_empty() {
        engine.set_providers(providers)?;
    }

    Ok(engine)
}

fn describe_kind(kind: &VideoKind) -> String {
    match kind {
        VideoKind::Movie { title, year } => match year {
            Some(year) => format!("movie: {title} ({year})"),
            None => format!("movie: {title}"),
        },
        VideoKind::Episode {
            series,
            season,
            episode,
        } => format!("episode: {series} S{season:02}E{episode:02}"),
    }
}

fn scan_paths(paths: &[PathBuf], config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    for path in paths {
        for entry in scanner::scan(path, config.engine.max_depth) {
            println!("{}", entry.video.path().display());
            println!("  {}", describe_kind(entry.video.kind()));

            let mut langs: Vec<&str> = entry
                .existing_languages
                .iter()
                .map(|l| l.as_str())
                .collect();
            langs.sort_unstable();
            if langs.is_empty() && !entry.has_unlabeled {
                println!("  subtitles: none");
            } else {
                let mut parts = langs.join(", ");
                if entry.has_unlabeled {
                    if !parts.is_empty() {
                        parts.push_str(", ");
                    }
                    parts.push_str("unlabeled");
                }
                println!("  subtitles: {parts}");
            }
        }
    }

    Ok(())
}

async fn list_subtitles(
    paths: &[PathBuf],
    config_path: Option<&Path>,
    languages: &[String],
    providers: &[String],
    json: bool,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let mut engine = build_engine(&config, config.engine_options(), languages, providers)?;

    let listed = engine.list_subtitles(paths).await?;

    if json {
        let report: Vec<serde_json::Value> = listed
            .iter()
            .map(|(video, subtitles)| {
                serde_json::json!({
                    "video": video.path(),
                    "subtitles": subtitles,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if listed.is_empty() {
        println!("No subtitles found.");
        return Ok(());
    }
    for (video, subtitles) in &listed {
        println!("{}", video.path().display());
        for subtitle in subtitles {
            println!("  {}", subtitle.describe());
        }
    }

    Ok(())
}

async fn download_subtitles(
    paths: &[PathBuf],
    config_path: Option<&Path>,
    languages: &[String],
    providers: &[String],
    workers: Option<usize>,
    multi: bool,
    force: bool,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    let mut options = config.engine_options();
    if let Some(workers) = workers {
        options.workers = workers.max(1);
    }
    options.multi = options.multi || multi;
    options.force = options.force || force;

    let mut engine = build_engine(&config, options, languages, providers)?;
    let downloaded = engine.download_subtitles(paths).await?;

    if downloaded.is_empty() {
        println!("No subtitles downloaded.");
    } else {
        for subtitle in &downloaded {
            match &subtitle.path {
                Some(path) => println!("{}", path.display()),
                None => println!("{}", subtitle.describe()),
            }
        }
        println!("Downloaded {} subtitle(s)", downloaded.len());
    }

    Ok(())
}

fn show_providers(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let registry = build_registry(&config);
    for name in registry.names() {
        println!("{name}");
    }
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Languages: {}", config.languages.join(", "));
            println!("  Providers: {}", config.providers.join(", "));
            println!("  Workers: {}", config.engine.workers);
            println!("  Multi: {}", config.engine.multi);
        }
        None => {
            println!("No config file specified, using defaults");
            let config = Config::default();
            println!("Default config:");
            println!("  Workers: {}", config.engine.workers);
            println!("  Scan depth: {}", config.engine.max_depth);
        }
    }

    Ok(())
}
