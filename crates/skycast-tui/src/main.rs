//! `skycast`: terminal weather dashboard.
//!
//! Built on [ratatui](https://ratatui.rs). Search a city to add a card with
//! current conditions and a five-day forecast; star cards to keep them
//! across sessions. Favorites are restored from the data directory at
//! startup and rewritten on every toggle.
//!
//! Logs are written to a file (default `{cache_dir}/skycast.log`) to avoid
//! corrupting the terminal UI.
//!
//! Entry point: CLI argument parsing, config resolution, tracing setup,
//! panic hooks, and app launch.

mod action;
mod app;
mod component;
mod event;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use secrecy::SecretString;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use skycast_config::{Config, ThemePreference};
use skycast_core::{CityStore, FavoritesStore, WeatherConfig, WeatherFetcher};

use crate::app::App;
use crate::theme::ThemeMode;

/// Terminal dashboard for current weather and five-day forecasts.
#[derive(Parser, Debug)]
#[command(name = "skycast", version, about)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Provider API key, overriding config, env and keyring
    #[arg(short = 'k', long)]
    api_key: Option<String>,

    /// Provider API root (e.g. https://api.openweathermap.org/data/2.5)
    #[arg(long)]
    base_url: Option<String>,

    /// Initial theme: system, light or dark
    #[arg(long)]
    theme: Option<ThemePreference>,

    /// Favorites file (defaults to the platform data directory)
    #[arg(long, conflicts_with = "no_persist")]
    favorites: Option<PathBuf>,

    /// Keep favorites in memory only for this session
    #[arg(long)]
    no_persist: bool,

    /// Log file path (defaults to the platform cache directory)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Write the effective settings to the config file and exit
    #[arg(long)]
    write_config: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr, that would
/// corrupt the TUI output. Returns a guard that must be held for the
/// lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli) -> Result<WorkerGuard> {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("skycast={log_level}")));

    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(skycast_config::default_log_path);
    let log_dir = log_file
        .parent()
        .map_or_else(|| PathBuf::from("."), std::path::Path::to_path_buf);
    let log_filename = log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("skycast.log"));

    std::fs::create_dir_all(&log_dir)
        .wrap_err_with(|| format!("creating log directory {}", log_dir.display()))?;
    let file_appender = tracing_appender::rolling::never(&log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    Ok(guard)
}

/// Load the config file and apply CLI overrides.
fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => skycast_config::load_config_from(path)?,
        None => skycast_config::load_config()?,
    };

    if let Some(ref base_url) = cli.base_url {
        config.base_url.clone_from(base_url);
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(ref path) = cli.favorites {
        config.favorites_path = Some(path.clone());
    }
    Ok(config)
}

/// Persist `config` to `--config` or the platform config path.
fn write_config(cli: &Cli, config: &Config) -> Result<PathBuf> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(skycast_config::config_path);
    skycast_config::save_config_to(config, &path)
        .wrap_err_with(|| format!("writing config to {}", path.display()))?;
    Ok(path)
}

/// Build the provider config. A `--api-key` flag bypasses the credential chain.
fn weather_config(cli: &Cli, config: &Config) -> Result<WeatherConfig> {
    let weather = match &cli.api_key {
        Some(key) => config.to_weather_config(SecretString::from(key.clone()))?,
        None => skycast_config::weather_config(config)?,
    };
    Ok(weather)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file; hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli)?;

    let config = resolve_config(&cli)?;
    if cli.write_config {
        let path = write_config(&cli, &config)?;
        info!(path = %path.display(), "config written");
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let weather = weather_config(&cli, &config)?;
    let fetcher = WeatherFetcher::new(&weather)?;

    let favorites = if cli.no_persist {
        FavoritesStore::in_memory()
    } else {
        FavoritesStore::file(config.favorites_path())
    };
    let store = CityStore::hydrate(favorites);

    let colorfgbg = std::env::var("COLORFGBG").ok();
    let theme = ThemeMode::resolve(config.theme, colorfgbg.as_deref());

    info!(
        base_url = %weather.base_url,
        favorites = store.len(),
        persist = !cli.no_persist,
        ?theme,
        "starting skycast"
    );

    let mut app = App::new(store, fetcher, theme);
    app.run().await?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn write_config_saves_cli_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skycast").join("config.toml");
        let cli = Cli::try_parse_from([
            "skycast",
            "--config",
            path.to_str().unwrap(),
            "--theme",
            "light",
            "--base-url",
            "http://localhost:8080/data/2.5",
            "--write-config",
        ])
        .unwrap();

        let config = resolve_config(&cli).unwrap();
        let written = write_config(&cli, &config).unwrap();
        assert_eq!(written, path);

        let reloaded = skycast_config::load_config_from(&path).unwrap();
        assert_eq!(reloaded.theme, ThemePreference::Light);
        assert_eq!(reloaded.base_url, "http://localhost:8080/data/2.5");
    }

    #[test]
    fn favorites_path_conflicts_with_no_persist() {
        let parsed = Cli::try_parse_from(["skycast", "--favorites", "f.json", "--no-persist"]);
        assert!(parsed.is_err());
    }
}
