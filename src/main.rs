//! Safeguard CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use safeguard::application::Preferences;
use safeguard::cli::{
    alert_cmd::run_alert,
    app::{load_merged_config, preference_store, AlertOptions, MonitorOptions, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    monitor_app::run_monitor,
    prefs_cmd::{handle_contacts_command, handle_trigger_command},
    presenter::Presenter,
    zones_cmd::{checked_position, handle_zones_command},
};
use safeguard::domain::alert::generate_maps_url;
use safeguard::domain::config::AppConfig;
use safeguard::domain::geo::Position;
use safeguard::domain::recording::Duration;
use safeguard::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let presenter = Presenter::new();

    match cli.command {
        Commands::Config { action } => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
        Commands::Contacts { action } => {
            let preferences = Preferences::new(preference_store());
            if let Err(e) = handle_contacts_command(action, &preferences, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
        Commands::Trigger { action } => {
            let preferences = Preferences::new(preference_store());
            if let Err(e) = handle_trigger_command(action, &preferences, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
        Commands::Zones { action } => {
            let config = load_merged_config(AppConfig::empty()).await;
            if let Err(e) = handle_zones_command(action, &config.zones_or_default(), &presenter) {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_USAGE_ERROR);
            }
            ExitCode::SUCCESS
        }
        Commands::MapsUrl {
            latitude,
            longitude,
        } => match checked_position(latitude, longitude) {
            Ok(position) => {
                presenter.output(&generate_maps_url(position.latitude, position.longitude));
                ExitCode::SUCCESS
            }
            Err(e) => {
                presenter.error(&e.to_string());
                ExitCode::from(EXIT_USAGE_ERROR)
            }
        },
        Commands::Alert(args) => {
            let position = match args.at.as_deref().map(str::parse::<Position>) {
                Some(Ok(position)) if position.is_valid() => Some(position),
                Some(Ok(position)) => {
                    presenter.error(&format!("Coordinates out of range: {}", position));
                    return ExitCode::from(EXIT_USAGE_ERROR);
                }
                Some(Err(e)) => {
                    presenter.error(&e.to_string());
                    return ExitCode::from(EXIT_USAGE_ERROR);
                }
                None => None,
            };

            let cli_config = AppConfig {
                sms_relay_url: args.sms_relay_url.clone(),
                ..Default::default()
            };
            let config = load_merged_config(cli_config).await;
            run_alert(AlertOptions::from_config(&config, &args, position)).await
        }
        Commands::Monitor(args) => {
            if let Some(clip) = args.clip_duration.as_deref() {
                if let Err(e) = clip.parse::<Duration>() {
                    presenter.error(&format!("Invalid clip duration: {}", e));
                    return ExitCode::from(EXIT_USAGE_ERROR);
                }
            }

            // Build CLI config from args
            let cli_config = AppConfig {
                clip_duration: args.clip_duration.clone(),
                sms_relay_url: args.sms_relay_url.clone(),
                clip_path: args
                    .clip_path
                    .as_ref()
                    .map(|p| p.to_string_lossy().to_string()),
                notify: if args.no_notify { Some(false) } else { None },
                ..Default::default()
            };

            let config = load_merged_config(cli_config).await;
            run_monitor(MonitorOptions::from_config(&config, &args)).await
        }
    }
}
