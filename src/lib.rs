pub mod calendar;
pub mod cli;
pub mod config;
pub mod constants;
pub mod dates;
pub mod db;
pub mod domain;
pub mod models;
pub mod parser;
pub mod services;
pub mod validation;

use clap::{CommandFactory, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, UpdateArgs};
pub use config::Config;

pub async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate()?;

    init_tracing(&config);

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    debug!(data_path = %config.general.data_path, "Using data file");

    match command {
        Commands::Add {
            source_url,
            title,
            season,
            episode_start,
            max_episodes,
            interval,
            start_date,
        } => {
            cli::cmd_add_series(
                &config,
                source_url,
                title,
                season,
                episode_start,
                max_episodes,
                interval,
                start_date,
            )
            .await
        }

        Commands::List => cli::cmd_list_series(&config).await,

        Commands::Update {
            id,
            title,
            clear_title,
            source_url,
            season,
            episode_start,
            max_episodes,
            unbounded,
            interval,
            start_date,
        } => {
            let args = UpdateArgs {
                title,
                clear_title,
                source_url,
                season,
                episode_start,
                max_episodes,
                unbounded,
                interval,
                start_date,
            };
            cli::cmd_update_series(&config, &id, args).await
        }

        Commands::Remove { id } => cli::cmd_remove_series(&config, &id).await,

        Commands::Events {
            from,
            to,
            unwatched,
        } => cli::cmd_events(&config, from, to, unwatched).await,

        Commands::Calendar { year, month } => cli::cmd_calendar(&config, year, month).await,

        Commands::Watch { event_id } => cli::cmd_set_watched(&config, &event_id, true).await,

        Commands::Unwatch { event_id } => cli::cmd_set_watched(&config, &event_id, false).await,

        Commands::Init => {
            if Config::create_default_if_missing()? {
                println!("✓ Config file created. Edit config.toml and run again.");
            } else {
                println!("config.toml already exists, leaving it untouched.");
            }
            Ok(())
        }
    }
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.general.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
