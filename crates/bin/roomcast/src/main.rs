//! # roomcast — multi-room playback from the command line
//!
//! Composition root that wires the adapters together and dispatches CLI
//! commands.
//!
//! ## Responsibilities
//! - Parse the command line and runtime settings (file, env vars)
//! - Install the tracing subscriber (stderr, so stdout stays machine readable)
//! - Construct the config store and the selected playback backend (adapters)
//! - Construct application services, injecting adapters via port traits
//! - Cancel the running automation on Ctrl-C, exit on a second Ctrl-C
//! - Print reports as JSON and exit non-zero on any failure
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod cli;
mod config;
mod document;

use anyhow::Context;
use clap::Parser;
use roomcast_adapter_config_json::JsonConfigStore;
use roomcast_adapter_osascript::OsascriptBackend;
use roomcast_adapter_virtual::VirtualBackend;
use roomcast_app::automation_engine::{self, AutomationEngine};
use roomcast_app::ports::PlaybackBackend;
use roomcast_app::services::{AliasAction, ConfigService};
use roomcast_app::step_executor::StepExecutor;
use roomcast_domain::automation::AutomationDocument;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands, ConfigCommands};
use crate::config::{Driver, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load(&cli.settings)
        .with_context(|| format!("loading settings from {}", cli.settings.display()))?;
    if let Some(driver) = cli.driver {
        settings.backend.driver = driver;
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.logging.filter))
        .with_writer(std::io::stderr)
        .init();

    let configs = ConfigService::new(JsonConfigStore::new(settings.document_path()?));

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("interrupted, stopping after the current step");
                cancel.cancel();
            }
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupted again, exiting");
                std::process::exit(130);
            }
        }
    });

    match settings.backend.driver {
        Driver::Osascript => {
            let backend = OsascriptBackend::new(settings.backend.osascript.clone());
            let executor = executor(backend, &settings, cancel);
            dispatch(cli.command, &configs, executor).await
        }
        Driver::Virtual => {
            let executor = executor(VirtualBackend::default(), &settings, cancel);
            dispatch(cli.command, &configs, executor).await
        }
    }
}

fn executor<B: PlaybackBackend>(
    backend: B,
    settings: &Settings,
    cancel: CancellationToken,
) -> StepExecutor<B> {
    StepExecutor::new(backend)
        .with_poll_interval(settings.poll_interval())
        .with_cancellation(cancel)
}

async fn dispatch<B: PlaybackBackend>(
    command: Commands,
    configs: &ConfigService<JsonConfigStore>,
    executor: StepExecutor<B>,
) -> anyhow::Result<()> {
    match &command {
        Commands::Config { command } => config(command, configs).await,
        Commands::Run { file } => {
            let document = document::read(file).await?;
            run(&AutomationEngine::new(executor), configs, &document).await
        }
        Commands::Plan { file } => {
            let document = document::read(file).await?;
            let config = configs.load().await?;
            print_json(&automation_engine::plan(&document, config.as_ref())?)
        }
        Commands::Alias { name } => match configs.resolve_alias(name).await? {
            AliasAction::Shortcut(shortcut) => {
                tracing::info!(alias = %name, %shortcut, "running alias shortcut");
                executor.backend().run_shortcut(&shortcut).await?;
                Ok(())
            }
            AliasAction::Automation(document) => {
                run(&AutomationEngine::new(executor), configs, &document).await
            }
        },
        Commands::Status => {
            let backend = executor.backend();
            let state = backend.now_playing_state().await?;
            let outputs = backend.infer_current_outputs().await;
            print_json(&serde_json::json!({ "state": state, "outputs": outputs }))
        }
        Commands::Play { .. }
        | Commands::Volume { .. }
        | Commands::Outputs { .. }
        | Commands::Stop
        | Commands::Wait { .. } => {
            let document = command
                .one_off()?
                .context("command does not describe an automation")?;
            run(&AutomationEngine::new(executor), configs, &document).await
        }
    }
}

async fn run<B: PlaybackBackend>(
    engine: &AutomationEngine<B>,
    configs: &ConfigService<JsonConfigStore>,
    document: &AutomationDocument,
) -> anyhow::Result<()> {
    let config = configs.load().await?;
    let outcome = engine.run(document, config.as_ref()).await?;
    print_json(&outcome.report)?;
    match outcome.failure {
        Some(err) => Err(anyhow::Error::new(err).context("automation failed")),
        None => Ok(()),
    }
}

async fn config(
    command: &ConfigCommands,
    configs: &ConfigService<JsonConfigStore>,
) -> anyhow::Result<()> {
    match command {
        ConfigCommands::Get { path } => {
            if let Some(value) = configs.get(path).await? {
                println!("{value}");
            }
        }
        ConfigCommands::Set { path, values } => configs.set(path, values.as_slice()).await?,
        ConfigCommands::Unset { path } => configs.unset(path).await?,
        ConfigCommands::Show => print_json(&configs.document().await?)?,
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("serializing output")?;
    println!("{rendered}");
    Ok(())
}
