mod commands;
mod gateway;

use clap::{Parser, Subcommand};
use hiika_channels::telegram::TelegramChannel;
use hiika_core::{
    config::{self, Config, ConfigSource, HiikaConfig},
    router::TranslationRouter,
    traits::Channel,
};
use hiika_providers::{DetectLanguageClient, GoogleTranslator};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

#[derive(Parser)]
#[command(
    name = "hiika",
    version,
    about = "Hiika — Amharic / Afan Oromo / English translation relay for Telegram"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml", env = "HIIKA_CONFIG")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Telegram bot.
    Start,
    /// Show configuration and which secrets are present.
    Status,
    /// Translate a text once and print the reply the bot would send.
    Translate {
        /// The text to translate.
        #[arg(trailing_var_arg = true)]
        text: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut cfg, source) = config::load(&cli.config)?;
    cfg.apply_env();

    let guard = init_logging(&cfg.hiika)?;
    if source == ConfigSource::Defaults {
        info!("Config file not found at {}, using defaults", cli.config);
    }

    match cli.command {
        Commands::Start => {
            if let Err(e) = cfg.validate() {
                error!("{e}");
                drop(guard);
                std::process::exit(1);
            }

            let router = build_router(&cfg);

            let mut channels: HashMap<String, Arc<dyn Channel>> = HashMap::new();
            let telegram = TelegramChannel::new(cfg.telegram.clone());
            channels.insert(telegram.name().to_string(), Arc::new(telegram));

            info!("Hiika — starting bot...");
            let gw = gateway::Gateway::new(router, channels, cfg.telegram.delete_original);
            gw.run().await?;
        }
        Commands::Status => {
            println!("Hiika — Status Check\n");
            match source {
                ConfigSource::File => println!("Config: {}", cli.config),
                ConfigSource::Defaults => {
                    println!("Config: {} (not found, using defaults)", cli.config)
                }
            }
            println!(
                "  telegram: {}",
                if cfg.telegram.bot_token.trim().is_empty() {
                    "missing bot token"
                } else {
                    "configured"
                }
            );
            println!(
                "  allowed chats: {}",
                if cfg.telegram.allowed_chats.is_empty() {
                    "all".to_string()
                } else {
                    format!("{:?}", cfg.telegram.allowed_chats)
                }
            );
            println!("  delete original: {}", cfg.telegram.delete_original);

            let detector = DetectLanguageClient::from_config(
                cfg.detection.base_url.clone(),
                cfg.detection.api_key.clone(),
            );
            println!(
                "  detection: {} ({})",
                if detector.is_configured() {
                    "configured"
                } else {
                    "missing API key"
                },
                cfg.detection.base_url
            );
            println!("  translation: {}", cfg.translation.base_url);
        }
        Commands::Translate { text } => {
            if text.is_empty() {
                anyhow::bail!("no text provided. Usage: hiika translate <text>");
            }
            cfg.validate_detection()?;

            let text = text.join(" ");
            let router = build_router(&cfg);
            let result = router.route(&text).await?;
            println!("{}", result.display_text());
        }
    }

    Ok(())
}

/// Build the router from the configured detection and translation services.
fn build_router(cfg: &Config) -> Arc<TranslationRouter> {
    let detector = DetectLanguageClient::from_config(
        cfg.detection.base_url.clone(),
        cfg.detection.api_key.clone(),
    );
    let translator = GoogleTranslator::from_config(cfg.translation.base_url.clone());
    Arc::new(TranslationRouter::new(
        Arc::new(detector),
        Arc::new(translator),
    ))
}

/// Install the tracing subscriber. `RUST_LOG` wins over `log_level`.
///
/// When `log_file` is set, logs also go to that file through a non-blocking
/// writer; the returned guard must live until exit so buffered lines flush.
fn init_logging(cfg: &HiikaConfig) -> anyhow::Result<Option<WorkerGuard>> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.log_level.as_str()));

    if cfg.log_file.trim().is_empty() {
        tracing_subscriber::fmt().with_env_filter(filter).init();
        return Ok(None);
    }

    let path = PathBuf::from(config::shellexpand(cfg.log_file.trim()));
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("invalid log_file: {}", cfg.log_file))?;
    std::fs::create_dir_all(dir)?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(
        dir, file_name,
    ));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .init();

    Ok(Some(guard))
}
