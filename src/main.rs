use anyhow::Context;
use clap::{Parser, Subcommand};
use lyrics_api::backend::SyncedLyricsCli;
use lyrics_api::lyrics::{self, SearchRequest, provider::PROVIDER_TABLE};
use lyrics_api::{config, pinger, server};
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "lyrics-api", version, about = "Lyrics search service backed by syncedlyrics")]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Search once and print the result as JSON (headless).
    Search {
        query: String,
        /// ISO 639-1 translation language code (e.g. "en", "fr").
        #[arg(long)]
        lang: Option<String>,
        /// Provider short code or name; repeatable.
        #[arg(long = "provider")]
        providers: Vec<String>,
        /// Ask for plain instead of synced lyrics.
        #[arg(long)]
        plain: bool,
        /// Ask for word-level timestamps.
        #[arg(long)]
        enhanced: bool,
    },
    /// List provider short codes.
    Providers,
    /// Inspect or edit the config file.
    Config {
        #[command(subcommand)]
        cmd: ConfigCommand,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Print the config file contents (environment overrides not applied).
    Show,
    /// Set the lyrics lookup executable.
    SetProgram { program: String },
    /// Bound each lookup to this many seconds; 0 removes the limit.
    SetTimeout { secs: u64 },
    /// Overwrite the config file with defaults.
    Reset,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let file_cfg = config::load(cli.config.as_deref()).context("load config")?;
    let mut cfg = file_cfg.clone();
    cfg.apply_env_overrides(|k| std::env::var(k).ok());

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let _pinger = pinger::spawn(&cfg.pinger).context("start self-pinger")?;
            let backend = Arc::new(SyncedLyricsCli::new(&cfg.backend));
            let addr = format!("{}:{}", cfg.server.host, cfg.server.port);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("bind {addr}"))?;
            tracing::info!("lyrics-api v{} listening on http://{addr}", env!("CARGO_PKG_VERSION"));
            server::serve(listener, server::AppState::new(backend)).await?;
        }
        Command::Search {
            query,
            lang,
            providers,
            plain,
            enhanced,
        } => {
            let req = SearchRequest::new(query)?
                .with_translation(lang)
                .with_providers(providers.iter().map(String::as_str))?
                .with_synced(!plain)
                .with_enhanced(enhanced);
            let backend = SyncedLyricsCli::new(&cfg.backend);
            let result = lyrics::search(&backend, &req).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Providers => {
            for (code, provider) in PROVIDER_TABLE {
                println!("{code:<3} {provider}");
            }
        }
        Command::Config { cmd } => {
            let mut cfg = file_cfg;
            match cmd {
                ConfigCommand::Show => {
                    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
                    return Ok(());
                }
                ConfigCommand::SetProgram { program } => cfg.backend.program = program,
                ConfigCommand::SetTimeout { secs } => {
                    cfg.backend.timeout_secs = (secs > 0).then_some(secs);
                }
                ConfigCommand::Reset => cfg = config::Config::default(),
            }
            config::save(&cfg, cli.config.as_deref()).context("save config")?;
            println!("Updated config.");
        }
    }

    Ok(())
}
