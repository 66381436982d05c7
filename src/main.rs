use clap::{Parser, Subcommand, ValueEnum};
use match_engine::config::{LoggingSettings, Settings};
use match_engine::core::Matcher;
use match_engine::models::{RecommendRequest, RerankRequest, UserProfile};
use match_engine::services::{mask_handle, mask_phone, ContentAuditor, FieldProtector};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use validator::Validate;

/// Offline front end for the match engine. Reads JSON, prints JSON.
#[derive(Debug, Parser)]
#[command(name = "match-engine", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score the viewee profile as seen by the viewer profile
    Score { viewer: PathBuf, viewee: PathBuf },
    /// Rerank a scored batch (`{"userId": ..., "candidates": [...]}`)
    Rerank { input: PathBuf },
    /// Score a pool against a target and rerank (`{"target": ..., "pool": [...], "limit": 20}`)
    Recommend { input: PathBuf },
    /// Audit a chat message
    Audit { text: String },
    /// Mask a phone number or social handle for display
    Mask {
        value: String,
        #[arg(long, value_enum, default_value_t = MaskKind::Phone)]
        kind: MaskKind,
    },
    /// One-way hash of a sensitive identifier
    Hash { value: String },
    /// Encrypt a sensitive field with the configured key
    Encrypt { value: String },
    /// Decrypt a value produced by `encrypt`
    Decrypt { value: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MaskKind {
    Phone,
    Handle,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let settings = Settings::load();

    init_logging(
        settings
            .as_ref()
            .map(|s| s.logging.clone())
            .unwrap_or_default(),
    );

    let settings = settings.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!("Configuration loaded successfully");

    let matcher = Matcher::new(settings.weights(), settings.tables.clone())
        .with_reranker(settings.reranker());

    let protector = settings.field_protector();
    if let Err(e) = &protector {
        warn!("Field protection unavailable: {}", e);
    }

    match cli.command {
        Command::Score { viewer, viewee } => {
            let viewer: UserProfile = read_json(&viewer)?;
            let viewee: UserProfile = read_json(&viewee)?;
            print_json(&matcher.score(&viewer, &viewee))
        }
        Command::Rerank { input } => {
            let request: RerankRequest = read_json(&input)?;
            request.validate()?;
            print_json(&matcher.rerank(request.candidates, &request.user_id))
        }
        Command::Recommend { input } => {
            let request: RecommendRequest = read_json(&input)?;
            request.validate()?;
            let ranked = matcher.recommend(&request.target, request.pool, request.limit as usize);
            print_json(&ranked)
        }
        Command::Audit { text } => {
            let auditor = ContentAuditor::new(&settings.moderation)?;
            let outcome = auditor.audit(&text);
            info!(
                "Audit risk score {:.0}, contacts found: {:?}",
                auditor.risk_score(&text),
                auditor.extract_contact_info(&text)
            );
            print_json(&outcome)
        }
        Command::Mask { value, kind } => {
            let masked = match kind {
                MaskKind::Phone => mask_phone(&value),
                MaskKind::Handle => mask_handle(&value),
            };
            println!("{}", masked);
            Ok(())
        }
        Command::Hash { value } => {
            println!("{}", FieldProtector::hash_sensitive(&value));
            Ok(())
        }
        Command::Encrypt { value } => {
            println!("{}", protector?.encrypt(&value));
            Ok(())
        }
        Command::Decrypt { value } => {
            println!("{}", protector?.decrypt(&value)?);
            Ok(())
        }
    }
}

/// Initialize logging; `RUST_LOG` wins over the configured level
fn init_logging(logging: LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Box<dyn Error>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
