use clap::Parser;
use serde_json::json;
use statebridge_common::Logger;
use statebridge_core::{
    ExchangeGateway, ExchangeStores, InMemoryPropertyRepository, InMemoryStateStore,
};
use statebridge_error::{BridgeError, BridgeResult};
use statebridge_models::{
    constants::DEFAULT_CONFIG_FILE_NAME, ActionMessage, Property, Settings,
};
use std::{env::current_dir, path::PathBuf, sync::Arc};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info, warn};

/// Statebridge - Exchange gateway for property state
///
/// Bridges line-delimited JSON command messages on stdin to the in-memory
/// property state store, answering each with an acknowledgement or error
/// document on stdout.
#[derive(Parser)]
#[command(name = "statebridge")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Statebridge exchange gateway", long_about = None)]
struct Cli {
    /// Sets a custom config file with full path
    ///
    /// If not specified, the gateway will look for 'statebridge.toml'
    /// in the current working directory.
    #[arg(short, long, env = "SB_CONFIG")]
    config: Option<PathBuf>,

    /// JSON file holding the property registry to serve
    ///
    /// The file contains an array of property definitions. Without it the
    /// gateway starts with an empty registry.
    #[arg(short, long, env = "SB_PROPERTIES")]
    properties: Option<PathBuf>,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> BridgeResult<()> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(p) => p,
        None => {
            let dir = current_dir()
                .map_err(|e| BridgeError::from(format!("Failed to get current directory: {e}")))?;
            dir.join(DEFAULT_CONFIG_FILE_NAME)
        }
    };

    let settings = Settings::new(&config_path.to_string_lossy())?;

    let mut logger = Logger::from_settings(&settings.log);
    logger.initialize(settings.log.dir.as_deref())?;

    let repository = Arc::new(InMemoryPropertyRepository::new());
    if let Some(path) = cli.properties {
        let raw = std::fs::read_to_string(&path)?;
        let properties: Vec<Property> = serde_json::from_str(&raw)?;
        info!(
            count = properties.len(),
            path = %path.display(),
            "Loaded property registry"
        );
        for property in properties {
            repository.insert(property);
        }
    }

    let stores = ExchangeStores::new(
        Arc::new(InMemoryStateStore::new()),
        Arc::new(InMemoryStateStore::new()),
        Arc::new(InMemoryStateStore::new()),
    );
    let gateway = ExchangeGateway::new(&settings, repository, stores, None);

    info!("Statebridge gateway ready, reading commands from stdin");
    run_loop(&gateway).await
}

/// Serve line-delimited JSON commands until stdin closes.
async fn run_loop(gateway: &ExchangeGateway) -> BridgeResult<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<ActionMessage>(&line) {
            Ok(message) => match gateway.handle_message(&message).await {
                Ok(ack) => serde_json::to_value(ack)?,
                Err(e) => {
                    // Bad requests are the client's problem; anything else
                    // is an infrastructure fault worth operator attention.
                    if e.is_invalid_request() {
                        warn!(code = e.code(), "Message rejected: {e}");
                    } else {
                        error!(code = e.code(), "Message failed: {e}");
                    }
                    json!({"error": e.to_string(), "code": e.code()})
                }
            },
            Err(e) => json!({"error": e.to_string(), "code": "malformed_payload"}),
        };

        let mut out = serde_json::to_vec(&response)?;
        out.push(b'\n');
        stdout.write_all(&out).await?;
        stdout.flush().await?;
    }

    info!("Input closed, shutting down");
    Ok(())
}
