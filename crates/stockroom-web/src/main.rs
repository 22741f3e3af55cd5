//! stockroom-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) layered with
//! `STOCKROOM_*` environment variables, opens the catalog source, and serves
//! the search page and JSON API over HTTP.
//!
//! # Password hash generation
//!
//! To generate the argon2 PHC string for `upload_password_hash`:
//!
//! ```
//! cargo run -p stockroom-web --bin stockroom-server -- --hash-password
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use clap::Parser;
use rand_core::OsRng;
use stockroom_core::paths::expand_tilde;
use stockroom_store_file::{FileCatalog, Source};
use stockroom_web::{AppState, ServerConfig};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Stockroom product search server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if cli.hash_password {
    let password = read_password()?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
      .to_string();
    println!("{hash}");
    return Ok(());
  }

  // `STOCKROOM_SOURCE`, `STOCKROOM_METADATA__OWNER`, ...
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(
      config::Environment::with_prefix("STOCKROOM")
        .prefix_separator("_")
        .separator("__"),
    )
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let source = match Source::parse(&server_cfg.source) {
    Source::Path(p) => Source::Path(expand_tilde(&p)),
    url => url,
  };
  if server_cfg.upload_password_hash.is_none() {
    tracing::warn!("upload_password_hash is not set; uploads are disabled");
  }

  let catalog = FileCatalog::new(source.clone())
    .with_context(|| format!("failed to open catalog {source}"))?;
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  let state = AppState::new(Arc::new(catalog), server_cfg)
    .context("failed to build HTTP client")?;

  let app = stockroom_web::router(state);

  tracing::info!(%source, "Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\n', '\r']).to_string())
}
