//! `stockroom-export` binary.
//!
//! ```
//! stockroom-export --config export.toml
//! stockroom-export --dry-run
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use stockroom_export::{ExportConfig, Runner, XdotoolDriver, plan};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Export the product catalog and push it to git")]
struct Cli {
  /// TOML file overriding the built-in export settings.
  #[arg(short, long, env = "STOCKROOM_EXPORT_CONFIG")]
  config: Option<PathBuf>,

  /// Print the steps without running them.
  #[arg(long)]
  dry_run: bool,
}

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let cfg = match &cli.config {
    Some(path) => {
      let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
      ExportConfig::from_toml(&raw).context("parsing config file")?
    }
    None => ExportConfig::resolved_default(),
  };

  let steps = plan(&cfg);

  if cli.dry_run {
    for (i, step) in steps.iter().enumerate() {
      println!("{i:>3}  {step}");
    }
    return Ok(());
  }

  tracing::info!(steps = steps.len(), file = %cfg.file_name, "starting export");
  Runner::new(XdotoolDriver::default())
    .run(&steps)
    .context("export aborted")?;
  tracing::info!(
    file = %cfg.file_name,
    repo = %cfg.repo_path.display(),
    "export pushed"
  );
  Ok(())
}
