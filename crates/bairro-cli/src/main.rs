//! bairro-cli: replay a scripted session through the proposal engine
//!
//! Loads an optional YAML config, replays a YAML session script and prints
//! the step results plus one view (filtered list, dashboard or navigation
//! state) as JSON on stdout. Logs go to stderr.

use std::path::PathBuf;

use bairro_cli::{OutputView, Replayer, Report, Script, ViewOutput};
use bairro_engine::{EngineConfig, LocalIdentity, Session};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bairro-cli")]
#[command(about = "Replay scripted Meu Bairro sessions")]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info", env = "BAIRRO_LOG")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Replay a session script and print a view as JSON
    Run {
        /// Path to the session script
        #[arg(short, long)]
        script: PathBuf,

        /// Path to the engine configuration
        #[arg(short, long, env = "BAIRRO_CONFIG")]
        config: Option<PathBuf>,

        /// View to print after the replay
        #[arg(short, long, value_enum, default_value_t = OutputView::Filtered)]
        output: OutputView,

        /// Page of the filtered list to print
        #[arg(long, default_value = "1")]
        page: usize,

        /// Print compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print the default configuration as YAML
    DefaultConfig,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&cli.log_level)?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            script,
            config,
            output,
            page,
            compact,
        } => {
            let config = match config {
                Some(path) => {
                    info!("Config file: {}", path.display());
                    EngineConfig::from_file(&path)?
                }
                None => {
                    info!("No config file given, using defaults");
                    EngineConfig::default()
                }
            };

            let script = Script::from_file(&script)?;
            let session = Session::with_config(config, LocalIdentity::new())?;
            let mut replayer = Replayer::new(session);
            let steps = replayer.run(&script);

            let failed = steps.iter().filter(|s| !s.ok).count();
            info!(steps = steps.len(), failed, "Replay finished");

            let report = Report {
                steps: &steps,
                view: ViewOutput::render(replayer.session(), output, page),
            };
            let json = if compact {
                serde_json::to_string(&report)?
            } else {
                serde_json::to_string_pretty(&report)?
            };
            println!("{json}");
        }
        Commands::DefaultConfig => {
            print!("{}", EngineConfig::default().to_yaml()?);
        }
    }

    Ok(())
}
