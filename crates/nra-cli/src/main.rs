use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "nra")]
#[command(about = "News reaction analysis CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Event calendar utilities
    Calendar {
        #[command(subcommand)]
        cmd: CalendarCmd,
    },

    /// Daily price acquisition
    Prices {
        #[command(subcommand)]
        cmd: PricesCmd,
    },

    /// Run the event-reaction analysis and write run artifacts
    Analyze {
        /// Layered config paths in merge order (base -> instrument -> local)
        #[arg(long = "config")]
        config_paths: Vec<PathBuf>,

        /// Daily price CSV (overrides data.prices_csv)
        #[arg(long)]
        prices: Option<PathBuf>,

        /// Event directory CSV (overrides data.events_csv; reference calendar if neither)
        #[arg(long)]
        events: Option<PathBuf>,

        /// Exports root (overrides export.root)
        #[arg(long)]
        exports: Option<PathBuf>,

        /// Fail instead of warn on config keys this command never reads
        #[arg(long, default_value_t = false)]
        strict_config: bool,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

#[derive(Subcommand)]
enum CalendarCmd {
    /// Write the built-in reference calendar as an event directory CSV
    Export {
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Subcommand)]
enum PricesCmd {
    /// Fetch daily bars from TwelveData and write them as a price CSV
    Fetch {
        /// Instrument symbol (overrides instrument.symbol)
        #[arg(long)]
        symbol: Option<String>,

        /// First date, YYYY-MM-DD
        #[arg(long)]
        start: String,

        /// Last date, YYYY-MM-DD
        #[arg(long)]
        end: String,

        #[arg(long)]
        out: PathBuf,

        /// Layered config paths (instrument, session tz, api key env name)
        #[arg(long = "config")]
        config_paths: Vec<PathBuf>,

        /// Provider base URL
        #[arg(long, hide = true, default_value = "https://api.twelvedata.com")]
        base_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Missing file is fine; production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Calendar { cmd } => match cmd {
            CalendarCmd::Export { out } => commands::calendar::export_reference(&out)?,
        },

        Commands::Prices { cmd } => match cmd {
            PricesCmd::Fetch {
                symbol,
                start,
                end,
                out,
                config_paths,
                base_url,
            } => {
                commands::prices::fetch(commands::prices::FetchArgs {
                    symbol,
                    start,
                    end,
                    out,
                    config_paths,
                    base_url,
                })
                .await?
            }
        },

        Commands::Analyze {
            config_paths,
            prices,
            events,
            exports,
            strict_config,
        } => commands::analyze::run(commands::analyze::AnalyzeArgs {
            config_paths,
            prices,
            events,
            exports,
            strict_config,
        })?,

        Commands::ConfigHash { paths } => {
            let loaded = nra_config::load_layered_yaml(&paths)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }
    }

    Ok(())
}

// Logs go to stderr so stdout stays machine-readable.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}
