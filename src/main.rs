use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use divtrack::prelude::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "divtrack")]
#[command(about = "A Rust-based dividend and total-return tracker", long_about = None)]
struct Cli {
    //path to json configuration file
    #[arg(long, global = true, default_value = "config.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    //fetch dividend and price history into the local cache
    Fetch,

    //print the console table report from cached data
    Report,

    //build the static dashboard data export
    Dashboard {
        //directory with static dashboard assets to copy into the build
        #[arg(long)]
        static_dir: Option<PathBuf>,

        //directory to write the built dashboard into
        #[arg(long, default_value = "build/web_dashboard")]
        output_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = AppConfig::from_json_file(&cli.config)
        .context(format!("Failed to load configuration {:?}", cli.config))?;
    let store = DataStore::open(&config.data_directory)?;

    match cli.command {
        Commands::Fetch => run_fetch_command(&config, &store),
        Commands::Report => run_report_command(&config, &store),
        Commands::Dashboard {
            static_dir,
            output_dir,
        } => run_dashboard_command(&config, &store, static_dir, output_dir),
    }
}

fn run_fetch_command(config: &AppConfig, store: &DataStore) -> Result<()> {
    let mut client = PolygonClient::new(
        config.polygon_api_key.clone(),
        config.rate_limit_requests_per_minute,
    );
    run_fetch(config, store, &mut client)
}

fn run_report_command(config: &AppConfig, store: &DataStore) -> Result<()> {
    let (entries, metadata) = collect_report_data(config, store)?;
    print_report(&entries, &metadata);
    Ok(())
}

fn run_dashboard_command(
    config: &AppConfig,
    store: &DataStore,
    static_dir: Option<PathBuf>,
    output_dir: PathBuf,
) -> Result<()> {
    let (entries, metadata) = collect_report_data(config, store)?;
    let payload = build_payload(&entries, &metadata);
    write_dashboard(&payload, static_dir.as_deref(), &output_dir)?;

    println!("Dashboard build complete: {:?}", output_dir);
    Ok(())
}
