use anyhow::Result;
use beamscan_cli::logging;
use beamscan_controller::{
    executor::TaskExecutor,
    program::{sequence_name, ProgramRecorder},
    robot_driver::SimulatedRobot,
    station_config::StationConfig,
    task::load_tasks,
};
use clap::{Parser, Subcommand};
use std::{path::PathBuf, sync::atomic::Ordering};

#[derive(Parser)]
#[command(author, version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Sets the level of verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Replay the scan sequence on the simulated robot
    Run(ScanArgs),
    /// Record the scan sequence into an on-robot program
    Record(RecordArgs),
}

#[derive(clap::Args)]
struct ScanArgs {
    /// Path to the scan CSV file; falls back to the station default
    #[arg(long)]
    csv_file: Option<PathBuf>,

    /// Station configuration file (JSON); falls back to the packaged one
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(clap::Args)]
struct RecordArgs {
    #[command(flatten)]
    scan: ScanArgs,

    /// Where to write the recorded program; defaults to <sequence>.program.json
    #[arg(long)]
    output: Option<PathBuf>,
}

fn load_station(path: &Option<PathBuf>) -> Result<StationConfig> {
    let config = match path {
        Some(path) => StationConfig::load_json(path)?,
        None => StationConfig::included(),
    };
    Ok(config)
}

fn csv_path(args: &ScanArgs, config: &StationConfig) -> PathBuf {
    args.csv_file
        .clone()
        .unwrap_or_else(|| config.default_csv.clone())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::setup_tracing(args.verbose);
    match args.command {
        Command::Run(args) => run(args).await?,
        Command::Record(args) => record(args).await?,
    }
    Ok(())
}

async fn run(args: ScanArgs) -> Result<()> {
    let config = load_station(&args.config)?;
    let csv_file = csv_path(&args, &config);
    let tasks = load_tasks(&csv_file)?;
    let sequence = sequence_name(&csv_file);

    let robot = SimulatedRobot::new(config)?;
    let mut executor = TaskExecutor::new(robot);

    let stop = executor.stop_handle();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to wait for Ctrl+c");
        tracing::info!("Detected Ctrl+c");
        stop.store(false, Ordering::Relaxed);
    });

    let summary = executor.run(&sequence, &tasks).await?;
    tracing::info!(
        "Sequence {} done: {} completed, {} skipped",
        sequence,
        summary.completed,
        summary.skipped
    );
    Ok(())
}

async fn record(args: RecordArgs) -> Result<()> {
    let config = load_station(&args.scan.config)?;
    let csv_file = csv_path(&args.scan, &config);
    let tasks = load_tasks(&csv_file)?;
    let sequence = sequence_name(&csv_file);

    let (recorder, program) = ProgramRecorder::new(&config, &sequence)?;
    let mut executor = TaskExecutor::new(recorder);
    let summary = executor.run(&sequence, &tasks).await?;

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{}.program.json", sequence)));
    let program = program.lock().await.clone();
    program.save_json(&output)?;
    tracing::info!(
        "Recorded program {} to {}: {} targets, {} skipped",
        sequence,
        output.display(),
        summary.completed,
        summary.skipped
    );
    Ok(())
}
