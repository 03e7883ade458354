use bloom_trials::{
    ExperimentConfig,
    experiment::{DEFAULT_NUM_TRIALS, TaskOptions, TaskOutcome, run_task},
    trials::SweepResult,
};
use clap::Parser;
use comfy_table::{
    Cell, CellAlignment, ContentArrangement, Table,
    modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
};
use std::{path::PathBuf, process::ExitCode};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "BloomFilter Project", long_about = None)]
struct Cli {
    /// File holding configuration of Bloom Filter
    #[arg(short = 'c', long = "configfile", default_value = "testConfigHashType2.json")]
    config_file: PathBuf,

    /// Input file of data to add to Bloom Filter
    #[arg(short = 'i', long = "infile", default_value = "testInput.txt")]
    in_file: PathBuf,

    /// Output file holding Bloom Filter results
    #[arg(short = 'o', long = "outfile", default_value = "testOutput.txt")]
    out_file: PathBuf,

    /// Which task to perform (1,2,3)
    #[arg(
        short = 't',
        long = "task",
        default_value_t = 2,
        value_parser = clap::value_parser!(u8).range(1..=3)
    )]
    task: u8,

    /// Validation file holding Bloom Filter expected results
    #[arg(short = 'v', long = "valfile", default_value = "validResHashType2.txt")]
    val_file: PathBuf,

    /// Trials per sweep point in task 3
    #[arg(long, default_value_t = DEFAULT_NUM_TRIALS)]
    trials: usize,

    /// Directory receiving plot series (tasks 1 and 3)
    #[arg(long, default_value = ".")]
    series_dir: PathBuf,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn print_sweeps(sweeps: &[SweepResult]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Hash").set_alignment(CellAlignment::Center),
            Cell::new("c").set_alignment(CellAlignment::Center),
            Cell::new("k").set_alignment(CellAlignment::Center),
            Cell::new("Theoretical FPR").set_alignment(CellAlignment::Center),
            Cell::new("Observed FPR").set_alignment(CellAlignment::Center),
        ]);

    for sweep in sweeps {
        for ((k, theoretical), observed) in sweep
            .ks
            .iter()
            .zip(&sweep.theoretical)
            .zip(&sweep.empirical)
        {
            table.add_row(vec![
                Cell::new(format!("Type {}", sweep.variant.code())),
                Cell::new(sweep.c),
                Cell::new(k),
                Cell::new(format!("{:.6}", theoretical)),
                Cell::new(format!("{:.6}", observed)),
            ]);
        }
    }
    println!("{table}");
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config = match ExperimentConfig::from_file(&cli.config_file) {
        Ok(config) => config,
        Err(e) => {
            error!(config = %cli.config_file.display(), "Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!(?config, task = cli.task, "Loaded configuration");

    let opts = TaskOptions {
        input: cli.in_file,
        output: cli.out_file,
        validation: Some(cli.val_file),
        series_dir: cli.series_dir,
        num_trials: cli.trials,
    };

    match run_task(cli.task, &config, &opts) {
        Ok(TaskOutcome::Sweeps(sweeps)) => {
            print_sweeps(&sweeps);
            ExitCode::SUCCESS
        }
        Ok(TaskOutcome::Membership {
            comparison: Some(cmp),
            ..
        }) if !cmp.is_exact() => {
            error!(
                mismatches = cmp.mismatches,
                length_difference = cmp.length_difference,
                "Results do not match validation data"
            );
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Task {} failed: {e}", cli.task);
            ExitCode::FAILURE
        }
    }
}
