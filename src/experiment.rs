//! Task drivers tying config, input files, filters and the trial harness
//! together.
//!
//! * Task 1 maps input values through one hash of each family and emits the
//!   resulting scatter series.
//! * Task 2 is the validated path: fixed hash parameters from the config
//!   file, deterministic membership output compared against a reference.
//! * Task 3 sweeps `k` at `c = 10` and `c = 15` for both families and emits
//!   empirical against theoretical false positive curves.
use crate::config::{ExperimentConfig, HashVariant};
use crate::error::{BloomError, Result};
use crate::filter::BloomFilter;
use crate::hash::{HashFamily, SeededReHash, UniversalAffine};
use crate::io::{Comparison, compare_results, read_int_file, read_result_file, write_results};
use crate::series::Series;
use crate::trials::{SweepResult, TrialHarness, populate_and_query};
use rand::{SeedableRng, rngs::StdRng};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_NUM_TRIALS: usize = 10;

const TASK1_SAMPLE: usize = 10_000;
const TASK1_EVEN_SAMPLE: usize = 20_000;

/// `(c, k values)` swept by task 3.
pub fn task3_sweeps() -> Vec<(usize, Vec<usize>)> {
    vec![(10, (4..=10).collect()), (15, (4..=15).collect())]
}

#[derive(Debug, Clone)]
pub struct TaskOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub validation: Option<PathBuf>,
    pub series_dir: PathBuf,
    pub num_trials: usize,
}

#[derive(Debug)]
pub enum TaskOutcome {
    /// The input sequence was empty; nothing was computed or written.
    Skipped,
    Series(Vec<PathBuf>),
    Membership {
        results: Vec<bool>,
        comparison: Option<Comparison>,
    },
    Sweeps(Vec<SweepResult>),
}

fn load_input(path: &Path) -> Result<Option<Vec<u64>>> {
    let data = read_int_file(path)?;
    if data.is_empty() {
        warn!(input = %path.display(), "No data to add to bloom filter");
        return Ok(None);
    }
    info!(elements = data.len(), "Loaded input data");
    Ok(Some(data))
}

fn task_rng(config: &ExperimentConfig) -> StdRng {
    match config.gen_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn scatter<H: HashFamily>(hasher: &H, xs: &[u64]) -> (Vec<f64>, Vec<f64>) {
    xs.iter()
        .map(|&x| (x as f64, hasher.hash_list(x)[0] as f64))
        .unzip()
}

pub fn run_task1(config: &ExperimentConfig, opts: &TaskOptions) -> Result<TaskOutcome> {
    let Some(data) = load_input(&opts.input)? else {
        return Ok(TaskOutcome::Skipped);
    };
    let mut rng = task_rng(config);
    let n = config.bit_array_length;
    let seeded = SeededReHash::random(1, n, config.universe_size, &mut rng)?;
    let affine = UniversalAffine::random(1, n, config.universe_size, &mut rng)?;

    let sample: Vec<u64> = data.iter().copied().take(TASK1_SAMPLE).collect();
    let evens: Vec<u64> = data
        .iter()
        .copied()
        .take(TASK1_EVEN_SAMPLE)
        .filter(|x| x % 2 == 0)
        .collect();

    let mut written = Vec::new();
    for (name, xs, label) in [
        ("values", &sample, "Values Mapped"),
        ("even", &evens, "Even Values Mapped"),
    ] {
        let plots = [
            (HashVariant::SeededReHash, scatter(&seeded, xs)),
            (HashVariant::UniversalAffine, scatter(&affine, xs)),
        ];
        for (variant, (x, y)) in plots {
            let series = Series::new(
                format!("Type {} Hash Function {label}", variant.code()),
                "input data value",
                "hash value",
            )
            .with_curve("hash value", x, y);
            let path = opts
                .series_dir
                .join(format!("task1_{name}_type{}.json", variant.code()));
            series.save(&path)?;
            written.push(path);
        }
    }
    info!(files = written.len(), "Task 1 complete");
    Ok(TaskOutcome::Series(written))
}

pub fn run_task2(config: &ExperimentConfig, opts: &TaskOptions) -> Result<TaskOutcome> {
    let filter_config = config.supplied_filter_config()?;
    let mut filter = BloomFilter::new(filter_config)?;
    let Some(data) = load_input(&opts.input)? else {
        return Ok(TaskOutcome::Skipped);
    };

    let results = populate_and_query(&data, &mut filter, config.capacity)?;
    write_results(&opts.output, &results)?;
    info!(output = %opts.output.display(), "Wrote membership results");

    let comparison = match &opts.validation {
        Some(path) if path.exists() => {
            let expected = read_result_file(path)?;
            let cmp = compare_results(&results, &expected);
            info!(
                matches = cmp.matches,
                mismatches = cmp.mismatches,
                length_difference = cmp.length_difference,
                "Compared against validation data"
            );
            Some(cmp)
        }
        Some(path) => {
            warn!(validation = %path.display(), "Validation file not found, skipping comparison");
            None
        }
        None => None,
    };
    info!("Task 2 complete");
    Ok(TaskOutcome::Membership {
        results,
        comparison,
    })
}

pub fn run_task3(config: &ExperimentConfig, opts: &TaskOptions) -> Result<TaskOutcome> {
    let Some(data) = load_input(&opts.input)? else {
        return Ok(TaskOutcome::Skipped);
    };
    let mut harness = match config.gen_seed {
        Some(seed) => TrialHarness::with_seed(data, config.universe_size, config.capacity, seed)?,
        None => TrialHarness::new(data, config.universe_size, config.capacity)?,
    };

    let mut sweeps = Vec::new();
    for (c, ks) in task3_sweeps() {
        for variant in HashVariant::ALL {
            sweeps.push(harness.sweep(c, &ks, opts.num_trials, variant)?);
        }
    }

    // series are written only once every sweep has succeeded
    for sweep in &sweeps {
        let code = sweep.variant.code();
        let x: Vec<f64> = sweep.ks.iter().map(|&k| k as f64).collect();
        let title = format!(
            "c = {}, Type {code} Hash Function, k vs False Positive Rate",
            sweep.c
        );
        let series = Series::new(title, "k", "False Positive Rate")
            .with_curve(
                "Theoretical False Positive Rate",
                x.clone(),
                sweep.theoretical.clone(),
            )
            .with_curve("Real False Positive Rate", x, sweep.empirical.clone());
        let path = opts.series_dir.join(format!("c{}Type{code}.json", sweep.c));
        series.save(&path)?;
    }
    info!("Task 3 complete");
    Ok(TaskOutcome::Sweeps(sweeps))
}

/// Dispatches on the task number `1`, `2` or `3`.
pub fn run_task(task: u8, config: &ExperimentConfig, opts: &TaskOptions) -> Result<TaskOutcome> {
    match task {
        1 => run_task1(config, opts),
        2 => run_task2(config, opts),
        3 => run_task3(config, opts),
        other => Err(BloomError::InvalidConfig(format!("Unknown task: {other}"))),
    }
}
