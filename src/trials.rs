use crate::config::{FilterConfig, FilterConfigBuilder, HashVariant};
use crate::error::{BloomError, Result};
use crate::filter::BloomFilter;
use crate::prime::next_prime;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Expected false positive rate `(1 - e^(-k/c))^k` for `c` bits per element
/// and `k` hashes.
pub fn theoretical_false_positive_rate(k: usize, c: usize) -> f64 {
    let k = k as f64;
    (1.0 - (-k / c as f64).exp()).powf(k)
}

/// Adds `data[..m]` to `filter`, then queries every element of `data`.
///
/// The result is aligned by index with `data`.
pub fn populate_and_query(data: &[u64], filter: &mut BloomFilter, m: usize) -> Result<Vec<bool>> {
    if m > data.len() {
        return Err(BloomError::IndexOutOfRange {
            requested: m,
            available: data.len(),
        });
    }
    for &x in &data[..m] {
        filter.add(x)?;
    }
    debug!(count = m, "Finished adding integers to bloom filter");
    data.iter().map(|&x| filter.contains(x)).collect()
}

/// Empirical against theoretical false positive rates for one `c`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    pub variant: HashVariant,
    pub c: usize,
    pub ks: Vec<usize>,
    pub empirical: Vec<f64>,
    pub theoretical: Vec<f64>,
}

/// Repeatedly rebuilds filters over one input sequence to measure false
/// positive rates.
///
/// Every trial gets its own generator split off the harness generator, so
/// trials never share a random stream.
#[derive(Debug)]
pub struct TrialHarness {
    data: Vec<u64>,
    universe_size: u64,
    capacity: usize,
    rng: StdRng,
}

impl TrialHarness {
    pub fn new(data: Vec<u64>, universe_size: u64, capacity: usize) -> Result<Self> {
        Self::with_rng(data, universe_size, capacity, StdRng::from_os_rng())
    }

    /// Same as [`TrialHarness::new`] with a reproducible random stream.
    pub fn with_seed(
        data: Vec<u64>,
        universe_size: u64,
        capacity: usize,
        seed: u64,
    ) -> Result<Self> {
        Self::with_rng(data, universe_size, capacity, StdRng::seed_from_u64(seed))
    }

    fn with_rng(data: Vec<u64>, universe_size: u64, capacity: usize, rng: StdRng) -> Result<Self> {
        if data.is_empty() {
            return Err(BloomError::NoData("input sequence is empty".into()));
        }
        if capacity > data.len() {
            return Err(BloomError::IndexOutOfRange {
                requested: capacity,
                available: data.len(),
            });
        }
        Ok(Self {
            data,
            universe_size,
            capacity,
            rng,
        })
    }

    pub fn data(&self) -> &[u64] {
        &self.data
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Config for one sweep point: `n = next_prime(c * m)`, `k` hashes,
    /// fresh random parameters.
    pub fn trial_config(&self, k: usize, c: usize, variant: HashVariant) -> Result<FilterConfig> {
        let n = next_prime((c as u64 * self.capacity as u64).max(1))?;
        let config = FilterConfigBuilder::default()
            .universe_size(self.universe_size)
            .capacity(self.capacity)
            .bit_array_length(n as usize)
            .num_hashes(k)
            .hash_variant(variant)
            .build()?;
        config.validate()?;
        Ok(config)
    }

    /// Mean over `num_trials` of (false positives among `data[m..]`) / m.
    pub fn false_positive_rate(
        &mut self,
        num_trials: usize,
        k: usize,
        c: usize,
        variant: HashVariant,
    ) -> Result<f64> {
        if num_trials == 0 {
            return Err(BloomError::InvalidConfig(
                "Number of trials must be > 0".into(),
            ));
        }
        let config = self.trial_config(k, c, variant)?;
        let m = self.capacity;

        let mut sum = 0.0;
        for trial in 0..num_trials {
            let mut trial_rng = StdRng::seed_from_u64(self.rng.random());
            let mut filter = BloomFilter::with_rng(config.clone(), &mut trial_rng)?;
            for &x in &self.data[..m] {
                filter.add(x)?;
            }
            let mut false_positives = 0usize;
            for &x in &self.data[m..] {
                if filter.contains(x)? {
                    false_positives += 1;
                }
            }
            if m > 0 {
                sum += false_positives as f64 / m as f64;
            }
            debug!(trial, k, c, false_positives, "Trial finished");
        }
        Ok(sum / num_trials as f64)
    }

    pub fn sweep(
        &mut self,
        c: usize,
        ks: &[usize],
        num_trials: usize,
        variant: HashVariant,
    ) -> Result<SweepResult> {
        info!(c, %variant, "Testing false positive rates");
        let mut empirical = Vec::with_capacity(ks.len());
        for &k in ks {
            empirical.push(self.false_positive_rate(num_trials, k, c, variant)?);
        }
        Ok(SweepResult {
            variant,
            c,
            ks: ks.to_vec(),
            empirical,
            theoretical: ks
                .iter()
                .map(|&k| theoretical_false_positive_rate(k, c))
                .collect(),
        })
    }
}
