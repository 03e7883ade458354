use crate::error::{BloomError, Result};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Which hash family a filter uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashVariant {
    /// Type 1: re-seeded pseudo-random draw per hash.
    SeededReHash,
    /// Type 2: `((a*x + b) mod P') mod P`.
    UniversalAffine,
}

impl HashVariant {
    pub const ALL: [HashVariant; 2] =
        [HashVariant::SeededReHash, HashVariant::UniversalAffine];

    /// Numeric type code used in config files.
    pub fn code(self) -> i64 {
        match self {
            HashVariant::SeededReHash => 1,
            HashVariant::UniversalAffine => 2,
        }
    }
}

impl TryFrom<i64> for HashVariant {
    type Error = BloomError;

    fn try_from(code: i64) -> Result<Self> {
        match code {
            1 => Ok(HashVariant::SeededReHash),
            2 => Ok(HashVariant::UniversalAffine),
            other => Err(BloomError::UnknownHashType(other)),
        }
    }
}

impl fmt::Display for HashVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashVariant::SeededReHash => write!(f, "Type 1 (seeded re-hash)"),
            HashVariant::UniversalAffine => {
                write!(f, "Type 2 (universal affine)")
            }
        }
    }
}

/// Where a filter's hash parameters come from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HashParams {
    /// Draw fresh parameters at construction.
    #[default]
    Random,
    /// Fixed seeds for [`HashVariant::SeededReHash`].
    Seeds(Vec<u64>),
    /// Fixed coefficient pairs for [`HashVariant::UniversalAffine`].
    Coefficients { a: Vec<u64>, b: Vec<u64> },
}

impl HashParams {
    pub fn kind(&self) -> &'static str {
        match self {
            HashParams::Random => "Random",
            HashParams::Seeds(_) => "Seed",
            HashParams::Coefficients { .. } => "Coefficient",
        }
    }
}

/// Parameters of one filter instance. Built once, never mutated.
#[derive(Clone, Debug, Builder)]
#[builder(pattern = "owned")]
pub struct FilterConfig {
    /// Universe size N: elements are drawn from `[0, N)`
    #[builder(default = "1_000_000")]
    pub universe_size: u64,

    /// Number of elements m the filter is populated with
    #[builder(default = "10_000")]
    pub capacity: usize,

    /// Bit array length n
    #[builder(default = "100_003")]
    pub bit_array_length: usize,

    /// Hash count k
    #[builder(default = "7")]
    pub num_hashes: usize,

    pub hash_variant: HashVariant,

    #[builder(default)]
    pub hash_params: HashParams,
}

impl FilterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.num_hashes == 0 {
            return Err(BloomError::InvalidConfig(
                "Number of hashes must be > 0".into(),
            ));
        }
        if self.bit_array_length == 0 {
            return Err(BloomError::InvalidConfig(
                "Bit array length must be > 0".into(),
            ));
        }
        if self.bit_array_length > u32::MAX as usize {
            return Err(BloomError::InvalidConfig(format!(
                "Bit array length must be <= {}",
                u32::MAX
            )));
        }
        if self.universe_size == 0 {
            return Err(BloomError::InvalidConfig(
                "Universe size must be > 0".into(),
            ));
        }
        match (&self.hash_variant, &self.hash_params) {
            (_, HashParams::Random) => {}
            (HashVariant::SeededReHash, HashParams::Seeds(seeds)) => {
                if seeds.len() != self.num_hashes {
                    return Err(BloomError::InvalidConfig(format!(
                        "Expected {} seeds, got {}",
                        self.num_hashes,
                        seeds.len()
                    )));
                }
            }
            (HashVariant::UniversalAffine, HashParams::Coefficients { a, b }) => {
                if a.len() != self.num_hashes || b.len() != self.num_hashes {
                    return Err(BloomError::InvalidConfig(format!(
                        "Expected {} coefficient pairs, got a: {}, b: {}",
                        self.num_hashes,
                        a.len(),
                        b.len()
                    )));
                }
            }
            (variant, params) => {
                return Err(BloomError::InvalidConfig(format!(
                    "{} parameters do not fit hash variant {variant}",
                    params.kind()
                )));
            }
        }
        if self.hash_variant == HashVariant::UniversalAffine
            && self.bit_array_length < 2
        {
            return Err(BloomError::InvalidConfig(
                "UniversalAffine needs a bit array of at least 2".into(),
            ));
        }
        Ok(())
    }
}

/// The on-disk experiment configuration.
///
/// Keys follow the project's config files: `N`, `m`, `n`, `k`, `type` and
/// the task-2 hash parameters `seeds`, `a`, `b`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExperimentConfig {
    #[serde(rename = "N")]
    pub universe_size: u64,
    #[serde(rename = "m")]
    pub capacity: usize,
    #[serde(rename = "n")]
    pub bit_array_length: usize,
    #[serde(rename = "k")]
    pub num_hashes: usize,
    #[serde(rename = "type")]
    pub hash_type: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seeds: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b: Option<Vec<u64>>,
    /// Seed for the harness random stream
    #[serde(rename = "genSeed", default, skip_serializing_if = "Option::is_none")]
    pub gen_seed: Option<u64>,
}

impl ExperimentConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn hash_variant(&self) -> Result<HashVariant> {
        HashVariant::try_from(self.hash_type)
    }

    /// Filter config carrying the fixed hash parameters from the file.
    ///
    /// Fails if the parameters required by `type` are missing.
    pub fn supplied_filter_config(&self) -> Result<FilterConfig> {
        let variant = self.hash_variant()?;
        let params = match variant {
            HashVariant::SeededReHash => {
                let seeds = self.seeds.clone().ok_or_else(|| {
                    BloomError::InvalidConfig("Hash type 1 requires 'seeds'".into())
                })?;
                HashParams::Seeds(seeds)
            }
            HashVariant::UniversalAffine => match (&self.a, &self.b) {
                (Some(a), Some(b)) => HashParams::Coefficients {
                    a: a.clone(),
                    b: b.clone(),
                },
                _ => {
                    return Err(BloomError::InvalidConfig(
                        "Hash type 2 requires 'a' and 'b'".into(),
                    ));
                }
            },
        };
        self.filter_config(variant, params)
    }

    /// Filter config drawing fresh hash parameters.
    pub fn random_filter_config(&self) -> Result<FilterConfig> {
        self.filter_config(self.hash_variant()?, HashParams::Random)
    }

    fn filter_config(&self, variant: HashVariant, params: HashParams) -> Result<FilterConfig> {
        let config = FilterConfigBuilder::default()
            .universe_size(self.universe_size)
            .capacity(self.capacity)
            .bit_array_length(self.bit_array_length)
            .num_hashes(self.num_hashes)
            .hash_variant(variant)
            .hash_params(params)
            .build()?;
        config.validate()?;
        Ok(config)
    }
}
