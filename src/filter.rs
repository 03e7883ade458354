use crate::config::{FilterConfig, HashVariant};
use crate::error::{BloomError, Result};
use crate::hash::{FilterHasher, HashFamily};
use crate::prime::next_prime;
use bitvec::{bitvec, order::Lsb0, slice::BitSlice, vec::BitVec};
use rand::Rng;
use tracing::debug;

/// Fixed-size, in-memory Bloom filter over integer elements.
///
/// Bits only ever go from 0 to 1; there is no removal or clearing.
pub struct BloomFilter {
    config: FilterConfig,
    hasher: FilterHasher,
    bits: BitVec<usize, Lsb0>,
}

impl BloomFilter {
    /// Builds a filter, drawing random hash parameters from the thread-local
    /// generator when the config asks for them.
    pub fn new(config: FilterConfig) -> Result<Self> {
        Self::with_rng(config, &mut rand::rng())
    }

    /// Builds a filter, drawing random hash parameters from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(config: FilterConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;

        // Universal hashing indexes modulo a prime table size
        let bit_len = match config.hash_variant {
            HashVariant::SeededReHash => config.bit_array_length,
            HashVariant::UniversalAffine => {
                next_prime(config.bit_array_length as u64)? as usize
            }
        };
        if bit_len != config.bit_array_length {
            debug!(
                requested = config.bit_array_length,
                bit_len, "Substituted prime bit array length"
            );
        }

        let hasher = FilterHasher::from_config(&config, bit_len, rng)?;
        debug!(
            variant = %hasher.variant(),
            bit_len,
            num_hashes = hasher.num_hashes(),
            "Created bloom filter"
        );

        Ok(Self {
            config,
            hasher,
            bits: bitvec![usize, Lsb0; 0; bit_len],
        })
    }

    pub fn add(&mut self, x: u64) -> Result<()> {
        let capacity = self.bits.len();
        for idx in self.hasher.hash_list(x) {
            if idx >= capacity {
                return Err(BloomError::IndexOutOfBounds {
                    index: idx,
                    capacity,
                });
            }
            self.bits.set(idx, true);
        }
        Ok(())
    }

    /// May report false positives, never false negatives.
    pub fn contains(&self, x: u64) -> Result<bool> {
        let capacity = self.bits.len();
        for idx in self.hasher.hash_list(x) {
            if idx >= capacity {
                return Err(BloomError::IndexOutOfBounds {
                    index: idx,
                    capacity,
                });
            }
            if !self.bits[idx] {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn hash_family(&self) -> &FilterHasher {
        &self.hasher
    }

    pub fn bits(&self) -> &BitSlice<usize, Lsb0> {
        &self.bits
    }

    pub fn bit_len(&self) -> usize {
        self.bits.len()
    }

    pub fn num_hashes(&self) -> usize {
        self.hasher.num_hashes()
    }

    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    pub fn fill_ratio(&self) -> f64 {
        self.count_ones() as f64 / self.bits.len() as f64
    }
}

impl std::fmt::Debug for BloomFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BloomFilter")
            .field("variant", &self.hasher.variant())
            .field("bit_len", &self.bits.len())
            .field("num_hashes", &self.hasher.num_hashes())
            .field("capacity", &self.config.capacity)
            .field("universe_size", &self.config.universe_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FilterConfigBuilder, HashParams};
    use rand::{SeedableRng, rngs::StdRng};

    fn config(variant: HashVariant, n: usize, k: usize) -> FilterConfig {
        FilterConfigBuilder::default()
            .universe_size(100_000)
            .capacity(100)
            .bit_array_length(n)
            .num_hashes(k)
            .hash_variant(variant)
            .build()
            .expect("Unable to build FilterConfig")
    }

    #[test]
    fn test_workflow() {
        let mut rng = StdRng::seed_from_u64(3);
        for variant in HashVariant::ALL {
            let mut filter =
                BloomFilter::with_rng(config(variant, 1009, 4), &mut rng)
                    .expect("Failed to create BloomFilter");
            assert_eq!(filter.count_ones(), 0);
            filter.add(42).unwrap();
            filter.add(4242).unwrap();
            assert!(filter.contains(42).unwrap());
            assert!(filter.contains(4242).unwrap());
            assert!(filter.count_ones() > 0);
            assert!(filter.count_ones() <= 8);
        }
    }

    #[test]
    fn test_affine_substitutes_prime_length() {
        let filter =
            BloomFilter::new(config(HashVariant::UniversalAffine, 1000, 3))
                .unwrap();
        assert_eq!(filter.bit_len(), 1009);

        let filter =
            BloomFilter::new(config(HashVariant::SeededReHash, 1000, 3))
                .unwrap();
        assert_eq!(filter.bit_len(), 1000);
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut filter =
            BloomFilter::new(config(HashVariant::SeededReHash, 500, 5)).unwrap();
        filter.add(17).unwrap();
        let once = filter.bits().to_bitvec();
        filter.add(17).unwrap();
        filter.add(17).unwrap();
        assert_eq!(filter.bits(), once.as_bitslice());
    }

    #[test]
    fn test_mismatched_params_rejected() {
        let config = FilterConfigBuilder::default()
            .num_hashes(2)
            .hash_variant(HashVariant::SeededReHash)
            .hash_params(HashParams::Coefficients {
                a: vec![1, 2],
                b: vec![0, 0],
            })
            .build()
            .unwrap();
        assert!(matches!(
            BloomFilter::new(config),
            Err(BloomError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_fill_ratio_grows() {
        let mut filter =
            BloomFilter::new(config(HashVariant::UniversalAffine, 1000, 3))
                .unwrap();
        assert_eq!(filter.fill_ratio(), 0.0);
        for x in 0..200 {
            filter.add(x).unwrap();
        }
        let ratio = filter.fill_ratio();
        assert!(ratio > 0.0 && ratio < 1.0);
    }
}
