use crate::config::{FilterConfig, HashParams, HashVariant};
use crate::error::{BloomError, Result};
use crate::prime::next_prime;
use rand::Rng;
use rand_mt::Mt;

/// A family of `k` hash functions over non-negative integers.
///
/// **Contract:**
///
/// - `hash_list(x)` returns exactly `num_hashes()` values, in index order.
/// - Every value lies in `[0, range())`.
/// - The output is a pure function of `x` and the parameters fixed at
///   construction; parameters are never mutated afterwards.
///
/// **Usage:**
///
/// A [`crate::BloomFilter`] asks its family for the list of bit positions
/// of an element on every `add` and `contains`.
pub trait HashFamily {
    fn hash_list(&self, x: u64) -> Vec<usize>;
    fn num_hashes(&self) -> usize;
    fn range(&self) -> usize;
}

/// Re-seeds a 32-bit Mersenne Twister with `seed` and draws one integer in
/// `[0, bound)` by masked rejection over 32-bit outputs.
///
/// Seeds wider than 32 bits are folded to their low word.
pub fn reseed_draw(seed: u64, bound: u32) -> u32 {
    let max = bound.saturating_sub(1);
    if max == 0 {
        return 0;
    }
    let mut mask = max;
    mask |= mask >> 1;
    mask |= mask >> 2;
    mask |= mask >> 4;
    mask |= mask >> 8;
    mask |= mask >> 16;

    let mut mt = Mt::new(seed as u32);
    loop {
        let value = mt.next_u32() & mask;
        if value <= max {
            return value;
        }
    }
}

fn check_range(range: usize) -> Result<u32> {
    match u32::try_from(range) {
        Ok(0) => Err(BloomError::InvalidConfig("Hash range must be > 0".into())),
        Ok(bound) => Ok(bound),
        Err(_) => Err(BloomError::InvalidConfig(format!(
            "Hash range {range} exceeds {}",
            u32::MAX
        ))),
    }
}

/// Hash `i` of `x` is one draw from a generator re-seeded with
/// `seeds[i] + x`.
#[derive(Debug, Clone)]
pub struct SeededReHash {
    seeds: Vec<u64>,
    bound: u32,
}

impl SeededReHash {
    pub fn new(seeds: Vec<u64>, range: usize) -> Result<Self> {
        if seeds.is_empty() {
            return Err(BloomError::InvalidConfig(
                "SeededReHash needs at least one seed".into(),
            ));
        }
        let bound = check_range(range)?;
        Ok(Self { seeds, bound })
    }

    /// Draws `num_hashes` seeds uniformly from `[0, universe_size)`.
    pub fn random<R: Rng + ?Sized>(
        num_hashes: usize,
        range: usize,
        universe_size: u64,
        rng: &mut R,
    ) -> Result<Self> {
        if universe_size == 0 {
            return Err(BloomError::InvalidConfig(
                "Universe size must be > 0".into(),
            ));
        }
        let seeds = (0..num_hashes)
            .map(|_| rng.random_range(0..universe_size))
            .collect();
        Self::new(seeds, range)
    }

    pub fn seeds(&self) -> &[u64] {
        &self.seeds
    }

    fn draw(&self, seed: u64, x: u64) -> usize {
        reseed_draw(seed.wrapping_add(x), self.bound) as usize
    }

    /// Hash `index` of `x`, or `None` when `index >= num_hashes()`.
    pub fn hash_one(&self, index: usize, x: u64) -> Option<usize> {
        self.seeds.get(index).map(|&seed| self.draw(seed, x))
    }
}

impl HashFamily for SeededReHash {
    fn hash_list(&self, x: u64) -> Vec<usize> {
        self.seeds.iter().map(|&seed| self.draw(seed, x)).collect()
    }

    fn num_hashes(&self) -> usize {
        self.seeds.len()
    }

    fn range(&self) -> usize {
        self.bound as usize
    }
}

/// Universal hashing: hash `i` of `x` is `((a[i] * x + b[i]) mod P') mod P`
/// with `P = next_prime(n)` and `P' = next_prime(N)`.
#[derive(Debug, Clone)]
pub struct UniversalAffine {
    a: Vec<u64>,
    b: Vec<u64>,
    prime: u64,
    universe_prime: u64,
}

impl UniversalAffine {
    pub fn new(a: Vec<u64>, b: Vec<u64>, range: usize, universe_size: u64) -> Result<Self> {
        if a.is_empty() {
            return Err(BloomError::InvalidConfig(
                "UniversalAffine needs at least one coefficient pair".into(),
            ));
        }
        if a.len() != b.len() {
            return Err(BloomError::InvalidConfig(format!(
                "Coefficient lists differ in length: a has {}, b has {}",
                a.len(),
                b.len()
            )));
        }
        check_range(range)?;
        let prime = next_prime(range as u64)?;
        let universe_prime = next_prime(universe_size)?;
        if universe_prime < prime {
            return Err(BloomError::InvalidConfig(format!(
                "Universe modulus {universe_prime} is smaller than table modulus {prime}"
            )));
        }
        if let Some(i) = a.iter().position(|&ai| ai % prime == 0) {
            return Err(BloomError::InvalidConfig(format!(
                "Coefficient a[{i}] = {} is 0 mod {prime}",
                a[i]
            )));
        }
        // P may exceed u32 if n is close to u32::MAX
        check_range(prime as usize)?;
        Ok(Self {
            a,
            b,
            prime,
            universe_prime,
        })
    }

    /// Draws `a[i]` from `[1, range)` and `b[i]` from `[0, range)`.
    pub fn random<R: Rng + ?Sized>(
        num_hashes: usize,
        range: usize,
        universe_size: u64,
        rng: &mut R,
    ) -> Result<Self> {
        if range < 2 {
            return Err(BloomError::InvalidConfig(format!(
                "UniversalAffine needs a range of at least 2, got {range}"
            )));
        }
        let n = range as u64;
        let mut a = Vec::with_capacity(num_hashes);
        let mut b = Vec::with_capacity(num_hashes);
        for _ in 0..num_hashes {
            a.push(rng.random_range(1..n));
            b.push(rng.random_range(0..n));
        }
        Self::new(a, b, range, universe_size)
    }

    pub fn coefficients(&self) -> (&[u64], &[u64]) {
        (&self.a, &self.b)
    }

    /// `P`, the table modulus.
    pub fn prime(&self) -> u64 {
        self.prime
    }

    /// `P'`, the universe modulus.
    pub fn universe_prime(&self) -> u64 {
        self.universe_prime
    }

    fn affine(&self, a: u64, b: u64, x: u64) -> usize {
        let ax_b = a as u128 * x as u128 + b as u128;
        ((ax_b % self.universe_prime as u128) % self.prime as u128) as usize
    }

    /// Hash `index` of `x`, or `None` when `index >= num_hashes()`.
    pub fn hash_one(&self, index: usize, x: u64) -> Option<usize> {
        let (&a, &b) = self.a.get(index).zip(self.b.get(index))?;
        Some(self.affine(a, b, x))
    }
}

impl HashFamily for UniversalAffine {
    fn hash_list(&self, x: u64) -> Vec<usize> {
        self.a
            .iter()
            .zip(&self.b)
            .map(|(&a, &b)| self.affine(a, b, x))
            .collect()
    }

    fn num_hashes(&self) -> usize {
        self.a.len()
    }

    fn range(&self) -> usize {
        self.prime as usize
    }
}

/// The hash family a filter owns, chosen once from its config.
#[derive(Debug, Clone)]
pub enum FilterHasher {
    SeededReHash(SeededReHash),
    UniversalAffine(UniversalAffine),
}

impl FilterHasher {
    /// Builds the family described by `config`, drawing from `rng` when the
    /// config asks for random parameters.
    ///
    /// `range` is the bit array length the family must hash into.
    pub fn from_config<R: Rng + ?Sized>(
        config: &FilterConfig,
        range: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let k = config.num_hashes;
        let universe = config.universe_size;
        match (config.hash_variant, &config.hash_params) {
            (HashVariant::SeededReHash, HashParams::Random) => Ok(
                Self::SeededReHash(SeededReHash::random(k, range, universe, rng)?),
            ),
            (HashVariant::SeededReHash, HashParams::Seeds(seeds)) => {
                Ok(Self::SeededReHash(SeededReHash::new(seeds.clone(), range)?))
            }
            (HashVariant::UniversalAffine, HashParams::Random) => {
                Ok(Self::UniversalAffine(UniversalAffine::random(
                    k, range, universe, rng,
                )?))
            }
            (HashVariant::UniversalAffine, HashParams::Coefficients { a, b }) => {
                Ok(Self::UniversalAffine(UniversalAffine::new(
                    a.clone(),
                    b.clone(),
                    range,
                    universe,
                )?))
            }
            (variant, params) => Err(BloomError::InvalidConfig(format!(
                "{} parameters do not fit hash variant {variant}",
                params.kind()
            ))),
        }
    }

    pub fn variant(&self) -> HashVariant {
        match self {
            Self::SeededReHash(_) => HashVariant::SeededReHash,
            Self::UniversalAffine(_) => HashVariant::UniversalAffine,
        }
    }
}

impl HashFamily for FilterHasher {
    fn hash_list(&self, x: u64) -> Vec<usize> {
        match self {
            Self::SeededReHash(h) => h.hash_list(x),
            Self::UniversalAffine(h) => h.hash_list(x),
        }
    }

    fn num_hashes(&self) -> usize {
        match self {
            Self::SeededReHash(h) => h.num_hashes(),
            Self::UniversalAffine(h) => h.num_hashes(),
        }
    }

    fn range(&self) -> usize {
        match self {
            Self::SeededReHash(h) => h.range(),
            Self::UniversalAffine(h) => h.range(),
        }
    }
}
