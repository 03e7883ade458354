//! Bloom filter over integer elements with interchangeable hash families,
//! plus a Monte Carlo harness measuring its false positive rate.
//!
//! HowTo:
//!    * Hash families: every family maps an element `x` to `k` positions in
//!      `[0, n)`.
//!        - Seeded re-hash: hash `i` re-seeds a Mersenne Twister with
//!          `seed[i] + x` and draws one value.
//!        - Universal affine: hash `i` is `((a[i] * x + b[i]) mod P') mod P`
//!          with `P = next_prime(n)` and `P' = next_prime(N)`.
//!    * Filter: a fixed bit array of length `n` and one hash family, chosen
//!      once from a [`FilterConfig`].
//!
//! Insertion:
//!     * Hash the element and set all `k` bits.
//! Query:
//!     * The element is reported present iff all `k` bits are set.
//!
//! Trials:
//!     * Populate a fresh filter with the first `m` elements of a sequence,
//!       count how many of the remaining elements are reported present, and
//!       average over trials with freshly drawn hash parameters.
//!     * Compare against the bound `(1 - e^(-k/c))^k` with `c = n / m`.

pub mod config;
mod error;
pub mod experiment;
mod filter;
pub mod hash;
pub mod io;
pub mod prime;
pub mod series;
pub mod trials;

pub use config::{
    ExperimentConfig, FilterConfig, FilterConfigBuilder,
    FilterConfigBuilderError, HashParams, HashVariant,
};
pub use error::{BloomError, Result};
pub use filter::BloomFilter;
pub use hash::{FilterHasher, HashFamily, SeededReHash, UniversalAffine};
pub use prime::next_prime;
pub use trials::{
    SweepResult, TrialHarness, populate_and_query,
    theoretical_false_positive_rate,
};
