use crate::error::{BloomError, Result};

/// Trial division over odd candidates up to `sqrt(x)`.
pub fn is_prime(x: u64) -> bool {
    if x < 2 {
        return false;
    }
    if x % 2 == 0 {
        return x == 2;
    }
    let mut d = 3u64;
    while d.saturating_mul(d) <= x {
        if x % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Smallest prime `>= x`.
///
/// `0` is rejected with [`BloomError::InvalidArgument`]; `1` maps to `2`.
pub fn next_prime(x: u64) -> Result<u64> {
    if x == 0 {
        return Err(BloomError::InvalidArgument(
            "next_prime requires a positive integer".into(),
        ));
    }
    let mut candidate = x.max(2);
    while !is_prime(candidate) {
        candidate = candidate.checked_add(1).ok_or_else(|| {
            BloomError::InvalidArgument(format!("no prime >= {x} fits in u64"))
        })?;
    }
    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_prime_known_values() {
        assert_eq!(next_prime(10).unwrap(), 11);
        assert_eq!(next_prime(13).unwrap(), 13);
        assert_eq!(next_prime(1).unwrap(), 2);
        assert_eq!(next_prime(2).unwrap(), 2);
        assert_eq!(next_prime(32).unwrap(), 37);
        assert_eq!(next_prime(90).unwrap(), 97);
    }

    #[test]
    fn test_next_prime_rejects_zero() {
        assert!(matches!(
            next_prime(0),
            Err(BloomError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_is_prime() {
        let primes: Vec<u64> = (0..30).filter(|&x| is_prime(x)).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
        assert!(is_prime(1_000_003));
        assert!(!is_prime(1_000_001));
    }

    #[test]
    fn test_next_prime_is_minimal() {
        for x in 2..500u64 {
            let p = next_prime(x).unwrap();
            assert!(p >= x);
            assert!(is_prime(p));
            assert!((x..p).all(|y| !is_prime(y)));
        }
    }
}
