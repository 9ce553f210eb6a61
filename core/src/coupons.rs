//! Coupon code generation.
//!
//! Codes are minted from a campaign prefix plus a random 6-character
//! suffix, `PREFIX-XXXXXX`, drawn from an unambiguous uppercase
//! alphanumeric alphabet.

use rand::Rng;

/// Alphabet for code suffixes.
const SUFFIX_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of the random suffix.
pub const SUFFIX_LEN: usize = 6;

/// Mint a single `PREFIX-XXXXXX` code.
#[must_use]
pub fn coupon_code<R: Rng + ?Sized>(prefix: &str, rng: &mut R) -> String {
    let mut code = String::with_capacity(prefix.len() + 1 + SUFFIX_LEN);
    code.push_str(prefix);
    code.push('-');
    for _ in 0..SUFFIX_LEN {
        let idx = rng.gen_range(0..SUFFIX_ALPHABET.len());
        code.push(SUFFIX_ALPHABET[idx] as char);
    }
    code
}

/// Mint `count` codes for a campaign prefix.
///
/// Uniqueness is enforced by the store's unique constraint, not here;
/// with a 36^6 suffix space, collisions inside one batch are resolved by
/// regenerating locally.
#[must_use]
pub fn generate_codes<R: Rng + ?Sized>(prefix: &str, count: usize, rng: &mut R) -> Vec<String> {
    let mut codes = Vec::with_capacity(count);
    while codes.len() < count {
        let code = coupon_code(prefix, rng);
        if !codes.contains(&code) {
            codes.push(code);
        }
    }
    codes
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn code_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let code = coupon_code("MONSOON25", &mut rng);
        let (prefix, suffix) = code.split_once('-').unwrap();
        assert_eq!(prefix, "MONSOON25");
        assert_eq!(suffix.len(), SUFFIX_LEN);
        assert!(suffix.bytes().all(|b| SUFFIX_ALPHABET.contains(&b)));
    }

    #[test]
    fn batch_has_no_duplicates() {
        let mut rng = StdRng::seed_from_u64(42);
        let codes = generate_codes("OPEN", 200, &mut rng);
        assert_eq!(codes.len(), 200);
        let mut deduped = codes.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), 200);
    }

    #[test]
    fn deterministic_with_seeded_rng() {
        let a = generate_codes("X", 5, &mut StdRng::seed_from_u64(1));
        let b = generate_codes("X", 5, &mut StdRng::seed_from_u64(1));
        assert_eq!(a, b);
    }
}
