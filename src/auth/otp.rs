/// One-time password generation for password recovery
use rand::Rng;

/// Generate a 6-digit numeric code, uniform over [100000, 999999]
///
/// Returned as a string; the lower bound rules out leading zeros so the
/// textual and numeric forms never disagree.
pub fn generate() -> String {
    let code: u32 = rand::thread_rng().gen_range(100_000..=999_999);
    code.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_six_digits() {
        for _ in 0..1000 {
            let code = generate();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn codes_stay_in_range() {
        for _ in 0..1000 {
            let value: u32 = generate().parse().unwrap();
            assert!((100_000..=999_999).contains(&value));
        }
    }

    #[test]
    fn codes_never_start_with_zero() {
        for _ in 0..1000 {
            assert!(!generate().starts_with('0'));
        }
    }
}
