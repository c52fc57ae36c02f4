//! Draw code generation
//!
//! Codes are the only credential needed to look up a draw, so they are drawn
//! from a CSPRNG. Uniqueness is checked by the caller's storage.

use std::future::Future;

use rand::Rng;

use super::random::RandomSource;
use crate::error::DomainError;

/// Base62 alphabet
const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Length of codes minted for new draws
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Attempts before giving up on finding a free code
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Generate a random alphanumeric code of `length` characters
pub fn generate<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Generate default-length codes until `exists` reports one as free.
///
/// Fails with `ExhaustedAttempts` after `max_attempts` candidates were all
/// taken. Errors from `exists` abort immediately.
pub async fn generate_unique<F, Fut>(
    source: &RandomSource,
    mut exists: F,
    max_attempts: u32,
) -> Result<String, DomainError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, DomainError>>,
{
    for attempt in 1..=max_attempts {
        let code = source.with(|rng| generate(rng, DEFAULT_CODE_LENGTH));
        if !exists(code.clone()).await? {
            return Ok(code);
        }
        tracing::debug!(attempt, "Generated code already in use, retrying");
    }

    Err(DomainError::ExhaustedAttempts {
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[test]
    fn generate_respects_length_and_alphabet() {
        let source = RandomSource::seeded(42);

        for length in [1, 6, 10, 32] {
            let code = source.with(|rng| generate(rng, length));
            assert_eq!(code.len(), length);
            assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn generate_zero_length_is_empty() {
        let source = RandomSource::seeded(42);
        assert_eq!(source.with(|rng| generate(rng, 0)), "");
    }

    #[test]
    fn generate_is_deterministic_under_seed() {
        let a = RandomSource::seeded(99);
        let b = RandomSource::seeded(99);
        assert_eq!(
            a.with(|rng| generate(rng, 6)),
            b.with(|rng| generate(rng, 6))
        );
    }

    #[test]
    fn generate_covers_the_alphabet() {
        let source = RandomSource::seeded(3);
        let seen: HashSet<char> = source
            .with(|rng| generate(rng, 5_000))
            .chars()
            .collect();
        assert_eq!(seen.len(), ALPHABET.len());
    }

    #[tokio::test]
    async fn generate_unique_returns_first_free_code() {
        let source = RandomSource::seeded(5);

        let code = generate_unique(&source, |_| async { Ok(false) }, DEFAULT_MAX_ATTEMPTS)
            .await
            .unwrap();

        assert_eq!(code.len(), DEFAULT_CODE_LENGTH);
    }

    #[tokio::test]
    async fn generate_unique_retries_taken_codes() {
        let source = RandomSource::seeded(5);
        let calls = AtomicU32::new(0);

        let code = generate_unique(
            &source,
            |_| {
                let taken = calls.fetch_add(1, Ordering::SeqCst) < 3;
                async move { Ok(taken) }
            },
            DEFAULT_MAX_ATTEMPTS,
        )
        .await
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(code.len(), DEFAULT_CODE_LENGTH);
    }

    #[tokio::test]
    async fn generate_unique_exhausts_after_max_attempts() {
        let source = RandomSource::seeded(5);
        let calls = AtomicU32::new(0);

        let result = generate_unique(
            &source,
            |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(true) }
            },
            DEFAULT_MAX_ATTEMPTS,
        )
        .await;

        assert!(matches!(
            result,
            Err(DomainError::ExhaustedAttempts { attempts: 10 })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), DEFAULT_MAX_ATTEMPTS);
    }

    #[tokio::test]
    async fn generate_unique_propagates_storage_errors() {
        let source = RandomSource::seeded(5);

        let result = generate_unique(
            &source,
            |_| async { Err(DomainError::Database("connection reset".to_string())) },
            DEFAULT_MAX_ATTEMPTS,
        )
        .await;

        assert!(matches!(result, Err(DomainError::Database(_))));
    }
}
