//! Random short codes for recipe links.

use rand::distr::{Alphanumeric, SampleString};

use crate::error::ShortCodeError;

/// Outcome of one attempt to store a freshly generated code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt<T> {
    Stored(T),
    /// The code is already taken; try another one.
    Collision,
}

pub fn generate_short_code(length: usize) -> String {
    Alphanumeric.sample_string(&mut rand::rng(), length)
}

/// Generate codes and hand them to `store` until one is accepted.
///
/// `store` is expected to insert the code and report a unique-constraint
/// violation as [`Attempt::Collision`], so there is no window between checking
/// for a code and claiming it.
pub fn store_unique_code<T, E, F>(
    length: usize,
    max_attempts: usize,
    store: F,
) -> Result<T, ShortCodeError<E>>
where
    F: FnMut(&str) -> Result<Attempt<T>, E>,
{
    store_with_generator(max_attempts, || generate_short_code(length), store)
}

fn store_with_generator<T, E, G, F>(
    max_attempts: usize,
    mut generate: G,
    mut store: F,
) -> Result<T, ShortCodeError<E>>
where
    G: FnMut() -> String,
    F: FnMut(&str) -> Result<Attempt<T>, E>,
{
    for _ in 0..max_attempts {
        let code = generate();
        if let Attempt::Stored(value) = store(&code).map_err(ShortCodeError::Store)? {
            return Ok(value);
        }
    }
    Err(ShortCodeError::Exhausted(max_attempts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    #[test]
    fn test_generated_code_shape() {
        let code = generate_short_code(6);
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_retries_after_collision() {
        let mut codes: VecDeque<String> = ["taken1", "taken2", "free01"]
            .into_iter()
            .map(String::from)
            .collect();
        let mut seen = Vec::new();

        let result: Result<String, ShortCodeError<()>> = store_with_generator(
            5,
            || codes.pop_front().unwrap(),
            |code| {
                seen.push(code.to_string());
                if code.starts_with("taken") {
                    Ok(Attempt::Collision)
                } else {
                    Ok(Attempt::Stored(code.to_string()))
                }
            },
        );

        assert_eq!(result.unwrap(), "free01");
        assert_eq!(seen, vec!["taken1", "taken2", "free01"]);
    }

    #[test]
    fn test_gives_up_after_max_attempts() {
        let mut calls = 0;
        let result: Result<(), ShortCodeError<()>> = store_unique_code(6, 3, |_| {
            calls += 1;
            Ok(Attempt::Collision)
        });

        assert!(matches!(result, Err(ShortCodeError::Exhausted(3))));
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_store_error_is_not_retried() {
        let mut calls = 0;
        let result: Result<(), ShortCodeError<&str>> = store_unique_code(6, 3, |_| {
            calls += 1;
            Err("connection reset")
        });

        assert!(matches!(result, Err(ShortCodeError::Store("connection reset"))));
        assert_eq!(calls, 1);
    }
}
