//! Ordered fallback chains
//!
//! Attempts are boxed futures; nothing runs until the chain polls it, so
//! later attempts cost nothing once an earlier one succeeds.

use futures::future::BoxFuture;
use std::fmt::Display;
use tracing::{debug, warn};

/// One named attempt in a fallible chain
pub struct Attempt<'a, T, E> {
    pub name: &'static str,
    pub run: BoxFuture<'a, Result<T, E>>,
}

impl<'a, T, E> Attempt<'a, T, E> {
    pub fn new(name: &'static str, run: BoxFuture<'a, Result<T, E>>) -> Self {
        Self { name, run }
    }
}

/// Await attempts in order and return the first `Ok`.
///
/// Each failure is logged. When every attempt fails the last error is
/// returned; an empty chain yields `empty()`.
pub async fn first_ok<T, E, F>(attempts: Vec<Attempt<'_, T, E>>, empty: F) -> Result<T, E>
where
    E: Display,
    F: FnOnce() -> E,
{
    let mut last_error = None;
    for attempt in attempts {
        match attempt.run.await {
            Ok(value) => {
                debug!(source = attempt.name, "Fallback chain satisfied");
                return Ok(value);
            }
            Err(e) => {
                warn!(source = attempt.name, error = %e, "Attempt failed, trying next source");
                last_error = Some(e);
            }
        }
    }
    Err(last_error.unwrap_or_else(empty))
}

/// Await optional attempts in order and return the first `Some`
pub async fn first_some<T>(attempts: Vec<BoxFuture<'_, Option<T>>>) -> Option<T> {
    for attempt in attempts {
        if let Some(value) = attempt.await {
            return Some(value);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_first_ok_short_circuits() {
        let polled = AtomicUsize::new(0);
        let attempts: Vec<Attempt<'_, u32, String>> = vec![
            Attempt::new("a", async { Err("down".to_string()) }.boxed()),
            Attempt::new("b", async { Ok(2) }.boxed()),
            Attempt::new(
                "c",
                async {
                    polled.fetch_add(1, Ordering::SeqCst);
                    Ok(3)
                }
                .boxed(),
            ),
        ];
        let result = first_ok(attempts, || "empty".to_string()).await;
        assert_eq!(result, Ok(2));
        assert_eq!(polled.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_first_ok_returns_last_error() {
        let attempts: Vec<Attempt<'_, u32, String>> = vec![
            Attempt::new("a", async { Err("first".to_string()) }.boxed()),
            Attempt::new("b", async { Err("second".to_string()) }.boxed()),
        ];
        let result = first_ok(attempts, || "empty".to_string()).await;
        assert_eq!(result, Err("second".to_string()));
    }

    #[tokio::test]
    async fn test_first_ok_empty_chain() {
        let result: Result<u32, String> = first_ok(Vec::new(), || "empty".to_string()).await;
        assert_eq!(result, Err("empty".to_string()));
    }

    #[tokio::test]
    async fn test_first_some() {
        let attempts: Vec<BoxFuture<'_, Option<&str>>> = vec![
            async { None }.boxed(),
            async { Some("번역명") }.boxed(),
            async { Some("unused") }.boxed(),
        ];
        assert_eq!(first_some(attempts).await, Some("번역명"));

        let none: Vec<BoxFuture<'_, Option<&str>>> = vec![async { None }.boxed()];
        assert_eq!(first_some(none).await, None);
    }
}
