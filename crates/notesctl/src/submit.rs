//! One-at-a-time submission of notes.
//!
//! The submit control stays disabled while a request is in flight; here
//! that is an atomic flag released by a guard on every exit path, so a
//! failed request never leaves the session stuck.

use crate::client::FormatBackend;
use crate::errors::SubmitError;
use notes_common::NormalizedResult;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::info;

/// Client-side wait limit; workflows routinely take minutes
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Trim and reject empty notes. No request is made for empty input.
pub fn validate_notes(raw_notes: &str) -> Result<&str, SubmitError> {
    let notes = raw_notes.trim();
    if notes.is_empty() {
        return Err(SubmitError::EmptyInput);
    }
    Ok(notes)
}

pub struct Submitter {
    in_flight: AtomicBool,
    timeout: Duration,
}

impl Submitter {
    pub fn new(timeout: Duration) -> Self {
        Self {
            in_flight: AtomicBool::new(false),
            timeout,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Validate, send, and wait at most `timeout`.
    ///
    /// On timeout the local call is dropped; nothing is sent upstream to
    /// cancel the workflow.
    pub async fn submit(
        &self,
        backend: &dyn FormatBackend,
        raw_notes: &str,
    ) -> Result<NormalizedResult, SubmitError> {
        let notes = validate_notes(raw_notes)?;
        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or(SubmitError::Busy)?;

        info!("Submitting {} chars of notes", notes.len());
        match tokio::time::timeout(self.timeout, backend.format(notes)).await {
            Ok(result) => result.map(NormalizedResult::from),
            Err(_) => Err(SubmitError::Timeout(self.timeout.as_secs())),
        }
    }
}

impl Default for Submitter {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use notes_common::FormatResponse;
    use std::sync::atomic::AtomicUsize;

    struct FakeBackend {
        delay: Duration,
        fail: bool,
        calls: AtomicUsize,
    }

    impl FakeBackend {
        fn new(delay: Duration) -> Self {
            Self {
                delay,
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl FormatBackend for FakeBackend {
        async fn format(&self, raw_notes: &str) -> Result<FormatResponse, SubmitError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if self.fail {
                return Err(SubmitError::Server("Failed to format notes".to_string()));
            }
            Ok(FormatResponse {
                formatted_notes: raw_notes.to_uppercase(),
                is_structured: false,
            })
        }
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_call() {
        let backend = FakeBackend::new(Duration::ZERO);
        let submitter = Submitter::default();

        for input in ["", "   ", "\n\t"] {
            assert_eq!(
                submitter.submit(&backend, input).await,
                Err(SubmitError::EmptyInput)
            );
        }
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_notes_are_trimmed_before_sending() {
        let backend = FakeBackend::new(Duration::ZERO);
        let result = Submitter::default()
            .submit(&backend, "  hello  ")
            .await
            .unwrap();
        assert_eq!(result.text, "HELLO");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_distinct() {
        let backend = FakeBackend::new(Duration::from_secs(600));
        let submitter = Submitter::new(Duration::from_secs(300));

        let err = submitter.submit(&backend, "notes").await.unwrap_err();
        assert_eq!(err, SubmitError::Timeout(300));
        assert!(!submitter.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_concurrent_submit_is_busy() {
        let backend = FakeBackend::new(Duration::from_secs(1));
        let submitter = Submitter::default();

        let (first, second) = tokio::join!(
            submitter.submit(&backend, "one"),
            async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                submitter.submit(&backend, "two").await
            }
        );

        assert_eq!(first.unwrap().text, "ONE");
        assert_eq!(second, Err(SubmitError::Busy));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_usable_after_failure() {
        let mut backend = FakeBackend::new(Duration::ZERO);
        backend.fail = true;
        let submitter = Submitter::default();

        assert!(matches!(
            submitter.submit(&backend, "notes").await,
            Err(SubmitError::Server(_))
        ));

        backend.fail = false;
        assert!(submitter.submit(&backend, "notes").await.is_ok());
    }
}
