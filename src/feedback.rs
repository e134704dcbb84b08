//! Feedback hand-off to an external collaborator.
//!
//! The engine never talks to storage. Feedback gathered by the
//! surrounding UI is validated here and handed to a [`FeedbackSink`];
//! the shipped [`LogSink`] only logs, real persistence lives outside
//! this crate. Sink failures are reported to the player and never
//! touch match state.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{info, instrument};

/// Opaque identifier a sink assigns to an accepted record.
pub type FeedbackId = String;

/// Error raised while validating or submitting feedback.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum FeedbackError {
    /// A required field was empty.
    #[display("Missing required field: {}", _0)]
    MissingField(&'static str),

    /// The sink could not accept the record.
    #[display("Feedback could not be submitted: {}", _0)]
    SinkUnavailable(String),
}

impl std::error::Error for FeedbackError {}

/// A freeform feedback record gathered from the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    email: String,
    phone: String,
    message: String,
}

impl FeedbackRecord {
    /// Validates and builds a record. Every field is required.
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackError::MissingField`] naming the first empty
    /// field.
    pub fn new(
        email: impl Into<String>,
        phone: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self, FeedbackError> {
        let email = email.into().trim().to_string();
        let phone = phone.into().trim().to_string();
        let message = message.into().trim().to_string();

        if email.is_empty() {
            return Err(FeedbackError::MissingField("email"));
        }
        if phone.is_empty() {
            return Err(FeedbackError::MissingField("phone"));
        }
        if message.is_empty() {
            return Err(FeedbackError::MissingField("message"));
        }

        Ok(Self {
            email,
            phone,
            message,
        })
    }

    /// Contact email.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Contact phone number.
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Freeform feedback text.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Destination for feedback records.
pub trait FeedbackSink {
    /// Hands one record off, returning the identifier it was stored
    /// under.
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackError::SinkUnavailable`] when the destination
    /// cannot accept the record.
    fn submit(&self, record: &FeedbackRecord) -> Result<FeedbackId, FeedbackError>;
}

/// Sink that only logs, standing in when no persistence collaborator
/// is wired up.
#[derive(Debug, Default)]
pub struct LogSink {
    counter: AtomicU64,
}

impl LogSink {
    /// Creates a sink starting its identifiers at one.
    pub fn new() -> Self {
        Self::default()
    }
}

impl FeedbackSink for LogSink {
    #[instrument(skip(self, record))]
    fn submit(&self, record: &FeedbackRecord) -> Result<FeedbackId, FeedbackError> {
        let id = format!("feedback-{}", self.counter.fetch_add(1, Ordering::Relaxed) + 1);
        info!(id = %id, email = %record.email(), "Feedback recorded");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_fields_required() {
        assert_eq!(
            FeedbackRecord::new("", "555-0100", "Great game"),
            Err(FeedbackError::MissingField("email"))
        );
        assert_eq!(
            FeedbackRecord::new("player@example.com", "  ", "Great game"),
            Err(FeedbackError::MissingField("phone"))
        );
        assert_eq!(
            FeedbackRecord::new("player@example.com", "555-0100", ""),
            Err(FeedbackError::MissingField("message"))
        );
    }

    #[test]
    fn test_fields_are_trimmed() {
        let record = FeedbackRecord::new(" player@example.com ", "555-0100", " Loved it ")
            .expect("valid record");
        assert_eq!(record.email(), "player@example.com");
        assert_eq!(record.message(), "Loved it");
    }

    #[test]
    fn test_log_sink_issues_distinct_ids() {
        let sink = LogSink::new();
        let record =
            FeedbackRecord::new("player@example.com", "555-0100", "More rounds please")
                .expect("valid record");
        let first = sink.submit(&record).expect("sink accepts");
        let second = sink.submit(&record).expect("sink accepts");
        assert_ne!(first, second);
    }

    #[test]
    fn test_sink_failures_surface_as_notifications() {
        struct DownSink;
        impl FeedbackSink for DownSink {
            fn submit(&self, _record: &FeedbackRecord) -> Result<FeedbackId, FeedbackError> {
                Err(FeedbackError::SinkUnavailable("connection refused".into()))
            }
        }

        let record = FeedbackRecord::new("player@example.com", "555-0100", "Hi")
            .expect("valid record");
        let error = DownSink.submit(&record).expect_err("sink is down");
        assert!(error.to_string().contains("connection refused"));
    }
}
