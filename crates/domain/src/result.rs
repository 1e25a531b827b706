//! Result envelope returned by every token API call

use serde::{Deserialize, Serialize};

/// Success flag, optional payload and human-readable messages.
///
/// Callers must check [`ApiResult::succeeded`] before touching `data`.
/// Absent `succeeded`/`messages` fields deserialize to `false`/empty, so an
/// error body that only carries `messages` reads as a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResult<T> {
    /// Whether the call succeeded.
    #[serde(default)]
    pub succeeded: bool,
    /// Messages meant for the user.
    #[serde(default)]
    pub messages: Vec<String>,
    /// Payload, present on success for calls that return one.
    pub data: Option<T>,
}

impl<T> ApiResult<T> {
    /// Creates a successful result carrying `data`.
    #[must_use]
    pub const fn success(data: T) -> Self {
        Self {
            succeeded: true,
            messages: Vec::new(),
            data: Some(data),
        }
    }

    /// Creates a successful result without a payload.
    #[must_use]
    pub const fn empty_success() -> Self {
        Self {
            succeeded: true,
            messages: Vec::new(),
            data: None,
        }
    }

    /// Creates a failed result with the given messages.
    #[must_use]
    pub fn failure<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            succeeded: false,
            messages: messages.into_iter().map(Into::into).collect(),
            data: None,
        }
    }

    /// Creates a failed result with a single message.
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self::failure([message.into()])
    }

    /// Returns true if the call succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.succeeded
    }

    /// Returns the payload of a successful result.
    #[must_use]
    pub const fn success_data(&self) -> Option<&T> {
        if self.succeeded {
            self.data.as_ref()
        } else {
            None
        }
    }

    /// Joins the messages into one line for display.
    #[must_use]
    pub fn message_line(&self) -> String {
        self.messages.join("; ")
    }
}
