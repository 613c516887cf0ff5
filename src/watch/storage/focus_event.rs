use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

/// Message sent from collection to processing every time the focused application changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusChangeEvent {
    /// Application that just lost focus. Empty for the very first detection.
    pub previous: Arc<str>,
    pub current: Arc<str>,
    pub moment: DateTime<Utc>,
    pub date: NaiveDate,
}
