//! Click event model for asynchronous click accounting.

/// A resolved redirect waiting to be counted.
///
/// Sent from the redirect path to [`crate::domain::click_worker`] through a
/// bounded channel so the HTTP response never waits on the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub link_id: i64,
    pub code: String,
}

impl ClickEvent {
    pub fn new(link_id: i64, code: impl Into<String>) -> Self {
        Self {
            link_id,
            code: code.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_event_creation() {
        let event = ClickEvent::new(12, "abc123");

        assert_eq!(event.link_id, 12);
        assert_eq!(event.code, "abc123");
    }
}
