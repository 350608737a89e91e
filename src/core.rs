//! Core domain types for alertcast
//!
//! This module defines the read-only event input that the host
//! platform hands to the dispatcher once per error occurrence.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An error-tracking event, as produced by the host platform.
///
/// The dispatcher never mutates an event; it only reads fields while
/// rendering the message template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NotificationEvent {
    /// Short headline of the error occurrence
    pub title: String,
    /// Full event message body
    pub message: String,
    /// Ordered key/value tags attached to the event, e.g. ("level", "error")
    pub tags: Vec<(String, String)>,
    /// Absolute URL of the event on the host platform
    pub absolute_url: String,
}

impl NotificationEvent {
    /// Builds the tag lookup used by template rendering.
    ///
    /// Later entries win when a key repeats, matching how the tags
    /// were written.
    pub fn tag_map(&self) -> HashMap<&str, &str> {
        self.tags
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_map_keeps_the_last_value_for_a_repeated_key() {
        let event = NotificationEvent {
            tags: vec![
                ("level".to_string(), "warning".to_string()),
                ("level".to_string(), "error".to_string()),
            ],
            ..Default::default()
        };
        assert_eq!(event.tag_map().get("level"), Some(&"error"));
    }

    #[test]
    fn tag_map_is_empty_for_an_untagged_event() {
        assert!(NotificationEvent::default().tag_map().is_empty());
    }
}
