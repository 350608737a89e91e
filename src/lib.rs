//! Alertcast - templated chat notifications for error-tracking events
//!
//! This library takes an error event from a host platform, renders a
//! user-configured message template, and delivers the result to every
//! configured chat receiver through a messaging API that authenticates
//! with an OAuth2 client-credentials exchange. A failure delivering to
//! one receiver never aborts delivery to the others; callers get a
//! per-receiver report instead of an exception.

pub mod client;
pub mod config;
pub mod core;
pub mod dispatch;
pub mod receivers;
pub mod template;
pub mod token;

// Re-export the types most hosts touch.
pub use crate::config::{ProjectConfig, ServiceConfig};
pub use crate::core::NotificationEvent;
pub use crate::dispatch::{Delivery, DeliveryOutcome, DeliveryReport, Dispatcher, NotifyError};
pub use crate::token::AccessToken;
