//! Pagewire: request-time services for component-based web pages
//!
//! Action link dispatch with event bubbling, partial markup rendering for zone
//! updates, a heartbeat stack for deferred work, a cached translator registry
//! with invalidation, composite field validation, map-backed messages, and
//! lazy session access.

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod heartbeat;
pub mod invalidation;
pub mod logging;
pub mod messages;
pub mod page;
pub mod render;
pub mod session;
pub mod translator;
pub mod types;
pub mod validator;
