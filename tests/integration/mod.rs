//! Integration tests for pagewire request services

mod config_loading;
mod form_submission;
mod heartbeat_properties;
mod translator_invalidation;
