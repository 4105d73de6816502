//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Derive statistics and move whole-state snapshots in and out.

pub mod stats_service;
pub mod tracker_service;
pub mod transfer_service;
