//! Service layer containing business logic and side-effect helpers.
//!
//! ## Service map
//! - `checker.rs` — rule resolution, rule execution, outcome aggregation.
//! - `exec.rs` — rule command invocation shapes + subprocess capture.
//! - `archive.rs` — package log-directory resolution + artifact archiving.
//! - `events.rs` — append-only validation event log.
//! - `config.rs` — optional TOML config + settings precedence.
//! - `output.rs` — stdout/stderr diagnostics routing.
//!
//! ## Conventions
//! - Prefer pure helpers where possible.
//! - Side effects should be explicit and localized.
//! - Keep command handlers thin; delegate to services.

pub mod archive;
pub mod checker;
pub mod config;
pub mod events;
pub mod exec;
pub mod output;
