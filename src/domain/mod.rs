//! Shared data model layer (structs/constants only).
//!
//! ## Purpose
//! - Keep DTO/report structs in one place.
//! - Avoid cyclic imports and duplicated type definitions.
//! - Make report/event schema changes explicit and reviewable.
//!
//! ## Files
//! - `models.rs` — command output, event record, report/outcome structs.
//! - `constants.rs` — stable constants (sentinels, tokens, path conventions).
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem/network side effects.
//!
//! ## Compatibility note
//! Changes in these structs can affect `--json` outputs and the event log
//! format. Keep schema-impacting changes explicit and synchronized with
//! `docs/contracts/*`.

pub mod constants;
pub mod models;
