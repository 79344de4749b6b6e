//! cotview Core — COT report loading, canonical schema, search, and net positions.
//!
//! This crate contains everything below the UI shells:
//! - Domain types (report types, trader categories and groups, rows, tables)
//! - Report sources (CFTC Socrata API, local CSV files)
//! - Column mapper from the three source header dialects onto one schema
//! - Market search index with deterministic ranking
//! - Net position calculation per trader group

pub mod data;
pub mod domain;
pub mod positions;
pub mod search;
