//! Pathy core library.
//!
//! This crate exposes programmatic APIs for inspecting, linting and
//! editing PATH-like environment variables.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `pathlist`: Raw/clean path lists, parsing, normalization, joining.
//! - `dedup`: Order-preserving duplicate removal.
//! - `lint`: Doctor rules and the fixed-list policy.
//! - `diagnostics`: Optional filesystem checks for doctor.
//! - `side_channel`: The descriptor-3 channel back to the invoking shell.
//! - `dispatch`: Command registry, context and dispatch.
//! - `commands`: Command handlers.
//! - `scan`: Shallow directory enumeration.
//! - `complete`: Shell completion candidates.
//! - `shell`: Activation script and export lines.
//! - `models`: Doctor report structs and known-variable metadata.
//! - `output`: Human/JSON printers.
//! - `utils`: Supporting helpers.
pub mod cli;
pub mod commands;
pub mod complete;
pub mod config;
pub mod dedup;
pub mod diagnostics;
pub mod dispatch;
pub mod error;
pub mod lint;
pub mod models;
pub mod output;
pub mod pathlist;
pub mod scan;
pub mod shell;
pub mod side_channel;
pub mod utils;
