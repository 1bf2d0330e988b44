//! # TaskFlow
//!
//! Task dashboard core with pluggable storage.
//!
//! ## Key Features
//!
//! - **Task collection**: ordered, id-keyed tasks updated in place.
//! - **Live statistics**: total, completed, in-progress and upcoming counts
//!   recomputed after every change.
//! - **Form validation**: field-level messages for the creation form.
//! - **Pluggable storage**: a local JSON file or a hosted record store,
//!   chosen in `taskflow.toml`.
//! - **Explicit session**: signed-in user and theme preference gate which
//!   views are reachable.
//!
//! ## Module Organization
//!
//! - `fields`, `task`: task data model
//! - `validate`: creation form validation
//! - `collection`: in-memory task collection
//! - `stats`: overview counts
//! - `repository`: storage contract with `local` and `remote` backends
//! - `dashboard`: request/response driver over a repository
//! - `session`: session context and route gate
//! - `config`, `error`, `db`: configuration, errors, JSON files and formatting
//! - `cli`, `cmd`: command-line interface

pub mod cli;
pub mod cmd;
pub mod collection;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod fields;
pub mod repository;
pub mod session;
pub mod stats;
pub mod task;
pub mod validate;

pub use error::{Error, Result};
