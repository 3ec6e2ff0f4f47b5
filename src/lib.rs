//! FitLog - a local store for workouts, food and body weight
//!
//! The store is a single SQLite file. Everything else in the crate either
//! reads and writes records through [`storage::FitStore`] or moves that
//! file around as a backup.
//!
//! # Architecture
//!
//! - [`storage`] - Schema, migrations and the record layer
//! - [`model`] - Record types (exercises, workouts, sessions, food, weight, user)
//! - [`backup`] - Snapshot export and whole-file restore
//! - [`transport`] - Backup delivery (directory, Google Drive)
//! - [`config`] - Path and credential resolution
//! - [`cli`] - Command-line interface using clap
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backup;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod storage;
pub mod transport;

pub use error::{Error, Result};
