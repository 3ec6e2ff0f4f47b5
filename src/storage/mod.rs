//! SQLite storage layer for FitLog.
//!
//! This module provides the persistence layer using SQLite with:
//! - WAL mode for concurrent reads
//! - Column-presence migrations run on every open
//! - Transaction discipline for multi-statement writes
//!
//! # Submodules
//!
//! - [`catalog`] - Built-in exercise catalog
//! - [`codec`] - JSON and timestamp encodings for stored rows
//! - [`migrations`] - Additive column migrations
//! - [`schema`] - Table definitions and startup checks
//! - [`sqlite`] - Main SQLite storage implementation

pub mod catalog;
pub mod codec;
pub mod migrations;
pub mod schema;
pub mod sqlite;

pub use schema::{SchemaReport, StructuralIssue};
pub use sqlite::{FitStore, StoreCounts};
