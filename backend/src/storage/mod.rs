//! # Storage Module
//!
//! Handles all data persistence for the expense dashboard.
//!
//! The domain layer only sees the traits in [`traits`]; the SQLite implementation
//! lives in [`connection`] and [`repositories`]. The pool is created once at
//! startup and shared by every request.
//!
//! ## Current Implementation
//!
//! - **Primary Storage**: SQLite database through SQLx
//! - **Atomicity**: one statement per write, except the guarded category delete and
//!   the bulk category upsert, which each run inside a single transaction

pub mod connection;
pub mod repositories;
pub mod traits;

pub use connection::DbConnection;
pub use repositories::{CategoryRepository, ExpenseRepository};
pub use traits::{CategoryStorage, Connection, ExpenseStorage};
