//! # IO Module
//!
//! Adapter layer between HTTP clients and the domain services.
//!
//! Handlers translate query strings and JSON bodies into service calls and turn the
//! results, or the [`DomainError`](crate::domain::DomainError) they fail with, into JSON
//! responses with the matching status code.

pub mod rest;
