//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level errors
//! - [`string`]: display helpers for topics and rationales

pub mod error;
pub mod string;
