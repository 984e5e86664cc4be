//! # City Builder Tools
//!
//! Command-line helpers for the save directory:
//! - Listing saves
//! - Printing a save
//! - Validating every file

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod inspect;
pub mod validate;
