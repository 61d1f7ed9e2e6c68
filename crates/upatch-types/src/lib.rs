//! Foundation types for upatch.
//!
//! This crate provides the identity and metadata types that describe one side
//! of a file comparison. The patch renderer in `upatch-diff` depends on it.
//!
//! # Key Types
//!
//! - [`ObjectId`] — Fixed-length content fingerprint, rendered as hex in `index` lines
//! - [`FileMode`] — Entry mode bits, rendered in octal in mode lines

pub mod mode;
pub mod object;

pub use mode::FileMode;
pub use object::ObjectId;
