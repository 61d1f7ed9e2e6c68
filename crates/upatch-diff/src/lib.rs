//! Git-style patch rendering.
//!
//! Splits a patch into the per-file header block (`diff --git`, mode and
//! `index` lines, `---`/`+++` markers) and the hunk body, which is produced
//! by a pluggable [`LineDiffer`]. [`PatchWriter`] composes the two against a
//! single output sink.
//!
//! # Key Types
//!
//! - [`Object`] / [`Endpoint`] -- One side of a comparison, or its absence
//! - [`HeaderFormatter`] / [`write_header`] -- Header block rendering
//! - [`LineDiffer`] -- Contract for hunk-body engines
//! - [`SimilarDiffer`] / [`DifferConfig`] -- Bundled engine backed by `similar`
//! - [`PatchWriter`] / [`PatchConfig`] -- Header-then-body orchestration

pub mod config;
pub mod differ;
pub mod engine;
pub mod error;
pub mod header;
pub mod object;
pub mod writer;

pub use config::PatchConfig;
pub use differ::{read_content, FnDiffer, HunkRange, LineDiffer};
pub use engine::{DiffAlgorithm, DifferConfig, SimilarDiffer};
pub use error::{PatchError, PatchResult, Side};
pub use header::{write_header, HeaderFormatter};
pub use object::{Endpoint, EndpointReader, Object};
pub use writer::PatchWriter;
