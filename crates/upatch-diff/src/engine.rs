//! Line-level hunk engine backed by the `similar` crate.
//!
//! Content is split into lines on `\n` and compared as raw bytes. A trailing
//! newline does not open an extra line, and every emitted line is terminated
//! with `\n`. When exactly one side lacks a final newline, its last line is
//! reported as changed and followed by `\ No newline at end of file`.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use similar::{Algorithm, DiffOp, DiffTag};
use tracing::debug;

use crate::differ::{read_content, HunkRange, LineDiffer};
use crate::error::{PatchError, PatchResult, Side};

/// Line-matching algorithm used by [`SimilarDiffer`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffAlgorithm {
    #[default]
    Myers,
    Patience,
    Lcs,
}

impl From<DiffAlgorithm> for Algorithm {
    fn from(alg: DiffAlgorithm) -> Self {
        match alg {
            DiffAlgorithm::Myers => Algorithm::Myers,
            DiffAlgorithm::Patience => Algorithm::Patience,
            DiffAlgorithm::Lcs => Algorithm::Lcs,
        }
    }
}

/// Settings for [`SimilarDiffer`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifferConfig {
    /// Algorithm used to match lines.
    pub algorithm: DiffAlgorithm,
    /// Unchanged lines kept around each change. Changes closer together
    /// than twice this share a hunk.
    pub context_lines: usize,
}

impl Default for DifferConfig {
    fn default() -> Self {
        Self {
            algorithm: DiffAlgorithm::Myers,
            context_lines: 3,
        }
    }
}

/// The bundled [`LineDiffer`].
#[derive(Clone, Debug, Default)]
pub struct SimilarDiffer {
    config: DifferConfig,
}

impl SimilarDiffer {
    pub fn new(config: DifferConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DifferConfig {
        &self.config
    }
}

impl LineDiffer for SimilarDiffer {
    fn diff(&self, out: &mut dyn Write, a: &mut dyn Read, b: &mut dyn Read) -> PatchResult<()> {
        let old = read_content(a, Side::Old)?;
        let new = read_content(b, Side::New)?;

        let mark_unterminated = lacks_final_newline(&old) != lacks_final_newline(&new);
        let old_lines = split_lines(&old, mark_unterminated);
        let new_lines = split_lines(&new, mark_unterminated);
        if old_lines == new_lines {
            return Ok(());
        }

        let ops = similar::capture_diff_slices(self.config.algorithm.into(), &old_lines, &new_lines);
        let hunks = similar::group_diff_ops(ops, self.config.context_lines);
        debug!(
            old_lines = old_lines.len(),
            new_lines = new_lines.len(),
            hunks = hunks.len(),
            "computed line diff"
        );

        for hunk in &hunks {
            write_hunk(out, hunk, &old_lines, &new_lines).map_err(PatchError::SinkWrite)?;
        }
        Ok(())
    }
}

const NO_NEWLINE: &[u8] = b"\\ No newline at end of file\n";

/// One line without its terminator.
///
/// `unterminated` is set only on a final line that lacks `\n` while the
/// other side's final line has one, so that line never matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct Line<'a> {
    text: &'a [u8],
    unterminated: bool,
}

fn lacks_final_newline(data: &[u8]) -> bool {
    !data.is_empty() && !data.ends_with(b"\n")
}

fn split_lines(data: &[u8], mark_unterminated: bool) -> Vec<Line<'_>> {
    if data.is_empty() {
        return Vec::new();
    }
    let body = data.strip_suffix(b"\n");
    let mut lines: Vec<Line<'_>> = body
        .unwrap_or(data)
        .split(|&b| b == b'\n')
        .map(|text| Line { text, unterminated: false })
        .collect();
    if let Some(last) = lines.last_mut() {
        last.unterminated = mark_unterminated && body.is_none();
    }
    lines
}

fn write_hunk(
    out: &mut dyn Write,
    ops: &[DiffOp],
    old: &[Line<'_>],
    new: &[Line<'_>],
) -> std::io::Result<()> {
    let (Some(first), Some(last)) = (ops.first(), ops.last()) else {
        return Ok(());
    };
    let old_range = HunkRange(first.old_range().start..last.old_range().end);
    let new_range = HunkRange(first.new_range().start..last.new_range().end);
    writeln!(out, "@@ -{old_range} +{new_range} @@")?;

    for op in ops {
        let (tag, old_span, new_span) = op.as_tag_tuple();
        match tag {
            DiffTag::Equal => write_lines(out, b' ', &old[old_span])?,
            DiffTag::Delete => write_lines(out, b'-', &old[old_span])?,
            DiffTag::Insert => write_lines(out, b'+', &new[new_span])?,
            DiffTag::Replace => {
                write_lines(out, b'-', &old[old_span])?;
                write_lines(out, b'+', &new[new_span])?;
            }
        }
    }
    Ok(())
}

fn write_lines(out: &mut dyn Write, marker: u8, lines: &[Line<'_>]) -> std::io::Result<()> {
    for line in lines {
        out.write_all(&[marker])?;
        out.write_all(line.text)?;
        out.write_all(b"\n")?;
        if line.unterminated {
            out.write_all(NO_NEWLINE)?;
        }
    }
    Ok(())
}
