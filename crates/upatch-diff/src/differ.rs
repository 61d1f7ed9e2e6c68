//! The contract a hunk-body engine fulfils to plug into [`PatchWriter`].
//!
//! [`PatchWriter`]: crate::PatchWriter

use std::fmt;
use std::io::{Read, Write};
use std::ops::Range;

use crate::error::{PatchError, PatchResult, Side};

/// Turns two content streams into a unified diff body.
///
/// An implementation reads `a` and `b` to the end exactly once and writes
/// zero or more hunks to `out`, each headed by `@@ -<old> +<new> @@` and
/// followed by lines prefixed with ` `, `-` or `+`. It never writes a file
/// header. Empty or identical inputs produce no output. Applying the hunks
/// to `a` must reproduce `b`; how minimal the hunks are is up to the
/// implementation.
///
/// Read failures are reported as [`PatchError::StreamRead`], write failures
/// as [`PatchError::SinkWrite`].
///
/// Plain functions plug in through [`FnDiffer`].
pub trait LineDiffer {
    fn diff(&self, out: &mut dyn Write, a: &mut dyn Read, b: &mut dyn Read) -> PatchResult<()>;
}

/// Adapts a function value into a [`LineDiffer`].
#[derive(Clone, Copy, Debug)]
pub struct FnDiffer<F>(pub F);

impl<F> LineDiffer for FnDiffer<F>
where
    F: Fn(&mut dyn Write, &mut dyn Read, &mut dyn Read) -> PatchResult<()>,
{
    fn diff(&self, out: &mut dyn Write, a: &mut dyn Read, b: &mut dyn Read) -> PatchResult<()> {
        (self.0)(out, a, b)
    }
}

impl<D: LineDiffer + ?Sized> LineDiffer for &D {
    fn diff(&self, out: &mut dyn Write, a: &mut dyn Read, b: &mut dyn Read) -> PatchResult<()> {
        (**self).diff(out, a, b)
    }
}

impl<D: LineDiffer + ?Sized> LineDiffer for Box<D> {
    fn diff(&self, out: &mut dyn Write, a: &mut dyn Read, b: &mut dyn Read) -> PatchResult<()> {
        (**self).diff(out, a, b)
    }
}

/// Read a whole content stream, tagging failures with the side they came from.
pub fn read_content(reader: &mut dyn Read, side: Side) -> PatchResult<Vec<u8>> {
    let mut buf = Vec::new();
    reader
        .read_to_end(&mut buf)
        .map_err(|source| PatchError::StreamRead { side, source })?;
    Ok(buf)
}

/// A line range as printed in a hunk marker.
///
/// One-line ranges print only the start. Empty ranges print the line before
/// the insertion point followed by `,0`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HunkRange(pub Range<usize>);

impl fmt::Display for HunkRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.0.start + 1;
        match self.0.len() {
            1 => write!(f, "{start}"),
            0 => write!(f, "{},0", start - 1),
            len => write!(f, "{start},{len}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn hunk_range_formats() {
        assert_eq!(HunkRange(0..1).to_string(), "1");
        assert_eq!(HunkRange(0..2).to_string(), "1,2");
        assert_eq!(HunkRange(4..7).to_string(), "5,3");
        assert_eq!(HunkRange(0..0).to_string(), "0,0");
        assert_eq!(HunkRange(3..3).to_string(), "3,0");
    }

    #[test]
    fn closures_are_differs() {
        let differ = FnDiffer(
            |out: &mut dyn Write, _a: &mut dyn Read, _b: &mut dyn Read| -> PatchResult<()> {
                out.write_all(b"@@ -0,0 +0,0 @@\n").map_err(PatchError::SinkWrite)
            },
        );
        let mut out = Vec::new();
        differ
            .diff(&mut out, &mut io::empty(), &mut io::empty())
            .unwrap();
        assert_eq!(out, b"@@ -0,0 +0,0 @@\n");
    }

    #[test]
    fn boxed_differs_delegate() {
        let boxed: Box<dyn LineDiffer> = Box::new(FnDiffer(
            |_: &mut dyn Write, a: &mut dyn Read, _: &mut dyn Read| -> PatchResult<()> {
                read_content(a, Side::Old).map(|_| ())
            },
        ));
        let mut out = Vec::new();
        boxed
            .diff(&mut out, &mut &b"x"[..], &mut io::empty())
            .unwrap();
        assert!(out.is_empty());
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::UnexpectedEof, "truncated"))
        }
    }

    #[test]
    fn read_failure_names_the_side() {
        let err = read_content(&mut FailingReader, Side::New).unwrap_err();
        match err {
            PatchError::StreamRead { side, source } => {
                assert_eq!(side, Side::New);
                assert_eq!(source.kind(), io::ErrorKind::UnexpectedEof);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
