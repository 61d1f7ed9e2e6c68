//! Header-then-body patch orchestration over a single output sink.

use std::io::{Read, Write};
use std::path::PathBuf;

use tracing::debug;

use crate::config::PatchConfig;
use crate::differ::LineDiffer;
use crate::engine::SimilarDiffer;
use crate::error::PatchResult;
use crate::header::HeaderFormatter;
use crate::object::Endpoint;

/// Writes git-style patches: a header block from [`HeaderFormatter`]
/// followed by a hunk body from an injected [`LineDiffer`].
///
/// The header must precede the hunks it describes, so callers normally
/// invoke [`write_header`](Self::write_header) and then
/// [`write_diff`](Self::write_diff) per file, or use
/// [`write_patch`](Self::write_patch) which does both. Nothing is retained
/// between comparisons.
///
/// ```
/// use upatch_diff::{Endpoint, Object, PatchWriter, SimilarDiffer};
/// use upatch_types::{FileMode, ObjectId};
///
/// let mut writer = PatchWriter::with_prefixes(Vec::new(), SimilarDiffer::default(), "a/", "b/");
/// let new = Object::new(&b"hello\n"[..], ObjectId::for_content(b"hello\n"), "greeting.txt", FileMode::REGULAR);
/// writer.write_patch(Endpoint::<&[u8]>::Absent, Endpoint::Present(new)).unwrap();
///
/// let patch = String::from_utf8(writer.into_inner()).unwrap();
/// assert!(patch.starts_with("diff --git b/greeting.txt b/greeting.txt\nnew file mode 100644\n"));
/// assert!(patch.ends_with("--- /dev/null\n+++ b/greeting.txt\n@@ -0,0 +1 @@\n+hello\n"));
/// ```
#[derive(Debug)]
pub struct PatchWriter<W, D> {
    out: W,
    differ: D,
    header: HeaderFormatter,
}

impl<W: Write, D: LineDiffer> PatchWriter<W, D> {
    /// Create a writer with empty path prefixes.
    pub fn new(out: W, differ: D) -> Self {
        Self {
            out,
            differ,
            header: HeaderFormatter::default(),
        }
    }

    /// Create a writer whose header paths are `src_prefix`/`dst_prefix`
    /// joined with each object's path (typically `a/` and `b/`).
    pub fn with_prefixes(
        out: W,
        differ: D,
        src_prefix: impl Into<PathBuf>,
        dst_prefix: impl Into<PathBuf>,
    ) -> Self {
        Self {
            out,
            differ,
            header: HeaderFormatter::new(src_prefix, dst_prefix),
        }
    }

    /// Write only the header comparing `src` with `dst`.
    pub fn write_header<R, S>(&mut self, src: &Endpoint<R>, dst: &Endpoint<S>) -> PatchResult<()> {
        self.header.write(&mut self.out, src, dst)
    }

    /// Diff `a` against `b` and write only the hunk body.
    ///
    /// No checks on absent objects happen here; that is the header's job.
    pub fn write_diff(&mut self, mut a: impl Read, mut b: impl Read) -> PatchResult<()> {
        self.differ.diff(&mut self.out, &mut a, &mut b)
    }

    /// Write the header and then the body for one comparison. An absent side
    /// contributes empty content to the body.
    pub fn write_patch<R: Read, S: Read>(&mut self, src: Endpoint<R>, dst: Endpoint<S>) -> PatchResult<()> {
        self.write_header(&src, &dst)?;
        debug!(
            creation = src.is_absent(),
            deletion = dst.is_absent(),
            "writing patch body"
        );
        self.write_diff(src.into_reader(), dst.into_reader())
    }

    pub fn header(&self) -> &HeaderFormatter {
        &self.header
    }

    pub fn differ(&self) -> &D {
        &self.differ
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> PatchWriter<W, SimilarDiffer> {
    /// Create a writer backed by [`SimilarDiffer`] from configuration.
    pub fn from_config(out: W, config: &PatchConfig) -> Self {
        Self::with_prefixes(
            out,
            SimilarDiffer::new(config.differ.clone()),
            &config.src_prefix,
            &config.dst_prefix,
        )
    }
}
