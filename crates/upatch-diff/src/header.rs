//! Per-file header block of a git-style patch.
//!
//! ```text
//! diff --git a/src/lib.rs b/src/lib.rs
//! index 4f3c...e1..9a07...5d 100644
//! --- a/src/lib.rs
//! +++ b/src/lib.rs
//! ```
//!
//! Creations and deletions add a `new file mode` / `deleted file mode` line,
//! drop the mode from the `index` line and use `/dev/null` for the missing
//! side. Renames and copies are not detected; a moved file is rendered as a
//! deletion plus a creation.

use std::ffi::OsStr;
use std::fmt;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::{PatchError, PatchResult};
use crate::object::Endpoint;

const DEV_NULL: &str = "/dev/null";

/// Renders header blocks with a fixed pair of path prefixes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeaderFormatter {
    src_prefix: PathBuf,
    dst_prefix: PathBuf,
}

impl HeaderFormatter {
    pub fn new(src_prefix: impl Into<PathBuf>, dst_prefix: impl Into<PathBuf>) -> Self {
        Self {
            src_prefix: src_prefix.into(),
            dst_prefix: dst_prefix.into(),
        }
    }

    pub fn src_prefix(&self) -> &Path {
        &self.src_prefix
    }

    pub fn dst_prefix(&self) -> &Path {
        &self.dst_prefix
    }

    /// Write the header for `src` -> `dst` to `out`.
    pub fn write<W, R, S>(&self, out: &mut W, src: &Endpoint<R>, dst: &Endpoint<S>) -> PatchResult<()>
    where
        W: Write + ?Sized,
    {
        write_header(out, src, dst, &self.src_prefix, &self.dst_prefix)
    }
}

/// Write the header block comparing `src` with `dst`.
///
/// Fails with [`PatchError::EmptyComparison`] before writing anything when
/// both sides are absent. When one side is absent, the present side's path
/// fills both slots of the `diff --git` line.
pub fn write_header<W, R, S>(
    out: &mut W,
    src: &Endpoint<R>,
    dst: &Endpoint<S>,
    src_prefix: &Path,
    dst_prefix: &Path,
) -> PatchResult<()>
where
    W: Write + ?Sized,
{
    let src_path = src.object().map(|o| join_clean(src_prefix, &o.path));
    let dst_path = dst.object().map(|o| join_clean(dst_prefix, &o.path));

    let (src_path, dst_path) = match (src_path, dst_path) {
        (None, None) => return Err(PatchError::EmptyComparison),
        (Some(s), None) => (s.clone(), s),
        (None, Some(d)) => (d.clone(), d),
        (Some(s), Some(d)) => (s, d),
    };
    let (src_path, dst_path) = (src_path.display(), dst_path.display());

    debug!(src = %src_path, dst = %dst_path, "writing patch header");

    emit(out, format_args!("diff --git {src_path} {dst_path}"))?;
    match (src, dst) {
        (Endpoint::Absent, Endpoint::Present(new)) => {
            emit(out, format_args!("new file mode {}", new.mode))?;
            emit(out, format_args!("index {}..{}", src.id(), new.id))?;
            emit(out, format_args!("--- {DEV_NULL}"))?;
            emit(out, format_args!("+++ {dst_path}"))?;
        }
        (Endpoint::Present(old), Endpoint::Absent) => {
            emit(out, format_args!("deleted file mode {}", old.mode))?;
            emit(out, format_args!("index {}..{}", old.id, dst.id()))?;
            emit(out, format_args!("--- {src_path}"))?;
            emit(out, format_args!("+++ {DEV_NULL}"))?;
        }
        (Endpoint::Present(old), Endpoint::Present(new)) => {
            emit(out, format_args!("index {}..{} {}", old.id, new.id, new.mode))?;
            emit(out, format_args!("--- {src_path}"))?;
            emit(out, format_args!("+++ {dst_path}"))?;
        }
        (Endpoint::Absent, Endpoint::Absent) => unreachable!("rejected above"),
    }
    Ok(())
}

/// Join `path` onto `prefix` and clean the result lexically.
///
/// A root on `path` is ignored so the prefix always survives. `.` components
/// are dropped, `..` removes the name before it, and no trailing separator is
/// kept.
fn join_clean(prefix: &Path, path: &Path) -> PathBuf {
    let mut joined = PathBuf::new();
    let mut names: Vec<&OsStr> = Vec::new();
    let tail = path
        .components()
        .filter(|c| !matches!(c, Component::Prefix(_) | Component::RootDir));
    for component in prefix.components().chain(tail) {
        match component {
            Component::Prefix(_) | Component::RootDir => joined.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match names.last() {
                Some(last) if *last != OsStr::new("..") => {
                    names.pop();
                }
                // `..` cannot climb above a root
                _ if joined.has_root() => {}
                _ => names.push(component.as_os_str()),
            },
            Component::Normal(name) => names.push(name),
        }
    }
    joined.extend(names);
    let both_empty = prefix.as_os_str().is_empty() && path.as_os_str().is_empty();
    if joined.as_os_str().is_empty() && !both_empty {
        joined.push(".");
    }
    joined
}

fn emit<W: Write + ?Sized>(out: &mut W, line: fmt::Arguments<'_>) -> PatchResult<()> {
    out.write_fmt(line)
        .and_then(|()| out.write_all(b"\n"))
        .map_err(PatchError::SinkWrite)
}
