//! Comparison endpoints: a versioned object, or the absence of one.

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use upatch_types::{FileMode, ObjectId};

/// One side of a file comparison.
///
/// `content` is read at most once, front to back, when the hunk body is
/// rendered. The caller owns whatever resource backs it and closes it after
/// the comparison.
#[derive(Clone, Debug)]
pub struct Object<R> {
    /// The object's content stream.
    pub content: R,
    /// Fingerprint of the content.
    pub id: ObjectId,
    /// Root-relative path of the object.
    pub path: PathBuf,
    /// Entry mode of the object.
    pub mode: FileMode,
}

impl<R> Object<R> {
    pub fn new(content: R, id: ObjectId, path: impl Into<PathBuf>, mode: FileMode) -> Self {
        Self {
            content,
            id,
            path: path.into(),
            mode,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// An [`Object`] or the explicit absence of one.
///
/// `Absent` marks the missing side of a creation (old side) or a deletion
/// (new side). At most one side of a comparison may be absent.
#[derive(Clone, Debug)]
pub enum Endpoint<R> {
    Present(Object<R>),
    Absent,
}

impl<R> Endpoint<R> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Endpoint::Absent)
    }

    pub fn object(&self) -> Option<&Object<R>> {
        match self {
            Endpoint::Present(obj) => Some(obj),
            Endpoint::Absent => None,
        }
    }

    /// The object's id, or the null id when absent.
    pub fn id(&self) -> ObjectId {
        self.object().map_or_else(ObjectId::null, |obj| obj.id)
    }

    /// Consume the endpoint, yielding its content. An absent side reads as
    /// empty.
    pub fn into_reader(self) -> EndpointReader<R> {
        match self {
            Endpoint::Present(obj) => EndpointReader::Stream(obj.content),
            Endpoint::Absent => EndpointReader::Empty,
        }
    }
}

impl<R> From<Object<R>> for Endpoint<R> {
    fn from(obj: Object<R>) -> Self {
        Endpoint::Present(obj)
    }
}

impl<R> From<Option<Object<R>>> for Endpoint<R> {
    fn from(obj: Option<Object<R>>) -> Self {
        obj.map_or(Endpoint::Absent, Endpoint::Present)
    }
}

/// Content of an [`Endpoint`] as a reader.
#[derive(Debug)]
pub enum EndpointReader<R> {
    Stream(R),
    Empty,
}

impl<R: Read> Read for EndpointReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            EndpointReader::Stream(r) => r.read(buf),
            EndpointReader::Empty => Ok(0),
        }
    }
}
