//! Byte resources a [`MessageStream`](crate::http::stream::MessageStream) can own.
//!
//! A resource is anything offering read, write, seek, tell, eof, stat and
//! close: a file, an in-memory buffer, a temp buffer spilling to disk, or a
//! one-way pipe, possibly behind a decoding filter. The stream only talks to
//! the [`Resource`] trait and does not care which one it holds.
//!
//! All built-in resources share the same end-of-data rule: `eof()` becomes
//! true once a read of a non-empty buffer returns no bytes, and is cleared
//! again by a successful seek or write.

use std::io::{self, Read, SeekFrom};
use std::time::SystemTime;

pub mod file;
pub mod memory;
pub mod mode;
pub mod reader;
pub mod temp;

pub use file::FileResource;
pub use memory::MemoryResource;
pub use mode::Mode;
pub use reader::ReaderResource;
pub use temp::TempResource;

/// What kind of backing store a resource wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapperKind {
    PlainFile,
    Memory,
    Temp,
    Pipe,
    /// A transformation layered over another source; its size cannot be
    /// stat'ed.
    Filter,
}

impl WrapperKind {
    /// Whether stat information describes the bytes the resource yields.
    pub fn is_real(self) -> bool {
        self != WrapperKind::Filter
    }
}

/// Static description of a resource, captured once when a stream attaches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceMeta {
    pub mode: Mode,
    pub seekable: bool,
    pub local: bool,
    pub uri: Option<String>,
    pub wrapper: WrapperKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceStat {
    pub size: u64,
    pub modified: Option<SystemTime>,
}

pub trait Resource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Moves the cursor and returns its new offset from the start.
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64>;

    fn tell(&mut self) -> io::Result<u64>;

    fn eof(&self) -> bool;

    /// Size information, or `None` when the resource cannot be stat'ed.
    ///
    /// Resources that cache their stat must query the system again when
    /// `fresh` is set.
    fn stat(&mut self, fresh: bool) -> Option<ResourceStat>;

    fn meta(&self) -> ResourceMeta;

    fn close(&mut self) -> io::Result<()>;
}

impl<T: Resource + ?Sized> Resource for Box<T> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read(buf)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (**self).write(buf)
    }

    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        (**self).seek(pos)
    }

    fn tell(&mut self) -> io::Result<u64> {
        (**self).tell()
    }

    fn eof(&self) -> bool {
        (**self).eof()
    }

    fn stat(&mut self, fresh: bool) -> Option<ResourceStat> {
        (**self).stat(fresh)
    }

    fn meta(&self) -> ResourceMeta {
        (**self).meta()
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

pub(crate) fn closed() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "resource is closed")
}

pub(crate) fn unsupported(what: &str) -> io::Error {
    io::Error::new(io::ErrorKind::Unsupported, format!("resource does not support {what}"))
}

/// Reads into `buf`, raising `eof` when a non-empty read comes back empty.
pub(crate) fn read_tracking_eof<R: Read + ?Sized>(
    reader: &mut R,
    buf: &mut [u8],
    eof: &mut bool,
) -> io::Result<usize> {
    let n = reader.read(buf)?;
    if n == 0 && !buf.is_empty() {
        *eof = true;
    }
    Ok(n)
}
