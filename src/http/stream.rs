//! Message body as a lazily queried byte stream.
//!
//! A [`MessageStream`] exclusively owns one [`Resource`]. When a resource is
//! attached, its mode, seekability, locality and uri are captured in a
//! [`StreamCache`]; every later operation checks the cache instead of asking
//! the resource again. The cache is only rebuilt by attaching a new
//! resource, apart from [`close`](MessageStream::close) which downgrades it
//! in place.
//!
//! Nothing here fails loudly. Reading an unreadable stream, writing an
//! unwritable one, seeking one that cannot seek, and I/O errors from the
//! resource all answer with `None`, `false` or an empty buffer. Callers that
//! need to tell a short read from the end of data ask [`eof`](MessageStream::eof).
//!
//! ## Lifecycle
//!
//! 1. Unattached: [`MessageStream::new`]
//! 2. Attached: [`set_stream`](MessageStream::set_stream) or one of the
//!    constructors taking a resource
//! 3. Closed, via [`close`](MessageStream::close), or detached, via
//!    [`detach`](MessageStream::detach) which hands the resource back to the
//!    caller without closing it
//!
//! Attaching again from any state starts over with a fresh cache. Dropping
//! the stream closes a resource that is still attached.

use std::fmt;
use std::io::{self, SeekFrom};
use std::path::Path;

use crate::config::config;
use crate::error::MessageError;
use crate::resource::{FileResource, MemoryResource, Resource, ResourceMeta, TempResource, WrapperKind};

/// Snapshot of the attached resource's capabilities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamCache {
    pub readable: bool,
    pub writable: bool,
    pub seekable: bool,
    pub local: bool,
    pub uri: Option<String>,
    pub mode: String,
    pub wrapper: Option<WrapperKind>,
}

impl StreamCache {
    fn build(meta: ResourceMeta) -> Self {
        Self {
            readable: meta.mode.is_readable(),
            writable: meta.mode.is_writable(),
            seekable: meta.seekable,
            local: meta.local,
            uri: meta.uri,
            mode: meta.mode.as_str().to_string(),
            wrapper: Some(meta.wrapper),
        }
    }
}

pub struct MessageStream {
    resource: Option<Box<dyn Resource>>,
    cache: StreamCache,
}

impl MessageStream {
    pub fn new() -> Self {
        Self {
            resource: None,
            cache: StreamCache::default(),
        }
    }

    pub fn with_resource(resource: impl Resource + 'static) -> Self {
        let mut stream = Self::new();
        stream.set_stream(resource);
        stream
    }

    /// Opens the file at `path` with an fopen-style `mode`.
    pub fn open(path: impl AsRef<Path>, mode: &str) -> Result<Self, MessageError> {
        Ok(Self::with_resource(FileResource::open(path, mode)?))
    }

    /// Opens the file at `path` with the configured default mode.
    pub fn open_default(path: impl AsRef<Path>) -> Result<Self, MessageError> {
        Self::open(path, &config().default_mode)
    }

    /// In-memory stream holding `data`, cursor at the start.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::with_resource(MemoryResource::from_bytes(data))
    }

    /// Empty scratch stream that moves to disk once it outgrows the
    /// configured memory limit.
    pub fn temp() -> Self {
        Self::with_resource(TempResource::new())
    }

    /// Attaches `resource` and rebuilds the cache from it.
    ///
    /// A previously attached resource is closed and dropped.
    pub fn set_stream(&mut self, resource: impl Resource + 'static) {
        let resource: Box<dyn Resource> = Box::new(resource);
        self.cache = StreamCache::build(resource.meta());

        if let Some(mut previous) = self.resource.replace(resource) {
            if let Err(err) = previous.close() {
                tracing::debug!(%err, "replaced resource was already closed");
            }
        }

        tracing::debug!(
            mode = %self.cache.mode,
            uri = ?self.cache.uri,
            seekable = self.cache.seekable,
            "attached stream resource"
        );
    }

    /// Reads up to `length` bytes from the cursor with a single read of the
    /// resource, so a pipe hands back whatever it has available.
    ///
    /// At most [`read_chunk_size`](crate::config::MessageConfig::read_chunk_size)
    /// bytes come back per call. An empty buffer with [`eof`](Self::eof) set
    /// means the data ran out. `None` means the stream is not readable or the
    /// read failed.
    pub fn read(&mut self, length: usize) -> Option<Vec<u8>> {
        if !self.cache.readable {
            return None;
        }
        let chunk_size = config().read_chunk_size.max(1);
        let resource = self.resource.as_mut()?;

        let mut buf = vec![0u8; length.min(chunk_size)];
        loop {
            match resource.read(&mut buf) {
                Ok(n) => {
                    buf.truncate(n);
                    return Some(buf);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    tracing::warn!(%err, "stream read failed");
                    return None;
                }
            }
        }
    }

    /// Writes all of `data` and returns how many bytes went out.
    pub fn write(&mut self, data: &[u8]) -> Option<usize> {
        if !self.cache.writable {
            return None;
        }
        let resource = self.resource.as_mut()?;

        let mut written = 0;
        while written < data.len() {
            match resource.write(&data[written..]) {
                Ok(0) => break,
                Ok(n) => written += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    tracing::warn!(%err, "stream write failed");
                    return None;
                }
            }
        }
        Some(written)
    }

    pub fn seek(&mut self, pos: SeekFrom) -> bool {
        if !self.cache.seekable {
            return false;
        }
        match self.resource.as_mut() {
            Some(resource) => resource.seek(pos).is_ok(),
            None => false,
        }
    }

    pub fn rewind(&mut self) -> bool {
        self.seek(SeekFrom::Start(0))
    }

    pub fn tell(&mut self) -> Option<u64> {
        self.resource.as_mut()?.tell().ok()
    }

    /// Whether the resource reported the end of its data. An unattached
    /// stream is always at its end.
    pub fn eof(&self) -> bool {
        self.resource.as_ref().is_none_or(|resource| resource.eof())
    }

    /// Reads the stream from the start, up to `max_length` bytes, and puts
    /// the cursor back where it was.
    ///
    /// A stream that cannot seek is read from its current position instead,
    /// and stays consumed. One that cannot seek and is already at its end
    /// yields nothing.
    pub fn get_contents(&mut self, max_length: Option<usize>) -> Vec<u8> {
        if !self.cache.readable || (!self.cache.seekable && self.eof()) {
            return Vec::new();
        }
        let seekable = self.cache.seekable;
        let chunk_size = config().read_chunk_size.max(1);
        let Some(resource) = self.resource.as_mut() else {
            return Vec::new();
        };

        let saved = if seekable {
            let pos = match resource.tell() {
                Ok(pos) => pos,
                Err(err) => {
                    tracing::warn!(%err, "cannot save stream cursor");
                    return Vec::new();
                }
            };
            if let Err(err) = resource.seek(SeekFrom::Start(0)) {
                tracing::warn!(%err, "cannot rewind stream");
                return Vec::new();
            }
            Some(pos)
        } else {
            None
        };

        let mut contents = Vec::new();
        let mut buf = vec![0u8; chunk_size];
        loop {
            let want = match max_length {
                Some(max) => (max - contents.len()).min(chunk_size),
                None => chunk_size,
            };
            if want == 0 {
                break;
            }

            match fill(&mut **resource, &mut buf[..want]) {
                Ok(n) => {
                    contents.extend_from_slice(&buf[..n]);
                    if n < want {
                        break;
                    }
                }
                Err(err) => {
                    tracing::warn!(%err, "stream read failed");
                    break;
                }
            }
        }

        if let Some(pos) = saved {
            match resource.seek(SeekFrom::Start(pos)) {
                Ok(_) => tracing::trace!(pos, "restored stream cursor"),
                Err(err) => tracing::warn!(%err, pos, "cannot restore stream cursor"),
            }
        }

        contents
    }

    /// [`get_contents`](Self::get_contents) decoded as UTF-8, invalid
    /// sequences replaced.
    pub fn contents_lossy(&mut self) -> String {
        String::from_utf8_lossy(&self.get_contents(None)).into_owned()
    }

    /// Size of the stream in bytes, `None` when nothing is attached.
    ///
    /// Local resources are stat'ed afresh. When the resource cannot be
    /// stat'ed, or is a filter whose stat would describe the wrong bytes,
    /// the size is measured by reading the whole stream.
    pub fn get_size(&mut self) -> Option<u64> {
        let local = self.cache.local;
        let real = self.cache.wrapper.is_some_and(WrapperKind::is_real);
        let resource = self.resource.as_mut()?;

        if real {
            if let Some(stat) = resource.stat(local) {
                return Some(stat.size);
            }
        }

        tracing::trace!(uri = ?self.cache.uri, "no usable stat, measuring stream contents");
        Some(self.get_contents(None).len() as u64)
    }

    /// Closes the resource. On success the stream stops being readable and
    /// writable; the resource stays attached until replaced or detached.
    pub fn close(&mut self) -> bool {
        let Some(resource) = self.resource.as_mut() else {
            return false;
        };

        match resource.close() {
            Ok(()) => {
                self.cache.readable = false;
                self.cache.writable = false;
                tracing::debug!(uri = ?self.cache.uri, "closed stream resource");
                true
            }
            Err(err) => {
                tracing::debug!(%err, "close failed");
                false
            }
        }
    }

    /// Hands the resource over to the caller without closing it.
    pub fn detach(&mut self) -> Option<Box<dyn Resource>> {
        let resource = self.resource.take();
        tracing::debug!(uri = ?self.cache.uri, attached = resource.is_some(), "detached stream resource");
        resource
    }

    /// Whether the stream can be read again after being consumed.
    pub fn is_repeatable(&self) -> bool {
        self.cache.readable && self.cache.seekable
    }

    pub fn is_attached(&self) -> bool {
        self.resource.is_some()
    }

    pub fn is_readable(&self) -> bool {
        self.cache.readable
    }

    pub fn is_writable(&self) -> bool {
        self.cache.writable
    }

    pub fn is_seekable(&self) -> bool {
        self.cache.seekable
    }

    pub fn is_local(&self) -> bool {
        self.cache.local
    }

    pub fn uri(&self) -> Option<&str> {
        self.cache.uri.as_deref()
    }

    pub fn mode(&self) -> &str {
        &self.cache.mode
    }

    pub fn metadata(&self) -> &StreamCache {
        &self.cache
    }
}

impl Default for MessageStream {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MessageStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageStream")
            .field("attached", &self.resource.is_some())
            .field("cache", &self.cache)
            .finish()
    }
}

impl Drop for MessageStream {
    fn drop(&mut self) {
        if let Some(resource) = self.resource.as_mut() {
            if let Err(err) = resource.close() {
                tracing::trace!(%err, "resource already closed on drop");
            }
        }
    }
}

/// Reads until `buf` is full or the resource has no more data.
///
/// An error after some bytes arrived is held back so those bytes are not
/// lost; the next read runs into it again.
fn fill(resource: &mut dyn Resource, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match resource.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) if filled > 0 => {
                tracing::debug!(err = %e, filled, "read failed after partial data");
                break;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
