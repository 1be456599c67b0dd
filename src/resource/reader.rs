use std::io::{self, Read, SeekFrom};

use flate2::read::{DeflateDecoder, GzDecoder};

use crate::resource::{Mode, Resource, ResourceMeta, ResourceStat, WrapperKind};
use crate::resource::{closed, read_tracking_eof, unsupported};

/// One-way source such as a socket, a child process pipe or a decoder.
///
/// It can only be read front to back: seeking and writing always fail and
/// there is nothing to stat. `tell` reports how many bytes were consumed.
#[derive(Debug)]
pub struct ReaderResource<R> {
    reader: Option<R>,
    pos: u64,
    eof: bool,
    uri: Option<String>,
    wrapper: WrapperKind,
}

impl<R: Read> ReaderResource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
            pos: 0,
            eof: false,
            uri: None,
            wrapper: WrapperKind::Pipe,
        }
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }
}

impl<R: Read> ReaderResource<GzDecoder<R>> {
    /// Decompresses a gzip-encoded source on the fly.
    pub fn gzip(reader: R) -> Self {
        Self {
            wrapper: WrapperKind::Filter,
            ..ReaderResource::new(GzDecoder::new(reader))
        }
    }
}

impl<R: Read> ReaderResource<DeflateDecoder<R>> {
    /// Decompresses a raw deflate source on the fly.
    pub fn deflate(reader: R) -> Self {
        Self {
            wrapper: WrapperKind::Filter,
            ..ReaderResource::new(DeflateDecoder::new(reader))
        }
    }
}

impl<R: Read> Resource for ReaderResource<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let reader = self.reader.as_mut().ok_or_else(closed)?;
        let n = read_tracking_eof(reader, buf, &mut self.eof)?;
        self.pos += n as u64;
        Ok(n)
    }

    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(unsupported("writing"))
    }

    fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
        Err(unsupported("seeking"))
    }

    fn tell(&mut self) -> io::Result<u64> {
        self.reader.as_ref().map(|_| self.pos).ok_or_else(closed)
    }

    fn eof(&self) -> bool {
        self.eof
    }

    fn stat(&mut self, _fresh: bool) -> Option<ResourceStat> {
        None
    }

    fn meta(&self) -> ResourceMeta {
        ResourceMeta {
            mode: Mode::read_only(),
            seekable: false,
            local: false,
            uri: self.uri.clone(),
            wrapper: self.wrapper,
        }
    }

    fn close(&mut self) -> io::Result<()> {
        self.reader.take().map(drop).ok_or_else(closed)
    }
}
