use std::io::{self, Cursor, Seek, SeekFrom, Write};

use crate::resource::{Mode, Resource, ResourceMeta, ResourceStat, WrapperKind};
use crate::resource::{closed, read_tracking_eof};

/// Growable in-memory buffer, readable and writable.
#[derive(Debug)]
pub struct MemoryResource {
    buf: Option<Cursor<Vec<u8>>>,
    eof: bool,
}

impl MemoryResource {
    pub fn new() -> Self {
        Self::from_bytes(Vec::new())
    }

    /// Buffer pre-filled with `data`, cursor at the start.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self {
            buf: Some(Cursor::new(data.into())),
            eof: false,
        }
    }

    /// Hands back the buffer contents, or `None` once closed.
    pub fn into_inner(self) -> Option<Vec<u8>> {
        self.buf.map(Cursor::into_inner)
    }

    fn buf(&mut self) -> io::Result<&mut Cursor<Vec<u8>>> {
        self.buf.as_mut().ok_or_else(closed)
    }
}

impl Default for MemoryResource {
    fn default() -> Self {
        Self::new()
    }
}

impl Resource for MemoryResource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let cursor = self.buf.as_mut().ok_or_else(closed)?;
        read_tracking_eof(cursor, buf, &mut self.eof)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.buf()?.write(buf)?;
        self.eof = false;
        Ok(n)
    }

    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let offset = self.buf()?.seek(pos)?;
        self.eof = false;
        Ok(offset)
    }

    fn tell(&mut self) -> io::Result<u64> {
        Ok(self.buf()?.position())
    }

    fn eof(&self) -> bool {
        self.eof
    }

    fn stat(&mut self, _fresh: bool) -> Option<ResourceStat> {
        let cursor = self.buf.as_ref()?;
        Some(ResourceStat {
            size: cursor.get_ref().len() as u64,
            modified: None,
        })
    }

    fn meta(&self) -> ResourceMeta {
        ResourceMeta {
            mode: Mode::read_write(),
            seekable: true,
            local: true,
            uri: Some("memory".to_string()),
            wrapper: WrapperKind::Memory,
        }
    }

    fn close(&mut self) -> io::Result<()> {
        self.buf.take().map(drop).ok_or_else(closed)
    }
}
