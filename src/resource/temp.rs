use std::io::{self, Seek, SeekFrom, Write};

use tempfile::SpooledTempFile;

use crate::config::config;
use crate::resource::{Mode, Resource, ResourceMeta, ResourceStat, WrapperKind};
use crate::resource::{closed, read_tracking_eof};

/// Scratch buffer kept in memory up to a limit, then moved to an anonymous
/// file on disk.
#[derive(Debug)]
pub struct TempResource {
    file: Option<SpooledTempFile>,
    eof: bool,
}

impl TempResource {
    /// Uses the configured [`temp_memory_limit`](crate::config::MessageConfig::temp_memory_limit).
    pub fn new() -> Self {
        Self::with_limit(config().temp_memory_limit)
    }

    pub fn with_limit(memory_limit: usize) -> Self {
        Self {
            file: Some(tempfile::spooled_tempfile(memory_limit)),
            eof: false,
        }
    }

    /// Whether the contents have spilled to disk.
    pub fn is_rolled(&self) -> bool {
        self.file.as_ref().is_some_and(SpooledTempFile::is_rolled)
    }

    fn file(&mut self) -> io::Result<&mut SpooledTempFile> {
        self.file.as_mut().ok_or_else(closed)
    }
}

impl Default for TempResource {
    fn default() -> Self {
        Self::new()
    }
}

impl Resource for TempResource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let file = self.file.as_mut().ok_or_else(closed)?;
        read_tracking_eof(file, buf, &mut self.eof)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.file()?.write(buf)?;
        self.eof = false;
        Ok(n)
    }

    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let offset = self.file()?.seek(pos)?;
        self.eof = false;
        Ok(offset)
    }

    fn tell(&mut self) -> io::Result<u64> {
        self.file()?.stream_position()
    }

    fn eof(&self) -> bool {
        self.eof
    }

    fn stat(&mut self, _fresh: bool) -> Option<ResourceStat> {
        let file = self.file.as_mut()?;
        let pos = file.stream_position().ok()?;
        let size = file.seek(SeekFrom::End(0)).ok()?;
        file.seek(SeekFrom::Start(pos)).ok()?;

        Some(ResourceStat {
            size,
            modified: None,
        })
    }

    fn meta(&self) -> ResourceMeta {
        ResourceMeta {
            mode: Mode::read_write(),
            seekable: true,
            local: true,
            uri: Some("temp".to_string()),
            wrapper: WrapperKind::Temp,
        }
    }

    fn close(&mut self) -> io::Result<()> {
        self.file.take().map(drop).ok_or_else(closed)
    }
}
