use std::fs::File;
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::MessageError;
use crate::resource::{Mode, Resource, ResourceMeta, ResourceStat, WrapperKind};
use crate::resource::{closed, read_tracking_eof};

/// A local file opened with an fopen-style mode.
#[derive(Debug)]
pub struct FileResource {
    file: Option<File>,
    path: PathBuf,
    mode: Mode,
    eof: bool,
    stat: Option<ResourceStat>,
}

impl FileResource {
    pub fn open(path: impl AsRef<Path>, mode: &str) -> Result<Self, MessageError> {
        let path = path.as_ref();
        let mode = Mode::parse(mode)?;
        let file = mode.open_options().open(path)?;

        Ok(Self {
            file: Some(file),
            path: path.to_path_buf(),
            mode,
            eof: false,
            stat: None,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file(&mut self) -> io::Result<&mut File> {
        self.file.as_mut().ok_or_else(closed)
    }
}

impl Resource for FileResource {
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

    fn stat(&mut self, fresh: bool) -> Option<ResourceStat> {
        if fresh || self.stat.is_none() {
            let metadata = self.file.as_ref()?.metadata().ok()?;
            self.stat = Some(ResourceStat {
                size: metadata.len(),
                modified: metadata.modified().ok(),
            });
        }
        self.stat
    }

    fn meta(&self) -> ResourceMeta {
        ResourceMeta {
            mode: self.mode.clone(),
            seekable: true,
            local: true,
            uri: Some(self.path.display().to_string()),
            wrapper: WrapperKind::PlainFile,
        }
    }

    fn close(&mut self) -> io::Result<()> {
        let mut file = self.file.take().ok_or_else(closed)?;
        file.flush()
    }
}
