//! Read access to `.osz` beatmap archives (zip containers).

use std::{
    fs::File,
    io::{BufReader, Read, Seek},
    path::{Path, PathBuf},
};

use thiserror::Error;
use zip::{result::ZipError, ZipArchive};

pub const CHART_SUFFIX: &str = ".osu";

/// Upper bound on the buffer reserved up front from an entry's declared size.
const READ_HINT_CAP: u64 = 4 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("E2001: failed to open archive {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("E2002: not a readable zip archive: {0}")]
    Container(#[source] ZipError),

    #[error("E2003: failed to access entry {index}: {source}")]
    Entry {
        index: usize,
        #[source]
        source: ZipError,
    },

    #[error("E2004: failed to read entry '{name}': {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// One named file inside the archive. Indexes refer to archive order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryHandle {
    pub index: usize,
    pub name: String,
}

pub struct OszArchive<R> {
    zip: ZipArchive<R>,
}

impl OszArchive<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ArchiveError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ArchiveError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: Read + Seek> OszArchive<R> {
    pub fn from_reader(reader: R) -> Result<Self, ArchiveError> {
        let zip = ZipArchive::new(reader).map_err(ArchiveError::Container)?;
        Ok(Self { zip })
    }

    pub fn len(&self) -> usize {
        self.zip.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zip.len() == 0
    }

    /// Entries whose name ends with `suffix` (case-sensitive), in archive order.
    ///
    /// Entries whose header cannot be read are logged and left out.
    pub fn list_entries_with_suffix(&mut self, suffix: &str) -> Vec<EntryHandle> {
        let mut entries = Vec::new();
        for index in 0..self.zip.len() {
            let name = match self.zip.by_index_raw(index) {
                Ok(file) => file.name().to_string(),
                Err(e) => {
                    log::warn!("failed to get name of entry {index}: {e}");
                    continue;
                }
            };
            if name.ends_with(suffix) {
                entries.push(EntryHandle { index, name });
            }
        }
        log::debug!("found {} entries matching {suffix:?}", entries.len());
        entries
    }

    pub fn chart_entries(&mut self) -> Vec<EntryHandle> {
        self.list_entries_with_suffix(CHART_SUFFIX)
    }

    pub fn read_entry(&mut self, handle: &EntryHandle) -> Result<Vec<u8>, ArchiveError> {
        let mut file = self
            .zip
            .by_index(handle.index)
            .map_err(|source| ArchiveError::Entry {
                index: handle.index,
                source,
            })?;
        let mut buf = Vec::with_capacity(read_hint(file.size()));
        file.read_to_end(&mut buf).map_err(|source| ArchiveError::Read {
            name: handle.name.clone(),
            source,
        })?;
        Ok(buf)
    }
}

/// The declared size comes from the entry header and may be corrupt.
fn read_hint(declared: u64) -> usize {
    usize::try_from(declared.min(READ_HINT_CAP)).unwrap_or(0)
}
