use crate::error::{Error, Result};

use log::trace;

use std::collections::BTreeMap;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Source of the line blocks that make up an ERRORR output
///
/// Sections are keyed by file number (MF) and section number (MT). Anything
/// that can list and hand out the raw lines of a section can back an
/// [ErrorrOutput](crate::ErrorrOutput), whether a tape on disk, a packed
/// archive, or an in-memory map.
pub trait ArchiveReader {
    /// Every file number present, in ascending order
    fn file_numbers(&self) -> Vec<u32>;

    /// Every section number present in file `mf`, in ascending order
    fn section_numbers(&self, mf: u32) -> Vec<u32>;

    /// Lines of section `mt` in file `mf`
    fn section_lines(&self, mf: u32, mt: u32) -> Result<Vec<String>>;
}

/// Sections held in memory
///
/// ```rust
/// # use nucov_errorr::{ArchiveReader, MemoryArchive};
/// let mut archive = MemoryArchive::new();
/// archive.insert(3, 452, vec!["first".into(), "second".into(), "   ".into()]);
/// archive.insert(33, 452, vec![]);
///
/// assert_eq!(archive.file_numbers(), vec![3, 33]);
/// assert_eq!(archive.section_numbers(3), vec![452]);
/// assert_eq!(archive.section_lines(3, 452).unwrap().len(), 2);
/// assert!(archive.section_lines(5, 18).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryArchive {
    sections: BTreeMap<(u32, u32), Vec<String>>,
}

impl MemoryArchive {
    /// Empty archive
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace section `mt` of file `mf`
    ///
    /// Blank lines at the end of the block are dropped.
    pub fn insert(&mut self, mf: u32, mt: u32, mut lines: Vec<String>) {
        while lines.last().is_some_and(|l| l.trim().is_empty()) {
            lines.pop();
        }
        trace!("Archive MF{mf}/MT{mt} with {} lines", lines.len());
        self.sections.insert((mf, mt), lines);
    }

    /// Read section `mt` of file `mf` from a text file on disk
    pub fn load_section(&mut self, mf: u32, mt: u32, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::open(path.as_ref())?;
        let lines = BufReader::new(file)
            .lines()
            .collect::<std::io::Result<Vec<String>>>()?;
        self.insert(mf, mt, lines);
        Ok(())
    }

    /// Number of sections held
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// True if no sections are held
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl ArchiveReader for MemoryArchive {
    fn file_numbers(&self) -> Vec<u32> {
        let mut files: Vec<u32> = self.sections.keys().map(|(mf, _)| *mf).collect();
        files.dedup();
        files
    }

    fn section_numbers(&self, mf: u32) -> Vec<u32> {
        self.sections
            .range((mf, u32::MIN)..=(mf, u32::MAX))
            .map(|((_, mt), _)| *mt)
            .collect()
    }

    fn section_lines(&self, mf: u32, mt: u32) -> Result<Vec<String>> {
        self.sections
            .get(&(mf, mt))
            .cloned()
            .ok_or(Error::MissingSection { mf, mt })
    }
}
