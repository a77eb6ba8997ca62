use crate::archive::ArchiveReader;
use crate::error::{Error, Result};
use crate::limits::EnergyLimits;
use crate::section::Section;

use log::{info, warn};
use rayon::prelude::*;

use std::collections::BTreeMap;

/// Files that hold mean values, paired with the covariance file `mf + 30`
const MEAN_FILES: [u32; 2] = [3, 5];

/// Every reaction of an ERRORR output, keyed by MT number
///
/// All sections share the group structure in MF1/MT451, and the same energy
/// limits are applied to each of them. Mean values are taken from MF3 and MF5
/// and paired with the covariance data in MF33 and MF35 respectively. If the
/// same MT appears in both, the MF5 section replaces the MF3 one.
#[derive(Debug, Clone)]
pub struct ErrorrOutput {
    sections: BTreeMap<u32, Section>,
}

/// Raw lines of one reaction before any decoding
struct SectionBlocks {
    mf: u32,
    mt: u32,
    mean: Vec<String>,
    covariance: Vec<String>,
}

impl ErrorrOutput {
    /// Build every section, failing on the first reaction that cannot be read
    ///
    /// ```rust, no_run
    /// # use nucov_errorr::{EnergyLimits, ErrorrOutput, MemoryArchive};
    /// let mut archive = MemoryArchive::new();
    /// archive.load_section(1, 451, "data/nubar/mf1_mt451.txt").unwrap();
    /// archive.load_section(3, 452, "data/nubar/mf3_mt452.txt").unwrap();
    /// archive.load_section(33, 452, "data/nubar/mf33_mt452.txt").unwrap();
    ///
    /// let output = ErrorrOutput::new(&archive, EnergyLimits::new()).unwrap();
    /// let nubar = output.get(452).unwrap();
    /// ```
    pub fn new<R: ArchiveReader + ?Sized>(reader: &R, limits: EnergyLimits) -> Result<Self> {
        let (energy, blocks) = collect_blocks(reader)?;

        let blocks = blocks
            .into_iter()
            .map(|(_, b)| b)
            .collect::<Result<Vec<_>>>()?;

        let built = blocks
            .par_iter()
            .map(|b| build(&energy, b, limits).map(|s| (b.mf, b.mt, s)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::from_built(built))
    }

    /// Build every section that can be read, returning the failures by
    /// (MF, MT) of the mean values
    ///
    /// Only a missing MF1/MT451 is fatal, since no section can be built
    /// without the group structure. A reaction whose MF5 section fails is left
    /// out entirely, rather than falling back to its MF3 section.
    pub fn with_failures<R: ArchiveReader + ?Sized>(
        reader: &R,
        limits: EnergyLimits,
    ) -> Result<(Self, BTreeMap<(u32, u32), Error>)> {
        let (energy, blocks) = collect_blocks(reader)?;

        let mut failures = BTreeMap::new();
        let mut readable = Vec::with_capacity(blocks.len());
        for (key, result) in blocks {
            match result {
                Ok(b) => readable.push(b),
                Err(e) => {
                    failures.insert(key, e);
                }
            }
        }

        let results: Vec<(u32, u32, Result<Section>)> = readable
            .par_iter()
            .map(|b| (b.mf, b.mt, build(&energy, b, limits)))
            .collect();

        let mut built = Vec::with_capacity(results.len());
        for (mf, mt, result) in results {
            match result {
                Ok(section) => built.push((mf, mt, section)),
                Err(e) => {
                    warn!("Skipping MF{mf}/MT{mt}: {e}");
                    failures.insert((mf, mt), e);
                }
            }
        }

        // a later file would have replaced this one had it been readable
        built.retain(|(mf, mt, _)| {
            let superseded = failures.keys().any(|(f, m)| m == mt && f > mf);
            if superseded {
                warn!("Dropping MF{mf}/MT{mt} as a later file failed for MT{mt}");
            }
            !superseded
        });

        Ok((Self::from_built(built), failures))
    }

    fn from_built(built: Vec<(u32, u32, Section)>) -> Self {
        let mut sections = BTreeMap::new();
        for (mf, mt, section) in built {
            if section.mt() != mt {
                warn!("MF{mf}/MT{mt} holds data labelled MT{}", section.mt());
            }
            if let Some(previous) = sections.insert(mt, section) {
                warn!("MT{mt} in MF{mf} replaces the one from MF{}", previous.mf());
            }
        }
        info!("ERRORR output with {} sections", sections.len());
        Self { sections }
    }

    /// Section for reaction `mt`
    pub fn get(&self, mt: u32) -> Option<&Section> {
        self.sections.get(&mt)
    }

    /// Every section keyed by MT
    pub fn sections(&self) -> &BTreeMap<u32, Section> {
        &self.sections
    }

    /// Reaction numbers present, in ascending order
    pub fn mts(&self) -> Vec<u32> {
        self.sections.keys().copied().collect()
    }

    /// Number of sections
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// True if no sections were found
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Take ownership of the sections
    pub fn into_sections(self) -> BTreeMap<u32, Section> {
        self.sections
    }
}

type Blocks = Vec<((u32, u32), Result<SectionBlocks>)>;

/// Read every line block up front, in file then section order
fn collect_blocks<R: ArchiveReader + ?Sized>(reader: &R) -> Result<(Vec<String>, Blocks)> {
    let files = reader.file_numbers();
    if !files.contains(&1) {
        return Err(Error::MissingFile(1));
    }
    let energy = reader.section_lines(1, 451)?;

    let mut blocks = Vec::new();
    for mf in MEAN_FILES.into_iter().filter(|mf| files.contains(mf)) {
        for mt in reader.section_numbers(mf) {
            let block = reader.section_lines(mf, mt).and_then(|mean| {
                Ok(SectionBlocks {
                    mf,
                    mt,
                    mean,
                    covariance: reader.section_lines(mf + 30, mt)?,
                })
            });
            blocks.push(((mf, mt), block));
        }
    }

    info!("Found {} reactions in MF3/MF5", blocks.len());
    Ok((energy, blocks))
}

fn build(energy: &[String], blocks: &SectionBlocks, limits: EnergyLimits) -> Result<Section> {
    Section::new(energy, blocks.mean.as_slice(), blocks.covariance.as_slice(), limits)
}
