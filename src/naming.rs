// src/naming.rs
//
// Published files look like
//   StormEvents_details-ftp_v1.0_d2020_c20220601.csv.gz
// where `d` is the data year and `c` the revision (regeneration) date.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

pub const DETAILS_PREFIX: &str = "StormEvents_details-ftp_v1.0";

/// Unanchored: used to pick filenames out of an HTML index page.
static LISTING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(StormEvents_details-ftp_v1\.0_d(?P<year>\d{4})_c(?P<cdate>\d{8})\.csv\.gz)")
        .expect("listing regex should compile")
});

/// Anchored: used on local file names, compressed or not.
static LOCAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^StormEvents_details-ftp_v1\.0_d(?P<year>\d{4})_c(?P<cdate>\d{8})\.csv(?:\.gz)?$")
        .expect("local file regex should compile")
});

/// One details file, identified by data year and revision date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsFile {
    pub year: i32,
    /// `YYYYMMDD` as an integer, so revisions compare numerically.
    pub revision: u32,
    pub name: String,
}

impl DetailsFile {
    /// Parse a bare file name (`.csv` or `.csv.gz`).
    pub fn parse(name: &str) -> Option<Self> {
        let caps = LOCAL_RE.captures(name)?;
        Some(Self {
            year: caps["year"].parse().ok()?,
            revision: caps["cdate"].parse().ok()?,
            name: name.to_string(),
        })
    }

    /// Name of the decompressed counterpart.
    pub fn csv_name(&self) -> &str {
        self.name.strip_suffix(".gz").unwrap_or(&self.name)
    }

    /// Glob pattern matching every decompressed revision for `year`.
    pub fn csv_glob_for_year(year: i32) -> String {
        format!("{}_d{}_c*.csv", DETAILS_PREFIX, year)
    }
}

/// Every compressed details file mentioned in `text`, in order of appearance.
pub fn scan_listing(text: &str) -> impl Iterator<Item = DetailsFile> + '_ {
    LISTING_RE.captures_iter(text).filter_map(|caps| {
        Some(DetailsFile {
            year: caps["year"].parse().ok()?,
            revision: caps["cdate"].parse().ok()?,
            name: caps[1].to_string(),
        })
    })
}

/// Keep the newest revision per year. On equal revisions the later file wins.
///
/// Both the fetch and the transform stage select through this function so the
/// two can never disagree on which revision is current.
pub fn select_latest<I>(files: I) -> BTreeMap<i32, DetailsFile>
where
    I: IntoIterator<Item = DetailsFile>,
{
    let mut latest: BTreeMap<i32, DetailsFile> = BTreeMap::new();
    for file in files {
        match latest.get(&file.year) {
            Some(current) if current.revision > file.revision => {}
            _ => {
                latest.insert(file.year, file);
            }
        }
    }
    latest
}
