use std::fs::File;
use std::io::Read;

use camino::Utf8Path;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{Error, Result};

// Column layout of the IP2Location ISO 3166-2 dataset:
// country_code, subdivision_name, code
const COUNTRY_COLUMN: usize = 0;
const REGION_COLUMN: usize = 2;

/// Default filename of the reference dataset, resolved against the
/// working directory.
pub const DEFAULT_REFERENCE_FILE: &str = "IP2LOCATION-ISO3166-2.CSV";

/// The ISO 3166-2 reference table: every known country code mapped to
/// the set of subdivision codes valid for it.
///
/// Loaded once at startup and never mutated afterwards.
#[derive(Debug, Default)]
pub struct ReferenceTable {
    regions: FxHashMap<String, FxHashSet<String>>,
}

impl ReferenceTable {
    /// Load the reference table from a CSV file on disk.
    ///
    /// Missing or unreadable files are fatal: without the reference data
    /// there is no way to validate country or region codes.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let file = File::open(path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => Error::ReferenceNotFound {
                path: path.as_std_path().to_path_buf(),
            },
            _ => Error::Io(err),
        })?;

        let table = Self::from_reader(file).map_err(|err| match err {
            Error::ReferenceParse { source, .. } => Error::ReferenceParse {
                path: path.as_std_path().to_path_buf(),
                source,
            },
            Error::ReferenceEmpty { .. } => Error::ReferenceEmpty {
                path: path.as_std_path().to_path_buf(),
            },
            other => other,
        })?;

        Ok(table)
    }

    /// Build the reference table from any CSV source.
    ///
    /// Rows with fewer than three columns are skipped. The dataset ships
    /// without a header row, so every row is treated as data.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut regions: FxHashMap<String, FxHashSet<String>> = FxHashMap::default();

        for row in csv_reader.records() {
            let row = row.map_err(|source| Error::ReferenceParse {
                path: Default::default(),
                source,
            })?;

            let (Some(country), Some(region)) = (row.get(COUNTRY_COLUMN), row.get(REGION_COLUMN))
            else {
                continue;
            };

            regions
                .entry(country.to_owned())
                .or_default()
                .insert(region.to_owned());
        }

        if regions.is_empty() {
            return Err(Error::ReferenceEmpty {
                path: Default::default(),
            });
        }

        Ok(Self { regions })
    }

    /// Whether the given country code appears in the dataset.
    ///
    /// Lookup is case-sensitive; geofeed country codes are uppercase
    /// ISO 3166-1 alpha-2.
    #[inline]
    pub fn is_known_country(&self, country: &str) -> bool {
        self.regions.contains_key(country)
    }

    /// Whether the (country, region) pair appears in the dataset.
    #[inline]
    pub fn is_known_region(&self, country: &str, region: &str) -> bool {
        self.regions
            .get(country)
            .is_some_and(|codes| codes.contains(region))
    }

    /// Number of distinct country codes loaded.
    pub fn country_count(&self) -> usize {
        self.regions.len()
    }
}
