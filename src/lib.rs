//! The geofeedcheck library for validating RFC 8025 geofeed records.
//!
//! A geofeed is a CSV file mapping IP prefixes to geolocation data:
//! prefix, country, region, city, postal code. This library checks each
//! record syntactically (the prefix must be a valid IPv4 or IPv6 CIDR
//! block) and semantically (country and region codes must exist in an
//! ISO 3166-2 reference dataset), classifying every failure.
//!
//! # Examples
//!
//! Validating a single record against a reference table:
//!
//! ```rust
//! use geofeedcheck::reference::ReferenceTable;
//! use geofeedcheck::record::GeofeedRecord;
//! use geofeedcheck::validate::{validate, ValidationError};
//!
//! let table = ReferenceTable::from_reader("US,California,CA\n".as_bytes()).unwrap();
//!
//! let record = GeofeedRecord {
//!     prefix: "192.0.2.0/24".to_string(),
//!     country: "US".to_string(),
//!     region: "XYZ".to_string(),
//!     city: "Los Angeles".to_string(),
//!     zip: "90001".to_string(),
//! };
//!
//! assert_eq!(validate(&record, &table), Err(ValidationError::WrongRegionCode));
//! ```

pub mod error;
pub mod input;
pub mod record;
pub mod reference;
pub mod report;
pub mod validate;

pub use crate::error::Error;
pub use crate::record::GeofeedRecord;
pub use crate::reference::ReferenceTable;
pub use crate::report::{Diagnostic, Reporter};
pub use crate::validate::ValidationError;
