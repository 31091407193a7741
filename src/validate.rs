use std::fmt;
use std::net::IpAddr;

use serde::Serialize;

use crate::record::GeofeedRecord;
use crate::reference::ReferenceTable;

const IPV4_MAX_PREFIX_LEN: u8 = 32;
const IPV6_MAX_PREFIX_LEN: u8 = 128;

/// Classification of a failed geofeed record.
///
/// A record is tagged with at most one of these, the first failing
/// check in the fixed order: field count, prefix, country, region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    /// Prefix field is not a valid IPv4 or IPv6 CIDR block.
    InvalidPrefix,
    /// Country code is empty or not a known ISO 3166-1 alpha-2 code.
    WrongCountryCode,
    /// Region code is not a valid subdivision of the given country.
    WrongRegionCode,
    /// Line did not split into the five geofeed fields.
    MalformedRecord,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValidationError::InvalidPrefix => "Invalid prefix",
            ValidationError::WrongCountryCode => "Wrong country code",
            ValidationError::WrongRegionCode => "Wrong region code",
            ValidationError::MalformedRecord => "Malformed record",
        })
    }
}

/// Check a geofeed prefix field for syntactic validity.
///
/// Accepts `<address>/<prefix-length>` where the address is IPv4 or
/// IPv6 (std's parser handles octet ranges and `::` compression) and
/// the length fits the address family. No normalization is performed.
pub fn is_valid_cidr(prefix: &str) -> bool {
    let Some((address, len)) = prefix.split_once('/') else {
        return false;
    };

    let Ok(address) = address.parse::<IpAddr>() else {
        return false;
    };

    let Ok(len) = len.parse::<u8>() else {
        return false;
    };

    match address {
        IpAddr::V4(_) => len <= IPV4_MAX_PREFIX_LEN,
        IpAddr::V6(_) => len <= IPV6_MAX_PREFIX_LEN,
    }
}

/// Run the full check sequence over one record.
///
/// Short-circuits on the first failing check, so an unknown country
/// code never also reports a region error.
pub fn validate(record: &GeofeedRecord, table: &ReferenceTable) -> Result<(), ValidationError> {
    if !is_valid_cidr(&record.prefix) {
        return Err(ValidationError::InvalidPrefix);
    }

    if !table.is_known_country(&record.country) {
        return Err(ValidationError::WrongCountryCode);
    }

    if !record.region.is_empty() && !table.is_known_region(&record.country, &record.region) {
        return Err(ValidationError::WrongRegionCode);
    }

    Ok(())
}
