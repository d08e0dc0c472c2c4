//! Derives the canonical worker address list from a process count.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Local bind address shared by every worker process.
pub static BIND_ADDR: &str = "0.0.0.0";

/// Port every sibling worker listens on. The dialer side must agree on this
/// value; the resolver only repeats it.
pub static WORKER_PORT: u16 = 55551;

/// A single worker address paired with its 1-based process index.
///
/// All workers bind the same local address, so the index is the only thing
/// telling two entries apart. A downstream dialer interprets it to reach the
/// right sibling process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressSpec {
    address: String,
    index: u32,
}

impl AddressSpec {
    /// Create an [`AddressSpec`] from an already-formed address and index.
    pub fn new(address: impl Into<String>, index: u32) -> Self {
        Self {
            address: address.into(),
            index,
        }
    }

    /// The network address, e.g. `0.0.0.0:55551`.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The 1-based process index.
    pub fn index(&self) -> u32 {
        self.index
    }
}

/// Renders the `"<address>,<index>"` wire form consumed by
/// [`AddressSpec::from_str`].
impl fmt::Display for AddressSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.address, self.index)
    }
}

/// Error returned when a `"<address>,<index>"` string cannot be parsed back
/// into an [`AddressSpec`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressSpecParseError {
    /// The string has no `,<index>` suffix at all.
    #[error("address spec '{0}' is missing the ',<index>' suffix")]
    MissingIndex(String),
    /// The part after the comma is not a non-negative integer.
    #[error("address spec '{spec}' has a non-numeric index")]
    InvalidIndex {
        spec: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

impl FromStr for AddressSpec {
    type Err = AddressSpecParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (address, index) = s
            .split_once(',')
            .ok_or_else(|| AddressSpecParseError::MissingIndex(s.to_string()))?;

        let index = index
            .parse()
            .map_err(|source| AddressSpecParseError::InvalidIndex {
                spec: s.to_string(),
                source,
            })?;

        Ok(Self::new(address, index))
    }
}

/// Build the ordered address list for `process_count` sibling workers.
///
/// Every entry shares the fixed `BIND_ADDR:WORKER_PORT` address; entry `i`
/// (0-based) carries index `i + 1`. A count of zero yields an empty list.
pub fn build_address_list(process_count: u32) -> Vec<AddressSpec> {
    (1..=process_count)
        .map(|index| AddressSpec::new(format!("{BIND_ADDR}:{WORKER_PORT}"), index))
        .collect()
}
