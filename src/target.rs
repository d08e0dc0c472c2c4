//! Parses the `scheme://authority/endpoint` form a channel is dialed against.

use std::str::FromStr;

use http::Uri;
use thiserror::Error;

/// The parsed target a resolver is asked to answer for.
///
/// Mirrors the `scheme://authority/endpoint` shape gRPC clients dial with.
/// Created once per channel dial and consumed at resolver construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverTarget {
    scheme: String,
    authority: String,
    endpoint: String,
}

/// Error returned when a target string is not a well-formed target URI.
#[derive(Debug, Error)]
pub enum TargetParseError {
    #[error("target '{0}' is not a valid uri")]
    InvalidUri(String, #[source] http::uri::InvalidUri),
    #[error("target '{0}' has no scheme")]
    MissingScheme(String),
}

impl ResolverTarget {
    /// Parse a target such as `multiproc:///workers.grappolo.internal`.
    ///
    /// The endpoint is the uri path with its leading slash stripped; the
    /// authority may be empty.
    pub fn parse(target: &str) -> Result<Self, TargetParseError> {
        let uri = target
            .parse::<Uri>()
            .map_err(|source| TargetParseError::InvalidUri(target.to_string(), source))?;

        let scheme = uri
            .scheme_str()
            .ok_or_else(|| TargetParseError::MissingScheme(target.to_string()))?
            .to_string();

        Ok(Self {
            scheme,
            authority: uri.authority().map(ToString::to_string).unwrap_or_default(),
            endpoint: uri.path().trim_start_matches('/').to_string(),
        })
    }

    /// The uri scheme selecting which registered factory answers.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The uri authority; empty for the usual `scheme:///endpoint` form.
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// The logical service name the channel wants resolved.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl FromStr for ResolverTarget {
    type Err = TargetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
