//! Registers the multi-process resolver from server-info metadata.

use std::collections::HashMap;

use thiserror::Error;

use crate::{build_address_list, MultiProcResolverFactory, ResolverRegistry};

/// Metadata key carrying the worker process count.
pub static CPU_LIMIT_KEY: &str = "CPU_LIMIT";

/// Error returned when the process count cannot be read out of the
/// server-info metadata. Registration is aborted and the registry is left
/// untouched; the caller decides the fallback, e.g. single-process mode.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("server info metadata has no '{}' entry", CPU_LIMIT_KEY)]
    MissingProcessCount,
    #[error("process count '{value}' is not a non-negative integer")]
    InvalidProcessCount {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Read the worker process count out of `metadata` and register a
/// [`MultiProcResolverFactory`] serving one address per worker.
///
/// Runs once during startup, before the first dial against
/// [`SCHEME`](crate::SCHEME).
pub fn register_multiproc_resolver(
    metadata: &HashMap<String, String>,
    registry: &ResolverRegistry,
) -> Result<(), RegistrationError> {
    let raw = metadata
        .get(CPU_LIMIT_KEY)
        .ok_or(RegistrationError::MissingProcessCount)?;

    let process_count: u32 =
        raw.parse()
            .map_err(|source| RegistrationError::InvalidProcessCount {
                value: raw.clone(),
                source,
            })?;

    tracing::info!(process_count, "registering multi-process resolver");

    registry.register(MultiProcResolverFactory::new(build_address_list(
        process_count,
    )));

    Ok(())
}
