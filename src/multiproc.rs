//! The static resolver serving a fixed list of sibling worker addresses.

use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    AddressEntry, AddressSpec, AddressSpecParseError, ConnectionSink, ResolveError, Resolver,
    ResolverFactory, ResolverState, ResolverTarget,
};

/// The uri scheme client code dials to route through this resolver.
pub static SCHEME: &str = "multiproc";

/// The single well-known logical service name the resolver answers for.
pub static SERVICE_NAME: &str = "workers.grappolo.internal";

/// Builds [`Resolver`]s seeded with a fixed worker address list.
///
/// The list is computed once, at registration time, from the worker process
/// count; every resolver built by this factory serves the same table.
#[derive(Debug, Clone)]
pub struct MultiProcResolverFactory {
    address_list: Vec<AddressSpec>,
}

impl MultiProcResolverFactory {
    /// Create a factory serving `address_list`.
    pub fn new(address_list: Vec<AddressSpec>) -> Self {
        Self { address_list }
    }

    /// Create a factory from `"<address>,<index>"` encoded entries, the form
    /// the list travels in when it crosses a process boundary.
    pub fn from_encoded(address_list: &[String]) -> Result<Self, AddressSpecParseError> {
        let address_list = address_list
            .iter()
            .map(|entry| entry.parse())
            .collect::<Result<_, _>>()?;

        Ok(Self::new(address_list))
    }
}

#[async_trait::async_trait]
impl ResolverFactory for MultiProcResolverFactory {
    fn scheme(&self) -> &'static str {
        SCHEME
    }

    async fn build(
        &self,
        target: ResolverTarget,
        sink: Arc<dyn ConnectionSink>,
    ) -> Result<Arc<dyn Resolver>, ResolveError> {
        let resolver = MultiProcResolver {
            target,
            sink,
            addresses: HashMap::from([(SERVICE_NAME.to_string(), self.address_list.clone())]),
        };
        resolver.push_state().await?;
        Ok(Arc::new(resolver))
    }
}

/// Resolver that hands the channel its full address set once, at
/// construction, and is inert afterwards.
#[derive(Debug)]
struct MultiProcResolver {
    target: ResolverTarget,
    sink: Arc<dyn ConnectionSink>,
    addresses: HashMap<String, Vec<AddressSpec>>,
}

impl MultiProcResolver {
    /// Push the address set for the target's endpoint as one update.
    ///
    /// An endpoint with no table entry resolves to an empty set rather than
    /// an error; a misdialed target therefore yields a channel with nothing
    /// to connect to.
    #[tracing::instrument(level = "debug", skip(self), fields(endpoint = %self.target.endpoint()))]
    async fn push_state(&self) -> Result<(), ResolveError> {
        let specs = self
            .addresses
            .get(self.target.endpoint())
            .map(Vec::as_slice)
            .unwrap_or_default();

        let addresses = specs
            .iter()
            .map(|spec| AddressEntry {
                address: spec.address().to_string(),
                server_name: spec.index().to_string(),
            })
            .collect();

        tracing::debug!("resolved {} worker addresses", specs.len());

        self.sink
            .update_state(ResolverState { addresses })
            .await
            .map_err(ResolveError::from)
    }
}

impl Resolver for MultiProcResolver {
    fn resolve_now(&self) {}

    fn resolve(&self, _target: &ResolverTarget) {}

    fn close(&self) {}
}
