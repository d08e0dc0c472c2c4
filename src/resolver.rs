//! The resolver capability and the factory that builds resolver instances.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::{ConnectionSink, ResolverTarget, SinkError};

/// The client extension point translating a logical target into concrete
/// network addresses.
///
/// A static resolver keeps all three lifecycle methods as no-ops: the
/// address set is fixed for the process lifetime, so there is nothing to
/// re-resolve and nothing to release.
pub trait Resolver: Send + Sync + fmt::Debug {
    /// Hint that the resolver should resolve again.
    fn resolve_now(&self);

    /// Hint that the resolver should resolve `target`.
    fn resolve(&self, target: &ResolverTarget);

    /// Release whatever the resolver holds.
    fn close(&self);
}

/// Error returned when a factory fails to produce a started resolver.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The initial address set could not be handed to the channel. Surfaces
    /// from [`ResolverFactory::build`] rather than leaving a silently dead
    /// resolver behind.
    #[error("failed to push the initial address set to the channel")]
    StatePush(#[from] SinkError),
}

/// Builds resolver instances for the uri scheme it answers for.
///
/// The channel-construction path selects a factory by matching the dialed
/// target's scheme against [`ResolverFactory::scheme`].
#[async_trait::async_trait]
pub trait ResolverFactory: Send + Sync {
    /// The fixed uri scheme this factory answers for.
    fn scheme(&self) -> &'static str;

    /// Build a resolver for `target`, wired to `sink`.
    ///
    /// The resolver performs its initial resolution before this returns, so
    /// a successfully built resolver has already handed the channel its
    /// address set.
    async fn build(
        &self,
        target: ResolverTarget,
        sink: Arc<dyn ConnectionSink>,
    ) -> Result<Arc<dyn Resolver>, ResolveError>;
}
