//! Provides the channel wrapper that dials through a registered resolver.

use std::sync::Arc;
use std::task::{Context, Poll};

use anyhow::Context as _;
use http::Request;
use tonic::body::BoxBody;
use tonic::client::GrpcService;
use tonic::transport::channel::Channel;
use tower::Service;

use crate::{BalanceChannelSink, Resolver, ResolverFactory, ResolverRegistry, ResolverTarget};

// Determines the size of the channel we use to report endpoint changes to
// tonic. It comfortably holds the address list of any realistic worker
// count, so the one-shot push never blocks.
static ENDPOINT_CHANNEL_SIZE: usize = 1024;

/// A tonic [`Channel`] whose address set was seeded by the resolver
/// registered for the dialed target's scheme.
///
/// The channel balances requests over one balancer slot per worker process
/// and dials lazily; constructing it performs no I/O.
///
/// ```rust
/// #[tokio::main]
/// async fn main() {
///     use grappolo::{register_multiproc_resolver, MultiProcChannel, ResolverRegistry};
///     use std::collections::HashMap;
///
///     let registry = ResolverRegistry::new();
///     let metadata = HashMap::from([("CPU_LIMIT".to_string(), "4".to_string())]);
///     register_multiproc_resolver(&metadata, &registry).expect("invalid server info metadata");
///
///     let target = format!("{}:///{}", grappolo::SCHEME, grappolo::SERVICE_NAME);
///     let channel = MultiProcChannel::connect(&registry, &target)
///         .await
///         .expect("failed to construct MultiProcChannel");
///     # drop(channel);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MultiProcChannel {
    channel: Channel,
    resolver: Arc<dyn Resolver>,
}

impl MultiProcChannel {
    /// Dial `target` through the factory registered for its scheme.
    ///
    /// By the time this returns the channel has received the full worker
    /// address set; a failed push surfaces here rather than leaving a
    /// silently empty channel behind.
    pub async fn connect(
        registry: &ResolverRegistry,
        target: &str,
    ) -> Result<Self, anyhow::Error> {
        let target: ResolverTarget = target.parse().context("invalid target uri")?;

        let factory = registry.lookup(target.scheme()).with_context(|| {
            format!("no resolver registered for scheme '{}'", target.scheme())
        })?;

        let (channel, sender) = Channel::balance_channel::<String>(ENDPOINT_CHANNEL_SIZE);
        let sink = Arc::new(BalanceChannelSink::new(sender));

        let resolver = factory
            .build(target, sink)
            .await
            .context("resolver failed to produce an initial address set")?;

        Ok(Self { channel, resolver })
    }

    /// The resolver serving this channel, kept for the channel's lifetime.
    pub fn resolver(&self) -> &dyn Resolver {
        self.resolver.as_ref()
    }
}

impl From<MultiProcChannel> for Channel {
    fn from(channel: MultiProcChannel) -> Self {
        channel.channel
    }
}

impl Service<Request<BoxBody>> for MultiProcChannel {
    type Response = http::Response<<Channel as GrpcService<BoxBody>>::ResponseBody>;
    type Error = <Channel as GrpcService<BoxBody>>::Error;
    type Future = <Channel as GrpcService<BoxBody>>::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        GrpcService::poll_ready(&mut self.channel, cx)
    }

    fn call(&mut self, request: Request<BoxBody>) -> Self::Future {
        GrpcService::call(&mut self.channel, request)
    }
}

const _: () = {
    const fn assert_is_send<T: Send>() {}
    assert_is_send::<MultiProcChannel>();
};
