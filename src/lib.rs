//! `grappolo` gives a tonic [`Channel`](tonic::transport::Channel) a static,
//! process-local view of a "multi-process server": one logical gRPC service
//! that is actually N independent sibling listeners on the same host, told
//! apart by a 1-based process index instead of a hostname.
//!
//! Instead of dynamic service discovery, the full address list is derived
//! once from a worker process count read out of server-info metadata, and
//! pushed into the channel exactly once. There is no re-resolution: the
//! worker topology is fixed for the process lifetime.
//!
//! # Simple example
//!
//! ```rust
//! #[tokio::main]
//! async fn main() {
//!     use grappolo::{register_multiproc_resolver, MultiProcChannel, ResolverRegistry};
//!     use std::collections::HashMap;
//!
//!     // Server-info metadata, as handed over by the worker bootstrap.
//!     let metadata = HashMap::from([("CPU_LIMIT".to_string(), "4".to_string())]);
//!
//!     // Derive the address list and register the resolver for it.
//!     let registry = ResolverRegistry::new();
//!     register_multiproc_resolver(&metadata, &registry)
//!         .expect("invalid server info metadata");
//!
//!     // Any channel dialed with the custom scheme now resolves to all
//!     // four workers.
//!     let target = format!("{}:///{}", grappolo::SCHEME, grappolo::SERVICE_NAME);
//!     let channel = MultiProcChannel::connect(&registry, &target)
//!         .await
//!         .expect("failed to construct MultiProcChannel");
//!     # drop(channel);
//! }
//! ```
//!
//! A resolver can also push into a custom [`ConnectionSink`], which is how
//! the tests observe resolution without a live channel.
//!
//! ```rust
//! use grappolo::{ConnectionSink, ResolverState, SinkError};
//!
//! // This records nothing
//! #[derive(Debug)]
//! struct DummySink;
//!
//! #[async_trait::async_trait]
//! impl ConnectionSink for DummySink {
//!     async fn update_state(&self, _state: ResolverState) -> Result<(), SinkError> {
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     use grappolo::{build_address_list, MultiProcResolverFactory, ResolverFactory};
//!     use std::sync::Arc;
//!
//!     let factory = MultiProcResolverFactory::new(build_address_list(4));
//!     let target = format!("{}:///{}", grappolo::SCHEME, grappolo::SERVICE_NAME);
//!
//!     let resolver = factory
//!         .build(target.parse().unwrap(), Arc::new(DummySink))
//!         .await
//!         .expect("failed to build resolver");
//!     # drop(resolver);
//! }
//! ```
//!
//! # Internals
//! The tonic [`Channel`](tonic::transport::Channel) exposes the function
//! [`balance_channel`](tonic::transport::Channel::balance_channel) which
//! returns a bounded channel through which endpoint changes can be sent.
//! `grappolo` pushes one endpoint per worker through it, keyed by the
//! process index, so entries sharing the literal bind address stay distinct
//! slots in the balancer. A transport-layer dialer is expected to map the
//! index to the worker's actual socket.

mod address_list;
mod bootstrap;
mod channel;
mod multiproc;
mod registry;
mod resolver;
mod sink;
mod target;

pub use address_list::*;
pub use bootstrap::*;
pub use channel::*;
pub use multiproc::*;
pub use registry::*;
pub use resolver::*;
pub use sink::*;
pub use target::*;
