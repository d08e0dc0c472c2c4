//! The channel-side sink that receives the resolved address set.

use std::fmt;

use thiserror::Error;
use tokio::sync::mpsc::Sender;
use tonic::transport::Endpoint;
use tower::discover::Change;

/// A concrete address as seen by the channel's balancer.
///
/// Every worker binds the same local address, so `server_name` carries the
/// process index as an opaque disambiguator for a downstream dialer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressEntry {
    /// The network address, e.g. `0.0.0.0:55551`.
    pub address: String,
    /// The per-entry disambiguator, the stringified process index.
    pub server_name: String,
}

/// The full set of reachable addresses, handed to the sink as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolverState {
    pub addresses: Vec<AddressEntry>,
}

/// Error returned when an address set cannot be handed to the channel.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The channel no longer accepts endpoint updates, e.g. it was torn down.
    #[error("the channel no longer accepts endpoint updates")]
    Closed,
    /// An entry does not form a valid endpoint uri.
    #[error("'{address}' is not a valid endpoint uri")]
    InvalidAddress {
        address: String,
        #[source]
        source: tonic::transport::Error,
    },
}

/// Interface through which a resolver pushes the addresses it resolved into
/// the owning channel's connection state.
#[async_trait::async_trait]
pub trait ConnectionSink: Send + Sync + fmt::Debug {
    /// Replace the channel's view of reachable addresses with `state`.
    async fn update_state(&self, state: ResolverState) -> Result<(), SinkError>;
}

/// Implements [`ConnectionSink`] on top of the endpoint channel returned by
/// [`Channel::balance_channel`](tonic::transport::Channel::balance_channel).
#[derive(Debug, Clone)]
pub struct BalanceChannelSink {
    endpoint_reporter: Sender<Change<String, Endpoint>>,
}

impl BalanceChannelSink {
    /// Wrap the sender half of a balance channel.
    pub fn new(endpoint_reporter: Sender<Change<String, Endpoint>>) -> Self {
        Self { endpoint_reporter }
    }
}

#[async_trait::async_trait]
impl ConnectionSink for BalanceChannelSink {
    async fn update_state(&self, state: ResolverState) -> Result<(), SinkError> {
        for entry in state.addresses {
            // Keyed by server name: the entries share one literal bind
            // address and would collapse into a single balancer slot
            // otherwise.
            let endpoint = Endpoint::from_shared(format!("http://{}", entry.address)).map_err(
                |source| SinkError::InvalidAddress {
                    address: entry.address.clone(),
                    source,
                },
            )?;

            self.endpoint_reporter
                .send(Change::Insert(entry.server_name, endpoint))
                .await
                .map_err(|_| SinkError::Closed)?;
        }

        Ok(())
    }
}
