use grappolo::{
    build_address_list, register_multiproc_resolver, BalanceChannelSink, ConnectionSink,
    MultiProcChannel, MultiProcResolverFactory, ResolveError, Resolver, ResolverFactory,
    ResolverRegistry, ResolverState, SinkError, SCHEME, SERVICE_NAME,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tonic::transport::Endpoint;
use tower::discover::Change;

/// Records every state update a resolver pushes.
#[derive(Debug, Clone, Default)]
struct RecordingSink {
    states: Arc<Mutex<Vec<ResolverState>>>,
}

impl RecordingSink {
    fn states(&self) -> Vec<ResolverState> {
        self.states.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ConnectionSink for RecordingSink {
    async fn update_state(&self, state: ResolverState) -> Result<(), SinkError> {
        self.states.lock().unwrap().push(state);
        Ok(())
    }
}

/// Refuses every state update, as a torn-down channel would.
#[derive(Debug)]
struct ClosedSink;

#[async_trait::async_trait]
impl ConnectionSink for ClosedSink {
    async fn update_state(&self, _state: ResolverState) -> Result<(), SinkError> {
        Err(SinkError::Closed)
    }
}

fn server_info_metadata(cpu_limit: &str) -> HashMap<String, String> {
    HashMap::from([("CPU_LIMIT".to_string(), cpu_limit.to_string())])
}

fn well_known_target() -> String {
    format!("{SCHEME}:///{SERVICE_NAME}")
}

#[tokio::test]
async fn a_registered_resolver_pushes_one_entry_per_worker() {
    // Arrange
    let registry = ResolverRegistry::new();
    register_multiproc_resolver(&server_info_metadata("4"), &registry)
        .expect("registration should succeed");
    let sink = RecordingSink::default();

    // Act
    let factory = registry.lookup(SCHEME).expect("factory should be registered");
    factory
        .build(well_known_target().parse().unwrap(), Arc::new(sink.clone()))
        .await
        .expect("failed to build resolver");

    // Assert: exactly one push, carrying the full list in index order.
    let states = sink.states();
    assert_eq!(states.len(), 1);
    let entries = &states[0].addresses;
    let expected = build_address_list(4);
    assert_eq!(entries.len(), expected.len());
    for (entry, spec) in entries.iter().zip(&expected) {
        assert_eq!(entry.address, spec.address());
        assert_eq!(entry.server_name, spec.index().to_string());
    }
}

#[tokio::test]
async fn an_unknown_endpoint_resolves_to_an_empty_set() {
    let sink = RecordingSink::default();
    let factory = MultiProcResolverFactory::new(build_address_list(3));

    let target = format!("{SCHEME}:///not.the.service").parse().unwrap();
    factory
        .build(target, Arc::new(sink.clone()))
        .await
        .expect("an unknown endpoint is not a build error");

    // One push still happens; it just carries nothing. A misdialed target
    // therefore produces a channel with no one to talk to.
    let states = sink.states();
    assert_eq!(states.len(), 1);
    assert!(states[0].addresses.is_empty());
}

#[tokio::test]
async fn lifecycle_methods_do_not_push_again() {
    let sink = RecordingSink::default();
    let factory = MultiProcResolverFactory::new(build_address_list(2));

    let resolver = factory
        .build(well_known_target().parse().unwrap(), Arc::new(sink.clone()))
        .await
        .expect("failed to build resolver");

    let target = well_known_target().parse().unwrap();
    resolver.resolve_now();
    resolver.resolve(&target);
    resolver.close();
    resolver.resolve_now();

    assert_eq!(sink.states().len(), 1);
}

#[tokio::test]
async fn a_zero_worker_count_resolves_to_an_empty_set() {
    let registry = ResolverRegistry::new();
    register_multiproc_resolver(&server_info_metadata("0"), &registry)
        .expect("a count of zero is valid");

    let sink = RecordingSink::default();
    let factory = registry.lookup(SCHEME).expect("factory should be registered");
    factory
        .build(well_known_target().parse().unwrap(), Arc::new(sink.clone()))
        .await
        .expect("failed to build resolver");

    assert_eq!(sink.states(), vec![ResolverState::default()]);
}

#[tokio::test]
async fn a_failed_push_surfaces_from_build() {
    let factory = MultiProcResolverFactory::new(build_address_list(2));

    let err = factory
        .build(well_known_target().parse().unwrap(), Arc::new(ClosedSink))
        .await
        .expect_err("a refused push should fail the build");

    assert!(matches!(err, ResolveError::StatePush(SinkError::Closed)));
}

#[tokio::test]
async fn the_factory_accepts_the_encoded_address_form() {
    let encoded: Vec<String> = build_address_list(3)
        .iter()
        .map(ToString::to_string)
        .collect();

    let sink = RecordingSink::default();
    let factory =
        MultiProcResolverFactory::from_encoded(&encoded).expect("the encoded form round-trips");
    factory
        .build(well_known_target().parse().unwrap(), Arc::new(sink.clone()))
        .await
        .expect("failed to build resolver");

    let states = sink.states();
    assert_eq!(states[0].addresses.len(), 3);
    assert_eq!(states[0].addresses[2].server_name, "3");
}

#[tokio::test]
async fn the_balance_channel_sink_reports_one_insert_per_entry() {
    let (sender, mut receiver) = tokio::sync::mpsc::channel::<Change<String, Endpoint>>(16);
    let sink = BalanceChannelSink::new(sender);

    let factory = MultiProcResolverFactory::new(build_address_list(3));
    factory
        .build(well_known_target().parse().unwrap(), Arc::new(sink))
        .await
        .expect("failed to build resolver");

    for index in 1..=3 {
        match receiver.try_recv().expect("an insert should have been reported") {
            Change::Insert(key, endpoint) => {
                assert_eq!(key, index.to_string());
                assert_eq!(endpoint.uri().host(), Some("0.0.0.0"));
                assert_eq!(endpoint.uri().port_u16(), Some(55551));
            }
            Change::Remove(key) => panic!("unexpected removal of '{key}'"),
        }
    }
    assert!(receiver.try_recv().is_err());
}

#[tokio::test]
async fn the_balance_channel_sink_reports_a_torn_down_channel() {
    let (sender, receiver) = tokio::sync::mpsc::channel::<Change<String, Endpoint>>(16);
    drop(receiver);
    let sink = BalanceChannelSink::new(sender);

    let err = sink
        .update_state(ResolverState {
            addresses: vec![grappolo::AddressEntry {
                address: "0.0.0.0:55551".to_string(),
                server_name: "1".to_string(),
            }],
        })
        .await
        .expect_err("a closed channel should refuse the update");

    assert!(matches!(err, SinkError::Closed));
}

#[tokio::test]
async fn connect_succeeds_without_any_live_server() {
    let registry = ResolverRegistry::new();
    register_multiproc_resolver(&server_info_metadata("4"), &registry)
        .expect("registration should succeed");

    // The channel dials lazily, so construction alone performs no I/O and
    // must succeed even though no worker is listening.
    MultiProcChannel::connect(&registry, &well_known_target())
        .await
        .expect("failed to construct MultiProcChannel");
}

#[tokio::test]
async fn connect_fails_for_an_unregistered_scheme() {
    let registry = ResolverRegistry::new();

    let err = MultiProcChannel::connect(&registry, &well_known_target())
        .await
        .expect_err("an empty registry cannot serve the scheme");

    assert!(err.to_string().contains("no resolver registered"));
}
