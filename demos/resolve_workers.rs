use std::collections::HashMap;

use anyhow::Context;

use grappolo::{register_multiproc_resolver, MultiProcChannel, ResolverRegistry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // In a real deployment the metadata comes from the worker bootstrap's
    // server-info exchange; here we fake a four-worker host.
    let metadata = HashMap::from([("CPU_LIMIT".to_string(), "4".to_string())]);

    let registry = ResolverRegistry::new();
    register_multiproc_resolver(&metadata, &registry)
        .context("failed to register the multi-process resolver")?;

    // The channel receives all four worker addresses before `connect`
    // returns; dialing happens lazily on the first request.
    let target = format!("{}:///{}", grappolo::SCHEME, grappolo::SERVICE_NAME);
    let channel = MultiProcChannel::connect(&registry, &target)
        .await
        .context("failed to build MultiProcChannel")?;

    println!("CHANNEL={channel:?}");

    Ok(())
}
