//! `diploma health`: check that a node is up.

use serde::Deserialize;

use super::client::NodeClient;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: String,
    version: String,
    uptime_secs: u64,
}

pub async fn run(client: &NodeClient) -> anyhow::Result<()> {
    let health: HealthResponse = client.get("/health").await?;
    println!("Node Health:");
    println!("  Status:   {}", health.status);
    println!("  Version:  {}", health.version);
    println!("  Uptime:   {}s", health.uptime_secs);
    Ok(())
}
