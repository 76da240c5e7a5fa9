//! Mock hierarchy backend server.
//!
//! Serves a small sample hierarchy over the two REST contracts so the
//! console can be developed and demoed without the real backend.
//!
//! ```bash
//! cargo run --bin mock_hierarchy_server --features "server cli" -- --port 8080
//! ```

use clap::Parser;

use org_console::mock_rest_api::{self, MockRestApiConfig};
use org_console::store::HierarchyStore;

#[derive(Debug, Parser)]
#[command(name = "mock_hierarchy_server", about = "Mock hierarchy REST backend")]
struct Args {
    /// Bind address.
    #[arg(long, env = "ORG_CONSOLE_MOCK_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Bind port.
    #[arg(long, env = "ORG_CONSOLE_MOCK_PORT", default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = MockRestApiConfig {
        host: args.host,
        port: args.port,
    };

    mock_rest_api::serve(config, HierarchyStore::sample()).await
}
