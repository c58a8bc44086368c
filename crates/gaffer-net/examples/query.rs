//! Query a Gaffer service from the command line.
//!
//! ```text
//! GAFFER=https://gaffer.example:8443 cargo run -p gaffer-net --example query -- '["BasicEntity"]' 10
//! ```
//!
//! The first argument is a JSON group list for entities (`null` leaves
//! entities out), the second an optional result limit. Set `MTLS=1` to load
//! the client certificate from `$PRIVATE` or `$HOME/private`, and
//! `CHUNKED=1` to stream results line by line.

use gaffer_core::{GetAllElements, Groups, Limit, Operation, OperationChain};
use gaffer_net::{CertPaths, GafferClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> gaffer_net::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gaffer_net=info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let entities = match args.next() {
        Some(arg) => Groups::try_from(serde_json::from_str::<serde_json::Value>(&arg)?)?,
        None => Groups::All,
    };
    let limit = args.next().and_then(|n| n.parse::<u64>().ok()).unwrap_or(10);

    let mut builder = GafferClient::builder();
    if std::env::var_os("MTLS").is_some() {
        builder = builder.use_cert(CertPaths::new());
    }
    let client = builder.build()?;

    let chain = OperationChain::new([
        Operation::from(GetAllElements::new().entities(entities).edges(Groups::Excluded)),
        Operation::from(Limit::new(limit)),
    ]);

    if std::env::var_os("CHUNKED").is_some() {
        let mut lines = client.execute_chunked(chain).await?;
        while let Some(line) = lines.next_line().await? {
            println!("{}", line);
        }
        tracing::info!("Read {} elements", lines.lines_read());
    } else {
        let result = client.execute(chain).await?;
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    Ok(())
}
