use anyhow::Context;
use tracing_subscriber::EnvFilter;
use tuple_space::server::{CliError, TupleSpaceServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let server = match TupleSpaceServer::new(std::env::args()) {
        Ok(server) => server,
        Err(CliError::Help(text)) => {
            print!("{}", text);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    server
        .run()
        .await
        .with_context(|| format!("failed to bind {}", server.address()))
}
