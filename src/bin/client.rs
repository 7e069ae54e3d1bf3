use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::{fs::File, io::BufReader};
use tracing_subscriber::EnvFilter;
use tuple_space::client::{run_batch, TupleSpaceClient};

#[derive(Parser, Debug)]
#[command(name = "tuple-space-client", version, about = "Tuple Space Client")]
struct ClientArgs {
    /// Server hostname or IP address
    host: String,
    /// Server port number
    port: u16,
    /// Path to the request file
    file: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = ClientArgs::parse();

    if !args.file.is_file() {
        println!("File {} does not exist", args.file.display());
        std::process::exit(1);
    }

    let address = format!("{}:{}", args.host, args.port);
    let mut client = TupleSpaceClient::connect(&address)
        .await
        .with_context(|| format!("failed to connect to {}", address))?;

    let file = File::open(&args.file)
        .await
        .with_context(|| format!("failed to open {}", args.file.display()))?;

    run_batch(BufReader::new(file), &mut client, &mut std::io::stdout()).await
}
