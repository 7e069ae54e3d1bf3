use std::{sync::Arc, time::Duration};

use clap::{error::ErrorKind, Parser};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::{
    connection::handle_client_connection,
    statistics::{run_reporter, Statistics},
    tuple_space::TupleSpace,
};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_REPORT_INTERVAL_SECS: u64 = 10;

#[derive(Error, Debug, PartialEq)]
pub enum CliError {
    #[error("Invalid command line flag: {0}")]
    InvalidCommandLineFlag(String),
    #[error("Invalid command line flag value")]
    InvalidCommandLineFlagValue,
    /// `--help` or `--version` was requested; holds the rendered text
    #[error("{0}")]
    Help(String),
}

#[derive(Parser, Debug)]
#[command(name = "tuple-space-server", version, about = "Tuple Space Server")]
struct ServerArgs {
    /// Host/IP address to bind the server
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Port number to listen on (50000-59999 in the reference deployment)
    #[arg(long)]
    port: u16,

    /// Seconds between two statistics reports
    #[arg(long = "report-interval", default_value_t = DEFAULT_REPORT_INTERVAL_SECS)]
    report_interval: u64,
}

#[derive(Debug)]
pub struct TupleSpaceServer {
    pub host: String,
    pub port: u16,
    pub report_interval: Duration,
}

impl TupleSpaceServer {
    /// Builds the server configuration from command line arguments.
    ///
    /// The first item is the program name, as with [`std::env::args`].
    /// `--help` and `--version` come back as [`CliError::Help`] so the caller
    /// decides how to print them.
    pub fn new<I: IntoIterator<Item = String>>(command_line_args: I) -> Result<Self, CliError> {
        let args = ServerArgs::try_parse_from(command_line_args).map_err(|e| match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                CliError::Help(e.render().to_string())
            }
            ErrorKind::ValueValidation | ErrorKind::InvalidValue => {
                CliError::InvalidCommandLineFlagValue
            }
            kind => CliError::InvalidCommandLineFlag(kind.to_string()),
        })?;

        if args.port == 0 || args.report_interval == 0 {
            return Err(CliError::InvalidCommandLineFlagValue);
        }

        Ok(TupleSpaceServer {
            host: args.host,
            port: args.port,
            report_interval: Duration::from_secs(args.report_interval),
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Binds the listener, starts the statistics reporter and serves clients.
    ///
    /// Only returns if the address cannot be bound.
    pub async fn run(&self) -> std::io::Result<()> {
        let listener = TcpListener::bind(self.address()).await?;
        info!(address = %self.address(), "Server listening");

        let space = Arc::new(TupleSpace::new());
        let statistics = Arc::new(Statistics::new());

        tokio::spawn(run_reporter(
            Arc::clone(&space),
            Arc::clone(&statistics),
            self.report_interval,
        ));

        serve(listener, space, statistics).await;

        Ok(())
    }
}

/// Accepts connections forever, spawning one task per client.
///
/// The client counter is incremented once per accepted connection, before the
/// connection task starts. Accept failures are logged and do not stop the loop.
pub async fn serve(listener: TcpListener, space: Arc<TupleSpace>, statistics: Arc<Statistics>) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                statistics.record_client();
                info!(client = %addr, "accepted connection");

                tokio::spawn(handle_client_connection(
                    stream,
                    addr.to_string(),
                    Arc::clone(&space),
                    Arc::clone(&statistics),
                ));
            }
            Err(e) => {
                error!(error = %e, "failed to accept connection");
            }
        }
    }
}
