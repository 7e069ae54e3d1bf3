use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, warn};

use crate::{
    commands::{CommandError, CommandHandler},
    frame::{Frame, MAX_PAYLOAD_LEN},
    input::{read_frame, write_frame, FrameReadError},
    statistics::Statistics,
    tuple_space::TupleSpace,
};

/// Serves one client until it disconnects.
///
/// Each iteration reads one frame, runs the request against the shared tuple
/// space and writes the reply frame back. Application errors are sent as `ERR`
/// replies and keep the connection open. The loop ends when the peer closes
/// the connection, when the peer sends a malformed frame, or when the stream
/// fails. None of these outcomes touch any other connection.
pub async fn handle_client_connection<S>(
    stream: S,
    client_address: String,
    space: Arc<TupleSpace>,
    statistics: Arc<Statistics>,
) where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (mut reader, mut writer) = tokio::io::split(stream);

    loop {
        let frame = match read_frame(&mut reader).await {
            Ok(frame) => frame,
            Err(FrameReadError::ConnectionClosed) => {
                debug!(client = %client_address, "connection closed");
                break;
            }
            Err(FrameReadError::ClosedDuringPayload) => {
                debug!(client = %client_address, "connection closed mid frame");
                break;
            }
            Err(e) => {
                warn!(client = %client_address, error = %e, "closing connection");
                break;
            }
        };

        let request = match frame.text() {
            Ok(text) => text,
            Err(e) => {
                warn!(client = %client_address, error = %e, "closing connection");
                break;
            }
        };

        let reply = process_request(request, Arc::clone(&space), &statistics).await;
        debug!(client = %client_address, request, reply = %reply, "processed request");

        if let Err(e) = write_frame(&mut writer, &Frame::new(reply)).await {
            warn!(client = %client_address, error = %e, "error writing to stream");
            break;
        }
    }
}

/// Runs a single request and returns the reply text.
///
/// Every request counts as one operation and every `ERR` reply counts as an
/// error. A request whose command word is recognized also counts towards its
/// kind, even if its arguments are then rejected.
///
/// The returned reply always fits in a single frame: an error reply that would
/// echo an oversized key is replaced by `ERR reply too large`.
pub async fn process_request(
    request: &str,
    space: Arc<TupleSpace>,
    statistics: &Statistics,
) -> String {
    let result = match CommandHandler::new(request) {
        Ok(handler) => {
            statistics.record_operation(Some(handler.kind));
            handler.handle_command(space).await
        }
        Err(e) => {
            statistics.record_operation(None);
            Err(e)
        }
    };

    match result {
        Ok(reply) => reply,
        Err(e) => {
            statistics.record_error();

            let reply = e.as_string();
            if reply.len() > MAX_PAYLOAD_LEN {
                return CommandError::ReplyTooLarge.as_string();
            }

            reply
        }
    }
}
