//! Stdio transport for the JSON-RPC engine
//!
//! One payload per `\n`-terminated line. The server role reads standard input and answers on
//! standard output; the client role writes to a peer's input and reads the peer's output.

pub mod client;
pub mod server;

use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::errors::TransportError;
use crate::rpc::codec;

/// Write one message as a single line and flush it.
pub(crate) async fn write_frame<W, T>(writer: &mut W, message: &T) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let mut payload = codec::encode(message).map_err(TransportError::Encode)?;
    payload.push(b'\n');
    writer.write_all(&payload).await?;
    writer.flush().await?;
    Ok(())
}
