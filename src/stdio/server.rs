use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use super::write_frame;
use crate::errors::TransportError;
use crate::rpc::{frame::FrameReader, Dispatcher};

/// Answer every frame on `frames` in order until the input ends.
///
/// Each frame is fully dispatched and its response written before the next frame is read.
pub async fn serve<R, W>(
    dispatcher: &Dispatcher,
    mut frames: FrameReader<R>,
    mut writer: W,
) -> Result<(), TransportError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut cycles: u64 = 0;

    while let Some(frame) = frames.next_frame().await? {
        debug!(bytes = frame.as_bytes().len(), "frame received");
        let response = dispatcher.dispatch(frame.as_bytes()).await;
        write_frame(&mut writer, &response).await?;
        cycles += 1;
    }

    writer.flush().await?;
    info!(cycles, "stdio input closed");
    Ok(())
}

/// Serve the process's own standard input and output.
pub async fn serve_stdio(
    dispatcher: &Dispatcher,
    max_frame_bytes: usize,
) -> Result<(), TransportError> {
    let frames = FrameReader::with_limit(tokio::io::stdin(), max_frame_bytes);
    serve(dispatcher, frames, tokio::io::stdout()).await
}
