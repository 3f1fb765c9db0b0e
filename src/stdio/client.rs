use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};

use super::write_frame;
use crate::client::{check_correlation, Transport};
use crate::errors::TransportError;
use crate::rpc::{codec, frame::FrameReader, Request, Response};

/// Client role over a pair of byte streams connected to a peer server.
///
/// Correlation is strictly one in flight: each request is written, then exactly one frame is read
/// back as its response. Callers that need concurrent requests must correlate by id themselves.
pub struct StdioClient<W, R> {
    writer: W,
    frames: FrameReader<R>,
}

impl<W, R> StdioClient<W, R>
where
    W: AsyncWrite + Unpin + Send,
    R: AsyncRead + Unpin + Send,
{
    /// `writer` feeds the peer's input, `reader` drains the peer's output.
    pub fn new(writer: W, reader: R) -> Self {
        Self {
            writer,
            frames: FrameReader::new(reader),
        }
    }
}

#[async_trait]
impl<W, R> Transport for StdioClient<W, R>
where
    W: AsyncWrite + Unpin + Send,
    R: AsyncRead + Unpin + Send,
{
    async fn round_trip(&mut self, request: &Request) -> Result<Response, TransportError> {
        write_frame(&mut self.writer, request).await?;

        let frame = self
            .frames
            .next_frame()
            .await?
            .ok_or(TransportError::Closed)?;
        let response =
            codec::decode_response(frame.as_bytes()).map_err(TransportError::InvalidResponse)?;

        check_correlation(request, &response)?;
        Ok(response)
    }
}
