//! Newline-delimited framing over an unbounded byte stream

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};

use crate::errors::TransportError;

pub const DEFAULT_MAX_FRAME_BYTES: usize = 10 * 1024 * 1024;

/// One delimited payload, without its trailing `\n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    payload: Vec<u8>,
}

impl Frame {
    pub fn as_bytes(&self) -> &[u8] {
        &self.payload
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.payload
    }
}

/// Lazily splits a byte stream into [`Frame`]s, buffering partial lines across reads.
///
/// End of input acts as a final delimiter, so an undelimited trailing payload is yielded once.
/// Empty lines are yielded as empty frames. Any I/O error ends the sequence.
pub struct FrameReader<R> {
    reader: BufReader<R>,
    max_frame_bytes: usize,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_limit(reader, DEFAULT_MAX_FRAME_BYTES)
    }

    pub fn with_limit(reader: R, max_frame_bytes: usize) -> Self {
        Self {
            reader: BufReader::new(reader),
            max_frame_bytes,
        }
    }

    /// Next frame, or `None` once the stream is exhausted.
    pub async fn next_frame(&mut self) -> Result<Option<Frame>, TransportError> {
        let mut payload = Vec::new();
        // One extra byte leaves room for the delimiter of a frame exactly at the limit.
        let budget = self.max_frame_bytes as u64 + 1;
        let read = (&mut self.reader)
            .take(budget)
            .read_until(b'\n', &mut payload)
            .await?;

        if read == 0 {
            return Ok(None);
        }

        if payload.last() == Some(&b'\n') {
            payload.pop();
        } else if payload.len() > self.max_frame_bytes {
            return Err(TransportError::FrameTooLarge {
                max_bytes: self.max_frame_bytes,
            });
        }

        Ok(Some(Frame { payload }))
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use tokio_test::io::Builder;

    use super::*;

    async fn collect<R: AsyncRead + Unpin>(mut reader: FrameReader<R>) -> Vec<Vec<u8>> {
        let mut frames = Vec::new();
        while let Some(frame) = reader.next_frame().await.expect("no transport error") {
            frames.push(frame.into_bytes());
        }
        frames
    }

    #[tokio::test]
    async fn reassembles_frames_split_across_reads() {
        let stream = Builder::new()
            .read(b"{\"a\":")
            .read(b"1}\n{\"b\"")
            .read(b":2}\n")
            .build();

        let frames = collect(FrameReader::new(stream)).await;
        assert_eq!(frames, vec![b"{\"a\":1}".to_vec(), b"{\"b\":2}".to_vec()]);
    }

    #[tokio::test]
    async fn multiple_frames_in_one_read() {
        let frames = collect(FrameReader::new(&b"one\ntwo\nthree\n"[..])).await;
        assert_eq!(
            frames,
            vec![b"one".to_vec(), b"two".to_vec(), b"three".to_vec()]
        );
    }

    #[tokio::test]
    async fn trailing_payload_without_delimiter_is_yielded_once() {
        let frames = collect(FrameReader::new(&b"first\nlast"[..])).await;
        assert_eq!(frames, vec![b"first".to_vec(), b"last".to_vec()]);
    }

    #[tokio::test]
    async fn empty_lines_yield_empty_frames() {
        let frames = collect(FrameReader::new(&b"\na\n\n"[..])).await;
        assert_eq!(frames, vec![Vec::new(), b"a".to_vec(), Vec::new()]);
    }

    #[tokio::test]
    async fn empty_stream_yields_nothing() {
        let frames = collect(FrameReader::new(&b""[..])).await;
        assert!(frames.is_empty());
    }

    #[tokio::test]
    async fn io_error_ends_sequence_without_partial_frame() {
        let stream = Builder::new()
            .read(b"complete\npart")
            .read_error(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
            .build();
        let mut reader = FrameReader::new(stream);

        let first = reader.next_frame().await.expect("first frame");
        assert_eq!(first.map(Frame::into_bytes), Some(b"complete".to_vec()));

        let err = reader.next_frame().await.expect_err("stream failure");
        assert!(matches!(err, TransportError::Io(_)));
    }

    #[tokio::test]
    async fn frame_at_limit_is_accepted_and_larger_is_rejected() {
        let mut reader = FrameReader::with_limit(&b"1234\n12345\n"[..], 4);

        let first = reader.next_frame().await.expect("within limit");
        assert_eq!(first.map(Frame::into_bytes), Some(b"1234".to_vec()));

        let err = reader.next_frame().await.expect_err("over limit");
        assert!(matches!(err, TransportError::FrameTooLarge { max_bytes: 4 }));
    }
}
