use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Buf, BytesMut};
use futures::Stream;
use pin_project_lite::pin_project;

use super::error::UpstreamError;

pin_project! {
    /// Splits a chunked byte stream into message lines.
    ///
    /// Lines end with `\n` (an optional preceding `\r` is dropped). A blank
    /// keep-alive line is emitted as an empty string so consumers can tell a
    /// quiet connection from a dead one. A line split across chunks is
    /// reassembled, and a trailing line without terminator is emitted when
    /// the inner stream ends.
    pub struct MessageLines<S> {
        #[pin]
        inner: S,
        buffer: BytesMut,
        done: bool,
    }
}

impl<S> MessageLines<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            buffer: BytesMut::new(),
            done: false,
        }
    }
}

/// Take the next complete line out of `buffer`; keep-alives come back empty
fn next_line(buffer: &mut BytesMut) -> Option<Result<String, UpstreamError>> {
    let pos = buffer.iter().position(|b| *b == b'\n')?;
    let raw = buffer.split_to(pos + 1);
    Some(decode(trim_line(&raw)))
}

fn trim_line(raw: &[u8]) -> &[u8] {
    let mut line = raw;
    while let [rest @ .., b'\n' | b'\r'] = line {
        line = rest;
    }
    line
}

fn decode(line: &[u8]) -> Result<String, UpstreamError> {
    String::from_utf8(line.to_vec()).map_err(|e| {
        UpstreamError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

impl<S, B, E> Stream for MessageLines<S>
where
    S: Stream<Item = Result<B, E>>,
    B: Buf,
    E: Into<UpstreamError>,
{
    type Item = Result<String, UpstreamError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if let Some(line) = next_line(this.buffer) {
                return Poll::Ready(Some(line));
            }
            if *this.done {
                let rest = this.buffer.split();
                let line = trim_line(&rest);
                if line.is_empty() {
                    return Poll::Ready(None);
                }
                return Poll::Ready(Some(decode(line)));
            }

            match this.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(mut chunk))) => {
                    while chunk.has_remaining() {
                        let part = chunk.chunk();
                        let len = part.len();
                        this.buffer.extend_from_slice(part);
                        chunk.advance(len);
                    }
                }
                Poll::Ready(Some(Err(e))) => return Poll::Ready(Some(Err(e.into()))),
                Poll::Ready(None) => *this.done = true,
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
