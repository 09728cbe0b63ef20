//! Stream-pair transport: JSON-RPC lines in from a reader, out to a writer.

use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};

use crate::types::{JsonRpcMessage, McpError, McpResult};

use super::framing;

/// One decoded line from the peer.
#[derive(Debug)]
pub enum Frame {
    Message(JsonRpcMessage),
    /// The line could not be decoded. The session answers it and keeps going.
    Malformed(McpError),
}

/// Newline-delimited JSON-RPC over any byte-stream pair.
///
/// Nothing but framed envelopes is ever written to `writer`.
pub struct StdioTransport<R, W> {
    reader: BufReader<R>,
    writer: W,
    buf: Vec<u8>,
}

impl StdioTransport<Stdin, Stdout> {
    /// Bind to the process's stdin/stdout.
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdin(), tokio::io::stdout())
    }
}

impl<R, W> StdioTransport<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
            buf: Vec::new(),
        }
    }

    /// Read the next frame. `Ok(None)` means the peer closed the stream.
    pub async fn receive(&mut self) -> McpResult<Option<Frame>> {
        loop {
            self.buf.clear();
            let bytes_read = self
                .reader
                .read_until(b'\n', &mut self.buf)
                .await
                .map_err(McpError::Io)?;

            if bytes_read == 0 {
                tracing::info!("EOF on input stream");
                return Ok(None);
            }

            let line = match std::str::from_utf8(&self.buf) {
                Ok(line) => line.trim(),
                Err(e) => {
                    return Ok(Some(Frame::Malformed(McpError::ParseError(format!(
                        "Invalid UTF-8: {e}"
                    )))));
                }
            };

            if line.is_empty() {
                continue;
            }

            tracing::debug!("<- {line}");
            return Ok(Some(match framing::parse_message(line) {
                Ok(msg) => Frame::Message(msg),
                Err(e) => Frame::Malformed(e),
            }));
        }
    }

    /// Write one envelope and flush it.
    pub async fn send<T: Serialize + ?Sized>(&mut self, message: &T) -> McpResult<()> {
        let framed = framing::frame_message(message)?;
        tracing::debug!("-> {}", framed.trim_end());
        self.writer
            .write_all(framed.as_bytes())
            .await
            .map_err(McpError::Io)?;
        self.writer.flush().await.map_err(McpError::Io)?;
        Ok(())
    }

    /// Flush and shut down the write half.
    pub async fn close(&mut self) -> McpResult<()> {
        self.writer.flush().await.map_err(McpError::Io)?;
        self.writer.shutdown().await.map_err(McpError::Io)?;
        Ok(())
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader.into_inner(), self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{JsonRpcResponse, RequestId};
    use serde_json::json;

    #[tokio::test]
    async fn test_receive_skips_blank_lines_and_reports_eof() {
        let input: &[u8] = b"\n  \n{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n";
        let mut transport = StdioTransport::new(input, Vec::new());

        let frame = transport.receive().await.unwrap();
        assert!(matches!(frame, Some(Frame::Message(JsonRpcMessage::Request(_)))));
        assert!(transport.receive().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_receive_last_line_without_newline() {
        let input: &[u8] = b"{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}";
        let mut transport = StdioTransport::new(input, Vec::new());
        assert!(matches!(
            transport.receive().await.unwrap(),
            Some(Frame::Message(_))
        ));
    }

    #[tokio::test]
    async fn test_receive_malformed_lines() {
        let input: &[u8] = b"{\"broken\":\n\xff\xfe\n";
        let mut transport = StdioTransport::new(input, Vec::new());

        for _ in 0..2 {
            match transport.receive().await.unwrap() {
                Some(Frame::Malformed(e)) => assert_eq!(e.code(), -32700),
                other => panic!("expected malformed frame, got {other:?}"),
            }
        }
        assert!(transport.receive().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_send_writes_one_line_per_envelope() {
        let mut transport = StdioTransport::new(&b""[..], Vec::new());
        transport
            .send(&JsonRpcResponse::new(RequestId::Number(1), json!({})))
            .await
            .unwrap();
        transport
            .send(&JsonRpcResponse::new(RequestId::Number(2), json!({})))
            .await
            .unwrap();

        let (_, written) = transport.into_inner();
        let text = String::from_utf8(written).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(value["jsonrpc"], "2.0");
        }
    }
}
