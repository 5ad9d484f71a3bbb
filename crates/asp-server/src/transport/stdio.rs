//! Stdio transport — reads request lines from stdin, writes envelopes to stdout.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::protocol::ProtocolHandler;
use crate::types::{AspError, AspResult};

use super::framing;

/// Newline-delimited JSON transport for local agents.
pub struct StdioTransport {
    handler: ProtocolHandler,
}

impl StdioTransport {
    pub fn new(handler: ProtocolHandler) -> Self {
        Self { handler }
    }

    /// Run the transport loop until stdin closes.
    pub async fn run(&self) -> AspResult<()> {
        let stdin = tokio::io::stdin();
        let mut stdout = tokio::io::stdout();
        let mut reader = BufReader::new(stdin);
        let mut line = String::new();

        tracing::info!("Stdio transport started");

        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line).await.map_err(AspError::Io)?;

            if bytes_read == 0 {
                tracing::info!("EOF on stdin, shutting down");
                break;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let envelope = match framing::parse_request(trimmed) {
                Ok(request) => {
                    let handler = self.handler.clone();
                    tokio::task::spawn_blocking(move || handler.handle_message(&request))
                        .await
                        .unwrap_or_else(|e| {
                            self.handler
                                .error_envelope(&AspError::Internal(e.to_string()))
                        })
                }
                Err(e) => self.handler.error_envelope(&e),
            };

            let framed = framing::frame_envelope(&envelope)?;
            stdout
                .write_all(framed.as_bytes())
                .await
                .map_err(AspError::Io)?;
            stdout.flush().await.map_err(AspError::Io)?;
        }

        Ok(())
    }
}
