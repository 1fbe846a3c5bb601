//! Newline-delimited JSON-RPC over stdin/stdout.
//!
//! One request per input line, one response line per request, flushed
//! immediately. Logs never go to stdout.

use tokio::io::{AsyncBufRead, AsyncWrite, BufReader};

use super::{read_raw_line, shutdown_signal, write_message, TransportError};
use crate::jsonrpc::{Dispatcher, JsonRpcError, JsonRpcResponse};

/// Serve requests from `reader` until end of input or a closed output.
pub async fn serve<R, W>(
    dispatcher: &Dispatcher,
    mut reader: R,
    mut writer: W,
) -> Result<(), TransportError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    let mut handled: u64 = 0;

    while read_raw_line(&mut reader, &mut buf).await? {
        let response = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => dispatcher.handle_message(line).await,
            Err(e) => {
                tracing::warn!(error = %e, "input line is not valid UTF-8");
                Some(JsonRpcResponse::failure(None, JsonRpcError::parse_error()))
            }
        };

        let Some(response) = response else {
            continue;
        };
        handled += 1;

        match write_message(&mut writer, &response).await {
            Ok(()) => {}
            Err(TransportError::Closed) => {
                tracing::info!(handled, "stdout closed, stopping");
                return Ok(());
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!(handled, "stdin closed, stopping");
    Ok(())
}

/// Serve the process's own stdin/stdout until EOF or a shutdown signal.
pub async fn run_stdio(dispatcher: Dispatcher) -> Result<(), TransportError> {
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    tokio::select! {
        result = serve(&dispatcher, stdin, stdout) => result,
        _ = shutdown_signal() => Ok(()),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::TicketServiceClient;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(TicketServiceClient::new("http://127.0.0.1:9").unwrap())
    }

    async fn run_lines(input: &str) -> Vec<serde_json::Value> {
        run_bytes(input.as_bytes()).await
    }

    async fn run_bytes(input: &[u8]) -> Vec<serde_json::Value> {
        let mut out: Vec<u8> = Vec::new();
        serve(&dispatcher(), input, &mut out)
            .await
            .unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_parse_error_then_continues() {
        let responses = run_lines(
            "{not json\n{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\n",
        )
        .await;
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["error"]["code"], -32700);
        assert!(responses[0]["id"].is_null());
        assert_eq!(responses[1]["id"], 2);
        assert_eq!(responses[1]["result"], serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_notifications_and_blank_lines_produce_nothing() {
        let responses = run_lines(
            "\n   \n{\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n",
        )
        .await;
        assert!(responses.is_empty());
    }

    #[tokio::test]
    async fn test_one_line_per_request() {
        let responses = run_lines(concat!(
            "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"initialize\",\"params\":{}}\n",
            "{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"tools/list\"}\n",
            "{\"jsonrpc\":\"2.0\",\"id\":3,\"method\":\"nope\"}",
        ))
        .await;
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0]["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(responses[1]["result"]["tools"].as_array().unwrap().len(), 6);
        assert_eq!(responses[2]["error"]["code"], -32601);
    }

    #[tokio::test]
    async fn test_empty_input_ends_cleanly() {
        assert!(run_lines("").await.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_then_continues() {
        let responses =
            run_bytes(b"\xff\xfe\n{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\n").await;
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["error"]["code"], -32700);
        assert!(responses[0]["id"].is_null());
        assert_eq!(responses[1]["id"], 2);
        assert_eq!(responses[1]["result"], serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_crlf_line_endings() {
        let responses =
            run_lines("{\"jsonrpc\":\"2.0\",\"id\":7,\"method\":\"ping\"}\r\n").await;
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["id"], 7);
    }
}
