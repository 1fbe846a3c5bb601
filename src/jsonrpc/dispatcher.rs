//! JSON-RPC dispatcher: turns one inbound message into at most one response.
//!
//! Shared by the stdio and HTTP transports. The dispatcher owns the upstream
//! client and never touches I/O directly.

use std::time::Instant;

use serde::Serialize;

use super::types::{
    error_codes, CallToolParams, CallToolResult, InitializeResult, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, ListToolsResult, RequestId, ServerCapabilities, ServerInfo,
};
use crate::tools::{ToolError, ToolKind};
use crate::upstream::TicketServiceClient;

/// MCP protocol revision advertised in `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name advertised in `initialize`.
pub const SERVER_NAME: &str = "FlightTicketTools";

// ─── Dispatcher ──────────────────────────────────────────────────────────────

/// Routes MCP methods to their handlers.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: TicketServiceClient,
}

impl Dispatcher {
    /// Dispatcher serving every ticket tool against `client`.
    pub fn new(client: TicketServiceClient) -> Self {
        Self { client }
    }

    /// Handle one raw message. Returns `None` for notifications.
    pub async fn handle_message(&self, raw: &str) -> Option<JsonRpcResponse> {
        match parse_message(raw) {
            Ok(request) => self.dispatch(request).await,
            Err(response) => {
                tracing::warn!(
                    code = ?response.error_code(),
                    "rejected malformed message"
                );
                Some(response)
            }
        }
    }

    /// Handle one parsed request. Returns `None` for notifications.
    pub async fn dispatch(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            tracing::debug!(method = %request.method, "notification received");
            return None;
        }

        let start = Instant::now();
        let JsonRpcRequest {
            id, method, params, ..
        } = request;

        let response = match method.as_str() {
            "initialize" => respond(id.clone(), &initialize_result()),
            "tools/list" => respond(
                id.clone(),
                &ListToolsResult {
                    tools: ToolKind::descriptors(),
                },
            ),
            "tools/call" => self.call_tool(id.clone(), params).await,
            "ping" => JsonRpcResponse::success(id.clone(), serde_json::json!({})),
            other => JsonRpcResponse::failure(id.clone(), JsonRpcError::method_not_found(other)),
        };

        tracing::info!(
            method = %method,
            id = %id.as_ref().map_or_else(|| "null".to_string(), RequestId::to_string),
            code = ?response.error_code(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "handled request"
        );

        Some(response)
    }

    async fn call_tool(
        &self,
        id: Option<RequestId>,
        params: Option<serde_json::Value>,
    ) -> JsonRpcResponse {
        let params: CallToolParams = match params.map(serde_json::from_value) {
            Some(Ok(params)) => params,
            Some(Err(e)) => {
                return JsonRpcResponse::failure(id, JsonRpcError::invalid_params(&e.to_string()))
            }
            None => {
                return JsonRpcResponse::failure(
                    id,
                    JsonRpcError::invalid_params("missing tool name"),
                )
            }
        };

        let outcome = match ToolKind::resolve(&params.name) {
            Ok(kind) => {
                tracing::debug!(tool = kind.name(), "invoking tool");
                kind.invoke(&self.client, params.arguments).await
            }
            Err(err @ ToolError::UnknownTool { .. }) => {
                tracing::warn!(tool = %params.name, "unknown tool requested");
                Ok(serde_json::json!({ "error": err.to_string() }))
            }
            Err(err) => Err(err),
        };

        match outcome {
            Ok(value) => match CallToolResult::from_value(&value) {
                Ok(result) => respond(id, &result),
                Err(e) => JsonRpcResponse::failure(
                    id,
                    JsonRpcError::internal_error(format!("Tool execution error: {e}")),
                ),
            },
            Err(err) => {
                tracing::warn!(tool = %params.name, error = %err, "tool execution failed");
                JsonRpcResponse::failure(
                    id,
                    JsonRpcError::internal_error(format!("Tool execution error: {err}")),
                )
            }
        }
    }
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

/// Parse a raw message into a request, or the error response to send instead.
///
/// The request id is recovered whenever the message is a JSON object, so
/// structural errors still echo it.
pub fn parse_message(raw: &str) -> Result<JsonRpcRequest, JsonRpcResponse> {
    if raw.trim().is_empty() {
        return Err(JsonRpcResponse::failure(
            None,
            JsonRpcError::invalid_request(Some("empty message".into())),
        ));
    }

    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|_| JsonRpcResponse::failure(None, JsonRpcError::parse_error()))?;

    let object = match &value {
        serde_json::Value::Object(object) => object,
        serde_json::Value::Array(_) => {
            return Err(JsonRpcResponse::failure(
                None,
                JsonRpcError::invalid_request(Some("batch requests are not supported".into())),
            ))
        }
        _ => {
            return Err(JsonRpcResponse::failure(
                None,
                JsonRpcError::invalid_request(Some("message must be a JSON object".into())),
            ))
        }
    };

    let id = object
        .get("id")
        .and_then(|raw_id| serde_json::from_value::<RequestId>(raw_id.clone()).ok());

    serde_json::from_value(value).map_err(|e| {
        JsonRpcResponse::failure(id, JsonRpcError::invalid_request(Some(e.to_string())))
    })
}

/// Whether an error response should be reported as a malformed HTTP request.
pub fn is_malformed(response: &JsonRpcResponse) -> bool {
    matches!(
        response.error_code(),
        Some(error_codes::PARSE_ERROR) | Some(error_codes::INVALID_REQUEST)
    )
}

fn initialize_result() -> InitializeResult {
    InitializeResult {
        protocol_version: PROTOCOL_VERSION,
        capabilities: ServerCapabilities::default(),
        server_info: ServerInfo {
            name: SERVER_NAME,
            version: env!("CARGO_PKG_VERSION"),
        },
    }
}

fn respond<T: Serialize>(id: Option<RequestId>, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::failure(
            id,
            JsonRpcError::internal_error(format!("failed to encode result: {e}")),
        ),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn offline_dispatcher() -> Dispatcher {
        // Port 9 (discard) is never contacted by these tests.
        Dispatcher::new(TicketServiceClient::new("http://127.0.0.1:9").unwrap())
    }

    async fn stubbed() -> (MockServer, Dispatcher) {
        let server = MockServer::start().await;
        let client = TicketServiceClient::new(&server.uri()).unwrap();
        (server, Dispatcher::new(client))
    }

    fn text_of(response: &JsonRpcResponse) -> serde_json::Value {
        let result = response.result.as_ref().expect("expected a result");
        let text = result["content"][0]["text"].as_str().unwrap();
        serde_json::from_str(text).unwrap()
    }

    #[tokio::test]
    async fn test_initialize_reports_server_info() {
        let d = offline_dispatcher();
        let resp = d
            .handle_message(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#)
            .await
            .unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "FlightTicketTools");
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
        assert_eq!(resp.id, Some(RequestId::Number(1_i64.into())));
    }

    #[tokio::test]
    async fn test_tools_list_returns_six_tools() {
        let d = offline_dispatcher();
        let resp = d
            .handle_message(r#"{"jsonrpc":"2.0","id":"a","method":"tools/list"}"#)
            .await
            .unwrap();
        let tools = resp.result.unwrap()["tools"].as_array().unwrap().clone();
        assert_eq!(tools.len(), 6);
        assert!(tools.iter().all(|t| t.get("inputSchema").is_some()));
        assert_eq!(resp.id, Some(RequestId::String("a".into())));
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let d = offline_dispatcher();
        let resp = d
            .handle_message(r#"{"jsonrpc":"2.0","id":3,"method":"resources/list"}"#)
            .await
            .unwrap();
        let error = resp.error.unwrap();
        assert_eq!(error.code, error_codes::METHOD_NOT_FOUND);
        assert_eq!(error.message, "Method not found: resources/list");
    }

    #[tokio::test]
    async fn test_parse_error_has_null_id() {
        let d = offline_dispatcher();
        let resp = d.handle_message("{not json").await.unwrap();
        assert_eq!(resp.id, None);
        assert_eq!(resp.error_code(), Some(error_codes::PARSE_ERROR));
    }

    #[tokio::test]
    async fn test_structural_errors_are_invalid_request() {
        let d = offline_dispatcher();
        for raw in ["", "   ", "[]", "42", r#"{"jsonrpc":"2.0","id":9}"#] {
            let resp = d.handle_message(raw).await.unwrap();
            assert_eq!(
                resp.error_code(),
                Some(error_codes::INVALID_REQUEST),
                "input: {raw:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_missing_method_keeps_id() {
        let d = offline_dispatcher();
        let resp = d.handle_message(r#"{"jsonrpc":"2.0","id":9}"#).await.unwrap();
        assert_eq!(resp.id, Some(RequestId::Number(9_i64.into())));
    }

    #[tokio::test]
    async fn test_notification_gets_no_response() {
        let d = offline_dispatcher();
        let resp = d
            .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(resp.is_none());
    }

    #[tokio::test]
    async fn test_ping() {
        let d = offline_dispatcher();
        let resp = d
            .handle_message(r#"{"jsonrpc":"2.0","id":5,"method":"ping"}"#)
            .await
            .unwrap();
        assert_eq!(resp.result, Some(json!({})));
    }

    #[tokio::test]
    async fn test_call_without_name_is_invalid_params() {
        let d = offline_dispatcher();
        for raw in [
            r#"{"jsonrpc":"2.0","id":1,"method":"tools/call"}"#,
            r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"arguments":{}}}"#,
        ] {
            let resp = d.handle_message(raw).await.unwrap();
            assert_eq!(resp.error_code(), Some(error_codes::INVALID_PARAMS));
        }
    }

    #[tokio::test]
    async fn test_unknown_tool_is_inline_error() {
        let d = offline_dispatcher();
        let resp = d
            .handle_message(
                r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"book_hotel"}}"#,
            )
            .await
            .unwrap();
        assert!(resp.error.is_none());
        assert_eq!(text_of(&resp), json!({"error": "Unknown tool: book_hotel"}));
    }

    #[tokio::test]
    async fn test_invalid_arguments_is_internal_error() {
        let d = offline_dispatcher();
        let resp = d
            .handle_message(
                r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"get_flight_ticket","arguments":{}}}"#,
            )
            .await
            .unwrap();
        let error = resp.error.unwrap();
        assert_eq!(error.code, error_codes::INTERNAL_ERROR);
        assert!(error.message.starts_with("Tool execution error: "));
    }

    #[tokio::test]
    async fn test_tool_result_round_trips_through_text() {
        let (server, d) = stubbed().await;
        let upstream = json!({
            "confirmation_id": "ABC123",
            "origin": "JFK",
            "destination": "LAX",
            "passengers": 2,
            "status": "CONFIRMED"
        });
        Mock::given(method("GET"))
            .and(path("/ticket/ABC123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(upstream.clone()))
            .mount(&server)
            .await;

        let resp = d
            .handle_message(
                r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"get_flight_ticket","arguments":{"confirmation_id":"ABC123"}}}"#,
            )
            .await
            .unwrap();
        let result = resp.result.as_ref().unwrap();
        assert_eq!(result["content"][0]["type"], "text");
        assert!(result["content"][0]["text"].as_str().unwrap().contains('\n'));
        assert_eq!(text_of(&resp), upstream);
    }

    #[tokio::test]
    async fn test_upstream_not_found_is_inline_error() {
        let (server, d) = stubbed().await;
        Mock::given(method("GET"))
            .and(path("/ticket/NOPE00"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"error": "Ticket not found"})),
            )
            .mount(&server)
            .await;

        let resp = d
            .handle_message(
                r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"get_flight_ticket","arguments":{"confirmation_id":"NOPE00"}}}"#,
            )
            .await
            .unwrap();
        assert!(resp.error.is_none());
        assert_eq!(text_of(&resp), json!({"error": {"error": "Ticket not found"}}));
    }

    #[test]
    fn test_is_malformed() {
        let parse = JsonRpcResponse::failure(None, JsonRpcError::parse_error());
        let missing = JsonRpcResponse::failure(None, JsonRpcError::method_not_found("x"));
        assert!(is_malformed(&parse));
        assert!(!is_malformed(&missing));
    }
}
