//! Stdio JSON-RPC server: read loop and method routing over one writer task.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::dispatch::{Dispatcher, ToolInvocation};
use crate::ipc::codec::{read_message, write_message};
use crate::types::{Error, ServerConfig};

/// Protocol revision answered when the client does not ask for one.
pub const LATEST_PROTOCOL_VERSION: &str = "2024-11-05";

/// Capacity of the outbound message queue.
const OUTBOUND_CAPACITY: usize = 64;

// JSON-RPC 2.0 reserved codes.
pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: &'static str,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i64,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl JsonRpcResponse {
    fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    fn tool_error(id: Value, err: &Error) -> Self {
        let category = err.category();
        let mut data = json!({ "category": category.as_str() });
        if let Some(status) = err.status() {
            data["status"] = json!(status);
        }
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError {
                code: category.jsonrpc_code(),
                message: err.message(),
                data: Some(data),
            }),
        }
    }
}

/// Tool server speaking newline-delimited JSON-RPC.
#[derive(Debug)]
pub struct McpServer {
    dispatcher: Arc<Dispatcher>,
    config: ServerConfig,
    cancel: CancellationToken,
}

impl McpServer {
    pub fn new(dispatcher: Dispatcher, config: ServerConfig) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Serve on the process's stdin/stdout until EOF or shutdown.
    pub async fn serve_stdio(&self) -> std::io::Result<()> {
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve one connection until EOF or shutdown.
    ///
    /// Tool calls run on their own tasks so a host may pipeline requests;
    /// responses can therefore arrive out of request order. On EOF the server
    /// waits for in-flight calls before returning.
    pub async fn serve<R, W>(&self, mut reader: R, writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<JsonRpcResponse>(OUTBOUND_CAPACITY);
        let writer_task = tokio::spawn(async move {
            let mut writer = writer;
            while let Some(response) = rx.recv().await {
                write_message(&mut writer, &response).await?;
            }
            Ok::<_, std::io::Error>(())
        });

        tracing::info!(
            "{} v{} serving on stdio ({} tools)",
            self.config.name,
            self.config.version,
            self.dispatcher.catalog().len(),
        );

        let mut in_flight = JoinSet::new();
        let read_result = loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    tracing::info!("Server shutting down");
                    break Ok(());
                }
                message = read_message(&mut reader, self.config.max_message_bytes) => {
                    match message {
                        Ok(Some(bytes)) => self.handle_message(&bytes, &tx, &mut in_flight).await,
                        Ok(None) => break Ok(()),
                        Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                            tracing::warn!("Rejected inbound message: {}", e);
                            let response = JsonRpcResponse::failure(Value::Null, INVALID_REQUEST, e.to_string());
                            if tx.send(response).await.is_err() {
                                break Ok(());
                            }
                        }
                        Err(e) => break Err(e),
                    }
                }
            }
        };

        if self.cancel.is_cancelled() {
            in_flight.abort_all();
        }
        while let Some(joined) = in_flight.join_next().await {
            if let Err(e) = joined {
                if !e.is_cancelled() {
                    tracing::warn!("Tool call task failed: {}", e);
                }
            }
        }

        drop(tx);
        match writer_task.await {
            Ok(write_result) => write_result?,
            Err(e) => tracing::warn!("Writer task failed: {}", e),
        }
        read_result
    }

    /// Request graceful shutdown.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    async fn handle_message(
        &self,
        bytes: &[u8],
        tx: &mpsc::Sender<JsonRpcResponse>,
        in_flight: &mut JoinSet<()>,
    ) {
        let raw: Value = match serde_json::from_slice(bytes) {
            Ok(v) => v,
            Err(e) => {
                let _ = tx
                    .send(JsonRpcResponse::failure(
                        Value::Null,
                        PARSE_ERROR,
                        format!("Parse error: {}", e),
                    ))
                    .await;
                return;
            }
        };

        let request: JsonRpcRequest = match serde_json::from_value(raw.clone()) {
            Ok(r) => r,
            Err(e) => {
                let id = raw.get("id").cloned().unwrap_or(Value::Null);
                let _ = tx
                    .send(JsonRpcResponse::failure(
                        id,
                        INVALID_REQUEST,
                        format!("Invalid request: {}", e),
                    ))
                    .await;
                return;
            }
        };

        // A request with `"id": null` is still a request; only a missing id marks a notification.
        let Some(id) = raw.get("id").cloned() else {
            tracing::debug!(method = %request.method, "Notification received");
            return;
        };

        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(id, self.initialize_result(&request.params)),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(
                id,
                json!({ "tools": self.dispatcher.list_tools() }),
            ),
            "tools/call" => {
                let invocation: ToolInvocation = match serde_json::from_value(request.params) {
                    Ok(invocation) => invocation,
                    Err(e) => {
                        let _ = tx
                            .send(JsonRpcResponse::failure(
                                id,
                                INVALID_PARAMS,
                                format!("Invalid tools/call params: {}", e),
                            ))
                            .await;
                        return;
                    }
                };
                let dispatcher = Arc::clone(&self.dispatcher);
                let tx = tx.clone();
                in_flight.spawn(async move {
                    let response = call_tool(&dispatcher, id, invocation).await;
                    let _ = tx.send(response).await;
                });
                return;
            }
            other => JsonRpcResponse::failure(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            ),
        };

        let _ = tx.send(response).await;
    }

    fn initialize_result(&self, params: &Value) -> Value {
        let protocol_version = params
            .get("protocolVersion")
            .and_then(Value::as_str)
            .unwrap_or(LATEST_PROTOCOL_VERSION);
        json!({
            "protocolVersion": protocol_version,
            "capabilities": { "tools": {} },
            "serverInfo": {
                "name": self.config.name,
                "version": self.config.version,
            },
        })
    }
}

async fn call_tool(dispatcher: &Dispatcher, id: Value, invocation: ToolInvocation) -> JsonRpcResponse {
    match dispatcher.dispatch(invocation).await {
        Ok(envelope) => match serde_json::to_value(&envelope) {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => JsonRpcResponse::failure(
                id,
                INTERNAL_ERROR,
                format!("Failed to encode tool result: {}", e),
            ),
        },
        Err(e) => JsonRpcResponse::tool_error(id, &e),
    }
}
