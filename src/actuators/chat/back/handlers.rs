use std::sync::Arc;

use axum::{
    Json, Router,
    body::{Body, Bytes},
    extract::{State, rejection::JsonRejection},
    http::Method,
    response::{IntoResponse, Response},
    routing::post,
};
use futures_util::{Stream, StreamExt, stream, stream::BoxStream};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{Instrument, Span};
use uuid::Uuid;

use crate::{
    actuators::chat::dto::ChatRequest,
    config::proxy::ProxyConfig,
    infer::{SseRelay, UpstreamClient},
    service::{self, EMPTY_MESSAGE_ERROR},
};

const PLAIN_TEXT_UTF8: &str = "text/plain; charset=utf-8";

pub struct RelayState {
    pub upstream: UpstreamClient,
}

pub fn build_router(config: ProxyConfig) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([http::header::CONTENT_TYPE]);

    let state = Arc::new(RelayState {
        upstream: UpstreamClient::new(config.upstream),
    });

    // Build router
    let router = Router::new()
        .route("/chat", post(chat_handler))
        .with_state(state);

    let router = match config.static_root {
        Some(root) => router.fallback_service(ServeDir::new(root)),
        None => router,
    };

    router.layer(TraceLayer::new_for_http()).layer(cors)
}

pub async fn chat_handler(
    State(state): State<Arc<RelayState>>,
    request: Result<Json<ChatRequest>, JsonRejection>,
) -> service::Result<Response> {
    let span = tracing::info_span!("chat", request_id = %Uuid::new_v4());
    relay_chat(state, request).instrument(span).await
}

async fn relay_chat(
    state: Arc<RelayState>,
    request: Result<Json<ChatRequest>, JsonRejection>,
) -> service::Result<Response> {
    let Json(request) = request.map_err(|rejection| {
        tracing::warn!("Rejected chat request body: {}", rejection.body_text());
        service::Error::BadRequest(rejection.body_text().into())
    })?;

    let message = match request.message {
        Some(message) if !message.is_empty() => message,
        _ => return Err(service::Error::BadRequest(EMPTY_MESSAGE_ERROR.into())),
    };

    let outbound = state.upstream.request_for(&message);
    let response = state.upstream.open_stream(&outbound).await?;
    tracing::debug!("Upstream accepted the request, relaying");

    let body = Body::from_stream(relay_body(response.bytes_stream()));
    Ok(([(http::header::CONTENT_TYPE, PLAIN_TEXT_UTF8)], body).into_response())
}

/// Logs when the relay is dropped before upstream finished, which means
/// the client went away. Dropping the relay drops the upstream response
/// and closes that connection.
struct DisconnectGuard {
    armed: bool,
    span: Span,
}

impl DisconnectGuard {
    fn new(span: Span) -> Self {
        Self { armed: true, span }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        if self.armed {
            let _entered = self.span.enter();
            tracing::warn!("Client disconnected before upstream finished, aborting upstream request");
        }
    }
}

struct RelayStream<E> {
    upstream: BoxStream<'static, Result<Bytes, E>>,
    relay: SseRelay,
    guard: DisconnectGuard,
}

/// Re-emits the text deltas of an upstream SSE byte stream as plain text.
///
/// Each upstream chunk that yields text becomes one body chunk. An
/// upstream error ends the body with that error, which aborts the client
/// connection without any trailing marker.
pub fn relay_body<S, E>(upstream: S) -> impl Stream<Item = Result<Bytes, E>> + Send + 'static
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let state = RelayStream {
        upstream: upstream.boxed(),
        relay: SseRelay::new(),
        guard: DisconnectGuard::new(Span::current()),
    };

    stream::unfold(Some(state), |state| {
        let span = state
            .as_ref()
            .map(|state| state.guard.span.clone())
            .unwrap_or_else(Span::none);
        async move {
            let mut state = state?;
            loop {
                match state.upstream.next().await {
                    Some(Ok(chunk)) => {
                        let text = state.relay.push(&chunk);
                        if !text.is_empty() {
                            return Some((Ok(Bytes::from(text)), Some(state)));
                        }
                    }
                    Some(Err(error)) => {
                        state.guard.disarm();
                        tracing::error!(
                            "Upstream stream failed after {} bytes were relayed: {}",
                            state.relay.forwarded_bytes(),
                            error
                        );
                        return Some((Err(error), None));
                    }
                    None => {
                        state.guard.disarm();
                        let text = state.relay.finish();
                        tracing::debug!("Upstream finished, relayed {} bytes", state.relay.forwarded_bytes());
                        return (!text.is_empty()).then(|| (Ok(Bytes::from(text)), None));
                    }
                }
            }
        }
        .instrument(span)
    })
}
