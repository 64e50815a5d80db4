use anyhow::{Context, Result};
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Method, Request, Response, StatusCode};
use axum::middleware::Next;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use super::models::{ErrorResponse, TranslateRequest, TranslateResponse};
use super::page;
use super::state::ServerState;
use crate::dialect::Dialect;
use crate::error::TranslationError;
use crate::providers::Provider;
use crate::submission::{self, Panel, Phase, TranslationForm};
use crate::translator::Translator;

pub async fn run_server<P: Provider>(translator: Translator<P>, addr: String) -> Result<()> {
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind server address {}", addr))?;
    info!("listening on http://{}", listener.local_addr()?);
    serve(listener, translator).await
}

pub async fn serve<P: Provider>(listener: TcpListener, translator: Translator<P>) -> Result<()> {
    axum::serve(listener, router(translator)).await?;
    Ok(())
}

pub fn router<P: Provider>(translator: Translator<P>) -> Router {
    let state = Arc::new(ServerState { translator });
    Router::new()
        .route("/", get(index).post(submit_form::<P>))
        .route("/translate", post(translate::<P>))
        .route("/dialects", get(dialects))
        .route("/health", get(health))
        .with_state(state)
        .layer(axum::middleware::from_fn(cors_middleware))
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

async fn dialects() -> Json<Vec<&'static str>> {
    Json(Dialect::labels())
}

async fn cors_middleware(req: Request<Body>, next: Next) -> Result<Response<Body>, StatusCode> {
    if req.method() == Method::OPTIONS {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;
        apply_cors_headers(response.headers_mut());
        return Ok(response);
    }
    let mut response = next.run(req).await;
    apply_cors_headers(response.headers_mut());
    Ok(response)
}

fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert("access-control-allow-origin", HeaderValue::from_static("*"));
    headers.insert(
        "access-control-allow-methods",
        HeaderValue::from_static("GET,POST,OPTIONS"),
    );
    headers.insert(
        "access-control-allow-headers",
        HeaderValue::from_static("content-type"),
    );
}

async fn index() -> Result<Html<String>, (StatusCode, Html<String>)> {
    render_page("", None, &Phase::Idle)
}

async fn submit_form<P: Provider>(
    State(state): State<Arc<ServerState<P>>>,
    Form(payload): Form<TranslateRequest>,
) -> Result<(StatusCode, Html<String>), (StatusCode, Html<String>)> {
    let text = payload.text.unwrap_or_default();
    let dialect = match Dialect::parse_selection(payload.dialect.as_deref()) {
        Ok(dialect) => dialect,
        Err(err) => {
            let phase = Phase::Warning(err.to_string());
            let html = render_page(&text, None, &phase)?;
            return Ok((StatusCode::BAD_REQUEST, html));
        }
    };

    let form = TranslationForm::new(text, dialect);
    let phase = submission::submit(&state.translator, &form).await;
    let html = render_page(&form.text, form.dialect, &phase)?;
    Ok((StatusCode::OK, html))
}

fn render_page(
    text: &str,
    selected: Option<Dialect>,
    phase: &Phase,
) -> Result<Html<String>, (StatusCode, Html<String>)> {
    page::render(text, selected, phase).map(Html).map_err(|err| {
        error!("{:#}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html("failed to render page".to_string()),
        )
    })
}

async fn translate<P: Provider>(
    State(state): State<Arc<ServerState<P>>>,
    Json(payload): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, (StatusCode, Json<ErrorResponse>)> {
    let dialect = Dialect::parse_selection(payload.dialect.as_deref()).map_err(|err| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: err.to_string(),
                kind: "validation".to_string(),
            }),
        )
    })?;
    let form = TranslationForm::new(payload.text.unwrap_or_default(), dialect);

    match submission::submit(&state.translator, &form).await {
        Phase::Displaying(Panel::Translated { dialect, text }) => Ok(Json(TranslateResponse {
            dialect,
            translated: text,
        })),
        Phase::Displaying(Panel::Failed { error, .. }) => Err((
            status_for_error(&error),
            Json(ErrorResponse {
                error: error.to_string(),
                kind: error.kind().to_string(),
            }),
        )),
        Phase::Warning(message) => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: message,
                kind: "validation".to_string(),
            }),
        )),
        Phase::Idle | Phase::Validating | Phase::Translating => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "submission did not complete".to_string(),
                kind: "internal".to_string(),
            }),
        )),
    }
}

fn status_for_error(error: &TranslationError) -> StatusCode {
    match error {
        TranslationError::Validation(_) => StatusCode::BAD_REQUEST,
        TranslationError::Authentication(_) => StatusCode::UNAUTHORIZED,
        TranslationError::ServiceUnavailable(_) | TranslationError::MalformedResponse(_) => {
            StatusCode::BAD_GATEWAY
        }
        TranslationError::Prompt(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
