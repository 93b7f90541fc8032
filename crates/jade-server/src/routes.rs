use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use jade_core::{AsyncGptClient, ErrorKind, LlmError, QueryOptions};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::prompt::search_prompt;
use crate::templates::PageTemplates;

const HOME_TITLE: &str = "Home";

/// Shared by every request. The client is connected before the router is
/// built and closed after the server stops.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<AsyncGptClient>,
    pub pages: Arc<PageTemplates>,
    pub search_timeout: Duration,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/search", get(search))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    q: Option<String>,
}

async fn index(State(state): State<AppState>) -> Result<Html<String>, ServerError> {
    let form = state.pages.search_form().await?;
    let page = state.pages.render_page(HOME_TITLE, &form).await?;
    Ok(Html(page))
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Html<String>, ServerError> {
    let query = params
        .q
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .ok_or(ServerError::MissingQuery)?;

    info!(query = %query, "Search requested");
    let options = QueryOptions::new().timeout(state.search_timeout);
    let body = state
        .client
        .query_with(&search_prompt(&query), &options)
        .await?;
    debug!(%body, "Completion received");

    let page = state.pages.render_page(&query, &body).await?;
    Ok(Html(page))
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Missing search query: use /search?q=<terms>")]
    MissingQuery,

    #[error(transparent)]
    Completion(#[from] LlmError),

    #[error("Template error: {0:#}")]
    Template(#[from] anyhow::Error),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingQuery => StatusCode::BAD_REQUEST,
            Self::Completion(err) => match err.kind() {
                ErrorKind::Status | ErrorKind::Protocol => StatusCode::BAD_GATEWAY,
                ErrorKind::Network if err.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
                ErrorKind::Network => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), "{self}");
        } else {
            warn!(status = status.as_u16(), "{self}");
        }

        let message = match &self {
            Self::Completion(LlmError::Status { status, .. }) => {
                format!("The completion service answered with HTTP {status}")
            }
            Self::Completion(_) => "The completion service could not answer".to_string(),
            Self::Template(_) => "The page could not be rendered".to_string(),
            Self::MissingQuery => self.to_string(),
        };
        (status, message).into_response()
    }
}
