//! Web server for the card inventory UI
//!
//! HTML pages for the dashboard, add/edit forms and the searchable list,
//! plus a small read-only JSON API.

use axum::{
    extract::{Form, FromRequest, FromRequestParts, Path, Query, Request, State},
    http::{request::Parts, StatusCode},
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::get,
    Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::database::{
    dashboard_summary, delete_item, get_item, insert_item, list_items, update_item, Store,
};
use crate::error::{InventoryError, Result};
use crate::models::{CardForm, DashboardSummary, InventoryItem, SearchForm};
use crate::views;

/// Shared application state
///
/// Holds only the database location; handlers open their own connection.
#[derive(Clone)]
struct AppState {
    store: Arc<Store>,
}

/// GET /view query parameters
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ViewParams {
    search: Option<String>,
    player: Option<String>,
    year: Option<String>,
    /// Outcome code of the previous write (see `Notice`)
    outcome: Option<String>,
    /// Card the outcome refers to
    id: Option<String>,
}

/// Result of a write, passed to the list page through the redirect
#[derive(Debug, Clone, Copy, PartialEq)]
enum Notice {
    Updated,
    Deleted,
    Missing,
}

impl Notice {
    fn code(self) -> &'static str {
        match self {
            Notice::Updated => "updated",
            Notice::Deleted => "deleted",
            Notice::Missing => "missing",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "updated" => Some(Notice::Updated),
            "deleted" => Some(Notice::Deleted),
            "missing" => Some(Notice::Missing),
            _ => None,
        }
    }

    fn message(self, id: i64) -> String {
        match self {
            Notice::Updated => format!("Card {} updated.", id),
            Notice::Deleted => format!("Card {} deleted.", id),
            Notice::Missing => format!("No card with id {}; nothing was deleted.", id),
        }
    }

    fn redirect(self, id: i64) -> Response {
        Redirect::to(&format!("/view?outcome={}&id={}", self.code(), id)).into_response()
    }
}

impl ViewParams {
    /// Banner text, only for a known outcome code with a numeric id
    fn notice(&self) -> Option<String> {
        let notice = Notice::from_code(self.outcome.as_deref()?)?;
        let id = self.id.as_deref()?.parse().ok()?;
        Some(notice.message(id))
    }
}

/// Card id from the `{id}` path segment
///
/// Anything that is not an integer id is answered with the not-found page.
struct CardId(i64);

impl<S> FromRequestParts<S> for CardId
where
    S: Send + Sync,
{
    type Rejection = InventoryError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| InventoryError::InvalidId(e.body_text()))?;
        raw.parse()
            .map(CardId)
            .map_err(|_| InventoryError::InvalidId(raw))
    }
}

/// Url-encoded form body whose rejections use the crate's error pages
struct HtmlForm<T>(T);

impl<T, S> FromRequest<S> for HtmlForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = InventoryError;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        match Form::<T>::from_request(req, state).await {
            Ok(Form(value)) => Ok(HtmlForm(value)),
            Err(rejection) => Err(InventoryError::InvalidForm {
                status: rejection.status(),
                message: rejection.body_text(),
            }),
        }
    }
}

/// API response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl IntoResponse for InventoryError {
    fn into_response(self) -> Response {
        match self {
            InventoryError::NotFound(id) => (
                StatusCode::NOT_FOUND,
                Html(views::not_found_page(&format!("No card with id {}.", id))),
            )
                .into_response(),
            InventoryError::InvalidId(raw) => {
                log::warn!("Rejected card id {:?}", raw);
                (
                    StatusCode::NOT_FOUND,
                    Html(views::not_found_page(&format!("No card with id {}.", raw))),
                )
                    .into_response()
            }
            InventoryError::InvalidForm { status, message } => {
                log::warn!("Rejected form submission: {}", message);
                (status, Html(views::rejected_page(&message))).into_response()
            }
            InventoryError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Html(views::invalid_page(&errors)),
            )
                .into_response(),
            InventoryError::Database(_) | InventoryError::Io(_) => {
                log::error!("Request failed: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, Html(views::error_page())).into_response()
            }
        }
    }
}

/// GET / - dashboard totals
async fn home_handler(State(state): State<AppState>) -> Result<Html<String>> {
    let conn = state.store.connect()?;
    let summary = dashboard_summary(&conn)?;
    Ok(Html(views::home_page(&summary)))
}

/// GET /add - blank entry form
async fn add_form_handler() -> Html<String> {
    Html(views::add_page(&CardForm::default(), &[]))
}

/// POST /add - create one lot, then back to the dashboard
async fn add_handler(
    State(state): State<AppState>,
    HtmlForm(form): HtmlForm<CardForm>,
) -> Result<Response> {
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            log::warn!("Rejected new card: {} field error(s)", errors.len());
            let html = views::add_page(&form, &errors);
            return Ok((StatusCode::BAD_REQUEST, Html(html)).into_response());
        }
    };

    let conn = state.store.connect()?;
    insert_item(&conn, &input)?;
    Ok(Redirect::to("/").into_response())
}

/// GET /view - list all lots (or filter via query parameters)
async fn view_handler(
    State(state): State<AppState>,
    Query(params): Query<ViewParams>,
) -> Result<Response> {
    let notice = params.notice();
    let search = SearchForm {
        search: params.search,
        player: params.player,
        year: params.year,
    };
    render_inventory(&state, &search, notice.as_deref())
}

/// POST /view - list lots matching the search form
async fn search_handler(
    State(state): State<AppState>,
    HtmlForm(search): HtmlForm<SearchForm>,
) -> Result<Response> {
    render_inventory(&state, &search, None)
}

fn render_inventory(
    state: &AppState,
    search: &SearchForm,
    notice: Option<&str>,
) -> Result<Response> {
    let filter = match search.validate() {
        Ok(filter) => filter,
        Err(errors) => {
            let html = views::inventory_page(&[], search, notice, &errors);
            return Ok((StatusCode::BAD_REQUEST, Html(html)).into_response());
        }
    };

    let conn = state.store.connect()?;
    let items = list_items(&conn, &filter)?;
    log::debug!("Listing {} cards (filter: {:?})", items.len(), filter);
    Ok(Html(views::inventory_page(&items, search, notice, &[])).into_response())
}

/// GET /edit/{id} - form pre-filled with the lot
async fn edit_form_handler(
    State(state): State<AppState>,
    CardId(id): CardId,
) -> Result<Html<String>> {
    let conn = state.store.connect()?;
    let item = get_item(&conn, id)?.ok_or(InventoryError::NotFound(id))?;
    Ok(Html(views::edit_page(id, &item.to_form(), &[])))
}

/// POST /edit/{id} - overwrite every field of the lot
async fn edit_handler(
    State(state): State<AppState>,
    CardId(id): CardId,
    HtmlForm(form): HtmlForm<CardForm>,
) -> Result<Response> {
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            log::warn!("Rejected edit of card {}: {} field error(s)", id, errors.len());
            let html = views::edit_page(id, &form, &errors);
            return Ok((StatusCode::BAD_REQUEST, Html(html)).into_response());
        }
    };

    let conn = state.store.connect()?;
    if !update_item(&conn, id, &input)? {
        return Err(InventoryError::NotFound(id));
    }
    Ok(Notice::Updated.redirect(id))
}

/// GET /delete/{id} - remove the lot and report the outcome on the list page
async fn delete_handler(
    State(state): State<AppState>,
    CardId(id): CardId,
) -> Result<Response> {
    let conn = state.store.connect()?;
    let notice = if delete_item(&conn, id)? {
        Notice::Deleted
    } else {
        Notice::Missing
    };
    Ok(notice.redirect(id))
}

// ── JSON API ───────────────────────────────────────────────────────────────

/// GET /api/items?search=&player=&year=
async fn api_items_handler(
    State(state): State<AppState>,
    Query(search): Query<SearchForm>,
) -> Response {
    api_result(find_items(&state.store, &search))
}

/// GET /api/items/{id}
async fn api_item_handler(
    State(state): State<AppState>,
    id: std::result::Result<CardId, InventoryError>,
) -> Response {
    api_result(id.and_then(|CardId(id)| find_item(&state.store, id)))
}

/// GET /api/summary
async fn api_summary_handler(State(state): State<AppState>) -> Response {
    api_result(summarize(&state.store))
}

fn find_items(store: &Store, search: &SearchForm) -> Result<Vec<InventoryItem>> {
    let filter = search.validate().map_err(InventoryError::Validation)?;
    let conn = store.connect()?;
    Ok(list_items(&conn, &filter)?)
}

fn find_item(store: &Store, id: i64) -> Result<InventoryItem> {
    let conn = store.connect()?;
    get_item(&conn, id)?.ok_or(InventoryError::NotFound(id))
}

fn summarize(store: &Store) -> Result<DashboardSummary> {
    let conn = store.connect()?;
    Ok(dashboard_summary(&conn)?)
}

fn api_result<T: Serialize>(result: Result<T>) -> Response {
    match result {
        Ok(data) => Json(ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        })
        .into_response(),
        Err(e) => {
            let status = match &e {
                InventoryError::NotFound(_) | InventoryError::InvalidId(_) => StatusCode::NOT_FOUND,
                InventoryError::Validation(_) => StatusCode::BAD_REQUEST,
                InventoryError::InvalidForm { status, .. } => *status,
                InventoryError::Database(_) | InventoryError::Io(_) => {
                    log::error!("API error: {}", e);
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            let body: ApiResponse<()> = ApiResponse {
                success: false,
                data: None,
                error: Some(e.to_string()),
            };
            (status, Json(body)).into_response()
        }
    }
}

async fn fallback_handler() -> (StatusCode, Html<String>) {
    (
        StatusCode::NOT_FOUND,
        Html(views::not_found_page("There is no page at this address.")),
    )
}

/// Build the web server router
pub fn create_router(store: Store) -> Router {
    let state = AppState {
        store: Arc::new(store),
    };

    Router::new()
        .route("/", get(home_handler))
        .route("/add", get(add_form_handler).post(add_handler))
        .route("/view", get(view_handler).post(search_handler))
        .route("/edit/{id}", get(edit_form_handler).post(edit_handler))
        .route("/delete/{id}", get(delete_handler))
        .route("/api/items", get(api_items_handler))
        .route("/api/items/{id}", get(api_item_handler))
        .route("/api/summary", get(api_summary_handler))
        .fallback(fallback_handler)
        .with_state(state)
}

/// Start the web server and run until Ctrl+C
pub async fn serve(store: Store, addr: SocketAddr) -> Result<()> {
    let app = create_router(store);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Web UI listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}
