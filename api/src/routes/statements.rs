use actix_web::{
    HttpResponse, Responder, ResponseError, get,
    http::{StatusCode, header::ContentType},
    web::{Data, Json, Query},
};
use scikgdash_postgres::statements::{
    count_statements, fetch_statements_page, page_bounds, total_pages,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;
use utoipa::{IntoParams, ToSchema};

use crate::routes::ErrorMessage;

/// Page size applied when the request does not specify one.
const DEFAULT_PAGE_SIZE: u32 = 50;

/// Largest page size a single request may ask for.
const MAX_PAGE_SIZE: u32 = 5000;

#[derive(Debug, Error)]
pub enum StatementsError {
    #[error("query parameter `size` must be between 1 and 5000, got {0}")]
    InvalidPageSize(u32),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StatementsError {
    pub fn to_message(&self) -> String {
        match self {
            // Do not expose internal database details in error messages
            StatementsError::Database(_) => "internal server error".to_string(),
            e => e.to_string(),
        }
    }
}

impl ResponseError for StatementsError {
    fn status_code(&self) -> StatusCode {
        match self {
            StatementsError::InvalidPageSize(_) => StatusCode::BAD_REQUEST,
            StatementsError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error_message = ErrorMessage {
            error: self.to_message(),
        };
        let body =
            serde_json::to_string(&error_message).expect("failed to serialize error message");
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(body)
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct StatementsQuery {
    /// Zero-based page index. Defaults to 0.
    pub page: Option<u32>,
    /// Records per page, 1 to 5000. Defaults to 50.
    pub size: Option<u32>,
    /// Case-insensitive title substring filter.
    pub title: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatementResponse {
    #[schema(example = "R12345")]
    pub id: String,
    #[schema(example = "A paper about knowledge graphs")]
    pub title: String,
    #[schema(example = 42)]
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PageResponse {
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
    pub number: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadStatementsResponse {
    pub content: Vec<StatementResponse>,
    pub page: PageResponse,
}

#[utoipa::path(
    summary = "List paper statement counts",
    description = "Returns one page of paper statement counts ordered by count descending, \
                   then id ascending, optionally filtered by a case-insensitive title substring.",
    params(StatementsQuery),
    responses(
        (status = 200, description = "Page retrieved successfully", body = ReadStatementsResponse),
        (status = 400, description = "Invalid query parameters", body = ErrorMessage),
        (status = 500, description = "Internal server error", body = ErrorMessage)
    ),
    tag = "Statements"
)]
#[get("/api/statements")]
pub async fn read_statements(
    pool: Data<PgPool>,
    query: Query<StatementsQuery>,
) -> Result<impl Responder, StatementsError> {
    let query = query.into_inner();

    let page = query.page.unwrap_or(0);
    let size = query.size.unwrap_or(DEFAULT_PAGE_SIZE);
    if !(1..=MAX_PAGE_SIZE).contains(&size) {
        return Err(StatementsError::InvalidPageSize(size));
    }

    // An empty filter matches everything, same as no filter.
    let title_filter = query.title.as_deref().filter(|title| !title.is_empty());

    let total_elements = count_statements(&pool, title_filter).await? as u64;
    let total_pages = total_pages(total_elements, u64::from(size));

    let (limit, offset) = page_bounds(page, size);
    let rows = fetch_statements_page(&pool, title_filter, limit, offset).await?;

    let content = rows
        .into_iter()
        .map(|row| StatementResponse {
            id: row.id,
            title: row.title,
            count: row.count,
        })
        .collect();

    let response = ReadStatementsResponse {
        content,
        page: PageResponse {
            size,
            total_elements,
            total_pages,
            number: page,
        },
    };

    Ok(Json(response))
}
