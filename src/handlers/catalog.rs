//! Catalog read handlers: paginated list and single-entity detail.

use crate::error::AppError;
use crate::response::{success_one, success_page};
use crate::service::CatalogQueryService;
use crate::sql::ListQuery;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use std::collections::HashMap;

/// Path id must be a positive integer.
pub fn parse_id(id_str: &str) -> Result<i32, AppError> {
    match id_str.trim().parse::<i32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(AppError::InvalidInput(format!("invalid pokemon id '{}'", id_str))),
    }
}

fn parse_int(params: &HashMap<String, String>, key: &str) -> Result<Option<i64>, AppError> {
    match params.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| AppError::InvalidInput(format!("{} must be an integer, got '{}'", key, v))),
    }
}

/// Turn query-string params into a sanitized list query. A positive `page` overrides `offset`.
pub fn list_query_from_params(params: &HashMap<String, String>) -> Result<ListQuery, AppError> {
    let limit = parse_int(params, "limit")?;
    let offset = parse_int(params, "offset")?;
    let page = parse_int(params, "page")?;
    let sort = params.get("sort").map(String::as_str);
    let order = params.get("order").map(String::as_str);
    let type_filter = params.get("type").map(String::as_str);

    let query = ListQuery::sanitize(limit, offset, sort, order, type_filter);
    Ok(match page {
        Some(page) if page > 0 => {
            let offset = (page - 1).saturating_mul(query.limit());
            ListQuery::sanitize(Some(query.limit()), Some(offset), sort, order, type_filter)
        }
        _ => query,
    })
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let query = list_query_from_params(&params)?;
    let page = CatalogQueryService::list(&state.pool, &query).await?;
    Ok(success_page(page.records, page.page_info))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let record = CatalogQueryService::detail(&state.pool, id).await?;
    Ok(success_one(record))
}
