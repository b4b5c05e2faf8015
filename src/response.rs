//! Standard response envelope helpers.

use crate::model::PageInfo;
use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct SuccessOne<T> {
    pub success: bool,
    pub data: T,
}

#[derive(Serialize)]
pub struct SuccessPage<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: PageInfo,
}

#[derive(Serialize)]
pub struct Accepted {
    pub success: bool,
    pub message: String,
}

pub fn success_one<T: Serialize>(data: T) -> (StatusCode, Json<SuccessOne<T>>) {
    (StatusCode::OK, Json(SuccessOne { success: true, data }))
}

pub fn success_page<T: Serialize>(data: Vec<T>, pagination: PageInfo) -> (StatusCode, Json<SuccessPage<T>>) {
    (
        StatusCode::OK,
        Json(SuccessPage {
            success: true,
            data,
            pagination,
        }),
    )
}

pub fn accepted(message: impl Into<String>) -> (StatusCode, Json<Accepted>) {
    (
        StatusCode::ACCEPTED,
        Json(Accepted {
            success: true,
            message: message.into(),
        }),
    )
}
