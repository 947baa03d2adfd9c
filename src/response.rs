//! Response envelopes.
//!
//! Successful responses carry `"success": true` next to their payload;
//! failures rendered by [`crate::ApiError`] carry `"success": false`.

use serde::{Deserialize, Serialize};

use crate::pagination::PaginationMeta;

/// `{ "success": true, "data": T }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// `{ "success": true, "meta": {...}, "data": [T] }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub meta: PaginationMeta,
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(meta: PaginationMeta, data: Vec<T>) -> Self {
        Self {
            success: true,
            meta,
            data,
        }
    }
}

/// `{ "success": bool, "message": "..." }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
