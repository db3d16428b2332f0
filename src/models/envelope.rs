// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Response envelope and pagination wrappers used by every backend endpoint.

use serde::Deserialize;

/// `{ "code": ..., "mess": ..., "result": ... }`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub code: Option<i32>,
    #[serde(default)]
    pub mess: Option<String>,
    pub result: T,
}

/// Error body shape; `result` is usually absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<i32>,
    #[serde(default)]
    pub mess: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.mess.or(self.message)
    }
}

/// Spring-style page of results.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub size: u32,
    /// Zero-based page index
    #[serde(default)]
    pub number: u32,
}
