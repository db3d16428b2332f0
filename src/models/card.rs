// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Smart card catalog model.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::ImageFile;

/// A card product as listed in the storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub card_id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    /// Product image URL
    #[serde(default)]
    pub url: Option<String>,
}

/// Admin form for creating or updating a card.
#[derive(Debug, Clone)]
pub struct CardForm {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image: Option<ImageFile>,
}
