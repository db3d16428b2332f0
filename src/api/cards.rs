// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Card catalog: public browsing plus admin management.

use crate::error::{ClientError, Result};
use crate::models::{Card, CardForm, Page};
use crate::services::{AuthRequest, FormPayload};

use super::SmartCardApi;

/// Storefront page size.
pub const CARDS_PER_PAGE: u32 = 4;

impl SmartCardApi {
    /// One storefront page. `page` is 1-based.
    pub async fn list_cards(&self, page: u32) -> Result<Page<Card>> {
        let path = format!(
            "/cards?page={}&size={}",
            page.saturating_sub(1),
            CARDS_PER_PAGE
        );
        self.public(AuthRequest::get(path)).await
    }

    /// Search cards by name. A blank keyword lists everything.
    pub async fn search_cards(&self, keyword: &str, page: u32) -> Result<Page<Card>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return self.list_cards(page).await;
        }

        let path = format!(
            "/cards/name/{}?page={}&size={}",
            urlencoding::encode(keyword),
            page.saturating_sub(1),
            CARDS_PER_PAGE
        );
        self.public(AuthRequest::get(path)).await
    }

    /// A single card, or `None` if the backend does not know it.
    pub async fn get_card(&self, card_id: u64) -> Result<Option<Card>> {
        match self
            .public(AuthRequest::get(format!("/cards/id/{}", card_id)))
            .await
        {
            Ok(card) => Ok(Some(card)),
            Err(ClientError::Api { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn create_card(&self, form: &CardForm) -> Result<Card> {
        self.authed(AuthRequest::post("/cards").form(card_form(form))).await
    }

    pub async fn update_card(&self, card_id: u64, form: &CardForm) -> Result<Card> {
        self.authed(AuthRequest::put(format!("/cards/{}", card_id)).form(card_form(form)))
            .await
    }

    pub async fn delete_card(&self, card_id: u64) -> Result<()> {
        self.authed_unit(AuthRequest::delete(format!("/cards/{}", card_id))).await
    }
}

fn card_form(form: &CardForm) -> FormPayload {
    let payload = FormPayload::new()
        .text("name", form.name.clone())
        .text("description", form.description.clone())
        .text("price", form.price.to_string());

    match &form.image {
        Some(image) => payload.file(
            "imageUrl",
            image.file_name.clone(),
            image.mime_type.clone(),
            image.bytes.clone(),
        ),
        None => payload,
    }
}
