// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use crate::error::Result;
use crate::models::ContactMessage;
use crate::services::{AuthRequest, FormPayload};

use super::SmartCardApi;

impl SmartCardApi {
    /// Message to a portfolio owner from their public contact section.
    pub async fn send_portfolio_contact(&self, message: &ContactMessage) -> Result<()> {
        self.send_mail("/mail/connect", message).await
    }

    /// Message to the storefront from its contact page.
    pub async fn send_customer_contact(&self, message: &ContactMessage) -> Result<()> {
        self.send_mail("/mail/customer", message).await
    }

    async fn send_mail(&self, path: &str, message: &ContactMessage) -> Result<()> {
        self.public_unit(AuthRequest::post(path).form(contact_form(message)))
            .await
    }
}

fn contact_form(message: &ContactMessage) -> FormPayload {
    FormPayload::new()
        .text("name", message.name.clone())
        .text("from", message.from.clone())
        .text("title", message.title.clone())
        .text("content", message.content.clone())
}
