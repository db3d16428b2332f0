// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use crate::error::Result;
use crate::models::{AccountVerification, ImageFile, Page, Registration, User, UserUpdate};
use crate::services::{AuthRequest, FormPayload};

use super::SmartCardApi;

impl SmartCardApi {
    /// The logged-in user.
    pub async fn current_user(&self) -> Result<User> {
        self.authed(AuthRequest::get("/users/me")).await
    }

    /// Customer list for the back-office. `page` is 0-based.
    pub async fn list_users(&self, page: u32, size: u32) -> Result<Page<User>> {
        self.authed(AuthRequest::get(format!("/users?page={}&size={}", page, size)))
            .await
    }

    /// Public view of a user, as shown on their portfolio page.
    pub async fn public_user(&self, user_id: u64) -> Result<User> {
        self.public(AuthRequest::get(format!("/users/public/{}", user_id)))
            .await
    }

    pub async fn update_user(&self, user_id: u64, update: &UserUpdate) -> Result<User> {
        self.authed(AuthRequest::put(format!("/users/{}", user_id)).json(update)?)
            .await
    }

    /// Replace the logged-in user's avatar.
    pub async fn update_avatar(&self, image: &ImageFile) -> Result<()> {
        let form = FormPayload::new().file(
            "imageUrl",
            image.file_name.clone(),
            image.mime_type.clone(),
            image.bytes.clone(),
        );
        self.authed_unit(AuthRequest::post("/users/update/image").form(form))
            .await
    }

    /// Create an account. It stays inactive until [`verify_account`](Self::verify_account).
    pub async fn register(&self, registration: &Registration) -> Result<User> {
        let user: User = self
            .public(AuthRequest::post("/users").json(registration)?)
            .await?;
        tracing::info!(user_id = user.id, "Account registered, awaiting activation");
        Ok(user)
    }

    /// Activate a new account with the code mailed at registration.
    pub async fn verify_account(&self, user_id: u64, code: &str) -> Result<()> {
        let request = AuthRequest::patch(format!("/users/verify/{}", user_id))
            .json(&AccountVerification {
                account_number: code,
            })?;
        self.public_unit(request).await
    }
}
