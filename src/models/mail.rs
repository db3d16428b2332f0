// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Contact form messages relayed by the backend mailer.

/// Sent as a multipart form with `name`, `from`, `title` and `content` parts.
#[derive(Debug, Clone)]
pub struct ContactMessage {
    pub name: String,
    /// Sender's email address
    pub from: String,
    pub title: String,
    pub content: String,
}
