// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

/// Image file sent as one part of a multipart form.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    /// MIME type, e.g. `image/png`
    pub mime_type: String,
    pub bytes: Vec<u8>,
}
