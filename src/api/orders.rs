// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Order placement, payment QR codes and back-office status updates.

use crate::error::Result;
use crate::models::{Order, OrderRequest, OrderStatusUpdate, Page, PaymentStatus};
use crate::services::AuthRequest;

use super::{check_status, SmartCardApi};

impl SmartCardApi {
    /// Place an order for the logged-in user.
    pub async fn create_order(&self, order: &OrderRequest) -> Result<Order> {
        self.authed(AuthRequest::post("/orders").json(order)?).await
    }

    /// Orders visible to the caller; admins see everyone's. `page` is 0-based.
    pub async fn list_orders(&self, page: u32, size: u32) -> Result<Page<Order>> {
        self.authed(AuthRequest::get(format!("/orders?page={}&size={}", page, size)))
            .await
    }

    /// Set an order's payment status; the order status follows from it.
    pub async fn update_order_status(&self, order_id: u64, payment: PaymentStatus) -> Result<()> {
        let request = AuthRequest::put(format!("/orders/{}/update-status", order_id))
            .json(&OrderStatusUpdate::from(payment))?;
        self.authed_unit(request).await
    }

    /// Bank-transfer QR code image for an order.
    pub async fn order_qr_image(&self, order_id: u64) -> Result<Vec<u8>> {
        let response = self
            .client
            .send(&AuthRequest::get(format!("/orders/qr/image/{}", order_id)))
            .await?;
        let response = check_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }
}
