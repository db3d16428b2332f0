// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Order and payment models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{Card, User};
use crate::time_utils::format_utc_rfc3339;

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    /// Paid by scanning the order's QR code
    BankTransfer,
}

/// Payment state as tracked by the back-office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Cancelled,
}

/// Order fulfilment state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

impl From<PaymentStatus> for OrderStatus {
    /// A paid order is complete; otherwise the order follows its payment.
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Paid => OrderStatus::Completed,
            PaymentStatus::Pending => OrderStatus::Pending,
            PaymentStatus::Cancelled => OrderStatus::Cancelled,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub pay_date: String,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub order_type: String,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub address: String,
    pub orders_date: String,
    pub payment_request: PaymentRequest,
    pub card_id: u64,
}

impl OrderRequest {
    /// Purchase of a new physical card, placed now.
    pub fn new_card(card: &Card, address: impl Into<String>, method: PaymentMethod) -> Self {
        Self::new_card_at(card, address, method, Utc::now())
    }

    /// Cash orders are recorded as paid; bank transfers start pending.
    pub fn new_card_at(
        card: &Card,
        address: impl Into<String>,
        method: PaymentMethod,
        at: DateTime<Utc>,
    ) -> Self {
        let placed = format_utc_rfc3339(at);
        Self {
            order_type: "NEW_CARD".to_string(),
            total_amount: card.price,
            status: OrderStatus::Pending,
            address: address.into(),
            orders_date: placed.clone(),
            payment_request: PaymentRequest {
                method,
                status: match method {
                    PaymentMethod::Cash => PaymentStatus::Paid,
                    PaymentMethod::BankTransfer => PaymentStatus::Pending,
                },
                pay_date: placed,
            },
            card_id: card.card_id,
        }
    }
}

/// Body of `PUT /orders/{id}/update-status`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusUpdate {
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
}

impl From<PaymentStatus> for OrderStatusUpdate {
    fn from(payment_status: PaymentStatus) -> Self {
        Self {
            payment_status,
            order_status: payment_status.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(default)]
    pub pay_id: Option<u64>,
    #[serde(default)]
    pub method: Option<PaymentMethod>,
    #[serde(default)]
    pub status: Option<PaymentStatus>,
    #[serde(default)]
    pub pay_date: Option<String>,
}

/// Order as returned by `/orders`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: u64,
    #[serde(default, alias = "ordersType")]
    pub order_type: Option<String>,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub orders_date: Option<String>,
    #[serde(default)]
    pub payment_response: Option<Payment>,
    #[serde(default, alias = "userResponse")]
    pub users_response: Option<User>,
    #[serde(default)]
    pub card_response: Option<Card>,
}
