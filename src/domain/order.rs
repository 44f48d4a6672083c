use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};

use super::errors::DomainError;
use super::payment::PaymentConfirmation;

pub const MISSING_TOTAL_OR_ITEMS: &str = "Total and items are required";
pub const NON_POSITIVE_QUANTITY: &str = "Item quantity must be positive";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Paid,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Paid => "Paid",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(OrderStatus::Pending),
            "Paid" => Ok(OrderStatus::Paid),
            other => Err(DomainError::Persistence(format!(
                "unknown order status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrderLineInput {
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

/// Cart snapshot as handed over by the caller, not yet validated.
#[derive(Debug, Clone, Default)]
pub struct OrderDraft {
    pub user_id: Option<i32>,
    pub total: Option<BigDecimal>,
    pub items: Vec<OrderLineInput>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

/// An order that passed validation and is ready to be written.
///
/// `total` and each line's `unit_price` are the caller's figures; nothing is
/// recomputed from the catalog.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: Option<i32>,
    pub total: BigDecimal,
    pub lines: Vec<OrderLineInput>,
    pub address: String,
    pub phone: String,
    pub payment: PaymentConfirmation,
}

impl NewOrder {
    pub fn from_draft(draft: OrderDraft, payment: PaymentConfirmation) -> Result<Self, DomainError> {
        let total = match draft.total {
            Some(total) if !total.is_zero() => total,
            _ => return Err(DomainError::InvalidInput(MISSING_TOTAL_OR_ITEMS.to_string())),
        };
        if draft.items.is_empty() {
            return Err(DomainError::InvalidInput(MISSING_TOTAL_OR_ITEMS.to_string()));
        }
        if draft.items.iter().any(|item| item.quantity <= 0) {
            return Err(DomainError::InvalidInput(NON_POSITIVE_QUANTITY.to_string()));
        }

        Ok(Self {
            user_id: draft.user_id,
            total,
            lines: draft.items,
            address: draft.address.unwrap_or_default(),
            phone: draft.phone.unwrap_or_default(),
            payment,
        })
    }

    pub fn status(&self) -> OrderStatus {
        self.payment.order_status()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedOrder {
    pub id: i32,
    pub status: OrderStatus,
}

#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: i32,
    pub user_id: Option<i32>,
    pub total: BigDecimal,
    pub status: OrderStatus,
    pub address: String,
    pub phone: String,
    pub payment_method: String,
    pub transaction_id: String,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<OrderLineView>,
}

/// One row of a user's order history.
#[derive(Debug, Clone)]
pub struct OrderSummary {
    pub id: i32,
    pub user_id: Option<i32>,
    pub total: BigDecimal,
    pub status: OrderStatus,
    pub address: String,
    pub phone: String,
    pub payment_method: String,
    pub transaction_id: String,
    pub created_at: DateTime<Utc>,
    /// `"<product> x<qty>"` pairs joined by `", "`; `None` when no line
    /// resolves to a product.
    pub items_summary: Option<String>,
}
