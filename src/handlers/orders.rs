use std::str::FromStr;

use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::order::{OrderDraft, OrderLineInput, OrderSummary, OrderView};
use crate::domain::payment::PaymentConfirmation;
use crate::errors::AppError;
use crate::AppOrderService;

pub const ORDER_PLACED_MESSAGE: &str = "Order placed successfully";

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderItemRequest {
    /// Product id.
    pub id: i32,
    pub quantity: i32,
    /// Unit price from the cart, stored as sent.
    pub price: f64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    /// Absent for guest checkout.
    pub user_id: Option<i32>,
    pub total: Option<f64>,
    pub items: Option<Vec<OrderItemRequest>>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
}

impl PlaceOrderRequest {
    /// Splits the body into the cart snapshot and the payment assertion that
    /// accompanies it. The payment fields are taken on trust: the client calls
    /// this endpoint only after the payment step reported success.
    fn into_parts(self) -> Result<(OrderDraft, PaymentConfirmation), AppError> {
        let total = self.total.map(to_decimal).transpose()?;
        let items = self
            .items
            .unwrap_or_default()
            .into_iter()
            .map(|item| -> Result<OrderLineInput, AppError> {
                Ok(OrderLineInput {
                    product_id: item.id,
                    quantity: item.quantity,
                    unit_price: to_decimal(item.price)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let draft = OrderDraft {
            user_id: self.user_id,
            total,
            items,
            address: self.address,
            phone: self.phone,
        };
        let payment = PaymentConfirmation::new(self.payment_method, self.transaction_id);
        Ok((draft, payment))
    }
}

/// Converts through the shortest decimal text of the float, so `99.99`
/// becomes exactly `99.99` rather than its binary expansion.
fn to_decimal(value: f64) -> Result<BigDecimal, AppError> {
    BigDecimal::from_str(&value.to_string())
        .map_err(|e| AppError::BadRequest(format!("Invalid amount '{}': {}", value, e)))
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderResponse {
    pub order_id: i32,
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLineResponse {
    pub id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub price: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: i32,
    pub user_id: Option<i32>,
    pub total: String,
    pub status: String,
    pub address: String,
    pub phone: String,
    pub payment_method: String,
    pub transaction_id: String,
    pub created_at: String,
    pub items: Vec<OrderLineResponse>,
}

impl From<OrderView> for OrderResponse {
    fn from(o: OrderView) -> Self {
        Self {
            id: o.id,
            user_id: o.user_id,
            total: o.total.to_string(),
            status: o.status.to_string(),
            address: o.address,
            phone: o.phone,
            payment_method: o.payment_method,
            transaction_id: o.transaction_id,
            created_at: o.created_at.to_rfc3339(),
            items: o
                .lines
                .into_iter()
                .map(|l| OrderLineResponse {
                    id: l.id,
                    product_id: l.product_id,
                    quantity: l.quantity,
                    price: l.unit_price.to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderSummaryResponse {
    pub id: i32,
    pub user_id: Option<i32>,
    pub total: String,
    pub status: String,
    pub address: String,
    pub phone: String,
    pub payment_method: String,
    pub transaction_id: String,
    pub created_at: String,
    /// e.g. `"Earbuds x2, Shirt x1"`
    pub items_summary: Option<String>,
}

impl From<OrderSummary> for OrderSummaryResponse {
    fn from(o: OrderSummary) -> Self {
        Self {
            id: o.id,
            user_id: o.user_id,
            total: o.total.to_string(),
            status: o.status.to_string(),
            address: o.address,
            phone: o.phone,
            payment_method: o.payment_method,
            transaction_id: o.transaction_id,
            created_at: o.created_at.to_rfc3339(),
            items_summary: o.items_summary,
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /api/orders
///
/// Places an order for a cart whose payment the caller has already confirmed.
/// The order row and every item row are written in one database transaction:
/// either all of them are committed or none are.
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = PlaceOrderResponse),
        (status = 400, description = "Total or items missing"),
        (status = 500, description = "Order could not be written"),
    ),
    tag = "orders"
)]
pub async fn place_order(
    service: web::Data<AppOrderService>,
    body: web::Json<PlaceOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let (draft, payment) = body.into_inner().into_parts()?;

    let placed = web::block(move || service.place_order(draft, payment))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(PlaceOrderResponse {
        order_id: placed.id,
        status: placed.status.to_string(),
        message: ORDER_PLACED_MESSAGE.to_string(),
    }))
}

/// GET /api/orders/{id}
///
/// Returns the order together with its items in insertion order.
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = i32, Path, description = "Order id"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    service: web::Data<AppOrderService>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let result = web::block(move || service.get_order(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    match result {
        Some(order) => Ok(HttpResponse::Ok().json(OrderResponse::from(order))),
        None => Err(AppError::NotFound),
    }
}

/// GET /api/orders/user/{user_id}
///
/// Order history of one user, newest first.
#[utoipa::path(
    get,
    path = "/api/orders/user/{user_id}",
    params(
        ("user_id" = i32, Path, description = "User id"),
    ),
    responses(
        (status = 200, description = "Orders of the user", body = [OrderSummaryResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn order_history(
    service: web::Data<AppOrderService>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();

    let orders = web::block(move || service.order_history(user_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<OrderSummaryResponse> = orders.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: serde_json::Value) -> PlaceOrderRequest {
        serde_json::from_value(json).expect("request should deserialize")
    }

    #[test]
    fn camel_case_body_maps_onto_draft_and_payment() {
        let (draft, payment) = request(serde_json::json!({
            "userId": 3,
            "total": 1000,
            "items": [{ "id": 1, "quantity": 2, "price": 400 }],
            "address": "MG Road",
            "paymentMethod": "UPI",
            "transactionId": "UPI1700000000"
        }))
        .into_parts()
        .expect("valid body");

        assert_eq!(draft.user_id, Some(3));
        assert_eq!(draft.total, Some(BigDecimal::from(1000)));
        assert_eq!(draft.items.len(), 1);
        assert_eq!(draft.items[0].product_id, 1);
        assert_eq!(draft.items[0].unit_price, BigDecimal::from(400));
        assert_eq!(draft.address.as_deref(), Some("MG Road"));
        assert_eq!(draft.phone, None);
        assert_eq!(payment.method(), "UPI");
        assert_eq!(payment.transaction_id(), "UPI1700000000");
    }

    #[test]
    fn fractional_prices_keep_their_decimal_text() {
        let (draft, _) = request(serde_json::json!({
            "total": 199.98,
            "items": [{ "id": 1, "quantity": 2, "price": 99.99 }]
        }))
        .into_parts()
        .expect("valid body");

        assert_eq!(draft.total, Some(BigDecimal::from_str("199.98").unwrap()));
        assert_eq!(draft.items[0].unit_price, BigDecimal::from_str("99.99").unwrap());
    }

    #[test]
    fn absent_items_become_an_empty_cart() {
        let (draft, payment) = request(serde_json::json!({ "total": 500 }))
            .into_parts()
            .expect("valid body");

        assert!(draft.items.is_empty());
        assert_eq!(draft.user_id, None);
        assert_eq!(payment.method(), "");
    }
}
