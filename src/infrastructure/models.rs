use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{Int4, Nullable, Numeric, Text, Timestamptz, Varchar};

use crate::schema::{order_items, orders};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: i32,
    pub user_id: Option<i32>,
    pub total: BigDecimal,
    pub status: String,
    pub address: String,
    pub phone: String,
    pub payment_method: String,
    pub transaction_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub user_id: Option<i32>,
    pub total: BigDecimal,
    pub status: String,
    pub address: String,
    pub phone: String,
    pub payment_method: String,
    pub transaction_id: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub price: BigDecimal,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow {
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub price: BigDecimal,
}

/// Row shape of the order-history query, which aggregates line items into a
/// single text column and so cannot be expressed through the table DSL.
#[derive(Debug, QueryableByName)]
pub struct OrderSummaryRow {
    #[diesel(sql_type = Int4)]
    pub id: i32,
    #[diesel(sql_type = Nullable<Int4>)]
    pub user_id: Option<i32>,
    #[diesel(sql_type = Numeric)]
    pub total: BigDecimal,
    #[diesel(sql_type = Varchar)]
    pub status: String,
    #[diesel(sql_type = Text)]
    pub address: String,
    #[diesel(sql_type = Text)]
    pub phone: String,
    #[diesel(sql_type = Text)]
    pub payment_method: String,
    #[diesel(sql_type = Text)]
    pub transaction_id: String,
    #[diesel(sql_type = Timestamptz)]
    pub created_at: DateTime<Utc>,
    #[diesel(sql_type = Nullable<Text>)]
    pub items_summary: Option<String>,
}
