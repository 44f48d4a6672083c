use diesel::prelude::*;
use diesel::sql_types::Int4;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{NewOrder, OrderLineView, OrderSummary, OrderView};
use crate::domain::ports::OrderRepository;
use crate::schema::{order_items, orders};

use super::models::{NewOrderItemRow, NewOrderRow, OrderItemRow, OrderRow, OrderSummaryRow};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Persistence(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Persistence(e.to_string())
    }
}

const ORDER_HISTORY_SQL: &str = "\
    SELECT o.id, o.user_id, o.total, o.status, o.address, o.phone, \
           o.payment_method, o.transaction_id, o.created_at, \
           STRING_AGG(p.name || ' x' || oi.quantity, ', ' ORDER BY oi.id) AS items_summary \
    FROM orders o \
    LEFT JOIN order_items oi ON o.id = oi.order_id \
    LEFT JOIN products p ON oi.product_id = p.id \
    WHERE o.user_id = $1 \
    GROUP BY o.id \
    ORDER BY o.created_at DESC, o.id DESC";

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderRepository for DieselOrderRepository {
    fn create(&self, order: &NewOrder) -> Result<i32, DomainError> {
        // Returned to the pool when dropped, on every exit path.
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Insert the order
            let order_id: i32 = diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    user_id: order.user_id,
                    total: order.total.clone(),
                    status: order.status().to_string(),
                    address: order.address.clone(),
                    phone: order.phone.clone(),
                    payment_method: order.payment.method().to_string(),
                    transaction_id: order.payment.transaction_id().to_string(),
                })
                .returning(orders::id)
                .get_result(conn)?;

            // 2. Insert the items one by one, in caller order; the first
            //    failure aborts the transaction.
            for line in &order.lines {
                diesel::insert_into(order_items::table)
                    .values(&NewOrderItemRow {
                        order_id,
                        product_id: line.product_id,
                        quantity: line.quantity,
                        price: line.unit_price.clone(),
                    })
                    .execute(conn)?;
            }

            Ok(order_id)
        })
        .inspect_err(|e| log::error!("Order transaction rolled back: {}", e))
    }

    fn find_by_id(&self, id: i32) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .filter(orders::id.eq(id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let lines = OrderItemRow::belonging_to(&order)
            .select(OrderItemRow::as_select())
            .order(order_items::id.asc())
            .load(&mut conn)?;

        Ok(Some(OrderView {
            id: order.id,
            user_id: order.user_id,
            total: order.total,
            status: order.status.parse()?,
            address: order.address,
            phone: order.phone,
            payment_method: order.payment_method,
            transaction_id: order.transaction_id,
            created_at: order.created_at,
            lines: lines
                .into_iter()
                .map(|l| OrderLineView {
                    id: l.id,
                    product_id: l.product_id,
                    quantity: l.quantity,
                    unit_price: l.price,
                })
                .collect(),
        }))
    }

    fn history_for_user(&self, user_id: i32) -> Result<Vec<OrderSummary>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows: Vec<OrderSummaryRow> = diesel::sql_query(ORDER_HISTORY_SQL)
            .bind::<Int4, _>(user_id)
            .load(&mut conn)?;

        rows.into_iter()
            .map(|r| -> Result<OrderSummary, DomainError> {
                Ok(OrderSummary {
                    id: r.id,
                    user_id: r.user_id,
                    total: r.total,
                    status: r.status.parse()?,
                    address: r.address,
                    phone: r.phone,
                    payment_method: r.payment_method,
                    transaction_id: r.transaction_id,
                    created_at: r.created_at,
                    items_summary: r.items_summary,
                })
            })
            .collect()
    }
}
