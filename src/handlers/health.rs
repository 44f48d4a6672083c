use actix_web::{web, HttpResponse};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::schema::products;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub db: String,
    pub products: i64,
}

/// GET /
///
/// Liveness plus a round-trip to the database.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service and database reachable", body = HealthResponse),
        (status = 500, description = "Database unreachable"),
    ),
    tag = "health"
)]
pub async fn health(pool: web::Data<DbPool>) -> HttpResponse {
    let result = web::block(move || -> Result<i64, DomainError> {
        let mut conn = pool.get()?;
        Ok(products::table.count().get_result(&mut conn)?)
    })
    .await
    .map_err(|e| e.to_string())
    .and_then(|r| r.map_err(|e| e.to_string()));

    match result {
        Ok(products) => HttpResponse::Ok().json(HealthResponse {
            status: "Storefront API running".to_string(),
            db: "PostgreSQL".to_string(),
            products,
        }),
        Err(message) => {
            log::error!("Health check failed: {}", message);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "status": "error",
                "message": message
            }))
        }
    }
}
