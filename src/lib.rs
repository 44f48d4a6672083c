pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::order_service::OrderService;
use errors::AppError;
use infrastructure::order_repo::DieselOrderRepository;

pub use config::{AppConfig, DatabaseConfig};
pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type AppOrderService = OrderService<DieselOrderRepository>;

type MigrationError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::orders::place_order,
        handlers::orders::get_order,
        handlers::orders::order_history,
    ),
    components(schemas(
        handlers::health::HealthResponse,
        handlers::orders::PlaceOrderRequest,
        handlers::orders::OrderItemRequest,
        handlers::orders::PlaceOrderResponse,
        handlers::orders::OrderResponse,
        handlers::orders::OrderLineResponse,
        handlers::orders::OrderSummaryResponse,
    )),
    tags((name = "orders", description = "Order placement and history"))
)]
pub struct ApiDoc;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), MigrationError> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    if !applied.is_empty() {
        log::info!("Applied {} migration(s)", applied.len());
    }
    Ok(())
}

/// Registers every API route. Shared by the server and the tests.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::health::health))
        .service(
            web::scope("/api/orders")
                .route("", web::post().to(handlers::orders::place_order))
                .route(
                    "/user/{user_id}",
                    web::get().to(handlers::orders::order_history),
                )
                .route("/{id}", web::get().to(handlers::orders::get_order)),
        );
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The pool is the only handle to the database: it is moved into a single
/// `OrderService` shared by every worker. The caller is responsible for
/// `.await`-ing (or `tokio::spawn`-ing) the returned server.
pub fn build_server(
    pool: DbPool,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let service = web::Data::new(OrderService::new(DieselOrderRepository::new(pool.clone())));
    let pool = web::Data::new(pool);
    let openapi = ApiDoc::openapi();

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(pool.clone())
            .app_data(service.clone())
            .app_data(json_config())
            .wrap(Logger::default())
            .configure(routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
