pub mod application;
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

use application::orders::OrderLifecycle;
use application::recommend::RecommendEngine;
use infrastructure::catalog::{DieselAddressBook, DieselProductCatalog};
use infrastructure::order_store::DieselOrderStore;

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

/// Services shared by every handler, wired to the Postgres adapters.
/// Constructed once; handlers receive it through `web::Data`.
pub struct AppContext {
    pub orders: OrderLifecycle<DieselOrderStore, DieselProductCatalog, DieselAddressBook>,
    pub recommender: RecommendEngine<DieselOrderStore, DieselProductCatalog>,
}

impl AppContext {
    pub fn new(pool: DbPool) -> Self {
        AppContext {
            orders: OrderLifecycle::new(
                DieselOrderStore::new(pool.clone()),
                DieselProductCatalog::new(pool.clone()),
                DieselAddressBook::new(pool.clone()),
            ),
            recommender: RecommendEngine::new(
                DieselOrderStore::new(pool.clone()),
                DieselProductCatalog::new(pool),
            ),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::orders::create_order,
        handlers::orders::get_order,
        handlers::orders::list_orders,
        handlers::orders::pay_order,
        handlers::orders::ship_order,
        handlers::orders::confirm_order,
        handlers::orders::cancel_order,
        handlers::recommendations::recommend_products,
    ),
    components(schemas(
        handlers::orders::CreateOrderRequest,
        handlers::orders::PayOrderRequest,
        handlers::orders::ShipOrderRequest,
        handlers::orders::OrderResponse,
        handlers::orders::OrderLineResponse,
        handlers::orders::AddressResponse,
        handlers::orders::ListOrdersResponse,
        handlers::recommendations::RecommendResponse,
    )),
    tags(
        (name = "orders", description = "Order lifecycle"),
        (name = "recommendations", description = "Product recommendations"),
    )
)]
pub struct ApiDoc;

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let ctx = web::Data::new(AppContext::new(pool));
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(ctx.clone())
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
            .service(
                web::scope("/orders")
                    .route("", web::post().to(handlers::orders::create_order))
                    .route("", web::get().to(handlers::orders::list_orders))
                    .route("/{id}", web::get().to(handlers::orders::get_order))
                    .route("/{id}/pay", web::post().to(handlers::orders::pay_order))
                    .route("/{id}/ship", web::post().to(handlers::orders::ship_order))
                    .route(
                        "/{id}/confirm",
                        web::post().to(handlers::orders::confirm_order),
                    )
                    .route(
                        "/{id}/cancel",
                        web::post().to(handlers::orders::cancel_order),
                    ),
            )
            .route(
                "/products/{id}/recommendations",
                web::get().to(handlers::recommendations::recommend_products),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
