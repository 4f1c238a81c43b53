//! API routes module
//!
//! Wires the product and user domains onto whichever store the process was
//! configured with.

pub mod health;

use axum::Router;
use axum_helpers::TokenIssuer;
use core_config::server::ServerConfig;
use database::{DocumentCollection, MemoryCollection};
use domain_products::{Product, ProductService};
use domain_users::{User, UserService};
use tracing::info;

use crate::state::{AppState, Storage};

/// Create all API routes, running index setup on the way
pub async fn routes(state: &AppState) -> eyre::Result<Router> {
    let config = &state.config;
    let issuer = TokenIssuer::new(&config.jwt);

    let domains = match &state.storage {
        Storage::MongoDb { db, .. } => {
            domain_routes(
                db.collection::<Product>(&config.collections.products),
                db.collection::<User>(&config.collections.users),
                issuer,
                &config.server,
            )
            .await?
        }
        Storage::Memory => {
            info!("Using in-memory storage; data is lost on exit");
            domain_routes(
                MemoryCollection::<Product>::new(&config.collections.products),
                MemoryCollection::<User>::new(&config.collections.users),
                issuer,
                &config.server,
            )
            .await?
        }
    };

    Ok(domains.merge(health::router(state)))
}

async fn domain_routes<P, U>(
    products: P,
    users: U,
    issuer: TokenIssuer,
    server: &ServerConfig,
) -> eyre::Result<Router>
where
    P: DocumentCollection<Product> + 'static,
    U: DocumentCollection<User> + 'static,
{
    let products = ProductService::new(products).with_timeout(server.store_timeout);
    let users = UserService::new(users, issuer.clone()).with_timeout(server.store_timeout);
    users.init_indexes().await?;

    Ok(Router::new()
        .merge(domain_products::handlers::router(
            products,
            issuer,
            server.body_limit,
        ))
        .merge(domain_users::handlers::router(users)))
}
