pub mod bootstrap;
pub mod customers;
pub mod error;
pub mod exchange;
pub mod health;
pub mod representatives;
pub mod shutdown;

use std::sync::Arc;

use axum::Router;
use ronja_db::repositories::{
    CustomerRepository, RepresentativeRepository, SqlCustomerRepository,
    SqlRepresentativeRepository,
};
use ronja_db::{CustomerService, DbPool, RepresentativeService};
use ronja_exchange::MetalExchangeClient;
use tower_http::trace::TraceLayer;

/// Shared handles the HTTP layer hands out to each route group.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: DbPool,
    pub customers: Arc<CustomerService>,
    pub representatives: Arc<RepresentativeService>,
    pub exchange: Option<Arc<MetalExchangeClient>>,
}

impl AppState {
    pub fn with_sql_store(db_pool: DbPool, exchange: Option<MetalExchangeClient>) -> Self {
        let customer_store: Arc<CustomerRepository> =
            Arc::new(SqlCustomerRepository::new(db_pool.clone()));
        let representative_store: Arc<RepresentativeRepository> =
            Arc::new(SqlRepresentativeRepository::new(db_pool.clone()));

        Self {
            db_pool,
            customers: Arc::new(CustomerService::for_customers(customer_store.clone())),
            representatives: Arc::new(RepresentativeService::for_representatives(
                representative_store,
                customer_store,
            )),
            exchange: exchange.map(Arc::new),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(health::router(health::HealthState::new(
            state.db_pool.clone(),
            state.exchange.is_some(),
        )))
        .merge(customers::router(state.customers.clone()))
        .merge(representatives::router(state.representatives.clone()))
        .merge(exchange::router(state.exchange.clone()))
        .layer(TraceLayer::new_for_http())
}
