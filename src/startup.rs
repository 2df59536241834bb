use crate::{
    config::{DatabaseSettings, StoreBackend},
    routes,
    store::{LocationStore, MemoryStore, MongoStore, StoreError},
};
use axum::{
    routing::{get, put, IntoMakeService},
    Router, Server,
};
use hyper::server::conn::AddrIncoming;
use std::{net::TcpListener, sync::Arc};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::MakeRequestUuid,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
    ServiceBuilderExt,
};

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LocationStore>,
}

/// Creates the store selected by `settings.backend`.
pub async fn build_store(
    settings: &DatabaseSettings,
) -> Result<Arc<dyn LocationStore>, StoreError> {
    let store: Arc<dyn LocationStore> = match settings.backend {
        StoreBackend::Mongo => Arc::new(MongoStore::connect(settings).await?),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory location store; records are lost on restart");
            Arc::new(MemoryStore::new())
        }
    };
    Ok(store)
}

pub fn app(store: Arc<dyn LocationStore>) -> Router {
    // Configure service to have request IDs show up correctly in logs produced by
    // `tower_http::trace::Trace`. Modified from: https://docs.rs/tower-http/latest/tower_http/request_id/index.html#using-trace
    let trace_layer = ServiceBuilder::new()
        .set_x_request_id(MakeRequestUuid)
        // Log requests and responses.
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
        // Propagate the header to the response before the response reaches `TraceLayer`.
        .propagate_x_request_id();

    Router::new()
        .route("/health_check", get(routes::health_check))
        .route("/updateDriverLoc", put(routes::update_driver_loc))
        .route("/getDriverLoc", get(routes::get_driver_loc))
        .route("/updateDriverStatus", put(routes::update_driver_status))
        .layer(CorsLayer::permissive())
        .layer(trace_layer)
        .with_state(AppState { store })
}

pub fn run(
    listener: TcpListener,
    store: Arc<dyn LocationStore>,
) -> hyper::Result<Server<AddrIncoming, IntoMakeService<Router>>> {
    // Run it with hyper on the given TcpListener.
    Ok(axum::Server::from_tcp(listener)?.serve(app(store).into_make_service()))
}
