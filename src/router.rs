// src/router.rs

//! Route table shared by the binary and the integration tests.

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers};

pub fn app(app_state: AppState) -> Router {
    let resource_routes = Router::new()
        .route(
            "/",
            get(handlers::resources::list_resources).post(handlers::resources::create_resource),
        )
        .route(
            "/{id}",
            get(handlers::resources::get_resource)
                .put(handlers::resources::update_resource)
                .delete(handlers::resources::delete_resource),
        );

    let project_routes = Router::new()
        .route(
            "/",
            get(handlers::projects::list_projects).post(handlers::projects::create_project),
        )
        .route(
            "/{id}",
            get(handlers::projects::get_project)
                .put(handlers::projects::update_project)
                .delete(handlers::projects::delete_project),
        )
        .route(
            "/{id}/allocations",
            get(handlers::projects::list_allocations).post(handlers::projects::add_allocation),
        )
        .route(
            "/{id}/resources/{resource_id}/utilization",
            get(handlers::projects::resource_utilization),
        );

    let allocation_routes = Router::new().route(
        "/{id}",
        put(handlers::projects::update_allocation).delete(handlers::projects::remove_allocation),
    );

    let dashboard_routes = Router::new()
        .route("/summary", get(handlers::dashboard::get_summary))
        .route("/periods", get(handlers::dashboard::get_periods));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(handlers::health::health))
        .route("/api/calendar/working-days", get(handlers::resources::working_days))
        .nest("/api/resources", resource_routes)
        .nest("/api/projects", project_routes)
        .nest("/api/allocations", allocation_routes)
        .nest("/api/dashboard", dashboard_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(app_state)
}
