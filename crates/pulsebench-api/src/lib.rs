// Pulsebench API library
// Decision: Shared library for the server binary and the integration tests

use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

pub mod auth;
pub mod benchmark;

pub use auth::BasicAuthConfig;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "basic_auth",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Basic).build()),
        );
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(benchmark::run_benchmark),
    components(schemas(
        benchmark::BenchmarkRequest,
        benchmark::BenchmarkResponse,
        benchmark::ErrorResponse,
        pulsebench_core::LatencyStatistics,
        pulsebench_core::LatencySummary,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "benchmark", description = "LLM endpoint latency benchmarks")
    ),
    info(
        title = "Pulsebench API",
        description = "Measure response latency of OpenAI-compatible LLM endpoints",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
struct ApiDoc;

/// Build the application router.
pub fn app(auth_config: BasicAuthConfig) -> Router {
    let guarded = Router::new()
        .route("/v1/benchmark", post(benchmark::run_benchmark))
        .layer(middleware::from_fn_with_state(
            auth_config,
            auth::require_basic_auth,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(guarded)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}
