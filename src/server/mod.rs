mod handlers;

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

use crate::api::{DynAPI, API};
use crate::config::ServerConfig;
use crate::error::{config_error, unexpected_error, Error};
use crate::server::handlers::itineraries;

pub fn router(api: DynAPI, allowed_origins: &[String]) -> Result<Router, Error> {
    let origins = allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| config_error("BARHOP_ALLOWED_ORIGINS"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Ok(Router::new()
        .route("/", get(root))
        .route("/generate-route", get(itineraries::generate))
        .layer(Extension(api))
        .layer(cors))
}

pub async fn serve<T: API + Sync + Send + 'static>(api: T, config: &ServerConfig) -> Result<(), Error> {
    let api = Arc::new(api) as DynAPI;
    let app = router(api, &config.allowed_origins)?;

    let server = axum::Server::try_bind(&config.bind_addr).map_err(|err| {
        tracing::error!("cannot bind {}: {}", config.bind_addr, err);
        unexpected_error()
    })?;

    tracing::info!("listening on {}", config.bind_addr);

    server
        .serve(app.into_make_service())
        .await
        .map_err(|err| {
            tracing::error!("server error: {}", err);
            unexpected_error()
        })
}

async fn root() -> &'static str {
    "barhop is up"
}

#[tokio::test]
async fn root_answers() {
    use crate::entities::Coordinates;
    use crate::test_support::{engine, spawn, StubFinder, StubResolver};

    let api = Arc::new(engine(
        StubResolver::at(Coordinates::new(0.0, 0.0)),
        StubFinder::default(),
    )) as DynAPI;
    let addr = spawn(router(api, &[]).unwrap());

    let body = reqwest::get(format!("http://{}/", addr))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "barhop is up");
}

#[tokio::test]
async fn cors_allows_configured_origin() {
    use crate::entities::Coordinates;
    use crate::test_support::{engine, spawn, StubFinder, StubResolver};

    let api = Arc::new(engine(
        StubResolver::at(Coordinates::new(0.0, 0.0)),
        StubFinder::default(),
    )) as DynAPI;
    let addr = spawn(router(api, &["https://conchoe.github.io".to_string()]).unwrap());

    let res = reqwest::Client::new()
        .get(format!("http://{}/", addr))
        .header("Origin", "https://conchoe.github.io")
        .send()
        .await
        .unwrap();

    assert_eq!(
        res.headers()
            .get("access-control-allow-origin")
            .map(|value| value.to_str().unwrap().to_string()),
        Some("https://conchoe.github.io".to_string())
    );
}

#[test]
fn invalid_origin_is_config_error() {
    use crate::entities::Coordinates;
    use crate::error::ErrorKind;
    use crate::test_support::{engine, StubFinder, StubResolver};

    let api = Arc::new(engine(
        StubResolver::at(Coordinates::new(0.0, 0.0)),
        StubFinder::default(),
    )) as DynAPI;

    let err = router(api, &["bad\norigin".to_string()]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
}
