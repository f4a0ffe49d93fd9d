use std::sync::Arc;

use axum::{
    response::IntoResponse,
    routing::{get, on},
    Extension, Json, Router,
};
use serde::Serialize;
use serde_json::json;

pub mod v1;

use crate::{
    common::{route_not_found, METHOD_FILTER_ALL},
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        format!("/api{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/ping", get(ping))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .nest_service("/v1", v1::routes(state))
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IndexDto {
    title: &'static str,
    latest_version: &'static str,
}

/// Entry point listing the resources of the latest api version.
pub(crate) async fn index(
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> Json<hateoas::Response<IndexDto>> {
    let dto = IndexDto {
        title: safety_map::view::TITLE,
        latest_version: "v1",
    };
    hateoas::Response::builder(dto, base_url)
        .link("scene", v1::resource!("/scene"))
        .link("hazards", v1::hazards::resource!(""))
        .link("shelters", v1::shelters::resource!(""))
        .link("routes", v1::evacuation_routes::resource!(""))
        .link("search", v1::search::resource!("/query"))
        .build()
        .json()
}

async fn ping() -> impl IntoResponse {
    Json(json!({
        "message": "pong!"
    }))
}
