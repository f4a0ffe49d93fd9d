use std::sync::Arc;

use axum::{
    extract::{OriginalUri, State},
    http::Method,
    routing::{get, on, post},
    Extension, Router,
};
use safety_map::search::{SearchOutcome, PLACEHOLDER};
use serde::{Deserialize, Serialize};

use crate::{
    common::{route_not_found, schema, HateoasResult, RouteErrorResponse, METHOD_FILTER_ALL},
    extract::MapJson,
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/search{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/query", get(get_query).put(put_query))
        .route("/submit", post(submit))
        .route("/submit/schema", get(schema::<SearchOutcome>))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDto {
    pub query: String,
    pub placeholder: &'static str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SetQueryBody {
    query: String,
}

async fn get_query(
    original_uri: OriginalUri,
    State(WebState { search_shell, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<QueryDto> {
    search_shell
        .query()
        .await
        .map(|query| query_hateoas(query, base_url).json())
        .map_err(|why| RouteErrorResponse::request(why, &Method::GET, &original_uri))
}

async fn put_query(
    original_uri: OriginalUri,
    State(WebState { search_shell, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    MapJson(body): MapJson<SetQueryBody>,
) -> HateoasResult<QueryDto> {
    search_shell
        .set_query(body.query)
        .await
        .map(|query| query_hateoas(query, base_url).json())
        .map_err(|why| RouteErrorResponse::request(why, &Method::PUT, &original_uri))
}

async fn submit(
    original_uri: OriginalUri,
    State(WebState { search_shell, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<SearchOutcome> {
    search_shell
        .submit()
        .await
        .map(|outcome| {
            hateoas::Response::builder(outcome, base_url)
                .link("query", resource!("/query"))
                .link("scene", super::resource!("/scene"))
                .build()
                .json()
        })
        .map_err(|why| RouteErrorResponse::request(why, &Method::POST, &original_uri))
}

fn query_hateoas(query: String, base_url: Arc<BaseUrl>) -> hateoas::Response<QueryDto> {
    let dto = QueryDto {
        query,
        placeholder: PLACEHOLDER,
    };
    hateoas::Response::builder(dto, base_url)
        .link("self", resource!("/query"))
        .link("submit", resource!("/submit"))
        .build()
}
