use std::sync::Arc;

use axum::{
    extract::{OriginalUri, State},
    http::Method,
    routing::{get, on},
    Extension, Router,
};
use model::{route::EvacuationRoute, WithId};
use utility::{id::Id, let_also::LetAlso};

use crate::{
    common::{
        route_not_found, schema, HateoasResult, Listing, RouteErrorResponse,
        METHOD_FILTER_ALL,
    },
    extract::MapPath,
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/routes{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<EvacuationRoute>))
        .route("/:id", get(get_route))
        .route("/", get(get_routes))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn get_routes(
    original_uri: OriginalUri,
    State(WebState { map_client, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<Listing<hateoas::Response<WithId<EvacuationRoute>>>> {
    map_client
        .routes()
        .await
        .map(|routes| {
            routes
                .into_iter()
                .map(|route| route_hateoas(route, base_url.clone()))
                .collect::<Vec<_>>()
                .let_owned(|data| {
                    hateoas::Response::builder(Listing::from(data), base_url)
                        .link("self", resource!(""))
                        .build()
                        .json()
                })
        })
        .map_err(|why| RouteErrorResponse::request(why, &Method::GET, &original_uri))
}

async fn get_route(
    original_uri: OriginalUri,
    MapPath(id): MapPath<i32>,
    State(WebState { map_client, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<WithId<EvacuationRoute>> {
    map_client
        .route(Id::new(id))
        .await
        .map(|route| route_hateoas(route, base_url).json())
        .map_err(|why| RouteErrorResponse::request(why, &Method::GET, &original_uri))
}

/// Routes link to the scene around their starting point. Routes that cannot
/// be drawn say why in the debug info.
fn route_hateoas(
    route: WithId<EvacuationRoute>,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<WithId<EvacuationRoute>> {
    let id = route.id;
    let start = route.content.path.first().map(super::scene_at);
    let length_km = route.content.length_km();
    let drawable = route.content.check_path();
    let response = hateoas::Response::builder(route, base_url)
        .link("self", resource!("/{}", id))
        .link_option("scene", start)
        .debug_info("lengthKm", length_km);
    match drawable {
        Ok(()) => response.debug_info("drawable", true).build(),
        Err(why) => response
            .debug_info("drawable", false)
            .debug_info("notDrawnBecause", why.to_string())
            .build(),
    }
}
