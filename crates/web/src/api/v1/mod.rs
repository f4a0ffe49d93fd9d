use std::{sync::Arc, time::Instant};

use axum::{
    extract::{OriginalUri, State},
    http::Method,
    routing::{get, on},
    Extension, Router,
};
use model::{location::Location, scene::Scene};
use serde::Deserialize;

use crate::{
    common::{route_not_found, schema, HateoasResult, RouteErrorResponse, METHOD_FILTER_ALL},
    extract::MapQuery,
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

pub(crate) mod evacuation_routes;
pub(crate) mod hazards;
pub(crate) mod search;
pub(crate) mod shelters;

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::resource!("/v1{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(super::index))
        .route("/scene", get(scene))
        .route("/scene/schema", get(schema::<Scene>))
        .nest_service("/hazards", hazards::routes(state.clone()))
        .nest_service("/shelters", shelters::routes(state.clone()))
        .nest_service("/routes", evacuation_routes::routes(state.clone()))
        .nest_service("/search", search::routes(state.clone()))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Deserialize)]
pub(crate) struct SceneQuery {
    latitude: Option<f64>,
    longitude: Option<f64>,
    zoom: Option<u8>,
}

async fn scene(
    original_uri: OriginalUri,
    State(WebState { map_client, .. }): State<WebState>,
    MapQuery(params): MapQuery<SceneQuery>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<Scene> {
    let center = match (params.latitude, params.longitude) {
        (None, None) => None,
        (latitude, longitude) => {
            let default = map_client.view().center();
            Some(Location::new(
                latitude.unwrap_or(default.latitude),
                longitude.unwrap_or(default.longitude),
            ))
        }
    };

    let now = Instant::now();
    let scene = map_client
        .scene_at(center, params.zoom)
        .await
        .map_err(|why| RouteErrorResponse::request(why, &Method::GET, &original_uri))?;
    let render_elapsed = now.elapsed();

    Ok(scene_hateoas(scene, base_url, render_elapsed.as_secs_f64()).json())
}

fn scene_hateoas(
    scene: Scene,
    base_url: Arc<BaseUrl>,
    render_secs: f64,
) -> hateoas::Response<Scene> {
    let center = scene.center;
    let zoom = scene.zoom;
    let center_tile = scene.center_tile_url();
    let omitted = scene.omitted.len();
    hateoas::Response::builder(scene, base_url)
        .link(
            "self",
            resource!(
                "/scene?latitude={}&longitude={}&zoom={}",
                center.latitude,
                center.longitude,
                zoom
            ),
        )
        .link("hazards", hazards::resource!(""))
        .link("shelters", shelters::resource!(""))
        .link("routes", evacuation_routes::resource!(""))
        .link(
            "nearbyShelters",
            shelters::resource!(
                "/nearby?latitude={}&longitude={}&radius=5",
                center.latitude,
                center.longitude
            ),
        )
        .link("search", search::resource!("/query"))
        .link_absolute("centerTile", center_tile)
        .debug_info("renderSecs", render_secs)
        .debug_info("omittedElements", omitted)
        .build()
}

/// Link to the scene centered on `location` at the default zoom.
pub(crate) fn scene_at(location: &Location) -> String {
    resource!(
        "/scene?latitude={}&longitude={}",
        location.latitude,
        location.longitude
    )
}
