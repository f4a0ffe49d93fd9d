use std::sync::Arc;

use axum::{
    extract::{OriginalUri, State},
    http::Method,
    routing::{get, on},
    Extension, Router,
};
use model::{location::Location, shelter::Shelter, WithDistance, WithId};
use serde::Deserialize;
use utility::{id::Id, let_also::LetAlso};

use crate::{
    common::{
        route_not_found, schema, HateoasResult, Listing, RouteErrorResponse,
        METHOD_FILTER_ALL,
    },
    extract::{MapPath, MapQuery},
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/shelters{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

const DEFAULT_RADIUS_KM: f64 = 1.0;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<Shelter>))
        .route("/nearby", get(nearby))
        .route("/:id", get(get_shelter))
        .route("/", get(get_shelters))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn get_shelters(
    original_uri: OriginalUri,
    State(WebState { map_client, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<Listing<hateoas::Response<WithId<Shelter>>>> {
    map_client
        .shelters()
        .await
        .map(|shelters| {
            shelters
                .into_iter()
                .map(|shelter| shelter_hateoas(shelter, base_url.clone()))
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

async fn get_shelter(
    original_uri: OriginalUri,
    MapPath(id): MapPath<i32>,
    State(WebState { map_client, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<WithId<Shelter>> {
    map_client
        .shelter(Id::new(id))
        .await
        .map(|shelter| shelter_hateoas(shelter, base_url).json())
        .map_err(|why| RouteErrorResponse::request(why, &Method::GET, &original_uri))
}

#[derive(Deserialize)]
struct NearbyQuery {
    latitude: f64,
    longitude: f64,
    radius: Option<f64>,
}

/// Shelters around a point, nearest first. The center and radius are checked
/// by the client, which answers 400 for anything off the globe.
async fn nearby(
    original_uri: OriginalUri,
    State(WebState { map_client, .. }): State<WebState>,
    MapQuery(params): MapQuery<NearbyQuery>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<Listing<hateoas::Response<WithDistance<WithId<Shelter>>>>> {
    let center = Location::new(params.latitude, params.longitude);
    let radius_km = params.radius.unwrap_or(DEFAULT_RADIUS_KM);
    map_client
        .shelters_near(center, radius_km)
        .await
        .map(|shelters| {
            shelters
                .into_iter()
                .map(|shelter| {
                    let id = shelter.content.id;
                    hateoas::Response::builder(shelter, base_url.clone())
                        .link("self", resource!("/{}", id))
                        .build()
                })
                .collect::<Vec<_>>()
                .let_owned(|data| {
                    hateoas::Response::builder(Listing::from(data), base_url)
                        .link("scene", super::scene_at(&center))
                        .debug_info("radiusKm", radius_km)
                        .build()
                        .json()
                })
        })
        .map_err(|why| RouteErrorResponse::request(why, &Method::GET, &original_uri))
}

fn shelter_hateoas(
    shelter: WithId<Shelter>,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<WithId<Shelter>> {
    let id = shelter.id;
    let location = shelter.content.location;
    hateoas::Response::builder(shelter, base_url)
        .link("self", resource!("/{}", id))
        .link("scene", super::scene_at(&location))
        .build()
}
