use std::sync::Arc;

use axum::{
    extract::{OriginalUri, State},
    http::Method,
    routing::{get, on},
    Extension, Router,
};
use model::{hazard::HazardEvent, WithId};
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
        crate::api::v1::resource!("/hazards{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

/// Radius in km used when linking from a hazard to the shelters around it.
const SHELTER_SEARCH_RADIUS_KM: f64 = 5.0;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<HazardEvent>))
        .route("/:id", get(get_hazard))
        .route("/", get(get_hazards))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn get_hazards(
    original_uri: OriginalUri,
    State(WebState { map_client, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<Listing<hateoas::Response<WithId<HazardEvent>>>> {
    map_client
        .hazards()
        .await
        .map(|hazards| {
            hazards
                .into_iter()
                .map(|hazard| hazard_hateoas(hazard, base_url.clone()))
                .collect::<Vec<_>>()
                .let_owned(|data| {
                    hateoas::Response::builder(Listing::from(data), base_url)
                        .link("self", resource!(""))
                        .link("scene", super::resource!("/scene"))
                        .build()
                        .json()
                })
        })
        .map_err(|why| RouteErrorResponse::request(why, &Method::GET, &original_uri))
}

async fn get_hazard(
    original_uri: OriginalUri,
    MapPath(id): MapPath<i32>,
    State(WebState { map_client, .. }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<WithId<HazardEvent>> {
    map_client
        .hazard(Id::new(id))
        .await
        .map(|hazard| hazard_hateoas(hazard, base_url).json())
        .map_err(|why| RouteErrorResponse::request(why, &Method::GET, &original_uri))
}

fn hazard_hateoas(
    hazard: WithId<HazardEvent>,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<WithId<HazardEvent>> {
    let id = hazard.id;
    let location = hazard.content.location;
    let known = hazard.content.category.is_known() && hazard.content.severity.is_known();
    let response = hateoas::Response::builder(hazard, base_url)
        .link("self", resource!("/{}", id))
        .link("scene", super::scene_at(&location))
        .link(
            "nearbyShelters",
            super::shelters::resource!(
                "/nearby?latitude={}&longitude={}&radius={}",
                location.latitude,
                location.longitude,
                SHELTER_SEARCH_RADIUS_KM
            ),
        );
    if known {
        response.build()
    } else {
        response.debug_info("unrecognisedClassification", true).build()
    }
}
