//! Extractors that answer malformed input with a JSON [`RouteErrorResponse`]
//! instead of axum's plain text rejections.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, OriginalUri, Path, Query, Request},
    http::{request::Parts, Extensions, Uri},
    Json,
};
use serde::de::DeserializeOwned;

use crate::common::RouteErrorResponse;

/// Query string parameters, e.g. the viewport of a scene.
pub struct MapQuery<T>(pub T);

/// Path parameters, e.g. the id of a hazard.
pub struct MapPath<T>(pub T);

/// JSON request body.
pub struct MapJson<T>(pub T);

/// Path as the client sent it, before nested routers stripped their prefix.
fn requested_path(extensions: &Extensions, uri: &Uri) -> String {
    extensions
        .get::<OriginalUri>()
        .map(|original| original.0.path())
        .unwrap_or(uri.path())
        .to_owned()
}

#[async_trait]
impl<T, S> FromRequestParts<S> for MapQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = RouteErrorResponse;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(why) => Err(RouteErrorResponse::new(
                why.status(),
                &parts.method,
                requested_path(&parts.extensions, &parts.uri),
                why.body_text(),
            )),
        }
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for MapPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = RouteErrorResponse;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(why) => Err(RouteErrorResponse::new(
                why.status(),
                &parts.method,
                requested_path(&parts.extensions, &parts.uri),
                why.body_text(),
            )),
        }
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for MapJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = RouteErrorResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let method = req.method().clone();
        let path = requested_path(req.extensions(), req.uri());
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(why) => Err(RouteErrorResponse::new(why.status(), &method, path, why.body_text())),
        }
    }
}
