use axum::{
    extract::OriginalUri,
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::MethodFilter,
    Json,
};
use model::ExampleData;
use safety_map::{view::ViewError, RequestError};
use schemars::{schema_for, schema_for_value, JsonSchema};
use serde::{Deserialize, Serialize};

use crate::{extract::MapQuery, hateoas};

pub type RouteResult<O> = Result<O, RouteErrorResponse>;
pub type HateoasResult<O> = RouteResult<Json<hateoas::Response<O>>>;

/// A `MethodFilter` that matches all http methods.
pub(crate) const METHOD_FILTER_ALL: MethodFilter = MethodFilter::GET
    .or(MethodFilter::POST)
    .or(MethodFilter::PATCH)
    .or(MethodFilter::PUT)
    .or(MethodFilter::DELETE);

/// A whole collection. The fixture store is small, so nothing is paged.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing<T> {
    pub data: Vec<T>,
    pub total_items: usize,
}

impl<T> From<Vec<T>> for Listing<T> {
    fn from(data: Vec<T>) -> Self {
        Self {
            total_items: data.len(),
            data,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SchemaParams {
    #[serde(default)]
    example_data: bool,
}

/// JSON schema of `T`, or of its example value with `?exampleData=true`.
pub(crate) async fn schema<T: ExampleData + JsonSchema + Serialize>(
    MapQuery(params): MapQuery<SchemaParams>,
) -> impl IntoResponse {
    if params.example_data {
        Json(schema_for_value!(T::example_data()))
    } else {
        Json(schema_for!(T))
    }
}

pub(crate) async fn route_not_found(
    OriginalUri(original_uri): OriginalUri,
    method: Method,
) -> RouteErrorResponse {
    RouteErrorResponse::new(
        StatusCode::NOT_FOUND,
        &method,
        original_uri.path(),
        "There is no map resource at this path.",
    )
}

/// Error body shared by every api route. A rejected viewport carries the
/// offending value so a front end can point at the bad parameter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteErrorResponse {
    #[serde(skip)]
    pub status_code: StatusCode,
    pub http_method: String,
    pub requested_uri: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_view: Option<ViewError>,
}

impl RouteErrorResponse {
    pub fn new(
        status_code: StatusCode,
        method: &Method,
        uri: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status_code,
            http_method: method.to_string(),
            requested_uri: uri.into(),
            message: message.into(),
            invalid_view: None,
        }
    }

    /// Maps a failed client request onto a status code.
    pub fn request(why: RequestError, method: &Method, uri: &OriginalUri) -> Self {
        let uri = uri.0.path();
        match why {
            RequestError::NotFound => Self::new(
                StatusCode::NOT_FOUND,
                method,
                uri,
                "The requested map entry does not exist.",
            ),
            RequestError::InvalidView(view) => Self {
                invalid_view: Some(view),
                ..Self::new(StatusCode::BAD_REQUEST, method, uri, view.to_string())
            },
            RequestError::ShellUnavailable => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                method,
                uri,
                "The search box is not running.",
            ),
            RequestError::Other(other) => {
                log::error!("{} {} failed: {}", method, uri, other);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, method, uri, other.to_string())
            }
        }
    }
}

impl IntoResponse for RouteErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (self.status_code, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Uri;
    use model::location::Location;

    use super::*;

    fn uri() -> OriginalUri {
        OriginalUri(Uri::from_static("/api/v1/scene?zoom=42"))
    }

    #[test]
    fn invalid_view_keeps_the_offending_value() {
        let response = RouteErrorResponse::request(
            RequestError::InvalidView(ViewError::ZoomOutOfRange(42)),
            &Method::GET,
            &uri(),
        );
        assert_eq!(response.status_code, StatusCode::BAD_REQUEST);
        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["requestedUri"], "/api/v1/scene");
        assert_eq!(body["invalidView"]["kind"], "zoomOutOfRange");
        assert_eq!(body["invalidView"]["value"], 42);
    }

    #[test]
    fn other_errors_leave_out_the_view() {
        let response =
            RouteErrorResponse::request(RequestError::NotFound, &Method::GET, &uri());
        assert_eq!(response.status_code, StatusCode::NOT_FOUND);
        let body = serde_json::to_value(&response).unwrap();
        assert!(body.get("invalidView").is_none());

        let center = Location::new(200.0, 0.0);
        let response = RouteErrorResponse::request(
            RequestError::InvalidView(ViewError::InvalidCenter(center)),
            &Method::GET,
            &uri(),
        );
        assert_eq!(response.invalid_view, Some(ViewError::InvalidCenter(center)));
    }
}
