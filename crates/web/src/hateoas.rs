//! Responses that carry absolute links to related map resources, so a front
//! end can walk from a hazard to its scene or to the shelters around it.

use std::{collections::BTreeMap, sync::Arc};

use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::middleware::base_url::BaseUrl;

#[derive(Debug, Clone, Serialize)]
pub struct Link {
    pub rel: &'static str,
    pub href: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response<T> {
    #[serde(flatten)]
    pub content: T,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub debug_info: BTreeMap<&'static str, Value>,
    pub links: Vec<Link>,
}

impl<T> Response<T> {
    pub fn builder(content: T, base_url: Arc<BaseUrl>) -> ResponseBuilder<T> {
        ResponseBuilder {
            response: Self {
                content,
                debug_info: BTreeMap::new(),
                links: vec![],
            },
            base_url,
        }
    }

    pub fn json(self) -> Json<Self> {
        Json(self)
    }
}

pub struct ResponseBuilder<T> {
    response: Response<T>,
    base_url: Arc<BaseUrl>,
}

impl<T> ResponseBuilder<T> {
    /// Link to a path of this server.
    pub fn link(self, rel: &'static str, path: String) -> Self {
        let href = self.base_url.full_url(path);
        self.link_absolute(rel, href)
    }

    /// Link to a path of this server, left out when there is none.
    pub fn link_option(self, rel: &'static str, path: Option<String>) -> Self {
        match path {
            Some(path) => self.link(rel, path),
            None => self,
        }
    }

    /// Link outside this server, e.g. to a map tile.
    pub fn link_absolute(mut self, rel: &'static str, href: String) -> Self {
        self.response.links.push(Link { rel, href });
        self
    }

    /// Values that fail to serialize are left out.
    pub fn debug_info<V: Serialize>(mut self, key: &'static str, value: V) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.response.debug_info.insert(key, value);
            }
            Err(why) => log::warn!("dropping debug info {}: {}", key, why),
        }
        self
    }

    pub fn build(self) -> Response<T> {
        self.response
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderMap;

    use super::*;

    #[test]
    fn links_are_absolute_and_debug_info_optional() {
        let base_url = Arc::new(BaseUrl::from_headers(&HeaderMap::new()));
        let response = Response::builder(serde_json::json!({"name": "Shelter"}), base_url)
            .link("self", "/api/v1/shelters/1".to_owned())
            .link_option("scene", None)
            .link_absolute("tile", "https://a.tile.openstreetmap.org/0/0/0.png".to_owned())
            .build();
        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["name"], "Shelter");
        assert!(body.get("debugInfo").is_none());
        assert_eq!(
            body["links"],
            serde_json::json!([
                {"rel": "self", "href": "http://localhost/api/v1/shelters/1"},
                {"rel": "tile", "href": "https://a.tile.openstreetmap.org/0/0/0.png"}
            ])
        );
    }
}
