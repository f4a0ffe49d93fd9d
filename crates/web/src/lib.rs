pub use crate::common::RouteResult;

use std::{
    env,
    net::SocketAddr,
    path::{Path, PathBuf},
};

use axum::{extract::FromRef, Router};
use safety_map::{
    client::Client, fixtures::InMemoryFixtures, settings::SettingsError, shell::ShellRef,
};
use tokio::net::TcpListener;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

pub mod api;
pub mod common;
pub mod extract;
pub mod hateoas;
pub mod middleware;

pub type MapClient = Client<InMemoryFixtures>;

#[derive(Clone, FromRef)]
pub struct WebState {
    pub map_client: MapClient,
    pub search_shell: ShellRef,
}

/// Where the server listens and which directory it serves static files from.
#[derive(Debug, Clone, PartialEq)]
pub struct WebConfig {
    pub bind_address: SocketAddr,
    pub static_dir: PathBuf,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 8080)),
            static_dir: PathBuf::from("./resources/www/"),
        }
    }
}

impl WebConfig {
    pub fn from_env() -> Result<Self, SettingsError> {
        let defaults = Self::default();
        let bind_address = match env::var("SAFETY_MAPS_BIND_ADDRESS") {
            Ok(value) => value.parse().map_err(|_| SettingsError::Invalid {
                variable: "SAFETY_MAPS_BIND_ADDRESS",
                value,
            })?,
            Err(_) => defaults.bind_address,
        };
        let static_dir = env::var("SAFETY_MAPS_STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);
        Ok(Self {
            bind_address,
            static_dir,
        })
    }
}

pub fn app(state: WebState, static_dir: &Path) -> Router {
    let static_content = ServeDir::new(static_dir)
        .not_found_service(ServeFile::new(static_dir.join("error404.html")));
    Router::new()
        .nest_service("/api", api::routes(state))
        .fallback_service(static_content)
        .layer(TraceLayer::new_for_http())
}

pub async fn start_web_server(state: WebState, config: &WebConfig) -> std::io::Result<()> {
    let routes = app(state, &config.static_dir);

    let listener = TcpListener::bind(config.bind_address).await?;
    log::info!("listening on {}", config.bind_address);
    axum::serve(listener, routes.into_make_service()).await?;

    Ok(())
}
