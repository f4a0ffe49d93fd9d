use safety_map::{
    client::Client, fixtures::InMemoryFixtures, search::SearchShell, settings::Settings,
    shell, view::MapView,
};
use tracing_subscriber::EnvFilter;
use web::{start_web_server, WebConfig, WebState};

#[tokio::main]
async fn main() {
    env_logger::init();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    if let Err(why) = tracing::subscriber::set_global_default(subscriber) {
        log::warn!("request tracing disabled: {}", why);
    }

    // settings
    let settings = Settings::from_env().expect("invalid map settings in env.");
    let config = WebConfig::from_env().expect("invalid web settings in env.");

    // fixtures
    let fixtures = match &settings.fixtures_path {
        Some(path) => {
            log::info!("loading fixtures from {}", path.display());
            InMemoryFixtures::from_json_file(path).expect("could not load fixtures.")
        }
        None => InMemoryFixtures::los_angeles(),
    };

    // map
    let view = MapView::from_settings(&settings).expect("invalid map view settings.");
    let map_client = Client::new(fixtures, view);
    let search_shell = shell::spawn(SearchShell::new);

    // web server
    let web_future = start_web_server(
        WebState {
            map_client,
            search_shell,
        },
        &config,
    );

    if let Err(why) = web_future.await {
        log::error!("web server stopped: {}", why);
    }
}
