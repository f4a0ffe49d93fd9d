use model::{
    hazard::HazardEvent, location::Location, route::EvacuationRoute,
    scene::Scene, shelter::Shelter, WithDistance, WithId,
};
use utility::id::Id;

use crate::{
    provider::FixtureProvider,
    view::{MapView, ViewError},
    RequestResult,
};

/// Entry point for everything that reads the map: the fixtures of a provider
/// combined with the default view.
#[derive(Debug, Clone)]
pub struct Client<P>
where
    P: FixtureProvider,
{
    provider: P,
    view: MapView,
}

impl<P> Client<P>
where
    P: FixtureProvider,
{
    pub fn new(provider: P, view: MapView) -> Self {
        Self { provider, view }
    }

    pub fn view(&self) -> &MapView {
        &self.view
    }

    pub async fn hazards(&self) -> RequestResult<Vec<WithId<HazardEvent>>> {
        Ok(self.provider.list_hazards().await?)
    }

    pub async fn hazard(&self, id: Id<HazardEvent>) -> RequestResult<WithId<HazardEvent>> {
        Ok(self.provider.hazard(id).await?)
    }

    pub async fn shelters(&self) -> RequestResult<Vec<WithId<Shelter>>> {
        Ok(self.provider.list_shelters().await?)
    }

    pub async fn shelter(&self, id: Id<Shelter>) -> RequestResult<WithId<Shelter>> {
        Ok(self.provider.shelter(id).await?)
    }

    pub async fn routes(&self) -> RequestResult<Vec<WithId<EvacuationRoute>>> {
        Ok(self.provider.list_routes().await?)
    }

    pub async fn route(
        &self,
        id: Id<EvacuationRoute>,
    ) -> RequestResult<WithId<EvacuationRoute>> {
        Ok(self.provider.route(id).await?)
    }

    /// Renders the scene of the default view.
    pub async fn scene(&self) -> RequestResult<Scene> {
        self.render(&self.view).await
    }

    /// Renders the scene with the default view moved to `center` and `zoom`,
    /// falling back to the default for what is not given.
    pub async fn scene_at(
        &self,
        center: Option<Location>,
        zoom: Option<u8>,
    ) -> RequestResult<Scene> {
        let view = self.view.recentered(
            center.unwrap_or(self.view.center()),
            zoom.unwrap_or(self.view.zoom()),
        )?;
        self.render(&view).await
    }

    /// Shelters within `radius_km` of `location`, nearest first. Distances are
    /// great-circle distances, so the search wraps around the antimeridian.
    pub async fn shelters_near(
        &self,
        location: Location,
        radius_km: f64,
    ) -> RequestResult<Vec<WithDistance<WithId<Shelter>>>> {
        if !location.is_valid() {
            return Err(ViewError::InvalidCenter(location).into());
        }
        if !radius_km.is_finite() || radius_km < 0.0 {
            return Err(ViewError::InvalidRadius(radius_km).into());
        }
        let mut nearby = self
            .shelters()
            .await?
            .into_iter()
            .map(|shelter| {
                WithDistance::new(location.distance_km(&shelter.content.location), shelter)
            })
            .filter(|shelter| shelter.distance_km <= radius_km)
            .collect::<Vec<_>>();
        nearby.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        Ok(nearby)
    }

    async fn render(&self, view: &MapView) -> RequestResult<Scene> {
        let hazards = self.hazards().await?;
        let shelters = self.shelters().await?;
        let routes = self.routes().await?;
        Ok(view.render(&hazards, &shelters, &routes))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use async_trait::async_trait;

    use super::*;
    use crate::{
        fixtures::InMemoryFixtures,
        provider::{self, ProviderError},
        search::SearchShell,
        shell, RequestError,
    };

    fn client() -> Client<InMemoryFixtures> {
        Client::new(
            InMemoryFixtures::los_angeles(),
            MapView::new(Location::new(34.052235, -118.243683), 13).unwrap(),
        )
    }

    /// Wraps the built-in fixtures and counts how often they are listed.
    #[derive(Clone)]
    struct CountingProvider {
        inner: InMemoryFixtures,
        listings: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl FixtureProvider for CountingProvider {
        async fn list_hazards(&self) -> provider::Result<Vec<WithId<HazardEvent>>> {
            self.listings.fetch_add(1, Ordering::SeqCst);
            self.inner.list_hazards().await
        }

        async fn list_shelters(&self) -> provider::Result<Vec<WithId<Shelter>>> {
            self.listings.fetch_add(1, Ordering::SeqCst);
            self.inner.list_shelters().await
        }

        async fn list_routes(&self) -> provider::Result<Vec<WithId<EvacuationRoute>>> {
            self.listings.fetch_add(1, Ordering::SeqCst);
            self.inner.list_routes().await
        }
    }

    #[tokio::test]
    async fn scene_of_built_in_data() {
        let scene = client().scene().await.unwrap();
        assert_eq!(scene.markers.len(), 4);
        assert_eq!(scene.polylines.len(), 2);
        assert!(scene.omitted.is_empty());
        let flood = scene
            .markers
            .iter()
            .find(|marker| marker.popup.title == "Flood")
            .unwrap();
        assert_eq!(flood.popup.details, vec!["Severity: High".to_owned()]);
    }

    #[tokio::test]
    async fn rendering_twice_gives_the_same_elements() {
        let client = client();
        let first = client.scene().await.unwrap();
        let second = client.scene().await.unwrap();
        assert_eq!(first.element_keys(), second.element_keys());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn scene_at_overrides_viewport() {
        let client = client();
        let scene = client
            .scene_at(Some(Location::new(34.069444, -118.445278)), None)
            .await
            .unwrap();
        assert_eq!(scene.center, Location::new(34.069444, -118.445278));
        assert_eq!(scene.zoom, 13);
        assert_eq!(client.view().center(), Location::new(34.052235, -118.243683));

        assert!(matches!(
            client.scene_at(None, Some(42)).await,
            Err(RequestError::InvalidView(_))
        ));
    }

    #[tokio::test]
    async fn lookups_by_id() {
        let client = client();
        assert_eq!(
            client.shelter(Id::new(2)).await.unwrap().content.name,
            "Community Center"
        );
        assert_eq!(client.route(Id::new(1)).await.unwrap().content.path.len(), 2);
        assert!(matches!(
            client.hazard(Id::new(3)).await,
            Err(RequestError::NotFound)
        ));
    }

    #[tokio::test]
    async fn nearby_shelters_sorted_by_distance() {
        let client = client();
        let nearby = client
            .shelters_near(Location::new(34.052235, -118.243683), 1.0)
            .await
            .unwrap();
        let names = nearby
            .iter()
            .map(|shelter| shelter.content.content.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["Community Center", "City Hall Shelter"]);
        assert!(nearby[0].distance_km < 0.03);

        let none = client
            .shelters_near(Location::new(34.069444, -118.445278), 0.5)
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn nearby_shelters_wrap_around_the_antimeridian() {
        let fixtures = InMemoryFixtures::from_json_str(
            r#"{
                "shelters": [
                    {"id": 1, "name": "Taveuni East", "location": {"lat": 0.0, "lng": -179.99}},
                    {"id": 2, "name": "Taveuni West", "location": {"lat": 0.0, "lng": 179.98}},
                    {"id": 3, "name": "Greenwich", "location": {"lat": 0.0, "lng": 0.0}}
                ]
            }"#,
        )
        .unwrap();
        let client = Client::new(
            fixtures,
            MapView::new(Location::new(0.0, 179.99), 10).unwrap(),
        );
        let nearby = client
            .shelters_near(Location::new(0.0, 179.99), 5.0)
            .await
            .unwrap();
        let names = nearby
            .iter()
            .map(|shelter| shelter.content.content.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["Taveuni West", "Taveuni East"]);
        assert!((nearby[1].distance_km - 2.224).abs() < 0.001);
    }

    #[tokio::test]
    async fn nearby_rejects_invalid_center_and_radius() {
        let client = client();
        let nowhere = Location::new(200.0, 0.0);
        assert!(matches!(
            client.shelters_near(nowhere, 1.0).await,
            Err(RequestError::InvalidView(ViewError::InvalidCenter(_)))
        ));
        let downtown = Location::new(34.052235, -118.243683);
        for radius in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                client.shelters_near(downtown, radius).await,
                Err(RequestError::InvalidView(ViewError::InvalidRadius(_)))
            ));
        }
    }

    #[tokio::test]
    async fn search_leaves_map_untouched() {
        let listings = Arc::new(AtomicUsize::new(0));
        let client = Client::new(
            CountingProvider {
                inner: InMemoryFixtures::los_angeles(),
                listings: listings.clone(),
            },
            MapView::new(Location::new(34.052235, -118.243683), 13).unwrap(),
        );
        let before = client.scene().await.unwrap();
        let listed_before = listings.load(Ordering::SeqCst);

        let shell = shell::spawn(SearchShell::new);
        shell.set_query("City Hall").await.unwrap();
        let outcome = shell.submit().await.unwrap();
        assert_eq!(outcome.query(), "City Hall");
        assert_eq!(listings.load(Ordering::SeqCst), listed_before);

        let after = client.scene().await.unwrap();
        assert_eq!(before, after);
        assert_eq!(after.center, Location::new(34.052235, -118.243683));
        assert_eq!(client.hazards().await.unwrap().len(), 2);
        assert_eq!(client.shelters().await.unwrap().len(), 2);
        assert_eq!(client.routes().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn provider_failures_surface_as_other() {
        #[derive(Clone)]
        struct Offline;

        #[async_trait]
        impl FixtureProvider for Offline {
            async fn list_hazards(&self) -> provider::Result<Vec<WithId<HazardEvent>>> {
                Err(ProviderError::Other("feed offline".into()))
            }

            async fn list_shelters(&self) -> provider::Result<Vec<WithId<Shelter>>> {
                Ok(vec![])
            }

            async fn list_routes(&self) -> provider::Result<Vec<WithId<EvacuationRoute>>> {
                Ok(vec![])
            }
        }

        let client = Client::new(
            Offline,
            MapView::new(Location::new(34.0, -118.0), 10).unwrap(),
        );
        match client.scene().await {
            Err(RequestError::Other(why)) => assert_eq!(why.to_string(), "feed offline"),
            other => panic!("expected provider failure, got {:?}", other),
        }
        assert!(matches!(
            client.hazard(Id::new(1)).await,
            Err(RequestError::Other(_))
        ));
    }
}
