use std::{error, fmt};

use model::{
    hazard::HazardEvent,
    location::Location,
    route::EvacuationRoute,
    scene::{
        ElementKey, Icon, LegendEntry, LegendSymbol, Marker, Omission,
        OmissionReason, Polyline, Popup, Scene, TileLayer,
    },
    shelter::Shelter,
    WithId,
};
use serde::Serialize;
use utility::geo::MAX_ZOOM;

use crate::settings::Settings;

pub const TITLE: &str = "Safety Maps & Evacuation Routes";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum ViewError {
    ZoomOutOfRange(u8),
    InvalidCenter(Location),
    InvalidRadius(f64),
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZoomOutOfRange(zoom) => {
                write!(f, "zoom {} is outside 0..={}", zoom, MAX_ZOOM)
            }
            Self::InvalidCenter(center) => write!(
                f,
                "center ({}, {}) is not a valid coordinate",
                center.latitude, center.longitude
            ),
            Self::InvalidRadius(radius) => {
                write!(f, "radius {} km is not a finite, non-negative distance", radius)
            }
        }
    }
}

impl error::Error for ViewError {}

/// Viewport and styling of the map. Rendering is a pure function of the view
/// and the fixtures passed to [`MapView::render`].
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    center: Location,
    zoom: u8,
    tile_layer: TileLayer,
    hazard_icon: Icon,
    shelter_icon: Icon,
    route_color: String,
}

impl MapView {
    pub fn new(center: Location, zoom: u8) -> Result<Self, ViewError> {
        Self::from_settings(&Settings {
            center,
            zoom,
            ..Settings::default()
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ViewError> {
        check_viewport(settings.center, settings.zoom)?;
        Ok(Self {
            center: settings.center,
            zoom: settings.zoom,
            tile_layer: TileLayer {
                url_template: settings.tile_url_template.clone(),
                subdomains: settings.tile_subdomains.clone(),
                attribution: settings.tile_attribution.clone(),
                max_zoom: MAX_ZOOM,
            },
            hazard_icon: Icon {
                url: settings.hazard_icon.clone(),
                size: settings.icon_size,
            },
            shelter_icon: Icon {
                url: settings.shelter_icon.clone(),
                size: settings.icon_size,
            },
            route_color: settings.route_color.clone(),
        })
    }

    /// The same view moved to another position.
    pub fn recentered(&self, center: Location, zoom: u8) -> Result<Self, ViewError> {
        check_viewport(center, zoom)?;
        Ok(Self {
            center,
            zoom,
            ..self.clone()
        })
    }

    pub fn center(&self) -> Location {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn tile_layer(&self) -> &TileLayer {
        &self.tile_layer
    }

    pub fn render(
        &self,
        hazards: &[WithId<HazardEvent>],
        shelters: &[WithId<Shelter>],
        routes: &[WithId<EvacuationRoute>],
    ) -> Scene {
        let mut markers = Vec::with_capacity(hazards.len() + shelters.len());
        let mut polylines = Vec::with_capacity(routes.len());
        let mut omitted = vec![];

        for hazard in hazards {
            let key = ElementKey::Hazard(hazard.id);
            if hazard.content.location.is_valid() {
                markers.push(self.hazard_marker(key, &hazard.content));
            } else {
                omitted.push(omit(key, OmissionReason::InvalidLocation));
            }
        }

        for shelter in shelters {
            let key = ElementKey::Shelter(shelter.id);
            if shelter.content.location.is_valid() {
                markers.push(Marker {
                    key,
                    position: shelter.content.location,
                    icon: self.shelter_icon.clone(),
                    popup: Popup::new(shelter.content.name.as_str()),
                });
            } else {
                omitted.push(omit(key, OmissionReason::InvalidLocation));
            }
        }

        for route in routes {
            let key = ElementKey::Route(route.id);
            match route.content.check_path() {
                Ok(()) => polylines.push(Polyline {
                    key,
                    positions: route.content.path.clone(),
                    color: self.route_color.clone(),
                    length_km: route.content.length_km(),
                }),
                Err(why) => omitted.push(omit(key, why.into())),
            }
        }

        log::debug!(
            "rendered {} markers and {} polylines at zoom {}",
            markers.len(),
            polylines.len(),
            self.zoom
        );

        Scene {
            title: TITLE.to_owned(),
            center: self.center,
            zoom: self.zoom,
            tile_layer: self.tile_layer.clone(),
            markers,
            polylines,
            legend: self.legend(),
            omitted,
        }
    }

    fn hazard_marker(&self, key: ElementKey, hazard: &HazardEvent) -> Marker {
        Marker {
            key,
            position: hazard.location,
            icon: self.hazard_icon.clone(),
            popup: Popup::new(hazard.category.as_str())
                .detail(format!("Severity: {}", hazard.severity)),
        }
    }

    fn legend(&self) -> Vec<LegendEntry> {
        vec![
            LegendEntry {
                label: "Disaster Area".to_owned(),
                symbol: LegendSymbol::Pin,
                color: "red".to_owned(),
            },
            LegendEntry {
                label: "Shelter".to_owned(),
                symbol: LegendSymbol::Home,
                color: "green".to_owned(),
            },
            LegendEntry {
                label: "Evacuation Route".to_owned(),
                symbol: LegendSymbol::Line,
                color: self.route_color.clone(),
            },
        ]
    }
}

fn check_viewport(center: Location, zoom: u8) -> Result<(), ViewError> {
    if zoom > MAX_ZOOM {
        return Err(ViewError::ZoomOutOfRange(zoom));
    }
    if !center.is_valid() {
        return Err(ViewError::InvalidCenter(center));
    }
    Ok(())
}

fn omit(key: ElementKey, reason: OmissionReason) -> Omission {
    log::warn!("{} is not drawn: {:?}", key, reason);
    Omission { key, reason }
}

#[cfg(test)]
mod tests {
    use model::hazard::{HazardCategory, Severity};
    use utility::id::Id;

    use super::*;

    fn hazard(
        id: i32,
        category: &str,
        latitude: f64,
        longitude: f64,
        severity: &str,
    ) -> WithId<HazardEvent> {
        WithId::new(
            Id::new(id),
            HazardEvent {
                category: HazardCategory::from(category),
                location: Location::new(latitude, longitude),
                severity: Severity::from(severity),
            },
        )
    }

    fn shelter(id: i32, name: &str, latitude: f64, longitude: f64) -> WithId<Shelter> {
        WithId::new(
            Id::new(id),
            Shelter {
                name: name.to_owned(),
                location: Location::new(latitude, longitude),
            },
        )
    }

    fn route(id: i32, points: &[(f64, f64)]) -> WithId<EvacuationRoute> {
        WithId::new(
            Id::new(id),
            EvacuationRoute {
                path: points
                    .iter()
                    .map(|(latitude, longitude)| Location::new(*latitude, *longitude))
                    .collect(),
            },
        )
    }

    fn view() -> MapView {
        MapView::new(Location::new(34.052235, -118.243683), 13).unwrap()
    }

    #[test]
    fn one_marker_per_hazard_with_category_and_severity() {
        let hazards = vec![
            hazard(1, "Flood", 34.052235, -118.243683, "High"),
            hazard(2, "Wildfire", 34.069444, -118.445278, "Medium"),
        ];
        let scene = view().render(&hazards, &[], &[]);

        for hazard in hazards.iter() {
            let matching = scene
                .markers
                .iter()
                .filter(|marker| marker.key == ElementKey::Hazard(hazard.id))
                .collect::<Vec<_>>();
            assert_eq!(matching.len(), 1);
            let marker = matching[0];
            assert_eq!(marker.position, hazard.content.location);
            assert_eq!(marker.icon.url, "/disaster-icon.png");
            let text = marker.popup.text();
            assert!(text.contains(hazard.content.category.as_str()), "{text}");
            assert!(text.contains(hazard.content.severity.as_str()), "{text}");
        }
    }

    #[test]
    fn one_marker_per_shelter_with_name() {
        let shelters = vec![
            shelter(1, "City Hall Shelter", 34.054208, -118.242766),
            shelter(2, "Community Center", 34.052030, -118.243700),
        ];
        let scene = view().render(&[], &shelters, &[]);

        assert_eq!(scene.markers.len(), 2);
        for shelter in shelters.iter() {
            let marker = scene.marker(ElementKey::Shelter(shelter.id)).unwrap();
            assert_eq!(marker.position, shelter.content.location);
            assert_eq!(marker.popup.text(), shelter.content.name);
            assert_eq!(marker.icon.size, [25, 25]);
        }
    }

    #[test]
    fn routes_become_lines_in_travel_order() {
        let routes = vec![route(1, &[(34.0, -118.0), (34.1, -118.1), (34.2, -118.0)])];
        let scene = view().render(&[], &[], &routes);

        assert_eq!(scene.polylines.len(), 1);
        let line = scene.polyline(ElementKey::Route(Id::new(1))).unwrap();
        assert_eq!(line.positions, routes[0].content.path);
        assert_eq!(line.color, "blue");
        assert!(line.length_km > 0.0);
    }

    #[test]
    fn degenerate_routes_are_omitted() {
        let routes = vec![
            route(1, &[(34.0, -118.0)]),
            route(2, &[]),
            route(3, &[(34.0, -118.0), (34.1, -118.1)]),
        ];
        let scene = view().render(&[], &[], &routes);

        assert_eq!(scene.polylines.len(), 1);
        assert_eq!(scene.polylines[0].key, ElementKey::Route(Id::new(3)));
        assert_eq!(
            scene.omitted,
            vec![
                Omission {
                    key: ElementKey::Route(Id::new(1)),
                    reason: OmissionReason::DegeneratePath { points: 1 },
                },
                Omission {
                    key: ElementKey::Route(Id::new(2)),
                    reason: OmissionReason::DegeneratePath { points: 0 },
                },
            ]
        );
    }

    #[test]
    fn invalid_coordinates_are_omitted() {
        let hazards = vec![hazard(1, "Flood", f64::NAN, -118.0, "High")];
        let shelters = vec![shelter(1, "Nowhere", 95.0, 0.0)];
        let routes = vec![route(1, &[(34.0, -118.0), (34.0, 181.0)])];
        let scene = view().render(&hazards, &shelters, &routes);

        assert!(scene.markers.is_empty());
        assert!(scene.polylines.is_empty());
        assert_eq!(scene.omitted.len(), 3);
        assert_eq!(
            scene.omitted[2].reason,
            OmissionReason::InvalidPathPoint { index: 1 }
        );
    }

    #[test]
    fn rendering_is_repeatable() {
        let hazards = vec![hazard(1, "Flood", 34.05, -118.24, "High")];
        let shelters = vec![shelter(4, "Library", 34.06, -118.25)];
        let routes = vec![route(9, &[(34.05, -118.24), (34.06, -118.25)])];
        let view = view();

        let first = view.render(&hazards, &shelters, &routes);
        let second = view.render(&hazards, &shelters, &routes);
        assert_eq!(first.element_keys(), second.element_keys());
        assert_eq!(first, second);
        assert_eq!(first.element_keys().len(), 3);
    }

    #[test]
    fn scene_carries_tile_layer_and_legend() {
        let scene = view().render(&[], &[], &[]);
        assert_eq!(scene.title, TITLE);
        assert_eq!(scene.center, Location::new(34.052235, -118.243683));
        assert_eq!(scene.zoom, 13);
        assert!(scene.tile_layer.attribution.contains("OpenStreetMap"));
        let labels = scene
            .legend
            .iter()
            .map(|entry| entry.label.as_str())
            .collect::<Vec<_>>();
        assert_eq!(labels, ["Disaster Area", "Shelter", "Evacuation Route"]);
    }

    #[test]
    fn rejects_invalid_viewports() {
        let center = Location::new(34.0, -118.0);
        assert_eq!(MapView::new(center, 20), Err(ViewError::ZoomOutOfRange(20)));
        let nowhere = Location::new(120.0, 0.0);
        assert_eq!(
            view().recentered(nowhere, 10),
            Err(ViewError::InvalidCenter(nowhere))
        );
        let moved = view().recentered(center, 5).unwrap();
        assert_eq!(moved.center(), center);
        assert_eq!(moved.zoom(), 5);
        assert_eq!(moved.tile_layer(), view().tile_layer());
    }

    #[test]
    fn scene_centers_on_los_angeles_tile() {
        assert_eq!(
            view().render(&[], &[], &[]).center_tile_url(),
            "https://c.tile.openstreetmap.org/13/1405/3271.png"
        );
    }

    #[test]
    fn view_errors_serialize_with_kind() {
        assert_eq!(
            serde_json::to_value(ViewError::ZoomOutOfRange(42)).unwrap(),
            serde_json::json!({"kind": "zoomOutOfRange", "value": 42})
        );
        assert_eq!(
            serde_json::to_value(ViewError::InvalidCenter(Location::new(200.0, 0.0))).unwrap(),
            serde_json::json!({
                "kind": "invalidCenter",
                "value": {"latitude": 200.0, "longitude": 0.0}
            })
        );
    }
}
