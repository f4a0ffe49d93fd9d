//! Description of everything a map front end has to draw. A scene is plain
//! data, the front end decides how markers, popups and lines look on screen.

use std::{collections::BTreeSet, fmt};

use schemars::JsonSchema;
use serde::Serialize;
use utility::{geo, id::Id};

use crate::{
    hazard::HazardEvent, location::Location, route::EvacuationRoute,
    route::PathError, shelter::Shelter, ExampleData,
};

/// Identifies the entity an element of the scene was derived from, so a
/// front end can reconcile elements across renders.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, JsonSchema,
)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum ElementKey {
    Hazard(Id<HazardEvent>),
    Shelter(Id<Shelter>),
    Route(Id<EvacuationRoute>),
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hazard(id) => write!(f, "hazard {}", id),
            Self::Shelter(id) => write!(f, "shelter {}", id),
            Self::Route(id) => write!(f, "route {}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TileLayer {
    pub url_template: String,
    pub subdomains: Vec<String>,
    pub attribution: String,
    pub max_zoom: u8,
}

impl TileLayer {
    /// Expands the url template for one tile. Subdomains rotate with the tile
    /// position so neighbouring tiles are fetched from different servers.
    pub fn tile_url(&self, x: u32, y: u32, zoom: u8) -> String {
        let subdomain = if self.subdomains.is_empty() {
            ""
        } else {
            let index = (u64::from(x) + u64::from(y)) % self.subdomains.len() as u64;
            self.subdomains[index as usize].as_str()
        };
        self.url_template
            .replace("{s}", subdomain)
            .replace("{z}", &zoom.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Icon {
    pub url: String,
    pub size: [u32; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Popup {
    pub title: String,
    pub details: Vec<String>,
}

impl Popup {
    pub fn new<S: Into<String>>(title: S) -> Self {
        Self {
            title: title.into(),
            details: vec![],
        }
    }

    pub fn detail<S: Into<String>>(mut self, line: S) -> Self {
        self.details.push(line.into());
        self
    }

    /// Title and details, one per line.
    pub fn text(&self) -> String {
        std::iter::once(self.title.as_str())
            .chain(self.details.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub key: ElementKey,
    pub position: Location,
    pub icon: Icon,
    pub popup: Popup,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Polyline {
    pub key: ElementKey,
    pub positions: Vec<Location>,
    pub color: String,
    pub length_km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum LegendSymbol {
    Pin,
    Home,
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    pub label: String,
    pub symbol: LegendSymbol,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, JsonSchema)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum OmissionReason {
    InvalidLocation,
    DegeneratePath { points: usize },
    InvalidPathPoint { index: usize },
}

impl From<PathError> for OmissionReason {
    fn from(value: PathError) -> Self {
        match value {
            PathError::TooFewPoints(points) => Self::DegeneratePath { points },
            PathError::InvalidPoint { index } => Self::InvalidPathPoint { index },
        }
    }
}

/// An entity that was not drawn, and why.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Omission {
    pub key: ElementKey,
    #[serde(flatten)]
    pub reason: OmissionReason,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub title: String,
    pub center: Location,
    pub zoom: u8,
    pub tile_layer: TileLayer,
    pub markers: Vec<Marker>,
    pub polylines: Vec<Polyline>,
    pub legend: Vec<LegendEntry>,
    pub omitted: Vec<Omission>,
}

impl Scene {
    /// Keys of all drawn elements, independent of their order in the scene.
    pub fn element_keys(&self) -> BTreeSet<ElementKey> {
        self.markers
            .iter()
            .map(|marker| marker.key)
            .chain(self.polylines.iter().map(|line| line.key))
            .collect()
    }

    pub fn marker(&self, key: ElementKey) -> Option<&Marker> {
        self.markers.iter().find(|marker| marker.key == key)
    }

    pub fn polyline(&self, key: ElementKey) -> Option<&Polyline> {
        self.polylines.iter().find(|line| line.key == key)
    }

    /// Url of the tile the scene is centered on.
    pub fn center_tile_url(&self) -> String {
        let (x, y) = geo::tile_for(self.center.latitude, self.center.longitude, self.zoom);
        self.tile_layer.tile_url(x, y, self.zoom)
    }
}

impl ExampleData for Scene {
    fn example_data() -> Self {
        let shelter = Shelter::example_data();
        let route = EvacuationRoute::example_data();
        Self {
            title: "Safety Maps & Evacuation Routes".to_owned(),
            center: shelter.location,
            zoom: 13,
            tile_layer: TileLayer {
                url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_owned(),
                subdomains: vec!["a".to_owned(), "b".to_owned(), "c".to_owned()],
                attribution: "OpenStreetMap contributors".to_owned(),
                max_zoom: 19,
            },
            markers: vec![Marker {
                key: ElementKey::Shelter(Id::new(1)),
                position: shelter.location,
                icon: Icon {
                    url: "/shelter-icon.png".to_owned(),
                    size: [25, 25],
                },
                popup: Popup::new(shelter.name),
            }],
            polylines: vec![Polyline {
                key: ElementKey::Route(Id::new(1)),
                length_km: route.length_km(),
                positions: route.path,
                color: "blue".to_owned(),
            }],
            legend: vec![LegendEntry {
                label: "Shelter".to_owned(),
                symbol: LegendSymbol::Home,
                color: "green".to_owned(),
            }],
            omitted: vec![Omission {
                key: ElementKey::Route(Id::new(2)),
                reason: OmissionReason::DegeneratePath { points: 1 },
            }],
        }
    }
}
