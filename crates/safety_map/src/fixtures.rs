use std::{error, fmt, fs, io, path::Path, sync::Arc};

use async_trait::async_trait;
use indexmap::IndexMap;
use model::{
    hazard::{HazardCategory, HazardEvent, Severity},
    location::Location,
    route::EvacuationRoute,
    shelter::Shelter,
    WithId,
};
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::provider::{self, FixtureProvider, ProviderError};

#[derive(Debug)]
pub enum FixtureError {
    Io(io::Error),
    Parse(serde_json::Error),
    DuplicateId { collection: &'static str, id: i32 },
}

impl fmt::Display for FixtureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(why) => write!(f, "could not read fixtures: {}", why),
            Self::Parse(why) => write!(f, "could not parse fixtures: {}", why),
            Self::DuplicateId { collection, id } => {
                write!(f, "id {} appears more than once in {}", id, collection)
            }
        }
    }
}

impl error::Error for FixtureError {}

impl From<io::Error> for FixtureError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for FixtureError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// The on-disk shape of a fixture file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureDocument {
    #[serde(default)]
    pub hazards: Vec<WithId<HazardEvent>>,
    #[serde(default)]
    pub shelters: Vec<WithId<Shelter>>,
    #[serde(default, alias = "evacuationRoutes")]
    pub routes: Vec<WithId<EvacuationRoute>>,
}

#[derive(Debug)]
struct Collections {
    hazards: IndexMap<Id<HazardEvent>, HazardEvent>,
    shelters: IndexMap<Id<Shelter>, Shelter>,
    routes: IndexMap<Id<EvacuationRoute>, EvacuationRoute>,
}

/// Fixtures held in memory for the lifetime of the process. Clones share the
/// same data.
#[derive(Debug, Clone)]
pub struct InMemoryFixtures {
    collections: Arc<Collections>,
}

impl InMemoryFixtures {
    pub fn new(document: FixtureDocument) -> Result<Self, FixtureError> {
        for hazard in document.hazards.iter() {
            if !hazard.content.category.is_known() || !hazard.content.severity.is_known() {
                log::warn!(
                    "hazard {} has an unrecognised classification ({} / {})",
                    hazard.id,
                    hazard.content.category,
                    hazard.content.severity
                );
            }
        }
        let collections = Collections {
            hazards: index_unique("hazards", document.hazards)?,
            shelters: index_unique("shelters", document.shelters)?,
            routes: index_unique("routes", document.routes)?,
        };
        log::debug!(
            "loaded {} hazards, {} shelters and {} routes",
            collections.hazards.len(),
            collections.shelters.len(),
            collections.routes.len()
        );
        Ok(Self {
            collections: Arc::new(collections),
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, FixtureError> {
        Self::new(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, FixtureError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// The built-in data set around downtown Los Angeles.
    pub fn los_angeles() -> Self {
        let hazards = IndexMap::from([
            (
                Id::new(1),
                HazardEvent {
                    category: HazardCategory::Flood,
                    location: Location::new(34.052235, -118.243683),
                    severity: Severity::High,
                },
            ),
            (
                Id::new(2),
                HazardEvent {
                    category: HazardCategory::Wildfire,
                    location: Location::new(34.069444, -118.445278),
                    severity: Severity::Medium,
                },
            ),
        ]);
        let shelters = IndexMap::from([
            (
                Id::new(1),
                Shelter {
                    name: "City Hall Shelter".to_owned(),
                    location: Location::new(34.054208, -118.242766),
                },
            ),
            (
                Id::new(2),
                Shelter {
                    name: "Community Center".to_owned(),
                    location: Location::new(34.052030, -118.243700),
                },
            ),
        ]);
        let routes = IndexMap::from([
            (
                Id::new(1),
                EvacuationRoute {
                    path: vec![
                        Location::new(34.052235, -118.243683),
                        Location::new(34.054208, -118.242766),
                    ],
                },
            ),
            (
                Id::new(2),
                EvacuationRoute {
                    path: vec![
                        Location::new(34.069444, -118.445278),
                        Location::new(34.052030, -118.243700),
                    ],
                },
            ),
        ]);
        Self {
            collections: Arc::new(Collections {
                hazards,
                shelters,
                routes,
            }),
        }
    }
}

fn index_unique<V>(
    collection: &'static str,
    values: Vec<WithId<V>>,
) -> Result<IndexMap<Id<V>, V>, FixtureError>
where
    V: HasId<IdType = i32>,
{
    let mut index = IndexMap::with_capacity(values.len());
    for value in values {
        let id = value.id;
        if index.insert(id, value.content).is_some() {
            return Err(FixtureError::DuplicateId {
                collection,
                id: id.raw(),
            });
        }
    }
    Ok(index)
}

fn listed<V>(values: &IndexMap<Id<V>, V>) -> Vec<WithId<V>>
where
    V: HasId<IdType = i32> + Clone,
{
    values
        .iter()
        .map(|(id, value)| WithId::new(*id, value.clone()))
        .collect()
}

fn looked_up<V>(values: &IndexMap<Id<V>, V>, id: Id<V>) -> provider::Result<WithId<V>>
where
    V: HasId<IdType = i32> + Clone,
{
    values
        .get(&id)
        .map(|value| WithId::new(id, value.clone()))
        .ok_or(ProviderError::NotFound)
}

#[async_trait]
impl FixtureProvider for InMemoryFixtures {
    async fn list_hazards(&self) -> provider::Result<Vec<WithId<HazardEvent>>> {
        Ok(listed(&self.collections.hazards))
    }

    async fn list_shelters(&self) -> provider::Result<Vec<WithId<Shelter>>> {
        Ok(listed(&self.collections.shelters))
    }

    async fn list_routes(&self) -> provider::Result<Vec<WithId<EvacuationRoute>>> {
        Ok(listed(&self.collections.routes))
    }

    async fn hazard(&self, id: Id<HazardEvent>) -> provider::Result<WithId<HazardEvent>> {
        looked_up(&self.collections.hazards, id)
    }

    async fn shelter(&self, id: Id<Shelter>) -> provider::Result<WithId<Shelter>> {
        looked_up(&self.collections.shelters, id)
    }

    async fn route(
        &self,
        id: Id<EvacuationRoute>,
    ) -> provider::Result<WithId<EvacuationRoute>> {
        looked_up(&self.collections.routes, id)
    }
}
