use std::{error, fmt, result};

use async_trait::async_trait;
use model::{
    hazard::HazardEvent, route::EvacuationRoute, shelter::Shelter, WithId,
};
use utility::id::Id;

#[derive(Debug)]
pub enum ProviderError {
    NotFound,
    Other(Box<dyn error::Error + Send + Sync>),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "no such entry"),
            Self::Other(why) => write!(f, "{}", why),
        }
    }
}

impl error::Error for ProviderError {}

pub type Result<T> = result::Result<T, ProviderError>;

/// Read-only source of the entities shown on the map. Every collection keeps
/// a stable order and every entry a stable id.
#[async_trait]
pub trait FixtureProvider: Clone + Send + Sync + 'static {
    async fn list_hazards(&self) -> Result<Vec<WithId<HazardEvent>>>;
    async fn list_shelters(&self) -> Result<Vec<WithId<Shelter>>>;
    async fn list_routes(&self) -> Result<Vec<WithId<EvacuationRoute>>>;

    async fn hazard(&self, id: Id<HazardEvent>) -> Result<WithId<HazardEvent>> {
        find_by_id(self.list_hazards().await?, id)
    }

    async fn shelter(&self, id: Id<Shelter>) -> Result<WithId<Shelter>> {
        find_by_id(self.list_shelters().await?, id)
    }

    async fn route(&self, id: Id<EvacuationRoute>) -> Result<WithId<EvacuationRoute>> {
        find_by_id(self.list_routes().await?, id)
    }
}

fn find_by_id<V>(values: Vec<WithId<V>>, id: Id<V>) -> Result<WithId<V>>
where
    V: utility::id::HasId<IdType = i32>,
{
    values
        .into_iter()
        .find(|value| value.id == id)
        .ok_or(ProviderError::NotFound)
}
