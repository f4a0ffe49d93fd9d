use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::geo;

use crate::ExampleData;

/// A point on the map in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lng", alias = "lon")]
    pub longitude: f64,
}

impl Location {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        geo::is_valid_coordinate(self.latitude, self.longitude)
    }

    pub fn distance_km(&self, other: &Location) -> f64 {
        geo::haversine_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

impl ExampleData for Location {
    fn example_data() -> Self {
        Location::new(34.052235, -118.243683)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_short_field_names() {
        let location: Location =
            serde_json::from_str(r#"{"lat": 34.05, "lng": -118.24}"#).unwrap();
        assert_eq!(location, Location::new(34.05, -118.24));
        assert_eq!(
            serde_json::to_value(location).unwrap(),
            serde_json::json!({"latitude": 34.05, "longitude": -118.24})
        );
    }

    #[test]
    fn nan_is_not_a_valid_location() {
        assert!(Location::example_data().is_valid());
        assert!(!Location::new(f64::NAN, 0.0).is_valid());
        assert!(!Location::new(0.0, 200.0).is_valid());
    }
}
