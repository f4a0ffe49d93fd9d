use std::{error, fmt};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::HasId;

use crate::{location::Location, ExampleData};

/// A pre-recorded evacuation path. The points are in travel order; nothing
/// checks that the path connects a hazard to a shelter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvacuationRoute {
    pub path: Vec<Location>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathError {
    TooFewPoints(usize),
    InvalidPoint { index: usize },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewPoints(points) => {
                write!(f, "path needs at least 2 points, got {}", points)
            }
            Self::InvalidPoint { index } => {
                write!(f, "path point {} is not a valid coordinate", index)
            }
        }
    }
}

impl error::Error for PathError {}

impl EvacuationRoute {
    pub const MIN_POINTS: usize = 2;

    /// Checks that the path can be drawn as a visible line.
    pub fn check_path(&self) -> Result<(), PathError> {
        if self.path.len() < Self::MIN_POINTS {
            return Err(PathError::TooFewPoints(self.path.len()));
        }
        match self.path.iter().position(|point| !point.is_valid()) {
            Some(index) => Err(PathError::InvalidPoint { index }),
            None => Ok(()),
        }
    }

    /// Length of the path along its points, in kilometers.
    pub fn length_km(&self) -> f64 {
        self.path
            .windows(2)
            .map(|segment| segment[0].distance_km(&segment[1]))
            .sum()
    }
}

impl HasId for EvacuationRoute {
    type IdType = i32;
}

impl ExampleData for EvacuationRoute {
    fn example_data() -> Self {
        Self {
            path: vec![
                Location::new(34.052235, -118.243683),
                Location::new(34.054208, -118.242766),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_paths_are_rejected() {
        let empty = EvacuationRoute { path: vec![] };
        let single = EvacuationRoute {
            path: vec![Location::new(34.0, -118.0)],
        };
        assert_eq!(empty.check_path(), Err(PathError::TooFewPoints(0)));
        assert_eq!(single.check_path(), Err(PathError::TooFewPoints(1)));
        assert_eq!(single.length_km(), 0.0);
    }

    #[test]
    fn invalid_points_are_reported_by_index() {
        let route = EvacuationRoute {
            path: vec![
                Location::new(34.0, -118.0),
                Location::new(34.1, -118.1),
                Location::new(f64::NAN, -118.2),
            ],
        };
        assert_eq!(route.check_path(), Err(PathError::InvalidPoint { index: 2 }));
    }

    #[test]
    fn length_follows_the_path() {
        let route = EvacuationRoute::example_data();
        assert_eq!(route.check_path(), Ok(()));
        assert!((route.length_km() - 0.2351).abs() < 0.001);
    }
}
