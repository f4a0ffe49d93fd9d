use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::HasId;

use crate::{location::Location, ExampleData};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Shelter {
    pub name: String,
    pub location: Location,
}

impl HasId for Shelter {
    type IdType = i32;
}

impl ExampleData for Shelter {
    fn example_data() -> Self {
        Self {
            name: "City Hall Shelter".to_owned(),
            location: Location::new(34.054208, -118.242766),
        }
    }
}
