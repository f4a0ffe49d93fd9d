use std::fmt;

use schemars::{gen::SchemaGenerator, schema::Schema, JsonSchema};
use serde::{Deserialize, Serialize};
use utility::id::HasId;

use crate::{location::Location, ExampleData};

/// Declares a closed set of classification values with a fallback variant
/// that keeps unrecognised text verbatim. Parsing ignores case, the canonical
/// spelling is used for display and serialization.
macro_rules! classification {
    (
        $(#[$meta:meta])*
        $name:ident, fallback: $fallback:ident,
        { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            $fallback(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $text,)+
                    Self::$fallback(raw) => raw,
                }
            }

            pub fn is_known(&self) -> bool {
                !matches!(self, Self::$fallback(_))
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                let trimmed = value.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($text) {
                        return Self::$variant;
                    }
                )+
                Self::$fallback(trimmed.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::from(value.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::$fallback(raw) => raw,
                    known => known.as_str().to_owned(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl JsonSchema for $name {
            fn schema_name() -> String {
                stringify!($name).to_owned()
            }

            fn json_schema(gen: &mut SchemaGenerator) -> Schema {
                let mut schema = String::json_schema(gen).into_object();
                schema.metadata().description = Some(format!(
                    "One of {}. Other values are kept as given.",
                    [$($text),+].join(", ")
                ));
                schema.into()
            }
        }
    };
}

classification! {
    /// What kind of disaster a hazard event is.
    HazardCategory, fallback: Other, {
        Flood => "Flood",
        Wildfire => "Wildfire",
        Earthquake => "Earthquake",
        Storm => "Storm",
        Tsunami => "Tsunami",
        Landslide => "Landslide",
    }
}

classification! {
    Severity, fallback: Unknown, {
        High => "High",
        Medium => "Medium",
        Low => "Low",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HazardEvent {
    #[serde(alias = "type")]
    pub category: HazardCategory,
    pub location: Location,
    pub severity: Severity,
}

impl HasId for HazardEvent {
    type IdType = i32;
}

impl ExampleData for HazardEvent {
    fn example_data() -> Self {
        Self {
            category: HazardCategory::Flood,
            location: Location::new(34.052235, -118.243683),
            severity: Severity::High,
        }
    }
}
