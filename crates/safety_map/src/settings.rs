use std::{env, error, fmt, path::PathBuf, str::FromStr};

use model::location::Location;

pub const DEFAULT_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const DEFAULT_TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

/// Map settings, read from `SAFETY_MAPS_*` environment variables. Unset
/// variables keep their defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub center: Location,
    pub zoom: u8,
    pub tile_url_template: String,
    pub tile_subdomains: Vec<String>,
    pub tile_attribution: String,
    pub hazard_icon: String,
    pub shelter_icon: String,
    pub icon_size: [u32; 2],
    pub route_color: String,
    pub fixtures_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            center: Location::new(34.052235, -118.243683),
            zoom: 13,
            tile_url_template: DEFAULT_TILE_URL.to_owned(),
            tile_subdomains: vec!["a".to_owned(), "b".to_owned(), "c".to_owned()],
            tile_attribution: DEFAULT_TILE_ATTRIBUTION.to_owned(),
            hazard_icon: "/disaster-icon.png".to_owned(),
            shelter_icon: "/shelter-icon.png".to_owned(),
            icon_size: [25, 25],
            route_color: "blue".to_owned(),
            fixtures_path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    Invalid {
        variable: &'static str,
        value: String,
    },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid { variable, value } => {
                write!(f, "invalid value for {}: {:?}", variable, value)
            }
        }
    }
}

impl error::Error for SettingsError {}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_vars(|name| env::var(name).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let latitude = parse_var(
            &lookup,
            "SAFETY_MAPS_CENTER_LATITUDE",
            defaults.center.latitude,
        )?;
        let longitude = parse_var(
            &lookup,
            "SAFETY_MAPS_CENTER_LONGITUDE",
            defaults.center.longitude,
        )?;
        Ok(Self {
            center: Location::new(latitude, longitude),
            zoom: parse_var(&lookup, "SAFETY_MAPS_ZOOM", defaults.zoom)?,
            tile_url_template: lookup("SAFETY_MAPS_TILE_URL")
                .unwrap_or(defaults.tile_url_template),
            tile_attribution: lookup("SAFETY_MAPS_TILE_ATTRIBUTION")
                .unwrap_or(defaults.tile_attribution),
            hazard_icon: lookup("SAFETY_MAPS_HAZARD_ICON").unwrap_or(defaults.hazard_icon),
            shelter_icon: lookup("SAFETY_MAPS_SHELTER_ICON")
                .unwrap_or(defaults.shelter_icon),
            route_color: lookup("SAFETY_MAPS_ROUTE_COLOR").unwrap_or(defaults.route_color),
            fixtures_path: lookup("SAFETY_MAPS_FIXTURES").map(PathBuf::from),
            ..defaults
        })
    }
}

fn parse_var<F, T>(lookup: &F, variable: &'static str, default: T) -> Result<T, SettingsError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(variable) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| SettingsError::Invalid { variable, value }),
        None => Ok(default),
    }
}
