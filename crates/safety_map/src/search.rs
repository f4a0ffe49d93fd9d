use chrono::{DateTime, Local};
use model::ExampleData;
use schemars::JsonSchema;
use serde::Serialize;

pub const PLACEHOLDER: &str = "Search by location";

/// Result of submitting a search. Queries are recorded but not resolved yet,
/// so the map is never moved by a search.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum SearchOutcome {
    #[serde(rename_all = "camelCase")]
    NotPerformed {
        query: String,
        submitted_at: DateTime<Local>,
    },
}

impl SearchOutcome {
    pub fn query(&self) -> &str {
        match self {
            Self::NotPerformed { query, .. } => query,
        }
    }
}

impl ExampleData for SearchOutcome {
    fn example_data() -> Self {
        Self::NotPerformed {
            query: "City Hall".to_owned(),
            submitted_at: Local::now(),
        }
    }
}

/// Text state of the location search box.
#[derive(Debug, Clone, Default)]
pub struct SearchShell {
    query: String,
}

impl SearchShell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query<S: Into<String>>(&mut self, query: S) {
        self.query = query.into();
    }

    pub fn submit(&self) -> SearchOutcome {
        log::info!("searching for: {:?}", self.query);
        SearchOutcome::NotPerformed {
            query: self.query.clone(),
            submitted_at: Local::now(),
        }
    }
}
