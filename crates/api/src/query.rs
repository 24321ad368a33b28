use serde::{Deserialize, Serialize};

/// Sea area the max-point ranking is restricted to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sea {
    West,
    South,
    East,
}

impl Sea {
    pub const ALL: [Sea; 3] = [Sea::West, Sea::South, Sea::East];

    pub fn as_str(self) -> &'static str {
        match self {
            Sea::West => "west",
            Sea::South => "south",
            Sea::East => "east",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|sea| sea.as_str() == s)
    }
}

/// `analysDate` is always sent as `YYYYMMDD`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointInfoQuery {
    pub lon: f64,
    pub lat: f64,
    pub analys_date: String,
    pub species: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaxPointQuery {
    pub species: String,
    pub analys_date: String,
    pub sea: Sea,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReanalysisQuery {
    pub species: String,
    pub analys_date: String,
}

/// Accepts `YYYY-MM-DD` (date inputs, time steps) or `YYYYMMDD` and returns
/// the compact form the API expects.
pub fn compact_date(date: &str) -> String {
    date.chars().filter(|c| *c != '-').collect()
}

impl PointInfoQuery {
    pub fn new(lon: f64, lat: f64, date: &str, species: impl Into<String>) -> Self {
        Self {
            lon,
            lat,
            analys_date: compact_date(date),
            species: species.into(),
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("lon", self.lon.to_string()),
            ("lat", self.lat.to_string()),
            ("analysDate", self.analys_date.clone()),
            ("species", self.species.clone()),
        ]
    }
}

impl MaxPointQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("species", self.species.clone()),
            ("analysDate", compact_date(&self.analys_date)),
            ("sea", self.sea.as_str().to_owned()),
        ]
    }
}

impl ReanalysisQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("species", self.species.clone()),
            ("analysDate", compact_date(&self.analys_date)),
        ]
    }
}
