use serde::{Deserialize, Deserializer, Serialize};

/// Envelope every catch API endpoint answers with. `payload` is null when
/// the server has nothing for the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultResponse<T> {
    pub payload: Option<T>,
    pub status: u16,
}

/// Predicted catch at one grid cell on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FishInfo {
    pub analys_date: String,
    pub grid_id: String,
    pub species: String,
    pub lat_dms: String,
    pub lon_dms: String,
    /// Decimal degrees of the grid cell centre, used by "go to point".
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub lat: Option<f64>,
    pub predict_catch: f64,
    #[serde(default)]
    pub sst: Option<f64>,
    #[serde(default)]
    pub ssh: Option<f64>,
    #[serde(default)]
    pub wave: Option<f64>,
    #[serde(default)]
    pub chl: Option<f64>,
}

impl FishInfo {
    pub fn position(&self) -> Option<(f64, f64)> {
        Some((self.lon?, self.lat?))
    }
}

/// Values under a clicked point, shown in its popup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointInfo {
    pub grid_id: String,
    #[serde(default)]
    pub predict_catch: Option<f64>,
    #[serde(default)]
    pub ssh: Option<f64>,
    #[serde(default)]
    pub sst: Option<f64>,
    #[serde(default)]
    pub wave: Option<f64>,
    #[serde(default)]
    pub chl: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedLocation {
    pub grid_id: String,
    pub total_catch: f64,
    pub lat_dms: String,
    pub lon_dms: String,
}

/// Monthly observed catch for the last few years.
///
/// `data_list[month][year]` lines up with `label_months` and `label_years`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reanalysis {
    pub label_months: Vec<String>,
    #[serde(deserialize_with = "labels_from_any")]
    pub label_years: Vec<String>,
    pub data_list: Vec<Vec<f64>>,
    #[serde(default)]
    pub location_list: Vec<RankedLocation>,
}

/// One line of the yearly comparison chart.
#[derive(Debug, Clone, PartialEq)]
pub struct YearSeries {
    pub year: String,
    /// Monthly totals in millions; `None` where the month has no value.
    pub values: Vec<Option<f64>>,
}

impl Reanalysis {
    /// Per-year series in millions, one value per month.
    pub fn year_series(&self) -> Vec<YearSeries> {
        self.label_years
            .iter()
            .enumerate()
            .map(|(i, year)| YearSeries {
                year: year.clone(),
                values: self
                    .data_list
                    .iter()
                    .map(|month| month.get(i).map(|v| v / 1_000_000.0))
                    .collect(),
            })
            .collect()
    }
}

/// Year labels arrive as numbers from some deployments and strings from others.
fn labels_from_any<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|v| match v {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        })
        .collect())
}

/// GetFeatureInfo answer in `application/json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureInfo {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub properties: FeatureProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    #[serde(default)]
    pub predicted_catch: Option<f64>,
    #[serde(default)]
    pub grid_id: Option<String>,
}

impl FeatureInfo {
    /// Properties of the first feature, if the point hit any.
    pub fn first(&self) -> Option<&FeatureProperties> {
        self.features.first().map(|f| &f.properties)
    }
}
