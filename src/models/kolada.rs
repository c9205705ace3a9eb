//! Kolada KPI and municipality models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A key performance indicator from Kolada.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    /// KPI identifier, e.g. `"N00945"`
    pub id: String,
    /// Display name
    #[serde(default)]
    pub title: Option<String>,
    /// Longer explanation
    #[serde(default)]
    pub description: Option<String>,
    /// Comma-separated thematic areas
    #[serde(default)]
    pub operating_area: Option<String>,
    /// Remaining upstream fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Kpi {
    /// Thematic areas as separate, trimmed names.
    pub fn operating_areas(&self) -> Vec<&str> {
        self.operating_area
            .as_deref()
            .map(|areas| {
                areas
                    .split(',')
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Kind of administrative area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MunicipalityType {
    /// Kommun (`K`)
    Municipality,
    /// Region / landsting (`L`)
    Region,
}

impl MunicipalityType {
    /// Single-letter code used by Kolada.
    pub fn code(&self) -> &'static str {
        match self {
            MunicipalityType::Municipality => "K",
            MunicipalityType::Region => "L",
        }
    }
}

/// A municipality or region from Kolada.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Municipality {
    /// Identifier, e.g. `"0180"` for Stockholm
    pub id: String,
    /// Display name
    #[serde(default)]
    pub title: Option<String>,
    /// Type code (`K`, `L`, ...)
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl Municipality {
    /// Returns `true` if this entry is of the given type.
    pub fn is(&self, kind: MunicipalityType) -> bool {
        self.kind.as_deref() == Some(kind.code())
    }
}
