use std::borrow::Cow;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::portal::query::Filterable;

/// A hospital, clinic or other facility in the public directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub facility_type: String,
    #[serde(default)]
    pub ownership: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, deserialize_with = "list_or_text")]
    pub services: Vec<String>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub emergency: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectoryFacet {
    Region,
    District,
    FacilityType,
    Ownership,
    Verified,
    Emergency,
}

impl DirectoryFacet {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Region,
            Self::District,
            Self::FacilityType,
            Self::Ownership,
            Self::Verified,
            Self::Emergency,
        ]
    }

    pub const fn param(self) -> &'static str {
        match self {
            Self::Region => "region",
            Self::District => "district",
            Self::FacilityType => "facility_type",
            Self::Ownership => "ownership",
            Self::Verified => "verified",
            Self::Emergency => "emergency",
        }
    }

    pub fn from_param(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        Self::ordered()
            .into_iter()
            .find(|facet| facet.param() == normalized)
    }
}

impl Filterable for DirectoryEntry {
    type Facet = DirectoryFacet;

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.city.as_str(),
            self.district.as_str(),
            self.region.as_str(),
            self.address.as_str(),
        ]
    }

    fn facet_value(&self, facet: DirectoryFacet) -> Option<Cow<'_, str>> {
        let value = match facet {
            DirectoryFacet::Region => self.region.as_str(),
            DirectoryFacet::District => self.district.as_str(),
            DirectoryFacet::FacilityType => self.facility_type.as_str(),
            DirectoryFacet::Ownership => self.ownership.as_str(),
            DirectoryFacet::Verified => bool_label(self.verified),
            DirectoryFacet::Emergency => bool_label(self.emergency),
        };
        (!value.is_empty()).then_some(Cow::Borrowed(value))
    }
}

const fn bool_label(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(value) => value,
        Value::Number(value) => value.to_string(),
        _ => String::new(),
    })
}

/// Accepts a JSON array or `;`/`,` separated text.
fn list_or_text<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        Value::String(text) => split_services(&text),
        _ => Vec::new(),
    };
    Ok(items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect())
}

pub(crate) fn split_services(text: &str) -> Vec<String> {
    text.split([';', ','])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entries_decode_leniently_from_store_rows() {
        let entry: DirectoryEntry = serde_json::from_value(json!({
            "id": 42,
            "name": "Ridge Hospital",
            "region": "Greater Accra",
            "services": "Maternity; Emergency , Surgery",
            "verified": true
        }))
        .expect("entry decodes");

        assert_eq!(entry.id, "42");
        assert_eq!(entry.services, vec!["Maternity", "Emergency", "Surgery"]);
        assert!(entry.district.is_empty());
        assert!(!entry.emergency);
    }

    #[test]
    fn blank_fields_never_match_concrete_facets() {
        let entry: DirectoryEntry =
            serde_json::from_value(json!({ "name": "Unnamed clinic" })).expect("decodes");
        assert!(entry.facet_value(DirectoryFacet::Region).is_none());
        assert_eq!(
            entry.facet_value(DirectoryFacet::Verified).as_deref(),
            Some("false")
        );
    }
}
