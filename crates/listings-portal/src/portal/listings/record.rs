use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::schema::{BulletSection, ListingKind, ScalarField};
use crate::portal::query::Filterable;

/// Store-assigned identifier; absent until the first save.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(pub String);

impl ListingId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One heading with its ordered items, authored as JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldOpsGroup {
    #[serde(default, alias = "title")]
    pub heading: String,
    #[serde(default)]
    pub items: Vec<String>,
}

impl FieldOpsGroup {
    pub fn is_blank(&self) -> bool {
        self.heading.trim().is_empty() && self.items.iter().all(|item| item.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListingFlags {
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListingMedia {
    pub image_url: Option<String>,
    pub application_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordTimestamps {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Normalized listing as stored and displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ListingId>,
    pub kind: ListingKind,
    pub title: String,
    pub organization: String,
    pub scalars: BTreeMap<ScalarField, String>,
    pub short_summary: String,
    pub description_paragraphs: Vec<String>,
    pub bullet_sections: BTreeMap<BulletSection, Vec<String>>,
    pub field_ops_groups: Vec<FieldOpsGroup>,
    pub skills: Vec<String>,
    pub flags: ListingFlags,
    pub media: ListingMedia,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamps: Option<RecordTimestamps>,
}

impl ListingRecord {
    pub fn empty(kind: ListingKind) -> Self {
        Self {
            id: None,
            kind,
            title: String::new(),
            organization: String::new(),
            scalars: BTreeMap::new(),
            short_summary: String::new(),
            description_paragraphs: Vec::new(),
            bullet_sections: BTreeMap::new(),
            field_ops_groups: Vec::new(),
            skills: Vec::new(),
            flags: ListingFlags::default(),
            media: ListingMedia::default(),
            timestamps: None,
        }
    }

    pub fn scalar(&self, field: ScalarField) -> Option<&str> {
        self.scalars
            .get(&field)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn bullets(&self, section: BulletSection) -> &[String] {
        self.bullet_sections
            .get(&section)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Facets offered by the admin listing managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingFacet {
    Location,
    Region,
    City,
    ContractType,
    ExperienceLevel,
    EducationLevel,
    Duration,
    Verified,
    Featured,
}

impl ListingFacet {
    pub const fn ordered() -> [Self; 9] {
        [
            Self::Location,
            Self::Region,
            Self::City,
            Self::ContractType,
            Self::ExperienceLevel,
            Self::EducationLevel,
            Self::Duration,
            Self::Verified,
            Self::Featured,
        ]
    }

    pub const fn param(self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::Region => "region",
            Self::City => "city",
            Self::ContractType => "contract_type",
            Self::ExperienceLevel => "experience_level",
            Self::EducationLevel => "education_level",
            Self::Duration => "duration",
            Self::Verified => "verified",
            Self::Featured => "featured",
        }
    }

    pub fn from_param(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        Self::ordered()
            .into_iter()
            .find(|facet| facet.param() == normalized)
    }

    const fn scalar(self) -> Option<ScalarField> {
        match self {
            Self::Location => Some(ScalarField::Location),
            Self::Region => Some(ScalarField::Region),
            Self::City => Some(ScalarField::City),
            Self::ContractType => Some(ScalarField::ContractType),
            Self::ExperienceLevel => Some(ScalarField::ExperienceLevel),
            Self::EducationLevel => Some(ScalarField::EducationLevel),
            Self::Duration => Some(ScalarField::Duration),
            Self::Verified | Self::Featured => None,
        }
    }
}

impl Filterable for ListingRecord {
    type Facet = ListingFacet;

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.organization.as_str()];
        for field in [ScalarField::Location, ScalarField::Region, ScalarField::City] {
            if let Some(value) = self.scalar(field) {
                fields.push(value);
            }
        }
        fields
    }

    fn facet_value(&self, facet: ListingFacet) -> Option<Cow<'_, str>> {
        match facet {
            ListingFacet::Verified => Some(Cow::Borrowed(bool_label(self.flags.verified))),
            ListingFacet::Featured => Some(Cow::Borrowed(bool_label(self.flags.featured))),
            other => other
                .scalar()
                .and_then(|field| self.scalar(field))
                .map(Cow::Borrowed),
        }
    }
}

const fn bool_label(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
