use serde::{Deserialize, Serialize};
use std::fmt;

use crate::portal::store::Collection;

/// Supported listing kinds; each maps to one store collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingKind {
    Job,
    Internship,
    GraduateProgram,
    NssProgram,
    YeaProgram,
}

impl ListingKind {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Job,
            Self::Internship,
            Self::GraduateProgram,
            Self::NssProgram,
            Self::YeaProgram,
        ]
    }

    pub const fn collection(self) -> Collection {
        match self {
            Self::Job => Collection::Jobs,
            Self::Internship => Collection::Internships,
            Self::GraduateProgram => Collection::GraduatePrograms,
            Self::NssProgram => Collection::NssPrograms,
            Self::YeaProgram => Collection::YeaPrograms,
        }
    }

    /// Path and CLI segment, e.g. `graduate-programs`.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Job => "jobs",
            Self::Internship => "internships",
            Self::GraduateProgram => "graduate-programs",
            Self::NssProgram => "nss-programs",
            Self::YeaProgram => "yea-programs",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Job => "Job",
            Self::Internship => "Internship",
            Self::GraduateProgram => "Graduate Program",
            Self::NssProgram => "National Service Program",
            Self::YeaProgram => "Youth Employment Program",
        }
    }

    /// Accepts slugs and collection names.
    pub fn from_slug(value: &str) -> Option<Self> {
        let collection = Collection::from_name(value)?;
        Self::ordered()
            .into_iter()
            .find(|kind| kind.collection() == collection)
    }

    pub fn schema(self) -> &'static ListingSchema {
        match self {
            Self::Job => &JOB_SCHEMA,
            Self::Internship => &INTERNSHIP_SCHEMA,
            Self::GraduateProgram => &GRADUATE_PROGRAM_SCHEMA,
            Self::NssProgram => &NSS_PROGRAM_SCHEMA,
            Self::YeaProgram => &YEA_PROGRAM_SCHEMA,
        }
    }
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Short string or enum-like columns that vary by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarField {
    Location,
    Region,
    City,
    Duration,
    Salary,
    Stipend,
    ContractType,
    ExperienceLevel,
    EducationLevel,
    ApplicationDeadline,
    Icon,
    ColorTheme,
}

impl ScalarField {
    pub const fn column(self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::Region => "region",
            Self::City => "city",
            Self::Duration => "duration",
            Self::Salary => "salary",
            Self::Stipend => "stipend",
            Self::ContractType => "contract_type",
            Self::ExperienceLevel => "experience_level",
            Self::EducationLevel => "education_level",
            Self::ApplicationDeadline => "application_deadline",
            Self::Icon => "icon",
            Self::ColorTheme => "color_theme",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Location => "Location",
            Self::Region => "Region",
            Self::City => "City",
            Self::Duration => "Duration",
            Self::Salary => "Salary",
            Self::Stipend => "Stipend",
            Self::ContractType => "Contract Type",
            Self::ExperienceLevel => "Experience Level",
            Self::EducationLevel => "Education Level",
            Self::ApplicationDeadline => "Application Deadline",
            Self::Icon => "Icon",
            Self::ColorTheme => "Color Theme",
        }
    }
}

/// Named newline-delimited lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulletSection {
    ImpactHighlights,
    Responsibilities,
    Qualifications,
    Requirements,
    Benefits,
    Eligibility,
}

impl BulletSection {
    pub const fn column(self) -> &'static str {
        match self {
            Self::ImpactHighlights => "impact_highlights",
            Self::Responsibilities => "responsibilities",
            Self::Qualifications => "qualifications",
            Self::Requirements => "requirements",
            Self::Benefits => "benefits",
            Self::Eligibility => "eligibility",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ImpactHighlights => "Impact Highlights",
            Self::Responsibilities => "Responsibilities",
            Self::Qualifications => "Qualifications",
            Self::Requirements => "Requirements",
            Self::Benefits => "Benefits",
            Self::Eligibility => "Eligibility",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingFlag {
    Verified,
    Featured,
}

impl ListingFlag {
    pub const fn column(self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::Featured => "featured",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalarSpec {
    pub field: ScalarField,
    pub required: bool,
}

const fn required(field: ScalarField) -> ScalarSpec {
    ScalarSpec {
        field,
        required: true,
    }
}

const fn optional(field: ScalarField) -> ScalarSpec {
    ScalarSpec {
        field,
        required: false,
    }
}

/// Describes which fields one listing kind carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingSchema {
    pub kind: ListingKind,
    pub organization_column: &'static str,
    pub organization_required: bool,
    pub scalar_fields: &'static [ScalarSpec],
    pub bullet_sections: &'static [BulletSection],
    pub grouped_sections: bool,
    pub skills: bool,
    pub flags: &'static [ListingFlag],
}

impl ListingSchema {
    pub fn has_scalar(&self, field: ScalarField) -> bool {
        self.scalar_fields.iter().any(|spec| spec.field == field)
    }

    pub fn required_scalars(&self) -> impl Iterator<Item = ScalarField> + '_ {
        self.scalar_fields
            .iter()
            .filter(|spec| spec.required)
            .map(|spec| spec.field)
    }

    pub fn has_bullet_section(&self, section: BulletSection) -> bool {
        self.bullet_sections.contains(&section)
    }

    pub fn has_flag(&self, flag: ListingFlag) -> bool {
        self.flags.contains(&flag)
    }
}

static JOB_SCHEMA: ListingSchema = ListingSchema {
    kind: ListingKind::Job,
    organization_column: "company",
    organization_required: true,
    scalar_fields: &[
        required(ScalarField::Location),
        optional(ScalarField::Region),
        optional(ScalarField::City),
        required(ScalarField::ContractType),
        optional(ScalarField::Salary),
        optional(ScalarField::ExperienceLevel),
        optional(ScalarField::EducationLevel),
        optional(ScalarField::ApplicationDeadline),
    ],
    bullet_sections: &[
        BulletSection::ImpactHighlights,
        BulletSection::Responsibilities,
        BulletSection::Qualifications,
        BulletSection::Benefits,
    ],
    grouped_sections: true,
    skills: true,
    flags: &[ListingFlag::Verified, ListingFlag::Featured],
};

static INTERNSHIP_SCHEMA: ListingSchema = ListingSchema {
    kind: ListingKind::Internship,
    organization_column: "company",
    organization_required: true,
    scalar_fields: &[
        required(ScalarField::Location),
        optional(ScalarField::Region),
        optional(ScalarField::City),
        required(ScalarField::Duration),
        optional(ScalarField::Stipend),
        optional(ScalarField::EducationLevel),
        optional(ScalarField::ApplicationDeadline),
    ],
    bullet_sections: &[
        BulletSection::Responsibilities,
        BulletSection::Requirements,
        BulletSection::Benefits,
    ],
    grouped_sections: true,
    skills: true,
    flags: &[ListingFlag::Featured],
};

static GRADUATE_PROGRAM_SCHEMA: ListingSchema = ListingSchema {
    kind: ListingKind::GraduateProgram,
    organization_column: "company",
    organization_required: true,
    scalar_fields: &[
        required(ScalarField::Location),
        optional(ScalarField::Region),
        required(ScalarField::Duration),
        optional(ScalarField::Salary),
        optional(ScalarField::EducationLevel),
        optional(ScalarField::ApplicationDeadline),
        optional(ScalarField::Icon),
        optional(ScalarField::ColorTheme),
    ],
    bullet_sections: &[
        BulletSection::ImpactHighlights,
        BulletSection::Qualifications,
        BulletSection::Benefits,
    ],
    grouped_sections: true,
    skills: true,
    flags: &[ListingFlag::Featured],
};

static NSS_PROGRAM_SCHEMA: ListingSchema = ListingSchema {
    kind: ListingKind::NssProgram,
    organization_column: "organization",
    organization_required: false,
    scalar_fields: &[
        required(ScalarField::Region),
        optional(ScalarField::City),
        optional(ScalarField::Duration),
        optional(ScalarField::Stipend),
        optional(ScalarField::Icon),
        optional(ScalarField::ColorTheme),
    ],
    bullet_sections: &[
        BulletSection::Eligibility,
        BulletSection::Requirements,
        BulletSection::Benefits,
    ],
    grouped_sections: false,
    skills: false,
    flags: &[ListingFlag::Verified],
};

static YEA_PROGRAM_SCHEMA: ListingSchema = ListingSchema {
    kind: ListingKind::YeaProgram,
    organization_column: "organization",
    organization_required: false,
    scalar_fields: &[
        optional(ScalarField::Region),
        optional(ScalarField::City),
        optional(ScalarField::Duration),
        optional(ScalarField::Stipend),
        optional(ScalarField::Icon),
        optional(ScalarField::ColorTheme),
    ],
    bullet_sections: &[BulletSection::Eligibility, BulletSection::Benefits],
    grouped_sections: false,
    skills: false,
    flags: &[ListingFlag::Featured],
};
