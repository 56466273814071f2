use serde_json::{json, Value};

use super::codec::record_from_row;
use super::record::ListingRecord;
use super::schema::ListingKind;
use crate::portal::store::StoreRow;

/// Built-in listings shown when the store cannot be reached.
pub fn sample_listings(kind: ListingKind) -> Vec<ListingRecord> {
    sample_rows(kind)
        .into_iter()
        .filter_map(|value| match value {
            Value::Object(row) => Some(row),
            _ => None,
        })
        .map(|row: StoreRow| record_from_row(kind, &row))
        .collect()
}

fn sample_rows(kind: ListingKind) -> Vec<Value> {
    match kind {
        ListingKind::Job => vec![
            json!({
                "id": "sample-job-1",
                "title": "Registered Nurse, Emergency Unit",
                "company": "Korle Bu Teaching Hospital",
                "location": "Accra",
                "region": "Greater Accra",
                "city": "Accra",
                "contract_type": "Full-time",
                "salary": "GHS 4,500 - 6,000",
                "experience_level": "Mid-level",
                "education_level": "Bachelor's",
                "description_paragraphs": [
                    "Join a 24-hour emergency team serving the largest referral hospital in the country.",
                    "You will triage, stabilise and hand over patients across rotating shifts."
                ],
                "impact_highlights": ["Over 300 emergency admissions each week"],
                "responsibilities": ["Triage incoming patients", "Administer prescribed treatment"],
                "qualifications": ["Registered with the Nursing and Midwifery Council", "BLS certification"],
                "benefits": ["Health insurance", "Shift allowance"],
                "field_ops_groups": [
                    { "heading": "Shift pattern", "items": ["Four days on, three days off"] }
                ],
                "skills": ["Triage", "Patient care", "BLS"],
                "verified": true,
                "featured": true
            }),
            json!({
                "id": "sample-job-2",
                "title": "Data Analyst",
                "company": "Hubtel",
                "location": "Kumasi",
                "region": "Ashanti",
                "city": "Kumasi",
                "contract_type": "Contract",
                "experience_level": "Entry-level",
                "description_paragraphs": [
                    "Build dashboards that help merchants understand their payment flows."
                ],
                "responsibilities": ["Maintain weekly reporting", "Clean transaction datasets"],
                "skills": ["SQL", "Excel"],
                "verified": false,
                "featured": false
            }),
        ],
        ListingKind::Internship => vec![json!({
            "id": "sample-internship-1",
            "title": "Public Health Intern",
            "company": "Ghana Health Service",
            "location": "Tamale",
            "region": "Northern",
            "city": "Tamale",
            "duration": "6 months",
            "stipend": "GHS 1,200 / month",
            "description_paragraphs": [
                "Support district health teams with community outreach and data collection."
            ],
            "responsibilities": ["Assist immunisation campaigns", "Record household survey data"],
            "requirements": ["Final year or recent graduate in public health"],
            "benefits": ["Field mentorship", "Transport allowance"],
            "skills": ["Data collection", "Community engagement"],
            "featured": true
        })],
        ListingKind::GraduateProgram => vec![json!({
            "id": "sample-graduate-1",
            "title": "Graduate Trainee Programme",
            "company": "MTN Ghana",
            "location": "Accra",
            "region": "Greater Accra",
            "duration": "24 months",
            "salary": "Competitive",
            "education_level": "Bachelor's",
            "icon": "graduation-cap",
            "color_theme": "amber",
            "description_paragraphs": [
                "Rotate through network, finance and customer experience teams over two years."
            ],
            "impact_highlights": ["Four rotations across the business"],
            "qualifications": ["First class or second class upper degree"],
            "benefits": ["Structured mentorship", "Leadership training"],
            "field_ops_groups": [
                { "heading": "Rotations", "items": ["Network operations", "Finance", "Customer experience"] }
            ],
            "skills": ["Leadership", "Analytics"],
            "featured": false
        })],
        ListingKind::NssProgram => vec![json!({
            "id": "sample-nss-1",
            "title": "Teaching Service Placement",
            "organization": "National Service Authority",
            "region": "Volta",
            "city": "Ho",
            "duration": "12 months",
            "stipend": "GHS 715 / month",
            "icon": "book",
            "color_theme": "green",
            "description_paragraphs": [
                "Teach core subjects at a basic school while completing your national service year."
            ],
            "eligibility": ["Graduates posted by the National Service Authority"],
            "requirements": ["Valid appointment letter"],
            "benefits": ["Monthly allowance"],
            "verified": true
        })],
        ListingKind::YeaProgram => vec![json!({
            "id": "sample-yea-1",
            "title": "Community Health Worker Module",
            "organization": "Youth Employment Agency",
            "region": "Central",
            "city": "Cape Coast",
            "duration": "24 months",
            "stipend": "GHS 600 / month",
            "description_paragraphs": [
                "Provide first-line health education and referrals in underserved communities."
            ],
            "eligibility": ["Aged 18 to 35", "Senior high school certificate"],
            "benefits": ["Monthly allowance", "On-the-job training"],
            "featured": true
        })],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_at_least_one_sample_with_an_id() {
        for kind in ListingKind::ordered() {
            let samples = sample_listings(kind);
            assert!(!samples.is_empty(), "{kind} has samples");
            assert!(samples.iter().all(|record| record.id.is_some()));
            assert!(samples.iter().all(|record| record.kind == kind));
        }
    }

    #[test]
    fn sample_summaries_follow_the_first_paragraph() {
        let job = &sample_listings(ListingKind::Job)[0];
        assert_eq!(job.short_summary, job.description_paragraphs[0]);
        assert_eq!(job.field_ops_groups.len(), 1);
        assert!(job.flags.verified);
    }
}
