use std::io::Read;

use serde::Deserialize;

use super::domain::{split_services, DirectoryEntry};

const SAMPLE_DIRECTORY_CSV: &str = "\
id,name,facility_type,ownership,region,district,city,address,phone,services,verified,emergency
sample-hospital-1,Korle Bu Teaching Hospital,Teaching Hospital,Public,Greater Accra,Accra Metropolitan,Accra,Guggisberg Avenue,+233 302 674 061,Emergency;Surgery;Maternity;Oncology,true,true
sample-hospital-2,Ridge Hospital,Regional Hospital,Public,Greater Accra,Accra Metropolitan,Accra,Castle Road,+233 302 228 382,Emergency;Maternity;Paediatrics,true,true
sample-hospital-3,Komfo Anokye Teaching Hospital,Teaching Hospital,Public,Ashanti,Kumasi Metropolitan,Kumasi,Bantama,+233 322 022 301,Emergency;Surgery;Trauma,true,true
sample-hospital-4,Tamale Teaching Hospital,Teaching Hospital,Public,Northern,Tamale Metropolitan,Tamale,Salaga Road,+233 372 022 454,Emergency;Surgery,true,true
sample-hospital-5,Ho Teaching Hospital,Teaching Hospital,Public,Volta,Ho Municipal,Ho,Trafalgar Road,+233 362 026 000,Emergency;Renal;Maternity,true,false
sample-hospital-6,St. Martin de Porres Hospital,District Hospital,Mission,Eastern,Birim Central Municipal,Akim Oda,Eikwe Road,,Maternity;Outpatient,false,false
sample-hospital-7,Nyaho Medical Centre,Clinic,Private,Greater Accra,Ledzokuku Municipal,Teshie,Airport Residential,+233 302 775 341,Outpatient;Laboratory,true,false
sample-hospital-8,Cape Coast Teaching Hospital,Teaching Hospital,Public,Central,Cape Coast Metropolitan,Cape Coast,Interberton Road,+233 332 134 500,Emergency;Surgery;Maternity,true,true
";

/// Failure while reading the built-in directory rows.
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("invalid sample directory CSV: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Deserialize)]
struct SampleRow {
    id: String,
    name: String,
    facility_type: String,
    ownership: String,
    region: String,
    district: String,
    city: String,
    address: String,
    phone: String,
    services: String,
    verified: bool,
    emergency: bool,
}

impl From<SampleRow> for DirectoryEntry {
    fn from(row: SampleRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            facility_type: row.facility_type,
            ownership: row.ownership,
            region: row.region,
            district: row.district,
            city: row.city,
            address: row.address,
            phone: row.phone,
            services: split_services(&row.services),
            verified: row.verified,
            emergency: row.emergency,
        }
    }
}

/// Built-in facilities shown when the store cannot be reached.
pub fn sample_directory() -> Result<Vec<DirectoryEntry>, SampleError> {
    parse_directory_csv(SAMPLE_DIRECTORY_CSV.as_bytes())
}

pub(crate) fn parse_directory_csv<R: Read>(reader: R) -> Result<Vec<DirectoryEntry>, SampleError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut entries = Vec::new();

    for row in csv_reader.deserialize::<SampleRow>() {
        entries.push(DirectoryEntry::from(row?));
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_directory_parses() {
        let entries = sample_directory().expect("samples parse");
        assert_eq!(entries.len(), 8);
        assert_eq!(entries[0].name, "Korle Bu Teaching Hospital");
        assert_eq!(
            entries[0].services,
            vec!["Emergency", "Surgery", "Maternity", "Oncology"]
        );
        assert!(entries[5].phone.is_empty());
    }

    #[test]
    fn malformed_rows_surface_csv_errors() {
        let csv = "id,name\nonly-two-columns,Clinic\n";
        assert!(matches!(
            parse_directory_csv(csv.as_bytes()),
            Err(SampleError::Csv(_))
        ));
    }
}
