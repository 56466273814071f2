/// Static region to district reference data for the cascading facet.
#[derive(Debug, Clone, Copy)]
pub struct RegionDirectory {
    table: &'static [(&'static str, &'static [&'static str])],
}

static GHANA: RegionDirectory = RegionDirectory::new(GHANA_REGIONS);

impl RegionDirectory {
    pub const fn new(table: &'static [(&'static str, &'static [&'static str])]) -> Self {
        Self { table }
    }

    /// Ghana's sixteen administrative regions.
    pub fn ghana() -> &'static Self {
        &GHANA
    }

    pub fn regions(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.table.iter().map(|(region, _)| *region)
    }

    /// Districts of `region`, matched ignoring case; empty when unknown.
    pub fn districts_for(&self, region: &str) -> &'static [&'static str] {
        let region = region.trim();
        self.table
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(region))
            .map(|(_, districts)| *districts)
            .unwrap_or(&[])
    }

    pub fn region_of(&self, district: &str) -> Option<&'static str> {
        let district = district.trim();
        self.table
            .iter()
            .find(|(_, districts)| {
                districts
                    .iter()
                    .any(|name| name.eq_ignore_ascii_case(district))
            })
            .map(|(region, _)| *region)
    }
}

const GHANA_REGIONS: &[(&str, &[&str])] = &[
    (
        "Greater Accra",
        &[
            "Accra Metropolitan",
            "Tema Metropolitan",
            "Ga East Municipal",
            "Ga West Municipal",
            "Adentan Municipal",
            "Ledzokuku Municipal",
        ],
    ),
    (
        "Ashanti",
        &[
            "Kumasi Metropolitan",
            "Obuasi Municipal",
            "Ejisu Municipal",
            "Asokore Mampong Municipal",
            "Bekwai Municipal",
        ],
    ),
    (
        "Western",
        &[
            "Sekondi-Takoradi Metropolitan",
            "Tarkwa-Nsuaem Municipal",
            "Ahanta West Municipal",
            "Prestea-Huni Valley Municipal",
        ],
    ),
    (
        "Western North",
        &[
            "Sefwi Wiawso Municipal",
            "Bibiani-Anhwiaso-Bekwai Municipal",
            "Juaboso",
        ],
    ),
    (
        "Central",
        &[
            "Cape Coast Metropolitan",
            "Effutu Municipal",
            "Komenda-Edina-Eguafo-Abirem Municipal",
            "Awutu Senya East Municipal",
        ],
    ),
    (
        "Eastern",
        &[
            "New Juaben South Municipal",
            "Akuapem North Municipal",
            "Kwahu West Municipal",
            "Birim Central Municipal",
        ],
    ),
    (
        "Volta",
        &[
            "Ho Municipal",
            "Hohoe Municipal",
            "Keta Municipal",
            "Ketu South Municipal",
        ],
    ),
    (
        "Oti",
        &[
            "Krachi East Municipal",
            "Nkwanta South Municipal",
            "Biakoye",
        ],
    ),
    (
        "Northern",
        &[
            "Tamale Metropolitan",
            "Yendi Municipal",
            "Savelugu Municipal",
            "Sagnarigu Municipal",
        ],
    ),
    (
        "Savannah",
        &["West Gonja Municipal", "East Gonja Municipal", "Bole"],
    ),
    (
        "North East",
        &[
            "East Mamprusi Municipal",
            "West Mamprusi Municipal",
            "Bunkpurugu-Nakpanduri",
        ],
    ),
    (
        "Upper East",
        &[
            "Bolgatanga Municipal",
            "Kassena-Nankana Municipal",
            "Bawku Municipal",
        ],
    ),
    (
        "Upper West",
        &["Wa Municipal", "Lawra Municipal", "Jirapa Municipal"],
    ),
    (
        "Bono",
        &[
            "Sunyani Municipal",
            "Berekum East Municipal",
            "Dormaa Central Municipal",
        ],
    ),
    (
        "Bono East",
        &[
            "Techiman Municipal",
            "Kintampo North Municipal",
            "Atebubu-Amantin Municipal",
        ],
    ),
    (
        "Ahafo",
        &[
            "Asunafo North Municipal",
            "Tano North Municipal",
            "Asutifi North",
        ],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ghana_table_lists_sixteen_regions() {
        assert_eq!(RegionDirectory::ghana().regions().count(), 16);
    }

    #[test]
    fn districts_lookup_ignores_case_and_unknown_regions() {
        let regions = RegionDirectory::ghana();
        assert!(regions
            .districts_for("greater accra")
            .contains(&"Accra Metropolitan"));
        assert!(regions.districts_for("Atlantis").is_empty());
        assert_eq!(regions.region_of("Ho Municipal"), Some("Volta"));
    }
}
