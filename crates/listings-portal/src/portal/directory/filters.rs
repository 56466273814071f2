use super::domain::DirectoryFacet;
use super::regions::RegionDirectory;
use crate::portal::query::{ListingQuery, Selection};

/// Search text and facet selections for the public directory.
///
/// Region and district cascade: choosing a region resets the district to
/// "all" and leaves every other selection alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryFilters {
    query: ListingQuery<DirectoryFacet>,
}

impl DirectoryFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &ListingQuery<DirectoryFacet> {
        &self.query
    }

    pub fn search_text(&self) -> &str {
        self.query.text()
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.query.set_text(text);
    }

    pub fn selection(&self, facet: DirectoryFacet) -> &Selection {
        self.query.facet(facet)
    }

    pub fn select_region(&mut self, region: Selection) {
        self.query.set_facet(DirectoryFacet::Region, region);
        self.query.set_facet(DirectoryFacet::District, Selection::All);
    }

    pub fn select_district(&mut self, district: Selection) {
        self.query.set_facet(DirectoryFacet::District, district);
    }

    /// Routes region changes through the cascade.
    pub fn set_facet(&mut self, facet: DirectoryFacet, selection: Selection) {
        match facet {
            DirectoryFacet::Region => self.select_region(selection),
            other => self.query.set_facet(other, selection),
        }
    }

    /// Candidate districts for the selected region; none until a region is chosen.
    pub fn district_options(&self, regions: &RegionDirectory) -> &'static [&'static str] {
        match self.selection(DirectoryFacet::Region).value() {
            Some(region) => regions.districts_for(region),
            None => &[],
        }
    }

    pub fn clear(&mut self) {
        self.query.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selecting_a_region_resets_only_the_district() {
        let mut filters = DirectoryFilters::new();
        filters.set_search("teaching");
        filters.set_facet(DirectoryFacet::Ownership, Selection::parse("Public"));
        filters.select_region(Selection::parse("Ashanti"));
        filters.select_district(Selection::parse("Kumasi Metropolitan"));

        filters.select_region(Selection::parse("Volta"));

        assert!(filters.selection(DirectoryFacet::District).is_all());
        assert_eq!(
            filters.selection(DirectoryFacet::Region).value(),
            Some("Volta")
        );
        assert_eq!(
            filters.selection(DirectoryFacet::Ownership).value(),
            Some("Public")
        );
        assert_eq!(filters.search_text(), "teaching");
    }

    #[test]
    fn district_options_follow_the_selected_region() {
        let regions = RegionDirectory::ghana();
        let mut filters = DirectoryFilters::new();
        assert!(filters.district_options(regions).is_empty());

        filters.set_facet(DirectoryFacet::Region, Selection::parse("Northern"));
        assert!(filters
            .district_options(regions)
            .contains(&"Tamale Metropolitan"));

        filters.select_region(Selection::All);
        assert!(filters.district_options(regions).is_empty());
    }
}
