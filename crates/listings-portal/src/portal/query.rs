//! Client-side faceted filtering and pagination over a loaded snapshot.
//!
//! The engine is shared by the admin listing managers and the public
//! directory. Collections plug in through [`Filterable`]; facets compose by
//! conjunction and the free-text query matches if any searchable field
//! contains it, ignoring case.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::Serialize;

/// Value accepted by a facet selector. `All` is the "no filter" sentinel.
/// Both concrete forms compare ignoring case.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    Exact(String),
    Contains(String),
}

impl Selection {
    /// Interprets raw selector input; blank and `all` mean no filter.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Exact(trimmed.to_string())
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Exact(value) | Self::Contains(value) => Some(value),
        }
    }

    pub fn matches(&self, candidate: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Exact(expected) => {
                candidate.is_some_and(|value| value.trim().eq_ignore_ascii_case(expected))
            }
            Self::Contains(needle) => candidate.is_some_and(|value| {
                value.to_lowercase().contains(&needle.to_lowercase())
            }),
        }
    }
}

/// A collection element the engine knows how to search and facet.
pub trait Filterable {
    type Facet: Copy + Ord;

    /// Fields consulted by the free-text query.
    fn search_fields(&self) -> Vec<&str>;

    /// Value compared against a facet selection; `None` never matches a concrete value.
    fn facet_value(&self, facet: Self::Facet) -> Option<Cow<'_, str>>;
}

/// Free-text query plus independent facet selections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery<F: Ord> {
    text: String,
    facets: BTreeMap<F, Selection>,
}

impl<F: Ord> Default for ListingQuery<F> {
    fn default() -> Self {
        Self {
            text: String::new(),
            facets: BTreeMap::new(),
        }
    }
}

static ALL: Selection = Selection::All;

impl<F: Copy + Ord> ListingQuery<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn facet(&self, facet: F) -> &Selection {
        self.facets.get(&facet).unwrap_or(&ALL)
    }

    pub fn set_facet(&mut self, facet: F, selection: Selection) {
        if selection.is_all() {
            self.facets.remove(&facet);
        } else {
            self.facets.insert(facet, selection);
        }
    }

    pub fn active_facets(&self) -> impl Iterator<Item = (F, &Selection)> + '_ {
        self.facets.iter().map(|(facet, selection)| (*facet, selection))
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.facets.clear();
    }

    pub fn matches<T>(&self, item: &T) -> bool
    where
        T: Filterable<Facet = F>,
    {
        self.matches_text(item)
            && self.facets.iter().all(|(facet, selection)| {
                let value = item.facet_value(*facet);
                selection.matches(value.as_deref())
            })
    }

    fn matches_text<T: Filterable>(&self, item: &T) -> bool {
        if self.text.is_empty() {
            return true;
        }
        let needle = self.text.to_lowercase();
        item.search_fields()
            .into_iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Keeps the elements satisfying the query text and every active facet.
pub fn apply_filters<'a, T, I>(collection: I, query: &ListingQuery<T::Facet>) -> Vec<&'a T>
where
    T: Filterable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    collection
        .into_iter()
        .filter(|item| query.matches(*item))
        .collect()
}

/// Returns the one-based `page_number` window of `page_size` items.
///
/// Callers clamp the page number first; an out-of-range request yields an
/// empty or short slice.
pub fn paginate<T>(items: &[T], page_size: usize, page_number: usize) -> &[T] {
    if page_size == 0 || page_number == 0 {
        return &[];
    }
    let start = (page_number - 1).saturating_mul(page_size);
    let end = start.saturating_add(page_size).min(items.len());
    items.get(start..end).unwrap_or(&[])
}

pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Clamps a requested page into `[1, page_count]`, treating an empty result as one page.
pub fn clamp_page(requested: usize, total: usize, page_size: usize) -> usize {
    requested.clamp(1, page_count(total, page_size).max(1))
}

/// Pagination summary returned alongside a visible page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub page_count: usize,
}

impl PageInfo {
    pub fn new(page: usize, page_size: usize, total: usize) -> Self {
        Self {
            page,
            page_size,
            total,
            page_count: page_count(total, page_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    enum Facet {
        Region,
        Verified,
    }

    #[derive(Debug, PartialEq)]
    struct Clinic {
        name: &'static str,
        city: &'static str,
        region: &'static str,
        verified: bool,
    }

    impl Filterable for Clinic {
        type Facet = Facet;

        fn search_fields(&self) -> Vec<&str> {
            vec![self.name, self.city, self.region]
        }

        fn facet_value(&self, facet: Facet) -> Option<Cow<'_, str>> {
            match facet {
                Facet::Region => Some(Cow::Borrowed(self.region)),
                Facet::Verified => Some(Cow::Owned(self.verified.to_string())),
            }
        }
    }

    fn clinics() -> Vec<Clinic> {
        vec![
            Clinic {
                name: "Ridge Hospital",
                city: "Accra",
                region: "Greater Accra",
                verified: true,
            },
            Clinic {
                name: "Komfo Anokye",
                city: "Kumasi",
                region: "Ashanti",
                verified: true,
            },
            Clinic {
                name: "Tamale Teaching",
                city: "Tamale",
                region: "Northern",
                verified: false,
            },
        ]
    }

    #[test]
    fn text_query_ignores_case_and_matches_any_field() {
        let clinics = clinics();
        let mut query = ListingQuery::new();
        query.set_text("ACCRA");

        let found = apply_filters(&clinics, &query);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Ridge Hospital");

        query.set_text("teaching");
        assert_eq!(apply_filters(&clinics, &query)[0].city, "Tamale");
    }

    #[test]
    fn facets_compose_by_conjunction_with_query() {
        let clinics = clinics();
        let mut query = ListingQuery::new();
        query.set_facet(Facet::Verified, Selection::parse("true"));
        assert_eq!(apply_filters(&clinics, &query).len(), 2);

        query.set_facet(Facet::Region, Selection::Exact("Ashanti".to_string()));
        let found = apply_filters(&clinics, &query);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Komfo Anokye");

        query.set_text("ridge");
        assert!(apply_filters(&clinics, &query).is_empty());
    }

    #[test]
    fn exact_selection_ignores_case() {
        let clinics = clinics();
        let mut query = ListingQuery::new();
        query.set_facet(Facet::Region, Selection::parse("greater ACCRA"));

        let found = apply_filters(&clinics, &query);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Ridge Hospital");
    }

    #[test]
    fn contains_selection_matches_substrings() {
        let clinics = clinics();
        let mut query = ListingQuery::new();
        query.set_facet(Facet::Region, Selection::Contains("accra".to_string()));
        assert_eq!(apply_filters(&clinics, &query).len(), 1);
    }

    #[test]
    fn sentinel_selection_removes_the_facet() {
        let mut query: ListingQuery<Facet> = ListingQuery::new();
        query.set_facet(Facet::Region, Selection::parse("Northern"));
        assert_eq!(query.active_facets().count(), 1);
        query.set_facet(Facet::Region, Selection::parse("all"));
        assert_eq!(query.active_facets().count(), 0);
        assert!(query.facet(Facet::Region).is_all());
    }

    #[test]
    fn filtering_is_idempotent() {
        let clinics = clinics();
        let mut query = ListingQuery::new();
        query.set_text("a");
        query.set_facet(Facet::Verified, Selection::parse("true"));

        let once = apply_filters(&clinics, &query);
        let twice = apply_filters(once.iter().copied(), &query);
        assert_eq!(once, twice);
    }

    #[test]
    fn second_page_of_forty_five_covers_indices_twenty_to_thirty_nine() {
        let items: Vec<usize> = (0..45).collect();
        let page = paginate(&items, 20, 2);
        assert_eq!(page.len(), 20);
        assert_eq!(page.first(), Some(&20));
        assert_eq!(page.last(), Some(&39));

        assert_eq!(paginate(&items, 20, 3), &[40, 41, 42, 43, 44]);
        assert!(paginate(&items, 20, 4).is_empty());
        assert!(paginate(&items, 20, 0).is_empty());
    }

    #[test]
    fn clamp_page_keeps_requests_in_range() {
        assert_eq!(page_count(45, 20), 3);
        assert_eq!(clamp_page(7, 45, 20), 3);
        assert_eq!(clamp_page(0, 45, 20), 1);
        assert_eq!(clamp_page(4, 0, 20), 1);
        assert_eq!(PageInfo::new(2, 20, 45).page_count, 3);
    }
}
