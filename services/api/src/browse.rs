use crate::infra::{build_store, parse_facet, parse_kind, ConsoleNotifier, OfflineStore};
use chrono::{DateTime, Utc};
use clap::Args;
use listings_portal::config::{AppConfig, PortalConfig};
use listings_portal::error::AppError;
use listings_portal::portal::directory::{DirectoryBrowser, DirectoryFacet, RegionDirectory};
use listings_portal::portal::listings::{
    ListingFacet, ListingId, ListingKind, ListingManager, ListingRecord, ScalarField,
};
use listings_portal::portal::{PortalService, RecordStore, Selection};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ListingsArgs {
    /// Listing kind, e.g. jobs, internships, graduate-programs, nss-programs, yea-programs
    #[arg(value_parser = parse_kind)]
    pub(crate) kind: ListingKind,
    /// Case-insensitive text matched against title, organization and location
    #[arg(long, short)]
    pub(crate) query: Option<String>,
    /// Facet filter as FACET=VALUE; repeatable
    #[arg(long = "facet", value_parser = parse_facet)]
    pub(crate) facets: Vec<(ListingFacet, Selection)>,
    /// One-based page number
    #[arg(long, default_value_t = 1)]
    pub(crate) page: usize,
    /// Print the editable form text for one listing instead of the page
    #[arg(long)]
    pub(crate) show: Option<String>,
    /// Treat the record store as unreachable
    #[arg(long)]
    pub(crate) offline: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DirectoryArgs {
    /// Case-insensitive text matched against name, city, district, region and address
    #[arg(long, short)]
    pub(crate) query: Option<String>,
    #[arg(long)]
    pub(crate) region: Option<String>,
    /// Only applied when it belongs to the selected region's district list
    #[arg(long)]
    pub(crate) district: Option<String>,
    #[arg(long)]
    pub(crate) facility_type: Option<String>,
    #[arg(long)]
    pub(crate) emergency_only: bool,
    #[arg(long, default_value_t = 1)]
    pub(crate) page: usize,
    #[arg(long)]
    pub(crate) offline: bool,
}

#[derive(Args, Debug)]
pub(crate) struct RegionsArgs {
    /// Print the districts of a single region
    pub(crate) region: Option<String>,
}

pub(crate) fn run_listings(args: ListingsArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    if args.offline {
        let service = portal_service(OfflineStore, config.portal);
        render_listings(&service, args);
    } else {
        let store = build_store(&config.portal)?;
        let service = portal_service(store, config.portal);
        render_listings(&service, args);
    }
    Ok(())
}

pub(crate) fn run_directory(args: DirectoryArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    if args.offline {
        let service = portal_service(OfflineStore, config.portal);
        render_directory(&service, args);
    } else {
        let store = build_store(&config.portal)?;
        let service = portal_service(store, config.portal);
        render_directory(&service, args);
    }
    Ok(())
}

pub(crate) fn run_regions(args: RegionsArgs) -> Result<(), AppError> {
    let regions = RegionDirectory::ghana();
    match args.region {
        Some(region) => {
            let districts = regions.districts_for(&region);
            if districts.is_empty() {
                return Err(AppError::UnknownRegion(region));
            }
            for district in districts {
                println!("- {district}");
            }
        }
        None => {
            for region in regions.regions() {
                println!("{} ({} districts)", region, regions.districts_for(region).len());
            }
        }
    }
    Ok(())
}

fn portal_service<S: RecordStore + 'static>(
    store: S,
    config: PortalConfig,
) -> PortalService<S, ConsoleNotifier> {
    PortalService::new(Arc::new(store), Arc::new(ConsoleNotifier), config)
}

fn render_listings<S: RecordStore + 'static>(
    service: &PortalService<S, ConsoleNotifier>,
    args: ListingsArgs,
) {
    let mut manager = service.listing_manager(args.kind);
    manager.load();

    if let Some(id) = args.show {
        render_form(&manager, &ListingId(id));
        return;
    }

    if let Some(query) = args.query {
        manager.set_search(query);
    }
    for (facet, selection) in args.facets {
        manager.set_facet(facet, selection);
    }
    manager.set_page(args.page);

    let info = manager.page_info();
    println!(
        "{} listings from {} | page {} of {} | {} matching",
        args.kind.label(),
        manager.source().label(),
        info.page,
        info.page_count.max(1),
        info.total
    );
    for record in manager.visible() {
        println!("{}", listing_line(record));
        if !record.short_summary.is_empty() {
            println!("    {}", record.short_summary);
        }
    }
}

fn render_form<S: RecordStore + 'static>(
    manager: &ListingManager<S, ConsoleNotifier>,
    id: &ListingId,
) {
    let Some(form) = manager.edit_form(id) else {
        println!("No {} listing with id '{id}'", manager.kind().label());
        return;
    };

    let schema = manager.schema();
    println!("Title: {}", form.title);
    println!("Organization: {}", form.organization);
    for spec in schema.scalar_fields {
        let marker = if spec.required { " *" } else { "" };
        println!("{}{}: {}", spec.field.label(), marker, form.scalar(spec.field));
    }
    println!("\nDescription:\n{}", form.description);
    for section in schema.bullet_sections {
        println!("\n{}:\n{}", section.label(), form.bullet_text(*section));
    }
    if schema.grouped_sections && !form.field_ops_groups.is_empty() {
        println!("\nField operations:\n{}", form.field_ops_groups);
    }
    if schema.skills {
        println!("\nSkills: {}", form.skills);
    }

    let missing = form.missing_requirements(schema);
    if !missing.is_empty() {
        let names: Vec<String> = missing.iter().map(ToString::to_string).collect();
        println!("\nSave disabled until filled: {}", names.join(", "));
    }
}

fn listing_line(record: &ListingRecord) -> String {
    let id = record
        .id
        .as_ref()
        .map(ListingId::as_str)
        .unwrap_or("unsaved");
    let mut line = format!("- [{id}] {}", record.title);
    if !record.organization.is_empty() {
        line.push_str(&format!(" | {}", record.organization));
    }
    let place = [ScalarField::Location, ScalarField::Region]
        .into_iter()
        .find_map(|field| record.scalar(field));
    if let Some(place) = place {
        line.push_str(&format!(" ({place})"));
    }
    if record.flags.featured {
        line.push_str(" [featured]");
    }
    if let Some(timestamps) = record.timestamps {
        line.push_str(&format!(", posted {}", posted_on(timestamps.created_at)));
    }
    line
}

fn posted_on(created_at: DateTime<Utc>) -> String {
    created_at.format("%Y-%m-%d").to_string()
}

fn render_directory<S: RecordStore + 'static>(
    service: &PortalService<S, ConsoleNotifier>,
    args: DirectoryArgs,
) {
    let mut browser: DirectoryBrowser<S, ConsoleNotifier> = service.directory();
    browser.load();

    if let Some(query) = args.query {
        browser.set_search(query);
    }
    if let Some(region) = args.region.as_deref() {
        browser.select_region(Selection::parse(region));
    }
    if let Some(district) = args.district.as_deref() {
        let offered = browser
            .district_options()
            .iter()
            .any(|option| option.eq_ignore_ascii_case(district.trim()));
        if offered {
            browser.select_district(Selection::parse(district));
        } else {
            eprintln!("[info] district '{district}' is not offered for the selected region; ignoring");
        }
    }
    if let Some(facility_type) = args.facility_type.as_deref() {
        browser.set_facet(DirectoryFacet::FacilityType, Selection::parse(facility_type));
    }
    if args.emergency_only {
        browser.set_facet(DirectoryFacet::Emergency, Selection::parse("true"));
    }
    browser.set_page(args.page);

    let info = browser.page_info();
    println!(
        "Facility directory from {} | page {} of {} | {} matching",
        browser.source().label(),
        info.page,
        info.page_count.max(1),
        info.total
    );
    for entry in browser.visible() {
        let mut line = format!("- {} | {}", entry.name, entry.facility_type);
        if !entry.district.is_empty() {
            line.push_str(&format!(" | {}, {}", entry.district, entry.region));
        }
        if entry.emergency {
            line.push_str(" | 24h emergency");
        }
        println!("{line}");
        if !entry.services.is_empty() {
            println!("    services: {}", entry.services.join(", "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use listings_portal::portal::listings::sample_listings;

    #[test]
    fn listing_line_summarizes_a_sample_job() {
        let records = sample_listings(ListingKind::Job);
        let line = listing_line(&records[0]);

        assert!(line.starts_with("- [sample-job-1] Registered Nurse, Emergency Unit"));
        assert!(line.contains("| Korle Bu Teaching Hospital"));
        assert!(line.contains("(Accra)"));
        assert!(line.contains("[featured]"));
    }

    #[test]
    fn regions_command_rejects_unknown_regions() {
        let result = run_regions(RegionsArgs {
            region: Some("Atlantis".to_string()),
        });
        assert!(matches!(result, Err(AppError::UnknownRegion(region)) if region == "Atlantis"));
        assert!(run_regions(RegionsArgs {
            region: Some("Volta".to_string()),
        })
        .is_ok());
    }

    #[test]
    fn posted_dates_render_as_calendar_days() {
        let created_at = Utc
            .with_ymd_and_hms(2025, 3, 9, 17, 45, 0)
            .single()
            .expect("valid timestamp");
        assert_eq!(posted_on(created_at), "2025-03-09");
    }
}
