//! Record extraction from harvested markup.
//!
//! One page yields zero or more company records. The directory serves at
//! least three markup layouts for the same data (full profile pages and
//! two generations of listing rows), so container location is a
//! prioritized strategy dispatch: the first layout with a match claims
//! the page. A malformed container skips only itself.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use unicode_normalization::UnicodeNormalization;

use crate::error::{HarvestError, HarvestResult};
use crate::records::{CompanyRecord, PendingRecord};
use crate::utils::constants::{FOUNDED_YEAR_MAX, FOUNDED_YEAR_MIN};

// ============================================================================
// CSS Selectors
// ============================================================================

// Parsed once at first access and cached forever. Hardcoded selectors should
// never fail to parse - if one does, it's a compile-time bug.

static PROFILE_NAME_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1.profile-header__title[itemprop='name']")
        .expect("BUG: hardcoded CSS selector for profile name is invalid")
});

static WEBSITE_LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a.website-link__item[href]")
        .expect("BUG: hardcoded CSS selector for website link is invalid")
});

static DETAILS_SECTION_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("ul.profile-summary__details")
        .expect("BUG: hardcoded CSS selector for details section is invalid")
});

static DETAIL_ITEM_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("li.profile-summary__detail")
        .expect("BUG: hardcoded CSS selector for detail item is invalid")
});

static DETAIL_LABEL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("span.profile-summary__detail-label")
        .expect("BUG: hardcoded CSS selector for detail label is invalid")
});

static DETAIL_VALUE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("span.profile-summary__detail-title")
        .expect("BUG: hardcoded CSS selector for detail value is invalid")
});

static SERVICE_ITEM_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("li.chart-legend--item")
        .expect("BUG: hardcoded CSS selector for service legend item is invalid")
});

static SERVICE_NAME_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h3").expect("BUG: hardcoded CSS selector 'h3' is invalid"));

static SERVICE_PERCENTAGE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("span").expect("BUG: hardcoded CSS selector 'span' is invalid")
});

static LIST_ROW_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("li.provider-row")
        .expect("BUG: hardcoded CSS selector for provider row is invalid")
});

static LIST_ROW_NAME_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h3.provider__title a")
        .expect("BUG: hardcoded CSS selector for provider row name is invalid")
});

static LIST_ALT_ROW_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("li.provider.provider-list-item")
        .expect("BUG: hardcoded CSS selector for alternate provider row is invalid")
});

static LIST_ALT_NAME_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a.provider__title-link")
        .expect("BUG: hardcoded CSS selector for alternate row name is invalid")
});

static YEAR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d{4}\b").expect("BUG: hardcoded year regex is invalid")
});

// ============================================================================
// Layout dispatch
// ============================================================================

/// The markup layouts a harvested page may use, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    /// A full company profile page; one record, carries the details
    /// section and services legend.
    Profile,
    /// A listing page built from `li.provider-row` items.
    ProviderList,
    /// The older listing markup built from `li.provider` items.
    ProviderListAlt,
}

/// Find the company containers on a page, trying each layout in priority
/// order. The first layout with at least one match claims the page.
fn locate_containers(document: &Html) -> Option<(Layout, Vec<ElementRef<'_>>)> {
    if document.select(&PROFILE_NAME_SELECTOR).next().is_some() {
        return Some((Layout::Profile, vec![document.root_element()]));
    }

    let rows: Vec<_> = document.select(&LIST_ROW_SELECTOR).collect();
    if !rows.is_empty() {
        return Some((Layout::ProviderList, rows));
    }

    let rows: Vec<_> = document.select(&LIST_ALT_ROW_SELECTOR).collect();
    if !rows.is_empty() {
        return Some((Layout::ProviderListAlt, rows));
    }

    None
}

// ============================================================================
// Extraction
// ============================================================================

/// Extract all company records from one page's markup.
///
/// Never fails: markup matching none of the known layouts, including
/// empty or malformed input, yields an empty vec. Each record is paired
/// with its unresolved redirect link; `website_url` is always left unset
/// here.
#[must_use]
pub fn extract_records(page: &str) -> Vec<PendingRecord> {
    let document = Html::parse_document(page);

    let Some((layout, containers)) = locate_containers(&document) else {
        debug!("Page matched no known layout, nothing to extract");
        return Vec::new();
    };

    debug!("Extracting {} container(s) as {layout:?}", containers.len());

    let mut pending = Vec::new();
    for container in containers {
        match extract_container(layout, container) {
            Ok(entry) => pending.push(entry),
            Err(e) => warn!("Skipping container: {e}"),
        }
    }
    pending
}

fn extract_container(layout: Layout, container: ElementRef<'_>) -> HarvestResult<PendingRecord> {
    let name_selector = match layout {
        Layout::Profile => &*PROFILE_NAME_SELECTOR,
        Layout::ProviderList => &*LIST_ROW_NAME_SELECTOR,
        Layout::ProviderListAlt => &*LIST_ALT_NAME_SELECTOR,
    };

    let name = container
        .select(name_selector)
        .next()
        .map(|el| element_text(el).nfkc().collect::<String>())
        .filter(|text| !text.is_empty());

    let redirect = container
        .select(&WEBSITE_LINK_SELECTOR)
        .next()
        .and_then(|el| el.value().attr("href"))
        .map(str::to_string);

    if name.is_none() && redirect.is_none() {
        return Err(HarvestError::Extraction(
            "container has neither a name nor a website link".to_string(),
        ));
    }

    let mut record = CompanyRecord {
        name,
        ..Default::default()
    };

    // Only full profile pages carry the summary details and services chart.
    if layout == Layout::Profile {
        extract_details(container, &mut record);
        record.services = extract_services(container);
    }

    Ok(PendingRecord { record, redirect })
}

/// Parse the profile summary as label/value pairs.
fn extract_details(container: ElementRef<'_>, record: &mut CompanyRecord) {
    let Some(section) = container.select(&DETAILS_SECTION_SELECTOR).next() else {
        return;
    };

    for item in section.select(&DETAIL_ITEM_SELECTOR) {
        let Some(label) = item.select(&DETAIL_LABEL_SELECTOR).next() else {
            continue;
        };
        let Some(value) = item.select(&DETAIL_VALUE_SELECTOR).next() else {
            continue;
        };

        let label_text = element_text(label).to_lowercase();
        let value_text = element_text(value);

        if label_text.contains("location") {
            record.location = Some(value_text);
        } else if label_text.contains("founded") {
            record.founded_year = Some(parse_founded_year(&value_text));
        }
    }
}

/// Parse the service pie-chart legend into `"{name} ({percentage})"`
/// strings in document order.
fn extract_services(container: ElementRef<'_>) -> Vec<String> {
    container
        .select(&SERVICE_ITEM_SELECTOR)
        .filter_map(|item| {
            let name = item.select(&SERVICE_NAME_SELECTOR).next().map(element_text)?;
            let percentage = item
                .select(&SERVICE_PERCENTAGE_SELECTOR)
                .next()
                .map(element_text)?;
            (!name.is_empty() && !percentage.is_empty())
                .then(|| format!("{name} ({percentage})"))
        })
        .collect()
}

/// Pull the founding year out of a detail value like "Founded 1998".
///
/// The first 4-digit number inside the plausible-year range wins; values
/// without one are kept verbatim.
fn parse_founded_year(value: &str) -> String {
    for m in YEAR_REGEX.find_iter(value) {
        if let Ok(year) = m.as_str().parse::<u32>()
            && (FOUNDED_YEAR_MIN..=FOUNDED_YEAR_MAX).contains(&year)
        {
            return m.as_str().to_string();
        }
    }
    value.to_string()
}

/// An element's text content with whitespace collapsed.
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// TESTS
// ============================================================================
