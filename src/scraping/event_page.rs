use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::base;
use crate::models::Event;

// Field selectors for meetup.com event pages. The markup has no semantic
// hooks for most fields, so these paths are keyed to the exact class lists
// the front end renders; a redesign breaks them here and nowhere else.
static CANONICAL_LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("head > meta:nth-child(28)").expect("canonical link selector"));
static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(
        "#main > div.px-5.w-full.border-b.border-shadowColor.bg-white.py-2.lg\\:py-6 > div > h1",
    )
    .expect("title selector")
});
static COVER_IMAGE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(
        "#main > div.flex.w-full.flex-col.items-center.justify-between.border-t.border-gray2.bg-gray1.pb-6.lg\\:px-5 \
         > div.md\\:max-w-screen.w-full.bg-gray1 > div \
         > div.flex.flex-grow.flex-col.lg\\:mt-5.lg\\:max-w-2xl \
         > div.emrv9za > div:nth-child(1) > picture > div > img",
    )
    .expect("cover image selector")
});
static DESCRIPTION_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("#event-details > div.break-words").expect("description selector"));
static DESCRIPTION_LINE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p, li").expect("description line selector"));
static LOCATION_BLOCK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(
        "#event-info > div.bg-white.px-5.pb-3.pt-6.sm\\:pb-4\\.5.lg\\:py-5.lg\\:rounded-t-2xl \
         > div:nth-child(1) > div.flex.flex-col > div \
         > div.overflow-hidden.pl-4.md\\:pl-4\\.5.lg\\:pl-5",
    )
    .expect("location block selector")
});

// The page embeds the start time as machine-readable JSON. Displayed date
// text is locale-formatted and is never consulted.
static DATE_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""dateTime":"(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:[+-]\d{2}:\d{2})?)""#)
        .expect("embedded timestamp regex")
});

/// Parses one event-detail page into an [`Event`].
///
/// Fails on the first required field whose selector finds nothing; a partial
/// record is never produced.
pub fn parse_event_page(html: &str) -> Result<Event> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let link = canonical_link(&root)?;
    let name = title_text(&root)?;
    let image = cover_image(&root)?;
    let description = description_text(&root);
    let place = location_info(&root)?;
    let date = embedded_start_time(html)?;

    Ok(Event {
        link,
        name,
        description,
        image,
        location: place.location,
        location_link: place.location_link,
        venue: place.venue,
        date,
    })
}

fn canonical_link(root: &ElementRef<'_>) -> Result<String> {
    base::first_attr(root, &CANONICAL_LINK_SELECTOR, "content")
        .ok_or_else(|| anyhow!("event page has no canonical link meta"))
}

fn title_text(root: &ElementRef<'_>) -> Result<String> {
    base::first_text(root, &TITLE_SELECTOR)
        .ok_or_else(|| anyhow!("event page has no title heading"))
}

fn cover_image(root: &ElementRef<'_>) -> Result<String> {
    base::first_attr(root, &COVER_IMAGE_SELECTOR, "src")
        .ok_or_else(|| anyhow!("event page has no cover image"))
}

/// Paragraphs and list items inside the details container, one line each in
/// document order, list items bulleted. A page without the container yields
/// an empty description rather than an error.
fn description_text(root: &ElementRef<'_>) -> String {
    let container = match root.select(&DESCRIPTION_SELECTOR).next() {
        Some(container) => container,
        None => return String::new(),
    };

    let mut lines = Vec::new();
    for element in container.select(&DESCRIPTION_LINE_SELECTOR) {
        let text = base::inner_text(element);
        if element.value().name() == "li" {
            lines.push(format!("• {text}"));
        } else {
            lines.push(text);
        }
    }
    lines.join("\n")
}

struct LocationInfo {
    location: String,
    location_link: Option<String>,
    venue: Option<String>,
}

/// Reads the venue info block. Online events keep the literal location text
/// and drop the venue link entirely, even when the block contains an anchor;
/// in-person events require the anchor, its href and its name.
fn location_info(root: &ElementRef<'_>) -> Result<LocationInfo> {
    let block = root
        .select(&LOCATION_BLOCK_SELECTOR)
        .next()
        .ok_or_else(|| anyhow!("event page has no location block"))?;

    let location_div = child_element(block, "div")
        .ok_or_else(|| anyhow!("location block has no address text"))?;
    let location = base::direct_text(location_div);

    if location.split_whitespace().next() == Some("Online") {
        return Ok(LocationInfo {
            location,
            location_link: None,
            venue: None,
        });
    }

    let anchor =
        child_element(block, "a").ok_or_else(|| anyhow!("location block has no venue link"))?;
    let location_link = anchor
        .value()
        .attr("href")
        .map(str::to_string)
        .ok_or_else(|| anyhow!("venue link has no href"))?;
    let venue = base::inner_text(anchor);
    if venue.is_empty() {
        return Err(anyhow!("venue link has no name"));
    }

    Ok(LocationInfo {
        location,
        location_link: Some(location_link),
        venue: Some(venue),
    })
}

fn child_element<'a>(parent: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .find(|child| child.value().name() == name)
}

fn embedded_start_time(html: &str) -> Result<DateTime<FixedOffset>> {
    let raw = match DATE_TIME_RE.captures(html).and_then(|caps| caps.get(1)) {
        Some(found) => found.as_str(),
        None => return Err(anyhow!("event page has no embedded start timestamp")),
    };

    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Ok(date);
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .with_context(|| format!("unparseable embedded timestamp {raw}"))?;
    Ok(naive.and_utc().fixed_offset())
}
