pub mod base;
pub mod event_page;
pub mod listing;

use anyhow::Result;
use tracing::{debug, info};

use crate::models::Event;

pub use event_page::parse_event_page;
pub use listing::parse_events_page;

/// Seam for the two HTTP GETs the scraper performs, so tests can substitute
/// canned pages keyed by URL.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<String>;
}

pub struct HttpFetcher;

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        base::fetch_html(url)
    }
}

/// Scrapes a group's events-listing page and every event it links to.
///
/// Pages are fetched one at a time, in listing order, and each detail page is
/// parsed before the next fetch. Any fetch failure or malformed detail page
/// aborts the whole batch.
pub fn get_events(group_url: &str) -> Result<Vec<Event>> {
    get_events_with(&HttpFetcher, group_url)
}

pub fn get_events_with<F: PageFetcher>(fetcher: &F, group_url: &str) -> Result<Vec<Event>> {
    debug!(url = group_url, "fetching events listing");
    let listing = fetcher.fetch(group_url)?;
    let links = listing::parse_events_page(&listing);
    info!(count = links.len(), "found event links");

    let mut events = Vec::with_capacity(links.len());
    for link in links {
        debug!(url = %link, "fetching event page");
        let page = fetcher.fetch(&link)?;
        events.push(event_page::parse_event_page(&page)?);
    }

    Ok(events)
}
