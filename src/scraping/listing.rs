use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::base;

static CARD_ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("card anchor selector"));

// The listing markup has no stable container around its event cards; each
// card carries a 1-based positional id instead.
fn card_selector(index: usize) -> Selector {
    Selector::parse(&format!("#event-card-e-{index}")).expect("event card selector")
}

/// Walks `event-card-e-1`, `event-card-e-2`, ... and collects each card's
/// link, in page order. The probe ends at the first index with no card or no
/// linked anchor; an empty page yields an empty list, not an error.
pub fn parse_events_page(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links: Vec<String> = Vec::new();

    loop {
        let selector = card_selector(links.len() + 1);
        let card = match document.select(&selector).next() {
            Some(card) => card,
            None => break,
        };
        match base::first_attr(&card, &CARD_ANCHOR_SELECTOR, "href") {
            Some(href) => links.push(href),
            None => break,
        }
    }

    links
}
