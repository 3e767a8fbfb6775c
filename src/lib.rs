pub mod models;
pub mod notify;
pub mod scraping;

pub use models::Event;
pub use notify::{EventTiming, NotifyError, TelegramNotifier};
pub use scraping::{get_events, get_events_with, HttpFetcher, PageFetcher};
