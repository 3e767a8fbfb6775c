use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use thiserror::Error;
use tracing::info;

use crate::models::Event;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("http error: {0}")]
    Http(String),
    #[error("telegram api error: {0}")]
    Api(String),
}

/// Where an event's start time falls relative to "now", computed in the
/// event's own timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTiming {
    Past,
    Today,
    Tomorrow,
    InDays(i64),
}

pub fn classify_event_date(
    date: DateTime<FixedOffset>,
    now: DateTime<FixedOffset>,
) -> EventTiming {
    let tz = date.timezone();
    let now = now.with_timezone(&tz);
    let tomorrow_start = day_start(now.date_naive() + Duration::days(1), &tz);
    let day_after_start = day_start(now.date_naive() + Duration::days(2), &tz);

    if date < now {
        EventTiming::Past
    } else if date < tomorrow_start {
        EventTiming::Today
    } else if date < day_after_start {
        EventTiming::Tomorrow
    } else {
        EventTiming::InDays((date - now).num_days())
    }
}

fn day_start(date: NaiveDate, tz: &FixedOffset) -> DateTime<FixedOffset> {
    tz.from_local_datetime(&date.and_hms_opt(0, 0, 0).expect("valid time"))
        .single()
        .expect("fixed offsets have no ambiguous times")
}

pub fn time_until_event(event: &Event, now: DateTime<FixedOffset>) -> String {
    let event_time = event.date.format("%H:%M");
    match classify_event_date(event.date, now) {
        EventTiming::Past => format!(
            "❗️ **El evento ya ocurrió** el {} a las {event_time} 🕒",
            event.date.format("%Y-%m-%d")
        ),
        EventTiming::Today => format!("🎉 **¡El evento es hoy a las** {event_time}**!**"),
        EventTiming::Tomorrow => format!("⏰ **¡El evento es mañana a las** {event_time}**!**"),
        EventTiming::InDays(days) => format!("📅 **El evento será dentro de {days} días**"),
    }
}

fn caption(event: &Event, now: DateTime<FixedOffset>) -> String {
    let mut lines = vec![
        time_until_event(event, now),
        format!("📝 [Apúntate aqui]({})", event.link),
    ];
    if let (Some(venue), Some(link)) = (&event.venue, &event.location_link) {
        lines.push(format!("📍 [{venue}]({link})"));
    }
    lines.push(format!("🗺️ {}", event.location));
    lines.join("\n")
}

pub struct TelegramNotifier {
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(token: String, chat_id: String) -> Self {
        Self { token, chat_id }
    }

    /// Sends one `sendPhoto` message for the event: the cover image with a
    /// Markdown caption.
    pub fn send(&self, event: &Event) -> Result<(), NotifyError> {
        let now = Utc::now().with_timezone(&event.date.timezone());
        let url = format!("https://api.telegram.org/bot{}/sendPhoto", self.token);
        let caption = caption(event, now);

        let client = reqwest::blocking::Client::new();
        let response = client
            .post(url)
            .form(&[
                ("chat_id", self.chat_id.as_str()),
                ("caption", caption.as_str()),
                ("photo", event.image.as_str()),
                ("parse_mode", "Markdown"),
            ])
            .send()
            .map_err(|err| NotifyError::Http(err.to_string()))?;

        let status = response.status();
        let body: serde_json::Value = response
            .json()
            .map_err(|err| NotifyError::Http(err.to_string()))?;

        if !status.is_success() {
            return Err(NotifyError::Api(body.to_string()));
        }

        info!(event = %event.name, "event sent to telegram");
        Ok(())
    }
}
