use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use meetup_notifier::scraping::{base, parse_event_page};
use meetup_notifier::{get_events, TelegramNotifier};

/// Scrapes a Meetup group's upcoming events and notifies a Telegram chat.
#[derive(Debug, Parser)]
#[command(name = "meetup-notifier")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug output
    #[arg(long, short = 'v')]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Send one Telegram message per upcoming event
    Notify {
        /// URL of the group's upcoming-events page
        events_url: String,

        /// Telegram bot token
        #[arg(long, env = "TELEGRAM_TOKEN", hide_env_values = true)]
        telegram_token: String,

        /// Telegram chat id to notify
        #[arg(long, env = "TELEGRAM_CHAT_ID")]
        telegram_chat_id: String,
    },

    /// Print the scraped events as JSON
    Dump {
        /// URL of the group's upcoming-events page
        events_url: String,
    },

    /// Fetch a single event page and print it as JSON
    ParseEvent {
        /// URL of the event's detail page
        event_url: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(Level::WARN.to_string()))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Notify {
            events_url,
            telegram_token,
            telegram_chat_id,
        } => {
            let events = get_events(&events_url)?;
            let notifier = TelegramNotifier::new(telegram_token, telegram_chat_id);
            for event in &events {
                notifier.send(event)?;
            }
            Ok(())
        }
        Command::Dump { events_url } => {
            let events = get_events(&events_url)?;
            if events.is_empty() {
                anyhow::bail!("no upcoming events found at {events_url}");
            }
            println!("{}", serde_json::to_string_pretty(&events)?);
            Ok(())
        }
        Command::ParseEvent { event_url } => {
            let page = base::fetch_html(&event_url)?;
            let event = parse_event_page(&page)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
            Ok(())
        }
    }
}
