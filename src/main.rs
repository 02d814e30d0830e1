use anyhow::Context as AnyhowContext;
use chrono::{DateTime, Utc};
use msgview::config::Config;
use msgview::message::load_messages;
use msgview::{FilterSummary, LiveSearch};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let path = std::env::args()
        .nth(1)
        .or_else(|| config.messages_path.clone())
        .context("Pass a message archive path or set MSGVIEW_MESSAGES")?;

    let messages = load_messages(&path)?;
    let mut search = LiveSearch::new(messages, config.quiet_interval);
    let mut summaries = search.subscribe();

    info!(
        "Searching {} (quiet interval {})",
        path,
        humantime::format_duration(config.quiet_interval)
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            // Report finished passes before reading more input.
            biased;

            Ok(()) = summaries.changed() => {
                let summary = *summaries.borrow_and_update();
                print_results(&search, summary, config.show_hidden_count);
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                handle_line(&mut search, &line);
            }
        }
    }

    // Input closed; let a pending pass finish and report anything unseen.
    search.settle().await;
    if summaries.has_changed().unwrap_or(false) {
        let summary = *summaries.borrow_and_update();
        print_results(&search, summary, config.show_hidden_count);
    }

    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    DateFrom(&'a str),
    DateTo(&'a str),
    Text(&'a str),
}

/// `:from <date>` and `:to <date>` edit the date fields (no date clears the
/// bound); any other line is the new text query.
fn parse_line(line: &str) -> Input<'_> {
    let (head, rest) = line.split_once(' ').unwrap_or((line, ""));
    match head {
        ":from" => Input::DateFrom(rest.trim()),
        ":to" => Input::DateTo(rest.trim()),
        _ => Input::Text(line),
    }
}

fn handle_line(search: &mut LiveSearch, line: &str) {
    match parse_line(line) {
        Input::DateFrom(raw) => {
            search.set_date_from(raw);
        }
        Input::DateTo(raw) => {
            search.set_date_to(raw);
        }
        Input::Text(text) => search.set_text(text),
    }
}

fn print_results(search: &LiveSearch, summary: FilterSummary, show_hidden_count: bool) {
    for message in search.visible_messages() {
        let date = DateTime::<Utc>::from_timestamp_millis(message.timestamp_millis)
            .map(|dt| dt.format("%Y-%m-%d %H.%M.%S").to_string())
            .unwrap_or_else(|| message.timestamp_millis.to_string());
        match &message.sender {
            Some(sender) => println!("{} ({}): {}", sender, date, message.text),
            None => println!("({}): {}", date, message.text),
        }
    }

    if show_hidden_count {
        println!("-- {} shown, {} hidden", summary.visible, summary.hidden);
    } else {
        println!("-- {} shown", summary.visible);
    }
}
