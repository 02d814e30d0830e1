use crate::message::Message;
use crate::query::Query;
use tracing::debug;

/// Added to the end date so that the whole selected day is included.
pub const ONE_DAY_MILLIS: i64 = 24 * 3600 * 1000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSummary {
    pub visible: usize,
    pub hidden: usize,
}

/// Decides which messages stay visible for a query. All predicates must pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageFilter;

impl MessageFilter {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(&self, messages: &[Message], query: &Query) -> Vec<bool> {
        // Lower-case the needle once per pass, not per message.
        let needle = query.substring.to_lowercase();
        messages
            .iter()
            .map(|m| check(m, query, &needle))
            .collect()
    }

    pub fn matches(&self, message: &Message, query: &Query) -> bool {
        check(message, query, &query.substring.to_lowercase())
    }

    /// Write the verdicts into each message's `visible` flag.
    pub fn apply(&self, messages: &mut [Message], query: &Query) -> FilterSummary {
        let verdicts = self.evaluate(messages, query);
        let mut summary = FilterSummary::default();
        for (message, visible) in messages.iter_mut().zip(verdicts) {
            message.visible = visible;
            if visible {
                summary.visible += 1;
            } else {
                summary.hidden += 1;
            }
        }

        debug!(
            "Filter pass {:?}: {} visible, {} hidden",
            query, summary.visible, summary.hidden
        );
        summary
    }
}

fn check(message: &Message, query: &Query, needle: &str) -> bool {
    passes_from(message, query.from_millis)
        && passes_to(message, query.to_millis)
        && passes_substring(message, needle)
}

// A message exactly on the lower bound is excluded.
fn passes_from(message: &Message, from_millis: Option<i64>) -> bool {
    match from_millis {
        Some(from) => message.timestamp_millis > from,
        None => true,
    }
}

fn passes_to(message: &Message, to_millis: Option<i64>) -> bool {
    match to_millis {
        Some(to) => message.timestamp_millis < to.saturating_add(ONE_DAY_MILLIS),
        None => true,
    }
}

fn passes_substring(message: &Message, needle: &str) -> bool {
    needle.is_empty() || message.text.to_lowercase().contains(needle)
}
