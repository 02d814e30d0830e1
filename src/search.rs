use crate::debounce::DebounceScheduler;
use crate::filter::{FilterSummary, MessageFilter};
use crate::message::Message;
use crate::query::{Query, SearchFields};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tokio::time::Duration;
use tracing::debug;

/// State shared between the search box and debounced passes.
struct Shared {
    messages: Mutex<Vec<Message>>,
    filter: MessageFilter,
    evaluations: AtomicUsize,
    /// Bumped by every text edit and immediate pass. A pass only lands if it
    /// still carries the current value.
    generation: AtomicU64,
    summary_tx: watch::Sender<FilterSummary>,
}

impl Shared {
    fn lock_messages(&self) -> MutexGuard<'_, Vec<Message>> {
        self.messages.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Apply `query` unless a newer edit has superseded `generation`.
    fn run_pass(&self, query: &Query, generation: u64) -> Option<FilterSummary> {
        let mut messages = self.lock_messages();
        let current = self.generation.load(Ordering::SeqCst);
        if generation != current {
            debug!(
                "Skipping stale search pass (generation {}, current {})",
                generation, current
            );
            return None;
        }

        let summary = self.filter.apply(&mut messages, query);
        let n = self.evaluations.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Search pass #{} done: {:?}", n, summary);
        // Publish under the lock so summaries arrive in pass order.
        self.summary_tx.send_replace(summary);
        Some(summary)
    }
}

/// Live search over a message list. Text edits are debounced, date edits
/// apply at once.
pub struct LiveSearch {
    shared: Arc<Shared>,
    fields: SearchFields,
    scheduler: DebounceScheduler,
}

impl LiveSearch {
    pub fn new(messages: Vec<Message>, quiet_interval: Duration) -> Self {
        let initial = FilterSummary {
            visible: messages.iter().filter(|m| m.visible).count(),
            hidden: messages.iter().filter(|m| !m.visible).count(),
        };
        let (summary_tx, _) = watch::channel(initial);

        Self {
            shared: Arc::new(Shared {
                messages: Mutex::new(messages),
                filter: MessageFilter::new(),
                evaluations: AtomicUsize::new(0),
                generation: AtomicU64::new(0),
                summary_tx,
            }),
            fields: SearchFields::default(),
            scheduler: DebounceScheduler::new(quiet_interval),
        }
    }

    /// Text input changed. The pass runs once input has been quiet for the
    /// configured interval, using the query as of this call.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.fields.text = text.into();
        let query = Query::from_fields(&self.fields);
        let generation = self.shared.next_generation();
        let shared = self.shared.clone();
        self.scheduler.trigger(async move {
            shared.run_pass(&query, generation);
        });
    }

    pub fn set_date_from(&mut self, raw: impl Into<String>) -> FilterSummary {
        self.fields.date_from = raw.into();
        self.search_now()
    }

    pub fn set_date_to(&mut self, raw: impl Into<String>) -> FilterSummary {
        self.fields.date_to = raw.into();
        self.search_now()
    }

    /// Evaluate the current fields immediately, superseding any pending pass.
    pub fn search_now(&mut self) -> FilterSummary {
        self.scheduler.cancel();
        // A debounced pass already past its sleep cannot be aborted; the new
        // generation makes it a no-op instead.
        let generation = self.shared.next_generation();
        self.shared
            .run_pass(&Query::from_fields(&self.fields), generation)
            .unwrap_or_else(|| self.summary())
    }

    pub fn is_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    pub async fn settle(&mut self) {
        self.scheduler.settle().await;
    }

    pub fn subscribe(&self) -> watch::Receiver<FilterSummary> {
        self.shared.summary_tx.subscribe()
    }

    pub fn summary(&self) -> FilterSummary {
        *self.shared.summary_tx.borrow()
    }

    pub fn evaluations(&self) -> usize {
        self.shared.evaluations.load(Ordering::SeqCst)
    }

    pub fn visible_messages(&self) -> Vec<Message> {
        self.shared
            .lock_messages()
            .iter()
            .filter(|m| m.visible)
            .cloned()
            .collect()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.shared.lock_messages().clone()
    }
}
