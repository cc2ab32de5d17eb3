// martaba_storefront/src/search.rs

//! The header search box: keystrokes are debounced before a search is issued.

use crate::errors::Result;
use martaba::Debouncer;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

pub const SEARCH_DEBOUNCE_WINDOW: Duration = Duration::from_millis(400);

type PublishFn = Box<dyn Fn(String) + Send + Sync + 'static>;

pub struct SearchBox {
  query: String,
  publish: Arc<dyn Fn(String) + Send + Sync + 'static>,
  debouncer: Debouncer<String, PublishFn>,
}

impl SearchBox {
  /// `on_search` receives the normalized query once typing pauses for `window`.
  pub fn new<F>(window: Duration, on_search: F) -> Result<Self>
  where
    F: Fn(String) + Send + Sync + 'static,
  {
    let publish: Arc<dyn Fn(String) + Send + Sync + 'static> = Arc::new(on_search);
    let debounced = Arc::clone(&publish);
    let callback: PublishFn = Box::new(move |query: String| debounced(query));
    Ok(Self {
      query: String::new(),
      publish,
      debouncer: Debouncer::new(callback, window)?,
    })
  }

  /// Publishes queries on a channel instead of a callback.
  pub fn with_channel(window: Duration) -> Result<(Self, mpsc::UnboundedReceiver<String>)> {
    let (sender, receiver) = mpsc::unbounded_channel();
    let search_box = Self::new(window, move |query| {
      // A closed receiver means nobody is listening anymore.
      let _ = sender.send(query);
    })?;
    Ok((search_box, receiver))
  }

  pub fn on_input(&mut self, text: &str) {
    self.query = text.to_string();
    self.debouncer.call(normalize(text));
  }

  /// Enter key: search now instead of waiting for the debounce window.
  pub fn submit(&mut self) {
    if self.debouncer.is_disposed() {
      return;
    }
    if !self.debouncer.flush() {
      (self.publish)(normalize(&self.query));
    }
    debug!(query = %self.query, "Search submitted.");
  }

  /// Clear button: cancels any pending search and publishes an empty query.
  pub fn clear(&mut self) {
    self.query.clear();
    if self.debouncer.is_disposed() {
      return;
    }
    self.debouncer.cancel();
    (self.publish)(String::new());
  }

  pub fn query(&self) -> &str {
    &self.query
  }

  pub fn is_pending(&self) -> bool {
    self.debouncer.is_pending()
  }

  /// Teardown: the pending timeout is cleared and later input publishes nothing.
  pub fn dispose(&self) {
    self.debouncer.dispose();
  }
}

impl std::fmt::Debug for SearchBox {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SearchBox")
      .field("query", &self.query)
      .field("debouncer", &self.debouncer)
      .finish()
  }
}

/// Trims and collapses inner whitespace.
pub fn normalize(text: &str) -> String {
  text.split_whitespace().collect::<Vec<_>>().join(" ")
}
