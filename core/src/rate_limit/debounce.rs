// martaba/src/rate_limit/debounce.rs

//! Trailing-edge debounce: the callback runs once, `window` after the last call,
//! with the arguments of that last call.

use crate::error::{MartabaError, MartabaResult};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{event, Level};

/// Wraps a callback `F` so bursts of calls collapse into one trailing call.
///
/// The pending call lives on the tokio runtime captured at construction. Each
/// new call aborts the pending timer and schedules a fresh one. Dropping the
/// debouncer cancels whatever is still pending.
pub struct Debouncer<A, F>
where
  A: Send + 'static,
  F: Fn(A) + Send + Sync + 'static,
{
  callback: Arc<F>,
  window: Duration,
  runtime: Handle,
  state: Arc<Mutex<DebounceState<A>>>,
}

struct DebounceState<A> {
  // Bumped on every call/cancel so a timer that already woke up can tell it was superseded.
  generation: u64,
  pending_args: Option<A>,
  timer: Option<JoinHandle<()>>,
  disposed: bool,
}

impl<A> DebounceState<A> {
  fn supersede(&mut self) -> Option<A> {
    self.generation = self.generation.wrapping_add(1);
    if let Some(timer) = self.timer.take() {
      timer.abort();
    }
    self.pending_args.take()
  }
}

impl<A, F> Debouncer<A, F>
where
  A: Send + 'static,
  F: Fn(A) + Send + Sync + 'static,
{
  /// Creates a debouncer bound to the current tokio runtime.
  pub fn new(callback: F, window: Duration) -> MartabaResult<Self> {
    let runtime = Handle::try_current().map_err(|_| MartabaError::RuntimeUnavailable)?;
    Ok(Self::with_handle(callback, window, runtime))
  }

  /// Creates a debouncer whose timers run on `runtime`.
  pub fn with_handle(callback: F, window: Duration, runtime: Handle) -> Self {
    Self {
      callback: Arc::new(callback),
      window,
      runtime,
      state: Arc::new(Mutex::new(DebounceState {
        generation: 0,
        pending_args: None,
        timer: None,
        disposed: false,
      })),
    }
  }

  /// Replaces any pending call with one carrying `args`, due `window` from now.
  ///
  /// With a zero window the callback runs synchronously, after cancelling
  /// anything still pending.
  pub fn call(&self, args: A) {
    let mut state = self.state.lock();
    if state.disposed {
      event!(Level::TRACE, "Debouncer disposed; call ignored.");
      return;
    }
    state.supersede();

    if self.window.is_zero() {
      drop(state);
      (self.callback)(args);
      return;
    }

    state.pending_args = Some(args);
    let generation = state.generation;
    let shared = Arc::clone(&self.state);
    let callback = Arc::clone(&self.callback);
    let window = self.window;

    state.timer = Some(self.runtime.spawn(async move {
      tokio::time::sleep(window).await;
      let args = {
        let mut state = shared.lock();
        if state.generation != generation {
          return;
        }
        state.timer = None;
        state.pending_args.take()
      };
      if let Some(args) = args {
        event!(Level::TRACE, "Debounce window elapsed; invoking callback.");
        callback(args);
      }
    }));
  }

  /// Runs the pending call immediately. Returns `false` if nothing was pending.
  pub fn flush(&self) -> bool {
    let args = self.state.lock().supersede();
    match args {
      Some(args) => {
        (self.callback)(args);
        true
      }
      None => false,
    }
  }

  /// Drops the pending call without running it.
  pub fn cancel(&self) {
    if self.state.lock().supersede().is_some() {
      event!(Level::TRACE, "Pending debounced call cancelled.");
    }
  }

  /// Cancels the pending call and ignores every later call.
  pub fn dispose(&self) {
    let mut state = self.state.lock();
    state.supersede();
    state.disposed = true;
    event!(Level::DEBUG, "Debouncer disposed.");
  }

  pub fn is_pending(&self) -> bool {
    self.state.lock().pending_args.is_some()
  }

  pub fn is_disposed(&self) -> bool {
    self.state.lock().disposed
  }

  pub fn window(&self) -> Duration {
    self.window
  }
}

impl<A, F> Drop for Debouncer<A, F>
where
  A: Send + 'static,
  F: Fn(A) + Send + Sync + 'static,
{
  fn drop(&mut self) {
    self.state.lock().supersede();
  }
}

impl<A, F> std::fmt::Debug for Debouncer<A, F>
where
  A: Send + 'static,
  F: Fn(A) + Send + Sync + 'static,
{
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let state = self.state.lock();
    f.debug_struct("Debouncer")
      .field("window", &self.window)
      .field("pending", &state.pending_args.is_some())
      .field("disposed", &state.disposed)
      .finish()
  }
}

/// Creates a `Debouncer` around `callback` on the current tokio runtime.
pub fn debounce<A, F>(callback: F, window: Duration) -> MartabaResult<Debouncer<A, F>>
where
  A: Send + 'static,
  F: Fn(A) + Send + Sync + 'static,
{
  Debouncer::new(callback, window)
}
