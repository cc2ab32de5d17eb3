// martaba/src/rate_limit/throttle.rs

//! Leading-edge throttle: the first call fires immediately, then every call
//! inside the suppression window is dropped.

use parking_lot::Mutex;
use std::marker::PhantomData;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{event, Level};

/// Wraps a callback `F` so it runs at most once per `window`.
///
/// Dropped calls are discarded, not deferred: their arguments never reach the
/// callback. The clock is `tokio::time::Instant`, so a paused tokio clock
/// (tests) controls the window as well.
pub struct Throttler<A, F>
where
  F: Fn(A) + Send + Sync + 'static,
{
  callback: F,
  window: Duration,
  state: Mutex<ThrottleState>,
  _phantom_args: PhantomData<fn(A)>,
}

#[derive(Debug, Default)]
struct ThrottleState {
  window_opened_at: Option<Instant>,
  disposed: bool,
}

impl<A, F> Throttler<A, F>
where
  F: Fn(A) + Send + Sync + 'static,
{
  pub fn new(callback: F, window: Duration) -> Self {
    Self {
      callback,
      window,
      state: Mutex::new(ThrottleState::default()),
      _phantom_args: PhantomData,
    }
  }

  /// Invokes the callback if no suppression window is open.
  ///
  /// Returns `true` if the callback ran, `false` if the call was dropped.
  pub fn call(&self, args: A) -> bool {
    {
      let mut state = self.state.lock();
      if state.disposed {
        event!(Level::TRACE, "Throttler disposed; call ignored.");
        return false;
      }
      if !self.window.is_zero() {
        let now = Instant::now();
        if let Some(opened_at) = state.window_opened_at {
          if now.duration_since(opened_at) < self.window {
            event!(Level::TRACE, window_ms = self.window.as_millis() as u64, "Call dropped inside suppression window.");
            return false;
          }
        }
        state.window_opened_at = Some(now);
      }
    }
    // Lock released before running user code; the callback may re-enter.
    (self.callback)(args);
    true
  }

  /// Whether a call made right now would be dropped.
  pub fn is_suppressed(&self) -> bool {
    let state = self.state.lock();
    if state.disposed {
      return true;
    }
    match state.window_opened_at {
      Some(opened_at) if !self.window.is_zero() => Instant::now().duration_since(opened_at) < self.window,
      _ => false,
    }
  }

  /// Closes the current suppression window; the next call fires.
  pub fn cancel(&self) {
    self.state.lock().window_opened_at = None;
  }

  /// Tears the throttler down. Every later call is a no-op.
  pub fn dispose(&self) {
    let mut state = self.state.lock();
    state.window_opened_at = None;
    state.disposed = true;
    event!(Level::DEBUG, "Throttler disposed.");
  }

  pub fn is_disposed(&self) -> bool {
    self.state.lock().disposed
  }

  pub fn window(&self) -> Duration {
    self.window
  }
}

impl<A, F> std::fmt::Debug for Throttler<A, F>
where
  F: Fn(A) + Send + Sync + 'static,
{
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let state = self.state.lock();
    f.debug_struct("Throttler")
      .field("window", &self.window)
      .field("window_open", &state.window_opened_at.is_some())
      .field("disposed", &state.disposed)
      .finish()
  }
}

/// Creates a `Throttler` around `callback`. A zero `window` fires every call.
pub fn throttle<A, F>(callback: F, window: Duration) -> Throttler<A, F>
where
  F: Fn(A) + Send + Sync + 'static,
{
  Throttler::new(callback, window)
}
