// martaba_storefront/src/notify.rs

//! Toast notifications: the user-visible end of every service call.

use crate::errors::Result;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{error, info};

/// Toasts kept before the oldest is dropped.
pub const TOAST_CAPACITY: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
  Success,
  Info,
  Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
  pub level: ToastLevel,
  pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct Notifier {
  toasts: Arc<Mutex<VecDeque<Toast>>>,
}

impl Notifier {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&self, level: ToastLevel, message: impl Into<String>) {
    let mut toasts = self.toasts.lock();
    if toasts.len() == TOAST_CAPACITY {
      toasts.pop_front();
    }
    toasts.push_back(Toast {
      level,
      message: message.into(),
    });
  }

  pub fn success(&self, message: impl Into<String>) {
    self.push(ToastLevel::Success, message);
  }

  pub fn info(&self, message: impl Into<String>) {
    self.push(ToastLevel::Info, message);
  }

  pub fn error(&self, message: impl Into<String>) {
    self.push(ToastLevel::Error, message);
  }

  /// Turns the outcome of a service call into a toast and hands the value
  /// back on success. Failures are logged in full and shown in short.
  pub fn report<T>(&self, result: Result<T>, success_message: &str) -> Option<T> {
    match result {
      Ok(value) => {
        info!(message = success_message, "Operation succeeded.");
        self.success(success_message);
        Some(value)
      }
      Err(e) => {
        error!(error = %e, "Operation failed.");
        self.error(e.user_message());
        None
      }
    }
  }

  /// Removes and returns every pending toast, oldest first.
  pub fn drain(&self) -> Vec<Toast> {
    self.toasts.lock().drain(..).collect()
  }

  pub fn len(&self) -> usize {
    self.toasts.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.toasts.lock().is_empty()
  }
}
