// martaba/src/rate_limit/mod.rs

//! Rate limiters used to keep rapid UI input from flooding downstream writes.
//!
//! Both limiters own their timer state. Each call site that needs independent
//! rate limiting creates its own instance; sharing one instance between
//! unrelated callers coalesces their invocations.

pub mod debounce;
pub mod throttle;

pub use debounce::{debounce, Debouncer};
pub use throttle::{throttle, Throttler};
