//! `mm-trace` — GPS trace model, conditioning, and loading.
//!
//! # Crate layout
//!
//! | Module         | Contents                                              |
//! |----------------|-------------------------------------------------------|
//! | [`trace`]      | `RawPing`, `Ping`, `Trace`                            |
//! | [`conditioner`]| One-shot trace validation and derivation (`condition`)|
//! | [`loader`]     | Trace CSV loader, timestamp parsing                   |
//! | [`error`]      | `TraceError`, `TraceResult<T>`                        |
//!
//! A trace is conditioned exactly once and read-only afterwards; data-quality
//! findings accumulate as strings on the trace and never abort a batch.

pub mod conditioner;
pub mod error;
pub mod loader;
pub mod trace;

#[cfg(test)]
mod tests;

pub use conditioner::condition;
pub use error::{TraceError, TraceResult};
pub use loader::{load_traces_csv, load_traces_reader};
pub use trace::{Ping, RawPing, Trace};
