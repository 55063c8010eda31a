//! `mm-batch` — batch orchestration over many traces.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`matcher`] | `MapMatcher` — load, fan out, collect; `CancelToken`      |
//! | [`output`]  | `CsvResultWriter` — matched links / summary / unmatchable |
//! | [`error`]   | `BatchError`, `BatchResult<T>`                            |
//!
//! With the `parallel` feature the trace set is partitioned into disjoint
//! chunks processed on Rayon's thread pool.  The `Network` is shared
//! read-only; every worker owns its match driver and therefore its own
//! scratch cost overlay, so no routing state crosses workers.

pub mod error;
pub mod matcher;
pub mod output;

#[cfg(test)]
mod tests;

pub use error::{BatchError, BatchResult};
pub use matcher::{CancelToken, MapMatcher};
pub use output::CsvResultWriter;
