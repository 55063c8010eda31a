//! `mm-spatial` — road network storage, spatial indexing, and routing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`link`]    | `LinkStore` (SoA link data), `LinkStoreBuilder`           |
//! | [`graph`]   | `LinkGraph` (CSR adjacency), `GraphCosts` scratch overlay |
//! | [`index`]   | `LinkIndex` — R-tree over link geometry segments          |
//! | [`network`] | `Network` — the adapter the matcher talks to              |
//! | [`router`]  | `Router` trait, `PathLeg`, `DijkstraRouter`               |
//! | [`loader`]  | Link CSV loader (WKT LINESTRING geometry)                 |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                        |

pub mod error;
pub mod graph;
pub mod index;
pub mod link;
pub mod loader;
pub mod network;
pub mod router;


pub use error::{SpatialError, SpatialResult};
pub use graph::{GraphCosts, LinkGraph};
pub use index::LinkIndex;
pub use link::{LinkDirection, LinkStore, LinkStoreBuilder};
pub use loader::{load_links_csv, load_links_reader};
pub use network::Network;
pub use router::{DijkstraRouter, PathLeg, Router};
