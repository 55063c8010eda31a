//! Path-geometry reconstruction.
//!
//! Concatenates the routed links' geometries (reversed where the leg ran
//! b→a) and trims the two ends to the arc-length projections of the first
//! and last pings the previous evaluation marked covered.  Before any
//! evaluation has run no ping is covered and the shape is left untrimmed.

use mm_core::{LinkIdx, Polyline};
use mm_spatial::Network;

use crate::candidates::PingMatch;

/// Build the continuous path geometry for a routed link sequence.
pub fn build_path_shape(
    network: &Network,
    links: &[LinkIdx],
    directions: &[i8],
    matches: &[PingMatch],
) -> Polyline {
    let first_covered = matches.iter().find(|m| m.covered).map(|m| m.xy);
    let last_covered = matches.iter().rev().find(|m| m.covered).map(|m| m.xy);

    let n = links.len();
    let mut shape = Polyline::empty();

    for (i, (&link, &dir)) in links.iter().zip(directions).enumerate() {
        let oriented = if dir < 0 {
            network.link_geometry(link).reversed()
        } else {
            network.link_geometry(link).clone()
        };

        let mut piece = oriented;
        if i == 0 {
            if let Some(p) = first_covered {
                piece = piece.substring(piece.project(p), piece.length());
                // A zero-length trim contributes nothing.
                if piece.is_empty() {
                    continue;
                }
            }
        }
        if i == n - 1 {
            if let Some(p) = last_covered {
                piece = piece.substring(0.0, piece.project(p));
                if piece.is_empty() {
                    continue;
                }
            }
        }

        shape.extend_with(&piece);
    }
    shape
}
