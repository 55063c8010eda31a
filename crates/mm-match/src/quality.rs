//! Coverage test and match-quality scores.

use mm_core::Polyline;

use crate::candidates::PingMatch;

/// Mark every matchable ping covered/uncovered against a buffer of width
/// `buffer` around the reconstructed path, and return
/// `(match_quality, match_quality_raw)`.
///
/// `match_quality` divides covered pings by the matchable count;
/// `match_quality_raw` by the full conditioned trace length, charging the
/// unmatchable pings against the score.  Both are clamped to `[0, 1]`.
pub fn evaluate(
    matches: &mut [PingMatch],
    path_shape: &Polyline,
    buffer: f64,
    trace_len: usize,
) -> (f64, f64) {
    let mut covered = 0usize;
    for m in matches.iter_mut() {
        m.covered = path_shape.distance_to(m.xy) <= buffer;
        if m.covered {
            covered += 1;
        }
    }

    if matches.is_empty() {
        return (0.0, 0.0);
    }
    let quality = (covered as f64 / matches.len() as f64).min(1.0);
    let raw = (covered as f64 / trace_len.max(1) as f64).min(1.0);
    (quality, raw)
}
