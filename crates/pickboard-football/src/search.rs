// Forgiving player search over name, team, and position.
//
// Each field gets a score in [0, 0.3): a plain substring hit scores below 0.1
// (earlier is better), an in-order subsequence hit scores from 0.1 upward as
// the gaps between matched characters grow. Lower is better.

use crate::draft::player::Player;

/// Queries shorter than this (after trimming) do not search.
pub const MIN_QUERY_CHARS: usize = 2;

/// Players matching `query`, best match first, ties in pool order.
///
/// Returns an empty list for queries shorter than [`MIN_QUERY_CHARS`].
pub fn search<'a>(players: &'a [Player], query: &str) -> Vec<&'a Player> {
    let needle: Vec<char> = query.trim().to_lowercase().chars().collect();
    if needle.len() < MIN_QUERY_CHARS {
        return Vec::new();
    }

    let mut hits: Vec<(f64, &Player)> = players
        .iter()
        .filter_map(|p| player_score(p, &needle).map(|score| (score, p)))
        .collect();
    // Stable sort keeps pool order among equal scores.
    hits.sort_by(|a, b| a.0.total_cmp(&b.0));
    hits.into_iter().map(|(_, p)| p).collect()
}

/// Best (lowest) score across the searchable fields of a player.
fn player_score(player: &Player, needle: &[char]) -> Option<f64> {
    [
        player.name.as_str(),
        player.team.as_str(),
        player.position.label(),
    ]
    .into_iter()
    .filter_map(|field| field_score(field, needle))
    .min_by(f64::total_cmp)
}

fn field_score(field: &str, needle: &[char]) -> Option<f64> {
    let hay: Vec<char> = field.to_lowercase().chars().collect();
    if hay.len() < needle.len() {
        return None;
    }

    if let Some(start) = hay.windows(needle.len()).position(|w| w == needle) {
        return Some(0.1 * start as f64 / hay.len() as f64);
    }

    let span = tightest_subsequence_span(&hay, needle)?;
    let skipped = span - needle.len();
    if skipped > needle.len() {
        return None;
    }
    Some(0.1 + 0.2 * skipped as f64 / span as f64)
}

/// Length of the shortest window of `hay` containing `needle` as an in-order
/// subsequence.
fn tightest_subsequence_span(hay: &[char], needle: &[char]) -> Option<usize> {
    let first = *needle.first()?;
    let mut best: Option<usize> = None;

    for (start, _) in hay.iter().enumerate().filter(|(_, c)| **c == first) {
        let mut matched = 1;
        let mut end = start;
        for (i, &c) in hay.iter().enumerate().skip(start + 1) {
            if matched == needle.len() {
                break;
            }
            if c == needle[matched] {
                matched += 1;
                end = i;
            }
        }
        if matched < needle.len() {
            // Later starts cannot match either.
            break;
        }
        let span = end - start + 1;
        best = Some(best.map_or(span, |b: usize| b.min(span)));
    }
    best
}
