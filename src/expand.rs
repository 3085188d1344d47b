//! Synthesizes extra ranked choices for people with short lists.
//!
//! Expansion is best-effort: a list grows one item at a time until it reaches
//! `min(target_len, items)` or nothing is left to add.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::ConflictAnalysis;
use crate::config::ExpansionConfig;
use crate::error::AssignError;
use crate::store::{PreferenceStore, Preferences};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpansionMethod {
    /// Items favoured by people with overlapping lists.
    Similarity,
    /// Least requested item first.
    Popularity,
    Random,
    /// Popularity rule most of the time, random otherwise.
    Balanced,
}

impl ExpansionMethod {
    pub const ALL: [ExpansionMethod; 4] = [
        ExpansionMethod::Similarity,
        ExpansionMethod::Popularity,
        ExpansionMethod::Random,
        ExpansionMethod::Balanced,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ExpansionMethod::Similarity => "similarity",
            ExpansionMethod::Popularity => "popularity",
            ExpansionMethod::Random => "random",
            ExpansionMethod::Balanced => "balanced",
        }
    }
}

impl fmt::Display for ExpansionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExpansionMethod {
    type Err = AssignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|method| method.name() == wanted)
            .ok_or_else(|| AssignError::UnknownExpansionMethod(s.to_string()))
    }
}

/// Returns a copy of every preference list, grown where it is shorter than the target.
///
/// People already at or above the target come back unchanged. Original
/// entries always keep their ranks; synthesized items are appended.
pub fn expand_preferences<R: Rng + ?Sized>(
    store: &PreferenceStore,
    analysis: &ConflictAnalysis,
    method: ExpansionMethod,
    config: &ExpansionConfig,
    rng: &mut R,
) -> Preferences {
    let target = config.target_len.min(store.item_count());
    let preferences = store.preferences();
    let mut expanded_people = 0usize;
    let mut expanded = Preferences::with_capacity(preferences.len());

    for (person, original) in preferences {
        let mut list = original.clone();

        while list.len() < target {
            let candidates: Vec<&String> = store
                .items()
                .iter()
                .filter(|item| !list.contains(item))
                .collect();
            if candidates.is_empty() {
                break;
            }

            let picked = match method {
                ExpansionMethod::Popularity => least_popular(&candidates, analysis),
                ExpansionMethod::Similarity => {
                    similar_choice(person, preferences, &candidates, config.similarity_threshold)
                        .or_else(|| candidates.choose(rng).copied())
                }
                ExpansionMethod::Balanced => {
                    if rng.gen::<f64>() < config.balanced_popularity_share {
                        least_popular(&candidates, analysis)
                    } else {
                        candidates.choose(rng).copied()
                    }
                }
                ExpansionMethod::Random => candidates.choose(rng).copied(),
            };

            let Some(item) = picked else { break };
            list.push(item.clone());
        }

        if list.len() > original.len() {
            expanded_people += 1;
        }
        expanded.insert(person.clone(), list);
    }

    debug!(
        method = %method,
        target,
        expanded = expanded_people,
        people = preferences.len(),
        "preferences expanded"
    );

    expanded
}

/// First candidate with the lowest request count.
fn least_popular<'a>(candidates: &[&'a String], analysis: &ConflictAnalysis) -> Option<&'a String> {
    candidates
        .iter()
        .min_by_key(|item| analysis.popularity_of(item))
        .copied()
}

/// Candidate with the highest similarity-weighted vote from neighbours of `person`.
///
/// Similarity is Jaccard over the original lists; only neighbours above
/// `threshold` vote. Returns `None` when no candidate receives a vote.
fn similar_choice<'a>(
    person: &str,
    preferences: &Preferences,
    candidates: &[&'a String],
    threshold: f64,
) -> Option<&'a String> {
    let own: HashSet<&str> = preferences
        .get(person)
        .map(|list| list.iter().map(String::as_str).collect())
        .unwrap_or_default();

    let neighbours: Vec<(&Vec<String>, f64)> = preferences
        .iter()
        .filter(|(other, _)| other.as_str() != person)
        .filter_map(|(_, list)| {
            let theirs: HashSet<&str> = list.iter().map(String::as_str).collect();
            jaccard(&own, &theirs)
                .filter(|&similarity| similarity > threshold)
                .map(|similarity| (list, similarity))
        })
        .collect();

    let mut best: Option<(&'a String, f64)> = None;
    for &candidate in candidates {
        let vote: f64 = neighbours
            .iter()
            .filter(|(list, _)| list.contains(candidate))
            .map(|(_, similarity)| similarity)
            .sum();
        if vote > 0.0 && best.map_or(true, |(_, top)| vote > top) {
            best = Some((candidate, vote));
        }
    }
    best.map(|(item, _)| item)
}

/// `|a ∩ b| / |a ∪ b|`, or `None` when both sets are empty.
pub fn jaccard(a: &HashSet<&str>, b: &HashSet<&str>) -> Option<f64> {
    let union = a.union(b).count();
    if union == 0 {
        return None;
    }
    let intersection = a.intersection(b).count();
    Some(intersection as f64 / union as f64)
}
