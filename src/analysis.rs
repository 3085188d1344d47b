//! Conflict and risk analysis over a loaded preference set.
//!
//! The analysis is a read-only snapshot: how often each item is requested,
//! which items are contested or critical, which people are likely to end up
//! outside their own list, and a short list of suggestions for organisers.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::config::AnalysisThresholds;
use crate::error::AssignError;
use crate::store::{PreferenceStore, Preferences};

/// A person with a short list that is mostly contested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AtRiskPerson {
    pub person: String,
    pub preferences: usize,
    pub conflicts: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConflictAnalysis {
    pub n_people: usize,
    pub n_items: usize,
    /// Request count per item, in first-request order. Only requested items appear.
    pub popularity: IndexMap<String, usize>,
    /// The most requested items, highest count first.
    pub most_requested: Vec<(String, usize)>,
    /// Items wanted by more than one person.
    pub conflicting: IndexMap<String, usize>,
    /// Items wanted by at least `critical_share` of all people.
    pub critical: IndexMap<String, usize>,
    pub at_risk: Vec<AtRiskPerson>,
    pub never_requested: Vec<String>,
    pub mean_preferences: f64,
    pub suggestions: Vec<String>,
}

impl ConflictAnalysis {
    pub fn is_at_risk(&self, person: &str) -> bool {
        self.at_risk.iter().any(|p| p.person == person)
    }

    pub fn popularity_of(&self, item: &str) -> usize {
        self.popularity.get(item).copied().unwrap_or(0)
    }
}

/// Counts how many preference lists name each item.
/// Returns item -> request count (higher count = more contested).
pub fn item_popularity(preferences: &Preferences) -> IndexMap<String, usize> {
    let mut popularity = IndexMap::new();
    for list in preferences.values() {
        for item in list {
            *popularity.entry(item.clone()).or_insert(0) += 1;
        }
    }
    popularity
}

/// Analyzes the store's preferences. Fails with [`AssignError::NoData`] when nobody is loaded.
pub fn analyze(
    store: &PreferenceStore,
    thresholds: &AnalysisThresholds,
) -> Result<ConflictAnalysis, AssignError> {
    if store.is_empty() {
        return Err(AssignError::NoData);
    }

    let preferences = store.preferences();
    let n_people = store.people_count();
    let n_items = store.item_count();
    let popularity = item_popularity(preferences);

    let conflicting: IndexMap<String, usize> = popularity
        .iter()
        .filter(|(_, &count)| count > 1)
        .map(|(item, &count)| (item.clone(), count))
        .collect();

    let critical_floor = n_people as f64 * thresholds.critical_share;
    let critical: IndexMap<String, usize> = popularity
        .iter()
        .filter(|(_, &count)| count as f64 >= critical_floor)
        .map(|(item, &count)| (item.clone(), count))
        .collect();

    // An empty list counts as at risk: zero conflicts >= 0.8 * 0.
    let at_risk: Vec<AtRiskPerson> = preferences
        .iter()
        .filter(|(_, list)| list.len() <= thresholds.at_risk_max_preferences)
        .filter_map(|(person, list)| {
            let conflicts = list
                .iter()
                .filter(|item| conflicting.contains_key(*item))
                .count();
            let floor = list.len() as f64 * thresholds.at_risk_conflict_share;
            (conflicts as f64 >= floor).then(|| AtRiskPerson {
                person: person.clone(),
                preferences: list.len(),
                conflicts,
            })
        })
        .collect();

    let never_requested: Vec<String> = store
        .items()
        .iter()
        .filter(|item| !popularity.contains_key(*item))
        .cloned()
        .collect();

    let mut most_requested: Vec<(String, usize)> = popularity
        .iter()
        .map(|(item, &count)| (item.clone(), count))
        .collect();
    most_requested.sort_by(|a, b| b.1.cmp(&a.1));
    most_requested.truncate(thresholds.most_requested_limit);

    let total_preferences: usize = preferences.values().map(Vec::len).sum();
    let mean_preferences = total_preferences as f64 / n_people as f64;

    let suggestions = build_suggestions(
        &critical,
        &at_risk,
        &never_requested,
        n_items as i64 - n_people as i64,
        thresholds.min_spare_items,
    );

    debug!(
        people = n_people,
        items = n_items,
        conflicting = conflicting.len(),
        critical = critical.len(),
        at_risk = at_risk.len(),
        "conflict analysis complete"
    );

    Ok(ConflictAnalysis {
        n_people,
        n_items,
        popularity,
        most_requested,
        conflicting,
        critical,
        at_risk,
        never_requested,
        mean_preferences,
        suggestions,
    })
}

fn build_suggestions(
    critical: &IndexMap<String, usize>,
    at_risk: &[AtRiskPerson],
    never_requested: &[String],
    spare_items: i64,
    min_spare_items: i64,
) -> Vec<String> {
    let mut suggestions = Vec::new();

    if !critical.is_empty() {
        let names: Vec<&str> = critical.keys().map(String::as_str).collect();
        suggestions.push(format!("⚠️ Highly requested items: {}", names.join(", ")));
    }

    if !at_risk.is_empty() {
        let names: Vec<&str> = at_risk.iter().map(|p| p.person.as_str()).collect();
        suggestions.push(format!(
            "⚠️ People at risk (few preferences): {}",
            names.join(", ")
        ));
    }

    if !never_requested.is_empty() {
        suggestions.push(format!(
            "💡 Never requested items: {}",
            never_requested.join(", ")
        ));
        suggestions.push("💡 Consider removing or promoting them".to_string());
    }

    if spare_items < min_spare_items {
        suggestions.push("⚠️ Few backup items, consider adding more".to_string());
    }

    suggestions
}
