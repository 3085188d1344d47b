use indexmap::{IndexMap, IndexSet};

use crate::analysis::{analyze, ConflictAnalysis};
use crate::config::AnalysisThresholds;
use crate::error::AssignError;

/// Person -> ranked item list, in load order. Rank 0 is the most wanted item.
pub type Preferences = IndexMap<String, Vec<String>>;

/// In-memory preferences plus the universe of distinct items.
///
/// The conflict analysis is computed lazily and cached until the next
/// [`load`](Self::load).
#[derive(Debug, Clone, Default)]
pub struct PreferenceStore {
    preferences: Preferences,
    items: Vec<String>,
    analysis: Option<ConflictAnalysis>,
}

impl PreferenceStore {
    pub fn new(preferences: Preferences, items: Vec<String>) -> Self {
        let mut store = Self::default();
        store.load(preferences, items);
        store
    }

    /// Builds a store whose item universe is exactly the items named in `preferences`.
    pub fn from_preferences(preferences: Preferences) -> Self {
        Self::new(preferences, Vec::new())
    }

    /// Replaces all data and drops the cached analysis.
    ///
    /// Blank entries and repeated items inside a person's list are removed
    /// (first occurrence wins). Every preferred item joins the universe even if
    /// `items` omits it; items in `items` that nobody asked for stay in the
    /// universe as never-requested.
    pub fn load(&mut self, preferences: Preferences, items: Vec<String>) {
        let mut universe: IndexSet<String> = items
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect();

        let mut normalized = Preferences::with_capacity(preferences.len());
        for (person, list) in preferences {
            let mut seen = IndexSet::new();
            for item in list {
                let item = item.trim();
                if !item.is_empty() {
                    seen.insert(item.to_string());
                }
            }
            universe.extend(seen.iter().cloned());
            normalized.insert(person.trim().to_string(), seen.into_iter().collect());
        }

        self.preferences = normalized;
        self.items = universe.into_iter().collect();
        self.analysis = None;
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// The item universe in first-appearance order.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn people_count(&self) -> usize {
        self.preferences.len()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.preferences.is_empty()
    }

    /// Returns the cached analysis, running the analyzer first if needed.
    pub fn analysis(
        &mut self,
        thresholds: &AnalysisThresholds,
    ) -> Result<&ConflictAnalysis, AssignError> {
        if self.analysis.is_none() {
            let analysis = analyze(self, thresholds)?;
            self.analysis = Some(analysis);
        }
        self.analysis.as_ref().ok_or(AssignError::NoData)
    }

    pub fn cached_analysis(&self) -> Option<&ConflictAnalysis> {
        self.analysis.as_ref()
    }
}

/// 0-based rank of `item` in a preference list.
pub fn rank_of(list: &[String], item: &str) -> Option<usize> {
    list.iter().position(|candidate| candidate == item)
}
