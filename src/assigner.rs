//! High-level entry points tying the store, analyzer, expander and engine together.

use chrono::Local;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::analysis::ConflictAnalysis;
use crate::assign::{Assignment, AssignmentEngine, Outcome, Strategy};
use crate::config::AssignerConfig;
use crate::display::{build_text_report, format_detailed_results};
use crate::error::AssignError;
use crate::evaluate::{self, Comparison};
use crate::expand::{expand_preferences, ExpansionMethod};
use crate::store::{PreferenceStore, Preferences};

/// One run's worth of state: loaded preferences, tuning and the random source.
pub struct CharacterAssigner {
    store: PreferenceStore,
    engine: AssignmentEngine,
    config: AssignerConfig,
    rng: StdRng,
}

impl CharacterAssigner {
    /// Uses the built-in Hungarian solver. The RNG is seeded from
    /// `config.seed`, or from entropy when unset.
    pub fn new(config: AssignerConfig) -> Self {
        Self::with_engine(config, AssignmentEngine::default())
    }

    /// The engine's scoring is replaced by `config.scoring`.
    pub fn with_engine(config: AssignerConfig, engine: AssignmentEngine) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            store: PreferenceStore::default(),
            engine: engine.with_scoring(config.scoring.clone()),
            config,
            rng,
        }
    }

    /// Replaces the loaded data. `items` may list items nobody asked for.
    pub fn load(&mut self, preferences: Preferences, items: Vec<String>) {
        self.store.load(preferences, items);
        info!(
            people = self.store.people_count(),
            items = self.store.item_count(),
            "preferences loaded into assigner"
        );
    }

    pub fn store(&self) -> &PreferenceStore {
        &self.store
    }

    pub fn config(&self) -> &AssignerConfig {
        &self.config
    }

    pub fn engine(&self) -> &AssignmentEngine {
        &self.engine
    }

    pub fn analysis(&mut self) -> Result<&ConflictAnalysis, AssignError> {
        self.store.analysis(&self.config.analysis)
    }

    /// Grows short preference lists with `method`. The store is left untouched.
    pub fn expand(&mut self, method: ExpansionMethod) -> Result<Preferences, AssignError> {
        self.store.analysis(&self.config.analysis)?;
        let analysis = self.store.cached_analysis().ok_or(AssignError::NoData)?;
        Ok(expand_preferences(
            &self.store,
            analysis,
            method,
            &self.config.expansion,
            &mut self.rng,
        ))
    }

    /// Assigns everyone an item. With `expand_first`, the engine sees the
    /// balanced expansion of the preferences instead of the raw lists.
    pub fn assign_with_strategy(
        &mut self,
        strategy: Strategy,
        expand_first: bool,
    ) -> Result<Outcome, AssignError> {
        if self.store.is_empty() {
            return Err(AssignError::NoData);
        }

        let outcome = if expand_first {
            let expanded = self.expand(ExpansionMethod::Balanced)?;
            self.engine.assign(&expanded, self.store.items(), strategy)?
        } else {
            self.engine
                .assign(self.store.preferences(), self.store.items(), strategy)?
        };

        info!(
            requested = %outcome.requested,
            used = %outcome.used,
            expanded = expand_first,
            "assignment finished"
        );
        Ok(outcome)
    }

    /// Same as [`assign_with_strategy`](Self::assign_with_strategy), by name.
    pub fn assign_named(&mut self, name: &str, expand_first: bool) -> Result<Outcome, AssignError> {
        let strategy: Strategy = name.parse()?;
        self.assign_with_strategy(strategy, expand_first)
    }

    pub fn compare_strategies(&self) -> Result<Comparison, AssignError> {
        evaluate::compare_strategies(&self.engine, &self.store)
    }

    /// Compares strategies and returns the winner (hybrid when none succeeded).
    pub fn best_strategy(&self) -> Result<Strategy, AssignError> {
        Ok(self.compare_strategies()?.best())
    }

    /// Evaluator score of `assignment` against the raw preferences.
    pub fn score(&self, assignment: &Assignment) -> f64 {
        evaluate::score(
            assignment,
            self.store.preferences(),
            self.config.scoring.unmatched_penalty,
        )
    }

    pub fn text_report(
        &mut self,
        assignment: &Assignment,
        strategy: &str,
    ) -> Result<String, AssignError> {
        self.store.analysis(&self.config.analysis)?;
        let analysis = self.store.cached_analysis().ok_or(AssignError::NoData)?;
        Ok(build_text_report(
            self.store.preferences(),
            analysis,
            assignment,
            strategy,
            Local::now(),
        ))
    }

    pub fn detailed_results(&mut self, assignment: &Assignment) -> Result<String, AssignError> {
        self.store.analysis(&self.config.analysis)?;
        Ok(format_detailed_results(
            assignment,
            self.store.preferences(),
            self.store.cached_analysis(),
            self.config.scoring.comparison_penalty,
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn prefs(rows: &[(&str, &[&str])]) -> Preferences {
        rows.iter()
            .map(|(person, items)| {
                (
                    person.to_string(),
                    items.iter().map(|item| item.to_string()).collect(),
                )
            })
            .collect()
    }

    fn seeded(seed: u64) -> CharacterAssigner {
        CharacterAssigner::new(AssignerConfig {
            seed: Some(seed),
            ..AssignerConfig::default()
        })
    }

    fn loaded() -> CharacterAssigner {
        let mut assigner = seeded(7);
        assigner.load(
            prefs(&[
                ("Ann", &["A"]),
                ("Ben", &["A", "B"]),
                ("Cid", &["C", "A", "B", "D"]),
            ]),
            vec!["D".to_string(), "E".to_string()],
        );
        assigner
    }

    #[test]
    fn catalog_items_join_the_universe() {
        let mut assigner = loaded();
        assert_eq!(assigner.store().item_count(), 5);
        let analysis = assigner.analysis().unwrap();
        assert_eq!(analysis.never_requested, vec!["E".to_string()]);
    }

    #[test]
    fn expansion_leaves_the_store_alone() {
        let mut assigner = loaded();
        let expanded = assigner.expand(ExpansionMethod::Random).unwrap();

        assert_eq!(expanded["Ann"].len(), 4);
        assert_eq!(expanded["Ann"][0], "A");
        assert_eq!(expanded["Cid"], assigner.store().preferences()["Cid"]);
        assert_eq!(assigner.store().preferences()["Ann"], vec!["A"]);
    }

    #[test]
    fn same_seed_same_expansion() {
        let mut first = loaded();
        let mut second = loaded();
        assert_eq!(
            first.expand(ExpansionMethod::Balanced).unwrap(),
            second.expand(ExpansionMethod::Balanced).unwrap()
        );
    }

    #[test]
    fn assign_with_and_without_expansion() {
        let mut assigner = loaded();
        for expand_first in [false, true] {
            for strategy in Strategy::ALL {
                let outcome = assigner.assign_with_strategy(strategy, expand_first).unwrap();
                assert_eq!(outcome.assignment.len(), 3);
            }
        }
    }

    #[test]
    fn unknown_strategy_name_is_rejected() {
        let err = loaded().assign_named("fastest", false).unwrap_err();
        assert_eq!(err, AssignError::UnknownStrategy("fastest".to_string()));
    }

    #[test]
    fn empty_assigner_reports_no_data() {
        let mut assigner = seeded(1);
        assert_eq!(assigner.analysis().unwrap_err(), AssignError::NoData);
        assert_eq!(
            assigner.assign_with_strategy(Strategy::Hybrid, true).unwrap_err(),
            AssignError::NoData
        );
        assert_eq!(assigner.compare_strategies().unwrap_err(), AssignError::NoData);
    }

    #[test]
    fn best_strategy_gives_first_choices_when_possible() {
        let mut assigner = seeded(3);
        assigner.load(
            prefs(&[("Ann", &["A", "B"]), ("Ben", &["B", "A"])]),
            Vec::new(),
        );
        let best = assigner.best_strategy().unwrap();
        let outcome = assigner.assign_with_strategy(best, false).unwrap();
        assert_eq!(assigner.score(&outcome.assignment), 0.0);
    }

    #[test]
    fn report_uses_loaded_data() {
        let mut assigner = loaded();
        let outcome = assigner.assign_with_strategy(Strategy::Optimal, false).unwrap();
        let report = assigner.text_report(&outcome.assignment, "optimal").unwrap();
        assert!(report.contains("• Number of people: 3"));
        assert!(report.contains("• Number of available items: 5"));
        assert!(report.contains("Strategy used: OPTIMAL"));
    }
}
