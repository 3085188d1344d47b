#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;

use character_assigner::assign::build_slot_pool;
use character_assigner::config::{AnalysisThresholds, ExpansionConfig};
use character_assigner::{
    analyze, expand_preferences, score, select_best, AssignError, AssignmentEngine,
    ExpansionMethod, PreferenceStore, Preferences, Strategy,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

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

fn rotating() -> Preferences {
    prefs(&[
        ("Alice", &["C1", "C2", "C3"]),
        ("Bob", &["C2", "C3", "C4"]),
        ("Charlie", &["C3", "C4", "C1"]),
        ("David", &["C4", "C1", "C2"]),
    ])
}

/// Seven people fighting over three items; copies are A x3, B x2, C x2.
fn oversubscribed() -> PreferenceStore {
    PreferenceStore::from_preferences(prefs(&[
        ("P1", &["A"]),
        ("P2", &["A", "B"]),
        ("P3", &["A", "C"]),
        ("P4", &["B", "A"]),
        ("P5", &["A"]),
        ("P6", &["C", "B", "A"]),
        ("P7", &["A", "B"]),
    ]))
}

fn rank_cost(preferences: &Preferences, person: &str, item: &str) -> i64 {
    preferences[person]
        .iter()
        .position(|candidate| candidate == item)
        .map_or(1000, |rank| rank as i64)
}

fn permutations(items: &[String]) -> Vec<Vec<String>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut all = Vec::new();
    for index in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(index);
        for mut tail in permutations(&rest) {
            tail.insert(0, head.clone());
            all.push(tail);
        }
    }
    all
}

#[test]
fn every_strategy_assigns_everyone_from_the_universe() {
    let store = oversubscribed();
    let engine = AssignmentEngine::default();

    for strategy in Strategy::ALL {
        let outcome = engine
            .assign(store.preferences(), store.items(), strategy)
            .unwrap();
        assert_eq!(outcome.assignment.len(), store.people_count(), "{strategy}");
        for (person, item) in &outcome.assignment {
            assert!(store.preferences().contains_key(person));
            assert!(store.items().contains(item), "{strategy} invented {item}");
        }
    }
}

#[test]
fn no_strategy_hands_out_more_copies_than_exist() {
    let store = oversubscribed();
    let slots = build_slot_pool(store.items(), store.people_count()).unwrap();
    let mut copies: HashMap<&str, usize> = HashMap::new();
    for slot in &slots {
        *copies.entry(slot.as_str()).or_default() += 1;
    }
    assert_eq!(copies["A"], 3);
    assert_eq!(copies["B"], 2);
    assert_eq!(copies["C"], 2);

    let engine = AssignmentEngine::default();
    for strategy in Strategy::ALL {
        let outcome = engine
            .assign(store.preferences(), store.items(), strategy)
            .unwrap();
        let mut used: HashMap<&str, usize> = HashMap::new();
        for item in outcome.assignment.values() {
            *used.entry(item.as_str()).or_default() += 1;
        }
        for (item, count) in used {
            assert!(count <= copies[item], "{strategy} used {item} {count} times");
        }
    }
}

#[test]
fn optimal_matches_brute_force_on_overlapping_lists() {
    let preferences = prefs(&[
        ("P1", &["W", "X", "Y", "Z"]),
        ("P2", &["W", "Y", "X", "Z"]),
        ("P3", &["X", "W", "Z", "Y"]),
        ("P4", &["W", "X", "Z", "Y"]),
    ]);
    let items: Vec<String> = ["W", "X", "Y", "Z"].iter().map(|s| s.to_string()).collect();
    let people: Vec<&String> = preferences.keys().collect();

    let best = permutations(&items)
        .iter()
        .map(|order| {
            people
                .iter()
                .zip(order)
                .map(|(person, item)| rank_cost(&preferences, person, item))
                .sum::<i64>()
        })
        .min()
        .unwrap();

    let outcome = AssignmentEngine::default()
        .assign(&preferences, &items, Strategy::Optimal)
        .unwrap();
    let total: i64 = outcome
        .assignment
        .iter()
        .map(|(person, item)| rank_cost(&preferences, person, item))
        .sum();

    assert_eq!(total, best);
    assert_eq!(outcome.used, Strategy::Optimal);
}

#[test]
fn optimal_is_never_beaten_by_a_heuristic() {
    let store = oversubscribed();
    let engine = AssignmentEngine::default();
    let cost = |strategy| -> i64 {
        engine
            .assign(store.preferences(), store.items(), strategy)
            .unwrap()
            .assignment
            .iter()
            .map(|(person, item)| rank_cost(store.preferences(), person, item))
            .sum()
    };

    let optimal = cost(Strategy::Optimal);
    for strategy in [Strategy::Balanced, Strategy::PriorityFair, Strategy::GreedyUrgency] {
        assert!(optimal <= cost(strategy), "{strategy} beat optimal");
    }
}

#[test]
fn expansion_keeps_full_lists_untouched() {
    let store = PreferenceStore::from_preferences(prefs(&[
        ("Ann", &["A", "B", "C", "D"]),
        ("Ben", &["B"]),
        ("Cid", &["D", "C", "B", "A", "E"]),
    ]));
    let analysis = analyze(&store, &AnalysisThresholds::default()).unwrap();

    for method in ExpansionMethod::ALL {
        for seed in 0..5 {
            let mut rng = StdRng::seed_from_u64(seed);
            let expanded =
                expand_preferences(&store, &analysis, method, &ExpansionConfig::default(), &mut rng);
            assert_eq!(expanded["Ann"], store.preferences()["Ann"]);
            assert_eq!(expanded["Cid"], store.preferences()["Cid"]);
            assert_eq!(expanded["Ben"].len(), 4);
            assert_eq!(expanded["Ben"][0], "B");
        }
    }
}

#[test]
fn rotating_lists_make_every_item_critical() {
    let store = PreferenceStore::from_preferences(rotating());
    let analysis = analyze(&store, &AnalysisThresholds::default()).unwrap();

    assert_eq!(analysis.n_people, 4);
    assert_eq!(analysis.n_items, 4);
    assert!((analysis.mean_preferences - 3.0).abs() < f64::EPSILON);
    for item in ["C1", "C2", "C3", "C4"] {
        assert_eq!(analysis.popularity_of(item), 3);
        assert!(analysis.critical.contains_key(item));
    }
    assert!(analysis.at_risk.is_empty());
}

#[test]
fn empty_store_is_a_structured_error() {
    let store = PreferenceStore::default();
    assert_eq!(
        analyze(&store, &AnalysisThresholds::default()).unwrap_err(),
        AssignError::NoData
    );
    assert_eq!(
        AssignmentEngine::default()
            .assign(store.preferences(), store.items(), Strategy::Hybrid)
            .unwrap_err(),
        AssignError::NoData
    );
}

#[test]
fn more_first_choices_score_no_worse() {
    let preferences = rotating();
    let all_first: character_assigner::Assignment = preferences
        .iter()
        .map(|(person, list)| (person.clone(), list[0].clone()))
        .collect();
    let mut one_second = all_first.clone();
    one_second.insert("Alice".to_string(), "C2".to_string());

    assert!(score(&all_first, &preferences, 10) <= score(&one_second, &preferences, 10));
}

#[test]
fn best_of_nothing_is_hybrid() {
    assert_eq!(select_best(&[]), Strategy::Hybrid);
}

#[test]
fn strategy_names_and_aliases() {
    assert_eq!("hungarian".parse::<Strategy>().unwrap(), Strategy::Optimal);
    assert_eq!("greedy_smart".parse::<Strategy>().unwrap(), Strategy::GreedyUrgency);
    assert_eq!("priority_fair".parse::<Strategy>().unwrap(), Strategy::PriorityFair);
    assert!(matches!(
        "auction".parse::<Strategy>(),
        Err(AssignError::UnknownStrategy(_))
    ));
}
