use super::types::Assignment;
use crate::analysis::item_popularity;
use crate::store::Preferences;

/// Balances load across popular items.
///
/// People whose lists are, on average, least contested go first. Each tries
/// their own items from least to most popular and takes the first slot still
/// in the pool; with nothing left from their list they take the front of the
/// remaining pool.
pub fn assign_balanced(preferences: &Preferences, slots: &[String]) -> Assignment {
    let popularity = item_popularity(preferences);
    let popularity_of = |item: &str| popularity.get(item).copied().unwrap_or(0);

    let average_popularity = |list: &[String]| {
        if list.is_empty() {
            f64::INFINITY
        } else {
            list.iter().map(|item| popularity_of(item)).sum::<usize>() as f64 / list.len() as f64
        }
    };

    // Sort people by how contested their list is, least contested first
    let mut order: Vec<(&String, &Vec<String>)> = preferences.iter().collect();
    order.sort_by(|a, b| {
        average_popularity(a.1.as_slice()).total_cmp(&average_popularity(b.1.as_slice()))
    });

    let mut pool: Vec<String> = slots.to_vec();
    let mut assignment = Assignment::with_capacity(preferences.len());

    for (person, list) in order {
        // Try the rarest wanted item first
        let mut by_rarity: Vec<&String> = list.iter().collect();
        by_rarity.sort_by_key(|item| popularity_of(item));

        let position = by_rarity
            .iter()
            .find_map(|item| pool.iter().position(|slot| slot == *item));

        let item = match position {
            Some(index) => pool.remove(index),
            // Nothing from their list is left
            None if !pool.is_empty() => pool.remove(0),
            None => continue,
        };
        assignment.insert(person.clone(), item);
    }

    assignment
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

    fn slots(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn rare_tastes_are_served_first() {
        // Ann only wants the contested A; Ben's average is rarer so he goes
        // first but picks his rarest item B, leaving A for Ann.
        let preferences = prefs(&[("Ann", &["A"]), ("Ben", &["A", "B"]), ("Cid", &["A", "C"])]);
        let assignment = assign_balanced(&preferences, &slots(&["A", "B", "C"]));

        assert_eq!(assignment["Ben"], "B");
        assert_eq!(assignment["Cid"], "C");
        assert_eq!(assignment["Ann"], "A");
    }

    #[test]
    fn exhausted_lists_take_front_of_pool() {
        let preferences = prefs(&[("Ann", &["A"]), ("Ben", &["A"])]);
        let assignment = assign_balanced(&preferences, &slots(&["A", "Z"]));

        assert_eq!(assignment["Ann"], "A");
        assert_eq!(assignment["Ben"], "Z");
    }

    #[test]
    fn empty_lists_go_last() {
        let preferences = prefs(&[("Ann", &[]), ("Ben", &["A"])]);
        let assignment = assign_balanced(&preferences, &slots(&["A", "B"]));

        assert_eq!(assignment.keys().collect::<Vec<_>>(), vec!["Ben", "Ann"]);
        assert_eq!(assignment["Ann"], "B");
    }
}
