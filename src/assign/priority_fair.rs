use super::slot_pool::{slot_counts, take, take_first_available};
use super::types::Assignment;
use crate::store::Preferences;

/// Serves people with the fewest preferences first, each in their own rank order.
pub fn assign_priority_fair(preferences: &Preferences, slots: &[String]) -> Assignment {
    let mut counts = slot_counts(slots);

    // Shortest lists first; the sort is stable so input order breaks ties
    let mut order: Vec<(&String, &Vec<String>)> = preferences.iter().collect();
    order.sort_by_key(|(_, list)| list.len());

    let mut assignment = Assignment::with_capacity(preferences.len());
    for (person, list) in order {
        // Highest-ranked item with a copy left, else any leftover slot
        let item = list
            .iter()
            .find(|item| take(&mut counts, item))
            .cloned()
            .or_else(|| take_first_available(&mut counts));

        if let Some(item) = item {
            assignment.insert(person.clone(), item);
        }
    }
    assignment
}
