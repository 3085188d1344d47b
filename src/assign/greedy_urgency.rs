use super::slot_pool::{slot_counts, take, take_first_available};
use super::types::Assignment;
use crate::store::Preferences;

/// Repeatedly serves the unassigned person with the fewest preferred items
/// still available, giving them their best remaining choice.
///
/// Ties go to whoever appears first in `preferences`.
pub fn assign_greedy_urgency(preferences: &Preferences, slots: &[String]) -> Assignment {
    let mut counts = slot_counts(slots);
    let mut remaining: Vec<(&String, &Vec<String>)> = preferences.iter().collect();
    let mut assignment = Assignment::with_capacity(preferences.len());

    while !remaining.is_empty() {
        // Find the person with the fewest wanted items still open
        let most_urgent = remaining
            .iter()
            .enumerate()
            .min_by_key(|(_, (_, list))| {
                list.iter()
                    .filter(|item| counts.get(*item).is_some_and(|&left| left > 0))
                    .count()
            })
            .map(|(index, _)| index);
        let Some(index) = most_urgent else { break };

        let (person, list) = remaining.remove(index);

        // Best remaining choice, or the first free slot
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
