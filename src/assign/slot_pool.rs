use indexmap::IndexMap;

use crate::error::AssignError;

/// Replicates the item universe until there is one slot per person, then
/// truncates to exactly `people` slots.
///
/// Copies per item = `ceil(people / items)`. The cut keeps the first
/// `people` entries, so items listed late in the universe lose their last
/// copy first.
pub fn build_slot_pool(items: &[String], people: usize) -> Result<Vec<String>, AssignError> {
    if items.is_empty() {
        return Err(AssignError::EmptyItemUniverse);
    }
    let copies = people.div_ceil(items.len());
    let mut slots: Vec<String> = Vec::with_capacity(copies * items.len());
    for _ in 0..copies {
        slots.extend(items.iter().cloned());
    }
    slots.truncate(people);
    Ok(slots)
}

/// Remaining copies per item, keyed in first-slot order.
pub fn slot_counts(slots: &[String]) -> IndexMap<String, usize> {
    let mut counts = IndexMap::new();
    for slot in slots {
        *counts.entry(slot.clone()).or_insert(0) += 1;
    }
    counts
}

/// Takes one copy of `item` if any remain.
pub fn take(counts: &mut IndexMap<String, usize>, item: &str) -> bool {
    match counts.get_mut(item) {
        Some(remaining) if *remaining > 0 => {
            *remaining -= 1;
            true
        }
        _ => false,
    }
}

/// Takes one copy of the first item in pool order that still has copies left.
pub fn take_first_available(counts: &mut IndexMap<String, usize>) -> Option<String> {
    let (item, remaining) = counts.iter_mut().find(|(_, remaining)| **remaining > 0)?;
    *remaining -= 1;
    Some(item.clone())
}
