use super::types::Assignment;
use crate::error::AssignError;
use crate::store::{rank_of, Preferences};

/// A minimum-cost perfect matching solver over a square cost matrix.
///
/// `solve` returns, for every row, the column it is matched to.
pub trait OptimalSolver {
    fn name(&self) -> &'static str;

    fn solve(&self, costs: &[Vec<i64>]) -> Result<Vec<usize>, AssignError>;
}

/// O(n³) Hungarian algorithm with row/column potentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct HungarianSolver;

impl OptimalSolver for HungarianSolver {
    fn name(&self) -> &'static str {
        "hungarian"
    }

    fn solve(&self, costs: &[Vec<i64>]) -> Result<Vec<usize>, AssignError> {
        let n = costs.len();
        if n == 0 {
            return Ok(Vec::new());
        }
        if let Some((row, bad)) = costs.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(AssignError::Solver(format!(
                "cost matrix must be square: row {} has {} columns, expected {}",
                row,
                bad.len(),
                n
            )));
        }

        // 1-based indexing; index 0 is the virtual root of each augmenting search.
        let mut u = vec![0i64; n + 1];
        let mut v = vec![0i64; n + 1];
        let mut matched_row = vec![0usize; n + 1];
        let mut way = vec![0usize; n + 1];

        for row in 1..=n {
            matched_row[0] = row;
            let mut col0 = 0usize;
            let mut min_slack = vec![i64::MAX; n + 1];
            let mut used = vec![false; n + 1];

            loop {
                used[col0] = true;
                let row0 = matched_row[col0];
                let mut delta = i64::MAX;
                let mut col1 = 0usize;

                for col in 1..=n {
                    if used[col] {
                        continue;
                    }
                    let slack = costs[row0 - 1][col - 1] - u[row0] - v[col];
                    if slack < min_slack[col] {
                        min_slack[col] = slack;
                        way[col] = col0;
                    }
                    if min_slack[col] < delta {
                        delta = min_slack[col];
                        col1 = col;
                    }
                }

                for col in 0..=n {
                    if used[col] {
                        u[matched_row[col]] += delta;
                        v[col] -= delta;
                    } else {
                        min_slack[col] -= delta;
                    }
                }

                col0 = col1;
                if matched_row[col0] == 0 {
                    break;
                }
            }

            // Flip the augmenting path back to the root.
            loop {
                let col1 = way[col0];
                matched_row[col0] = matched_row[col1];
                col0 = col1;
                if col0 == 0 {
                    break;
                }
            }
        }

        let mut row_to_col = vec![0usize; n];
        for col in 1..=n {
            if matched_row[col] != 0 {
                row_to_col[matched_row[col] - 1] = col - 1;
            }
        }
        Ok(row_to_col)
    }
}

/// Rank cost matrix: `costs[person][slot]` is the slot item's rank in the
/// person's list, or `penalty` when the item is not listed.
pub fn build_cost_matrix(preferences: &Preferences, slots: &[String], penalty: i64) -> Vec<Vec<i64>> {
    preferences
        .values()
        .map(|list| {
            slots
                .iter()
                .map(|item| rank_of(list, item).map_or(penalty, |rank| rank as i64))
                .collect()
        })
        .collect()
}

pub fn assign_optimal(
    preferences: &Preferences,
    slots: &[String],
    solver: &dyn OptimalSolver,
    penalty: i64,
) -> Result<Assignment, AssignError> {
    let costs = build_cost_matrix(preferences, slots, penalty);
    let row_to_col = solver.solve(&costs)?;

    // Each row needs its own column, or a slot would be handed out twice.
    let mut seen = vec![false; slots.len()];
    let is_permutation = row_to_col.len() == preferences.len()
        && row_to_col
            .iter()
            .all(|&col| col < seen.len() && !std::mem::replace(&mut seen[col], true));
    if !is_permutation {
        return Err(AssignError::Solver(format!(
            "{} returned a non-permutation",
            solver.name()
        )));
    }

    Ok(preferences
        .keys()
        .zip(&row_to_col)
        .map(|(person, &col)| (person.clone(), slots[col].clone()))
        .collect())
}
