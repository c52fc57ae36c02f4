//! Cyclic gift assignment
//!
//! Shuffle the participants, then have each one gift the next in the
//! shuffled order, wrapping around at the end. The result is always a single
//! cycle through everyone with no self-assignment, computed in O(n) without
//! retries.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::entities::MIN_PARTICIPANTS;
use crate::error::DomainError;

/// Compute a giver -> receiver mapping forming one cycle over `participants`.
///
/// The input slice is left untouched. Keys must be distinct.
pub fn perform_draw<K, R>(participants: &[K], rng: &mut R) -> Result<HashMap<K, K>, DomainError>
where
    K: Clone + Eq + Hash,
    R: Rng + ?Sized,
{
    if participants.len() < MIN_PARTICIPANTS {
        return Err(DomainError::InsufficientParticipants {
            found: participants.len(),
        });
    }

    let distinct: HashSet<&K> = participants.iter().collect();
    if distinct.len() != participants.len() {
        return Err(DomainError::Validation(
            "Participants in a draw must be distinct".to_string(),
        ));
    }

    tracing::info!(
        count = participants.len(),
        "Performing draw using circular assignment"
    );

    let mut shuffled = participants.to_vec();
    shuffled.shuffle(rng);

    let n = shuffled.len();
    let assignments: HashMap<K, K> = (0..n)
        .map(|i| (shuffled[i].clone(), shuffled[(i + 1) % n].clone()))
        .collect();

    tracing::info!(count = assignments.len(), "Draw produced a closed cycle");
    Ok(assignments)
}

/// Check that `assignments` is one closed cycle covering every giver with
/// nobody gifting themselves. Empty or malformed mappings yield `false`.
pub fn is_valid_draw<K>(assignments: &HashMap<K, K>) -> bool
where
    K: Eq + Hash,
{
    let Some(start) = assignments.keys().next() else {
        return false;
    };

    if assignments.iter().any(|(giver, receiver)| giver == receiver) {
        tracing::warn!("Invalid draw: participant assigned to themselves");
        return false;
    }

    let mut visited = HashSet::with_capacity(assignments.len());
    let mut current = start;
    loop {
        if !visited.insert(current) {
            tracing::warn!("Invalid draw: cycle closed before returning to start");
            return false;
        }
        match assignments.get(current) {
            Some(next) if next == start => break,
            Some(next) => current = next,
            None => {
                tracing::warn!("Invalid draw: receiver has no assignment of their own");
                return false;
            }
        }
    }

    let complete = visited.len() == assignments.len();
    if !complete {
        tracing::warn!(
            visited = visited.len(),
            expected = assignments.len(),
            "Invalid draw: cycle does not cover every participant"
        );
    }
    complete
}
