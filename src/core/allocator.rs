//! Randomized one-to-one slot allocation.
//!
//! Walks the slots in poll column order and settles each one against the
//! participants who ticked it. Contended slots are resolved by drawing
//! uniformly at random; a slot gets at most two draws before it is left
//! open. Allocation is best-effort: slots and participants that cannot be
//! settled are reported, never treated as errors.

use crate::domain::model::{AllocationOutcome, Assignment, PreferenceMatrix};
use rand::Rng;
use std::collections::HashSet;

/// Assign each slot to at most one participant and each participant to at
/// most one slot.
///
/// The rng is injected so callers can seed it for reproducible runs; any
/// `rand::Rng` works. Slots are processed strictly in column order because
/// each settlement narrows the pool for the slots after it.
pub fn allocate<R: Rng + ?Sized>(matrix: &PreferenceMatrix, rng: &mut R) -> AllocationOutcome {
    let mut taken: HashSet<usize> = HashSet::new();
    let mut assignments = Vec::new();

    for (col, slot) in matrix.slots().iter().enumerate() {
        let candidates = matrix.selectors_of(col);

        let winner = match candidates.as_slice() {
            [] => None,
            [only] => (!taken.contains(only)).then_some(*only),
            _ => draw_twice(&candidates, &taken, rng),
        };

        match winner {
            Some(row) => {
                taken.insert(row);
                assignments.push(Assignment {
                    slot: slot.clone(),
                    participant: matrix.participants()[row].clone(),
                });
                tracing::debug!("slot '{}' -> {}", slot, matrix.participants()[row]);
            }
            None => {
                tracing::debug!("slot '{}' left open", slot);
            }
        }
    }

    let unallocated: Vec<String> = matrix
        .participants()
        .iter()
        .enumerate()
        .filter(|(row, _)| !taken.contains(row))
        .map(|(_, name)| name.clone())
        .collect();

    AllocationOutcome {
        assignments,
        unallocated,
    }
}

/// Two uniform draws over a contended candidate set, the second excluding
/// the first pick. If both land on already-settled participants the slot
/// stays open; deliberately not an exhaustive search over the remaining
/// candidates.
fn draw_twice<R: Rng + ?Sized>(
    candidates: &[usize],
    taken: &HashSet<usize>,
    rng: &mut R,
) -> Option<usize> {
    let first = candidates[rng.random_range(0..candidates.len())];
    if !taken.contains(&first) {
        return Some(first);
    }

    let rest: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|&row| row != first)
        .collect();
    let second = rest[rng.random_range(0..rest.len())];
    (!taken.contains(&second)).then_some(second)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Slot;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn slot(n: usize) -> Slot {
        Slot::new(
            format!("2020-11-{:02}", n + 2),
            "Tue",
            format!("{}:00-{}:00", 9 + n, 10 + n),
        )
    }

    fn matrix(participants: &[&str], rows: &[&[bool]]) -> PreferenceMatrix {
        let n_slots = rows[0].len();
        PreferenceMatrix::new(
            (0..n_slots).map(slot).collect(),
            participants.iter().map(|s| s.to_string()).collect(),
            rows.iter().map(|r| r.to_vec()).collect(),
        )
        .unwrap()
    }

    fn assert_invariants(m: &PreferenceMatrix, outcome: &AllocationOutcome) {
        // no participant holds two slots
        let mut seen = HashSet::new();
        for a in &outcome.assignments {
            assert!(seen.insert(a.participant.clone()), "{} assigned twice", a.participant);
        }

        // every assignment was actually selected in the matrix
        for a in &outcome.assignments {
            let col = m.slots().iter().position(|s| s == &a.slot).unwrap();
            let row = m
                .participants()
                .iter()
                .position(|p| p == &a.participant)
                .unwrap();
            assert!(m.selected(row, col), "invalid assignment {:?}", a);
        }

        // |assignments| bounded by both axes
        assert!(outcome.assignments.len() <= m.slots().len());
        assert!(outcome.assignments.len() <= m.participants().len());

        // assigned and unallocated partition the participant set
        let assigned: HashSet<&str> = outcome
            .assignments
            .iter()
            .map(|a| a.participant.as_str())
            .collect();
        let unallocated: HashSet<&str> =
            outcome.unallocated.iter().map(|s| s.as_str()).collect();
        assert!(assigned.is_disjoint(&unallocated));
        let all: HashSet<&str> = m.participants().iter().map(|s| s.as_str()).collect();
        let union: HashSet<&str> = assigned.union(&unallocated).copied().collect();
        assert_eq!(all, union);
    }

    #[test]
    fn test_distinct_single_selections_all_assigned() {
        // Scenario: 3 slots, 2 participants, each ticking one distinct slot.
        let m = matrix(
            &["Ana", "Ben"],
            &[&[true, false, false], &[false, false, true]],
        );
        let mut rng = SmallRng::seed_from_u64(7);
        let outcome = allocate(&m, &mut rng);

        assert_invariants(&m, &outcome);
        assert_eq!(outcome.assignments.len(), 2);
        assert!(outcome.unallocated.is_empty());
        assert_eq!(outcome.participant_for(&slot(0)), Some("Ana"));
        assert_eq!(outcome.participant_for(&slot(1)), None);
        assert_eq!(outcome.participant_for(&slot(2)), Some("Ben"));
    }

    #[test]
    fn test_contended_single_slot_one_winner_one_left_out() {
        // Scenario: 1 slot, both participants want it.
        let m = matrix(&["Ana", "Ben"], &[&[true], &[true]]);
        for seed in 0..50 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let outcome = allocate(&m, &mut rng);

            assert_invariants(&m, &outcome);
            assert_eq!(outcome.assignments.len(), 1);
            assert_eq!(outcome.unallocated.len(), 1);
            let winner = &outcome.assignments[0].participant;
            assert!(winner == "Ana" || winner == "Ben");
            assert_ne!(&outcome.unallocated[0], winner);
        }
    }

    #[test]
    fn test_full_contention_both_get_distinct_slots() {
        // Scenario: 2 slots, 2 participants, everyone ticks everything.
        // The second slot's loser of slot one is the only free candidate, so
        // the two-draw policy always lands on them eventually or leaves the
        // slot open; across seeds we only require the invariants plus that
        // nobody holds two slots.
        let m = matrix(&["Ana", "Ben"], &[&[true, true], &[true, true]]);
        let mut both_assigned_seen = false;
        for seed in 0..200 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let outcome = allocate(&m, &mut rng);
            assert_invariants(&m, &outcome);
            assert!(!outcome.assignments.is_empty());
            if outcome.assignments.len() == 2 {
                both_assigned_seen = true;
                let slots: HashSet<_> = outcome.assignments.iter().map(|a| &a.slot).collect();
                assert_eq!(slots.len(), 2);
            }
        }
        assert!(both_assigned_seen, "no seed ever settled both slots");
    }

    #[test]
    fn test_slot_with_no_selectors_left_open() {
        let m = matrix(&["Ana"], &[&[false, true]]);
        let mut rng = SmallRng::seed_from_u64(1);
        let outcome = allocate(&m, &mut rng);

        assert_invariants(&m, &outcome);
        assert_eq!(outcome.participant_for(&slot(0)), None);
        assert_eq!(outcome.participant_for(&slot(1)), Some("Ana"));
    }

    #[test]
    fn test_nobody_selected_anything() {
        let m = matrix(&["Ana", "Ben"], &[&[false, false], &[false, false]]);
        let mut rng = SmallRng::seed_from_u64(3);
        let outcome = allocate(&m, &mut rng);

        assert!(outcome.assignments.is_empty());
        assert_eq!(outcome.unallocated, vec!["Ana".to_string(), "Ben".to_string()]);
    }

    #[test]
    fn test_no_contention_is_deterministic() {
        // Every candidate set has size <= 1, so no randomness is exercised
        // and repeated runs with unrelated seeds agree.
        let m = matrix(
            &["Ana", "Ben", "Cyd"],
            &[
                &[true, false, false],
                &[false, true, false],
                &[false, false, true],
            ],
        );
        let mut rng = SmallRng::seed_from_u64(11);
        let baseline = allocate(&m, &mut rng);
        for seed in [0u64, 42, 999] {
            let mut rng = SmallRng::seed_from_u64(seed);
            let outcome = allocate(&m, &mut rng);
            assert_eq!(outcome.assignments, baseline.assignments);
            assert_eq!(outcome.unallocated, baseline.unallocated);
        }
        assert_eq!(baseline.assignments.len(), 3);
    }

    #[test]
    fn test_single_candidate_already_taken_leaves_slot_open() {
        // Ana wins slot 0 and is the only selector of slot 1, which must
        // then stay open rather than be reassigned.
        let m = matrix(&["Ana"], &[&[true, true]]);
        let mut rng = SmallRng::seed_from_u64(5);
        let outcome = allocate(&m, &mut rng);

        assert_eq!(outcome.assignments.len(), 1);
        assert_eq!(outcome.assignments[0].slot, slot(0));
        assert!(outcome.unallocated.is_empty());
    }

    #[test]
    fn test_same_seed_reproduces_contended_outcome() {
        let m = matrix(
            &["Ana", "Ben", "Cyd"],
            &[&[true, true], &[true, true], &[true, true]],
        );
        let first = allocate(&m, &mut SmallRng::seed_from_u64(99));
        let second = allocate(&m, &mut SmallRng::seed_from_u64(99));
        assert_eq!(first.assignments, second.assignments);
        assert_eq!(first.unallocated, second.unallocated);
    }

    #[test]
    fn test_invariants_hold_under_heavy_contention() {
        let m = matrix(
            &["Ana", "Ben", "Cyd", "Dee"],
            &[
                &[true, true, true],
                &[true, true, false],
                &[false, true, true],
                &[true, false, true],
            ],
        );
        for seed in 0..300 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let outcome = allocate(&m, &mut rng);
            assert_invariants(&m, &outcome);
        }
    }
}
