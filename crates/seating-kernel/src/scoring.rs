//! Pair scoring: how well two people mix at one desk.
//!
//! Scores are additive over independent rules (see [`ScoringConfig`]).
//! Higher is better. A pair that breaks a hard constraint is disqualified
//! and gets no score at all, so it can never clear the acceptance bar.

use crate::config::ScoringConfig;
use crate::model::Person;

/// Score two candidates for one desk.
///
/// `neighbor_cohorts` holds the cohorts already seated at the adjacent desk
/// of the same room; each candidate whose cohort is not among them earns the
/// spreading bonus.
///
/// Returns `None` when `segregate` is on and the gender codes differ.
pub fn score_pair(
    a: &Person,
    b: &Person,
    neighbor_cohorts: &[&str],
    segregate: bool,
    weights: &ScoringConfig,
) -> Option<u32> {
    if segregate && a.gender_code() != b.gender_code() {
        return None;
    }

    let (cohort_a, cohort_b) = (a.cohort(), b.cohort());
    let mut score = 0;

    if cohort_a != cohort_b {
        score += weights.different_cohort;
    }
    if a.group != b.group {
        score += weights.different_group;
    }
    for cohort in [cohort_a, cohort_b] {
        if !neighbor_cohorts.contains(&cohort) {
            score += weights.fresh_neighbor_cohort;
        }
    }
    if a.last_name != b.last_name {
        score += weights.different_last_name;
    }

    Some(score)
}

/// True if `score` clears `bar`. Disqualified pairs never do.
pub fn is_acceptable(score: Option<u32>, bar: u32) -> bool {
    score.is_some_and(|s| s >= bar)
}
