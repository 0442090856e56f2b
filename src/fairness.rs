use crate::member::Member;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const WEIGHT_RELIABILITY: f64 = 0.35;
const WEIGHT_VELOCITY: f64 = 0.35;
const WEIGHT_OVERLOAD_HEADROOM: f64 = 0.15;
const WEIGHT_AVAILABILITY: f64 = 0.15;

/// One member's slice of the fairness allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairShare {
    /// Raw weighted fairness score, clamped at 0.
    pub score: f64,
    /// Normalized fraction of the team total (all shares sum to 1).
    pub share: f64,
    /// Hours this member should ideally carry this sprint.
    pub fair_hours: f64,
}

/// Per-member fair shares of the total team capacity. Computed once per
/// planning request and read-only afterwards; it never feeds back into
/// capacities.
#[derive(Debug, Clone, Default)]
pub struct FairnessAllocation {
    shares: HashMap<String, FairShare>,
}

impl FairnessAllocation {
    pub fn get(&self, member_id: &str) -> Option<&FairShare> {
        self.shares.get(member_id)
    }

    /// Fair-share hours for a member, 0 for unknown ids.
    pub fn fair_hours(&self, member_id: &str) -> f64 {
        self.shares.get(member_id).map_or(0.0, |s| s.fair_hours)
    }
}

/// Fairness allocator: weighted score per member (reliability 0.35, velocity
/// ratio 0.35, overload headroom 0.15, availability 0.15), normalized into
/// fractions of total team capacity.
pub fn allocate_fair_shares(members: &[Member], total_capacity: f64) -> FairnessAllocation {
    let total_velocity: u64 = members.iter().map(|m| u64::from(m.velocity)).sum();
    // Zero total velocity would divide by zero in the ratio term.
    let average_velocity = if total_velocity == 0 {
        1.0
    } else {
        total_velocity as f64 / members.len() as f64
    };

    let raw_scores: Vec<f64> = members
        .iter()
        .map(|m| {
            let velocity_ratio = f64::from(m.velocity) / average_velocity;
            let score = m.reliability_score * WEIGHT_RELIABILITY
                + velocity_ratio * WEIGHT_VELOCITY
                + (1.0 - m.overload_risk_score) * WEIGHT_OVERLOAD_HEADROOM
                + m.availability_factor * WEIGHT_AVAILABILITY;
            score.max(0.0)
        })
        .collect();

    let score_sum: f64 = raw_scores.iter().sum();

    let mut shares = HashMap::with_capacity(members.len());
    for (member, score) in members.iter().zip(raw_scores) {
        // Degenerate all-zero scores fall back to equal shares so fair-share
        // hours still sum to the team capacity.
        let share = if score_sum > 0.0 {
            score / score_sum
        } else {
            1.0 / members.len() as f64
        };
        shares.insert(
            member.id.clone(),
            FairShare {
                score,
                share,
                fair_hours: share * total_capacity,
            },
        );
    }

    FairnessAllocation { shares }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &str, reliability: f64, velocity: u32, overload: f64, avail: f64) -> Member {
        let mut m = Member::new(id);
        m.reliability_score = reliability;
        m.velocity = velocity;
        m.overload_risk_score = overload;
        m.availability_factor = avail;
        m
    }

    #[test]
    fn shares_sum_to_total_capacity() {
        let members = vec![
            member("a", 0.9, 12, 0.1, 1.0),
            member("b", 0.6, 8, 0.3, 0.8),
            member("c", 0.4, 0, 0.0, 1.0),
        ];
        let allocation = allocate_fair_shares(&members, 120.0);
        let sum: f64 = members.iter().map(|m| allocation.fair_hours(&m.id)).sum();
        assert!((sum - 120.0).abs() < 1e-9);
    }

    #[test]
    fn stronger_member_gets_at_least_equal_share() {
        // Identical availability and overload; A strictly better on
        // reliability and velocity.
        let members = vec![
            member("a", 0.95, 14, 0.2, 0.9),
            member("b", 0.55, 6, 0.2, 0.9),
        ];
        let allocation = allocate_fair_shares(&members, 80.0);
        assert!(allocation.fair_hours("a") >= allocation.fair_hours("b"));
    }

    #[test]
    fn zero_velocity_team_uses_unit_average() {
        let members = vec![member("a", 0.8, 0, 0.0, 1.0), member("b", 0.8, 0, 0.0, 1.0)];
        let allocation = allocate_fair_shares(&members, 60.0);
        assert!((allocation.fair_hours("a") - 30.0).abs() < 1e-9);
        assert!((allocation.fair_hours("b") - 30.0).abs() < 1e-9);
    }

    #[test]
    fn all_zero_scores_split_evenly() {
        let members = vec![
            member("a", 0.0, 0, 1.0, 0.0),
            member("b", 0.0, 0, 1.0, 0.0),
        ];
        let allocation = allocate_fair_shares(&members, 50.0);
        assert!((allocation.fair_hours("a") - 25.0).abs() < 1e-9);
        assert_eq!(allocation.get("a").unwrap().score, 0.0);
    }
}
