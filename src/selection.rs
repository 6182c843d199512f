use std::cmp::Ordering;

use crate::roster::{PlayerRecord, Position};

/// Players in a full lineup under the standard quota (coach excluded).
pub const LINEUP_SIZE: usize = 11;

pub const DEFAULT_CEILING_MULTIPLIER: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankCriterion {
    AverageScore,
    Efficiency,
}

impl RankCriterion {
    pub fn value(self, player: &PlayerRecord) -> f64 {
        match self {
            RankCriterion::AverageScore => player.average_score,
            RankCriterion::Efficiency => player.efficiency,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RankCriterion::AverageScore => "AVG",
            RankCriterion::Efficiency => "EFF",
        }
    }
}

/// Required player count per position, in lineup order. The declaration
/// order is the order selected players come back in.
#[derive(Debug, Clone)]
pub struct SlotQuota {
    entries: Vec<(Position, usize)>,
}

impl SlotQuota {
    pub fn new(entries: Vec<(Position, usize)>) -> Self {
        Self { entries }
    }

    /// The 4-3-3 scheme: 1 GK, 2 full-backs, 2 centre-backs, 3 midfielders,
    /// 3 forwards.
    pub fn standard() -> Self {
        Self::new(vec![
            (Position::Goalkeeper, 1),
            (Position::FullBack, 2),
            (Position::CenterBack, 2),
            (Position::Midfielder, 3),
            (Position::Forward, 3),
        ])
    }

    pub fn entries(&self) -> &[(Position, usize)] {
        &self.entries
    }

    pub fn total_slots(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }
}

impl Default for SlotQuota {
    fn default() -> Self {
        Self::standard()
    }
}

/// Soft per-slot price cap: `budget / slots * multiplier`. Candidates above
/// the cap are dropped before ranking; slots that end up short are NOT
/// backfilled from a relaxed cap.
#[derive(Debug, Clone, Copy)]
pub struct SlotCeiling {
    pub multiplier: f64,
    pub slots: usize,
}

impl SlotCeiling {
    pub fn new(multiplier: f64) -> Self {
        Self {
            multiplier,
            slots: LINEUP_SIZE,
        }
    }

    pub fn with_slots(multiplier: f64, slots: usize) -> Self {
        Self { multiplier, slots }
    }

    pub fn cap(&self, budget: f64) -> f64 {
        if self.slots == 0 {
            return 0.0;
        }
        budget / self.slots as f64 * self.multiplier
    }
}

#[derive(Debug, Clone)]
pub struct SelectionConfig {
    pub quota: SlotQuota,
    pub criterion: RankCriterion,
    pub budget: f64,
    pub ceiling: Option<SlotCeiling>,
}

#[derive(Debug, Clone, Copy)]
pub struct BudgetVerdict {
    pub total_cost: f64,
    pub feasible: bool,
    pub overshoot: f64,
}

/// Sum the selected prices against the budget. `overshoot` is zero exactly
/// when the lineup is feasible.
pub fn evaluate_budget(players: &[PlayerRecord], budget: f64) -> BudgetVerdict {
    let total_cost: f64 = players.iter().map(|p| p.price).sum();
    let overshoot = (total_cost - budget).max(0.0);
    BudgetVerdict {
        total_cost,
        feasible: overshoot == 0.0,
        overshoot,
    }
}

/// A selection result. Immutable once returned; a new lineup is produced by
/// re-running selection with different inputs.
#[derive(Debug, Clone)]
pub struct Lineup {
    pub players: Vec<PlayerRecord>,
    pub budget: f64,
    pub total_cost: f64,
    pub feasible: bool,
    pub overshoot: f64,
}

/// Greedy per-position top-K selection. For each quota entry, in quota
/// order: take pool members of that position, drop candidates over the
/// per-slot cap when one is configured, stable-sort by the criterion
/// descending (ties keep original pool order), take the first `count`.
///
/// There is no cross-position rebalancing and no global budget search; an
/// over-budget or under-filled lineup is a valid result, reported through
/// the budget verdict and the returned player count.
pub fn select_lineup(pool: &[PlayerRecord], config: &SelectionConfig) -> Lineup {
    let mut players = Vec::with_capacity(config.quota.total_slots());

    for (position, count) in config.quota.entries() {
        let mut candidates: Vec<&PlayerRecord> =
            pool.iter().filter(|p| p.position == *position).collect();

        if let Some(ceiling) = config.ceiling {
            let cap = ceiling.cap(config.budget);
            candidates.retain(|p| p.price <= cap);
        }

        candidates.sort_by(|a, b| {
            config
                .criterion
                .value(b)
                .partial_cmp(&config.criterion.value(a))
                .unwrap_or(Ordering::Equal)
        });

        players.extend(candidates.into_iter().take(*count).cloned());
    }

    let verdict = evaluate_budget(&players, config.budget);
    Lineup {
        players,
        budget: config.budget,
        total_cost: verdict.total_cost,
        feasible: verdict.feasible,
        overshoot: verdict.overshoot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{Status, efficiency};

    fn player(id: u32, position: Position, average_score: f64, price: f64) -> PlayerRecord {
        PlayerRecord {
            id,
            nickname: format!("P{id}"),
            position,
            status: Status::Likely,
            club_id: 1,
            club: "Club".to_string(),
            average_score,
            price,
            games_played: 10,
            efficiency: efficiency(average_score, price),
        }
    }

    #[test]
    fn ceiling_cap_scales_with_budget() {
        let ceiling = SlotCeiling::new(1.5);
        assert!((ceiling.cap(110.0) - 15.0).abs() < 1e-9);
        let halved = SlotCeiling::with_slots(1.5, 2);
        assert!((halved.cap(15.0) - 11.25).abs() < 1e-9);
    }

    #[test]
    fn evaluate_budget_overshoot_never_negative() {
        let players = vec![player(1, Position::Forward, 5.0, 10.0)];
        let under = evaluate_budget(&players, 20.0);
        assert!(under.feasible);
        assert_eq!(under.overshoot, 0.0);

        let over = evaluate_budget(&players, 4.0);
        assert!(!over.feasible);
        assert!((over.overshoot - 6.0).abs() < 1e-9);
    }

    #[test]
    fn ties_keep_pool_order() {
        let pool = vec![
            player(1, Position::Forward, 7.0, 9.0),
            player(2, Position::Forward, 7.0, 5.0),
            player(3, Position::Forward, 7.0, 3.0),
        ];
        let config = SelectionConfig {
            quota: SlotQuota::new(vec![(Position::Forward, 2)]),
            criterion: RankCriterion::AverageScore,
            budget: 100.0,
            ceiling: None,
        };
        let lineup = select_lineup(&pool, &config);
        let ids: Vec<u32> = lineup.players.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn underfilled_slot_is_returned_short() {
        let pool = vec![player(1, Position::Goalkeeper, 4.0, 5.0)];
        let config = SelectionConfig {
            quota: SlotQuota::new(vec![(Position::Goalkeeper, 1), (Position::Forward, 3)]),
            criterion: RankCriterion::AverageScore,
            budget: 100.0,
            ceiling: None,
        };
        let lineup = select_lineup(&pool, &config);
        assert_eq!(lineup.players.len(), 1);
        assert_eq!(lineup.players[0].position, Position::Goalkeeper);
    }

    #[test]
    fn efficiency_criterion_prefers_cheap_scorers() {
        let pool = vec![
            player(1, Position::Midfielder, 8.0, 16.0), // eff 0.5
            player(2, Position::Midfielder, 6.0, 4.0),  // eff 1.5
        ];
        let config = SelectionConfig {
            quota: SlotQuota::new(vec![(Position::Midfielder, 1)]),
            criterion: RankCriterion::Efficiency,
            budget: 100.0,
            ceiling: None,
        };
        let lineup = select_lineup(&pool, &config);
        assert_eq!(lineup.players[0].id, 2);
    }

    #[test]
    fn standard_quota_totals_eleven() {
        assert_eq!(SlotQuota::standard().total_slots(), LINEUP_SIZE);
    }
}
