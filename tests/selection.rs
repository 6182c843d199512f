use cartola_terminal::roster::{
    MarketSnapshot, PlayerRecord, Position, RawPlayer, filter_likely, normalize_players,
};
use cartola_terminal::selection::{
    RankCriterion, SelectionConfig, SlotCeiling, SlotQuota, evaluate_budget, select_lineup,
};

fn raw(id: u32, position_id: u32, status_id: u32, average_score: f64, price: f64) -> RawPlayer {
    RawPlayer {
        id,
        nickname: format!("P{id}"),
        position_id,
        status_id,
        club_id: 1,
        average_score,
        price,
        games_played: 10,
    }
}

/// 1 Likely goalkeeper and 3 Likely forwards, prices [10, 12, 8] with
/// averages [9, 7, 8].
fn scenario_pool() -> Vec<PlayerRecord> {
    let snapshot = MarketSnapshot {
        players: vec![
            raw(1, 1, 7, 6.0, 5.0),
            raw(2, 5, 7, 9.0, 10.0),
            raw(3, 5, 7, 7.0, 12.0),
            raw(4, 5, 7, 8.0, 8.0),
        ],
        clubs: Default::default(),
    };
    filter_likely(&normalize_players(&snapshot))
}

fn scenario_quota() -> SlotQuota {
    SlotQuota::new(vec![(Position::Goalkeeper, 1), (Position::Forward, 2)])
}

#[test]
fn greedy_selection_takes_top_averages_per_position() {
    let pool = scenario_pool();
    let config = SelectionConfig {
        quota: scenario_quota(),
        criterion: RankCriterion::AverageScore,
        budget: 100.0,
        ceiling: None,
    };

    let lineup = select_lineup(&pool, &config);
    let ids: Vec<u32> = lineup.players.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 4]);
    assert!((lineup.total_cost - 23.0).abs() < 1e-9);
    assert!(lineup.feasible);
}

#[test]
fn slot_ceiling_excludes_expensive_picks_but_budget_can_still_overshoot() {
    let pool = scenario_pool();
    // Cap = (15 / 2) * 1.5 = 11.25: the 12.0 forward is out, the rest stay.
    let config = SelectionConfig {
        quota: scenario_quota(),
        criterion: RankCriterion::AverageScore,
        budget: 15.0,
        ceiling: Some(SlotCeiling::with_slots(1.5, 2)),
    };

    let lineup = select_lineup(&pool, &config);
    let ids: Vec<u32> = lineup.players.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 4]);
    assert!((lineup.total_cost - 23.0).abs() < 1e-9);
    assert!(!lineup.feasible);
    assert!((lineup.overshoot - 8.0).abs() < 1e-9);
}

#[test]
fn selector_respects_quota_counts_and_positions() {
    let pool = scenario_pool();
    let config = SelectionConfig {
        quota: SlotQuota::standard(),
        criterion: RankCriterion::AverageScore,
        budget: 100.0,
        ceiling: None,
    };
    let lineup = select_lineup(&pool, &config);

    for (position, count) in config.quota.entries() {
        let picked = lineup
            .players
            .iter()
            .filter(|p| p.position == *position)
            .count();
        assert!(picked <= *count);
    }
    // Pool has no defenders or midfielders: the lineup is short, never padded.
    assert_eq!(lineup.players.len(), 3);
    assert!(
        lineup
            .players
            .iter()
            .all(|p| p.position == Position::Goalkeeper || p.position == Position::Forward)
    );
}

#[test]
fn empty_pool_yields_empty_lineup_not_error() {
    let config = SelectionConfig {
        quota: SlotQuota::standard(),
        criterion: RankCriterion::Efficiency,
        budget: 120.0,
        ceiling: None,
    };
    let lineup = select_lineup(&[], &config);
    assert!(lineup.players.is_empty());
    assert_eq!(lineup.total_cost, 0.0);
    assert!(lineup.feasible);
    assert_eq!(lineup.overshoot, 0.0);
}

#[test]
fn ceiling_underfill_is_not_backfilled() {
    let pool = scenario_pool();
    // Tiny budget: every forward is over the cap, only the cheap keeper fits.
    let config = SelectionConfig {
        quota: scenario_quota(),
        criterion: RankCriterion::AverageScore,
        budget: 10.0,
        ceiling: Some(SlotCeiling::with_slots(1.5, 2)),
    };
    let lineup = select_lineup(&pool, &config);
    assert_eq!(lineup.players.len(), 1);
    assert_eq!(lineup.players[0].position, Position::Goalkeeper);
}

#[test]
fn evaluator_links_feasibility_to_overshoot() {
    let pool = scenario_pool();
    for budget in [0.0, 10.0, 23.0, 35.0, 500.0] {
        let verdict = evaluate_budget(&pool, budget);
        assert!(verdict.overshoot >= 0.0);
        assert_eq!(verdict.feasible, verdict.overshoot == 0.0);
    }
}
