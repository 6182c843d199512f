use cartola_terminal::market_fetch;
use cartola_terminal::matchups::{DEFAULT_WEAK_CLUB_COUNT, favorable_matchups, weakest_defenses};
use cartola_terminal::roster;
use cartola_terminal::selection::{
    RankCriterion, SelectionConfig, SlotCeiling, SlotQuota, select_lineup,
};

// Headless lineup suggestion: fetch the market and fixtures, print the
// greedy pick plus the round's weak-defense report.
fn main() -> anyhow::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let budget = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<f64>().ok())
        .or_else(|| {
            std::env::var("TEAM_BUDGET")
                .ok()
                .and_then(|val| val.parse::<f64>().ok())
        })
        .unwrap_or(120.0);
    let min_games = std::env::var("MIN_GAMES")
        .ok()
        .and_then(|val| val.parse::<u32>().ok())
        .unwrap_or(3);
    let criterion = match std::env::var("RANK_CRITERION").as_deref() {
        Ok("efficiency") => RankCriterion::Efficiency,
        _ => RankCriterion::AverageScore,
    };
    let ceiling = std::env::var("SLOT_CEILING")
        .ok()
        .and_then(|val| val.parse::<f64>().ok())
        .filter(|mult| *mult > 0.0)
        .map(SlotCeiling::new);

    let snapshot = market_fetch::fetch_market()?;
    let records = roster::normalize_players(&snapshot);
    if records.is_empty() {
        println!("Market is empty (market may be closed).");
        return Ok(());
    }

    let pool = roster::filter_likely(&roster::filter_min_games(&records, min_games));
    let config = SelectionConfig {
        quota: SlotQuota::standard(),
        criterion,
        budget,
        ceiling,
    };
    let lineup = select_lineup(&pool, &config);

    println!(
        "Suggested XI ({}, budget C$ {budget:.2}, min {min_games} games):",
        criterion.label()
    );
    for p in &lineup.players {
        println!(
            "  {:<12} {:<18} {:<16} avg {:>5.2}  C$ {:>6.2}",
            p.position.label(),
            p.nickname,
            p.club,
            p.average_score,
            p.price
        );
    }
    println!("Total cost: C$ {:.2}", lineup.total_cost);
    if !lineup.feasible {
        println!(
            "WARNING: over budget by C$ {:.2} — raise the budget or enable the slot ceiling",
            lineup.overshoot
        );
    }
    if lineup.players.len() < config.quota.total_slots() {
        println!(
            "WARNING: only {} of {} slots filled",
            lineup.players.len(),
            config.quota.total_slots()
        );
    }

    let weakness = weakest_defenses(&records, DEFAULT_WEAK_CLUB_COUNT);
    println!("\nWeak defenses:");
    for w in &weakness {
        println!("  {:<16} mean {:>5.2} ({} players)", w.club, w.mean_score, w.players);
    }

    match market_fetch::fetch_fixtures() {
        Ok(round) => {
            let notes = favorable_matchups(&round.fixtures, &weakness, &snapshot.clubs);
            if notes.is_empty() {
                println!("\nNo favorable matchups this round.");
            } else {
                println!("\nFavorable matchups:");
                for note in notes {
                    println!(
                        "  {} attacks the weak defense of {}",
                        note.attacker, note.weak_defense
                    );
                }
            }
        }
        Err(err) => eprintln!("fixtures unavailable: {err}"),
    }

    Ok(())
}
