use std::collections::HashMap;

use crate::roster::{PlayerRecord, UNKNOWN_CLUB};

/// Weak clubs highlighted per round.
pub const DEFAULT_WEAK_CLUB_COUNT: usize = 5;

/// One scheduled match of the current round. Club references are upstream
/// ids; `kickoff` is the raw upstream timestamp and may be empty.
#[derive(Debug, Clone)]
pub struct Fixture {
    pub home_id: u32,
    pub away_id: u32,
    pub kickoff: String,
}

#[derive(Debug, Clone)]
pub struct ClubWeakness {
    pub club_id: u32,
    pub club: String,
    pub mean_score: f64,
    pub players: usize,
}

/// A fixture where one side's defense ranks among the weakest; the other
/// side is the favorable attacker.
#[derive(Debug, Clone)]
pub struct MatchupNote {
    pub attacker_id: u32,
    pub attacker: String,
    pub weak_defense_id: u32,
    pub weak_defense: String,
}

/// Mean average-score per club over the FULL pool (non-Likely players
/// included), ascending, truncated to `count`. Ties break on club name,
/// then club id, so the ranking is deterministic regardless of pool order.
pub fn weakest_defenses(pool: &[PlayerRecord], count: usize) -> Vec<ClubWeakness> {
    struct Acc {
        club: String,
        sum: f64,
        players: usize,
    }

    let mut by_club: HashMap<u32, Acc> = HashMap::new();
    for player in pool {
        let acc = by_club.entry(player.club_id).or_insert_with(|| Acc {
            club: player.club.clone(),
            sum: 0.0,
            players: 0,
        });
        acc.sum += player.average_score;
        acc.players += 1;
    }

    let mut weakness: Vec<ClubWeakness> = by_club
        .into_iter()
        .map(|(club_id, acc)| ClubWeakness {
            club_id,
            club: acc.club,
            mean_score: acc.sum / acc.players as f64,
            players: acc.players,
        })
        .collect();

    weakness.sort_by(|a, b| {
        a.mean_score
            .partial_cmp(&b.mean_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.club.cmp(&b.club))
            .then_with(|| a.club_id.cmp(&b.club_id))
    });
    weakness.truncate(count);
    weakness
}

/// At most one note per fixture. The away side's weakness is checked before
/// the home side's, so a fixture between two weak clubs flags the HOME club
/// as the attacker.
pub fn fixture_note(
    fixture: &Fixture,
    weak: &[ClubWeakness],
    clubs: &HashMap<u32, String>,
) -> Option<MatchupNote> {
    if let Some(defense) = weak.iter().find(|w| w.club_id == fixture.away_id) {
        return Some(note(fixture.home_id, defense, clubs));
    }
    if let Some(defense) = weak.iter().find(|w| w.club_id == fixture.home_id) {
        return Some(note(fixture.away_id, defense, clubs));
    }
    None
}

pub fn favorable_matchups(
    fixtures: &[Fixture],
    weak: &[ClubWeakness],
    clubs: &HashMap<u32, String>,
) -> Vec<MatchupNote> {
    fixtures
        .iter()
        .filter_map(|fixture| fixture_note(fixture, weak, clubs))
        .collect()
}

fn note(attacker_id: u32, defense: &ClubWeakness, clubs: &HashMap<u32, String>) -> MatchupNote {
    MatchupNote {
        attacker_id,
        attacker: clubs
            .get(&attacker_id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_CLUB.to_string()),
        weak_defense_id: defense.club_id,
        weak_defense: defense.club.clone(),
    }
}
