use std::collections::HashMap;

use cartola_terminal::matchups::{Fixture, favorable_matchups, weakest_defenses};
use cartola_terminal::roster::{MarketSnapshot, RawPlayer, normalize_players};

fn raw(id: u32, club_id: u32, status_id: u32, average_score: f64) -> RawPlayer {
    RawPlayer {
        id,
        nickname: format!("P{id}"),
        position_id: 5,
        status_id,
        club_id,
        average_score,
        price: 5.0,
        games_played: 10,
    }
}

fn clubs(entries: &[(u32, &str)]) -> HashMap<u32, String> {
    entries
        .iter()
        .map(|(id, name)| (*id, name.to_string()))
        .collect()
}

#[test]
fn sole_weak_club_flags_its_opponent_as_attacker() {
    // Club A means 2.0, club B means 8.0; K=1 makes A the only weak club.
    let snapshot = MarketSnapshot {
        players: vec![
            raw(1, 10, 7, 1.0),
            raw(2, 10, 7, 3.0),
            raw(3, 20, 7, 8.0),
        ],
        clubs: clubs(&[(10, "Clube A"), (20, "Clube B")]),
    };
    let records = normalize_players(&snapshot);
    let weak = weakest_defenses(&records, 1);
    assert_eq!(weak.len(), 1);
    assert_eq!(weak[0].club, "Clube A");

    let fixtures = vec![Fixture {
        home_id: 10,
        away_id: 20,
        kickoff: String::new(),
    }];
    let notes = favorable_matchups(&fixtures, &weak, &snapshot.clubs);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].attacker, "Clube B");
    assert_eq!(notes[0].weak_defense, "Clube A");
}

#[test]
fn weakness_uses_the_unfiltered_pool() {
    // The injured player's poor average drags his club below the other,
    // because weakness is computed over the full pool, not just Likely.
    let snapshot = MarketSnapshot {
        players: vec![
            raw(1, 10, 7, 5.0),
            raw(2, 10, 5, 0.2),
            raw(3, 20, 7, 4.0),
        ],
        clubs: clubs(&[(10, "Clube A"), (20, "Clube B")]),
    };
    let records = normalize_players(&snapshot);
    let weak = weakest_defenses(&records, 1);
    assert_eq!(weak[0].club, "Clube A");
    assert!((weak[0].mean_score - 2.6).abs() < 1e-9);
}

#[test]
fn at_most_k_clubs_and_never_more_than_present() {
    let snapshot = MarketSnapshot {
        players: vec![raw(1, 10, 7, 1.0), raw(2, 20, 7, 2.0), raw(3, 30, 7, 3.0)],
        clubs: HashMap::new(),
    };
    let records = normalize_players(&snapshot);
    assert_eq!(weakest_defenses(&records, 2).len(), 2);
    assert_eq!(weakest_defenses(&records, 5).len(), 3);
    assert_eq!(weakest_defenses(&records, 0).len(), 0);
}

#[test]
fn every_fixture_gets_at_most_one_note() {
    // All clubs weak: each fixture still yields exactly one note, and the
    // home side wins the both-weak tie.
    let snapshot = MarketSnapshot {
        players: vec![raw(1, 10, 7, 1.0), raw(2, 20, 7, 2.0)],
        clubs: clubs(&[(10, "Clube A"), (20, "Clube B")]),
    };
    let records = normalize_players(&snapshot);
    let weak = weakest_defenses(&records, 5);

    let fixtures = vec![
        Fixture {
            home_id: 10,
            away_id: 20,
            kickoff: String::new(),
        },
        Fixture {
            home_id: 20,
            away_id: 10,
            kickoff: String::new(),
        },
    ];
    let notes = favorable_matchups(&fixtures, &weak, &snapshot.clubs);
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].attacker, "Clube A");
    assert_eq!(notes[1].attacker, "Clube B");
}

#[test]
fn empty_inputs_produce_no_annotations() {
    assert!(weakest_defenses(&[], 5).is_empty());
    let notes = favorable_matchups(&[], &[], &HashMap::new());
    assert!(notes.is_empty());
}
