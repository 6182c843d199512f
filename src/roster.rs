use std::collections::HashMap;

/// Name used whenever a club id has no entry in the market's club table.
pub const UNKNOWN_CLUB: &str = "unknown";

/// Upstream position ids: 1 goalkeeper, 2 full-back, 3 centre-back,
/// 4 midfielder, 5 forward, 6 coach. Anything else maps to Unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Goalkeeper,
    FullBack,
    CenterBack,
    Midfielder,
    Forward,
    Coach,
    Unknown,
}

impl Position {
    pub fn from_code(code: u32) -> Self {
        match code {
            1 => Position::Goalkeeper,
            2 => Position::FullBack,
            3 => Position::CenterBack,
            4 => Position::Midfielder,
            5 => Position::Forward,
            6 => Position::Coach,
            _ => Position::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Position::Goalkeeper => "Goalkeeper",
            Position::FullBack => "Full-back",
            Position::CenterBack => "Centre-back",
            Position::Midfielder => "Midfielder",
            Position::Forward => "Forward",
            Position::Coach => "Coach",
            Position::Unknown => "unknown",
        }
    }
}

/// Upstream status ids: 7 likely, 2 doubtful, 5 injured, 6 suspended, 3 void.
/// Anything else maps to Unknown and is treated as not available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Likely,
    Doubtful,
    Injured,
    Suspended,
    Void,
    Unknown,
}

impl Status {
    pub fn from_code(code: u32) -> Self {
        match code {
            7 => Status::Likely,
            2 => Status::Doubtful,
            5 => Status::Injured,
            6 => Status::Suspended,
            3 => Status::Void,
            _ => Status::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Likely => "Likely",
            Status::Doubtful => "Doubtful",
            Status::Injured => "Injured",
            Status::Suspended => "Suspended",
            Status::Void => "Void",
            Status::Unknown => "unknown",
        }
    }
}

/// One market entry as the upstream feed delivers it: integer codes, no
/// derived fields. The normalizer turns these into `PlayerRecord`s.
#[derive(Debug, Clone)]
pub struct RawPlayer {
    pub id: u32,
    pub nickname: String,
    pub position_id: u32,
    pub status_id: u32,
    pub club_id: u32,
    pub average_score: f64,
    pub price: f64,
    pub games_played: u32,
}

/// Raw market snapshot: player entries plus the club id → name table that
/// ships in the same payload.
#[derive(Debug, Clone, Default)]
pub struct MarketSnapshot {
    pub players: Vec<RawPlayer>,
    pub clubs: HashMap<u32, String>,
}

#[derive(Debug, Clone)]
pub struct PlayerRecord {
    pub id: u32,
    pub nickname: String,
    pub position: Position,
    pub status: Status,
    pub club_id: u32,
    pub club: String,
    pub average_score: f64,
    pub price: f64,
    pub games_played: u32,
    pub efficiency: f64,
}

/// Score per unit price. A free (price 0) player has no defined efficiency
/// and scores 0 rather than dividing by zero.
pub fn efficiency(average_score: f64, price: f64) -> f64 {
    if price > 0.0 {
        average_score / price
    } else {
        0.0
    }
}

/// Resolve every coded field and derive efficiency. A code with no table
/// entry resolves to its Unknown variant (clubs to the "unknown" name);
/// one bad entry never drops the rest of the batch.
pub fn normalize_players(snapshot: &MarketSnapshot) -> Vec<PlayerRecord> {
    snapshot
        .players
        .iter()
        .map(|raw| PlayerRecord {
            id: raw.id,
            nickname: raw.nickname.clone(),
            position: Position::from_code(raw.position_id),
            status: Status::from_code(raw.status_id),
            club_id: raw.club_id,
            club: snapshot
                .clubs
                .get(&raw.club_id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_CLUB.to_string()),
            average_score: raw.average_score,
            price: raw.price,
            games_played: raw.games_played,
            efficiency: efficiency(raw.average_score, raw.price),
        })
        .collect()
}

/// Players flagged as likely to play. Order-preserving and idempotent.
pub fn filter_likely(pool: &[PlayerRecord]) -> Vec<PlayerRecord> {
    pool.iter()
        .filter(|p| p.status == Status::Likely)
        .cloned()
        .collect()
}

/// Players with at least `min_games` appearances this season.
pub fn filter_min_games(pool: &[PlayerRecord], min_games: u32) -> Vec<PlayerRecord> {
    pool.iter()
        .filter(|p| p.games_played >= min_games)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: u32, position_id: u32, status_id: u32, price: f64) -> RawPlayer {
        RawPlayer {
            id,
            nickname: format!("P{id}"),
            position_id,
            status_id,
            club_id: 100 + id,
            average_score: 4.0,
            price,
            games_played: 5,
        }
    }

    #[test]
    fn efficiency_is_zero_for_free_players() {
        assert_eq!(efficiency(7.5, 0.0), 0.0);
        assert_eq!(efficiency(7.5, 5.0), 1.5);
        assert!(efficiency(0.0, 3.0) == 0.0);
    }

    #[test]
    fn unmapped_codes_resolve_to_unknown() {
        assert_eq!(Position::from_code(99), Position::Unknown);
        assert_eq!(Status::from_code(99), Status::Unknown);
        assert_eq!(Position::Unknown.label(), "unknown");
        assert_eq!(Status::Unknown.label(), "unknown");
    }

    #[test]
    fn normalize_resolves_codes_and_club_names() {
        let mut clubs = HashMap::new();
        clubs.insert(101, "Alvorada".to_string());
        let snapshot = MarketSnapshot {
            players: vec![raw(1, 5, 7, 8.0), raw(2, 42, 99, 0.0)],
            clubs,
        };

        let records = normalize_players(&snapshot);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].position, Position::Forward);
        assert_eq!(records[0].status, Status::Likely);
        assert_eq!(records[0].club, "Alvorada");
        assert_eq!(records[0].efficiency, 0.5);

        // Bad codes and a missing club entry degrade per-record, not per-batch.
        assert_eq!(records[1].position, Position::Unknown);
        assert_eq!(records[1].status, Status::Unknown);
        assert_eq!(records[1].club, UNKNOWN_CLUB);
        assert_eq!(records[1].efficiency, 0.0);
    }

    #[test]
    fn likely_filter_is_idempotent_and_order_preserving() {
        let snapshot = MarketSnapshot {
            players: vec![raw(1, 5, 7, 1.0), raw(2, 5, 2, 1.0), raw(3, 5, 7, 1.0)],
            clubs: HashMap::new(),
        };
        let records = normalize_players(&snapshot);

        let once = filter_likely(&records);
        let ids: Vec<u32> = once.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);

        let twice = filter_likely(&once);
        let ids_again: Vec<u32> = twice.iter().map(|p| p.id).collect();
        assert_eq!(ids, ids_again);
    }

    #[test]
    fn min_games_filter_keeps_threshold_players() {
        let mut a = raw(1, 5, 7, 1.0);
        a.games_played = 2;
        let mut b = raw(2, 5, 7, 1.0);
        b.games_played = 3;
        let records = normalize_players(&MarketSnapshot {
            players: vec![a, b],
            clubs: HashMap::new(),
        });

        let kept = filter_min_games(&records, 3);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, 2);
        assert_eq!(filter_min_games(&records, 0).len(), 2);
    }
}
