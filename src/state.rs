use std::collections::{HashMap, VecDeque};
use std::env;
use std::time::SystemTime;

use crate::matchups::{self, ClubWeakness, DEFAULT_WEAK_CLUB_COUNT, Fixture, MatchupNote};
use crate::roster::{self, PlayerRecord};
use crate::selection::{
    self, DEFAULT_CEILING_MULTIPLIER, LINEUP_SIZE, Lineup, RankCriterion, SelectionConfig,
    SlotCeiling, SlotQuota,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Market,
    Lineup,
    Matchups,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketSort {
    AverageScore,
    Efficiency,
    Price,
    Games,
}

// Presentation-level input ranges; the core itself accepts any budget.
pub const MIN_BUDGET: f64 = 50.0;
pub const MAX_BUDGET: f64 = 300.0;
pub const BUDGET_STEP: f64 = 5.0;
pub const MAX_MIN_GAMES: u32 = 38;

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub sort: MarketSort,
    pub selected: usize,

    // Normalized data, rebuilt fresh on every market delta.
    pub records: Vec<PlayerRecord>,
    pub clubs: HashMap<u32, String>,
    pub fixtures: Vec<Fixture>,
    pub round: Option<u32>,
    pub market_fetched_at: Option<SystemTime>,
    pub fixtures_fetched_at: Option<SystemTime>,

    // Selection configuration.
    pub budget: f64,
    pub min_games: u32,
    pub criterion: RankCriterion,
    pub ceiling_multiplier: Option<f64>,

    // Derived outputs.
    pub lineup: Option<Lineup>,
    pub weakness: Vec<ClubWeakness>,
    pub notes: Vec<MatchupNote>,

    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        let budget = parse_env_or("TEAM_BUDGET", 120.0f64).clamp(MIN_BUDGET, MAX_BUDGET);
        let min_games = parse_env_or("MIN_GAMES", 3u32).min(MAX_MIN_GAMES);
        let criterion = match env::var("RANK_CRITERION").as_deref() {
            Ok("efficiency") => RankCriterion::Efficiency,
            _ => RankCriterion::AverageScore,
        };
        let ceiling_multiplier = env::var("SLOT_CEILING")
            .ok()
            .and_then(|val| val.parse::<f64>().ok())
            .filter(|mult| *mult > 0.0);

        Self {
            screen: Screen::Market,
            sort: MarketSort::AverageScore,
            selected: 0,
            records: Vec::new(),
            clubs: HashMap::new(),
            fixtures: Vec::new(),
            round: None,
            market_fetched_at: None,
            fixtures_fetched_at: None,
            budget,
            min_games,
            criterion,
            ceiling_multiplier,
            lineup: None,
            weakness: Vec::new(),
            notes: Vec::new(),
            logs: VecDeque::with_capacity(200),
            help_overlay: false,
        }
    }

    /// The market table as presented: min-games filter applied, sorted by
    /// the active column descending. Ties keep normalized order.
    pub fn listing(&self) -> Vec<&PlayerRecord> {
        let mut rows: Vec<&PlayerRecord> = self
            .records
            .iter()
            .filter(|p| p.games_played >= self.min_games)
            .collect();
        rows.sort_by(|a, b| {
            let key = |p: &PlayerRecord| match self.sort {
                MarketSort::AverageScore => p.average_score,
                MarketSort::Efficiency => p.efficiency,
                MarketSort::Price => p.price,
                MarketSort::Games => p.games_played as f64,
            };
            key(b)
                .partial_cmp(&key(a))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        rows
    }

    /// Candidates eligible for selection: past the games filter and flagged
    /// Likely. Weakness analysis deliberately does NOT use this pool.
    pub fn eligible_pool(&self) -> Vec<PlayerRecord> {
        roster::filter_likely(&roster::filter_min_games(&self.records, self.min_games))
    }

    pub fn selection_config(&self) -> SelectionConfig {
        SelectionConfig {
            quota: SlotQuota::standard(),
            criterion: self.criterion,
            budget: self.budget,
            ceiling: self.ceiling_multiplier.map(SlotCeiling::new),
        }
    }

    pub fn generate_lineup(&mut self) {
        let pool = self.eligible_pool();
        let lineup = selection::select_lineup(&pool, &self.selection_config());

        self.push_log(format!(
            "[INFO] Lineup: {} players, cost C$ {:.2} ({})",
            lineup.players.len(),
            lineup.total_cost,
            self.criterion.label()
        ));
        if lineup.players.len() < LINEUP_SIZE {
            self.push_log(format!(
                "[WARN] Lineup under-filled: {} of {LINEUP_SIZE} slots",
                lineup.players.len()
            ));
        }
        if !lineup.feasible {
            self.push_log(format!(
                "[WARN] Cost C$ {:.2} exceeds budget C$ {:.2} (over by C$ {:.2})",
                lineup.total_cost, lineup.budget, lineup.overshoot
            ));
        }
        self.lineup = Some(lineup);
    }

    pub fn recompute_matchups(&mut self) {
        self.weakness = matchups::weakest_defenses(&self.records, DEFAULT_WEAK_CLUB_COUNT);
        self.notes = matchups::favorable_matchups(&self.fixtures, &self.weakness, &self.clubs);
    }

    pub fn adjust_budget(&mut self, step: f64) {
        self.budget = (self.budget + step).clamp(MIN_BUDGET, MAX_BUDGET);
        self.push_log(format!("[INFO] Budget: C$ {:.2}", self.budget));
    }

    pub fn adjust_min_games(&mut self, delta: i32) {
        self.min_games = self
            .min_games
            .saturating_add_signed(delta)
            .min(MAX_MIN_GAMES);
        self.clamp_selected();
        self.push_log(format!("[INFO] Min games: {}", self.min_games));
    }

    pub fn toggle_criterion(&mut self) {
        self.criterion = match self.criterion {
            RankCriterion::AverageScore => RankCriterion::Efficiency,
            RankCriterion::Efficiency => RankCriterion::AverageScore,
        };
        self.push_log(format!("[INFO] Criterion: {}", self.criterion.label()));
    }

    pub fn toggle_ceiling(&mut self) {
        self.ceiling_multiplier = match self.ceiling_multiplier {
            Some(_) => None,
            None => Some(DEFAULT_CEILING_MULTIPLIER),
        };
        match self.ceiling_multiplier {
            Some(mult) => self.push_log(format!(
                "[INFO] Slot ceiling on: (budget/{LINEUP_SIZE}) x {mult:.1}"
            )),
            None => self.push_log("[INFO] Slot ceiling off"),
        }
    }

    pub fn cycle_sort(&mut self) {
        self.sort = match self.sort {
            MarketSort::AverageScore => MarketSort::Efficiency,
            MarketSort::Efficiency => MarketSort::Price,
            MarketSort::Price => MarketSort::Games,
            MarketSort::Games => MarketSort::AverageScore,
        };
        self.selected = 0;
    }

    pub fn select_next(&mut self) {
        let total = self.listing().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % total;
    }

    pub fn select_prev(&mut self) {
        let total = self.listing().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        if self.selected == 0 {
            self.selected = total - 1;
        } else {
            self.selected -= 1;
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    fn clamp_selected(&mut self) {
        let total = self.listing().len();
        if total == 0 {
            self.selected = 0;
        } else if self.selected >= total {
            self.selected = total - 1;
        }
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    SetMarket(roster::MarketSnapshot),
    SetFixtures {
        round: Option<u32>,
        fixtures: Vec<Fixture>,
    },
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    RefreshMarket,
    RefreshFixtures,
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetMarket(snapshot) => {
            state.records = roster::normalize_players(&snapshot);
            state.clubs = snapshot.clubs;
            state.market_fetched_at = Some(SystemTime::now());
            state.recompute_matchups();
            state.clamp_selected();
            state.push_log(format!(
                "[INFO] Market updated: {} players, {} clubs",
                state.records.len(),
                state.clubs.len()
            ));
        }
        Delta::SetFixtures { round, fixtures } => {
            state.round = round;
            state.fixtures = fixtures;
            state.fixtures_fetched_at = Some(SystemTime::now());
            state.recompute_matchups();
            match state.round {
                Some(round) => state.push_log(format!(
                    "[INFO] Fixtures updated: round {round}, {} matches",
                    state.fixtures.len()
                )),
                None => state.push_log(format!(
                    "[INFO] Fixtures updated: {} matches",
                    state.fixtures.len()
                )),
            }
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}

pub fn screen_label(screen: Screen) -> &'static str {
    match screen {
        Screen::Market => "MARKET",
        Screen::Lineup => "LINEUP",
        Screen::Matchups => "MATCHUPS",
    }
}

pub fn sort_label(sort: MarketSort) -> &'static str {
    match sort {
        MarketSort::AverageScore => "AVG",
        MarketSort::Efficiency => "EFF",
        MarketSort::Price => "PRICE",
        MarketSort::Games => "GAMES",
    }
}

fn parse_env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|val| val.parse::<T>().ok())
        .unwrap_or(default)
}
