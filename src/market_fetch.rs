use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::matchups::Fixture;
use crate::roster::{MarketSnapshot, RawPlayer};
use crate::snapshot_cache::fetch_cached;

const MARKET_URL: &str = "https://api.cartola.globo.com/atletas/mercado";
const FIXTURES_URL: &str = "https://api.cartola.globo.com/partidas";

#[derive(Debug, Clone, Default)]
pub struct RoundFixtures {
    pub round: Option<u32>,
    pub fixtures: Vec<Fixture>,
}

pub fn fetch_market() -> Result<MarketSnapshot> {
    let body = fetch_cached("mercado", MARKET_URL).context("request failed")?;
    parse_market_json(&body)
}

pub fn fetch_fixtures() -> Result<RoundFixtures> {
    let body = fetch_cached("partidas", FIXTURES_URL).context("request failed")?;
    parse_fixtures_json(&body)
}

#[derive(Debug, Deserialize)]
struct MarketPayload {
    #[serde(default)]
    atletas: Vec<MarketEntry>,
    // Keyed by *string* club id upstream; non-numeric keys are skipped.
    #[serde(default)]
    clubes: HashMap<String, ClubEntry>,
}

#[derive(Debug, Deserialize)]
struct MarketEntry {
    atleta_id: u32,
    #[serde(default)]
    apelido: String,
    #[serde(default)]
    posicao_id: u32,
    #[serde(default)]
    status_id: u32,
    #[serde(default)]
    clube_id: u32,
    #[serde(default)]
    media_num: f64,
    #[serde(default)]
    preco_num: f64,
    #[serde(default)]
    jogos_num: u32,
}

#[derive(Debug, Deserialize)]
struct ClubEntry {
    #[serde(default)]
    nome: String,
}

#[derive(Debug, Deserialize)]
struct FixturesPayload {
    #[serde(default)]
    rodada: Option<u32>,
    #[serde(default)]
    partidas: Vec<FixtureEntry>,
}

#[derive(Debug, Deserialize)]
struct FixtureEntry {
    #[serde(default)]
    clube_casa_id: u32,
    #[serde(default)]
    clube_visitante_id: u32,
    #[serde(default)]
    partida_data: String,
}

/// An empty or `"null"` body is an empty market, not an error: a closed
/// market window upstream must degrade to an empty pool downstream.
pub fn parse_market_json(raw: &str) -> Result<MarketSnapshot> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(MarketSnapshot::default());
    }

    let payload: MarketPayload = serde_json::from_str(trimmed).context("invalid market json")?;

    let mut clubs = HashMap::with_capacity(payload.clubes.len());
    for (key, club) in payload.clubes {
        let Ok(id) = key.trim().parse::<u32>() else {
            continue;
        };
        clubs.insert(id, club.nome);
    }

    let players = payload
        .atletas
        .into_iter()
        .map(|entry| RawPlayer {
            id: entry.atleta_id,
            nickname: entry.apelido,
            position_id: entry.posicao_id,
            status_id: entry.status_id,
            club_id: entry.clube_id,
            average_score: entry.media_num,
            price: entry.preco_num,
            games_played: entry.jogos_num,
        })
        .collect();

    Ok(MarketSnapshot { players, clubs })
}

pub fn parse_fixtures_json(raw: &str) -> Result<RoundFixtures> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(RoundFixtures::default());
    }

    let payload: FixturesPayload =
        serde_json::from_str(trimmed).context("invalid fixtures json")?;

    let fixtures = payload
        .partidas
        .into_iter()
        .filter(|entry| entry.clube_casa_id != 0 && entry.clube_visitante_id != 0)
        .map(|entry| Fixture {
            home_id: entry.clube_casa_id,
            away_id: entry.clube_visitante_id,
            kickoff: entry.partida_data,
        })
        .collect();

    Ok(RoundFixtures {
        round: payload.rodada,
        fixtures,
    })
}
