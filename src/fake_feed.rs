use std::collections::HashMap;
use std::env;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::matchups::Fixture;
use crate::roster::{MarketSnapshot, RawPlayer};
use crate::state::{Delta, ProviderCommand};

/// Offline provider: a generated market snapshot with light price jitter,
/// so the TUI can be exercised without the upstream API.
pub fn spawn_sample_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        let mut rng = rand::thread_rng();
        let mut snapshot = sample_market();
        let fixtures = sample_fixtures();

        let jitter_interval = Duration::from_secs(
            env::var("SAMPLE_JITTER_SECS")
                .ok()
                .and_then(|val| val.parse::<u64>().ok())
                .unwrap_or(15)
                .max(5),
        );
        let mut last_jitter = Instant::now();

        let _ = tx.send(Delta::Log("[INFO] Sample market loaded".to_string()));
        let _ = tx.send(Delta::SetMarket(snapshot.clone()));
        let _ = tx.send(Delta::SetFixtures {
            round: Some(1),
            fixtures: fixtures.clone(),
        });

        loop {
            thread::sleep(Duration::from_millis(900));

            if last_jitter.elapsed() >= jitter_interval {
                jitter_prices(&mut snapshot, &mut rng);
                let _ = tx.send(Delta::SetMarket(snapshot.clone()));
                last_jitter = Instant::now();
            }

            while let Ok(cmd) = cmd_rx.try_recv() {
                match cmd {
                    ProviderCommand::RefreshMarket => {
                        let _ = tx.send(Delta::SetMarket(snapshot.clone()));
                    }
                    ProviderCommand::RefreshFixtures => {
                        let _ = tx.send(Delta::SetFixtures {
                            round: Some(1),
                            fixtures: fixtures.clone(),
                        });
                    }
                }
            }
        }
    });
}

fn jitter_prices(snapshot: &mut MarketSnapshot, rng: &mut impl Rng) {
    for player in &mut snapshot.players {
        if rng.gen_bool(0.25) {
            let delta: f64 = rng.gen_range(-0.6..0.6);
            player.price = (player.price + delta).max(0.5);
        }
    }
}

const CLUB_ALVORADA: u32 = 301;
const CLUB_MARE: u32 = 302;
const CLUB_SERRA: u32 = 303;
const CLUB_COMETA: u32 = 304;
const CLUB_VILA: u32 = 305;
const CLUB_TUBARO: u32 = 306;

fn sample_market() -> MarketSnapshot {
    let clubs: HashMap<u32, String> = [
        (CLUB_ALVORADA, "Alvorada"),
        (CLUB_MARE, "Maré FC"),
        (CLUB_SERRA, "Serra Azul"),
        (CLUB_COMETA, "Cometa"),
        (CLUB_VILA, "Vila Real"),
        (CLUB_TUBARO, "Tubarões"),
    ]
    .into_iter()
    .map(|(id, name)| (id, name.to_string()))
    .collect();

    // (nickname, posicao_id, status_id, club, media, preco, jogos)
    let entries: [(&str, u32, u32, u32, f64, f64, u32); 38] = [
        ("Bastião", 1, 7, CLUB_ALVORADA, 6.1, 9.4, 12),
        ("Teco", 1, 7, CLUB_MARE, 4.8, 6.2, 11),
        ("Galego", 1, 2, CLUB_SERRA, 5.3, 7.8, 9),
        ("Mão de Luva", 1, 7, CLUB_COMETA, 3.9, 4.5, 12),
        ("Careca", 1, 7, CLUB_VILA, 2.7, 3.1, 8),
        ("Lelê", 2, 7, CLUB_ALVORADA, 5.6, 10.2, 12),
        ("Pivete", 2, 7, CLUB_ALVORADA, 4.1, 5.9, 10),
        ("Zé Rasteira", 2, 7, CLUB_MARE, 3.8, 4.4, 12),
        ("Foguinho", 2, 5, CLUB_SERRA, 6.2, 11.7, 11),
        ("Canhoto", 2, 7, CLUB_COMETA, 2.9, 3.6, 6),
        ("Trilho", 2, 7, CLUB_TUBARO, 4.6, 7.1, 12),
        ("Muralha", 3, 7, CLUB_ALVORADA, 5.9, 9.8, 12),
        ("Xerife", 3, 7, CLUB_MARE, 6.4, 12.3, 11),
        ("Pedrão", 3, 7, CLUB_SERRA, 3.2, 4.0, 12),
        ("Vigia", 3, 6, CLUB_COMETA, 5.1, 8.2, 10),
        ("Torre", 3, 7, CLUB_VILA, 2.4, 2.9, 7),
        ("Cacique", 3, 7, CLUB_TUBARO, 4.3, 6.6, 12),
        ("Maestro", 4, 7, CLUB_ALVORADA, 8.2, 16.4, 12),
        ("Miúdo", 4, 7, CLUB_MARE, 6.7, 10.9, 11),
        ("Canela", 4, 7, CLUB_SERRA, 5.5, 8.0, 12),
        ("Professor", 4, 2, CLUB_COMETA, 7.1, 13.6, 10),
        ("Birosca", 4, 7, CLUB_VILA, 3.4, 4.2, 9),
        ("Formiga", 4, 7, CLUB_TUBARO, 4.9, 6.8, 12),
        ("Chispa", 4, 7, CLUB_MARE, 2.2, 2.5, 2),
        ("Russo", 4, 7, CLUB_VILA, 5.8, 9.1, 11),
        ("Tromba", 5, 7, CLUB_ALVORADA, 9.3, 19.8, 12),
        ("Gaivota", 5, 7, CLUB_MARE, 7.6, 14.2, 11),
        ("Facão", 5, 7, CLUB_SERRA, 6.9, 11.4, 12),
        ("Pipoca", 5, 5, CLUB_COMETA, 8.1, 17.3, 10),
        ("Ventania", 5, 7, CLUB_VILA, 4.4, 5.7, 8),
        ("Marujo", 5, 7, CLUB_TUBARO, 5.2, 7.9, 12),
        ("Foguete", 5, 7, CLUB_COMETA, 3.1, 3.8, 4),
        ("Bambu", 5, 3, CLUB_SERRA, 2.0, 2.2, 3),
        ("Seu Zico", 6, 7, CLUB_ALVORADA, 4.7, 8.9, 12),
        ("Mestre Lua", 6, 7, CLUB_MARE, 3.9, 6.4, 12),
        ("Novato", 5, 7, CLUB_VILA, 0.0, 0.0, 0),
        ("Lagarto", 2, 7, CLUB_VILA, 3.3, 4.8, 11),
        ("Breno Mudo", 3, 99, CLUB_COMETA, 4.0, 5.5, 9),
    ];

    let players = entries
        .into_iter()
        .enumerate()
        .map(
            |(idx, (nickname, position_id, status_id, club_id, average_score, price, games))| {
                RawPlayer {
                    id: 9000 + idx as u32,
                    nickname: nickname.to_string(),
                    position_id,
                    status_id,
                    club_id,
                    average_score,
                    price,
                    games_played: games,
                }
            },
        )
        .collect();

    MarketSnapshot { players, clubs }
}

fn sample_fixtures() -> Vec<Fixture> {
    [
        (CLUB_ALVORADA, CLUB_VILA),
        (CLUB_MARE, CLUB_SERRA),
        (CLUB_TUBARO, CLUB_COMETA),
    ]
    .into_iter()
    .map(|(home_id, away_id)| Fixture {
        home_id,
        away_id,
        kickoff: "2026-05-10 16:00".to_string(),
    })
    .collect()
}
