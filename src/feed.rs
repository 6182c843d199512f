use std::env;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crate::market_fetch;
use crate::state::{Delta, ProviderCommand};

/// Live provider thread: polls the market and fixtures endpoints on an
/// interval and relays manual refresh commands. Fetch failures become
/// console warnings; the app keeps whatever data it already has.
pub fn spawn_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        let poll_interval = Duration::from_secs(
            env::var("MARKET_POLL_SECS")
                .ok()
                .and_then(|val| val.parse::<u64>().ok())
                .unwrap_or(900)
                .max(60),
        );
        let mut last_poll: Option<Instant> = None;

        loop {
            if last_poll.is_none_or(|at| at.elapsed() >= poll_interval) {
                refresh_market(&tx);
                refresh_fixtures(&tx);
                last_poll = Some(Instant::now());
            }

            while let Ok(cmd) = cmd_rx.try_recv() {
                match cmd {
                    ProviderCommand::RefreshMarket => refresh_market(&tx),
                    ProviderCommand::RefreshFixtures => refresh_fixtures(&tx),
                }
            }

            thread::sleep(Duration::from_millis(900));
        }
    });
}

fn refresh_market(tx: &Sender<Delta>) {
    match market_fetch::fetch_market() {
        Ok(snapshot) => {
            let _ = tx.send(Delta::SetMarket(snapshot));
        }
        Err(err) => {
            let _ = tx.send(Delta::Log(format!("[WARN] Market fetch error: {err}")));
        }
    }
}

fn refresh_fixtures(tx: &Sender<Delta>) {
    match market_fetch::fetch_fixtures() {
        Ok(round) => {
            let _ = tx.send(Delta::SetFixtures {
                round: round.round,
                fixtures: round.fixtures,
            });
        }
        Err(err) => {
            let _ = tx.send(Delta::Log(format!("[WARN] Fixtures fetch error: {err}")));
        }
    }
}
