use std::path::PathBuf;

use cartola_terminal::export::{default_export_path, export_market_csv};
use cartola_terminal::market_fetch;
use cartola_terminal::roster;

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(default_export_path);
    let min_games = std::env::var("MIN_GAMES")
        .ok()
        .and_then(|val| val.parse::<u32>().ok())
        .unwrap_or(3);

    let snapshot = market_fetch::fetch_market()?;
    let records = roster::normalize_players(&snapshot);
    let rows = roster::filter_min_games(&records, min_games);

    let report = export_market_csv(&path, &rows)?;
    println!(
        "Exported {} of {} players (min {} games) to {}",
        report.rows,
        records.len(),
        min_games,
        report.path.display()
    );
    Ok(())
}
