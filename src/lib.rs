pub mod export;
pub mod fake_feed;
pub mod feed;
pub mod http_client;
pub mod market_fetch;
pub mod matchups;
pub mod roster;
pub mod selection;
pub mod snapshot_cache;
pub mod state;
