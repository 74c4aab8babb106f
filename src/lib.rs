pub mod driver;
pub mod gameplay;
pub mod plan;
pub mod select;
pub mod transport;

/// node/site identifier
pub type NodeId = u32;

/// the name this punter sends during handshake
pub const PUNTER_NAME: &str = "quiet_cartographer";

/// fraction of `moves_total` reserved as a buffer, depending on whether futures are enabled
pub const BUDGET_RESERVE_WITH_FUTURES: f64 = 0.10;
pub const BUDGET_RESERVE_WITHOUT_FUTURES: f64 = 0.05;

/// fraction of mines that get a future declared, depending on whether options are enabled
pub const FUTURES_FRACTION_WITH_OPTIONS: f64 = 0.30;
pub const FUTURES_FRACTION_WITHOUT_OPTIONS: f64 = 0.10;

/// hard cap on how many unclaimed edges `unclaimed_edges_from`-style scans collect
pub const UNCLAIMED_SCAN_CAP: usize = 100;

/// initialize stderr-only logging
///
/// stdout is the protocol channel and must never receive a log line.
pub fn init_logging() {
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let _ = simplelog::TermLogger::init(
        log::LevelFilter::Info,
        config,
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Never,
    );
}
