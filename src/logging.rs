//! Log level selection and subscriber setup.

use tracing::Level;

/// Maps a level name to a tracing level using only its first character.
///
/// `f` (fatal) maps to ERROR. Returns `None` for anything unrecognized.
pub fn parse_level(raw: &str) -> Option<Level> {
    match raw.chars().next()? {
        'd' => Some(Level::DEBUG),
        'i' => Some(Level::INFO),
        'w' => Some(Level::WARN),
        'e' | 'f' => Some(Level::ERROR),
        _ => None,
    }
}

/// Installs the global fmt subscriber. Falls back to INFO with a warning when
/// `raw` is not a recognized level.
pub fn init(raw: &str) {
    let level = parse_level(raw);
    tracing_subscriber::fmt()
        .with_max_level(level.unwrap_or(Level::INFO))
        .init();
    if level.is_none() {
        tracing::warn!("bad log level (only the first character is used): \"{}\"", raw);
    }
    tracing::debug!("LOGLEVEL: \"{}\"", raw);
}
