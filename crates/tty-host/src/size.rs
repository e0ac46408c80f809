//! Terminal geometry.

/// Default number of columns when the host cannot tell.
pub const DEFAULT_COLUMNS: u16 = 80;

/// Default number of rows when the host cannot tell.
pub const DEFAULT_ROWS: u16 = 24;

/// Terminal window size in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowSize {
    /// Number of columns (characters per line).
    pub cols: u16,
    /// Number of rows (lines).
    pub rows: u16,
}

impl WindowSize {
    /// Create a new window size with the given dimensions.
    #[must_use]
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    /// Build a size from `COLUMNS`/`LINES`-style variables.
    ///
    /// Missing, unparsable or zero values fall back to 80x24 per axis.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse = |name: &str, default: u16| {
            lookup(name)
                .and_then(|v| v.trim().parse::<u16>().ok())
                .filter(|&n| n > 0)
                .unwrap_or(default)
        };
        Self::new(parse("COLUMNS", DEFAULT_COLUMNS), parse("LINES", DEFAULT_ROWS))
    }

    /// Build a size from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMNS, DEFAULT_ROWS)
    }
}

impl From<(u16, u16)> for WindowSize {
    fn from((cols, rows): (u16, u16)) -> Self {
        Self::new(cols, rows)
    }
}
