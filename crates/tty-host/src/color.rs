//! Color depth detection.
//!
//! Follows the conventions terminal runtimes use to guess how many colors
//! the attached terminal supports, expressed as bits per color:
//!
//! | bits | colors |
//! |------|--------|
//! | 1    | 2      |
//! | 4    | 16     |
//! | 8    | 256    |
//! | 24   | 16M    |

/// Two colors.
pub const COLORS_2: u8 = 1;
/// Sixteen colors.
pub const COLORS_16: u8 = 4;
/// 256 colors.
pub const COLORS_256: u8 = 8;
/// Truecolor.
pub const COLORS_16M: u8 = 24;

/// `TERM` values known to support at least 16 colors.
const TERM_16: &[&str] = &[
    "eterm",
    "cons25",
    "console",
    "cygwin",
    "dtterm",
    "gnome",
    "hurd",
    "jfbterm",
    "konsole",
    "kterm",
    "mlterm",
    "mosh",
    "putty",
    "st",
    "terminator",
    "xterm",
];

/// `TERM` values known to support 256 colors.
const TERM_256: &[&str] = &["rxvt-unicode-24bit", "mintty", "alacritty"];

/// `TERM` prefixes implying 16 colors.
const TERM_16_PREFIXES: &[&str] = &["ansi", "color", "linux", "con", "rxvt", "screen", "tmux", "vt100", "xterm"];

/// Detect the color depth from an arbitrary variable lookup.
#[must_use]
pub fn color_depth_from<F>(lookup: F) -> u8
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(force) = lookup("FORCE_COLOR") {
        return match force.trim() {
            "" | "1" | "true" => COLORS_16,
            "2" => COLORS_256,
            "3" => COLORS_16M,
            _ => COLORS_2,
        };
    }

    let term = lookup("TERM");
    if lookup("NODE_DISABLE_COLORS").is_some()
        || lookup("NO_COLOR").is_some_and(|v| !v.is_empty())
        || term.as_deref() == Some("dumb")
    {
        return COLORS_2;
    }

    if lookup("TMUX").is_some() {
        return COLORS_16M;
    }

    if let Some(colorterm) = lookup("COLORTERM") {
        if matches!(colorterm.as_str(), "truecolor" | "24bit") {
            return COLORS_16M;
        }
    }

    if let Some(term) = term {
        let term = term.to_lowercase();
        if term.starts_with("xterm-256") || term.ends_with("256color") || TERM_256.contains(&term.as_str()) {
            return COLORS_256;
        }
        if TERM_16.contains(&term.as_str())
            || TERM_16_PREFIXES.iter().any(|p| term.starts_with(p))
            || term.contains("color")
        {
            return COLORS_16;
        }
    }

    if lookup("COLORTERM").is_some() {
        return COLORS_16;
    }

    COLORS_2
}

/// Detect the color depth of the current process's terminal.
#[must_use]
pub fn detect_color_depth() -> u8 {
    color_depth_from(|name| std::env::var(name).ok())
}
