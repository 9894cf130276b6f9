//! Terminal color themes

use serde::Serialize;

use crate::ansi::AnsiColor;

/// Theme applied when a name is not recognised
pub const DEFAULT_THEME: &str = "vs-code-dark";

/// Colors for one theme, as CSS hex strings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub name: &'static str,
    pub background: &'static str,
    pub foreground: &'static str,
    pub cursor: &'static str,
    pub selection: &'static str,
    /// Black, red, green, yellow, blue, magenta, cyan, white
    pub ansi: [&'static str; 8],
}

impl Palette {
    /// Color for an ANSI foreground, or the theme foreground
    pub fn color(&self, color: Option<AnsiColor>) -> &'static str {
        match color {
            Some(c) => self.ansi[c.index()],
            None => self.foreground,
        }
    }
}

pub const VS_CODE_DARK: Palette = Palette {
    name: "vs-code-dark",
    background: "#1e1e1e",
    foreground: "#d4d4d4",
    cursor: "#aeafad",
    selection: "#264f78",
    ansi: [
        "#000000", "#cd3131", "#0dbc79", "#e5e510", "#2472c8", "#bc3fbc", "#11a8cd", "#e5e5e5",
    ],
};

pub const DRACULA: Palette = Palette {
    name: "dracula",
    background: "#282a36",
    foreground: "#f8f8f2",
    cursor: "#f8f8f2",
    selection: "#44475a",
    ansi: [
        "#21222c", "#ff5555", "#50fa7b", "#f1fa8c", "#bd93f9", "#ff79c6", "#8be9fd", "#f8f8f2",
    ],
};

pub const ONE_DARK: Palette = Palette {
    name: "one-dark",
    background: "#282c34",
    foreground: "#abb2bf",
    cursor: "#528bff",
    selection: "#3e4451",
    ansi: [
        "#282c34", "#e06c75", "#98c379", "#e5c07b", "#61afef", "#c678dd", "#56b6c2", "#dcdfe4",
    ],
};

pub const SOLARIZED_DARK: Palette = Palette {
    name: "solarized-dark",
    background: "#002b36",
    foreground: "#839496",
    cursor: "#93a1a1",
    selection: "#073642",
    ansi: [
        "#073642", "#dc322f", "#859900", "#b58900", "#268bd2", "#d33682", "#2aa198", "#eee8d5",
    ],
};

pub const MATRIX_GREEN: Palette = Palette {
    name: "matrix-green",
    background: "#000000",
    foreground: "#00ff41",
    cursor: "#00ff41",
    selection: "#003b00",
    ansi: [
        "#000000", "#008f11", "#00ff41", "#39ff14", "#00b140", "#00ff9c", "#00e676", "#c8ffc8",
    ],
};

pub const RETRO_AMBER: Palette = Palette {
    name: "retro-amber",
    background: "#1a1200",
    foreground: "#ffb000",
    cursor: "#ffcc00",
    selection: "#4d3500",
    ansi: [
        "#1a1200", "#ff6e00", "#ffb000", "#ffcc00", "#cc8400", "#ff9e40", "#ffd27f", "#ffe4b3",
    ],
};

/// Every built-in theme
pub static THEMES: [&Palette; 6] = [
    &VS_CODE_DARK,
    &DRACULA,
    &ONE_DARK,
    &SOLARIZED_DARK,
    &MATRIX_GREEN,
    &RETRO_AMBER,
];

/// Look up a theme by name
pub fn find(name: &str) -> Option<&'static Palette> {
    THEMES.iter().copied().find(|p| p.name == name)
}

/// Look up a theme, falling back to [`VS_CODE_DARK`]
pub fn resolve(name: &str) -> &'static Palette {
    find(name).unwrap_or_else(|| {
        tracing::debug!(theme = name, fallback = DEFAULT_THEME, "unknown theme");
        &VS_CODE_DARK
    })
}

/// Names of every built-in theme
pub fn names() -> impl Iterator<Item = &'static str> {
    THEMES.iter().map(|p| p.name)
}
