//! Theme lookup for a track's display hint
//!
//! Pure mapping from a color tag to the set of style tokens the view layer
//! paints the player with. Unknown or missing tags resolve to blue.

use crate::playlist::UiColor;
use crate::Error;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Color families a track may ask for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeColor {
    #[default]
    Blue,
    Purple,
    Pink,
    Green,
}

impl ThemeColor {
    pub const ALL: [ThemeColor; 4] = [
        ThemeColor::Blue,
        ThemeColor::Purple,
        ThemeColor::Pink,
        ThemeColor::Green,
    ];

    /// Resolve an optional tag, falling back to the default for unknown tags
    pub fn from_tag(tag: Option<&str>) -> Self {
        tag.and_then(|t| t.parse().ok()).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeColor::Blue => "blue",
            ThemeColor::Purple => "purple",
            ThemeColor::Pink => "pink",
            ThemeColor::Green => "green",
        }
    }

    /// Style tokens for this color family
    pub fn style_set(self) -> StyleSet {
        let c = self.as_str();
        StyleSet {
            color: self,
            primary: format!("text-{c}-400"),
            primary_hover: format!("hover:text-{c}-300"),
            button: format!("bg-{c}-500"),
            button_hover: format!("hover:bg-{c}-600"),
            accent: format!("text-{c}-400"),
            loading: format!("border-t-{c}-600"),
        }
    }
}

impl std::fmt::Display for ThemeColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blue" => Ok(ThemeColor::Blue),
            "purple" => Ok(ThemeColor::Purple),
            "pink" => Ok(ThemeColor::Pink),
            "green" => Ok(ThemeColor::Green),
            other => Err(Error::InvalidInput(format!("unknown theme color '{other}'"))),
        }
    }
}

/// Style tokens for one color family
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleSet {
    pub color: ThemeColor,
    pub primary: String,
    pub primary_hover: String,
    pub button: String,
    pub button_hover: String,
    pub accent: String,
    pub loading: String,
}

/// Resolve a tag (or its absence) to a style set
pub fn style_for(tag: Option<&str>) -> StyleSet {
    ThemeColor::from_tag(tag).style_set()
}

/// Resolved primary and accent styles for a track
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackTheme {
    pub primary: StyleSet,
    pub accent: StyleSet,
}

impl TrackTheme {
    /// Resolve a theme hint; primary and accent fall back independently
    pub fn for_hint(hint: Option<&UiColor>) -> Self {
        match hint {
            Some(hint) => Self {
                primary: style_for(Some(&hint.primary)),
                accent: style_for(Some(&hint.accent)),
            },
            None => Self {
                primary: ThemeColor::default().style_set(),
                accent: ThemeColor::default().style_set(),
            },
        }
    }
}
