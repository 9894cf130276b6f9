use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DesktopError;

/// Resize handle on a window frame
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl ResizeHandle {
    /// Every handle, in the order the frame markup declares them
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::N,
        ResizeHandle::S,
        ResizeHandle::E,
        ResizeHandle::W,
        ResizeHandle::NE,
        ResizeHandle::NW,
        ResizeHandle::SE,
        ResizeHandle::SW,
    ];

    /// Handle moves the left edge
    pub fn moves_left(self) -> bool {
        matches!(self, ResizeHandle::W | ResizeHandle::NW | ResizeHandle::SW)
    }

    /// Handle moves the right edge
    pub fn moves_right(self) -> bool {
        matches!(self, ResizeHandle::E | ResizeHandle::NE | ResizeHandle::SE)
    }

    /// Handle moves the top edge
    pub fn moves_top(self) -> bool {
        matches!(self, ResizeHandle::N | ResizeHandle::NE | ResizeHandle::NW)
    }

    /// Handle moves the bottom edge
    pub fn moves_bottom(self) -> bool {
        matches!(self, ResizeHandle::S | ResizeHandle::SE | ResizeHandle::SW)
    }
}

impl FromStr for ResizeHandle {
    type Err = DesktopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "n" => Ok(ResizeHandle::N),
            "s" => Ok(ResizeHandle::S),
            "e" => Ok(ResizeHandle::E),
            "w" => Ok(ResizeHandle::W),
            "ne" => Ok(ResizeHandle::NE),
            "nw" => Ok(ResizeHandle::NW),
            "se" => Ok(ResizeHandle::SE),
            "sw" => Ok(ResizeHandle::SW),
            other => Err(DesktopError::UnknownResizeHandle(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_handles() {
        assert_eq!("se".parse::<ResizeHandle>(), Ok(ResizeHandle::SE));
        assert_eq!(
            "up".parse::<ResizeHandle>(),
            Err(DesktopError::UnknownResizeHandle("up".into()))
        );
    }

    #[test]
    fn test_edges() {
        assert!(ResizeHandle::NW.moves_left() && ResizeHandle::NW.moves_top());
        assert!(!ResizeHandle::E.moves_top());
        assert!(ResizeHandle::SE.moves_right() && ResizeHandle::SE.moves_bottom());
    }
}
