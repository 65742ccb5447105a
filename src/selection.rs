//! Character selection
//!
//! The only thing the pre-game screen hands the session is the chosen skin.

use serde::{Deserialize, Serialize};

/// Player character skins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Skin {
    #[default]
    Explorer,
    Ranger,
    Scout,
}

impl Skin {
    pub const ALL: [Skin; 3] = [Skin::Explorer, Skin::Ranger, Skin::Scout];

    pub fn as_str(&self) -> &'static str {
        match self {
            Skin::Explorer => "Explorer",
            Skin::Ranger => "Ranger",
            Skin::Scout => "Scout",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "explorer" | "1" => Some(Skin::Explorer),
            "ranger" | "2" => Some(Skin::Ranger),
            "scout" | "3" => Some(Skin::Scout),
            _ => None,
        }
    }
}

/// Selection screen state
#[derive(Debug, Clone, Default)]
pub struct CharacterSelection {
    selected: Option<Skin>,
}

impl CharacterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, skin: Skin) {
        self.selected = Some(skin);
    }

    pub fn selected(&self) -> Option<Skin> {
        self.selected
    }

    /// Skin to start with. `None` until something has been picked.
    pub fn start(&self) -> Option<Skin> {
        if self.selected.is_none() {
            log::debug!("Start pressed with no character selected");
        }
        self.selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_requires_selection() {
        let mut selection = CharacterSelection::new();
        assert_eq!(selection.start(), None);
        selection.select(Skin::Ranger);
        selection.select(Skin::Scout);
        assert_eq!(selection.start(), Some(Skin::Scout));
    }

    #[test]
    fn test_skin_names() {
        for skin in Skin::ALL {
            assert_eq!(Skin::from_str(skin.as_str()), Some(skin));
        }
        assert_eq!(Skin::from_str("2"), Some(Skin::Ranger));
        assert_eq!(Skin::from_str("wizard"), None);
    }
}
