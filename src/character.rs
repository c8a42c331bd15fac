//! Playable character roster
//!
//! Profiles are immutable. The shell picks one at session start and the
//! simulation only ever reads it.

use serde::{Deserialize, Serialize};

use crate::{Rgba, rgb_hex};

/// Character identity (also the persisted inventory key)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CharacterId {
    #[default]
    Rudolph,
    Bot,
    Glider,
    Ufo,
}

impl CharacterId {
    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterId::Rudolph => "rudolph",
            CharacterId::Bot => "bot",
            CharacterId::Glider => "glider",
            CharacterId::Ufo => "ufo",
        }
    }

    pub fn from_id(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "rudolph" => Some(CharacterId::Rudolph),
            "bot" => Some(CharacterId::Bot),
            "glider" => Some(CharacterId::Glider),
            "ufo" => Some(CharacterId::Ufo),
            _ => None,
        }
    }
}

/// Per-character constants
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterProfile {
    pub id: CharacterId,
    pub name: &'static str,
    pub description: &'static str,
    /// Unlock price in coins
    pub cost: u64,
    /// Downward acceleration per frame
    pub gravity: f32,
    /// Velocity set by a jump (negative = up)
    pub jump_strength: f32,
    /// Shop badge colour
    pub color: Rgba,
}

pub const CHARACTERS: [CharacterProfile; 4] = [
    CharacterProfile {
        id: CharacterId::Rudolph,
        name: "Rudolph",
        description: "The classic red-nosed guide. Balanced stats.",
        cost: 0,
        gravity: 0.25,
        jump_strength: -6.0,
        color: rgb_hex(0xef4444),
    },
    CharacterProfile {
        id: CharacterId::Bot,
        name: "Cyber-Bot",
        description: "Heavy metal alloy. Falls faster but controls are precise.",
        cost: 50,
        gravity: 0.35,
        jump_strength: -7.5,
        color: rgb_hex(0x64748b),
    },
    CharacterProfile {
        id: CharacterId::Glider,
        name: "Golden Glider",
        description: "Lightweight gold. Floaty physics, easy to maintain height.",
        cost: 100,
        gravity: 0.18,
        jump_strength: -5.0,
        color: rgb_hex(0xeab308),
    },
    CharacterProfile {
        id: CharacterId::Ufo,
        name: "UFO-9000",
        description: "Alien tech. Extreme agility and speed.",
        cost: 200,
        gravity: 0.25,
        jump_strength: -7.0,
        color: rgb_hex(0x22c55e),
    },
];

impl CharacterProfile {
    /// Badge colour as a CSS `#rrggbb` string
    pub fn badge_css(&self) -> String {
        let [r, g, b, _] = self.color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

/// Look up a profile by id
pub fn profile(id: CharacterId) -> &'static CharacterProfile {
    CHARACTERS
        .iter()
        .find(|c| c.id == id)
        .unwrap_or(&CHARACTERS[0])
}

/// The free starter character
pub fn default_profile() -> &'static CharacterProfile {
    &CHARACTERS[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_round_trip() {
        for c in &CHARACTERS {
            assert_eq!(CharacterId::from_id(c.id.as_str()), Some(c.id));
        }
        assert_eq!(CharacterId::from_id(" UFO "), Some(CharacterId::Ufo));
        assert_eq!(CharacterId::from_id("dragon"), None);
    }

    #[test]
    fn test_profiles_are_distinct() {
        assert_eq!(profile(CharacterId::Bot).name, "Cyber-Bot");
        assert_eq!(default_profile().cost, 0);
        assert!(CHARACTERS.iter().all(|c| c.jump_strength < 0.0 && c.gravity > 0.0));
    }

    #[test]
    fn test_id_serializes_lowercase() {
        let json = serde_json::to_string(&vec![CharacterId::Rudolph, CharacterId::Glider]).unwrap();
        assert_eq!(json, r#"["rudolph","glider"]"#);
    }

    #[test]
    fn test_badge_css() {
        assert_eq!(profile(CharacterId::Rudolph).badge_css(), "#ef4444");
        assert_eq!(profile(CharacterId::Ufo).badge_css(), "#22c55e");
        assert!(CHARACTERS.iter().all(|c| !c.description.is_empty()));
    }
}
