//! Roster and stats snapshot consumed once at session start
//!
//! The host resolves hero/ally loadouts from its own meta systems and hands
//! the core this flattened, data-only view. Nothing here is re-read after
//! session construction.

use serde::{Deserialize, Serialize};

/// Hero/ally rarity tiers, ordered worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythic,
}

/// Player base stats resolved from the equipped hero
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStats {
    pub max_hp: f32,
    pub attack: f32,
    pub defense: f32,
    pub speed: f32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            max_hp: 250.0,
            attack: 30.0,
            defense: 7.0,
            speed: 1.0,
        }
    }
}

/// A summoned companion participating in auto-attacks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummonedAlly {
    pub attack: f32,
    /// Seconds between shots
    pub fire_interval: f32,
}

/// Everything the core needs from the meta layer, captured at session start
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterSnapshot {
    pub player: PlayerStats,
    /// Rarity of every equipped ally (used for the rage trigger cap)
    pub ally_rarities: Vec<Rarity>,
    /// Companions that fight alongside the player
    pub summoned: Vec<SummonedAlly>,
    /// Account/hero level, used only when no rarity data is available
    pub player_level: u32,
}

impl RosterSnapshot {
    /// Session cap on rage triggers, from the best equipped-ally rarity.
    ///
    /// Falls back to a level heuristic when the roster carries no rarity
    /// data at all (e.g. a guest session).
    pub fn rage_trigger_cap(&self) -> u32 {
        match self.ally_rarities.iter().max() {
            Some(best) if *best >= Rarity::Legendary => 3,
            Some(best) if *best >= Rarity::Epic => 2,
            Some(_) => 1,
            None => match self.player_level {
                level if level >= 60 => 3,
                level if level >= 30 => 2,
                _ => 1,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rarity_ordering() {
        assert!(Rarity::Mythic > Rarity::Legendary);
        assert!(Rarity::Legendary > Rarity::Epic);
        assert!(Rarity::Common < Rarity::Rare);
    }

    #[test]
    fn test_trigger_cap_from_rarity() {
        let snap = |r: Vec<Rarity>| RosterSnapshot {
            ally_rarities: r,
            ..Default::default()
        };
        assert_eq!(snap(vec![Rarity::Mythic, Rarity::Common]).rage_trigger_cap(), 3);
        assert_eq!(snap(vec![Rarity::Legendary]).rage_trigger_cap(), 3);
        assert_eq!(snap(vec![Rarity::Epic, Rarity::Rare]).rage_trigger_cap(), 2);
        assert_eq!(snap(vec![Rarity::Common]).rage_trigger_cap(), 1);
    }

    #[test]
    fn test_trigger_cap_level_fallback() {
        let snap = |level: u32| RosterSnapshot {
            player_level: level,
            ..Default::default()
        };
        assert_eq!(snap(75).rage_trigger_cap(), 3);
        assert_eq!(snap(45).rage_trigger_cap(), 2);
        assert_eq!(snap(5).rage_trigger_cap(), 1);
    }
}
