//! # Tools
//!
//! The part of a player's tool a breakable container cares about.

use serde::{Deserialize, Serialize};

/// Melee weapon classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    Stabbing,
    Dagger,
    /// Two-handed clubs and hammers; they break containers twice as fast
    TwoHanded,
    Slashing,
}

/// What a tool is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    Axe,
    Pickaxe,
    Hoe,
    WateringCan,
    FishingRod,
    Scythe,
    Weapon(WeaponKind),
}

/// A tool swung at an object.
///
/// # Examples
///
/// ```
/// use forage::{Tool, ToolKind, WeaponKind};
///
/// assert_eq!(Tool::new(ToolKind::Axe).hit_damage(), 1);
/// assert_eq!(Tool::new(ToolKind::Weapon(WeaponKind::TwoHanded)).hit_damage(), 2);
/// assert_eq!(Tool::new(ToolKind::WateringCan).hit_damage(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tool {
    pub kind: ToolKind,
}

impl Tool {
    pub fn new(kind: ToolKind) -> Self {
        Self { kind }
    }

    pub fn weapon(kind: WeaponKind) -> Self {
        Self::new(ToolKind::Weapon(kind))
    }

    /// Whether the tool lands heavy hits, the only hits that damage props.
    pub fn is_heavy_hitter(&self) -> bool {
        matches!(
            self.kind,
            ToolKind::Axe | ToolKind::Pickaxe | ToolKind::Hoe | ToolKind::Weapon(_)
        )
    }

    /// How many hits a single swing takes off a breakable container.
    pub fn hit_damage(&self) -> i32 {
        match self.kind {
            _ if !self.is_heavy_hitter() => 0,
            ToolKind::Weapon(WeaponKind::TwoHanded) => 2,
            _ => 1,
        }
    }
}
