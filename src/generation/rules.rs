//! # Spawn Rules
//!
//! Structured rule definitions consumed by the evaluator, and the
//! [`SpawnConfig`] that carries them.
//!
//! Rules are validated when they are built or loaded. A rule that fails
//! validation is reported as [`ForageError::ConfigurationRange`] and never
//! reaches the evaluator.

use crate::container::ContainerVariant;
use crate::items::ItemDescriptor;
use crate::world::{Position, TerrainType, TerrainView, TileRect};
use crate::{ForageError, ForageResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Largest number of objects one rule may spawn per day.
pub const MAX_SPAWNS_PER_RULE: u32 = 10_000;

/// Largest relative weight of a weighted spawn entry. The weights of one rule
/// must also sum to at most `u32::MAX`.
pub const MAX_SPAWN_WEIGHT: u32 = 1_000_000;

/// Tiles a rule may spawn on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpawnArea {
    /// A rectangle of tiles
    Rect(TileRect),
    /// A region the location defines by name
    Region { name: String },
    /// Every tile of the location
    Whole,
}

/// A predicate a tile must satisfy at selection time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileCondition {
    /// Inside the location bounds
    InBounds,
    /// No object on the tile
    Empty,
    /// Can be dug with a hoe
    Diggable,
    /// Can be walked on
    Passable,
    /// Surface is one of the listed terrain types
    Terrain(Vec<TerrainType>),
}

impl TileCondition {
    /// Checks the condition against the terrain as it is now.
    pub fn check<T: TerrainView + ?Sized>(&self, terrain: &T, tile: Position) -> bool {
        match self {
            TileCondition::InBounds => terrain.in_bounds(tile),
            TileCondition::Empty => !terrain.is_occupied(tile),
            TileCondition::Diggable => terrain.is_diggable(tile),
            TileCondition::Passable => terrain.is_passable(tile),
            TileCondition::Terrain(types) => terrain
                .terrain_type(tile)
                .map(|t| types.contains(&t))
                .unwrap_or(false),
        }
    }
}

/// What a weighted entry spawns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpawnTemplate {
    /// A plain forage item
    Item { item: ItemDescriptor },
    /// A breakable container holding the listed items
    Container {
        #[serde(default)]
        variant: ContainerVariant,
        #[serde(default)]
        contents: Vec<ItemDescriptor>,
    },
}

fn default_weight() -> u32 {
    1
}

/// A spawn template with its relative weight in the rule's draw pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedSpawn {
    pub spawn: SpawnTemplate,
    #[serde(default = "default_weight")]
    pub weight: u32,
}

/// Inclusive bounds of a rule's daily spawn count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnCountRange {
    pub min: u32,
    pub max: u32,
}

impl SpawnCountRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// A range that always spawns exactly `count` objects.
    pub fn exactly(count: u32) -> Self {
        Self::new(count, count)
    }
}

fn default_conditions() -> Vec<TileCondition> {
    vec![TileCondition::Empty]
}

/// One day's spawning instructions for an area.
///
/// # Examples
///
/// ```
/// use forage::*;
///
/// let rule = SpawnRule::new("spring", SpawnArea::Whole, SpawnCountRange::new(2, 5))
///     .with_condition(TileCondition::Diggable)
///     .with_item(ItemDescriptor::new(ItemCategory::Object, "Leek"), 3)
///     .with_container(ContainerVariant::Crate, vec![], 1);
///
/// assert!(rule.validate().is_ok());
/// assert_eq!(rule.spawns.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnRule {
    pub id: String,
    pub area: SpawnArea,
    pub count: SpawnCountRange,
    #[serde(default = "default_conditions")]
    pub conditions: Vec<TileCondition>,
    pub spawns: Vec<WeightedSpawn>,
}

impl SpawnRule {
    /// Creates a rule with the default `Empty` tile condition and no spawns.
    pub fn new(id: impl Into<String>, area: SpawnArea, count: SpawnCountRange) -> Self {
        Self {
            id: id.into(),
            area,
            count,
            conditions: default_conditions(),
            spawns: Vec::new(),
        }
    }

    /// Adds a tile condition.
    pub fn with_condition(mut self, condition: TileCondition) -> Self {
        if !self.conditions.contains(&condition) {
            self.conditions.push(condition);
        }
        self
    }

    /// Adds a plain item to the draw pool.
    pub fn with_item(mut self, item: ItemDescriptor, weight: u32) -> Self {
        self.spawns.push(WeightedSpawn {
            spawn: SpawnTemplate::Item { item },
            weight,
        });
        self
    }

    /// Adds a breakable container to the draw pool.
    pub fn with_container(
        mut self,
        variant: ContainerVariant,
        contents: Vec<ItemDescriptor>,
        weight: u32,
    ) -> Self {
        self.spawns.push(WeightedSpawn {
            spawn: SpawnTemplate::Container { variant, contents },
            weight,
        });
        self
    }

    /// Checks spawn counts and weights.
    pub fn validate(&self) -> ForageResult<()> {
        let range = |message: String| {
            Err(ForageError::ConfigurationRange(format!(
                "rule \"{}\": {}",
                self.id, message
            )))
        };

        if self.count.min > self.count.max {
            return range(format!(
                "spawn count min {} is greater than max {}",
                self.count.min, self.count.max
            ));
        }
        if self.count.max > MAX_SPAWNS_PER_RULE {
            return range(format!(
                "spawn count max {} exceeds {}",
                self.count.max, MAX_SPAWNS_PER_RULE
            ));
        }
        if self.spawns.is_empty() {
            return range("no spawns configured".to_string());
        }
        for (index, entry) in self.spawns.iter().enumerate() {
            if entry.weight == 0 || entry.weight > MAX_SPAWN_WEIGHT {
                return range(format!(
                    "spawn {} has weight {}, expected 1..={}",
                    index, entry.weight, MAX_SPAWN_WEIGHT
                ));
            }
        }
        let total: u64 = self.spawns.iter().map(|entry| entry.weight as u64).sum();
        if total > u32::MAX as u64 {
            return range(format!(
                "total spawn weight {} exceeds {}",
                total,
                u32::MAX
            ));
        }

        Ok(())
    }

    /// Whether a tile may receive a spawn right now: inside the location and
    /// passing every condition.
    pub fn accepts<T: TerrainView + ?Sized>(&self, terrain: &T, tile: Position) -> bool {
        terrain.in_bounds(tile)
            && self
                .conditions
                .iter()
                .all(|condition| condition.check(terrain, tile))
    }

    /// Tiles of the rule's area in a stable order, without duplicates.
    ///
    /// Rectangles are clipped to the location bounds. An unknown region yields
    /// no tiles.
    pub fn candidate_tiles<T: TerrainView + ?Sized>(&self, terrain: &T) -> Vec<Position> {
        let tiles = match &self.area {
            SpawnArea::Rect(rect) => rect
                .intersection(&terrain.bounds())
                .map(|clipped| clipped.tiles())
                .unwrap_or_default(),
            SpawnArea::Whole => terrain.bounds().tiles(),
            SpawnArea::Region { name } => match terrain.region(name) {
                Some(tiles) => tiles,
                None => {
                    log::warn!("Rule \"{}\" targets unknown region \"{}\"", self.id, name);
                    Vec::new()
                }
            },
        };

        let mut seen = HashSet::with_capacity(tiles.len());
        tiles.into_iter().filter(|tile| seen.insert(*tile)).collect()
    }
}

/// Spawn configuration for a save: a base seed and the rules run every day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnConfig {
    /// Base seed; each day derives its own seed from it
    pub seed: u64,
    #[serde(default)]
    pub rules: Vec<SpawnRule>,
}

impl SpawnConfig {
    /// Creates an empty configuration.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rules: Vec::new(),
        }
    }

    /// Adds a rule.
    pub fn with_rule(mut self, rule: SpawnRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Validates every rule.
    pub fn validate(&self) -> ForageResult<()> {
        let mut ids = HashSet::new();
        for rule in &self.rules {
            rule.validate()?;
            if !ids.insert(rule.id.as_str()) {
                return Err(ForageError::ConfigurationRange(format!(
                    "duplicate rule id \"{}\"",
                    rule.id
                )));
            }
        }
        Ok(())
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> ForageResult<Self> {
        let config: SpawnConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> ForageResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        log::debug!("Loaded spawn config from {}", path.as_ref().display());
        Self::from_json_str(&json)
    }

    /// Serializes the configuration to pretty JSON.
    pub fn to_json(&self) -> ForageResult<String> {
        serde_json::to_string_pretty(self).map_err(ForageError::from)
    }

    /// Seed of one in-game day.
    pub fn seed_for_day(&self, day: u32) -> u64 {
        self.seed
            .wrapping_add((day as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
            .rotate_left(17)
    }
}
