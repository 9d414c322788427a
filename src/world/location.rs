//! # Grid Location
//!
//! In-memory location backed by a dense tile grid.

use super::{Location, PlacedObject, Position, TerrainType, TerrainView, TileRect};
use crate::container::{BreakableContainer, ExplosionOutcome, SessionRole};
use crate::effects::{DebrisDispatcher, EffectBroadcaster};
use crate::items::ItemInstance;
use crate::{ForageError, ForageResult};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A single tile of a [`GridLocation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub terrain: TerrainType,
    pub diggable: bool,
    pub passable: bool,
}

impl Tile {
    /// Creates a tile with the default flags of its terrain.
    pub fn new(terrain: TerrainType) -> Self {
        Self {
            terrain,
            diggable: terrain.is_diggable(),
            passable: terrain.is_passable(),
        }
    }
}

/// Location backed by a dense tile grid and an ordered object map.
///
/// # Examples
///
/// ```
/// use forage::{GridLocation, Location, Position, TerrainType, TerrainView};
///
/// let mut farm = GridLocation::new("Farm", 10, 10, TerrainType::Grass);
/// farm.set_terrain(Position::new(0, 0), TerrainType::Water);
///
/// assert!(farm.is_diggable(Position::new(1, 1)));
/// assert!(!farm.is_passable(Position::new(0, 0)));
/// assert_eq!(farm.name(), "Farm");
/// ```
#[derive(Debug, Clone)]
pub struct GridLocation {
    name: String,
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
    regions: HashMap<String, Vec<Position>>,
    objects: BTreeMap<Position, PlacedObject>,
}

/// Save format of a [`GridLocation`]. Breakable containers never appear here.
#[derive(Debug, Serialize, Deserialize)]
struct SavedLocation {
    name: String,
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
    regions: HashMap<String, Vec<Position>>,
    forage: Vec<(Position, ItemInstance)>,
}

impl GridLocation {
    /// Creates a location filled with one terrain type.
    pub fn new(name: impl Into<String>, width: u32, height: u32, terrain: TerrainType) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            tiles: vec![Tile::new(terrain); (width * height) as usize],
            regions: HashMap::new(),
            objects: BTreeMap::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width as i32 || pos.y >= self.height as i32 {
            return None;
        }
        Some(pos.y as usize * self.width as usize + pos.x as usize)
    }

    /// Gets the tile at a position.
    pub fn tile(&self, pos: Position) -> Option<&Tile> {
        self.index(pos).map(|index| &self.tiles[index])
    }

    /// Gets the tile at a position mutably.
    pub fn tile_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        self.index(pos).map(move |index| &mut self.tiles[index])
    }

    /// Replaces a tile's terrain and resets its flags to the terrain defaults.
    pub fn set_terrain(&mut self, pos: Position, terrain: TerrainType) {
        if let Some(tile) = self.tile_mut(pos) {
            *tile = Tile::new(terrain);
        }
    }

    /// Replaces the terrain of every tile in a rectangle.
    pub fn fill_terrain(&mut self, rect: TileRect, terrain: TerrainType) {
        for pos in rect.tiles() {
            self.set_terrain(pos, terrain);
        }
    }

    /// Defines (or replaces) a named region. Tiles keep the given order.
    pub fn define_region(&mut self, name: impl Into<String>, tiles: Vec<Position>) {
        self.regions.insert(name.into(), tiles);
    }

    /// Gets the object on a tile.
    pub fn object_at(&self, pos: Position) -> Option<&PlacedObject> {
        self.objects.get(&pos)
    }

    /// Gets the breakable container on a tile.
    pub fn container_at(&self, pos: Position) -> Option<&BreakableContainer> {
        self.objects.get(&pos).and_then(PlacedObject::as_container)
    }

    /// Iterates over all placed objects in tile order.
    pub fn objects(&self) -> impl Iterator<Item = (&Position, &PlacedObject)> {
        self.objects.iter()
    }

    /// Number of breakable containers currently on the location.
    pub fn container_count(&self) -> usize {
        self.objects.values().filter(|object| object.is_container()).count()
    }

    /// Removes every breakable container, returning how many were removed.
    ///
    /// Containers are not persisted; the host calls this at the end of each day
    /// before saving.
    pub fn purge_containers(&mut self) -> usize {
        let before = self.objects.len();
        self.objects.retain(|_, object| !object.is_container());
        let purged = before - self.objects.len();

        if purged > 0 {
            log::info!("Purged {} breakable container(s) from {}", purged, self.name);
        }
        purged
    }

    /// Advances every container's shake timer.
    pub fn update(&mut self, elapsed_ms: u32) {
        for object in self.objects.values_mut() {
            if let Some(container) = object.as_container_mut() {
                container.update(elapsed_ms);
            }
        }
    }

    /// Applies an explosion to every container within `radius` tiles of
    /// `center`, in tile order.
    pub fn explode_area<B, R>(
        &mut self,
        center: Position,
        radius: u32,
        role: SessionRole,
        dispatcher: &mut DebrisDispatcher<B>,
        rng: &mut R,
    ) -> Vec<ExplosionOutcome>
    where
        B: EffectBroadcaster,
        R: Rng + ?Sized,
    {
        let targets: Vec<Position> = self
            .objects
            .iter()
            .filter(|(pos, object)| {
                object.is_container() && center.euclidean_distance(**pos) <= radius as f64
            })
            .map(|(pos, _)| *pos)
            .collect();

        let mut outcomes = Vec::with_capacity(targets.len());
        for pos in targets {
            if let Some(outcome) = self.explode(pos, role, dispatcher, rng) {
                outcomes.push(outcome);
            }
        }
        outcomes
    }

    /// Saves the location to JSON.
    ///
    /// Fails with [`ForageError::UnpurgedContainers`] while any breakable
    /// container remains on the location.
    pub fn save_to_json(&self) -> ForageResult<String> {
        let containers = self.container_count();
        if containers > 0 {
            return Err(ForageError::UnpurgedContainers(containers));
        }

        let saved = SavedLocation {
            name: self.name.clone(),
            width: self.width,
            height: self.height,
            tiles: self.tiles.clone(),
            regions: self.regions.clone(),
            forage: self
                .objects
                .iter()
                .filter_map(|(pos, object)| match object {
                    PlacedObject::Forage { item } => Some((*pos, item.clone())),
                    PlacedObject::Container { .. } => None,
                })
                .collect(),
        };

        serde_json::to_string_pretty(&saved).map_err(ForageError::from)
    }

    /// Loads a location from JSON written by [`GridLocation::save_to_json`].
    pub fn load_from_json(json: &str) -> ForageResult<Self> {
        let saved: SavedLocation = serde_json::from_str(json)?;

        let expected = (saved.width as usize).checked_mul(saved.height as usize);
        if expected != Some(saved.tiles.len()) {
            return Err(ForageError::InvalidContext(format!(
                "location {} has {} tiles, expected {}x{}",
                saved.name,
                saved.tiles.len(),
                saved.width,
                saved.height
            )));
        }

        let objects = saved
            .forage
            .into_iter()
            .map(|(pos, item)| (pos, PlacedObject::Forage { item }))
            .collect();

        Ok(Self {
            name: saved.name,
            width: saved.width,
            height: saved.height,
            tiles: saved.tiles,
            regions: saved.regions,
            objects,
        })
    }
}

impl TerrainView for GridLocation {
    fn bounds(&self) -> TileRect {
        TileRect::new(0, 0, self.width, self.height)
    }

    fn terrain_type(&self, tile: Position) -> Option<TerrainType> {
        self.tile(tile).map(|t| t.terrain)
    }

    fn is_diggable(&self, tile: Position) -> bool {
        self.tile(tile).map(|t| t.diggable).unwrap_or(false)
    }

    fn is_passable(&self, tile: Position) -> bool {
        self.tile(tile).map(|t| t.passable).unwrap_or(false)
    }

    fn is_occupied(&self, tile: Position) -> bool {
        self.objects.contains_key(&tile)
    }

    fn region(&self, name: &str) -> Option<Vec<Position>> {
        self.regions.get(name).cloned()
    }
}

impl Location for GridLocation {
    fn name(&self) -> &str {
        &self.name
    }

    fn place_object(&mut self, tile: Position, object: PlacedObject) -> bool {
        if !self.in_bounds(tile) || self.is_occupied(tile) {
            return false;
        }
        self.objects.insert(tile, object);
        true
    }

    fn remove_object(&mut self, tile: Position) -> Option<PlacedObject> {
        self.objects.remove(&tile)
    }

    fn container_mut(&mut self, tile: Position) -> Option<&mut BreakableContainer> {
        self.objects
            .get_mut(&tile)
            .and_then(PlacedObject::as_container_mut)
    }
}
