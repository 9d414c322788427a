//! # World Module
//!
//! Tile coordinates and the collaborator traits through which the engine sees
//! a host game location.
//!
//! The spawn evaluator only reads terrain ([`TerrainView`]); the day cycle and
//! the container interaction helpers also place and remove objects
//! ([`Location`]). [`GridLocation`] is an in-memory implementation used by the
//! tests and by the `forage-sim` binary.

pub mod location;

pub use location::*;

use crate::config::TILE_SIZE;
use crate::container::{
    BreakableContainer, ExplosionOutcome, HitOutcome, InteractionContext, SessionRole, Tool,
};
use crate::effects::{DebrisDispatcher, EffectBroadcaster};
use crate::items::ItemInstance;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Represents a tile coordinate in a location.
///
/// # Examples
///
/// ```
/// use forage::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
/// assert_eq!(pos.to_string(), "(10, 5)");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Calculates the Euclidean distance to another position.
    pub fn euclidean_distance(self, other: Position) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// World pixel coordinate of the tile's center.
    ///
    /// # Examples
    ///
    /// ```
    /// use forage::{PixelPoint, Position};
    ///
    /// assert_eq!(Position::new(2, 3).pixel_center(), PixelPoint::new(160, 224));
    /// ```
    pub fn pixel_center(self) -> PixelPoint {
        let half = TILE_SIZE / 2;
        PixelPoint::new(self.x * TILE_SIZE + half, self.y * TILE_SIZE + half)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A point in world pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this point moved by the given pixel offset.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// A rectangle of tiles, inclusive of its top-left corner and exclusive of
/// `x + width` / `y + height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl TileRect {
    /// Creates a new tile rectangle.
    ///
    /// # Examples
    ///
    /// ```
    /// use forage::{Position, TileRect};
    ///
    /// let rect = TileRect::new(5, 5, 10, 8);
    /// assert_eq!(rect.area(), 80);
    /// assert!(rect.contains(Position::new(7, 7)));
    /// assert!(!rect.contains(Position::new(15, 5)));
    /// ```
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Gets the area of the rectangle in tiles.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Checks if a tile is inside this rectangle.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.x
            && pos.y >= self.y
            && (pos.x as i64) < self.right()
            && (pos.y as i64) < self.bottom()
    }

    /// The tiles both rectangles cover, or `None` when they do not overlap.
    ///
    /// # Examples
    ///
    /// ```
    /// use forage::TileRect;
    ///
    /// let bounds = TileRect::new(0, 0, 4, 4);
    /// assert_eq!(
    ///     TileRect::new(-2, 1, 70_000, 70_000).intersection(&bounds),
    ///     Some(TileRect::new(0, 1, 4, 3))
    /// );
    /// assert_eq!(TileRect::new(10, 10, 2, 2).intersection(&bounds), None);
    /// ```
    pub fn intersection(&self, other: &TileRect) -> Option<TileRect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right <= left as i64 || bottom <= top as i64 {
            return None;
        }
        Some(TileRect::new(
            left,
            top,
            (right - left as i64) as u32,
            (bottom - top as i64) as u32,
        ))
    }

    /// Gets every tile of the rectangle in row-major order.
    ///
    /// Callers clip large rectangles with [`TileRect::intersection`] first.
    pub fn tiles(&self) -> Vec<Position> {
        let right = self.right().min(i32::MAX as i64 + 1);
        let bottom = self.bottom().min(i32::MAX as i64 + 1);

        (self.y as i64..bottom)
            .flat_map(|y| (self.x as i64..right).map(move |x| Position::new(x as i32, y as i32)))
            .collect()
    }
}

/// Surface type of a tile, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainType {
    Dirt,
    Grass,
    Sand,
    Stone,
    Wood,
    Water,
    Wall,
}

impl TerrainType {
    /// Whether a hoe can dig this surface by default.
    pub fn is_diggable(self) -> bool {
        matches!(self, TerrainType::Dirt | TerrainType::Grass | TerrainType::Sand)
    }

    /// Whether players can walk on this surface by default.
    pub fn is_passable(self) -> bool {
        !matches!(self, TerrainType::Water | TerrainType::Wall)
    }
}

/// An object placed on a location tile by the spawner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlacedObject {
    /// A plain forage item lying on the ground
    Forage { item: ItemInstance },
    /// A breakable barrel or crate
    Container { container: BreakableContainer },
}

impl PlacedObject {
    pub fn as_container(&self) -> Option<&BreakableContainer> {
        match self {
            PlacedObject::Container { container } => Some(container),
            PlacedObject::Forage { .. } => None,
        }
    }

    pub fn as_container_mut(&mut self) -> Option<&mut BreakableContainer> {
        match self {
            PlacedObject::Container { container } => Some(container),
            PlacedObject::Forage { .. } => None,
        }
    }

    pub fn is_container(&self) -> bool {
        self.as_container().is_some()
    }
}

/// Read-only view of a location's terrain.
///
/// Every query reflects the current state of the host location, so the
/// evaluator sees changes made by rules that ran earlier in the same day.
pub trait TerrainView {
    /// Tile bounds of the location.
    fn bounds(&self) -> TileRect;

    /// Surface type of a tile, or `None` when the tile has no surface data.
    fn terrain_type(&self, tile: Position) -> Option<TerrainType>;

    /// Whether the tile can be dug with a hoe.
    fn is_diggable(&self, tile: Position) -> bool;

    /// Whether the tile can be walked on.
    fn is_passable(&self, tile: Position) -> bool;

    /// Whether an object already occupies the tile.
    fn is_occupied(&self, tile: Position) -> bool;

    /// Tiles of a named region in a stable order, or `None` for unknown names.
    fn region(&self, name: &str) -> Option<Vec<Position>>;

    /// Whether the tile lies inside the location.
    fn in_bounds(&self, tile: Position) -> bool {
        self.bounds().contains(tile)
    }
}

/// A host game location the spawner can place objects into.
pub trait Location: TerrainView {
    /// Name used to scope sounds and particles to the players at this location.
    fn name(&self) -> &str;

    /// Places an object on a free tile. Returns false when the tile is out of
    /// bounds or already occupied.
    fn place_object(&mut self, tile: Position, object: PlacedObject) -> bool;

    /// Removes and returns the object on a tile.
    fn remove_object(&mut self, tile: Position) -> Option<PlacedObject>;

    /// Mutable access to the breakable container on a tile, if any.
    fn container_mut(&mut self, tile: Position) -> Option<&mut BreakableContainer>;

    /// Applies a tool hit to the container on `tile`, removing it from the
    /// location when it breaks.
    fn strike<B, R>(
        &mut self,
        tile: Position,
        tool: &Tool,
        role: SessionRole,
        dispatcher: &mut DebrisDispatcher<B>,
        rng: &mut R,
    ) -> HitOutcome
    where
        Self: Sized,
        B: EffectBroadcaster,
        R: Rng + ?Sized,
    {
        let name = self.name().to_string();
        let context = InteractionContext::new(Some(&name), role);

        let outcome = match self.container_mut(tile) {
            Some(container) => container.perform_tool_action(tool, &context, dispatcher, rng),
            None => return HitOutcome::Ignored,
        };

        if outcome.is_broken() {
            self.remove_object(tile);
        }
        outcome
    }

    /// Applies an explosion to the container on `tile`, removing it from the
    /// location once its contents are released. Returns `None` when no
    /// container stands on the tile.
    fn explode<B, R>(
        &mut self,
        tile: Position,
        role: SessionRole,
        dispatcher: &mut DebrisDispatcher<B>,
        rng: &mut R,
    ) -> Option<ExplosionOutcome>
    where
        Self: Sized,
        B: EffectBroadcaster,
        R: Rng + ?Sized,
    {
        let name = self.name().to_string();
        let context = InteractionContext::new(Some(&name), role);

        let container = self.container_mut(tile)?;
        let outcome = container.on_explosion(&context, dispatcher, rng);
        let broken = container.is_broken();

        if broken {
            self.remove_object(tile);
        }
        Some(outcome)
    }
}
