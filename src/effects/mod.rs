//! # Effects Module
//!
//! Requests the engine sends to the host's rendering, sound and entity
//! systems, and the dispatcher that produces them.
//!
//! Every random value in a request (particle rotation, velocity, item scatter)
//! is rolled once by the session authority and carried as data. Receivers
//! replay the request as-is, so all players see the same debris.

pub mod dispatcher;

pub use dispatcher::*;

use crate::items::ItemInstance;
use crate::world::{PixelPoint, Position};
use serde::{Deserialize, Serialize};

/// A source rectangle on a sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpriteRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl SpriteRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// An RGBA tint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tint {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Tint {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// A 2D vector in pixels (or pixels per frame).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Sound cues played by breakable containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// A container was hit but did not break
    WoodWhack,
    /// A container broke
    BarrelBreak,
}

impl SoundCue {
    /// Cue name understood by the host's sound bank.
    pub fn cue_name(self) -> &'static str {
        match self {
            SoundCue::WoodWhack => "woodWhack",
            SoundCue::BarrelBreak => "barrelBreak",
        }
    }
}

/// Play a sound for every player at a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundRequest {
    pub location: String,
    pub cue: SoundCue,
    pub tile: Position,
}

/// Drop an item into the location's world as collectible debris.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDebrisRequest {
    pub location: String,
    pub item: ItemInstance,
    /// Pixel position the item appears at, jitter already applied
    pub position: PixelPoint,
}

/// Show one decorative particle sprite to every player at a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteRequest {
    pub location: String,
    pub source: SpriteRect,
    pub position: Vec2,
    pub flipped: bool,
    pub layer_depth: f32,
    pub interval_ms: f32,
    pub alpha_fade: f32,
    pub scale: f32,
    /// Initial rotation in radians
    pub rotation: f32,
    /// Rotation change per frame in radians
    pub rotation_change: f32,
    pub motion: Vec2,
    pub acceleration: Vec2,
    pub tint: Tint,
}

/// Burst of generic debris chunks flying outward from a tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadialDebrisRequest {
    pub location: String,
    pub tile: Position,
    pub debris_index: u32,
    pub count: u32,
    pub tint: Tint,
}

/// Any request produced by the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    Sound(SoundRequest),
    ItemDebris(ItemDebrisRequest),
    Sprite(SpriteRequest),
    RadialDebris(RadialDebrisRequest),
}

/// Host collaborator that delivers effect requests.
///
/// Sounds, sprites and radial debris go to every session participant at the
/// request's location. Item debris enters the location's entity system.
pub trait EffectBroadcaster {
    fn play_sound(&mut self, request: SoundRequest);

    fn spawn_item_debris(&mut self, request: ItemDebrisRequest);

    fn broadcast_sprite(&mut self, request: SpriteRequest);

    fn create_radial_debris(&mut self, request: RadialDebrisRequest);
}

impl<T: EffectBroadcaster + ?Sized> EffectBroadcaster for &mut T {
    fn play_sound(&mut self, request: SoundRequest) {
        (**self).play_sound(request)
    }

    fn spawn_item_debris(&mut self, request: ItemDebrisRequest) {
        (**self).spawn_item_debris(request)
    }

    fn broadcast_sprite(&mut self, request: SpriteRequest) {
        (**self).broadcast_sprite(request)
    }

    fn create_radial_debris(&mut self, request: RadialDebrisRequest) {
        (**self).create_radial_debris(request)
    }
}

/// Broadcaster that records every request in order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EffectLog {
    effects: Vec<Effect>,
}

impl EffectLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded effects in emission order.
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn sounds(&self) -> impl Iterator<Item = &SoundRequest> {
        self.effects.iter().filter_map(|effect| match effect {
            Effect::Sound(request) => Some(request),
            _ => None,
        })
    }

    pub fn item_debris(&self) -> impl Iterator<Item = &ItemDebrisRequest> {
        self.effects.iter().filter_map(|effect| match effect {
            Effect::ItemDebris(request) => Some(request),
            _ => None,
        })
    }

    pub fn sprites(&self) -> impl Iterator<Item = &SpriteRequest> {
        self.effects.iter().filter_map(|effect| match effect {
            Effect::Sprite(request) => Some(request),
            _ => None,
        })
    }

    pub fn radial_debris(&self) -> impl Iterator<Item = &RadialDebrisRequest> {
        self.effects.iter().filter_map(|effect| match effect {
            Effect::RadialDebris(request) => Some(request),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Removes and returns everything recorded so far.
    pub fn take(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }
}

impl EffectBroadcaster for EffectLog {
    fn play_sound(&mut self, request: SoundRequest) {
        self.effects.push(Effect::Sound(request));
    }

    fn spawn_item_debris(&mut self, request: ItemDebrisRequest) {
        self.effects.push(Effect::ItemDebris(request));
    }

    fn broadcast_sprite(&mut self, request: SpriteRequest) {
        self.effects.push(Effect::Sprite(request));
    }

    fn create_radial_debris(&mut self, request: RadialDebrisRequest) {
        self.effects.push(Effect::RadialDebris(request));
    }
}
