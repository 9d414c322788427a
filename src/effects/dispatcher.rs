//! # Debris Dispatcher
//!
//! Turns container hits, breaks and explosions into effect requests.
//!
//! The dispatcher rolls every random parameter itself and hands finished
//! requests to an injected [`EffectBroadcaster`]. It never touches gameplay
//! state.

use super::{
    EffectBroadcaster, ItemDebrisRequest, RadialDebrisRequest, SoundCue, SoundRequest,
    SpriteRect, SpriteRequest, Tint, Vec2,
};
use crate::config::{
    BREAK_DEBRIS_COUNT, BREAK_DEBRIS_SOURCE, BREAK_DEBRIS_SOURCE_ALT, CONTAINER_TINT,
    DEBRIS_ALPHA_FADE, DEBRIS_GRAVITY, DEBRIS_INTERVAL_MS, DEBRIS_SCALE, HIT_DEBRIS_COUNT,
    ITEM_DEBRIS_JITTER, RADIAL_DEBRIS_INDEX, TILE_SIZE,
};
use crate::items::ItemInstance;
use crate::world::{PixelPoint, Position};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Visual parameters of a container's debris.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebrisParams {
    /// Debris sprite index of radial hit debris
    pub radial_index: u32,
    /// The two source rectangles break particles pick from
    pub sources: [SpriteRect; 2],
    pub tint: Tint,
}

impl Default for DebrisParams {
    fn default() -> Self {
        Self {
            radial_index: RADIAL_DEBRIS_INDEX,
            sources: [BREAK_DEBRIS_SOURCE, BREAK_DEBRIS_SOURCE_ALT],
            tint: CONTAINER_TINT,
        }
    }
}

/// Emits debris, sound and item-drop requests through a broadcaster.
///
/// # Examples
///
/// ```
/// use forage::{DebrisDispatcher, DebrisParams, EffectLog, Position};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut dispatcher = DebrisDispatcher::new(EffectLog::new());
/// let mut rng = StdRng::seed_from_u64(7);
///
/// let count = dispatcher.break_burst("Farm", Position::new(3, 4), &DebrisParams::default(), &mut rng);
/// assert!((4..=11).contains(&count));
/// assert_eq!(dispatcher.broadcaster().sprites().count(), count as usize);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DebrisDispatcher<B: EffectBroadcaster> {
    broadcaster: B,
}

impl<B: EffectBroadcaster> DebrisDispatcher<B> {
    /// Creates a dispatcher delivering requests to `broadcaster`.
    pub fn new(broadcaster: B) -> Self {
        Self { broadcaster }
    }

    pub fn broadcaster(&self) -> &B {
        &self.broadcaster
    }

    pub fn into_inner(self) -> B {
        self.broadcaster
    }

    /// Plays a sound for everyone at the location.
    pub fn play_sound(&mut self, location: &str, cue: SoundCue, tile: Position) {
        self.broadcaster.play_sound(SoundRequest {
            location: location.to_string(),
            cue,
            tile,
        });
    }

    /// Drops every item at `origin`, each nudged by a small random offset, in
    /// the order given. Returns how many items were dropped.
    pub fn release_items<R: Rng + ?Sized>(
        &mut self,
        location: &str,
        origin: PixelPoint,
        items: Vec<ItemInstance>,
        rng: &mut R,
    ) -> usize {
        let count = items.len();

        for item in items {
            let dx = rng.gen_range(-ITEM_DEBRIS_JITTER..=ITEM_DEBRIS_JITTER);
            let dy = rng.gen_range(-ITEM_DEBRIS_JITTER..=ITEM_DEBRIS_JITTER);

            log::debug!("Releasing {} at {}", item.qualified_id(), location);
            self.broadcaster.spawn_item_debris(ItemDebrisRequest {
                location: location.to_string(),
                item,
                position: origin.offset(dx, dy),
            });
        }

        count
    }

    /// Broadcasts the decorative particle burst of a breaking container.
    /// Returns the number of particles sent.
    pub fn break_burst<R: Rng + ?Sized>(
        &mut self,
        location: &str,
        tile: Position,
        params: &DebrisParams,
        rng: &mut R,
    ) -> u32 {
        let (min, max) = BREAK_DEBRIS_COUNT;
        let count = rng.gen_range(min..=max);

        let half = (TILE_SIZE / 2) as f32;
        let position = Vec2::new(
            (tile.x * TILE_SIZE) as f32 + half,
            (tile.y * TILE_SIZE) as f32 + half,
        );
        let layer_depth = ((tile.y * TILE_SIZE) as f32 + half) / 10_000.0;

        for _ in 0..count {
            let source = if rng.gen_bool(0.5) {
                params.sources[0]
            } else {
                params.sources[1]
            };
            let flipped = rng.gen_bool(0.5);
            let rotation = rng.gen_range(-5..=5) as f32 * PI / 8.0;
            let rotation_change = rng.gen_range(-5..=5) as f32 * PI / 64.0;
            let motion = Vec2::new(
                rng.gen_range(-30..=30) as f32 / 10.0,
                rng.gen_range(-10..=-8) as f32,
            );

            self.broadcaster.broadcast_sprite(SpriteRequest {
                location: location.to_string(),
                source,
                position,
                flipped,
                layer_depth,
                interval_ms: DEBRIS_INTERVAL_MS,
                alpha_fade: DEBRIS_ALPHA_FADE,
                scale: DEBRIS_SCALE,
                rotation,
                rotation_change,
                motion,
                acceleration: Vec2::new(0.0, DEBRIS_GRAVITY),
                tint: params.tint,
            });
        }

        count
    }

    /// Sends the small radial debris burst of a non-breaking hit. Returns the
    /// number of debris chunks requested.
    pub fn hit_burst<R: Rng + ?Sized>(
        &mut self,
        location: &str,
        tile: Position,
        params: &DebrisParams,
        rng: &mut R,
    ) -> u32 {
        let (min, max) = HIT_DEBRIS_COUNT;
        let count = rng.gen_range(min..=max);

        self.broadcaster.create_radial_debris(RadialDebrisRequest {
            location: location.to_string(),
            tile,
            debris_index: params.radial_index,
            count,
            tint: params.tint,
        });

        count
    }
}
