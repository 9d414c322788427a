//! # Container Module
//!
//! Breakable barrels and crates that hold a fixed item payload.
//!
//! A container takes [`DEFAULT_HITS_TO_BREAK`] heavy hits to break. Each
//! non-breaking hit shakes it for a moment; the breaking hit (or any explosion)
//! drops its items, bursts into debris and removes it from its location.
//!
//! Containers are session-only objects. They are spawned each morning and must
//! all be purged before the location is saved.
//!
//! [`DEFAULT_HITS_TO_BREAK`]: crate::config::DEFAULT_HITS_TO_BREAK

pub mod tool;

pub use tool::*;

use crate::config::{DEFAULT_HITS_TO_BREAK, SHAKE_DURATION_MS};
use crate::effects::{DebrisDispatcher, DebrisParams, EffectBroadcaster, SoundCue};
use crate::items::ItemInstance;
use crate::world::{PixelPoint, Position};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Sprite used to draw a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerVariant {
    #[default]
    Barrel,
    Crate,
}

impl ContainerVariant {
    /// Sprite index of the variant in the big craftable sheet.
    pub fn sprite_index(self) -> u32 {
        match self {
            ContainerVariant::Barrel => 118,
            ContainerVariant::Crate => 119,
        }
    }
}

/// Lifecycle state of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerState {
    /// Standing and still
    Intact,
    /// Standing and shaking from a recent hit
    Shaking,
    /// Broken; the container is gone from its location
    Broken,
}

/// Which session participant is running an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionRole {
    /// The session authority; the only role that changes container state
    Host,
    /// A connected farmhand; state and effects arrive from the host
    Client,
}

/// Where and by whom an interaction runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionContext<'a> {
    /// Name of the container's owning location, if it still has one
    pub location: Option<&'a str>,
    pub role: SessionRole,
}

impl<'a> InteractionContext<'a> {
    pub fn new(location: Option<&'a str>, role: SessionRole) -> Self {
        Self { location, role }
    }

    /// Host-side interaction at a location.
    pub fn host(location: &'a str) -> Self {
        Self::new(Some(location), SessionRole::Host)
    }

    /// The location of the interaction when it may change state: a location is
    /// present and this participant is the host.
    fn authoritative_location(&self, tile: Position) -> Option<&'a str> {
        match (self.location, self.role) {
            (Some(location), SessionRole::Host) if !location.is_empty() => Some(location),
            (_, SessionRole::Client) => {
                log::debug!("Container at {} left to the host", tile);
                None
            }
            _ => {
                log::warn!("Container at {} has no owning location", tile);
                None
            }
        }
    }
}

/// Result of hitting a container with a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitOutcome {
    /// Nothing happened; the host's default tool handling should continue
    Ignored,
    /// The container took damage and is shaking
    Shaken { hits_remaining: i32 },
    /// The container broke and released its items
    Broken { released: usize },
}

impl HitOutcome {
    /// Whether the container consumed the hit.
    ///
    /// Every hit that changed the container counts as handled, so the host
    /// skips its own default handling of that swing. Only `Ignored` falls
    /// through.
    pub fn is_handled(&self) -> bool {
        !matches!(self, HitOutcome::Ignored)
    }

    pub fn is_broken(&self) -> bool {
        matches!(self, HitOutcome::Broken { .. })
    }
}

/// Result of an explosion reaching a container.
///
/// Explosions are always handled by the container, so the host never applies
/// its own explosion destruction to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionOutcome {
    /// Items were released and the container broke
    Released { released: usize },
    /// No owning location, no authority, or already broken; nothing changed
    Skipped,
}

impl ExplosionOutcome {
    pub fn is_handled(&self) -> bool {
        true
    }

    pub fn released(&self) -> usize {
        match self {
            ExplosionOutcome::Released { released } => *released,
            ExplosionOutcome::Skipped => 0,
        }
    }
}

/// A destructible barrel or crate holding items.
///
/// # Examples
///
/// ```
/// use forage::*;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let item = ItemInstance::new(ItemCategory::Object, "16", 1);
/// let mut barrel = BreakableContainer::new(Position::new(4, 4), vec![item], ContainerVariant::Barrel);
/// let mut dispatcher = DebrisDispatcher::new(EffectLog::new());
/// let mut rng = StdRng::seed_from_u64(1);
/// let context = InteractionContext::host("Farm");
/// let axe = Tool::new(ToolKind::Axe);
///
/// assert_eq!(barrel.perform_tool_action(&axe, &context, &mut dispatcher, &mut rng),
///            HitOutcome::Shaken { hits_remaining: 2 });
/// assert_eq!(barrel.state(), ContainerState::Shaking);
///
/// barrel.perform_tool_action(&axe, &context, &mut dispatcher, &mut rng);
/// let last = barrel.perform_tool_action(&axe, &context, &mut dispatcher, &mut rng);
/// assert_eq!(last, HitOutcome::Broken { released: 1 });
/// assert!(barrel.items().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakableContainer {
    tile: Position,
    variant: ContainerVariant,
    items: Vec<ItemInstance>,
    hits_to_break: i32,
    shake_timer_ms: u32,
    debris: DebrisParams,
    broken: bool,
}

impl BreakableContainer {
    /// Creates an intact container. Items are released in the given order.
    pub fn new(tile: Position, items: Vec<ItemInstance>, variant: ContainerVariant) -> Self {
        Self {
            tile,
            variant,
            items,
            hits_to_break: DEFAULT_HITS_TO_BREAK,
            shake_timer_ms: 0,
            debris: DebrisParams::default(),
            broken: false,
        }
    }

    pub fn tile(&self) -> Position {
        self.tile
    }

    pub fn variant(&self) -> ContainerVariant {
        self.variant
    }

    pub fn items(&self) -> &[ItemInstance] {
        &self.items
    }

    pub fn hits_to_break(&self) -> i32 {
        self.hits_to_break
    }

    pub fn shake_timer_ms(&self) -> u32 {
        self.shake_timer_ms
    }

    pub fn debris(&self) -> &DebrisParams {
        &self.debris
    }

    pub fn is_broken(&self) -> bool {
        self.broken
    }

    pub fn state(&self) -> ContainerState {
        if self.broken {
            ContainerState::Broken
        } else if self.shake_timer_ms > 0 {
            ContainerState::Shaking
        } else {
            ContainerState::Intact
        }
    }

    /// Pixel position released items drop from.
    pub fn center(&self) -> PixelPoint {
        self.tile.pixel_center()
    }

    /// Applies a tool hit.
    ///
    /// Only heavy hits count. Two-handed weapons take off two hits per swing.
    /// Without an owning location, on a client, or once broken, the hit is
    /// ignored and nothing changes.
    pub fn perform_tool_action<B, R>(
        &mut self,
        tool: &Tool,
        context: &InteractionContext<'_>,
        dispatcher: &mut DebrisDispatcher<B>,
        rng: &mut R,
    ) -> HitOutcome
    where
        B: EffectBroadcaster,
        R: Rng + ?Sized,
    {
        let Some(location) = context.authoritative_location(self.tile) else {
            return HitOutcome::Ignored;
        };

        let damage = tool.hit_damage();
        if self.broken || damage == 0 {
            return HitOutcome::Ignored;
        }

        self.hits_to_break -= damage;
        log::debug!(
            "Container at {} in {} hit for {}, {} left",
            self.tile,
            location,
            damage,
            self.hits_to_break
        );

        if self.hits_to_break <= 0 {
            dispatcher.play_sound(location, SoundCue::BarrelBreak, self.tile);
            let released = self.break_apart(location, dispatcher, rng);
            HitOutcome::Broken { released }
        } else {
            self.shake_timer_ms = SHAKE_DURATION_MS;
            dispatcher.play_sound(location, SoundCue::WoodWhack, self.tile);
            dispatcher.hit_burst(location, self.tile, &self.debris, rng);
            HitOutcome::Shaken {
                hits_remaining: self.hits_to_break,
            }
        }
    }

    /// Applies an explosion, releasing the contents regardless of remaining
    /// hits. Without an owning location the release is skipped, but the
    /// explosion still counts as handled.
    pub fn on_explosion<B, R>(
        &mut self,
        context: &InteractionContext<'_>,
        dispatcher: &mut DebrisDispatcher<B>,
        rng: &mut R,
    ) -> ExplosionOutcome
    where
        B: EffectBroadcaster,
        R: Rng + ?Sized,
    {
        if self.broken {
            return ExplosionOutcome::Skipped;
        }
        let Some(location) = context.authoritative_location(self.tile) else {
            return ExplosionOutcome::Skipped;
        };

        let released = self.break_apart(location, dispatcher, rng);
        ExplosionOutcome::Released { released }
    }

    /// Advances the shake timer by one tick.
    pub fn update(&mut self, elapsed_ms: u32) {
        if self.shake_timer_ms > 0 {
            self.shake_timer_ms = self.shake_timer_ms.saturating_sub(elapsed_ms);
            log::trace!("Container at {} shake {}ms", self.tile, self.shake_timer_ms);
        }
    }

    /// Random draw offset a renderer applies while the container shakes.
    pub fn shake_offset<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(i32, i32)> {
        if self.shake_timer_ms == 0 {
            return None;
        }
        let intensity = (self.shake_timer_ms / 100 + 1) as i32;
        Some((
            rng.gen_range(-intensity..=intensity),
            rng.gen_range(-intensity..=intensity),
        ))
    }

    /// Drains the items exactly once and sends the break debris.
    fn break_apart<B, R>(
        &mut self,
        location: &str,
        dispatcher: &mut DebrisDispatcher<B>,
        rng: &mut R,
    ) -> usize
    where
        B: EffectBroadcaster,
        R: Rng + ?Sized,
    {
        self.broken = true;
        self.shake_timer_ms = 0;

        let items = std::mem::take(&mut self.items);
        let released = dispatcher.release_items(location, self.center(), items, rng);
        dispatcher.break_burst(location, self.tile, &self.debris, rng);
        released
    }
}
