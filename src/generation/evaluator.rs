//! # Spawn Evaluator
//!
//! Evaluates spawn rules against a location's terrain and places the result.
//!
//! Evaluation is split from placement: [`SpawnEvaluator::evaluate`] only reads
//! the terrain and returns [`Placement`]s, [`SpawnEvaluator::spawn_day`] runs
//! every rule of a day and commits the placements to a [`Location`].

use super::rules::{SpawnRule, SpawnTemplate};
use crate::container::{BreakableContainer, ContainerVariant};
use crate::items::{CatalogProvider, ItemInstance, ItemResolver};
use crate::world::{Location, PlacedObject, Position, TerrainView};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A container waiting to be placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSpec {
    pub variant: ContainerVariant,
    /// Resolved contents in configuration order
    pub contents: Vec<ItemInstance>,
}

impl ContainerSpec {
    /// Builds the container for a tile.
    pub fn build(&self, tile: Position) -> BreakableContainer {
        BreakableContainer::new(tile, self.contents.clone(), self.variant)
    }
}

/// What a placement puts on its tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlacementKind {
    Forage { item: ItemInstance },
    Container { container: ContainerSpec },
}

/// One spawn chosen for one tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub rule_id: String,
    pub tile: Position,
    pub kind: PlacementKind,
}

impl Placement {
    pub fn is_container(&self) -> bool {
        matches!(self.kind, PlacementKind::Container { .. })
    }

    /// The object this placement puts on the location.
    pub fn to_object(&self) -> PlacedObject {
        match &self.kind {
            PlacementKind::Forage { item } => PlacedObject::Forage { item: item.clone() },
            PlacementKind::Container { container } => PlacedObject::Container {
                container: container.build(self.tile),
            },
        }
    }
}

/// Result of one day's spawning on a location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySpawnReport {
    pub location: String,
    /// Placements committed to the location, in rule order
    pub placed: Vec<Placement>,
    /// Placements whose tile was taken when they were committed
    pub blocked: usize,
    /// IDs of rules skipped because they failed validation
    pub rejected_rules: Vec<String>,
}

impl DaySpawnReport {
    pub fn forage_count(&self) -> usize {
        self.placed.iter().filter(|p| !p.is_container()).count()
    }

    pub fn container_count(&self) -> usize {
        self.placed.iter().filter(|p| p.is_container()).count()
    }
}

/// Evaluates spawn rules, resolving items through the host catalogs.
///
/// # Examples
///
/// ```
/// use forage::*;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let catalogs = CatalogSet::new().with_catalog(
///     ItemCategory::Object,
///     MemoryCatalog::new().with("20", CatalogRecord::typed("Leek", "Basic")),
/// );
/// let farm = GridLocation::new("Farm", 8, 8, TerrainType::Grass);
/// let rule = SpawnRule::new("leeks", SpawnArea::Whole, SpawnCountRange::exactly(3))
///     .with_item(ItemDescriptor::new(ItemCategory::Object, "Leek"), 1);
///
/// let evaluator = SpawnEvaluator::new(&catalogs);
/// let placements = evaluator.evaluate(&rule, &farm, &mut StdRng::seed_from_u64(1));
/// assert_eq!(placements.len(), 3);
/// ```
pub struct SpawnEvaluator<'a, P: CatalogProvider + ?Sized> {
    resolver: ItemResolver<'a, P>,
}

impl<'a, P: CatalogProvider + ?Sized> SpawnEvaluator<'a, P> {
    pub fn new(catalogs: &'a P) -> Self {
        Self {
            resolver: ItemResolver::new(catalogs),
        }
    }

    /// Chooses tiles and spawns for one rule without changing the terrain.
    ///
    /// Tiles are drawn without replacement from the rule's area and checked
    /// against the rule's conditions when drawn, so fewer placements than the
    /// drawn count come back when the area runs out of acceptable tiles. A rule
    /// whose spawns all fail to resolve places nothing.
    pub fn evaluate<T, R>(&self, rule: &SpawnRule, terrain: &T, rng: &mut R) -> Vec<Placement>
    where
        T: TerrainView + ?Sized,
        R: Rng + ?Sized,
    {
        if let Err(e) = rule.validate() {
            log::warn!("Skipping invalid rule: {}", e);
            return Vec::new();
        }

        let (pool, weights) = self.resolve_pool(rule);
        if pool.is_empty() {
            log::debug!("Rule \"{}\" has no resolvable spawns", rule.id);
            return Vec::new();
        }
        let Ok(distribution) = WeightedIndex::new(&weights) else {
            return Vec::new();
        };

        let count = rng.gen_range(rule.count.min..=rule.count.max) as usize;
        if count == 0 {
            return Vec::new();
        }

        let mut candidates = rule.candidate_tiles(terrain);
        candidates.shuffle(rng);

        let mut placements = Vec::with_capacity(count.min(candidates.len()));
        for tile in candidates {
            if placements.len() >= count {
                break;
            }
            if !rule.accepts(terrain, tile) {
                continue;
            }

            placements.push(Placement {
                rule_id: rule.id.clone(),
                tile,
                kind: pool[distribution.sample(rng)].clone(),
            });
        }

        if placements.len() < count {
            log::debug!(
                "Rule \"{}\" placed {} of {} spawns; out of acceptable tiles",
                rule.id,
                placements.len(),
                count
            );
        }

        placements
    }

    /// Runs every rule against a location and commits the placements.
    ///
    /// Each rule sees the placements of the rules before it. Rules failing
    /// validation are reported and skipped.
    pub fn spawn_day<L, R>(&self, rules: &[SpawnRule], location: &mut L, rng: &mut R) -> DaySpawnReport
    where
        L: Location,
        R: Rng + ?Sized,
    {
        let mut report = DaySpawnReport {
            location: location.name().to_string(),
            ..DaySpawnReport::default()
        };

        for rule in rules {
            if let Err(e) = rule.validate() {
                log::warn!("Rejected spawn rule on {}: {}", report.location, e);
                report.rejected_rules.push(rule.id.clone());
                continue;
            }

            for placement in self.evaluate(rule, &*location, rng) {
                if location.place_object(placement.tile, placement.to_object()) {
                    report.placed.push(placement);
                } else {
                    log::debug!("Tile {} was taken before rule \"{}\" placed", placement.tile, rule.id);
                    report.blocked += 1;
                }
            }
        }

        log::info!(
            "Spawned {} forage item(s) and {} container(s) on {}",
            report.forage_count(),
            report.container_count(),
            report.location
        );

        report
    }

    /// Resolves the rule's draw pool. Unresolvable items are left out, and so
    /// are unresolvable container contents, one by one.
    fn resolve_pool(&self, rule: &SpawnRule) -> (Vec<PlacementKind>, Vec<u32>) {
        let mut pool = Vec::with_capacity(rule.spawns.len());
        let mut weights = Vec::with_capacity(rule.spawns.len());

        for entry in &rule.spawns {
            let kind = match &entry.spawn {
                SpawnTemplate::Item { item } => match self.resolver.resolve_descriptor(item) {
                    Some(item) => PlacementKind::Forage { item },
                    None => continue,
                },
                SpawnTemplate::Container { variant, contents } => PlacementKind::Container {
                    container: ContainerSpec {
                        variant: *variant,
                        contents: contents
                            .iter()
                            .filter_map(|item| self.resolver.resolve_descriptor(item))
                            .collect(),
                    },
                },
            };

            pool.push(kind);
            weights.push(entry.weight);
        }

        (pool, weights)
    }
}
