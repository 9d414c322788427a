//! Integration tests for breakable containers and their effects.

use forage::config::{DEFAULT_HITS_TO_BREAK, SHAKE_DURATION_MS};
use forage::{
    BreakableContainer, ContainerState, ContainerVariant, DebrisDispatcher, Effect, EffectLog,
    ExplosionOutcome, GridLocation, HitOutcome, InteractionContext, ItemCategory, ItemInstance,
    Location, PlacedObject, Position, SessionRole, SoundCue, TerrainType, TerrainView, Tool,
    ToolKind, WeaponKind,
};
use rand::{rngs::StdRng, SeedableRng};

fn item(id: &str) -> ItemInstance {
    ItemInstance::new(ItemCategory::Object, id, 1)
}

fn barrel(items: Vec<ItemInstance>) -> BreakableContainer {
    BreakableContainer::new(Position::new(3, 4), items, ContainerVariant::Barrel)
}

fn released_ids(log: &EffectLog) -> Vec<String> {
    log.item_debris().map(|drop| drop.item.id.clone()).collect()
}

/// Three heavy tool hits break a fresh container.
#[test]
fn test_three_tool_hits_break() {
    let mut container = barrel(vec![item("A")]);
    let mut dispatcher = DebrisDispatcher::new(EffectLog::new());
    let mut rng = StdRng::seed_from_u64(1);
    let context = InteractionContext::host("Farm");
    let axe = Tool::new(ToolKind::Axe);

    assert_eq!(container.hits_to_break(), DEFAULT_HITS_TO_BREAK);
    assert_eq!(
        container.perform_tool_action(&axe, &context, &mut dispatcher, &mut rng),
        HitOutcome::Shaken { hits_remaining: 2 }
    );
    assert_eq!(container.state(), ContainerState::Shaking);
    assert_eq!(container.shake_timer_ms(), SHAKE_DURATION_MS);

    assert_eq!(
        container.perform_tool_action(&axe, &context, &mut dispatcher, &mut rng),
        HitOutcome::Shaken { hits_remaining: 1 }
    );
    assert_eq!(
        container.perform_tool_action(&axe, &context, &mut dispatcher, &mut rng),
        HitOutcome::Broken { released: 1 }
    );
    assert_eq!(container.state(), ContainerState::Broken);

    let log = dispatcher.broadcaster();
    let cues: Vec<SoundCue> = log.sounds().map(|sound| sound.cue).collect();
    assert_eq!(
        cues,
        vec![SoundCue::WoodWhack, SoundCue::WoodWhack, SoundCue::BarrelBreak]
    );
    assert_eq!(log.radial_debris().count(), 2);
    assert!((4..=11).contains(&log.sprites().count()));
}

/// A two-handed weapon breaks a fresh container in two swings.
#[test]
fn test_two_handed_weapon_breaks_in_two() {
    let mut container = barrel(vec![item("A")]);
    let mut dispatcher = DebrisDispatcher::new(EffectLog::new());
    let mut rng = StdRng::seed_from_u64(2);
    let context = InteractionContext::host("Farm");
    let club = Tool::weapon(WeaponKind::TwoHanded);

    assert_eq!(
        container.perform_tool_action(&club, &context, &mut dispatcher, &mut rng),
        HitOutcome::Shaken { hits_remaining: 1 }
    );
    assert_eq!(
        container.perform_tool_action(&club, &context, &mut dispatcher, &mut rng),
        HitOutcome::Broken { released: 1 }
    );
}

/// A one-handed weapon hit followed by a tool hit leaves one hit to go.
#[test]
fn test_mixed_hits() {
    let mut container = barrel(vec![]);
    let mut dispatcher = DebrisDispatcher::new(EffectLog::new());
    let mut rng = StdRng::seed_from_u64(3);
    let context = InteractionContext::host("Farm");

    container.perform_tool_action(&Tool::weapon(WeaponKind::Dagger), &context, &mut dispatcher, &mut rng);
    let outcome = container.perform_tool_action(&Tool::new(ToolKind::Pickaxe), &context, &mut dispatcher, &mut rng);

    assert_eq!(outcome, HitOutcome::Shaken { hits_remaining: 1 });
}

/// A two-handed weapon hit followed by a tool hit breaks a fresh container.
#[test]
fn test_two_handed_then_tool_breaks() {
    let mut container = barrel(vec![item("A")]);
    let mut dispatcher = DebrisDispatcher::new(EffectLog::new());
    let mut rng = StdRng::seed_from_u64(12);
    let context = InteractionContext::host("Farm");

    let first = container.perform_tool_action(
        &Tool::weapon(WeaponKind::TwoHanded),
        &context,
        &mut dispatcher,
        &mut rng,
    );
    assert_eq!(first, HitOutcome::Shaken { hits_remaining: 1 });

    let second = container.perform_tool_action(&Tool::new(ToolKind::Axe), &context, &mut dispatcher, &mut rng);
    assert_eq!(second, HitOutcome::Broken { released: 1 });
    assert_eq!(container.hits_to_break(), 0);
    assert_eq!(container.state(), ContainerState::Broken);
}

/// Light tools never damage a container.
#[test]
fn test_light_tools_ignored() {
    let mut container = barrel(vec![item("A")]);
    let mut dispatcher = DebrisDispatcher::new(EffectLog::new());
    let mut rng = StdRng::seed_from_u64(4);
    let context = InteractionContext::host("Farm");

    for kind in [ToolKind::WateringCan, ToolKind::FishingRod, ToolKind::Scythe] {
        let outcome = container.perform_tool_action(&Tool::new(kind), &context, &mut dispatcher, &mut rng);
        assert_eq!(outcome, HitOutcome::Ignored);
        assert!(!outcome.is_handled());
    }

    assert_eq!(container.hits_to_break(), DEFAULT_HITS_TO_BREAK);
    assert!(dispatcher.broadcaster().is_empty());
}

/// Contents are released once, in order, around the container center.
#[test]
fn test_release_order() {
    let mut container = barrel(vec![item("A"), item("B"), item("C")]);
    let center = container.center();
    let mut dispatcher = DebrisDispatcher::new(EffectLog::new());
    let mut rng = StdRng::seed_from_u64(5);
    let context = InteractionContext::host("Farm");
    let club = Tool::weapon(WeaponKind::TwoHanded);

    container.perform_tool_action(&club, &context, &mut dispatcher, &mut rng);
    container.perform_tool_action(&club, &context, &mut dispatcher, &mut rng);
    assert!(container.items().is_empty());

    let log = dispatcher.broadcaster();
    assert_eq!(released_ids(log), vec!["A", "B", "C"]);
    for drop in log.item_debris() {
        assert_eq!(drop.location, "Farm");
        assert!((drop.position.x - center.x).abs() <= 8);
        assert!((drop.position.y - center.y).abs() <= 8);
    }

    assert_eq!(
        container.perform_tool_action(&club, &context, &mut dispatcher, &mut rng),
        HitOutcome::Ignored
    );
    assert_eq!(dispatcher.broadcaster().item_debris().count(), 3);
}

/// An empty container still breaks with its particle burst.
#[test]
fn test_empty_container_breaks() {
    let mut container = BreakableContainer::new(Position::new(0, 0), vec![], ContainerVariant::Crate);
    let mut dispatcher = DebrisDispatcher::new(EffectLog::new());
    let mut rng = StdRng::seed_from_u64(6);
    let context = InteractionContext::host("Farm");

    let outcome = container.on_explosion(&context, &mut dispatcher, &mut rng);

    assert_eq!(outcome, ExplosionOutcome::Released { released: 0 });
    assert_eq!(dispatcher.broadcaster().item_debris().count(), 0);
    assert!(dispatcher.broadcaster().sprites().count() >= 4);
}

/// An explosion releases everything even with hits left.
#[test]
fn test_explosion_mid_damage() {
    let mut container = barrel(vec![item("A"), item("B")]);
    let mut dispatcher = DebrisDispatcher::new(EffectLog::new());
    let mut rng = StdRng::seed_from_u64(7);
    let context = InteractionContext::host("Mine");

    container.perform_tool_action(&Tool::new(ToolKind::Axe), &context, &mut dispatcher, &mut rng);
    assert_eq!(container.hits_to_break(), 2);

    let outcome = container.on_explosion(&context, &mut dispatcher, &mut rng);
    assert_eq!(outcome, ExplosionOutcome::Released { released: 2 });
    assert!(container.is_broken());
    assert_eq!(released_ids(dispatcher.broadcaster()), vec!["A", "B"]);

    assert_eq!(
        container.on_explosion(&context, &mut dispatcher, &mut rng),
        ExplosionOutcome::Skipped
    );
}

/// Without an owning location nothing changes, and explosions still count
/// as handled.
#[test]
fn test_missing_location() {
    let mut container = barrel(vec![item("A")]);
    let mut dispatcher = DebrisDispatcher::new(EffectLog::new());
    let mut rng = StdRng::seed_from_u64(8);
    let context = InteractionContext::new(None, SessionRole::Host);

    assert_eq!(
        container.perform_tool_action(&Tool::new(ToolKind::Axe), &context, &mut dispatcher, &mut rng),
        HitOutcome::Ignored
    );
    let outcome = container.on_explosion(&context, &mut dispatcher, &mut rng);
    assert!(outcome.is_handled());
    assert_eq!(outcome.released(), 0);

    assert_eq!(container.items().len(), 1);
    assert!(dispatcher.broadcaster().is_empty());
}

/// Striking through the location removes the container once it breaks.
#[test]
fn test_strike_removes_broken_container() {
    let mut location = GridLocation::new("Farm", 8, 8, TerrainType::Grass);
    let tile = Position::new(3, 4);
    location.place_object(tile, PlacedObject::Container { container: barrel(vec![item("A")]) });

    let mut dispatcher = DebrisDispatcher::new(EffectLog::new());
    let mut rng = StdRng::seed_from_u64(9);
    let axe = Tool::new(ToolKind::Axe);

    for _ in 0..2 {
        let outcome = location.strike(tile, &axe, SessionRole::Host, &mut dispatcher, &mut rng);
        assert!(matches!(outcome, HitOutcome::Shaken { .. }));
        assert!(location.is_occupied(tile));
    }

    location.update(SHAKE_DURATION_MS);
    assert_eq!(location.container_at(tile).map(|c| c.state()), Some(ContainerState::Intact));

    let outcome = location.strike(tile, &axe, SessionRole::Host, &mut dispatcher, &mut rng);
    assert_eq!(outcome, HitOutcome::Broken { released: 1 });
    assert!(!location.is_occupied(tile));

    assert_eq!(
        location.strike(tile, &axe, SessionRole::Host, &mut dispatcher, &mut rng),
        HitOutcome::Ignored
    );
}

/// Clients never change container state.
#[test]
fn test_client_strike_ignored() {
    let mut location = GridLocation::new("Farm", 8, 8, TerrainType::Grass);
    let tile = Position::new(1, 1);
    location.place_object(tile, PlacedObject::Container { container: barrel(vec![item("A")]) });

    let mut dispatcher = DebrisDispatcher::new(EffectLog::new());
    let mut rng = StdRng::seed_from_u64(10);

    let outcome = location.strike(
        tile,
        &Tool::weapon(WeaponKind::TwoHanded),
        SessionRole::Client,
        &mut dispatcher,
        &mut rng,
    );
    assert_eq!(outcome, HitOutcome::Ignored);
    assert_eq!(
        location.container_at(tile).map(|c| c.hits_to_break()),
        Some(DEFAULT_HITS_TO_BREAK)
    );
    assert!(dispatcher.broadcaster().is_empty());
}

/// An area explosion breaks and removes every container in range.
#[test]
fn test_explode_area() {
    let mut location = GridLocation::new("Mine", 10, 10, TerrainType::Stone);
    for tile in [Position::new(2, 2), Position::new(3, 2), Position::new(9, 9)] {
        location.place_object(
            tile,
            PlacedObject::Container {
                container: BreakableContainer::new(tile, vec![item("A")], ContainerVariant::Crate),
            },
        );
    }

    let mut dispatcher = DebrisDispatcher::new(EffectLog::new());
    let mut rng = StdRng::seed_from_u64(11);
    let outcomes = location.explode_area(Position::new(2, 3), 2, SessionRole::Host, &mut dispatcher, &mut rng);

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|o| o.released() == 1));
    assert_eq!(location.container_count(), 1);
    assert!(location.container_at(Position::new(9, 9)).is_some());

    let drops = dispatcher
        .broadcaster()
        .effects()
        .iter()
        .filter(|effect| matches!(effect, Effect::ItemDebris(_)))
        .count();
    assert_eq!(drops, 2);
}
