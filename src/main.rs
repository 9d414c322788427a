//! # Forage Simulator
//!
//! Runs one in-game day of forage spawning on an in-memory location, strikes
//! every spawned container and prints what happened as JSON.

use clap::Parser;
use forage::{
    utils, CatalogRecord, CatalogSet, ContainerVariant, DebrisDispatcher, EffectLog,
    ForageError, ForageResult, GridLocation, ItemCategory, ItemDescriptor, Location,
    MemoryCatalog, Position, SessionRole, SpawnArea, SpawnConfig, SpawnCountRange,
    SpawnEvaluator, SpawnRule, TerrainType, TileCondition, TileRect, Tool, ToolKind,
};
use log::info;
use std::path::PathBuf;

/// Command line arguments for the forage simulator.
#[derive(Parser, Debug)]
#[command(name = "forage-sim")]
#[command(about = "Simulates a day of forage spawning and container breaking")]
#[command(version)]
struct Args {
    /// Spawn configuration (JSON); a built-in demo configuration otherwise
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// In-game day to simulate
    #[arg(short, long, default_value_t = 1)]
    day: u32,

    /// Location width in tiles
    #[arg(long, default_value_t = 24)]
    width: u32,

    /// Location height in tiles
    #[arg(long, default_value_t = 16)]
    height: u32,

    /// Axe hits to apply to every spawned container
    #[arg(long, default_value_t = 3)]
    hits: u32,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> ForageResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level);
    info!("Starting forage-sim v{}", forage::VERSION);

    if args.width == 0 || args.height == 0 {
        return Err(ForageError::ConfigurationRange(format!(
            "location size {}x{} has no tiles",
            args.width, args.height
        )));
    }

    let config = match &args.config {
        Some(path) => SpawnConfig::load(path)?,
        None => demo_config(),
    };
    let catalogs = demo_catalogs();
    let mut location = demo_location(args.width, args.height);

    let mut rng = utils::create_rng(&config, args.day);
    let evaluator = SpawnEvaluator::new(&catalogs);
    let report = evaluator.spawn_day(&config.rules, &mut location, &mut rng);

    let containers: Vec<Position> = report
        .placed
        .iter()
        .filter(|placement| placement.is_container())
        .map(|placement| placement.tile)
        .collect();

    let axe = Tool::new(ToolKind::Axe);
    let mut dispatcher = DebrisDispatcher::new(EffectLog::new());
    let mut hits = Vec::new();
    for tile in containers {
        for _ in 0..args.hits {
            let outcome = location.strike(tile, &axe, SessionRole::Host, &mut dispatcher, &mut rng);
            hits.push((tile, outcome));
            if !outcome.is_handled() || outcome.is_broken() {
                break;
            }
        }
    }

    let purged = location.purge_containers();
    info!(
        "Day {} done: {} hit(s), {} effect(s), {} container(s) left standing",
        args.day,
        hits.len(),
        dispatcher.broadcaster().len(),
        purged
    );

    let output = serde_json::json!({
        "day": args.day,
        "report": report,
        "hits": hits,
        "effects": dispatcher.broadcaster().effects(),
        "purged_containers": purged,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn initialize_logging(log_level: &str) {
    env_logger::Builder::new()
        .parse_filters(log_level)
        .format_target(false)
        .init();
}

fn demo_catalogs() -> CatalogSet {
    CatalogSet::new()
        .with_catalog(
            ItemCategory::Object,
            MemoryCatalog::new()
                .with("16", CatalogRecord::typed("Wild Horseradish", "Basic"))
                .with("18", CatalogRecord::typed("Daffodil", "Basic"))
                .with("20", CatalogRecord::typed("Leek", "Basic"))
                .with("22", CatalogRecord::typed("Dandelion", "Basic"))
                .with("516", CatalogRecord::typed("Small Glow Ring", "Ring")),
        )
        .with_catalog(
            ItemCategory::Hat,
            MemoryCatalog::new().with("0", CatalogRecord::delimited("Cowboy Hat/Yeehaw!/true/true")),
        )
}

fn demo_location(width: u32, height: u32) -> GridLocation {
    let mut location = GridLocation::new("Forest", width, height, TerrainType::Grass);
    location.fill_terrain(TileRect::new(0, 0, width, height / 4), TerrainType::Water);
    location.fill_terrain(
        TileRect::new(0, (height / 4) as i32, width, 1),
        TerrainType::Sand,
    );
    location.define_region(
        "clearing",
        TileRect::new((width / 2) as i32, (height / 2) as i32, width / 2, height / 2).tiles(),
    );
    location
}

fn demo_config() -> SpawnConfig {
    let object = |name: &str| ItemDescriptor::new(ItemCategory::Object, name);

    SpawnConfig::new(12345)
        .with_rule(
            SpawnRule::new("spring-forage", SpawnArea::Whole, SpawnCountRange::new(4, 8))
                .with_condition(TileCondition::Terrain(vec![TerrainType::Grass]))
                .with_item(object("Wild Horseradish"), 4)
                .with_item(object("daffodil"), 3)
                .with_item(object("Leek").with_stack(2), 2)
                .with_item(object("Dandelion"), 1),
        )
        .with_rule(
            SpawnRule::new(
                "clearing-containers",
                SpawnArea::Region {
                    name: "clearing".to_string(),
                },
                SpawnCountRange::new(1, 3),
            )
            .with_container(
                ContainerVariant::Barrel,
                vec![object("Leek"), object("Wild Horseradish")],
                3,
            )
            .with_container(
                ContainerVariant::Crate,
                vec![
                    ItemDescriptor::new(ItemCategory::Ring, "Small Glow Ring"),
                    ItemDescriptor::new(ItemCategory::Hat, "cowboy hat"),
                ],
                1,
            ),
        )
}
