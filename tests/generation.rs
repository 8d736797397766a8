use dungeoneer::{
    bitmask8, get_max_value_for_floor, Bounds, CaveConfig, Exit, Furniture, GenerationError, GeneratorConfig, Layout,
    Level, LevelGenerator, RectangularConfig, RoomType, SpawnTables, TileKind, DOOR_SILHOUETTES, ORTHOGONAL,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rstest::rstest;

fn small_cave_config() -> GeneratorConfig {
    GeneratorConfig {
        map_width: 40,
        map_height: 30,
        cave: CaveConfig {
            drunks: Bounds::new(10, 10),
            walks: Bounds::new(5, 5),
            steps: Bounds::new(3, 3),
        },
        ..GeneratorConfig::default()
    }
}

fn small_rect_config() -> GeneratorConfig {
    GeneratorConfig {
        map_width: 30,
        map_height: 20,
        rectangular: RectangularConfig {
            max_rooms: 5,
            room_min_size: 4,
            room_max_size: 6,
        },
        ..GeneratorConfig::default()
    }
}

fn assert_rooms_disjoint(level: &Level) {
    for (i, a) in level.rooms.iter().enumerate() {
        for b in level.rooms.iter().skip(i + 1) {
            assert!(!a.intersects(b), "{:?} overlaps {:?}", a, b);
        }
    }
}

fn assert_border_intact(level: &Level) {
    let grid = &level.grid;
    for x in 0..grid.width {
        for y in [0, grid.height - 1] {
            assert!(grid.is_kind((x, y).into(), TileKind::Wall));
        }
    }
    for y in 0..grid.height {
        for x in [0, grid.width - 1] {
            assert!(grid.is_kind((x, y).into(), TileKind::Wall));
        }
    }
}

fn assert_no_door_clusters(level: &Level) {
    for pos in level.grid.positions_of(TileKind::Floor) {
        let doors = bitmask8(&level.grid, pos, TileKind::Door) & ORTHOGONAL;
        assert!(doors.count_ones() <= 1, "{} doors around {}", doors.count_ones(), pos);
    }
}

#[test]
fn cave_scenario_on_small_grid() {
    let config = small_cave_config();
    let tables = SpawnTables::default();
    let generator = LevelGenerator::new(&config, &tables).unwrap();

    for seed in 0..10 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let level = generator.generate_cave(1, &mut rng).unwrap();

        assert!(level.rooms.len() >= 4);
        assert_eq!(level.rooms[0].room_type, RoomType::Start);
        assert_eq!(level.rooms[level.rooms.len() - 1].room_type, RoomType::End);
        assert_rooms_disjoint(&level);
        assert_border_intact(&level);
        assert!(level.grid.reachable(level.entry, level.exit.position()));
    }
}

#[test]
fn rectangular_scenario_on_small_grid() {
    let config = small_rect_config();
    let tables = SpawnTables::default();
    let generator = LevelGenerator::new(&config, &tables).unwrap();

    let mut built = 0;
    for seed in 0..30 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        match generator.generate_rectangular(1, &mut rng) {
            Ok(level) => {
                built += 1;
                assert!((2..=5).contains(&level.rooms.len()));
                assert_rooms_disjoint(&level);
                assert_border_intact(&level);
                for pair in level.rooms.windows(2) {
                    assert!(level.grid.reachable(pair[0].center(), pair[1].center()));
                }
            }
            Err(GenerationError::TooFewRooms { found }) => assert!(found < 2),
            Err(other) => panic!("seed {}: {}", seed, other),
        }
    }
    assert!(built > 0);
}

#[test]
fn doors_sit_on_recognized_silhouettes() {
    let config = GeneratorConfig::default();
    let tables = SpawnTables::default();
    let generator = LevelGenerator::new(&config, &tables).unwrap();

    for seed in 0..5 {
        let level = generator
            .generate_layout(Layout::Rectangular, 3, &mut ChaCha8Rng::seed_from_u64(seed))
            .unwrap();

        for door in level.entities.furniture().filter(|p| p.archetype == Furniture::Door.into()) {
            assert!(level.grid.is_kind(door.pos, TileKind::Door));
            // Iron bars went in after the doors and only ever replace walls.
            let mask = bitmask8(&level.grid, door.pos, TileKind::Wall);
            let iron = bitmask8(&level.grid, door.pos, TileKind::IronBar);
            assert!(
                DOOR_SILHOUETTES.contains(&(mask | iron)),
                "door at {} over wall mask {}",
                door.pos,
                mask | iron
            );
        }
        assert_no_door_clusters(&level);
    }
}

#[test]
fn same_seed_same_fingerprint() {
    let config = GeneratorConfig::default();
    let tables = SpawnTables::default();
    let generator = LevelGenerator::new(&config, &tables).unwrap();

    let a = generator.generate_seeded(6, 2024).unwrap();
    let b = generator.generate_seeded(6, 2024).unwrap();
    let c = generator.generate_seeded(6, 2025).unwrap();
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_ne!(a.fingerprint(), c.fingerprint());
}

#[test]
fn final_floor_ends_in_win_trigger() {
    let config = GeneratorConfig::default();
    let tables = SpawnTables::default();
    let generator = LevelGenerator::new(&config, &tables).unwrap();

    let level = generator.generate_seeded(config.final_floor, 31).unwrap();
    let Exit::WinTrigger(pos) = level.exit else {
        panic!("expected a win trigger on floor {}", config.final_floor);
    };
    assert_eq!(level.entities.count_of(Furniture::WinButton), 1);
    assert_eq!(level.entities.at(pos).map(|p| p.archetype), Some(Furniture::WinButton.into()));
    assert_eq!(level.grid.count(TileKind::Stairs), 1);
}

#[rstest]
#[case(GeneratorConfig { map_width: 8, ..GeneratorConfig::default() })]
#[case(GeneratorConfig { cave_chance: 1.5, ..GeneratorConfig::default() })]
#[case(GeneratorConfig { max_cave_attempts: 0, ..GeneratorConfig::default() })]
#[case(GeneratorConfig { min_cave_rooms: 1, ..GeneratorConfig::default() })]
fn degenerate_configs_are_refused(#[case] config: GeneratorConfig) {
    let tables = SpawnTables::default();
    assert!(matches!(
        LevelGenerator::new(&config, &tables),
        Err(GenerationError::InvalidConfig(_))
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_levels_hold_structural_invariants(seed in any::<u64>(), floor in 1u32..=10, cave in any::<bool>()) {
        let config = GeneratorConfig::default();
        let tables = SpawnTables::default();
        let generator = LevelGenerator::new(&config, &tables).unwrap();
        let layout = if cave { Layout::Cave } else { Layout::Rectangular };

        let level = generator
            .generate_layout(layout, floor, &mut ChaCha8Rng::seed_from_u64(seed))
            .unwrap();

        prop_assert!(level.is_connected());
        assert_rooms_disjoint(&level);
        assert_border_intact(&level);
        assert_no_door_clusters(&level);

        let mut seen = std::collections::HashSet::new();
        for placement in &level.entities {
            prop_assert!(seen.insert(placement.pos), "two placements at {}", placement.pos);
        }
    }

    #[test]
    fn prop_caps_never_decrease(floors in prop::collection::vec(0u32..20, 1..8), values in prop::collection::vec(0u32..10, 8)) {
        let mut thresholds = floors;
        thresholds.sort_unstable();
        let mut running = 0;
        let table: Vec<(u32, u32)> = thresholds
            .into_iter()
            .zip(values)
            .map(|(floor, value)| {
                running = running.max(value);
                (floor, running)
            })
            .collect();

        let mut previous = 0;
        for floor in 0..25 {
            let current = get_max_value_for_floor(&table, floor);
            prop_assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn prop_stock_caps_never_decrease(floor in 0u32..30) {
        let tables = SpawnTables::default();
        for table in [&tables.max_items, &tables.max_monsters, &tables.max_traps] {
            prop_assert!(get_max_value_for_floor(table, floor + 1) >= get_max_value_for_floor(table, floor));
        }
    }
}
