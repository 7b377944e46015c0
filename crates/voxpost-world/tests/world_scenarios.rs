//! End-to-end behaviour of a world built through the public API.

use std::collections::HashSet;
use std::sync::Arc;

use glam::IVec3;
use voxpost_mesh::BatchKind;
use voxpost_terrain::{Biome, BiomePreset, TerrainParams};
use voxpost_voxel::{ChunkCoord, VoxelKind};
use voxpost_world::{ChunkManager, ChunkStreamer, WorldSettings};

const TERRAIN_KINDS: [VoxelKind; 5] = [
    VoxelKind::Stone,
    VoxelKind::Dirt,
    VoxelKind::Grass,
    VoxelKind::Sand,
    VoxelKind::Snow,
];

fn world(preset: BiomePreset) -> ChunkManager {
    ChunkManager::new(WorldSettings::new(TerrainParams::for_preset(preset, 1337)))
        .expect("preset settings are valid")
}

fn terrain_positions(batches: &[voxpost_mesh::InstanceBatch]) -> Vec<IVec3> {
    batches
        .iter()
        .filter(|b| matches!(b.kind, BatchKind::Block(k) if TERRAIN_KINDS.contains(&k)))
        .flat_map(|b| b.positions.iter().copied())
        .collect()
}

#[test]
fn test_origin_height_is_stable_and_bounded() {
    let m = world(BiomePreset::Greenery);
    let h = m.height_at(0, 0);
    assert!((0..=18).contains(&h), "height {h} outside [0, 18]");
    assert_eq!(m.height_at(0, 0), h);
}

#[test]
fn test_origin_chunk_heights_and_bedrock() {
    let m = world(BiomePreset::Greenery);
    let entry = m.ensure_chunk(ChunkCoord::new(0, 0));
    let voxels = entry.voxels();
    assert_eq!(voxels.heights().len(), 4096);
    assert!(
        voxels.heights().iter().all(|h| (0..=18).contains(h)),
        "height cache escaped [0, 18]"
    );
    for z in 0..64 {
        for x in 0..64 {
            assert_eq!(voxels.get(x, 0, z), VoxelKind::Stone, "no bedrock at ({x}, 0, {z})");
        }
    }
}

#[test]
fn test_digging_lowers_surface() {
    let m = world(BiomePreset::Greenery);
    m.ensure_chunk(ChunkCoord::new(0, 0));
    let h = m.get_surface_height_at(5, 5).expect("fresh column has a surface");
    assert!(m.remove_terrain_block_at_world(IVec3::new(5, h, 5)));

    let after = m.get_surface_height_at(5, 5);
    assert!(after < Some(h), "surface {after:?} should sit below {h}");
    assert!(!m.is_terrain_solid_at_world(IVec3::new(5, h, 5)));
}

#[test]
fn test_ensure_chunk_twice_is_unchanged() {
    let m = world(BiomePreset::Greenery);
    let coord = ChunkCoord::new(2, -3);
    let first = m.ensure_chunk(coord);
    let voxels = first.voxels().clone();
    let instances = first.instance_count();

    let second = m.ensure_chunk(coord);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(*second.voxels(), voxels);
    assert_eq!(second.instance_count(), instances, "batches were emitted twice");
    assert_eq!(m.loaded_count(), 1);
}

#[test]
fn test_overlay_wins_across_boundary_and_rebuilds() {
    let m = world(BiomePreset::Greenery);
    // Chunk (0, 0) spans x in [-32, 32); x = 31 is its east edge.
    let own = m.ensure_chunk(ChunkCoord::new(0, 0));
    let east = m.ensure_chunk(ChunkCoord::new(1, 0));
    let h = m.get_surface_height_at(31, 0).expect("surface");
    let cell = IVec3::new(31, h, 0);

    m.remove_terrain_block_at_world(cell);
    assert_eq!(own.rebuild_count(), 1);
    assert_eq!(east.rebuild_count(), 1);
    assert!(!m.is_terrain_solid_at_world(cell));

    assert!(m.rebuild_chunk(ChunkCoord::new(0, 0)));
    assert!(m.rebuild_chunk(ChunkCoord::new(1, 0)));
    assert!(!m.is_terrain_solid_at_world(cell));
    assert!(!terrain_positions(&own.batches()).contains(&cell));

    let facing = cell + IVec3::X;
    if m.is_terrain_solid_at_world(facing) {
        assert!(
            terrain_positions(&east.batches()).contains(&facing),
            "{facing} borders a dug cell and must be visible"
        );
    }
}

#[test]
fn test_foliage_survives_regeneration() {
    let seed_world = world(BiomePreset::Greenery);
    let coord = ChunkCoord::new(0, 0)
        .square_around(3)
        .into_iter()
        .find(|&c| !seed_world.ensure_chunk(c).foliage().is_empty())
        .expect("greenery grows trees somewhere near the origin");
    let entry = seed_world.ensure_chunk(coord);

    let (ox, oz) = seed_world.layout().chunk_origin(coord);
    let dig = IVec3::new(ox + 10, seed_world.height_at(ox + 10, oz + 10), oz + 10);
    seed_world.remove_terrain_block_at_world(dig);
    assert_eq!(entry.rebuild_count(), 1);

    let fresh = world(BiomePreset::Greenery);
    fresh.replay_removed_cells(seed_world.removed_cells());
    let regenerated = fresh.ensure_chunk(coord);
    assert_eq!(regenerated.foliage(), entry.foliage());
    assert_eq!(regenerated.batches(), entry.batches());
    assert!(
        entry
            .foliage()
            .collidable_cells()
            .all(|c| fresh.is_foliage_solid_at(c)),
        "collision set must contain every trunk"
    );
}

#[test]
fn test_visibility_culling() {
    let m = world(BiomePreset::Greenery);
    let coord = ChunkCoord::new(0, 0);
    let entry = m.ensure_chunk(coord);
    let positions: HashSet<IVec3> = terrain_positions(&entry.batches()).into_iter().collect();

    let offsets = [IVec3::X, -IVec3::X, IVec3::Y, -IVec3::Y, IVec3::Z, -IVec3::Z];
    for p in &positions {
        assert!(
            offsets.iter().any(|o| !m.is_terrain_solid_at_world(*p + *o)),
            "{p} is enclosed by solid cells but was emitted"
        );
    }

    // Every column's top solid cell has a non-solid cell above it.
    let layout = *m.layout();
    for z in 0..layout.size_z() {
        for x in 0..layout.size_x() {
            let top = entry.voxels().height(x, z);
            if top == 0 {
                continue;
            }
            let cell = layout.local_to_world(coord, x, top as usize, z);
            assert!(positions.contains(&cell), "surface cell {cell} was culled");
        }
    }
}

#[test]
fn test_desert_preset_pins_biome() {
    let m = world(BiomePreset::Desert);
    for x in (-200..200).step_by(37) {
        for z in (-200..200).step_by(41) {
            assert_eq!(m.biome_at(x, z), Biome::Desert, "({x}, {z})");
        }
    }
}

#[test]
fn test_streamer_radius_one_loads_three_by_three() {
    let m = Arc::new(world(BiomePreset::Greenery));
    let mut streamer = ChunkStreamer::new(Arc::clone(&m), 1, 2).expect("streamer");
    let entries = streamer.update_blocking(100.0, -40.0);
    // x = 100 falls in chunk 2, z = -40 in chunk -1.
    let center = ChunkCoord::new(2, -1);
    assert_eq!(streamer.center(), Some(center));
    assert_eq!(entries.len(), 9);
    for coord in center.square_around(1) {
        assert!(m.is_loaded(coord), "{coord:?} not loaded");
    }
    assert_eq!(streamer.update_blocking(100.0, -40.0).len(), 9);
}
