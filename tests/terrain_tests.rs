//! Terrain unit tests

#[cfg(test)]
mod tests {
    use gesture_world::error::SimulationError;
    use gesture_world::terrain::{
        actor_rest_height, align_terrain, AlignedTerrain, TerrainConfig, TerrainTiler,
    };
    use gesture_world::types::{Aabb, TileCoord, Vec3};
    use std::collections::HashSet;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    /// 10×10 footprint already sitting at z = 0.
    fn flat_tile(size: f32) -> AlignedTerrain {
        AlignedTerrain {
            z_offset: 0.0,
            bounds: Aabb::new(
                Vec3::new(-size / 2.0, -size / 2.0, -0.1),
                Vec3::new(size / 2.0, size / 2.0, 0.0),
            ),
        }
    }

    fn make_tiler(span: i32) -> TerrainTiler {
        let config = TerrainConfig {
            span,
            ..Default::default()
        };
        TerrainTiler::new(&flat_tile(10.0), &config).unwrap()
    }

    fn indices(tiler: &TerrainTiler) -> HashSet<TileCoord> {
        tiler.tiles().iter().map(|t| t.index).collect()
    }

    fn assert_grid_around(tiler: &TerrainTiler, center: TileCoord) {
        let expected: HashSet<_> = (-1..=1)
            .flat_map(|dx| (-1..=1).map(move |dy| center.offset(dx, dy)))
            .collect();
        assert_eq!(tiler.tiles().len(), 9);
        assert_eq!(indices(tiler), expected);
        assert_eq!(tiler.center(), center);
    }

    // -----------------------------------------------------------------------
    // Grid shape
    // -----------------------------------------------------------------------

    #[test]
    fn starts_with_nine_tiles_around_origin() {
        let tiler = make_tiler(1);
        assert_grid_around(&tiler, TileCoord::new(0, 0));
        assert_eq!(tiler.tiles().iter().filter(|t| t.origin).count(), 1);
    }

    #[test]
    fn tiles_positioned_on_grid() {
        let tiler = make_tiler(1);
        for tile in tiler.tiles() {
            assert!(approx(tile.position.x, tile.index.x as f32 * 10.0));
            assert!(approx(tile.position.y, tile.index.y as f32 * 10.0));
            assert!(approx(tile.position.z, 0.0));
        }
    }

    #[test]
    fn wider_span_grows_grid() {
        let tiler = make_tiler(2);
        assert_eq!(tiler.tiles().len(), 25);
        assert_eq!(tiler.span(), 2);
    }

    #[test]
    fn span_below_one_is_clamped() {
        let tiler = make_tiler(0);
        assert_eq!(tiler.span(), 1);
        assert_eq!(tiler.tiles().len(), 9);
    }

    #[test]
    fn overlap_scales_footprint() {
        let config = TerrainConfig {
            tile_overlap: 1.02,
            ..Default::default()
        };
        let tiler = TerrainTiler::new(&flat_tile(10.0), &config).unwrap();
        let (w, d) = tiler.tile_size();
        assert!(approx(w, 10.2));
        assert!(approx(d, 10.2));
    }

    #[test]
    fn overlap_below_one_is_ignored() {
        let config = TerrainConfig {
            tile_overlap: 0.5,
            ..Default::default()
        };
        let tiler = TerrainTiler::new(&flat_tile(10.0), &config).unwrap();
        assert_eq!(tiler.tile_size(), (10.0, 10.0));
    }

    #[test]
    fn degenerate_footprint_is_rejected() {
        let flat = AlignedTerrain {
            z_offset: 0.0,
            bounds: Aabb::new(Vec3::new(0.0, -5.0, 0.0), Vec3::new(0.0, 5.0, 1.0)),
        };
        let err = TerrainTiler::new(&flat, &TerrainConfig::default()).err();
        assert!(matches!(err, Some(SimulationError::DegenerateTerrain { .. })));
    }

    // -----------------------------------------------------------------------
    // Re-centring
    // -----------------------------------------------------------------------

    #[test]
    fn moving_within_tile_keeps_grid() {
        let mut tiler = make_tiler(1);
        assert!(tiler.update(Vec3::new(4.9, -4.9, 0.0)).is_none());
        assert_grid_around(&tiler, TileCoord::new(0, 0));
    }

    #[test]
    fn crossing_two_tiles_rebuilds_around_new_index() {
        let mut tiler = make_tiler(1);
        let rebuild = tiler.update(Vec3::new(16.0, 4.0, 0.0)).unwrap();

        assert_eq!(rebuild.from, TileCoord::new(0, 0));
        assert_eq!(rebuild.to, TileCoord::new(2, 0));
        assert_eq!(rebuild.removed, 8);
        assert_eq!(rebuild.spawned, 8);
        assert_grid_around(&tiler, TileCoord::new(2, 0));

        let origin = tiler.tiles().iter().find(|t| t.origin).unwrap();
        assert_eq!(origin.index, TileCoord::new(2, 0));
        assert!(approx(origin.position.x, 20.0));
    }

    #[test]
    fn tile_index_rounds_each_component() {
        let tiler = make_tiler(1);
        assert_eq!(tiler.tile_index(Vec3::new(16.0, 4.0, 0.0)), TileCoord::new(2, 0));
        assert_eq!(tiler.tile_index(Vec3::new(-16.0, -4.0, 3.0)), TileCoord::new(-2, 0));
        assert_eq!(tiler.tile_index(Vec3::new(14.9, 25.1, 0.0)), TileCoord::new(1, 3));
    }

    #[test]
    fn always_nine_tiles_after_arbitrary_walk() {
        let mut tiler = make_tiler(1);
        let mut position = Vec3::zero();
        let steps = [
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(7.5, -2.0, 0.0),
            Vec3::new(-30.0, 12.0, 0.0),
            Vec3::new(0.1, 0.1, 0.0),
            Vec3::new(55.0, -55.0, 0.0),
        ];
        for step in steps {
            position += step;
            tiler.update(position);
            let center = tiler.tile_index(position);
            assert_grid_around(&tiler, center);
        }
    }

    #[test]
    fn transforms_match_tiles() {
        let tiler = make_tiler(1);
        let transforms = tiler.transforms();
        assert_eq!(transforms.len(), 9);
        for (tile, transform) in tiler.tiles().iter().zip(&transforms) {
            assert_eq!(tile.index, transform.index);
            assert_eq!(tile.position, transform.position);
        }
    }

    // -----------------------------------------------------------------------
    // Alignment and placement
    // -----------------------------------------------------------------------

    #[test]
    fn alignment_flattens_and_drops_terrain() {
        let model = Aabb::new(Vec3::new(-5.0, -5.0, -1.0), Vec3::new(5.0, 5.0, 1.0));
        let aligned = align_terrain(&model, &TerrainConfig::default());

        // Flattened to [-0.7, 0.7], then lowest point moved to -0.8.
        assert!(approx(aligned.z_offset, -0.1));
        assert!(approx(aligned.bounds.min.z, -0.8));
        assert!(approx(aligned.bounds.max.z, 0.6));
        assert!(approx(aligned.bounds.width(), 10.0));
    }

    #[test]
    fn tiles_sit_at_terrain_offset() {
        let model = Aabb::new(Vec3::new(-5.0, -5.0, -1.0), Vec3::new(5.0, 5.0, 1.0));
        let config = TerrainConfig::default();
        let tiler = TerrainTiler::new(&align_terrain(&model, &config), &config).unwrap();
        assert!(tiler.tiles().iter().all(|t| approx(t.position.z, -0.1)));
    }

    #[test]
    fn actor_rests_on_terrain_top() {
        let actor = Aabb::new(Vec3::new(-0.5, -1.0, -0.1), Vec3::new(0.5, 1.0, 0.9));
        let terrain = Aabb::new(Vec3::new(-5.0, -5.0, -0.8), Vec3::new(5.0, 5.0, 1.0));
        assert!(approx(actor_rest_height(&actor, Some(&terrain), 0.05), 1.15));
    }

    #[test]
    fn actor_rests_on_ground_plane_without_terrain() {
        let actor = Aabb::new(Vec3::new(-0.5, -1.0, 0.0), Vec3::new(0.5, 1.0, 1.0));
        assert!(approx(actor_rest_height(&actor, None, 0.05), 0.05));
    }
}
