use std::collections::{BTreeSet, HashMap, VecDeque};
use std::time::{Duration, Instant};

use glam::Vec3;
use rand::RngCore;

use driftspace_common::ClusterCoord;
use driftspace_library::ResourceLibrary;
use driftspace_matter::{GenerateCtx, MatterFactory, ResourceArena};
use driftspace_render::Scene;
use driftspace_universe::Universe;

use crate::cluster::{Cluster, ClusterStatus, MatterInstance};

/// Streaming configuration: cluster extent, neighborhood radius, and build
/// pacing.
#[derive(Debug, Clone)]
pub struct GridConfig {
    /// Edge length of one cluster along the traversal axis.
    pub cluster_size: f32,
    /// Radius (in clusters) around the viewpoint that is kept active.
    pub render_radius: i64,
    /// Number of spawn-table draws per cluster population.
    pub matter_slots: usize,
    /// Minimum gap between dequeuing a build and executing it. Pacing only;
    /// it never reorders the FIFO queue.
    pub build_delay: Duration,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cluster_size: 1000.0,
            render_radius: 2,
            matter_slots: 4,
            build_delay: Duration::from_millis(250),
        }
    }
}

/// Errors from grid operations.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Non-finite viewpoint position, rejected before mutating grid state.
    #[error("non-finite viewpoint position along traversal axis: {0}")]
    InvalidCoordinate(f32),
    /// Cluster population requested before the universe reached `Ready`.
    #[error("universe is not ready; activate and apply it before populating")]
    UniverseNotReady,
}

/// Dispose/populate decision for one viewpoint move.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClustersStatus {
    pub to_dispose: BTreeSet<ClusterCoord>,
    pub to_populate: BTreeSet<ClusterCoord>,
}

/// Lifetime streaming counters for instrumentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridStats {
    pub clusters_built: usize,
    pub clusters_disposed: usize,
    pub matters_generated: usize,
    pub matters_failed: usize,
    /// Builds whose coordinate was disposed while the job was pending.
    pub builds_discarded: usize,
}

/// A dequeued build waiting out its pacing delay.
#[derive(Debug, Clone, Copy)]
struct PendingBuild {
    coord: ClusterCoord,
    ready_at: Instant,
}

/// The cluster streaming orchestrator.
///
/// Owns every cluster record and the build queue. The host drives it once per
/// display tick: on a cluster change it disposes and queues, otherwise it
/// drains at most one build.
pub struct ClusterGrid {
    config: GridConfig,
    clusters: HashMap<ClusterCoord, Cluster>,
    queue: VecDeque<ClusterCoord>,
    pending: Option<PendingBuild>,
    stats: GridStats,
}

impl ClusterGrid {
    pub fn new(config: GridConfig) -> Self {
        Self {
            config,
            clusters: HashMap::new(),
            queue: VecDeque::new(),
            pending: None,
            stats: GridStats::default(),
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn stats(&self) -> &GridStats {
        &self.stats
    }

    /// Number of builds waiting in the queue (excludes the pending slot).
    pub fn queue_depth(&self) -> usize {
        self.queue.len()
    }

    /// True while a dequeued build awaits execution.
    pub fn is_build_in_flight(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cluster_status(&self, coord: ClusterCoord) -> ClusterStatus {
        self.clusters
            .get(&coord)
            .map(|c| c.status)
            .unwrap_or(ClusterStatus::Unloaded)
    }

    /// Coordinates of all clusters currently `Active`.
    pub fn active_clusters(&self) -> BTreeSet<ClusterCoord> {
        self.clusters
            .values()
            .filter(|c| c.status == ClusterStatus::Active)
            .map(|c| c.coord)
            .collect()
    }

    /// Matter instances owned by a tracked cluster.
    pub fn matters_of(&self, coord: ClusterCoord) -> &[MatterInstance] {
        self.clusters
            .get(&coord)
            .map(|c| c.matters())
            .unwrap_or(&[])
    }

    /// Map a viewpoint position to its cluster coordinate. Pure; floor
    /// division of the traversal (z) coordinate by the cluster size.
    pub fn current_cluster(&self, position: Vec3) -> Result<ClusterCoord, GridError> {
        if !position.z.is_finite() {
            return Err(GridError::InvalidCoordinate(position.z));
        }
        Ok(ClusterCoord(
            (position.z / self.config.cluster_size).floor() as i64,
        ))
    }

    /// The neighborhood that should be active around a center, inclusive of
    /// the radius boundary.
    fn neighborhood(&self, center: ClusterCoord) -> BTreeSet<ClusterCoord> {
        (-self.config.render_radius..=self.config.render_radius)
            .map(|d| ClusterCoord(center.0 + d))
            .collect()
    }

    /// Decide which clusters to tear down and which to populate for a new
    /// center. Pure with respect to grid state.
    pub fn clusters_status(&self, center: ClusterCoord) -> ClustersStatus {
        let neighborhood = self.neighborhood(center);

        let to_dispose = self
            .clusters
            .keys()
            .filter(|coord| !neighborhood.contains(coord))
            .copied()
            .collect();

        let to_populate = neighborhood
            .into_iter()
            .filter(|coord| !self.clusters.contains_key(coord))
            .collect();

        ClustersStatus {
            to_dispose,
            to_populate,
        }
    }

    /// Tear down clusters and cancel their pending builds. Coordinates with
    /// no tracked cluster are skipped silently.
    pub fn dispose_clusters(
        &mut self,
        coords: &BTreeSet<ClusterCoord>,
        arena: &mut ResourceArena,
        scene: &mut dyn Scene,
    ) {
        let _span = tracing::info_span!("dispose_clusters", count = coords.len()).entered();

        // Cancellation: a build that was never started is dropped, not
        // executed. A dequeued-but-pending build is caught by the liveness
        // check in render_matters instead.
        self.queue.retain(|coord| !coords.contains(coord));

        for coord in coords {
            if let Some(mut cluster) = self.clusters.remove(coord) {
                cluster.dispose(arena, scene);
                self.stats.clusters_disposed += 1;
                tracing::debug!(%coord, "cluster disposed");
            }
        }
    }

    /// Create queued records and enqueue generation jobs. Idempotent for
    /// coordinates that are already tracked.
    pub fn build_matters(
        &mut self,
        coords: &BTreeSet<ClusterCoord>,
        universe: &Universe,
    ) -> Result<(), GridError> {
        if !universe.is_ready() {
            return Err(GridError::UniverseNotReady);
        }

        for coord in coords {
            if self.clusters.contains_key(coord) {
                continue;
            }
            self.clusters.insert(*coord, Cluster::queued(*coord));
            self.queue.push_back(*coord);
            tracing::debug!(%coord, "cluster queued");
        }
        Ok(())
    }

    /// Execute one generation job: sample the spawn table per slot, run the
    /// factory and generators, attach the results, and activate the cluster.
    ///
    /// If the coordinate was disposed while the job waited, the job is
    /// discarded without generating content.
    pub fn render_matters(
        &mut self,
        coord: ClusterCoord,
        universe: &Universe,
        library: &ResourceLibrary,
        arena: &mut ResourceArena,
        scene: &mut dyn Scene,
        rng: &mut dyn RngCore,
    ) -> Result<usize, GridError> {
        if !universe.is_ready() {
            return Err(GridError::UniverseNotReady);
        }

        let _span = tracing::info_span!("render_matters", coord = coord.0).entered();

        // Liveness check against the authoritative tracked set before
        // committing anything.
        match self.clusters.get_mut(&coord) {
            Some(cluster) if cluster.status == ClusterStatus::Queued => {
                cluster.status = ClusterStatus::Building;
            }
            Some(cluster) => {
                tracing::debug!(%coord, status = ?cluster.status, "build discarded");
                self.stats.builds_discarded += 1;
                return Ok(0);
            }
            None => {
                tracing::debug!(%coord, "build discarded; cluster no longer tracked");
                self.stats.builds_discarded += 1;
                return Ok(0);
            }
        }

        let origin = Vec3::new(
            0.0,
            0.0,
            (coord.0 as f32 + 0.5) * self.config.cluster_size,
        );

        let mut instances = Vec::with_capacity(self.config.matter_slots);
        for _ in 0..self.config.matter_slots {
            let Some(entry) = universe.spawn_table().sample(rng) else {
                tracing::warn!(%coord, "spawn table yielded no entry");
                continue;
            };

            let mut generator = match MatterFactory::create(entry.kind, entry.subkind) {
                Ok(generator) => generator,
                Err(error) => {
                    tracing::warn!(%coord, %error, "matter rejected by factory");
                    self.stats.matters_failed += 1;
                    continue;
                }
            };

            let mut ctx = GenerateCtx {
                config: universe.config(),
                library,
                arena: &mut *arena,
                origin,
                extent: self.config.cluster_size,
                rng: &mut *rng,
            };
            // A failed matter reduces the cluster; the others still complete.
            if let Err(error) = generator.generate(&mut ctx) {
                tracing::warn!(%coord, %error, "matter generation failed");
                self.stats.matters_failed += 1;
                continue;
            }
            generator.show(scene);
            instances.push(MatterInstance::new(generator));
        }

        let generated = instances.len();
        match self.clusters.get_mut(&coord) {
            Some(cluster) => {
                cluster.matters = instances;
                cluster.status = ClusterStatus::Active;
            }
            None => {
                // Nothing removes the record while a build runs, but if it
                // ever did the resources must not outlive their cluster.
                for mut instance in instances {
                    instance.dispose(arena, scene);
                }
                self.stats.builds_discarded += 1;
                return Ok(0);
            }
        }

        self.stats.clusters_built += 1;
        self.stats.matters_generated += generated;
        tracing::debug!(%coord, generated, "cluster active");
        Ok(generated)
    }

    /// Advance the single-slot drain: either arm the next queued build or,
    /// once its pacing delay has elapsed, execute it. At most one build is in
    /// flight at any time.
    pub fn drain(
        &mut self,
        now: Instant,
        universe: &Universe,
        library: &ResourceLibrary,
        arena: &mut ResourceArena,
        scene: &mut dyn Scene,
        rng: &mut dyn RngCore,
    ) -> Result<Option<(ClusterCoord, usize)>, GridError> {
        if let Some(pending) = self.pending {
            if now < pending.ready_at {
                return Ok(None);
            }
            self.pending = None;
            let generated =
                self.render_matters(pending.coord, universe, library, arena, scene, rng)?;
            return Ok(Some((pending.coord, generated)));
        }

        if let Some(coord) = self.queue.pop_front() {
            self.pending = Some(PendingBuild {
                coord,
                ready_at: now + self.config.build_delay,
            });
            tracing::trace!(%coord, "build armed");
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftspace_render::DebugScene;
    use driftspace_universe::UniverseSelection;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    struct Harness {
        grid: ClusterGrid,
        universe: Universe,
        library: ResourceLibrary,
        arena: ResourceArena,
        scene: DebugScene,
        rng: StdRng,
    }

    impl Harness {
        fn new(selection: UniverseSelection) -> Self {
            let mut rng = StdRng::seed_from_u64(77);
            let mut universe = Universe::new();
            universe.activate(selection, &mut rng);
            universe.apply().unwrap();
            Self {
                grid: ClusterGrid::new(GridConfig {
                    build_delay: Duration::ZERO,
                    ..GridConfig::default()
                }),
                universe,
                library: ResourceLibrary::preloaded(),
                arena: ResourceArena::new(),
                scene: DebugScene::new(),
                rng,
            }
        }

        fn move_to(&mut self, center: ClusterCoord) -> ClustersStatus {
            let status = self.grid.clusters_status(center);
            self.grid
                .dispose_clusters(&status.to_dispose, &mut self.arena, &mut self.scene);
            self.grid
                .build_matters(&status.to_populate, &self.universe)
                .unwrap();
            status
        }

        fn drain_one(&mut self) -> Option<(ClusterCoord, usize)> {
            self.grid
                .drain(
                    Instant::now(),
                    &self.universe,
                    &self.library,
                    &mut self.arena,
                    &mut self.scene,
                    &mut self.rng,
                )
                .unwrap()
        }

        fn drain_all(&mut self) {
            while self.grid.queue_depth() > 0 || self.grid.is_build_in_flight() {
                self.drain_one();
            }
        }
    }

    fn coords(range: std::ops::RangeInclusive<i64>) -> BTreeSet<ClusterCoord> {
        range.map(ClusterCoord).collect()
    }

    #[test]
    fn current_cluster_is_floor_division() {
        let grid = ClusterGrid::new(GridConfig::default());
        assert_eq!(
            grid.current_cluster(Vec3::new(0.0, 0.0, 0.0)).unwrap(),
            ClusterCoord(0)
        );
        assert_eq!(
            grid.current_cluster(Vec3::new(0.0, 0.0, 999.0)).unwrap(),
            ClusterCoord(0)
        );
        assert_eq!(
            grid.current_cluster(Vec3::new(0.0, 0.0, 1000.0)).unwrap(),
            ClusterCoord(1)
        );
        assert_eq!(
            grid.current_cluster(Vec3::new(0.0, 0.0, -1.0)).unwrap(),
            ClusterCoord(-1)
        );
    }

    #[test]
    fn non_finite_position_is_rejected() {
        let grid = ClusterGrid::new(GridConfig::default());
        assert!(matches!(
            grid.current_cluster(Vec3::new(0.0, 0.0, f32::NAN)),
            Err(GridError::InvalidCoordinate(_))
        ));
        assert!(matches!(
            grid.current_cluster(Vec3::new(0.0, 0.0, f32::INFINITY)),
            Err(GridError::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn end_to_end_neighborhood_follows_the_viewpoint() {
        let mut h = Harness::new(UniverseSelection::Default);

        // Start at cluster 0 with radius 2.
        let status = h.move_to(ClusterCoord(0));
        assert_eq!(status.to_populate, coords(-2..=2));
        assert!(status.to_dispose.is_empty());
        h.drain_all();
        assert_eq!(h.grid.active_clusters(), coords(-2..=2));

        // Jump to cluster 5.
        let status = h.move_to(ClusterCoord(5));
        assert_eq!(status.to_populate, coords(3..=7));
        assert_eq!(status.to_dispose, coords(-2..=2));
        h.drain_all();
        assert_eq!(h.grid.active_clusters(), coords(3..=7));
    }

    #[test]
    fn active_set_never_contains_stale_clusters() {
        let mut h = Harness::new(UniverseSelection::Default);
        for center in [0i64, 1, 3, 10, 9, -4] {
            h.move_to(ClusterCoord(center));
            h.drain_all();
            assert_eq!(
                h.grid.active_clusters(),
                coords(center - 2..=center + 2),
                "center {center}"
            );
        }
    }

    #[test]
    fn disposed_cluster_releases_every_resource() {
        let mut h = Harness::new(UniverseSelection::Default);
        h.move_to(ClusterCoord(0));
        h.drain_all();
        assert!(h.arena.live_geometries() > 0);
        assert!(h.scene.visible_count() > 0);

        h.grid
            .dispose_clusters(&coords(-2..=2), &mut h.arena, &mut h.scene);
        assert_eq!(h.arena.live_geometries(), 0);
        assert_eq!(h.arena.live_materials(), 0);
        assert_eq!(h.scene.visible_count(), 0);
        assert_eq!(h.grid.active_clusters(), BTreeSet::new());
    }

    #[test]
    fn dispose_is_idempotent_and_silent_on_untracked_coords() {
        let mut h = Harness::new(UniverseSelection::Default);
        h.move_to(ClusterCoord(0));
        h.drain_all();

        h.grid
            .dispose_clusters(&coords(-2..=2), &mut h.arena, &mut h.scene);
        // Second dispose of the same coords finds nothing tracked.
        h.grid
            .dispose_clusters(&coords(-2..=2), &mut h.arena, &mut h.scene);
        assert_eq!(h.grid.stats().clusters_disposed, 5);
    }

    #[test]
    fn build_requires_a_ready_universe() {
        let mut grid = ClusterGrid::new(GridConfig::default());
        let universe = Universe::new();
        assert!(matches!(
            grid.build_matters(&coords(0..=0), &universe),
            Err(GridError::UniverseNotReady)
        ));
    }

    #[test]
    fn enqueue_is_idempotent() {
        let mut h = Harness::new(UniverseSelection::Default);
        h.move_to(ClusterCoord(0));
        let depth = h.grid.queue_depth();
        // Re-requesting the same coordinates must not enqueue duplicates.
        h.grid
            .build_matters(&coords(-2..=2), &h.universe)
            .unwrap();
        assert_eq!(h.grid.queue_depth(), depth);
    }

    #[test]
    fn at_most_one_build_in_flight() {
        let mut h = Harness::new(UniverseSelection::Default);
        h.grid = ClusterGrid::new(GridConfig {
            build_delay: Duration::from_secs(3600),
            ..GridConfig::default()
        });
        h.move_to(ClusterCoord(0));
        assert_eq!(h.grid.queue_depth(), 5);

        // First drain arms one build; further drains must not arm another or
        // execute while the pacing delay holds.
        h.drain_one();
        assert!(h.grid.is_build_in_flight());
        assert_eq!(h.grid.queue_depth(), 4);
        for _ in 0..10 {
            assert!(h.drain_one().is_none());
        }
        assert_eq!(h.grid.queue_depth(), 4);
        assert_eq!(h.grid.stats().clusters_built, 0);
    }

    #[test]
    fn pacing_delay_gates_execution() {
        let mut h = Harness::new(UniverseSelection::Default);
        h.grid = ClusterGrid::new(GridConfig {
            build_delay: Duration::from_millis(50),
            ..GridConfig::default()
        });
        h.move_to(ClusterCoord(0));

        let t0 = Instant::now();
        h.grid
            .drain(
                t0,
                &h.universe,
                &h.library,
                &mut h.arena,
                &mut h.scene,
                &mut h.rng,
            )
            .unwrap();
        // Same instant: the gate has not elapsed.
        let executed = h
            .grid
            .drain(
                t0,
                &h.universe,
                &h.library,
                &mut h.arena,
                &mut h.scene,
                &mut h.rng,
            )
            .unwrap();
        assert!(executed.is_none());

        let executed = h
            .grid
            .drain(
                t0 + Duration::from_millis(51),
                &h.universe,
                &h.library,
                &mut h.arena,
                &mut h.scene,
                &mut h.rng,
            )
            .unwrap();
        assert!(executed.is_some());
    }

    #[test]
    fn builds_drain_in_fifo_order() {
        let mut h = Harness::new(UniverseSelection::Default);
        h.move_to(ClusterCoord(0));
        let mut order = Vec::new();
        while h.grid.queue_depth() > 0 || h.grid.is_build_in_flight() {
            if let Some((coord, _)) = h.drain_one() {
                order.push(coord.0);
            }
        }
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(order, sorted, "enqueue order is ascending for a fresh move");
        assert_eq!(order.len(), 5);
    }

    #[test]
    fn cancellation_discards_queued_builds() {
        let mut h = Harness::new(UniverseSelection::Default);
        h.move_to(ClusterCoord(0));
        // Jump away before anything was drained: every old build must be
        // cancelled outright.
        h.move_to(ClusterCoord(100));
        h.drain_all();

        assert_eq!(h.grid.active_clusters(), coords(98..=102));
        for coord in coords(-2..=2) {
            assert!(h.grid.matters_of(coord).is_empty());
        }
    }

    #[test]
    fn cancellation_discards_a_pending_build_via_liveness_check() {
        let mut h = Harness::new(UniverseSelection::Default);
        h.move_to(ClusterCoord(0));

        // Arm the first build, then dispose its coordinate while it waits.
        h.drain_one();
        assert!(h.grid.is_build_in_flight());
        let armed = ClusterCoord(-2);
        h.grid
            .dispose_clusters(&coords(-2..=-2), &mut h.arena, &mut h.scene);

        let result = h.drain_one();
        assert_eq!(result, Some((armed, 0)));
        assert_eq!(h.grid.stats().builds_discarded, 1);
        assert_eq!(h.grid.cluster_status(armed), ClusterStatus::Unloaded);
        assert!(h.grid.matters_of(armed).is_empty());
    }

    #[test]
    fn failed_matters_reduce_the_cluster_without_corrupting_the_grid() {
        let mut h = Harness::new(UniverseSelection::Default);
        // Empty library: every texture pick fails, so every matter fails.
        h.library = ResourceLibrary::new();
        h.move_to(ClusterCoord(0));
        h.drain_all();

        assert_eq!(h.grid.active_clusters(), coords(-2..=2));
        assert_eq!(h.grid.stats().matters_generated, 0);
        assert_eq!(h.grid.stats().matters_failed, 5 * 4);
        assert_eq!(h.arena.live_geometries(), 0);
    }

    #[test]
    fn bloom_universe_populates_clusters() {
        let mut h = Harness::new(UniverseSelection::Id(2));
        h.move_to(ClusterCoord(0));
        h.drain_all();
        assert_eq!(h.grid.active_clusters(), coords(-2..=2));
        assert!(h.grid.stats().matters_generated > 0);
    }
}
