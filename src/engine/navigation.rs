// Navigation: a target driven by input through the maze, and a camera
// chasing it from above.
//
// One tick, in this order:
//   1. pending input acceleration -> target
//   2. integrate target
//   3. resolve target against the maze
//   4. steer camera toward the resolved target
//   5. integrate camera (no collision; it floats over the walls)
//
// Steering reads the target after step 3 so the camera never chases a
// position the target is not allowed to occupy.

use glam::DVec2;
use std::sync::Arc;

use super::collision::{CollisionResolver, Margin};
use super::kinematics::{CAMERA_RESISTANCE, KinematicObject, TARGET_RESISTANCE};
use super::maze::{MazeTopology, SideSet};
use super::steering::{PURSUIT_GAIN, SteeringController};

/// Where target and camera start: on the entrance door of cell (0, 0).
pub const ENTRANCE: DVec2 = DVec2::new(0.0, 0.5);

// ============================================================================
// PARAMETERS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationParams {
    pub margin: Margin,
    pub target_resistance: f64,
    pub camera_resistance: f64,
    pub pursuit_gain: f64,
}

impl Default for NavigationParams {
    fn default() -> Self {
        Self {
            margin: Margin::default(),
            target_resistance: TARGET_RESISTANCE,
            camera_resistance: CAMERA_RESISTANCE,
            pursuit_gain: PURSUIT_GAIN,
        }
    }
}

// ============================================================================
// SCENE STATE
// ============================================================================

/// Target, camera and the maze they move in. Owned by a single frame loop;
/// the maze is shared read-only.
pub struct SceneState<M> {
    target: KinematicObject,
    camera: KinematicObject,
    topology: Arc<M>,
    resolver: CollisionResolver,
    steering: SteeringController,
    target_resistance: f64,
    camera_resistance: f64,
    /// Written by input between ticks, applied at the start of the next one.
    pending_acceleration: DVec2,
    /// Boundaries the target touched after the last resolution.
    contact: SideSet,
    ticks: u64,
}

impl<M: MazeTopology> SceneState<M> {
    /// Target and camera both at rest at `start`.
    pub fn new(topology: Arc<M>, start: DVec2, params: NavigationParams) -> Self {
        Self {
            target: KinematicObject::at(start),
            camera: KinematicObject::at(start),
            topology,
            resolver: CollisionResolver::new(params.margin),
            steering: SteeringController::new(params.pursuit_gain),
            target_resistance: params.target_resistance,
            camera_resistance: params.camera_resistance,
            pending_acceleration: DVec2::ZERO,
            contact: SideSet::EMPTY,
            ticks: 0,
        }
    }

    /// Overwrite the acceleration the target picks up next tick.
    pub fn set_target_acceleration(&mut self, acceleration: DVec2) {
        self.pending_acceleration = acceleration;
    }

    pub fn set_target_acceleration_x(&mut self, ax: f64) {
        self.pending_acceleration.x = ax;
    }

    pub fn set_target_acceleration_y(&mut self, ay: f64) {
        self.pending_acceleration.y = ay;
    }

    pub fn tick(&mut self) {
        self.target.acceleration = self.pending_acceleration;
        self.target.integrate(self.target_resistance);
        self.contact = self.resolver.resolve(&mut self.target, self.topology.as_ref());

        self.steering.pursue(&mut self.camera, self.target.position);
        self.camera.integrate(self.camera_resistance);

        self.ticks += 1;
        log::trace!(
            "tick {}: target {} camera {} contact {:?}",
            self.ticks,
            self.target.position,
            self.camera.position,
            self.contact,
        );
    }

    pub fn target_position(&self) -> DVec2 {
        self.target.position
    }

    pub fn camera_position(&self) -> DVec2 {
        self.camera.position
    }

    pub fn target(&self) -> &KinematicObject {
        &self.target
    }

    pub fn camera(&self) -> &KinematicObject {
        &self.camera
    }

    pub fn contact(&self) -> SideSet {
        self.contact
    }

    pub fn topology(&self) -> &Arc<M> {
        &self.topology
    }

    pub fn margin(&self) -> Margin {
        self.resolver.margin
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::maze::{Maze, Side};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn open_field(width: u32, height: u32) -> Maze {
        let mut maze = Maze::new(width, height).unwrap();
        for y in 0..height {
            for x in 0..width {
                if x + 1 < width {
                    maze.open_door(x, y, Side::Right).unwrap();
                }
                if y + 1 < height {
                    maze.open_door(x, y, Side::Down).unwrap();
                }
            }
        }
        maze
    }

    fn scene_in(maze: Maze, start: DVec2) -> SceneState<Maze> {
        SceneState::new(Arc::new(maze), start, NavigationParams::default())
    }

    #[test]
    fn starts_at_rest() {
        let scene = scene_in(open_field(3, 3), ENTRANCE);
        assert_eq!(scene.target_position(), ENTRANCE);
        assert_eq!(scene.camera_position(), ENTRANCE);
        assert_eq!(scene.ticks(), 0);
    }

    #[test]
    fn camera_chases_target_one_tick_behind() {
        let maze = Arc::new(open_field(20, 1));
        let mut scene = SceneState::new(maze, DVec2::new(1.5, 0.5), NavigationParams::default());
        scene.set_target_acceleration(DVec2::new(0.2, 0.0));

        scene.tick();
        // Target: position moved by the old (zero) velocity.
        assert_eq!(scene.target_position(), DVec2::new(1.5, 0.5));
        assert!((scene.target().velocity.x - 0.04).abs() < 1e-12);
        // Camera sat on the target, so no pull yet.
        assert_eq!(scene.camera().acceleration, DVec2::ZERO);

        scene.tick();
        assert!((scene.target_position().x - 1.54).abs() < 1e-12);
        assert!((scene.camera().acceleration.x - 0.7 * 0.04).abs() < 1e-12);
        assert_eq!(scene.camera_position().x, 1.5);

        scene.tick();
        assert!(scene.camera_position().x > 1.5);
        assert!(scene.camera_position().x < scene.target_position().x);
    }

    #[test]
    fn pending_acceleration_waits_for_next_tick() {
        let mut scene = scene_in(open_field(4, 4), DVec2::new(2.5, 2.5));
        scene.set_target_acceleration_x(0.1);
        scene.set_target_acceleration_y(-0.1);
        assert_eq!(scene.target().acceleration, DVec2::ZERO);
        scene.tick();
        assert_eq!(scene.target().acceleration, DVec2::new(0.1, -0.1));
    }

    #[test]
    fn camera_steers_toward_resolved_target() {
        // Closed wall on the left of cell (1, 0): the target is pushed back
        // to 1.3 and the camera must aim there, not at the raw 1.1.
        let maze = Arc::new(Maze::new(3, 1).unwrap());
        let mut scene = SceneState::new(maze, DVec2::new(1.5, 0.5), NavigationParams::default());
        scene.target.velocity = DVec2::new(-0.4, 0.0);

        scene.tick();
        assert!((scene.target_position().x - 1.3).abs() < 1e-9);
        let expected = PURSUIT_GAIN * (scene.target_position().x - 1.5);
        assert!((scene.camera().acceleration.x - expected).abs() < 1e-12);
        assert_eq!(scene.contact(), SideSet::EMPTY);
    }

    #[test]
    fn target_settles_when_input_stops() {
        let mut scene = scene_in(open_field(10, 10), DVec2::new(5.5, 5.5));
        scene.set_target_acceleration(DVec2::new(0.1, 0.1));
        for _ in 0..5 {
            scene.tick();
        }
        scene.set_target_acceleration(DVec2::ZERO);
        for _ in 0..200 {
            scene.tick();
        }
        assert!(scene.target().velocity.length() < 1e-12);
        assert!((scene.camera_position() - scene.target_position()).length() < 1e-3);
    }

    #[test]
    fn random_walk_respects_bounds_and_walls() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut scene = scene_in(Maze::generate(8, 6, 0.1, &mut rng).unwrap(), ENTRANCE);
        let maze = Arc::clone(scene.topology());
        let m = scene.margin().get();

        for step in 0..20_000 {
            if step % 25 == 0 {
                let a = DVec2::new(rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0)) * 0.2;
                scene.set_target_acceleration(a);
            }
            scene.tick();

            let p = scene.target_position();
            assert!(p.x >= -0.5 && p.x <= 8.0 - 0.01, "x out of bounds at {p}");

            let (cx, cy) = (p.x.floor() as i64, p.y.floor() as i64);
            let (fx, fy) = (p.x - p.x.floor(), p.y - p.y.floor());
            if !maze.is_open(Side::Left, cx, cy) {
                assert!(fx >= m - 1e-9, "through left wall at {p}");
            }
            if !maze.is_open(Side::Right, cx, cy) {
                assert!(fx <= 1.0 - m + 1e-9, "through right wall at {p}");
            }
            if !maze.is_open(Side::Up, cx, cy) {
                assert!(fy >= m - 1e-9, "through up wall at {p}");
            }
            if !maze.is_open(Side::Down, cx, cy) {
                assert!(fy <= 1.0 - m + 1e-9, "through down wall at {p}");
            }
            assert!(p.is_finite() && scene.camera_position().is_finite());
        }
        assert_eq!(scene.ticks(), 20_000);
    }
}
