// ECS glue for the navigation tick
// The scene and the input snapshot live in the World as resources

use bevy_ecs::prelude::*;

use super::input::InputState;
use super::maze::MazeTopology;
use super::navigation::SceneState;

impl<M: MazeTopology + Send + Sync + 'static> Resource for SceneState<M> {}

/// Copy the current input into the scene and run one tick.
/// Schedule once per fixed step.
pub fn navigation_system<M: MazeTopology + Send + Sync + 'static>(
    input: Res<InputState>,
    mut scene: ResMut<SceneState<M>>,
) {
    scene.set_target_acceleration(input.target_acceleration());
    scene.tick();
}
