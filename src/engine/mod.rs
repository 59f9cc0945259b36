// Engine module - maze navigation core plus the ambient pieces around it
// Per-tick code (kinematics, steering, collision, navigation) never fails;
// errors only come out of setup (maze construction, config)

pub mod collision;
pub mod config;
pub mod error;
pub mod input;
pub mod kinematics;
pub mod maze;
pub mod navigation;
pub mod steering;
pub mod systems;

// Re-export commonly used items
pub use collision::{CollisionResolver, Margin};
pub use config::{Config, MazeSize};
pub use error::{ConfigError, MazeError};
pub use input::InputState;
pub use kinematics::KinematicObject;
pub use maze::{Corner, Maze, MazeTopology, Side, SideSet};
pub use navigation::{ENTRANCE, NavigationParams, SceneState};
pub use steering::SteeringController;
pub use systems::navigation_system;
