// Maze navigation core: kinematic points moving through a grid maze.
// The binary in main.rs hosts it behind a winit window.

pub mod engine;
