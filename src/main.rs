// Maze explorer host: a winit window whose keyboard drives the target
// through a generated maze while the camera follows.
// Drawing belongs to a renderer outside this crate; the window title
// carries the per-frame position snapshot instead.
// Gamepad input is not wired: winit has no gamepad events, so the stick
// axes of `InputState` stay centred and only the keyboard drives the target.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use bevy_ecs::prelude::*;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use winit::{
    event::{ElementState, Event as WinitEvent, KeyEvent, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use stereo_maze::engine::{Config, ENTRANCE, InputState, Maze, SceneState, navigation_system};

/// Catch-up cap so a stalled frame doesn't trigger a burst of ticks.
const MAX_TICKS_PER_FRAME: u32 = 8;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Config::parse();
    config.validate().context("invalid configuration")?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let size = config.maze_size;
    let maze = Maze::generate(size.width, size.height, config.shortcut_ratio, &mut rng)?;
    let scene = SceneState::new(Arc::new(maze), ENTRANCE, config.navigation_params());
    log::info!(
        "maze {size} (seed {:?}, shortcut ratio {}), margin {}",
        config.seed,
        config.shortcut_ratio,
        scene.margin().get(),
    );
    log::debug!("\n{}", scene.topology());

    let mut world = World::new();
    world.insert_resource(scene);
    world.insert_resource(InputState::new(config.acceleration));
    let mut schedule = Schedule::default();
    schedule.add_systems(navigation_system::<Maze>);

    let event_loop = EventLoop::new()?;
    let window_attributes = Window::default_attributes()
        .with_title("Stereo Maze")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
    let window = Arc::new(event_loop.create_window(window_attributes)?);

    let tick_interval = config.tick_interval();
    let mut next_tick = Instant::now() + tick_interval;

    event_loop.run(move |event, control_flow| {
        match event {
            WinitEvent::WindowEvent {
                ref event,
                window_id,
            } if window_id == window.id() => match event {
                WindowEvent::CloseRequested
                | WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            state: ElementState::Pressed,
                            physical_key: PhysicalKey::Code(KeyCode::Escape),
                            ..
                        },
                    ..
                } => control_flow.exit(),
                WindowEvent::RedrawRequested => {
                    let scene = world.resource::<SceneState<Maze>>();
                    let (t, c) = (scene.target_position(), scene.camera_position());
                    window.set_title(&format!(
                        "Stereo Maze | target ({:.2}, {:.2}) | camera ({:.2}, {:.2})",
                        t.x, t.y, c.x, c.y
                    ));
                }
                other => world.resource_mut::<InputState>().process_event(other),
            },
            WinitEvent::AboutToWait => {
                let now = Instant::now();
                let mut ran = 0;
                while now >= next_tick && ran < MAX_TICKS_PER_FRAME {
                    schedule.run(&mut world);
                    next_tick += tick_interval;
                    ran += 1;
                }
                if now >= next_tick {
                    let behind = (now - next_tick).as_secs_f64() / tick_interval.as_secs_f64();
                    log::warn!("{behind:.0} ticks behind schedule, skipping ahead");
                    next_tick = now + tick_interval;
                }
                if ran > 0 {
                    window.request_redraw();
                }
                control_flow.set_control_flow(ControlFlow::WaitUntil(next_tick));
            }
            _ => {}
        }
    })?;

    Ok(())
}
