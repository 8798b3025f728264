//! Terminal front end for PrismCore: ASCII rasterizer, input and app loop

use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use log::{debug, info};
use prism_core::{Ray, Scene, SoftwareRenderer, Vec2};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod config;
pub mod error;
pub mod input;
pub mod models;
pub mod obj;
pub mod renderer;

pub use config::AppConfig;
pub use error::{AppError, ConfigError, ObjError};
pub use models::build_scene;
pub use renderer::AsciiRenderer;

use input::{Command, Pace};

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    scene: Scene,
    software: SoftwareRenderer,
    renderer: AsciiRenderer,
    config: AppConfig,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
    status: String,
}

impl TerminalApp {
    pub fn new(scene: Scene, config: AppConfig) -> Result<Self, AppError> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(scene, config, width as usize, height as usize))
    }

    /// Build the app for a grid of the given size without touching the terminal
    pub fn with_size(scene: Scene, config: AppConfig, width: usize, height: usize) -> Self {
        let software = SoftwareRenderer::new(config.lens(), config.lighting());
        Self {
            scene,
            software,
            renderer: AsciiRenderer::new(width, height),
            config,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            status: String::new(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> Result<(), AppError> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;
        info!("Entered terminal renderer");

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        info!("Left terminal renderer");

        result
    }

    fn main_loop(&mut self) -> Result<(), AppError> {
        let fps = self.config.display.fps.max(1);
        let target_frame_time = Duration::from_secs_f64(1.0 / f64::from(fps));
        let mut previous = Instant::now();

        while self.running {
            let frame_start = Instant::now();
            let dt = (frame_start - previous).as_secs_f32();
            previous = frame_start;

            // Drain every pending event so held keys do not lag behind
            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(&event);
            }

            self.update(dt);
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                debug!("{:.1} fps, {} triangles queued", self.fps, self.software.queue().len());
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: &Event) {
        if let Event::Resize(width, height) = *event {
            self.renderer.resize(width as usize, height as usize);
            return;
        }
        if let Some(command) = input::map_event(event) {
            self.apply(command);
        }
    }

    /// Width over height of the grid, corrected for non-square cells
    fn aspect(&self) -> f32 {
        let rows = self.renderer.height().max(1) as f32 * self.config.display.cell_aspect;
        self.renderer.width() as f32 / rows
    }

    pub fn apply(&mut self, command: Command) {
        let controls = &self.config.controls;
        match command {
            Command::Move {
                forward,
                right,
                up,
                pace,
            } => {
                let speed = controls.move_speed
                    * match pace {
                        Pace::Normal => 1.0,
                        Pace::Fast => controls.fast_multiplier,
                        Pace::Slow => controls.slow_multiplier,
                    };
                self.scene.camera_mut().move_by(forward, right, up, speed);
            }
            Command::Look { dx, dy } => {
                let (step, sensitivity) = (controls.look_step, controls.look_sensitivity);
                self.scene
                    .camera_mut()
                    .mouse_look(dx * step, dy * step, sensitivity);
            }
            Command::CycleRenderMode => {
                self.software.mode = self.software.mode.next();
                info!("Render mode: {:?}", self.software.mode);
            }
            Command::ToggleRays => {
                self.software.show_rays = !self.software.show_rays;
                info!("Debug rays {}", if self.software.show_rays { "on" } else { "off" });
            }
            Command::PickCenter => {
                let ray = Ray::from_camera(self.scene.camera());
                self.pick(ray);
            }
            Command::PickAt { column, row } => {
                let (width, height) = (self.renderer.width() as f32, self.renderer.height() as f32);
                let ndc = Vec2::new(
                    (f32::from(column) + 0.5) / width * 2.0 - 1.0,
                    1.0 - (f32::from(row) + 0.5) / height * 2.0,
                );
                let ray = Ray::through_screen(self.scene.camera(), &self.software.lens, self.aspect(), &ndc);
                self.pick(ray);
            }
            Command::Quit => self.running = false,
        }
    }

    fn pick(&mut self, ray: Ray) {
        self.status = match self.scene.pick(ray) {
            Some(hit) => {
                let name = &self.scene.objects()[hit.index].name;
                info!("Picked '{}' at distance {:.2}", name, hit.distance);
                format!("hit {} at {:.2}", name, hit.distance)
            }
            None => "no hit".to_string(),
        };
    }

    /// Demo spin: even objects turn about Y, odd ones about X
    pub fn update(&mut self, dt: f32) {
        let angle = self.config.animation.spin_degrees_per_second.to_radians() * dt;
        if angle == 0.0 {
            return;
        }
        for (i, object) in self.scene.objects_mut().iter_mut().enumerate() {
            if i % 2 == 0 {
                object.transform.rotate_y(-angle);
            } else {
                object.transform.rotate_x(angle);
            }
        }
    }

    fn render(&mut self) -> io::Result<()> {
        self.software.build_frame(&self.scene);

        self.renderer.clear();
        let aspect = self.aspect();
        let (width, height) = (self.renderer.width() as f32, self.renderer.height() as f32);
        self.software.draw(&mut self.renderer, width, height, aspect);

        // Output to terminal
        let mut stdout = stdout();
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(self.status_line()),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }

    /// Cut to the grid width in characters, not bytes
    fn status_line(&self) -> String {
        let mut line = format!(
            "PrismCore | FPS: {:.1} | {:?} | rays: {} | WASD/Space=Move Arrows=Look P=Mode L=Rays F/Click=Pick Q=Quit",
            self.fps,
            self.software.mode,
            self.scene.rays().len()
        );
        if !self.status.is_empty() {
            line.push_str(" | ");
            line.push_str(&self.status);
        }
        line.chars().take(self.renderer.width()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use prism_core::{Camera, Color, Mesh, Object, RenderMode, Transform, Vec3};
    use std::sync::Arc;

    fn app() -> TerminalApp {
        let mut scene = Scene::new(Camera::new().at(0.0, 0.0, 5.0));
        scene.add_object(
            Object::new("cube", Arc::new(Mesh::cube(2.0, Color::RED))).with_transform(Transform::new()),
        );
        TerminalApp::with_size(scene, AppConfig::default(), 80, 40)
    }

    #[test]
    fn test_move_uses_pace() {
        let mut app = app();
        let speed = app.config.controls.move_speed;
        let fast = speed * app.config.controls.fast_multiplier;

        app.apply(Command::Move { forward: 1.0, right: 0.0, up: 0.0, pace: Pace::Normal });
        assert_relative_eq!(app.scene.camera().position.z, 5.0 - speed, epsilon = 1e-5);

        app.apply(Command::Move { forward: 0.0, right: 0.0, up: 1.0, pace: Pace::Fast });
        assert_relative_eq!(app.scene.camera().position.y, fast, epsilon = 1e-5);
    }

    #[test]
    fn test_look_turns_camera() {
        let mut app = app();
        app.apply(Command::Look { dx: -1.0, dy: 0.0 });
        let c = &app.config.controls;
        assert_relative_eq!(
            app.scene.camera().look_yaw(),
            c.look_step * c.look_sensitivity,
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_toggles_and_quit() {
        let mut app = app();
        app.apply(Command::CycleRenderMode);
        assert_eq!(app.software.mode, RenderMode::Wireframe);
        app.apply(Command::ToggleRays);
        assert!(app.software.show_rays);
        app.apply(Command::Quit);
        assert!(!app.is_running());
    }

    #[test]
    fn test_pick_center_hits_cube() {
        let mut app = app();
        app.apply(Command::PickCenter);
        assert_eq!(app.status, "hit cube at 4.00");
        assert_eq!(app.scene().rays().len(), 1);
    }

    #[test]
    fn test_click_in_corner_misses() {
        let mut app = app();
        app.apply(Command::PickAt { column: 0, row: 0 });
        assert_eq!(app.status, "no hit");

        app.apply(Command::PickAt { column: 40, row: 20 });
        assert!(app.status.starts_with("hit cube"));
        assert_eq!(app.scene().rays().len(), 2);
    }

    #[test]
    fn test_spin_rotates_objects() {
        let mut app = app();
        app.update(1.0);
        let rotated = app.scene().objects()[0].transform.apply(&Vec3::x());
        assert!(rotated.z > 0.0);
        assert_relative_eq!(rotated.norm(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_status_line_fits_width() {
        let app = app();
        assert!(app.status_line().chars().count() <= 80);
    }

    #[test]
    fn test_status_line_cuts_multibyte_names() {
        let mut scene = Scene::new(Camera::new().at(0.0, 0.0, 5.0));
        scene.add_object(Object::new("é".repeat(40), Arc::new(Mesh::cube(2.0, Color::RED))));
        let mut app = TerminalApp::with_size(scene, AppConfig::default(), 80, 40);
        app.apply(Command::PickCenter);
        assert!(app.status.contains('é'));

        for width in 100..160 {
            app.renderer.resize(width, 40);
            assert!(app.status_line().chars().count() <= width);
        }
    }
}
