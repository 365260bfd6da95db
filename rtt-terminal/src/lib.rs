/// Terminal viewer for the RTT scene core
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use nalgebra::Vector3;
use std::io::{stdout, Write};
use std::time::{Duration, Instant};

pub mod camera;
pub mod config;
pub mod error;
pub mod logging;
pub mod renderer;
pub mod scene;

pub use camera::{Camera, ProjectionMode};
pub use config::ViewerConfig;
pub use error::ViewerError;
pub use renderer::{AsciiRenderer, AsciiShader};
pub use scene::Scene;

/// Degrees the camera orbits per key press
const CAMERA_STEP: f32 = 5.0;

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    scene: Scene,
    camera: Camera,
    renderer: AsciiRenderer,
    general_shader: AsciiShader,
    lamp_shader: AsciiShader,
    axis_shader: AsciiShader,
    target_fps: u32,
    running: bool,
    started: Instant,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(scene: Scene, config: &ViewerConfig) -> Result<Self, ViewerError> {
        let (width, height) = terminal::size()?;

        let mut camera = Camera::new(width as u32, height as u32);
        camera.mode = config.projection;
        camera.scale(config.camera_zoom);

        Ok(Self {
            scene,
            camera,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            general_shader: AsciiShader::lit("general"),
            lamp_shader: AsciiShader::unlit("lamp"),
            axis_shader: AsciiShader::unlit("axis"),
            target_fps: config.target_fps,
            running: true,
            started: Instant::now(),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> Result<(), ViewerError> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> Result<(), ViewerError> {
        let target_frame_time = Duration::from_millis(1000 / u64::from(self.target_fps.max(1)));
        log::info!("entering render loop at {} fps", self.target_fps);

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            if event::poll(Duration::from_millis(0))? {
                self.handle_input()?;
            }

            self.scene.animate(self.started.elapsed().as_secs_f32());

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
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        log::info!("render loop stopped");
        Ok(())
    }

    fn handle_input(&mut self) -> Result<(), ViewerError> {
        match event::read()? {
            Event::Key(KeyEvent { code, .. }) => match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.running = false;
                }
                KeyCode::Char('a') | KeyCode::Left => {
                    self.camera.rotate(-CAMERA_STEP, &Vector3::z());
                }
                KeyCode::Char('d') | KeyCode::Right => {
                    self.camera.rotate(CAMERA_STEP, &Vector3::z());
                }
                _ => {}
            },
            Event::Resize(width, height) => {
                log::debug!("terminal resized to {}x{}", width, height);
                self.renderer = AsciiRenderer::new(width as usize, height as usize);
                self.camera.resize(width as u32, height as u32);
            }
            _ => {}
        }
        Ok(())
    }

    fn render(&mut self) -> Result<(), ViewerError> {
        self.renderer.clear();

        {
            let mut target = self.renderer.target(&self.general_shader);
            self.scene
                .draw_shapes(&self.camera, &self.general_shader, &mut target);
        }
        Scene::draw_axes(&self.camera, &self.axis_shader, &mut self.renderer);
        {
            let mut target = self.renderer.target(&self.lamp_shader);
            self.scene
                .draw_light(&self.camera, &self.lamp_shader, &mut target);
        }

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Ray the tracer | FPS: {:.1} | Controls: A/D=Orbit camera Q=Quit",
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
