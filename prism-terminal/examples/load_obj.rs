//! Example: Load an OBJ file, pick it from the camera and render it in the terminal
//!
//! Usage: cargo run --example load_obj -- path/to/file.obj

use std::env;
use std::path::Path;
use std::sync::Arc;

use prism_core::{Camera, Color, Mesh, Object, Ray, Scene};
use prism_terminal::{obj, AppConfig, AppError, TerminalApp};

fn main() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let mesh = match args.get(1) {
        Some(path) => obj::load_obj(Path::new(path), Color::GREEN)?,
        None => {
            eprintln!("Usage: {} <obj-file>", args[0]);
            eprintln!("\nNo OBJ file provided, using default cube...");
            Mesh::cube(1.0, Color::GREEN)
        }
    };

    println!("Loaded {} vertices, {} faces", mesh.vertex_count(), mesh.face_count());

    let mut scene = Scene::new(Camera::new().at(0.0, 0.0, 4.0));
    scene.add_object(Object::new("model", Arc::new(mesh)));

    match scene.pick(Ray::from_camera(scene.camera())) {
        Some(hit) => println!("Camera ray hits the model at distance {:.3}", hit.distance),
        None => println!("Camera ray misses the model"),
    }

    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(scene, AppConfig::default())?;
    app.run()
}
