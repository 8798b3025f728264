//! Turning command-line model paths into a scene

use std::path::PathBuf;
use std::sync::Arc;

use log::{info, warn};
use prism_core::{Camera, Color, Mesh, Object, Scene, Transform};

use crate::error::AppError;
use crate::obj;

const PALETTE: [Color; 4] = [Color::RED, Color::GREEN, Color::BLUE, Color::WHITE];

/// Spacing between objects along X
const SPACING: f32 = 1.5;

/// Load every model into a row along X, or the two-cube demo when `models`
/// is empty.
///
/// A model that fails to load is logged and skipped. It is only an error when
/// models were given and none of them loaded.
pub fn build_scene(models: &[PathBuf]) -> Result<Scene, AppError> {
    let mut scene = Scene::new(Camera::new().at(0.0, 0.0, 4.0));

    if models.is_empty() {
        let red = Arc::new(Mesh::cube(1.0, Color::RED));
        let green = Arc::new(Mesh::cube(1.0, Color::GREEN));
        scene.add_object(Object::new("red cube", red));
        scene.add_object(
            Object::new("green cube", green).with_transform(Transform::new().at(SPACING, 0.0, 0.0)),
        );
        return Ok(scene);
    }

    for path in models {
        let slot = scene.objects().len();
        let mesh = match obj::load_obj(path, PALETTE[slot % PALETTE.len()]) {
            Ok(mesh) => mesh,
            Err(e) => {
                warn!("skipping {}: {}", path.display(), e);
                continue;
            }
        };
        info!(
            "Loaded {}: {} vertices, {} faces",
            path.display(),
            mesh.vertex_count(),
            mesh.face_count()
        );
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("model {slot}"));
        let transform = Transform::new().at(SPACING * slot as f32, 0.0, 0.0);
        scene.add_object(Object::new(name, Arc::new(mesh)).with_transform(transform));
    }

    if scene.objects().is_empty() {
        return Err(AppError::NoModels(models.len()));
    }
    Ok(scene)
}
