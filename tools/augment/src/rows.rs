//! Directory of images to dataset rows.

use anyhow::{Context, Result};
use barn_augment::{Field, Image, Row};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Reads a `{ "file_name": label }` JSON object
pub fn load_labels(path: &Path) -> Result<HashMap<String, f32>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read labels {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse labels {}", path.display()))
}

/// Lists images in `dir`, ordered by the leading record number of the file
/// name (`123_cam-image_array_.jpg`) and then by name
pub fn scan_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = fs::read_dir(dir)
        .with_context(|| format!("Failed to read input directory {}", dir.display()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && has_image_extension(p))
        .collect::<Vec<_>>();

    paths.sort_by_key(|p| {
        let name = file_name(p);
        (record_number(&name).unwrap_or(u64::MAX), name)
    });
    Ok(paths)
}

/// Loads every image as an RGB8 `[image, label]` row; unlabeled files get 0.0
pub fn load_rows(dir: &Path, labels: &HashMap<String, f32>) -> Result<Vec<Row>> {
    let paths = scan_images(dir)?;
    if paths.is_empty() {
        anyhow::bail!("No images found in {}", dir.display());
    }

    let mut rows = Vec::with_capacity(paths.len());
    for path in paths {
        let img = image::open(&path)
            .with_context(|| format!("Failed to load image {}", path.display()))?;
        let name = file_name(&path);
        let label = match labels.get(&name) {
            Some(&label) => label,
            None => {
                if !labels.is_empty() {
                    warn!("No label for {}, using 0.0", name);
                }
                0.0
            }
        };
        debug!(file = %name, label, "loaded row");

        rows.push(Row::new(vec![
            Field::Image(Image::from_rgb8(&img.to_rgb8())),
            Field::Scalar(label),
        ]));
    }
    Ok(rows)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn record_number(name: &str) -> Option<u64> {
    name.split(|c: char| !c.is_ascii_digit()).next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn write_image(dir: &Path, name: &str, value: u8) {
        RgbImage::from_pixel(4, 3, Rgb([value, value, value]))
            .save(dir.join(name))
            .unwrap();
    }

    #[test]
    fn test_record_number() {
        assert_eq!(record_number("123_cam-image_array_.jpg"), Some(123));
        assert_eq!(record_number("7.png"), Some(7));
        assert_eq!(record_number("cam.png"), None);
    }

    #[test]
    fn test_scan_orders_by_record() {
        let dir = tempfile::tempdir().unwrap();
        write_image(dir.path(), "10_cam.png", 1);
        write_image(dir.path(), "2_cam.png", 2);
        write_image(dir.path(), "extra.png", 3);
        fs::write(dir.path().join("notes.txt"), "skip me").unwrap();

        let names: Vec<String> = scan_images(dir.path())
            .unwrap()
            .iter()
            .map(|p| file_name(p))
            .collect();
        assert_eq!(names, vec!["2_cam.png", "10_cam.png", "extra.png"]);
    }

    #[test]
    fn test_load_rows_with_labels() {
        let dir = tempfile::tempdir().unwrap();
        write_image(dir.path(), "1_cam.png", 10);
        write_image(dir.path(), "2_cam.png", 20);

        let labels_path = dir.path().join("labels.json");
        fs::write(&labels_path, r#"{"1_cam.png": 0.5}"#).unwrap();
        let labels = load_labels(&labels_path).unwrap();

        let rows = load_rows(dir.path(), &labels).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][1], Field::Scalar(0.5));
        assert_eq!(rows[1][1], Field::Scalar(0.0));
        assert_eq!(rows[1][0], Field::Image(Image::filled_u8(4, 3, 3, 20).unwrap()));
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_rows(dir.path(), &HashMap::new()).is_err());
    }
}
