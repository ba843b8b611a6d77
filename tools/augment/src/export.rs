//! Writing generated batches to disk.

use anyhow::{Context, Result};
use barn_augment::{Batch, Field};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Writes each row's image as `aug_NNNNN.png` and the labels as
/// `labels.json`. Returns the number of rows written.
pub fn write_batch(batch: &Batch, output_dir: &Path) -> Result<usize> {
    fs::create_dir_all(output_dir).context("Failed to create output directory")?;

    let pb = ProgressBar::new(batch.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .context("Invalid progress bar template")?
            .progress_chars("=>-"),
    );

    let mut labels = BTreeMap::new();
    for i in 0..batch.len() {
        let row = batch
            .row(i)
            .with_context(|| format!("Row {} missing from batch", i))?;
        let name = format!("aug_{:05}.png", i);

        if let Some(image) = row.get(0).and_then(Field::as_image) {
            let path = output_dir.join(&name);
            image
                .to_dynamic()?
                .save(&path)
                .with_context(|| format!("Failed to save {}", path.display()))?;
        }
        if let Some(label) = row.get(1).and_then(Field::as_scalar) {
            labels.insert(name, label);
        }
        pb.inc(1);
    }
    pb.finish_with_message("Done");

    let labels_path = output_dir.join("labels.json");
    fs::write(&labels_path, serde_json::to_string_pretty(&labels)?)
        .with_context(|| format!("Failed to write {}", labels_path.display()))?;

    Ok(batch.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use barn_augment::{Image, Row};
    use std::collections::HashMap;

    #[test]
    fn test_write_batch() {
        let dir = tempfile::tempdir().unwrap();
        let row = |fill, label| {
            Row::new(vec![
                Field::Image(Image::filled_u8(5, 4, 3, fill).unwrap()),
                Field::Scalar(label),
            ])
        };
        let rows = vec![row(7, 0.25), row(9, -0.5)];
        let batch = Batch::stack(rows).unwrap();

        let written = write_batch(&batch, dir.path()).unwrap();
        assert_eq!(written, 2);

        let second = image::open(dir.path().join("aug_00001.png")).unwrap().to_rgb8();
        assert_eq!(second.dimensions(), (5, 4));
        assert_eq!(second.get_pixel(0, 0).0, [9, 9, 9]);

        let labels: HashMap<String, f32> =
            serde_json::from_str(&fs::read_to_string(dir.path().join("labels.json")).unwrap())
                .unwrap();
        assert_eq!(labels.get("aug_00000.png"), Some(&0.25));
        assert_eq!(labels.get("aug_00001.png"), Some(&-0.5));
    }
}
