use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

pub(crate) fn prepare_output_destination(output_path: &Path, force: bool) -> Result<()> {
    if output_path.exists() && !force {
        bail!(
            "Output file {} already exists. Use --force to overwrite.",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory {}", parent.display())
            })?;
        }
    }

    Ok(())
}

/// `name.mp4` → `name.partial.mp4`, the file ffmpeg actually writes.
pub(crate) fn partial_path(output_path: &Path) -> PathBuf {
    let stem = output_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = output_path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mp4".to_string());
    output_path.with_file_name(format!("{stem}.partial.{extension}"))
}

/// Move a completed partial file over the final output.
pub(crate) fn finalize_output(partial: &Path, output_path: &Path) -> Result<()> {
    if output_path.exists() {
        fs::remove_file(output_path).with_context(|| {
            format!(
                "Failed to remove existing output file {} before overwrite",
                output_path.display()
            )
        })?;
    }
    fs::rename(partial, output_path).with_context(|| {
        format!(
            "Failed to move {} to {}",
            partial.display(),
            output_path.display()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_sits_next_to_output() {
        assert_eq!(
            partial_path(Path::new("out/segment-2.mp4")),
            PathBuf::from("out/segment-2.partial.mp4")
        );
    }

    #[test]
    fn existing_output_needs_force() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("workout.mp4");
        fs::write(&output, b"old").unwrap();

        assert!(prepare_output_destination(&output, false).is_err());
        assert!(prepare_output_destination(&output, true).is_ok());
        assert_eq!(fs::read(&output).unwrap(), b"old");
    }

    #[test]
    fn finalize_replaces_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("nested/workout.mp4");
        prepare_output_destination(&output, false).unwrap();
        fs::write(&output, b"old").unwrap();
        let partial = partial_path(&output);
        fs::write(&partial, b"new").unwrap();

        finalize_output(&partial, &output).unwrap();
        assert_eq!(fs::read(&output).unwrap(), b"new");
        assert!(!partial.exists());
    }
}
