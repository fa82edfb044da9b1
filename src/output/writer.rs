//! Artifact export
//!
//! Moves the finished artifacts out of the scoped working directory into the
//! caller's export directory, keyed by the document id. Nothing is exported
//! until every pipeline stage has succeeded.

use std::path::{Path, PathBuf};

use tracing::info;
use walkdir::WalkDir;

use crate::error::PrepResult;
use crate::output::metadata::MetadataDocument;

/// Final locations of one run's exported artifacts
#[derive(Debug, Clone)]
pub struct ExportPaths {
    /// Concatenated fast-forward video
    pub video: PathBuf,
    /// Composited montage image
    pub montage: PathBuf,
    /// Metadata document (.avd)
    pub metadata: PathBuf,
}

/// Export the full artifact set for one run.
pub fn export_artifacts(
    export_dir: &Path,
    document: &MetadataDocument,
    video: &Path,
    montage: &Path,
) -> PrepResult<ExportPaths> {
    let video_dir = export_dir.join("video");
    std::fs::create_dir_all(&video_dir)?;

    let video_dest = video_dir.join("video.mp4");
    move_file(video, &video_dest)?;

    let montage_dest = export_dir.join("montage.jpg");
    move_file(montage, &montage_dest)?;

    let metadata_dest = write_metadata(export_dir, document)?;

    for entry in WalkDir::new(export_dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
    {
        info!("Exported {}", entry.path().display());
    }

    Ok(ExportPaths {
        video: video_dest,
        montage: montage_dest,
        metadata: metadata_dest,
    })
}

/// Write the metadata document as `<id>.avd` inside `export_dir`.
pub fn write_metadata(export_dir: &Path, document: &MetadataDocument) -> PrepResult<PathBuf> {
    std::fs::create_dir_all(export_dir)?;
    let path = export_dir.join(format!("{}.avd", document.id));
    std::fs::write(&path, document.to_json()?)?;
    info!("Wrote metadata: {}", path.display());
    Ok(path)
}

/// Move a file, falling back to copy+remove when the rename crosses
/// filesystems (the working directory usually lives on tmpfs).
fn move_file(src: &Path, dest: &Path) -> PrepResult<()> {
    if std::fs::rename(src, dest).is_err() {
        std::fs::copy(src, dest)?;
        std::fs::remove_file(src)?;
    }
    Ok(())
}
