use super::types::{CompetitionData, SNAPSHOT_VERSION};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Get the default competition data path (~/.config/tip-ladder/competition.json)
pub fn get_data_path() -> PathBuf {
    crate::config::get_config_dir().join("competition.json")
}

/// Load a competition snapshot from a JSON file
///
/// Unlike config, a missing data file is an error: there is nothing to score.
pub fn load_competition(path: &Path) -> Result<CompetitionData> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open competition data at {}", path.display()))?;

    let data: CompetitionData = serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse competition data in {}", path.display()))?;

    if data.version != SNAPSHOT_VERSION {
        anyhow::bail!("Unsupported competition data version: {}", data.version);
    }

    Ok(data)
}

/// Save a competition snapshot to a JSON file atomically
///
/// The file is never left half-written. Parent directories are created.
pub fn save_competition(path: &Path, data: &CompetitionData) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, data).context("Failed to serialize competition data")?;

    file.commit().context("Failed to save competition data")?;

    Ok(())
}
