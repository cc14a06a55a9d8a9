//! Writing the export documents to disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::config::SpmConfig;
use crate::error::{EngineError, EngineResult};

use super::document::SpmDataDocument;

/// Directory the front-end serves its data files from.
pub const DEFAULT_OUTPUT_DIR: &str = "web/public/data";

/// Base thresholds by year.
pub const BASE_THRESHOLDS_FILE: &str = "base_thresholds.json";
/// GEOADJ by state.
pub const STATE_GEOADJ_FILE: &str = "state_geoadj.json";
/// Cost-level presets.
pub const COST_LEVELS_FILE: &str = "cost_levels.json";
/// Everything above plus methodology and forecast parameters.
pub const SPM_CONFIG_FILE: &str = "spm_config.json";

/// Writes every data file into `output_dir`, creating it if needed.
///
/// Files are pretty-printed with two-space indentation. Returns the paths
/// written, in the order above.
///
/// # Errors
///
/// Returns `ExportError` if the directory or a file cannot be written.
///
/// # Example
///
/// ```no_run
/// use spm_threshold::config::ConfigLoader;
/// use spm_threshold::export::write_data_files;
///
/// let loader = ConfigLoader::embedded()?;
/// let written = write_data_files("web/public/data", loader.config())?;
/// assert_eq!(written.len(), 4);
/// # Ok::<(), spm_threshold::error::EngineError>(())
/// ```
pub fn write_data_files<P: AsRef<Path>>(
    output_dir: P,
    config: &SpmConfig,
) -> EngineResult<Vec<PathBuf>> {
    let output_dir = output_dir.as_ref();
    fs::create_dir_all(output_dir).map_err(|e| EngineError::ExportError {
        path: output_dir.display().to_string(),
        message: e.to_string(),
    })?;

    let document = SpmDataDocument::from_config(config)?;

    let written = vec![
        write_json(output_dir, BASE_THRESHOLDS_FILE, &document.base_thresholds)?,
        write_json(output_dir, STATE_GEOADJ_FILE, &document.states)?,
        write_json(output_dir, COST_LEVELS_FILE, &document.cost_levels)?,
        write_json(output_dir, SPM_CONFIG_FILE, &document)?,
    ];

    info!(
        output_dir = %output_dir.display(),
        files = written.len(),
        "Generated data files"
    );

    Ok(written)
}

fn write_json<T: Serialize>(dir: &Path, name: &str, value: &T) -> EngineResult<PathBuf> {
    let path = dir.join(name);
    let export_error = |message: String| EngineError::ExportError {
        path: path.display().to_string(),
        message,
    };

    let mut content = serde_json::to_string_pretty(value).map_err(|e| export_error(e.to_string()))?;
    content.push('\n');
    fs::write(&path, content).map_err(|e| export_error(e.to_string()))?;

    Ok(path)
}
