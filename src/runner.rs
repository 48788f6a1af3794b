use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use tracing::{debug, info, instrument};

use crate::{
    config::Config,
    errors::{BgRemoveError, Result},
    traits::Segmenter,
};

/// Reads the source image, removes its background and writes the result.
pub struct Runner<S: Segmenter> {
    segmenter: S,
    config: Config,
}

impl<S: Segmenter> Runner<S> {
    pub const fn new(segmenter: S, config: Config) -> Self {
        Self { segmenter, config }
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub const fn segmenter(&self) -> &S {
        &self.segmenter
    }

    /// Runs the whole check, read, transform, write sequence once.
    ///
    /// A missing source aborts before anything else is touched, so no
    /// destination file is created. A failed write may leave a partial
    /// destination behind; it is not cleaned up.
    #[instrument(skip(self), fields(source = %self.config.source_path.display()))]
    pub fn execute(&self) -> Result<PathBuf> {
        let source = &self.config.source_path;
        let destination = &self.config.destination_path;

        if !source.exists() {
            return Err(BgRemoveError::MissingInput {
                path: source.clone(),
            });
        }

        let input = fs::read(source).map_err(|e| BgRemoveError::FileSystem {
            path: source.clone(),
            operation: "read source image".to_string(),
            source: e,
        })?;
        debug!(bytes = input.len(), "read source image");

        let output = self.segmenter.remove(&input)?;
        debug!(bytes = output.len(), "background removed");

        write_output(destination, &output)?;
        info!(destination = %destination.display(), "wrote output image");

        Ok(destination.clone())
    }
}

/// Line printed once the destination has been written.
pub fn success_message(path: &Path) -> String {
    format!(
        "Success: Background removed and saved to {}",
        path.display()
    )
}

/// Line printed when the source image does not exist.
pub fn missing_input_message(path: &Path) -> String {
    format!("Error: {} not found", path.display())
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    let fs_error = |operation: &str, source| BgRemoveError::FileSystem {
        path: path.to_path_buf(),
        operation: operation.to_string(),
        source,
    };

    let mut file = File::create(path).map_err(|e| fs_error("create output file", e))?;
    file.write_all(bytes)
        .map_err(|e| fs_error("write output file", e))?;
    file.flush().map_err(|e| fs_error("flush output file", e))
}
