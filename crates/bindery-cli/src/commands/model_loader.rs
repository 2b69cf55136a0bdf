use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use bindery_core::Model;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read '{}': {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to read stdin: {0}")]
    Stdin(io::Error),

    #[error("model cannot be empty")]
    Empty,

    #[error(transparent)]
    Model(#[from] bindery_core::Error),
}

/// Read and validate a model file; `-` reads stdin.
pub fn load_model(path: &Path) -> Result<Model, LoadError> {
    let json = if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(LoadError::Stdin)?;
        buf
    } else {
        fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?
    };

    if json.trim().is_empty() {
        return Err(LoadError::Empty);
    }

    let model = Model::from_json(&json)?;
    tracing::debug!(
        package = %model.package,
        classes = model.classes.len(),
        functions = model.functions.len(),
        templates = model.templates.len(),
        "model loaded"
    );
    Ok(model)
}

/// Load or exit with the error on stderr.
pub fn load_model_or_exit(path: &Path) -> Model {
    load_model(path).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(1);
    })
}
