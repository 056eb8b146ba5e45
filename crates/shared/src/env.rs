use std::path::PathBuf;

use tracing::{debug, trace, warn};

use crate::error::CommonError;

fn traverse_up_for_env_file(file_name: &str) -> Option<PathBuf> {
    let relative_workspace_root = PathBuf::from("./../../").join(file_name);

    if PathBuf::from(file_name).exists() {
        trace!("Loading environment variables from: {file_name}");
        Some(PathBuf::from(file_name))
    } else if relative_workspace_root.exists() {
        trace!(
            "Loading environment variables from: {}",
            relative_workspace_root.display()
        );
        Some(relative_workspace_root)
    } else {
        trace!(
            "No environment variables file found with name: {:?} in current directory or workspace root",
            file_name
        );
        None
    }
}

fn load_optional_env_file(file_name: Option<PathBuf>) {
    match file_name {
        Some(path) => match dotenv::from_filename(&path) {
            Ok(_) => debug!("Loaded environment variables from: {}", path.display()),
            Err(e) => warn!(
                "Failed to load environment variables from {}: {e}",
                path.display()
            ),
        },
        None => {
            debug!("No environment variables file found in current directory or workspace root");
        }
    };
}

/// Load `.env` and `.env.secrets` from the current directory or the
/// workspace root, if present. Existing variables are never overridden.
pub fn load_optional_env_files() {
    let env_path = traverse_up_for_env_file(".env");
    let env_secrets_path = traverse_up_for_env_file(".env.secrets");

    load_optional_env_file(env_path);
    load_optional_env_file(env_secrets_path);
}

pub fn configure_env() -> Result<(), anyhow::Error> {
    load_optional_env_files();
    Ok(())
}

/// Read a required environment variable.
pub fn required_var(key: &str) -> Result<String, CommonError> {
    std::env::var(key).map_err(|e| CommonError::InvalidRequest {
        msg: format!("Missing required environment variable '{key}'"),
        source: Some(e.into()),
    })
}

/// Read an optional environment variable, treating blank values as unset.
pub fn optional_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
}
