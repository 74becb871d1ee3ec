use anyhow::{Context, Result};
use std::path::Path;

use echomerge::store::remove_container;

/// Delete a container, recursively for directory-chunked stores.
pub fn run(file: &Path) -> Result<()> {
    remove_container(file).with_context(|| format!("removing {}", file.display()))?;
    println!("removed {}", file.display());
    Ok(())
}
