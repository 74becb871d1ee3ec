use anyhow::{bail, Context, Result};
use log::warn;
use std::path::PathBuf;

use echomerge::combine::{combine_with_progress, CombineEvent};
use echomerge::schema::SonarModel;
use echomerge::store::{combined_output_path, remove_container, SaveFormat};

/// Combine converted containers into one output container.
pub fn run(
    model: &str,
    inputs: Vec<PathBuf>,
    output: Option<PathBuf>,
    remove_inputs: bool,
) -> Result<()> {
    let model: SonarModel = model
        .parse()
        .with_context(|| format!("unrecognized sonar model '{model}'"))?;
    let output = output.unwrap_or_else(|| combined_output_path(&inputs[0]));
    let Some(format) = SaveFormat::from_path(&output) else {
        bail!(
            "output path {} has no recognized container extension (.nc or .zarr)",
            output.display()
        );
    };

    combine_with_progress(model, &inputs, &output, format, &mut |event| {
        match event {
            CombineEvent::Started { inputs } => println!("combining {inputs} file(s)..."),
            CombineEvent::GroupWritten { group } => println!("  {group} group combined"),
            CombineEvent::Completed { output } => {
                println!("all files combined into {}", output.display())
            }
        }
    })
    .with_context(|| format!("combining into {}", output.display()))?;

    if remove_inputs {
        for input in &inputs {
            if let Err(e) = remove_container(input) {
                warn!("could not remove {}: {e}", input.display());
            }
        }
    }
    Ok(())
}
