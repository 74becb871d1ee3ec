use anyhow::{Context, Result};
use std::path::Path;

use echomerge::schema::GroupName;
use echomerge::store::ContainerReader;

/// Display the group layout of a container without reading field payloads.
pub fn run(file: &Path) -> Result<()> {
    let mut reader = ContainerReader::open(file)
        .with_context(|| format!("opening {}", file.display()))?;

    println!("Container: {}", file.display());
    println!("  format:      {}", reader.save_format());
    println!("  sonar model: {}", reader.sonar_model());
    println!();

    for group in GroupName::COMBINE_ORDER {
        if !reader.has_group(group)? {
            continue;
        }
        let meta = reader.read_group_meta(group)?;
        if group == GroupName::TopLevel
            && meta.axes.is_empty()
            && meta.fields.is_empty()
            && meta.attrs.is_empty()
        {
            continue;
        }
        println!("{group}:");
        for axis in &meta.axes {
            println!("  axis  {} ({})", axis.name, axis.len());
        }
        for field in &meta.fields {
            println!(
                "  field {} [{}] {} {:?}",
                field.name,
                field.dims.join(", "),
                field.dtype,
                field.shape
            );
        }
        if !meta.attrs.is_empty() {
            println!("  {} attribute(s)", meta.attrs.len());
        }
    }
    Ok(())
}
