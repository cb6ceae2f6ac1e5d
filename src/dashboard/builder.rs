use crate::dashboard::payload::DashboardPayload;
use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::Path;

//global the client-side app reads the embedded payload from
pub const GLOBAL_DATA_VAR: &str = "__DIVIDEND_DASHBOARD__";

//writes the dashboard build directory: optional static assets plus the
//data payload as both plain json and an embeddable script
pub fn write_dashboard(
    payload: &DashboardPayload,
    static_dir: Option<&Path>,
    output_dir: &Path,
) -> Result<()> {
    if output_dir.exists() {
        fs::remove_dir_all(output_dir)
            .context(format!("Failed to clear output directory {:?}", output_dir))?;
    }
    fs::create_dir_all(output_dir)
        .context(format!("Failed to create output directory {:?}", output_dir))?;

    if let Some(static_dir) = static_dir {
        if !static_dir.exists() {
            anyhow::bail!("Static assets directory not found: {:?}", static_dir);
        }
        copy_dir(static_dir, output_dir)?;
        info!("dashboard assets copied to {:?}", output_dir);
    }

    let assets_dir = output_dir.join("assets");
    fs::create_dir_all(&assets_dir)?;

    let json = serde_json::to_string_pretty(payload)?;

    let data_path = assets_dir.join("data.json");
    fs::write(&data_path, format!("{}\n", json))
        .context(format!("Failed to write {:?}", data_path))?;
    info!("data file generated at {:?}", data_path);

    let script_path = assets_dir.join("data.js");
    fs::write(
        &script_path,
        format!("window.{} = {};\n", GLOBAL_DATA_VAR, json),
    )
    .context(format!("Failed to write {:?}", script_path))?;
    info!("embedded data script created at {:?}", script_path);

    Ok(())
}

fn copy_dir(source: &Path, destination: &Path) -> Result<()> {
    for entry in fs::read_dir(source).context(format!("Failed to read {:?}", source))? {
        let entry = entry?;
        let target = destination.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            fs::create_dir_all(&target)?;
            copy_dir(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)
                .context(format!("Failed to copy {:?}", entry.path()))?;
        }
    }
    Ok(())
}
