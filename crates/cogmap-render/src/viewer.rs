//! Open a rendered image in the platform's default viewer

use std::path::Path;
use std::process::Command;

use crate::{RenderError, Result};

fn viewer_command(path: &Path) -> Command {
    if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(path);
        cmd
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]).arg(path);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(path);
        cmd
    }
}

/// Launch the viewer without waiting for it to exit
pub fn open_in_viewer(path: &Path) -> Result<()> {
    let mut cmd = viewer_command(path);
    tracing::debug!("Launching viewer: {:?}", cmd);

    cmd.spawn().map_err(|e| RenderError::Viewer {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(())
}
