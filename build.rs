use std::env;
use std::path::PathBuf;

use anyhow::Result;
use fs_extra::{copy_items, dir::CopyOptions};

/// Mirror assets/ into OUT_DIR so the binary finds textures and the temple
/// OBJ next to itself.
fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=assets");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    if !manifest_dir.join("assets").exists() {
        return Ok(());
    }

    let out_dir = env::var("OUT_DIR")?;
    let mut copy_options = CopyOptions::new();
    copy_options.overwrite = true;
    copy_items(&["assets/"], out_dir, &copy_options)?;

    Ok(())
}
