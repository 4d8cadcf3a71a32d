use std::env;
use std::path::PathBuf;

use anyhow::*;
use fs_extra::copy_items;
use fs_extra::dir::CopyOptions;

/// Mirrors the `assets/` directory (portal.glb, baked.jpg) into OUT_DIR so
/// the binary can be run from the target directory as well as the crate root.
fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=assets/*");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let assets = manifest_dir.join("assets");
    if !assets.exists() {
        return Ok(());
    }

    let out_dir = env::var("OUT_DIR")?;
    let mut options = CopyOptions::new();
    options.overwrite = true;
    copy_items(&["assets/"], out_dir, &options)?;

    Ok(())
}
