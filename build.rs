// Mirrors `static/` into `dist/` so the site can be deployed as-is.
use std::path::Path;

use fs_extra::dir::{self, CopyOptions};

fn main() {
    println!("cargo:rerun-if-changed=static");

    let out_dir = Path::new("dist");
    if out_dir.exists() {
        dir::remove(out_dir).ok();
    }
    if let Err(e) = dir::create_all(out_dir, false) {
        println!("cargo:warning=cannot create dist/: {e}");
        return;
    }

    let static_dir = Path::new("static");
    if static_dir.exists() {
        let options = CopyOptions::new().overwrite(true).content_only(true);
        if let Err(e) = dir::copy(static_dir, out_dir, &options) {
            println!("cargo:warning=copying static/ failed: {e}");
        }
    }
}
