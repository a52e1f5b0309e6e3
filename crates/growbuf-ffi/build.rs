//! Generates `include/growbuf.h` from the `extern "C"` surface.

use std::env;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-changed=cbindgen.toml");

    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    let root = Path::new(&manifest_dir);

    let config = cbindgen::Config::from_file(root.join("cbindgen.toml"))
        .expect("cbindgen.toml is unreadable");
    let bindings = cbindgen::generate_with_config(root, config)
        .expect("header generation failed");

    let include = root.join("include");
    std::fs::create_dir_all(&include).expect("cannot create include/");
    bindings.write_to_file(include.join("growbuf.h"));
}
