use std::{env, fs};
use std::path::Path;

use const_gen::{const_declaration, CompileConst};

const VERSION: &'static str = "v1.0.0";

pub fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = env::var_os("OUT_DIR").ok_or("OUT_DIR not set")?;
    let dest_path = Path::new(&out_dir).join("const_gen.rs");

    // long version also shows the target the executable was compiled for
    let target = env::var("TARGET")?;
    let long_version = format!("{}\ntarget: {}", VERSION, target);
    let const_declarations = vec![
        const_declaration!(pub VERSION = VERSION),
        const_declaration!(pub LONG_VERSION = long_version),
    ].join("\n");

    fs::write(&dest_path, const_declarations)?;
    println!("cargo::rerun-if-changed=build.rs");

    return Ok(());
}
