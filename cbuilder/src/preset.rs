//! Common target profiles, each appending several tokens at once

use std::path::Path;

use itertools::Itertools;

use crate::CommandLineBuilder;

/// Location of the emscripten compiler, relative to the directory containing `dependencies`
pub const EMSCRIPTEN_COMPILER: &str = "dependencies/linux_/emsdk/upstream/emscripten/emcc";

pub const EMSCRIPTEN_OPTIMIZATION_LEVEL: i32 = 2;

/// Path to `emcc` inside of the emscripten SDK installed beneath `root`
pub fn emscripten_compiler_path(root: &Path) -> String {
    utils::forward_slashes(&root.join(EMSCRIPTEN_COMPILER))
}

/// Use `compiler` (usually from [`emscripten_compiler_path`]) with emscripten's default optimization level
pub fn setup_emscripten(builder: &mut CommandLineBuilder, compiler: impl Into<String>) -> crate::Result<()> {
    builder.compiler(compiler)?
        .optimization(EMSCRIPTEN_OPTIMIZATION_LEVEL);
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmscriptenOptions {
    /// Functions callable from javascript, without the leading underscore
    pub exported_functions: Vec<String>,
    /// Bundle the `assets` folder next to the active directory, so the program can read it as regular files
    pub use_assets: bool,
}

impl Default for EmscriptenOptions {
    fn default() -> Self {
        EmscriptenOptions {
            exported_functions: vec![String::from("main")],
            use_assets: false,
        }
    }
}

/// `EXPORTED_FUNCTIONS="_main,_set_screen_size"`. Emscripten requires every name to start with an underscore.
pub fn exported_functions_setting(functions: &[impl AsRef<str>]) -> String {
    let functions = functions.iter()
        .map(|function| format!("_{}", function.as_ref()))
        .join(",");
    format!("EXPORTED_FUNCTIONS=\"{}\"", functions)
}

/// SDL2, SDL2_image (png) and OpenGL ES 3 through emscripten
pub fn emscripten_opengl_settings(builder: &mut CommandLineBuilder, options: &EmscriptenOptions) -> crate::Result<()> {
    builder.setting("USE_SDL=2")?
        .setting("USE_SDL_IMAGE=2")?
        .setting(exported_functions_setting(&options.exported_functions))?
        .setting("EXTRA_EXPORTED_RUNTIME_METHODS=ccall,cwrap")?
        .setting(r#"SDL2_IMAGE_FORMATS='["png"]'"#)?
        .setting("FULL_ES3=1")?;

    if options.use_assets {
        builder.raw("--preload-file assets")?;
    }

    Ok(())
}

/// Define `USE_DEBUG` and only show debug messages containing one of `keywords` (a file or function name)
pub fn enable_debug_on_keyword(builder: &mut CommandLineBuilder, keywords: &[impl AsRef<str>]) -> crate::Result<()> {
    let keywords = keywords.iter().map(|keyword| keyword.as_ref()).join(",");
    builder.define("USE_DEBUG")?
        .define(format!("DEBUG_KEYWORDS='\"{}\"'", keywords))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn rendered(builder: &CommandLineBuilder) -> Vec<String> {
        builder.tokens().iter().map(|token| token.to_string()).collect()
    }

    #[test]
    fn compiler_path() {
        let root = PathBuf::from("/home/me/project");
        assert_eq!(
            emscripten_compiler_path(&root),
            "/home/me/project/dependencies/linux_/emsdk/upstream/emscripten/emcc"
        );
    }

    #[test]
    fn emscripten() {
        let mut builder = CommandLineBuilder::new();
        setup_emscripten(&mut builder, "emcc").unwrap();
        assert_eq!(builder.command_line(), "emcc -O2");
    }

    #[test]
    fn opengl() {
        let mut builder = CommandLineBuilder::new();
        emscripten_opengl_settings(&mut builder, &EmscriptenOptions {
            exported_functions: vec!["main".to_string(), "set_screen_size".to_string()],
            use_assets: true,
        }).unwrap();

        assert_eq!(rendered(&builder), [
            "-s USE_SDL=2",
            "-s USE_SDL_IMAGE=2",
            "-s EXPORTED_FUNCTIONS=\"_main,_set_screen_size\"",
            "-s EXTRA_EXPORTED_RUNTIME_METHODS=ccall,cwrap",
            "-s SDL2_IMAGE_FORMATS='[\"png\"]'",
            "-s FULL_ES3=1",
            "--preload-file assets",
        ]);
    }

    #[test]
    fn opengl_defaults() {
        let mut builder = CommandLineBuilder::new();
        emscripten_opengl_settings(&mut builder, &EmscriptenOptions::default()).unwrap();
        assert_eq!(builder.len(), 6);
        assert_eq!(builder.tokens()[2].to_string(), "-s EXPORTED_FUNCTIONS=\"_main\"");
    }

    #[test]
    fn debug_keywords() {
        let mut builder = CommandLineBuilder::new();
        enable_debug_on_keyword(&mut builder, &["main.cpp", "render"]).unwrap();
        assert_eq!(rendered(&builder), ["-D USE_DEBUG", "-D DEBUG_KEYWORDS='\"main.cpp,render\"'"]);
    }
}
