//! Recipe files describe how to build a project and what to do with the result.
//!
//! ```toml
//! [build]
//! compiler = "g++"
//! sources = ["main.cpp"]
//! output = "a.out"
//! clean = true
//!
//! [after]
//! run = "./a.out"
//! ```
//!
//! Commands run in the directory containing the recipe, so relative paths are relative to the recipe.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Deserialize;

use crate::launch::{self, Launch, Launcher, ServerConfig};
use crate::preset::{self, EmscriptenOptions};
use crate::process;
use crate::{BuildError, CommandLineBuilder, Deletion, WorkDir};

/// Looked for in this order when no recipe is specified
pub const RECIPE_FILE_NAMES: &[&str] = &["cbuilder.toml", "build.toml"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// emcc from the SDK with `-O2`
    Emscripten,
    /// [`Preset::Emscripten`] with SDL2 and OpenGL settings
    EmscriptenOpengl,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct BuildSection {
    /// Overrides the compiler of a preset
    pub compiler: Option<String>,
    pub preset: Option<Preset>,
    pub sources: Vec<String>,
    pub optimization: Option<i32>,
    pub macros: Vec<String>,
    pub debug_keywords: Option<Vec<String>>,
    pub settings: Vec<String>,
    pub include_paths: Vec<String>,
    pub library_paths: Vec<String>,
    pub libraries: Vec<String>,
    /// Raw arguments, appended before the output
    pub args: Vec<String>,
    pub output: Option<String>,
    /// Delete the output before building
    pub clean: bool,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct EmscriptenSection {
    /// Directory containing `dependencies/`
    pub sdk_root: Option<String>,
    pub exported_functions: Option<Vec<String>>,
    pub use_assets: bool,
}

impl EmscriptenSection {
    fn options(&self) -> EmscriptenOptions {
        let mut options = EmscriptenOptions::default();
        if let Some(functions) = &self.exported_functions {
            options.exported_functions = functions.clone();
        }
        options.use_assets = self.use_assets;
        options
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct AfterSection {
    /// Shell command to run after building, e.g. `./a.out`
    pub run: Option<String>,
    /// Html file to open in a browser after building
    pub launch: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Recipe {
    pub build: BuildSection,
    #[serde(default)]
    pub emscripten: EmscriptenSection,
    #[serde(default)]
    pub after: AfterSection,
    #[serde(default)]
    pub server: ServerConfig,
    /// File the recipe was loaded from
    #[serde(skip)]
    path: PathBuf,
}

impl Recipe {
    pub fn parse(contents: &str) -> Result<Recipe, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Read and parse the recipe at `path`, relative to `dir`
    pub fn load(dir: &WorkDir, path: impl AsRef<Path>) -> crate::Result<Recipe> {
        let path = dir.resolve(path);
        debug!("Loading recipe {}", path.display());

        let contents = fs::read_to_string(&path)?;
        let mut recipe = Recipe::parse(&contents)
            .map_err(|err| BuildError::RecipeParseError(path.clone(), err))?;
        recipe.path = path;
        Ok(recipe)
    }

    /// The first of [`RECIPE_FILE_NAMES`] present in `dir`
    pub fn find(dir: &WorkDir) -> crate::Result<PathBuf> {
        RECIPE_FILE_NAMES.iter()
            .map(|name| dir.resolve(name))
            .find(|path| path.is_file())
            .ok_or_else(|| BuildError::RecipeNotFound {
                dir: dir.to_string(),
                names: RECIPE_FILE_NAMES,
            })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The directory containing the recipe file
    pub fn work_dir(&self) -> crate::Result<WorkDir> {
        match self.path.parent() {
            Some(parent) => WorkDir::new(parent),
            None => WorkDir::current(),
        }
    }

    /// The command line described by the `[build]` section
    pub fn builder(&self, dir: &WorkDir) -> crate::Result<CommandLineBuilder> {
        let build = &self.build;
        let mut builder = CommandLineBuilder::new();

        match (build.preset, &build.compiler) {
            (Some(_), compiler) => {
                let compiler = match compiler {
                    Some(compiler) => compiler.clone(),
                    None => preset::emscripten_compiler_path(
                        &dir.resolve(self.emscripten.sdk_root.as_deref().unwrap_or("."))
                    ),
                };
                preset::setup_emscripten(&mut builder, compiler)?;
            },
            (None, Some(compiler)) => { builder.compiler(compiler.as_str())?; },
            (None, None) => return Err(BuildError::MissingCompiler(self.path.clone())),
        }

        for source in &build.sources {
            builder.source(source.as_str())?;
        }
        if let Some(level) = build.optimization {
            builder.optimization(level);
        }

        for macro_def in &build.macros {
            builder.define(macro_def.as_str())?;
        }
        if let Some(keywords) = &build.debug_keywords {
            preset::enable_debug_on_keyword(&mut builder, keywords.as_slice())?;
        }

        if build.preset == Some(Preset::EmscriptenOpengl) {
            preset::emscripten_opengl_settings(&mut builder, &self.emscripten.options())?;
        }
        for setting in &build.settings {
            builder.setting(setting.as_str())?;
        }

        for path in &build.include_paths {
            builder.include_path(path.as_str())?;
        }
        for path in &build.library_paths {
            builder.library_path(path.as_str())?;
        }
        for lib in &build.libraries {
            builder.library(lib.as_str())?;
        }
        for arg in &build.args {
            builder.raw(arg.as_str())?;
        }

        if let Some(output) = &build.output {
            builder.output(output.as_str())?;
        }

        Ok(builder)
    }

    /// Delete the previous output if `clean` is set, then build
    pub fn build(&self, dir: &WorkDir) -> crate::Result<()> {
        let builder = self.builder(dir)?;

        if self.build.clean {
            if let Some(output) = &self.build.output {
                match dir.delete_file(output) {
                    Deletion::Failed(err) => warn!("Couldn't remove previous output {}: {}", output, err),
                    deletion => debug!("Previous output {}: {:?}", output, deletion),
                }
            }
        }

        builder.build(dir)
    }

    /// Run the `[after]` steps. The html page is only launched when the build produced its output.
    pub fn run_after(&self, dir: &WorkDir, launcher: &dyn Launcher) -> crate::Result<()> {
        if let Some(command) = &self.after.run {
            let status = process::stream_command(command, dir.path())?;
            if !status.success() {
                return Err(BuildError::NonZeroExitStatus(status));
            }
        }

        if let Some(page) = &self.after.launch {
            if let Some(output) = &self.build.output {
                if !dir.file_exist(output) {
                    warn!("Build output {} doesn't exist, not launching {}", output, page);
                    return Ok(());
                }
            }

            if let Launch::Served(status) = launch::launch_html_page(launcher, dir, page, &self.server)? {
                info!("Server exited with {}", status);
            }
        }

        Ok(())
    }
}
