use std::path::PathBuf;

use cbuilder::launch::{launch_html_page, ServerConfig, SystemLauncher, DEFAULT_PORT};
use cbuilder::recipe::Recipe;
use cbuilder::{Platform, WorkDir};
use clap::{arg, value_parser, Arg, ArgAction, ArgMatches, Command, ValueHint};
use lazy_static::lazy_static;
use log::{debug, warn};

include!(concat!(env!("OUT_DIR"), "/const_gen.rs"));

lazy_static! {
    static ref default_port: String = DEFAULT_PORT.to_string();
}

struct MainError {
    inner: Box<dyn std::error::Error + 'static>
}

impl<E: std::error::Error + 'static> From<E> for MainError {
    fn from(value: E) -> Self {
        Self { inner: Box::new(value) }
    }
}

impl std::fmt::Debug for MainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&console::style(format!("{}", self.inner.as_ref())).red().to_string())
    }
}

fn main() -> Result<(), MainError> {
    let matches = Command::new("cbuilder")
        .author("Jonas Everaert")
        .version(VERSION)
        .long_version(LONG_VERSION)
        .propagate_version(true)
        .about("Build C/C++ projects from a recipe file")

        // Global arguments
        .arg(Arg::new("recipe")
            .short('f')
            .long("recipe")
            .value_name("FILE")
            .value_hint(ValueHint::FilePath)
            .help("The path to the recipe file")
            .global(true))
        .arg(arg!(--color "Enable color output (default: automatic)")
            .global(true))
        .arg(Arg::new("no-color")
            .long("no-color")
            .action(ArgAction::SetTrue)
            .conflicts_with("color")
            .hide(true)
            .global(true))
        .arg(arg!(--debug "Print debug information")
            .hide_short_help(true)
            .global(true))
        .arg(Arg::new("verbosity")
            .short('v')
            .long("verbose")
            .action(ArgAction::Count)
            .help("Sets the level of verbosity")
            .global(true))

        // Subcommands
        .subcommand(Command::new("build")
            .about("Build the recipe (default)"))

        .subcommand(Command::new("run")
            .about("Build the recipe, then run the executable or launch the html page")
            .long_about("Build the recipe, then execute the steps in its `[after]` section. An html page is only launched when the build produced its output"))

        .subcommand(Command::new("print")
            .about("Print the compiler command line without running it"))

        .subcommand(Command::new("launch")
            .about("Open an html file in the browser and serve its directory")
            .arg(arg!(<html> "The html file to open")
                .value_hint(ValueHint::FilePath))
            .arg(Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .value_parser(value_parser!(u16))
                .default_value(default_port.as_str())
                .help("Port of the local HTTP server")))

        .subcommand(Command::new("platform")
            .about("Print the platform this program is running on"))

        .get_matches();

    run_cli(&matches)
}

fn run_cli(matches: &ArgMatches) -> Result<(), MainError> {
    let debug = matches.get_flag("debug");

    let mut clog = colog::default_builder();
    #[cfg(debug_assertions)] { clog.filter(None, log::LevelFilter::Trace); }
    #[cfg(not(debug_assertions))] { clog.filter(None, log::LevelFilter::Warn); }

    #[cfg(not(debug_assertions))] {
        let verbosity = if debug { 3 } else { matches.get_count("verbosity") };
        match verbosity {
            0 => {},
            1 => { clog.filter(None, log::LevelFilter::Info); },
            2 => { clog.filter(None, log::LevelFilter::Debug); },
            3.. => { clog.filter(None, log::LevelFilter::Trace); },
        }
    }

    clog.init();

    let flag_color = matches.get_flag("color");
    let flag_no_color = matches.get_flag("no-color");
    if flag_color && flag_no_color { warn!("Both --color and --no-color are specified. --color will get priority") };
    if flag_color || flag_no_color {
        let color = flag_color || !flag_no_color;
        console::set_colors_enabled(color);
        console::set_colors_enabled_stderr(color);
    }

    let dir = WorkDir::current()?;

    match matches.subcommand() {
        Some(("platform", _)) => {
            println!("{}", Platform::host());
        },
        Some(("launch", matches)) => {
            let html = matches.get_one::<String>("html").unwrap();
            let config = ServerConfig {
                port: *matches.get_one::<u16>("port").unwrap(),
                ..Default::default()
            };
            launch_html_page(&SystemLauncher, &dir, html, &config)?;
        },
        subcommand => {
            let recipe_path = match matches.get_one::<String>("recipe") {
                Some(file) => PathBuf::from(file),
                None => Recipe::find(&dir)?,
            };
            let recipe = Recipe::load(&dir, &recipe_path)?;
            let recipe_dir = recipe.work_dir()?;
            debug!("Recipe {} in {}", recipe.path().display(), recipe_dir);

            if debug {
                eprintln!("{:#?}", recipe);
            }

            match subcommand {
                None | Some(("build", _)) => recipe.build(&recipe_dir)?,
                Some(("run", _)) => {
                    recipe.build(&recipe_dir)?;
                    recipe.run_after(&recipe_dir, &SystemLauncher)?;
                },
                Some(("print", _)) => println!("{}", recipe.builder(&recipe_dir)?),
                Some((subcommand_name, _)) => {
                    unreachable!("Invalid subcommand {subcommand_name}")
                }
            }
        }
    }

    Ok(())
}
