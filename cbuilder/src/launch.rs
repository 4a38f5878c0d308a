//! Opening an html artifact in a browser, served by a local HTTP server

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use log::{debug, info, warn};
use serde::Deserialize;
use url::Url;

use crate::{tools, BuildError, WorkDir};

pub const DEFAULT_PORT: u16 = 8000;

/// The local HTTP server serving an artifact's directory
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ServerConfig {
    pub port: u16,
    /// Python interpreter used for `-m http.server`
    pub python: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: DEFAULT_PORT,
            python: String::from("python3"),
        }
    }
}

impl ServerConfig {
    /// `http://localhost:<port>/<file_name>`
    pub fn page_url(&self, file_name: &str) -> crate::Result<Url> {
        let mut url = Url::parse(&format!("http://localhost:{}/", self.port))?;
        url.set_path(file_name);
        Ok(url)
    }

    /// Arguments passed to the interpreter
    pub fn args(&self) -> [String; 3] {
        [String::from("-m"), String::from("http.server"), self.port.to_string()]
    }

    pub fn command(&self) -> String {
        format!("{} {}", self.python, self.args().join(" "))
    }
}

/// An existing html file, split in the directory to serve and the file name to open
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HtmlArtifact {
    pub dir: PathBuf,
    pub file_name: String,
}

impl HtmlArtifact {
    pub fn resolve(dir: &WorkDir, path: impl AsRef<Path>) -> crate::Result<HtmlArtifact> {
        let path = path.as_ref();
        if !dir.file_exist(path) {
            return Err(BuildError::HtmlNotFound(dir.resolve(path)));
        }

        let parent = dir.path_traverse_up(path, 0)?;
        let path_str = path.to_string_lossy();
        Ok(HtmlArtifact {
            dir: PathBuf::from(parent),
            file_name: utils::bare_file_name(&path_str).to_string(),
        })
    }
}

pub trait Launcher {
    /// Start opening `url` in a browser. Returns without waiting for the browser to exit.
    fn open_browser(&self, url: &Url) -> crate::Result<()>;

    /// Serve `dir` over HTTP. Blocks until the server is stopped.
    fn serve(&self, dir: &Path, config: &ServerConfig) -> crate::Result<ExitStatus>;
}

/// Uses the platform's url opener and python's built-in HTTP server
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn open_browser(&self, url: &Url) -> crate::Result<()> {
        let (opener, args) = tools::browser_opener()?;
        info!("Opening {} with {}", url, opener.display());

        // the opener may be the browser itself, which only exits when it is closed
        let child = Command::new(opener)
            .args(args)
            .arg(url.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        debug!("Browser opener started with pid {}", child.id());
        Ok(())
    }

    fn serve(&self, dir: &Path, config: &ServerConfig) -> crate::Result<ExitStatus> {
        let python = tools::find(&config.python)?;
        println!("{}", config.command());
        info!("Serving {} with {}", dir.display(), python.display());

        let status = Command::new(python)
            .args(config.args())
            .current_dir(dir)
            .status()?;
        Ok(status)
    }
}

#[derive(Debug)]
pub enum Launch {
    /// The html file doesn't exist, nothing was started
    NotFound(PathBuf),
    /// The server was started and has exited with this status
    Served(ExitStatus),
}

/// Open the html file at `path` in a browser and serve its directory.
///
/// Blocks until the server exits. When the file doesn't exist a message is printed and neither the
/// browser nor the server are started.
pub fn launch_html_page(
    launcher: &dyn Launcher,
    dir: &WorkDir,
    path: impl AsRef<Path>,
    config: &ServerConfig,
) -> crate::Result<Launch> {
    let artifact = match HtmlArtifact::resolve(dir, path) {
        Ok(artifact) => artifact,
        Err(BuildError::HtmlNotFound(path)) => {
            println!("html file does not exist!");
            return Ok(Launch::NotFound(path));
        },
        Err(err) => return Err(err),
    };

    let url = config.page_url(&artifact.file_name)?;
    if let Err(err) = launcher.open_browser(&url) {
        warn!("Couldn't open a browser, navigate to {} manually: {}", url, err);
    }

    let status = launcher.serve(&artifact.dir, config)?;
    Ok(Launch::Served(status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url() {
        let config = ServerConfig::default();
        assert_eq!(config.page_url("run.html").unwrap().as_str(), "http://localhost:8000/run.html");
        assert_eq!(config.page_url("my page.html").unwrap().as_str(), "http://localhost:8000/my%20page.html");

        let config = ServerConfig { port: 9090, ..Default::default() };
        assert_eq!(config.page_url("fullscreen.html").unwrap().as_str(), "http://localhost:9090/fullscreen.html");
    }

    #[test]
    fn server_command() {
        assert_eq!(ServerConfig::default().command(), "python3 -m http.server 8000");
        assert_eq!(ServerConfig { port: 8080, ..Default::default() }.args(), ["-m", "http.server", "8080"]);
    }

    #[test]
    fn missing_interpreter() {
        let tmp = tempdir::TempDir::new("cbuilder.tests.launch.missing_interpreter").unwrap();
        let config = ServerConfig { python: String::from("cbuilder-no-such-python"), ..Default::default() };
        assert!(matches!(SystemLauncher.serve(tmp.path(), &config), Err(BuildError::ToolNotFound(_))));
    }

    #[test]
    fn artifact() {
        let tmp = tempdir::TempDir::new("cbuilder.tests.launch.artifact").unwrap();
        let dir = WorkDir::new(tmp.path()).unwrap();
        std::fs::create_dir(dir.path().join("web")).unwrap();
        std::fs::File::create(dir.path().join("web/run.html")).unwrap();

        let artifact = HtmlArtifact::resolve(&dir, "web/run.html").unwrap();
        assert_eq!(artifact.file_name, "run.html");
        assert_eq!(artifact.dir, PathBuf::from(format!("{}/web", dir)));

        assert!(matches!(HtmlArtifact::resolve(&dir, "web/index.html"), Err(BuildError::HtmlNotFound(_))));
    }
}
