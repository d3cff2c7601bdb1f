use std::path::PathBuf;
use std::time::Duration;

use fantoccini::{Client, ClientBuilder};
use serde_json::{Value, json, map::Map};
use tokio::process::{Child, Command};
use tokio::time::sleep;
use url::Url;

use crate::config::ScraperConfig;
use crate::error::Error;

const CONNECT_ATTEMPTS: usize = 10;
const CONNECT_BACKOFF: Duration = Duration::from_millis(500);

/// Operating-system family the run is hosted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    pub fn detect() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Unrecognized identifiers fall back to Linux.
    pub fn from_os(os: &str) -> Self {
        match os {
            "windows" => Platform::Windows,
            "macos" => Platform::MacOs,
            "linux" => Platform::Linux,
            _ => Platform::Linux,
        }
    }

    pub fn user_agent(&self) -> &'static str {
        match self {
            Platform::Windows => {
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/71.0.3578.98 Safari/537.36"
            }
            Platform::MacOs => {
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_13_6) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/69.0.3497.100 Safari/537.36"
            }
            Platform::Linux => {
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/534.30 \
                 (KHTML, like Gecko) Ubuntu/16.04 Chromium 73.0.3683.68 \
                 Chrome/73.0.3683.68 Safari/534.30"
            }
        }
    }

    pub fn driver_binary(&self) -> &'static str {
        match self {
            Platform::Windows => "chromedriver_win.exe",
            Platform::MacOs => "chromedriver_mac",
            Platform::Linux => "chromedriver_linux",
        }
    }
}

/// Fixed request-header template per platform. Only the user-agent entry
/// is applied to the session; the rest is carried as configuration data.
pub fn init_headers(platform: Platform) -> Vec<(&'static str, String)> {
    vec![
        ("Accept-Encoding", "gzip, deflate".to_string()),
        (
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,\
             image/webp,image/apng,*/*;q=0.8"
                .to_string(),
        ),
        ("Accept-Language", "ko,ja;q=0.9,en;q=0.8".to_string()),
        ("Host", String::new()),
        ("Upgrade-Insecure-Requests", "1".to_string()),
        ("User-Agent", platform.user_agent().to_string()),
        ("Content-Type", String::new()),
        ("Referer", String::new()),
    ]
}

/// Live browser-automation connection for one scraping run.
///
/// Exactly one adapter call should use a handle at a time; scraping
/// municipalities concurrently requires one session each.
pub struct Session {
    client: Client,
    driver: Option<Child>,
    platform: Platform,
    headless: bool,
}

impl Session {
    /// Launches the platform-selected driver binary (or attaches to an
    /// externally managed server) and opens a WebDriver session.
    ///
    /// Failure to start or reach the driver is [`Error::DriverLaunch`],
    /// fatal for the run.
    pub async fn create(config: &ScraperConfig, headless: bool) -> Result<Self, Error> {
        let platform = Platform::detect();

        // An externally managed WebDriver server takes precedence over
        // launching our own driver binary.
        let external = std::env::var("WEBDRIVER_URL")
            .ok()
            .filter(|u| !u.is_empty())
            .or_else(|| config.webdriver_url.clone());

        let (url, driver) = match external {
            Some(url) => {
                Url::parse(&url).map_err(|e| {
                    Error::DriverLaunch(format!("invalid webdriver url '{url}': {e}"))
                })?;
                ::log::info!("attaching to webdriver at {url}");
                (url, None)
            }
            None => {
                let child = launch_driver(config, platform)?;
                (format!("http://localhost:{}", config.driver_port), Some(child))
            }
        };

        match connect(&url, platform, headless).await {
            Ok(client) => {
                ::log::info!(
                    "webdriver session ready at {url} (platform: {platform:?}, headless: {headless})"
                );
                Ok(Self {
                    client,
                    driver,
                    platform,
                    headless,
                })
            }
            Err(e) => {
                if let Some(mut child) = driver {
                    let _ = child.start_kill();
                }
                Err(e)
            }
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn headless(&self) -> bool {
        self.headless
    }

    /// Releases the WebDriver session and the driver process if one was
    /// launched. Must be called on every exit path, error paths included.
    pub async fn close(self) -> Result<(), Error> {
        let Session { client, driver, .. } = self;
        let close_result = client.close().await.map_err(Error::from);
        if let Some(mut child) = driver {
            if let Err(e) = child.kill().await {
                ::log::warn!("failed to kill driver process: {e}");
            }
        }
        close_result
    }
}

fn launch_driver(config: &ScraperConfig, platform: Platform) -> Result<Child, Error> {
    let path: PathBuf = config.driver_dir.join(platform.driver_binary());
    ::log::info!("launching driver binary: {}", path.display());
    Command::new(&path)
        .arg(format!("--port={}", config.driver_port))
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| Error::DriverLaunch(format!("failed to start '{}': {e}", path.display())))
}

/// Connects with a few bounded attempts; the launched driver needs a
/// moment to open its port.
async fn connect(url: &str, platform: Platform, headless: bool) -> Result<Client, Error> {
    let caps = build_capabilities(platform, headless);

    let mut last_error = None;
    for attempt in 0..CONNECT_ATTEMPTS {
        if attempt > 0 {
            sleep(CONNECT_BACKOFF).await;
        }
        match ClientBuilder::native()
            .capabilities(caps.clone())
            .connect(url)
            .await
        {
            Ok(client) => return Ok(client),
            Err(e) => {
                ::log::warn!("webdriver connect attempt {} failed: {e}", attempt + 1);
                last_error = Some(e);
            }
        }
    }

    Err(Error::DriverLaunch(format!(
        "could not reach webdriver at {url}: {}",
        last_error.map(|e| e.to_string()).unwrap_or_default()
    )))
}

fn build_capabilities(platform: Platform, headless: bool) -> Map<String, Value> {
    let user_agent = init_headers(platform)
        .into_iter()
        .find(|(key, _)| *key == "User-Agent")
        .map(|(_, value)| value)
        .unwrap_or_default();

    let mut args = vec![format!("--user-agent={user_agent}")];
    if headless {
        args.push("--headless".to_string());
        args.push("--disable-gpu".to_string());
    }

    let mut caps = Map::new();
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    caps
}
