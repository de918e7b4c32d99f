//! Download of the published tables from the Atomic Mass Data Center mirrors

// standard library
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

// external crates
use log::{debug, info, warn};

// nmass modules
use nmass_utils::f;

// internal modules
use crate::error::{Error, Result};

/// Some mirrors refuse requests without a browser-like user agent
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) nmass";

/// Where to send people when every mirror fails
const MANUAL_DOWNLOAD: &str = "https://www.anl.gov/phy/atomic-mass-data-resources";

/// Description of a remotely hosted source table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteSource {
    /// Name used in messages, e.g. `AME2020`
    pub name: &'static str,
    /// File name to save under in the data directory
    pub file_name: &'static str,
    /// Mirrors, tried in order
    pub mirrors: &'static [&'static str],
    /// Text expected near the start of a genuine file, any one will do
    pub markers: &'static [&'static str],
    /// Number of leading characters searched for the markers
    pub marker_window: usize,
    /// Smallest plausible file size in bytes
    pub min_size: usize,
}

/// AME2020 mass table
pub const AME2020: RemoteSource = RemoteSource {
    name: "AME2020",
    file_name: "mass_1.mas20.txt",
    mirrors: &[
        "https://www.anl.gov/sites/www/files/2021-03/mass.mas20.txt",
        "https://www.anl.gov/sites/www/files/2021-04/mass_1.mas20.txt",
        "https://www-nds.iaea.org/amdc/ame2020/mass_1.mas20.txt",
    ],
    markers: &["mass"],
    marker_window: 5000,
    min_size: 1000,
};

/// NUBASE2020 table of nuclear properties
pub const NUBASE2020: RemoteSource = RemoteSource {
    name: "NUBASE2020",
    file_name: "nubase_4.mas20.txt",
    mirrors: &[
        "https://www.anl.gov/sites/www/files/2021-03/nubase_4.mas20.txt",
        "https://www-nds.iaea.org/amdc/ame2020/nubase_4.mas20.txt",
        "https://www-nds.iaea.org/amdc/ame2020/nubase.mas20.txt",
    ],
    markers: &["nubase", " 0010 "],
    marker_window: 10000,
    min_size: 1000,
};

/// Blocking downloader with mirror fallback
///
/// A minimum delay is kept between consecutive requests to the same domain.
/// The timing state belongs to the fetcher, so separate fetchers do not
/// throttle each other.
///
/// ```rust, no_run
/// # use nmass_tables::{Fetcher, AME2020};
/// let mut fetcher = Fetcher::new();
/// let path = fetcher.fetch(&AME2020, "data").unwrap();
/// println!("AME2020 available at {}", path.display());
/// ```
#[derive(Debug, Clone)]
pub struct Fetcher {
    timeout: u64,
    request_delay: Duration,
    last_request: HashMap<String, Instant>,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self {
            timeout: 60,
            request_delay: Duration::from_secs(1),
            last_request: HashMap::new(),
        }
    }
}

impl Fetcher {
    /// New fetcher with a 60 s timeout and 1 s request delay
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request timeout in seconds
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds.max(1);
        self
    }

    /// Set the minimum delay between requests to the same domain
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Download a source into `dir`, unless it is already there
    ///
    /// Mirrors are tried in order and the first response passing validation
    /// is saved. Returns the path to the file.
    pub fn fetch<P: AsRef<Path>>(&mut self, source: &RemoteSource, dir: P) -> Result<PathBuf> {
        let path = dir.as_ref().join(source.file_name);
        if path.exists() {
            info!("{} already present at {}", source.name, path.display());
            return Ok(path);
        }

        let mut last_error = String::from("no mirrors configured");
        for url in source.mirrors {
            info!("Trying {url}...");
            let content = match self.get(url) {
                Ok(content) => content,
                Err(e) => {
                    warn!("Failed to download from {url}: {e}");
                    last_error = e;
                    continue;
                }
            };

            if let Err(e) = validate(source, &content) {
                warn!("Rejected response from {url}: {e}");
                last_error = e;
                continue;
            }

            save(&path, &content)?;
            info!(
                "Saved {} to {} ({} bytes)",
                source.name,
                path.display(),
                content.len()
            );
            return Ok(path);
        }

        Err(Error::DownloadFailed {
            name: source.name.to_string(),
            last_error,
            remediation: f!(
                "Please download manually from {MANUAL_DOWNLOAD} and save to {}",
                path.display()
            ),
        })
    }

    fn get(&mut self, url: &str) -> core::result::Result<String, String> {
        self.wait_for(domain(url));

        let response = minreq::get(url)
            .with_header("User-Agent", USER_AGENT)
            .with_timeout(self.timeout)
            .send();
        self.last_request
            .insert(domain(url).to_string(), Instant::now());

        let response = response.map_err(|e| e.to_string())?;
        if !(200..300).contains(&response.status_code) {
            return Err(f!(
                "HTTP {} {}",
                response.status_code,
                response.reason_phrase
            ));
        }

        response
            .as_str()
            .map(|s| s.to_string())
            .map_err(|e| e.to_string())
    }

    fn wait_for(&self, domain: &str) {
        if let Some(last) = self.last_request.get(domain) {
            let elapsed = last.elapsed();
            if elapsed < self.request_delay {
                let pause = self.request_delay - elapsed;
                debug!("Waiting {:.2} s before next request to {domain}", pause.as_secs_f64());
                std::thread::sleep(pause);
            }
        }
    }
}

/// Check downloaded content looks like the expected table
pub fn validate(source: &RemoteSource, content: &str) -> core::result::Result<(), String> {
    if content.len() < source.min_size {
        return Err(f!("file too small ({} bytes)", content.len()));
    }

    let head = content.chars().take(500).collect::<String>().to_lowercase();
    if head.contains("<html") || head.contains("<!doctype") {
        return Err("received HTML instead of data, likely blocked".into());
    }

    let window = content
        .chars()
        .take(source.marker_window)
        .collect::<String>()
        .to_lowercase();
    if !source.markers.iter().any(|m| window.contains(m)) {
        return Err(f!("content does not appear to be {} data", source.name));
    }

    Ok(())
}

/// Write a download beside its destination and rename it into place
///
/// An interrupted write leaves at most a `.part` sibling behind, never a
/// truncated table under the real name.
fn save(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(f!(".{}.part", std::process::id()));
    let partial = path.with_file_name(name);

    let written = std::fs::write(&partial, content).and_then(|()| std::fs::rename(&partial, path));
    if let Err(e) = written {
        if let Err(cleanup) = std::fs::remove_file(&partial) {
            debug!("Could not remove {}: {cleanup}", partial.display());
        }
        return Err(e.into());
    }
    Ok(())
}

/// Host part of a URL, used to key the request delay
fn domain(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    rest.split('/').next().unwrap_or(rest)
}
