use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::matcher::{AliasRule, LotMatcher};

/// Mirror a T2 parking reservation as an Offstreet digital parking event.
#[derive(Parser, Debug, Clone)]
#[command(name = "t2_offstreet", version, about)]
pub struct Config {
    /// T2 reservation id to mirror
    #[arg(long, env = "T2_RESERVATION_ID")]
    pub reservation_id: String,

    #[arg(long, env = "T2_BASE_URL", default_value = "https://usc.t2flex.com/PowerPark/")]
    pub t2_url: Url,

    #[arg(long, env = "OFFSTREET_URL", default_value = "https://dashboard.offstreet.io/")]
    pub offstreet_url: Url,

    #[arg(long, env = "WEBDRIVER_URL", default_value = "http://localhost:9515")]
    pub webdriver_url: String,

    #[arg(long, env = "HEADLESS")]
    pub headless: bool,

    /// Where t2_data.json and notification.html are written
    #[arg(long, env = "OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Directory holding the credential cache and its key
    #[arg(long, env = "PARKING_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Upper bound for every wait on the remote page
    #[arg(long, env = "WAIT_TIMEOUT_SECS", default_value_t = 10)]
    pub wait_secs: u64,

    /// Extra lot aliases, `alias=FRAGMENT;alias=FRAGMENT`
    #[arg(long, env = "LOT_ALIASES", default_value = "")]
    pub lot_aliases: String,

    /// Forget cached credentials before starting
    #[arg(long)]
    pub clear_credentials: bool,

    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    pub fn reservation_url(&self) -> Result<Url, url::ParseError> {
        let mut url = self.t2_url.join("reservation/view.aspx")?;
        url.query_pairs_mut()
            .append_pair("id", &self.reservation_id)
            .append_pair("addtoqueue", "1");
        Ok(url)
    }

    pub fn offstreet_page(&self, path: &str) -> Result<Url, url::ParseError> {
        self.offstreet_url.join(path)
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_secs)
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.output_dir.join("t2_data.json")
    }

    pub fn matcher(&self) -> LotMatcher {
        LotMatcher::extended(AliasRule::parse_list(&self.lot_aliases))
    }

    /// Explicit flag, else the platform's per-user config location.
    pub fn credential_dir(&self) -> Option<PathBuf> {
        if let Some(dir) = &self.config_dir {
            return Some(dir.clone());
        }
        let env_dir = |name: &str| std::env::var_os(name).filter(|v| !v.is_empty());
        env_dir("APPDATA")
            .or_else(|| env_dir("XDG_CONFIG_HOME"))
            .map(PathBuf::from)
            .or_else(|| env_dir("HOME").map(|home| PathBuf::from(home).join(".config")))
    }
}
