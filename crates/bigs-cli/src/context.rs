//! Per-invocation state: data directory, persisted session, API client.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use tracing::{debug, info};

use bigs_core::{
    ApiUrl, CommentBook, ScrapBook, SessionEvent, SessionSnapshot, SessionState, SessionStore,
};
use bigs_file::FileStore;
use bigs_http::{BlogApi, ClientConfig};

const SESSION_FILE: &str = "session.json";

pub struct AppContext {
    api_url: Option<String>,
    data_dir: PathBuf,
    store: Arc<dyn SessionStore>,
    session: SessionState,
}

impl AppContext {
    /// Restore the session from the data directory.
    pub fn open(api_url: Option<&str>, data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => ProjectDirs::from("", "", "bigs")
                .context("Could not determine data directory")?
                .data_dir()
                .to_path_buf(),
        };
        fs::create_dir_all(&data_dir).context("Failed to create data directory")?;
        debug!(data_dir = %data_dir.display(), "Using data directory");

        let store: Arc<dyn SessionStore> = Arc::new(FileStore::new(data_dir.join(SESSION_FILE)));
        let session = SessionState::load(store.clone());
        session.subscribe(|event: SessionEvent, _: &SessionSnapshot| {
            if event == SessionEvent::Cleared {
                info!("Stored session removed");
            }
        });

        Ok(Self {
            api_url: api_url.map(str::to_string),
            data_dir,
            store,
            session,
        })
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    pub fn api_url(&self) -> Result<ApiUrl> {
        let raw = self
            .api_url
            .as_deref()
            .context("No API URL. Pass --api-url or set BIGS_API_URL.")?;
        ApiUrl::new(raw).context("Invalid API URL")
    }

    /// API client bound to the persisted session.
    pub fn api(&self) -> Result<BlogApi> {
        let config = ClientConfig::new(self.api_url()?);
        BlogApi::connect(&config, self.session.clone()).context("Failed to build HTTP client")
    }

    pub fn scraps(&self) -> ScrapBook {
        ScrapBook::new(self.store.clone())
    }

    pub fn comments(&self) -> CommentBook {
        CommentBook::new(self.store.clone())
    }
}
