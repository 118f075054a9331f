//! Default browser hand-off

use tracing::debug;

use super::{Browser, BrowserError};

/// Opens URLs through the OS default handler without waiting on it
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl Browser for SystemBrowser {
    fn open(&self, url: &str) -> Result<(), BrowserError> {
        debug!(url, "opening in default browser");
        open::that_detached(url).map_err(|source| BrowserError {
            url: url.to_string(),
            source,
        })
    }
}
