//! Browser launch module
//!
//! Opens the host's default browser at the serving URL. Strictly
//! best-effort: a headless host or a missing browser must not stop the
//! server, so failures are logged and swallowed.

use crate::logger;

/// Fire-and-forget launch of the default browser at `url`.
///
/// `webbrowser::open` blocks until the opener command returns, so it runs
/// on a blocking task off the accept path.
pub fn launch(url: &str) {
    let url = url.to_string();
    tokio::task::spawn_blocking(move || match webbrowser::open(&url) {
        Ok(()) => logger::log_browser_opened(&url),
        Err(e) => logger::log_warning(&format!("Could not open browser for {url}: {e}")),
    });
}
