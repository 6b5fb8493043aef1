// UI layer: runs one action against the server and produces the text for
// stdout. Diagnostics go to stderr, through tracing or the spinner.

use crate::api::{self, LockAction, NextcloudClient};
use crate::cli::Action;
use crate::config::Config;
use crate::error::{OwError, Result};
use crate::path::resolve_target;
use crate::render;
use console::Emoji;
use dialoguer::Password;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

pub static ERROR: Emoji = Emoji("⛔ ", "error: ");
pub static PROGRESS: Emoji = Emoji("🏃 ", "-> ");

/// Fill in a missing password by asking on the terminal.
pub fn ensure_password(config: &mut Config) -> Result<()> {
    if !config.password.is_empty() {
        return Ok(());
    }
    if !std::io::stdin().is_terminal() {
        return Err(OwError::Config(
            "no password configured; set OW_PASSWORD or add it to the config file".into(),
        ));
    }
    config.password = Password::new()
        .with_prompt(format!("Nextcloud password for {}", config.username))
        .interact()
        .map_err(|e| OwError::Config(format!("could not read password: {e}")))?;
    Ok(())
}

/// Run `action` on `path`. Returns what should be printed on stdout, if
/// anything.
pub fn execute(action: Action, path: &Path, config: &Config, show_progress: bool) -> Result<Option<String>> {
    debug!("👟 action is {}", action);

    let target = resolve_target(path, &config.local_sync_folder)?;
    debug!("📁 absolute path is {}", target.absolute.display());
    debug!("🗂️ relative path is {}", target.relative);

    let file_url = api::file_url(config, &target.relative);
    debug!("💻 WebDAV path is {}", file_url);
    debug!("☁️ sync folder mirrors {} on the server", config.remote_destination_folder);

    let client = NextcloudClient::new(config)?;

    match action {
        Action::InternalLink => {
            let file_id = with_spinner(show_progress, "fetching internal file ID...", || {
                client.fetch_file_id(&file_url)
            })?;
            Ok(Some(api::internal_url(config, &file_id)))
        }
        Action::HtmlLink => {
            let file_id = with_spinner(show_progress, "fetching internal file ID...", || {
                client.fetch_file_id(&file_url)
            })?;
            let internal = api::internal_url(config, &file_id);
            Ok(Some(render::html_link(&internal, &target.relative)))
        }
        Action::Lock => {
            debug!("🏃 locking...");
            with_spinner(show_progress, "locking...", || client.lock(LockAction::Lock, &file_url))?;
            debug!("🔒 success!");
            Ok(None)
        }
        Action::Unlock => {
            debug!("🏃 unlocking...");
            with_spinner(show_progress, "unlocking...", || client.lock(LockAction::Unlock, &file_url))?;
            debug!("🔓 success!");
            Ok(None)
        }
        Action::QuickAlbum => {
            debug!("🏃 quick albuming...");
            let rooted = api::rooted_remote_path(&target.relative);
            let share = with_spinner(show_progress, "quick albuming...", || {
                client.create_public_share(&rooted)
            })?;
            debug!("🔗 public share URL is {}", share.public_share_url);
            Ok(Some(render::quick_album(&share)))
        }
    }
}

/// Show a spinner on stderr while `f` runs. indicatif stays silent when
/// stderr is not a terminal.
fn with_spinner<T>(enabled: bool, msg: &str, f: impl FnOnce() -> T) -> T {
    if !enabled {
        return f();
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("{}{}", PROGRESS, msg));
    spinner.enable_steady_tick(Duration::from_millis(100));
    let out = f();
    spinner.finish_and_clear();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_fails_before_any_request() {
        let root = tempfile::tempdir().unwrap();
        let config = Config {
            // nothing listens here; reaching the network would be a transport error instead
            server: "http://127.0.0.1:9".into(),
            local_sync_folder: root.path().to_path_buf(),
            password: "x".into(),
            ..Config::default()
        };
        let err = execute(Action::Lock, &root.path().join("missing.txt"), &config, false).unwrap_err();
        assert!(matches!(err, OwError::PathNotFound(_)));
    }

    #[test]
    fn path_outside_sync_folder_is_a_validation_error() {
        let root = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();
        let file = other.path().join("a.txt");
        std::fs::write(&file, b"a").unwrap();
        let config = Config {
            server: "http://127.0.0.1:9".into(),
            local_sync_folder: root.path().to_path_buf(),
            password: "x".into(),
            ..Config::default()
        };
        let err = execute(Action::InternalLink, &file, &config, false).unwrap_err();
        assert!(err.is_local());
    }

    #[test]
    fn configured_password_is_kept() {
        let mut config = Config {
            password: "secret".into(),
            ..Config::default()
        };
        ensure_password(&mut config).unwrap();
        assert_eq!(config.password, "secret");
    }
}
