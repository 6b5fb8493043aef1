// Library root
// -----------
// The binary (`main.rs`) parses arguments, loads the configuration and
// hands both to `ui::execute`. Everything else lives here so the pieces
// can be tested without a terminal.
//
// Module responsibilities:
// - `config`: static settings (server, sync folder, credentials).
// - `path`: maps a local path to its location inside the sync folder.
// - `api`: WebDAV and OCS requests, URL building, response checks.
// - `xml`: element lookup in the server's XML responses.
// - `render`: the HTML snippets printed on stdout.
// - `cli` / `ui`: argument surface and action dispatch.
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod path;
pub mod render;
pub mod ui;
pub mod xml;

pub use error::{OwError, Result};
