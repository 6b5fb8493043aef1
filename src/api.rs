// API client module: a small blocking HTTP client that talks to the two
// Nextcloud surfaces this tool needs, WebDAV for file ids and locks and the
// OCS sharing API for public links.

use crate::config::Config;
use crate::error::{OwError, Result};
use crate::xml::{self, OWNCLOUD_NS};
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use std::fmt;
use std::time::Duration;
use tracing::debug;

pub const WEBDAV_FILE_ROOT: &str = "remote.php/dav/files";
pub const OCS_SHARE_API_ROOT: &str = "ocs/v2.php/apps/files_sharing/api/v1";

/// OCS share type for a public link.
pub const SHARE_TYPE_PUBLIC_LINK: u8 = 3;

const PROPFIND_FILEID_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<d:propfind xmlns:d="DAV:">
  <d:prop xmlns:oc="http://owncloud.org/ns">
    <oc:fileid/>
  </d:prop>
</d:propfind>"#;

/// Anything that is not a client or server error.
pub fn is_accepted(status: StatusCode) -> bool {
    (200..400).contains(&status.as_u16())
}

/// Non-empty segments of a path relative to the sync folder.
fn remote_segments(relative: &str) -> impl Iterator<Item = &str> {
    relative.split('/').filter(|s| !s.is_empty())
}

/// Server-rooted path as the sharing API expects it, always starting with `/`.
pub fn rooted_remote_path(relative: &str) -> String {
    let segments: Vec<&str> = remote_segments(relative).collect();
    format!("/{}", segments.join("/"))
}

/// WebDAV URL of a file, e.g.
/// `http://localhost:8080/remote.php/dav/files/admin/photos/cat.jpg`.
pub fn file_url(config: &Config, relative: &str) -> String {
    let mut url = format!(
        "{}/{}/{}",
        config.server,
        WEBDAV_FILE_ROOT,
        urlencoding::encode(&config.username)
    );
    for segment in remote_segments(relative) {
        url.push('/');
        url.push_str(&urlencoding::encode(segment));
    }
    url
}

pub fn shares_url(config: &Config) -> String {
    format!("{}/{}/shares", config.server, OCS_SHARE_API_ROOT)
}

/// Browser link that resolves a file by id, independent of its path.
pub fn internal_url(config: &Config, file_id: &str) -> String {
    format!("{}/f/{}", config.server, file_id)
}

/// Public preview of a shared image, auto-cropped to `size`×`size`.
pub fn public_preview_url(config: &Config, token: &str, file_id: &str, size: u32) -> String {
    format!(
        "{}/apps/files_sharing/publicpreview/{}?file=/&fileId={}&x={}&y={}&a=true",
        config.server, token, file_id, size, size
    )
}

pub const LARGE_IMAGE_SIZE: u32 = 4096;
pub const PREVIEW_IMAGE_SIZE: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockAction {
    Lock,
    Unlock,
}

impl LockAction {
    pub fn method_name(self) -> &'static str {
        match self {
            LockAction::Lock => "LOCK",
            LockAction::Unlock => "UNLOCK",
        }
    }
}

impl fmt::Display for LockAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockAction::Lock => f.write_str("lock"),
            LockAction::Unlock => f.write_str("unlock"),
        }
    }
}

/// Result of creating a public link share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareDescriptor {
    pub public_share_url: String,
    pub file_id: String,
    pub token: String,
    pub large_image_url: String,
    pub preview_image_url: String,
}

/// Blocking client bound to one configuration. Every request carries basic
/// auth and the configured timeout.
pub struct NextcloudClient<'a> {
    client: Client,
    config: &'a Config,
}

impl<'a> NextcloudClient<'a> {
    pub fn new(config: &'a Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("ow/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| OwError::Transport {
                method: "client setup".into(),
                source: e,
            })?;
        Ok(NextcloudClient { client, config })
    }

    fn send(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        build: impl FnOnce(reqwest::blocking::RequestBuilder) -> reqwest::blocking::RequestBuilder,
    ) -> Result<(StatusCode, String)> {
        let name = method.to_string();
        let req = self
            .client
            .request(method, url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .headers(headers);
        let res: Response = build(req).send().map_err(|e| OwError::Transport {
            method: name.clone(),
            source: e,
        })?;
        let status = res.status();
        let body = res.text().map_err(|e| OwError::Transport { method: name, source: e })?;
        debug!("📝 HTTP response code {}. Response text: {}", status.as_u16(), body);
        Ok((status, body))
    }

    /// PROPFIND the file's `oc:fileid` property.
    pub fn fetch_file_id(&self, file_url: &str) -> Result<String> {
        debug!("🏃 fetching internal file ID...");
        let method =
            Method::from_bytes(b"PROPFIND").map_err(|_| OwError::InvalidMethod("PROPFIND"))?;

        let mut headers = HeaderMap::new();
        headers.insert("Depth", HeaderValue::from_static("0"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/xml"));

        let (status, body) = self.send(method, file_url, headers, |r| r.body(PROPFIND_FILEID_BODY))?;
        if !is_accepted(status) {
            return Err(OwError::Status { status: status.as_u16(), body });
        }

        let file_id = parse_file_id(status, &body)?;
        debug!("🗃️ fileId is {}", file_id);
        Ok(file_id)
    }

    /// LOCK or UNLOCK a file through the Temporary files lock app.
    pub fn lock(&self, action: LockAction, file_url: &str) -> Result<()> {
        let name = action.method_name();
        let method = Method::from_bytes(name.as_bytes()).map_err(|_| OwError::InvalidMethod(name))?;

        let mut headers = HeaderMap::new();
        headers.insert("X-User-Lock", HeaderValue::from_static("1"));
        debug!("📄 request: {} {}", name, file_url);
        debug!("📎 headers: {:?}", headers);

        let (status, body) = self.send(method, file_url, headers, |r| r)?;
        if !is_accepted(status) {
            return Err(OwError::LockRejected {
                action,
                method: name,
                url: file_url.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    /// Create a public link share for a server-rooted path.
    pub fn create_public_share(&self, rooted_path: &str) -> Result<ShareDescriptor> {
        debug!("🏃 share {}...", rooted_path);

        let mut headers = HeaderMap::new();
        headers.insert("OCS-APIRequest", HeaderValue::from_static("true"));

        let share_type = SHARE_TYPE_PUBLIC_LINK.to_string();
        let form = [
            ("attributes", "[]"),
            ("path", rooted_path),
            ("shareType", share_type.as_str()),
        ];
        let url = shares_url(self.config);
        let (status, body) = self.send(Method::POST, &url, headers, |r| r.form(&form))?;
        if !is_accepted(status) {
            return Err(OwError::Status { status: status.as_u16(), body });
        }

        parse_share(self.config, status, &body)
    }
}

fn parse_file_id(status: StatusCode, body: &str) -> Result<String> {
    xml::find_text(body, Some(OWNCLOUD_NS), "fileid")?.ok_or_else(|| OwError::MissingField {
        field: "oc:fileid",
        status: status.as_u16(),
        body: body.to_string(),
    })
}

fn parse_share(config: &Config, status: StatusCode, body: &str) -> Result<ShareDescriptor> {
    let field = |name: &'static str| -> Result<String> {
        xml::find_text(body, None, name)?.ok_or_else(|| OwError::MissingField {
            field: name,
            status: status.as_u16(),
            body: body.to_string(),
        })
    };
    let public_share_url = field("url")?;
    let file_id = field("file_source")?;
    let token = field("token")?;

    Ok(ShareDescriptor {
        large_image_url: public_preview_url(config, &token, &file_id, LARGE_IMAGE_SIZE),
        preview_image_url: public_preview_url(config, &token, &file_id, PREVIEW_IMAGE_SIZE),
        public_share_url,
        file_id,
        token,
    })
}
