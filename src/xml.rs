// Leaf lookup in WebDAV multistatus and OCS responses.

use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

/// Namespace of the `oc:fileid` WebDAV property.
pub const OWNCLOUD_NS: &str = "http://owncloud.org/ns";

/// Text of the first element named `local` (in `namespace`, when given)
/// anywhere in `xml`. Empty elements count as absent.
pub fn find_text(
    xml: &str,
    namespace: Option<&str>,
    local: &str,
) -> Result<Option<String>, quick_xml::Error> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut captured: Option<String> = None;
    loop {
        match reader.read_resolved_event()? {
            (ns, Event::Start(e)) if is_match(&ns, e.local_name().as_ref(), namespace, local) => {
                captured = Some(String::new());
            }
            (_, Event::Text(t)) => {
                if let Some(buf) = captured.as_mut() {
                    buf.push_str(&t.unescape()?);
                }
            }
            (_, Event::CData(c)) => {
                if let Some(buf) = captured.as_mut() {
                    buf.push_str(&String::from_utf8_lossy(&c));
                }
            }
            (ns, Event::End(e)) if is_match(&ns, e.local_name().as_ref(), namespace, local) => {
                if let Some(text) = captured.take() {
                    if !text.is_empty() {
                        return Ok(Some(text));
                    }
                }
            }
            (_, Event::Eof) => return Ok(None),
            _ => {}
        }
    }
}

fn is_match(ns: &ResolveResult, name: &[u8], want_ns: Option<&str>, want_local: &str) -> bool {
    if name != want_local.as_bytes() {
        return false;
    }
    match want_ns {
        None => true,
        Some(want) => matches!(ns, ResolveResult::Bound(Namespace(bound)) if *bound == want.as_bytes()),
    }
}
