// Output rendering: the single line printed on stdout for each action.

use crate::api::ShareDescriptor;
use quick_xml::escape::partial_escape;

/// `<a href="{internal_url}">{relative}</a>`
pub fn html_link(internal_url: &str, relative: &str) -> String {
    format!(r#"<a href="{}">{}</a>"#, internal_url, partial_escape(relative))
}

/// Preview image wrapped in a link to the large rendition.
pub fn quick_album(share: &ShareDescriptor) -> String {
    format!(
        r#"<a href="{}"><img src="{}"></a>"#,
        share.large_image_url, share.preview_image_url
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{internal_url, public_preview_url, LARGE_IMAGE_SIZE, PREVIEW_IMAGE_SIZE};
    use crate::config::Config;

    #[test]
    fn html_link_matches_expected_markup() {
        let config = Config {
            server: "http://localhost:8080".into(),
            ..Config::default()
        };
        assert_eq!(
            html_link(&internal_url(&config, "42"), "photos/cat.jpg"),
            r#"<a href="http://localhost:8080/f/42">photos/cat.jpg</a>"#
        );
    }

    #[test]
    fn link_text_is_escaped() {
        assert_eq!(
            html_link("http://h/f/1", "a<b>&c.txt"),
            r#"<a href="http://h/f/1">a&lt;b&gt;&amp;c.txt</a>"#
        );
    }

    #[test]
    fn quick_album_wraps_preview_in_large_link() {
        let config = Config {
            server: "http://localhost:8080".into(),
            ..Config::default()
        };
        let share = ShareDescriptor {
            public_share_url: "http://localhost:8080/s/tok1".into(),
            file_id: "99".into(),
            token: "tok1".into(),
            large_image_url: public_preview_url(&config, "tok1", "99", LARGE_IMAGE_SIZE),
            preview_image_url: public_preview_url(&config, "tok1", "99", PREVIEW_IMAGE_SIZE),
        };
        assert_eq!(
            quick_album(&share),
            "<a href=\"http://localhost:8080/apps/files_sharing/publicpreview/tok1?file=/&fileId=99&x=4096&y=4096&a=true\">\
             <img src=\"http://localhost:8080/apps/files_sharing/publicpreview/tok1?file=/&fileId=99&x=300&y=300&a=true\"></a>"
        );
    }
}
