//! Unsubscribe footer augmentation.
//!
//! Two footers exist. The recipient footer is appended every time a
//! recipient is saved, without checking whether one is already present. The
//! send footer is appended to template content at send time unless the
//! content already contains [`SEND_FOOTER_MARKER`].

use std::borrow::Cow;

use mailroom_api_models::RecordId;

/// Placeholder replaced by the per-recipient unsubscribe link.
pub const UNSUBSCRIBE_PLACEHOLDER: &str = "{{unsubscribe_link}}";

/// Literal whose presence suppresses the send footer.
pub const SEND_FOOTER_MARKER: &str = "Unsubscribe";

const SEND_URL_PLACEHOLDER: &str = "{{unsubscribe_url}}";

const RECIPIENT_FOOTER: &str = r#"
<br/><br/>
<hr/>
<p style="font-size: 12px; color: gray;">
You are receiving this email as part of our professional communications. 
If you do not wish to receive further emails from us, please 
<a href="{{unsubscribe_link}}">unsubscribe here</a>. 
Your preferences will be promptly updated, and we respect your privacy.
</p>
"#;

const SEND_FOOTER: &str = r#"
<br /><hr />
<p style="font-size: 13px; color: gray; text-align: center;">
  You are receiving this email as part of our professional communications.<br/>
  If you do not wish to receive further emails from us, please click below:<br/><br/>
  <a href="{{unsubscribe_url}}"
  style="background-color:#d9534f;color:white;padding:10px 20px;border-radius:5px;text-decoration:none;">
  Unsubscribe </a>
</p>
"#;

/// Unsubscribe link for a recipient; new records use `0`.
#[must_use]
pub fn unsubscribe_link(base: &str, id: Option<&RecordId>) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        id.map_or("0", RecordId::as_str)
    )
}

/// Recipient footer markup with the placeholder resolved to `link`.
#[must_use]
pub fn recipient_footer(link: &str) -> String {
    RECIPIENT_FOOTER.replace(UNSUBSCRIBE_PLACEHOLDER, link)
}

/// Body stored for a recipient: `body` followed by the recipient footer.
#[must_use]
pub fn augment_recipient_content(body: &str, base: &str, id: Option<&RecordId>) -> String {
    let mut content = String::with_capacity(body.len() + RECIPIENT_FOOTER.len() + base.len());
    content.push_str(body);
    content.push_str(&recipient_footer(&unsubscribe_link(base, id)));
    content
}

/// Content dispatched for a template send.
#[must_use]
pub fn augment_for_send<'a>(content: &'a str, unsubscribe_url: &str) -> Cow<'a, str> {
    if content.contains(SEND_FOOTER_MARKER) {
        Cow::Borrowed(content)
    } else {
        Cow::Owned(format!(
            "{content}{}",
            SEND_FOOTER.replace(SEND_URL_PLACEHOLDER, unsubscribe_url)
        ))
    }
}
