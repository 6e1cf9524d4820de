//! Dashboard tunables.
//!
//! Surfaces build a [`DashboardConfig`] from their own configuration layer;
//! the dashboard never reads the environment.

use std::time::Duration;

/// Page sizes offered by every list screen.
pub const PAGE_SIZE_OPTIONS: [u32; 5] = [5, 10, 25, 50, 100];

/// Default base of the per-recipient unsubscribe link.
pub const DEFAULT_UNSUBSCRIBE_BASE: &str = "https://yourfrontend.com/unsubscribe";

/// Default page size for the recipient screen.
pub const DEFAULT_RECIPIENT_PAGE_SIZE: u32 = 10;

/// Default page size for the template screen.
pub const DEFAULT_TEMPLATE_PAGE_SIZE: u32 = 5;

/// Number of templates fetched in one window before local paging.
pub const DEFAULT_TEMPLATE_FETCH_WINDOW: u32 = 10;

/// Lifetime of transient notifications.
pub const DEFAULT_NOTIFICATION_LIFETIME: Duration = Duration::from_secs(4);

/// Tunables shared by the dashboard screens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Base URL of the per-recipient unsubscribe link; the record id is appended.
    pub unsubscribe_base: String,
    /// Unsubscribe URL embedded in bulk-send footers; `{{email}}` is left for
    /// the collaborator to substitute per recipient.
    pub send_unsubscribe_url: String,
    /// Initial recipient page size.
    pub recipient_page_size: u32,
    /// Initial template page size.
    pub template_page_size: u32,
    /// Template fetch window.
    pub template_fetch_window: u32,
    /// Lifetime of transient notifications.
    pub notification_lifetime: Duration,
}

impl DashboardConfig {
    /// Configuration whose send footer points at the collaborator's
    /// unsubscribe endpoint under `api_base`.
    #[must_use]
    pub fn for_api_base(api_base: &str) -> Self {
        Self {
            send_unsubscribe_url: send_unsubscribe_url(api_base),
            ..Self::default()
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            unsubscribe_base: DEFAULT_UNSUBSCRIBE_BASE.to_string(),
            send_unsubscribe_url: send_unsubscribe_url("http://127.0.0.1:5018/api"),
            recipient_page_size: DEFAULT_RECIPIENT_PAGE_SIZE,
            template_page_size: DEFAULT_TEMPLATE_PAGE_SIZE,
            template_fetch_window: DEFAULT_TEMPLATE_FETCH_WINDOW,
            notification_lifetime: DEFAULT_NOTIFICATION_LIFETIME,
        }
    }
}

fn send_unsubscribe_url(api_base: &str) -> String {
    format!(
        "{}/email/unsubscribe?email={{{{email}}}}",
        api_base.trim_end_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_link_targets_api_base() {
        let config = DashboardConfig::for_api_base("http://mail.local/api/");
        assert_eq!(
            config.send_unsubscribe_url,
            "http://mail.local/api/email/unsubscribe?email={{email}}"
        );
        assert_eq!(config.recipient_page_size, 10);
        assert_eq!(config.template_page_size, 5);
    }
}
