//! Session-gated aggregate of the dashboard screens.

use std::sync::Arc;

use crate::api::{ApiClient, Transport};
use crate::config::DashboardConfig;
use crate::core::session::{ClientStorage, Session, SessionError};
use crate::core::shell::{Route, Shell, ShellError};
use crate::features::recipients::{RecipientKind, RecipientsController};
use crate::features::records::ListController;
use crate::features::templates::{TemplateKind, TemplatesController};

/// Shell plus both record screens, sharing one API client.
#[derive(Debug)]
pub struct Dashboard {
    shell: Shell,
    recipients: RecipientsController,
    templates: TemplatesController,
}

impl Dashboard {
    /// Build the dashboard, restoring the session from `storage`.
    ///
    /// # Errors
    /// Returns [`SessionError`] when durable storage cannot be read.
    pub fn new(
        config: &DashboardConfig,
        transport: Arc<dyn Transport>,
        storage: Arc<dyn ClientStorage>,
    ) -> Result<Self, SessionError> {
        let api = ApiClient::new(transport);
        let session = Session::restore(storage)?;
        Ok(Self {
            shell: Shell::new(session),
            recipients: ListController::new(
                RecipientKind::new(config.unsubscribe_base.clone()),
                api.clone(),
                config.recipient_page_size,
                config.notification_lifetime,
            ),
            templates: ListController::new(
                TemplateKind::new(
                    config.template_fetch_window,
                    config.send_unsubscribe_url.clone(),
                ),
                api,
                config.template_page_size,
                config.notification_lifetime,
            ),
        })
    }

    /// Navigation shell.
    #[must_use]
    pub const fn shell(&self) -> &Shell {
        &self.shell
    }

    /// Mutable navigation shell for login, signup, and logout.
    pub fn shell_mut(&mut self) -> &mut Shell {
        &mut self.shell
    }

    /// Recipient screen, available only with an active session.
    ///
    /// # Errors
    /// Returns [`ShellError::NotLoggedIn`] without a session.
    pub fn recipients(&mut self) -> Result<&mut RecipientsController, ShellError> {
        self.shell.open(Route::Recipients)?;
        Ok(&mut self.recipients)
    }

    /// Template screen, available only with an active session.
    ///
    /// # Errors
    /// Returns [`ShellError::NotLoggedIn`] without a session.
    pub fn templates(&mut self) -> Result<&mut TemplatesController, ShellError> {
        self.shell.open(Route::Templates)?;
        Ok(&mut self.templates)
    }
}
