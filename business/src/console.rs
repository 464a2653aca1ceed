//! The admin console: every business component wired around one session.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::warn;

use crate::BusinessConfig;
use crate::directory::{DirectoryClient, MutationWorkflow, RefreshOutcome, UserListController};
use crate::login::{self, AuthState, AuthStatus, Credentials, LoginError};
use crate::notify::{self, Notices, Notifier};
use crate::session::{Session, SessionError, TokenStore};

#[derive(Debug)]
pub struct AdminConsole {
    config: BusinessConfig,
    session: Session,
    client: DirectoryClient,
    notifier: Notifier,
    notices: Notices,
    auth: Mutex<AuthState>,
    list: Arc<UserListController>,
    workflow: MutationWorkflow,
}

impl AdminConsole {
    /// Build a console whose session is restored from `store`.
    pub fn new(config: BusinessConfig, store: impl TokenStore + 'static) -> Self {
        let session = Session::restore(store);
        let client = DirectoryClient::new(&config, session.clone());
        let (notifier, notices) = notify::channel();
        let list = Arc::new(UserListController::new(
            client.clone(),
            notifier.clone(),
            config.page_size,
        ));
        let workflow = MutationWorkflow::new(client.clone(), Arc::clone(&list), notifier.clone());

        let mut auth = AuthState::new();
        if session.is_authenticated() {
            auth.status = AuthStatus::LoggedIn;
        }

        Self {
            config,
            session,
            client,
            notifier,
            notices,
            auth: Mutex::new(auth),
            list,
            workflow,
        }
    }

    fn auth_lock(&self) -> MutexGuard<'_, AuthState> {
        self.auth.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sign in, then load the first page.
    ///
    /// A failed first fetch does not fail the login; it shows up in the list status.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), LoginError> {
        self.auth_lock().start_login();

        if let Err(err) =
            login::sign_in(&self.client, &self.session, credentials, &self.notifier).await
        {
            self.auth_lock().login_failed(err.to_string());
            return Err(err);
        }
        self.auth_lock().login_success(credentials.email.clone());

        let first_page = match self.list.set_window(1, self.config.page_size).await {
            Ok(RefreshOutcome::Unchanged) => self.list.refresh().await,
            other => other,
        };
        if let Err(err) = first_page {
            warn!("console: first page after login failed: {err}");
        }
        Ok(())
    }

    /// Forget the token and close any open edit or delete.
    pub fn logout(&self) -> Result<(), SessionError> {
        self.workflow.reset();
        self.auth_lock().logout();
        login::sign_out(&self.session)
    }

    pub fn auth_state(&self) -> AuthState {
        self.auth_lock().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn config(&self) -> &BusinessConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn client(&self) -> &DirectoryClient {
        &self.client
    }

    pub fn list(&self) -> &UserListController {
        &self.list
    }

    pub fn workflow(&self) -> &MutationWorkflow {
        &self.workflow
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }
}
