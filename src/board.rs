use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::client::{ActivitiesClient, ClientError};
use crate::view::{
    ActivityList, ActivitySelect, MessageKind, SignupForm, StatusArea, StatusMessage, lock,
};

pub const UNREGISTER_FAILED_TEXT: &str = "Failed to unregister participant.";
pub const SIGNUP_REJECTED_TEXT: &str = "An error occurred";
pub const SIGNUP_FAILED_TEXT: &str = "Failed to sign up. Please try again.";

/// Blocking user notification, raised when an unregister fails.
pub trait AlertSink: Send + Sync {
    fn alert(&self, message: &str);
}

/// Queues alerts until the next page render picks them up.
#[derive(Debug, Default)]
pub struct FlashAlerts {
    pending: Mutex<Vec<String>>,
}

impl FlashAlerts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *lock(&self.pending))
    }
}

impl AlertSink for FlashAlerts {
    fn alert(&self, message: &str) {
        lock(&self.pending).push(message.to_string());
    }
}

/// Point-in-time copy of everything the board renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub list: ActivityList,
    pub select: ActivitySelect,
    pub form: SignupForm,
    pub status: StatusMessage,
}

/// Keeps the activity list, the selection control, the signup form and the
/// status area in sync with the backend.
///
/// Nothing is mutated locally: every successful signup or unregister is
/// followed by a full reload, and the last reload to finish wins.
pub struct ActivityBoard {
    client: ActivitiesClient,
    list: Mutex<ActivityList>,
    select: Mutex<ActivitySelect>,
    form: Mutex<SignupForm>,
    status: StatusArea,
    alerts: Arc<dyn AlertSink>,
}

impl ActivityBoard {
    pub fn new(
        client: ActivitiesClient,
        alerts: Arc<dyn AlertSink>,
        message_timeout: Duration,
    ) -> Self {
        Self {
            client,
            list: Mutex::new(ActivityList::default()),
            select: Mutex::new(ActivitySelect::default()),
            form: Mutex::new(SignupForm::default()),
            status: StatusArea::new(message_timeout),
            alerts,
        }
    }

    pub async fn load_activities(&self) {
        match self.client.fetch_activities().await {
            Ok(directory) => {
                debug!(count = directory.len(), "rendering activities");
                let mut list = lock(&self.list);
                let mut select = lock(&self.select);
                list.render(&directory);
                select.clear();
                for name in directory.names() {
                    select.append(name);
                }
            }
            Err(err) => {
                error!(error = %err, "error fetching activities");
                lock(&self.list).fail();
            }
        }
    }

    pub async fn unregister_participant(&self, activity: &str, email: &str) {
        match self.client.unregister(activity, email).await {
            Ok(message) => {
                info!(%activity, %email, "{message}");
                self.load_activities().await;
            }
            Err(err) => {
                if !matches!(err, ClientError::Rejected { .. }) {
                    error!(error = %err, "error unregistering participant");
                }
                let text = err.detail().unwrap_or(UNREGISTER_FAILED_TEXT);
                warn!(%activity, %email, "unregister failed: {text}");
                self.alerts.alert(text);
            }
        }
    }

    /// Handles a signup form submission for `email` and `activity`.
    pub async fn submit_signup(&self, email: &str, activity: &str) {
        lock(&self.form).fill(email, activity);

        match self.client.signup(activity, email).await {
            Ok(message) => {
                info!(%activity, %email, "signup accepted");
                self.status.show(&message, MessageKind::Success);
                lock(&self.form).reset();
                self.load_activities().await;
            }
            Err(ClientError::Rejected { detail, status }) => {
                let text = detail.as_deref().unwrap_or(SIGNUP_REJECTED_TEXT);
                warn!(%activity, %email, %status, "signup rejected: {text}");
                self.status.show(text, MessageKind::Error);
            }
            Err(err) => {
                error!(error = %err, "error signing up");
                self.status.show(SIGNUP_FAILED_TEXT, MessageKind::Error);
            }
        }
    }

    pub fn list(&self) -> ActivityList {
        lock(&self.list).clone()
    }

    pub fn select(&self) -> ActivitySelect {
        lock(&self.select).clone()
    }

    pub fn form(&self) -> SignupForm {
        lock(&self.form).clone()
    }

    pub fn status(&self) -> StatusMessage {
        self.status.current()
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            list: self.list(),
            select: self.select(),
            form: self.form(),
            status: self.status(),
        }
    }
}
