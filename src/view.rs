use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::models::{Activity, ActivityDirectory};

pub const LOADING_TEXT: &str = "Loading activities...";
pub const LOAD_FAILED_TEXT: &str = "Failed to load activities. Please try again later.";
pub const NO_PARTICIPANTS_TEXT: &str = "No participants yet — be the first!";
pub const SELECT_PLACEHOLDER: &str = "-- Select an activity --";
pub const PARTICIPANT_ICON: &str = "\u{1F464}";

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Full,
    Low,
    Ok,
}

impl Availability {
    pub fn from_spots_left(spots_left: i64) -> Self {
        match spots_left {
            0 => Availability::Full,
            n if n <= 3 => Availability::Low,
            _ => Availability::Ok,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Availability::Full => "spots-full",
            Availability::Low => "spots-low",
            Availability::Ok => "spots-ok",
        }
    }
}

/// One rendered activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityCard {
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub spots_left: i64,
    pub max_participants: u32,
    pub participants: Vec<String>,
}

impl ActivityCard {
    pub fn new(name: &str, activity: &Activity) -> Self {
        Self {
            name: name.to_string(),
            description: activity.description.clone(),
            schedule: activity.schedule.clone(),
            spots_left: activity.spots_left(),
            max_participants: activity.max_participants,
            participants: activity.participants.clone(),
        }
    }

    pub fn availability(&self) -> Availability {
        Availability::from_spots_left(self.spots_left)
    }

    pub fn badge_class(&self) -> &'static str {
        self.availability().css_class()
    }

    pub fn spots_label(&self) -> String {
        let plural = if self.spots_left == 1 { "" } else { "s" };
        format!("{} spot{plural} left", self.spots_left)
    }

    /// Header of the participants section, `current / max`.
    pub fn participant_count(&self) -> String {
        format!("{} / {}", self.participants.len(), self.max_participants)
    }

    pub fn has_participants(&self) -> bool {
        !self.participants.is_empty()
    }

    pub fn unregister_title(&self, participant: &str) -> String {
        format!("Unregister {participant}")
    }

    /// Host route that unregisters a participant from this activity.
    pub fn unregister_action(&self) -> String {
        format!("/activities/{}/unregister", urlencoding::encode(&self.name))
    }
}

/// The list area. Every successful load replaces it wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ActivityList {
    #[default]
    Loading,
    Rendered(Vec<ActivityCard>),
    Failed,
}

impl ActivityList {
    pub fn render(&mut self, directory: &ActivityDirectory) {
        let cards = directory
            .iter()
            .map(|(name, activity)| ActivityCard::new(name, activity))
            .collect();
        *self = ActivityList::Rendered(cards);
    }

    pub fn fail(&mut self) {
        *self = ActivityList::Failed;
    }

    pub fn cards(&self) -> &[ActivityCard] {
        match self {
            ActivityList::Rendered(cards) => cards,
            _ => &[],
        }
    }

    /// Text shown in place of cards, if any.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            ActivityList::Loading => Some(LOADING_TEXT),
            ActivityList::Failed => Some(LOAD_FAILED_TEXT),
            ActivityList::Rendered(_) => None,
        }
    }
}

/// Options of the activity selection control used by the signup form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivitySelect {
    options: Vec<String>,
}

impl ActivitySelect {
    pub fn clear(&mut self) {
        self.options.clear();
    }

    pub fn append(&mut self, name: &str) {
        self.options.push(name.to_string());
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn placeholder(&self) -> &'static str {
        SELECT_PLACEHOLDER
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub email: String,
    pub activity: String,
}

impl SignupForm {
    pub fn fill(&mut self, email: &str, activity: &str) {
        self.email = email.to_string();
        self.activity = activity.to_string();
    }

    pub fn reset(&mut self) {
        *self = SignupForm::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

impl MessageKind {
    pub fn css_class(self) -> &'static str {
        match self {
            MessageKind::Success => "success",
            MessageKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: MessageKind,
    pub hidden: bool,
    generation: u64,
}

impl Default for StatusMessage {
    fn default() -> Self {
        Self {
            text: String::new(),
            kind: MessageKind::Success,
            hidden: true,
            generation: 0,
        }
    }
}

impl StatusMessage {
    pub fn class_name(&self) -> String {
        if self.hidden {
            format!("{} hidden", self.kind.css_class())
        } else {
            self.kind.css_class().to_string()
        }
    }
}

/// Status message area of the signup form.
///
/// Each message hides itself after `hide_after`. Showing a new message
/// cancels the pending hide of the previous one, so a newer message is never
/// hidden early.
pub struct StatusArea {
    message: Arc<Mutex<StatusMessage>>,
    pending_hide: Mutex<Option<JoinHandle<()>>>,
    hide_after: Duration,
}

impl StatusArea {
    pub fn new(hide_after: Duration) -> Self {
        Self {
            message: Arc::new(Mutex::new(StatusMessage::default())),
            pending_hide: Mutex::new(None),
            hide_after,
        }
    }

    /// Must be called from within a tokio runtime.
    pub fn show(&self, text: &str, kind: MessageKind) {
        let generation = {
            let mut message = lock(&self.message);
            message.text = text.to_string();
            message.kind = kind;
            message.hidden = false;
            message.generation += 1;
            message.generation
        };

        let message = Arc::clone(&self.message);
        let delay = self.hide_after;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut message = lock(&message);
            if message.generation == generation {
                message.hidden = true;
            }
        });

        if let Some(previous) = lock(&self.pending_hide).replace(handle) {
            previous.abort();
        }
    }

    pub fn current(&self) -> StatusMessage {
        lock(&self.message).clone()
    }
}

impl Drop for StatusArea {
    fn drop(&mut self) {
        if let Some(handle) = lock(&self.pending_hide).take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(max_participants: u32, participants: &[&str]) -> Activity {
        Activity {
            description: "Learn strategies and compete in chess tournaments".to_string(),
            schedule: "Fridays, 3:30 PM - 5:00 PM".to_string(),
            max_participants,
            participants: participants.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn test_availability_thresholds() {
        assert_eq!(Availability::from_spots_left(0), Availability::Full);
        assert_eq!(Availability::from_spots_left(1), Availability::Low);
        assert_eq!(Availability::from_spots_left(3), Availability::Low);
        assert_eq!(Availability::from_spots_left(4), Availability::Ok);
        assert_eq!(Availability::from_spots_left(20), Availability::Ok);
    }

    #[test]
    fn test_card_with_room() {
        let card = ActivityCard::new("Chess Club", &activity(12, &["a@x.com", "b@x.com"]));
        assert_eq!(card.spots_label(), "10 spots left");
        assert_eq!(card.badge_class(), "spots-ok");
        assert_eq!(card.participant_count(), "2 / 12");
        assert!(card.has_participants());
        assert_eq!(card.unregister_title("a@x.com"), "Unregister a@x.com");
        assert_eq!(card.unregister_action(), "/activities/Chess%20Club/unregister");
    }

    #[test]
    fn test_card_full() {
        let card = ActivityCard::new("Gym Class", &activity(3, &["p1", "p2", "p3"]));
        assert_eq!(card.spots_label(), "0 spots left");
        assert_eq!(card.badge_class(), "spots-full");
        assert_eq!(card.participant_count(), "3 / 3");
    }

    #[test]
    fn test_card_single_spot_label() {
        let card = ActivityCard::new("Drama", &activity(2, &["p1"]));
        assert_eq!(card.spots_label(), "1 spot left");
        assert_eq!(card.badge_class(), "spots-low");
    }

    #[test]
    fn test_card_without_participants() {
        let card = ActivityCard::new("Art Club", &activity(15, &[]));
        assert!(!card.has_participants());
        assert_eq!(card.participant_count(), "0 / 15");
    }

    #[test]
    fn test_list_render_replaces_failure() {
        let directory: ActivityDirectory = [
            ("Chess Club".to_string(), activity(12, &["a@x.com"])),
            ("Art Club".to_string(), activity(15, &[])),
        ]
        .into_iter()
        .collect();

        let mut list = ActivityList::default();
        assert_eq!(list.notice(), Some(LOADING_TEXT));

        list.fail();
        assert_eq!(list.notice(), Some(LOAD_FAILED_TEXT));
        assert!(list.cards().is_empty());

        list.render(&directory);
        assert_eq!(list.notice(), None);
        let names: Vec<&str> = list.cards().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Chess Club", "Art Club"]);
    }

    #[test]
    fn test_form_reset() {
        let mut form = SignupForm::default();
        form.fill("a@x.com", "Chess Club");
        assert_eq!(form.email, "a@x.com");
        form.reset();
        assert_eq!(form, SignupForm::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_hides_after_delay() {
        let status = StatusArea::new(Duration::from_secs(5));
        status.show("Signed up", MessageKind::Success);
        assert!(!status.current().hidden);
        assert_eq!(status.current().class_name(), "success");

        tokio::time::sleep(Duration::from_millis(4_900)).await;
        assert!(!status.current().hidden);

        tokio::time::sleep(Duration::from_millis(200)).await;
        tokio::task::yield_now().await;
        let message = status.current();
        assert!(message.hidden);
        assert_eq!(message.class_name(), "success hidden");
        assert_eq!(message.text, "Signed up");
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_message_cancels_pending_hide() {
        let status = StatusArea::new(Duration::from_secs(5));
        status.show("first", MessageKind::Success);

        tokio::time::sleep(Duration::from_secs(3)).await;
        status.show("second", MessageKind::Error);

        tokio::time::sleep(Duration::from_secs(3)).await;
        tokio::task::yield_now().await;
        let message = status.current();
        assert_eq!(message.text, "second");
        assert!(!message.hidden);

        tokio::time::sleep(Duration::from_secs(3)).await;
        tokio::task::yield_now().await;
        assert!(status.current().hidden);
    }
}
