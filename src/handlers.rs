use askama::Template;
use axum::{
    Form, Json,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect},
};
use serde::Deserialize;

use crate::{
    AppState,
    board::BoardSnapshot,
    error::AppError,
    validation::{validate_email, validate_signup},
    view::{ActivityCard, NO_PARTICIPANTS_TEXT, PARTICIPANT_ICON, SignupForm, StatusMessage},
};

#[derive(Debug, Deserialize)]
pub struct SignupFormData {
    pub email: String,
    pub activity: String,
}

#[derive(Debug, Deserialize)]
pub struct UnregisterFormData {
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct SelectOption {
    pub name: String,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "board.html")]
pub struct BoardPage {
    pub cards: Vec<ActivityCard>,
    pub list_notice: Option<&'static str>,
    pub placeholder: &'static str,
    pub options: Vec<SelectOption>,
    pub form: SignupForm,
    pub status: StatusMessage,
    pub alerts: Vec<String>,
    pub icon: &'static str,
    pub no_participants: &'static str,
}

impl BoardPage {
    pub fn new(snapshot: BoardSnapshot, alerts: Vec<String>) -> Self {
        let options = snapshot
            .select
            .options()
            .iter()
            .map(|name| SelectOption {
                name: name.clone(),
                selected: *name == snapshot.form.activity,
            })
            .collect();

        Self {
            cards: snapshot.list.cards().to_vec(),
            list_notice: snapshot.list.notice(),
            placeholder: snapshot.select.placeholder(),
            options,
            form: snapshot.form,
            status: snapshot.status,
            alerts,
            icon: PARTICIPANT_ICON,
            no_participants: NO_PARTICIPANTS_TEXT,
        }
    }
}

pub async fn board_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let page = BoardPage::new(state.board.snapshot(), state.alerts.take());
    Ok(Html(page.render()?))
}

pub async fn submit_signup(
    State(state): State<AppState>,
    Form(data): Form<SignupFormData>,
) -> Result<Redirect, AppError> {
    validate_signup(&data.email, &data.activity)?;
    state.board.submit_signup(&data.email, &data.activity).await;
    Ok(Redirect::to("/"))
}

pub async fn unregister_participant(
    State(state): State<AppState>,
    Path(activity): Path<String>,
    Form(data): Form<UnregisterFormData>,
) -> Result<Redirect, AppError> {
    validate_email(&data.email)?;
    state.board.unregister_participant(&activity, &data.email).await;
    Ok(Redirect::to("/"))
}

pub async fn refresh(State(state): State<AppState>) -> Redirect {
    state.board.load_activities().await;
    Redirect::to("/")
}

pub async fn healthz_live() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

pub async fn healthz_ready() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}
