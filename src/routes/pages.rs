//! Server-rendered page and its form fallbacks.
//!
//! `GET /` draws the same `PageView` the CLI uses, built straight from the
//! store. The two forms post here and redirect back with a `Notice` key in
//! the `toast` query parameter; unknown keys show no toast. A rejected
//! create also carries its fields back so the form keeps what was typed.

use axum::Form;
use axum::extract::{Path, Query, State};
use axum::response::{Html, Redirect};
use reqwest::Url;
use serde::Deserialize;

use super::bubbles;
use crate::messages::Notice;
use crate::model::{BubbleCollection, FormFields};
use crate::state::AppState;
use crate::view::html;
use crate::view::model::{self, PageView, ToastView};

#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    pub toast: Option<String>,
    pub title: Option<String>,
    pub idea: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub idea: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct FetchForm {
    #[serde(default)]
    pub query: String,
}

/// `GET /` — the bubble page.
pub async fn index(State(state): State<AppState>, Query(query): Query<IndexQuery>) -> Html<String> {
    let collection = BubbleCollection { bubbles: state.store.list().await };
    let toast = query
        .toast
        .as_deref()
        .and_then(Notice::from_key)
        .map(|notice| ToastView { message: state.messages.notice(notice).to_string(), visible: true })
        .unwrap_or_default();
    let create_form: FormFields = [("title", query.title), ("idea", query.idea)]
        .into_iter()
        .filter_map(|(name, value)| Some((name.to_string(), value?)))
        .collect();
    let page = PageView { list: model::render_list(&collection, state.messages), toast, create_form };
    Html(html::render_page(&page, state.messages))
}

/// `POST /bubbles` — create from the page form.
pub async fn create_form(State(state): State<AppState>, Form(form): Form<CreateForm>) -> Redirect {
    match bubbles::create(&state, &form.title, &form.idea).await {
        Ok(_) => redirect_with_toast(Notice::Created, &[]),
        Err(failure) => {
            let typed = [("title", form.title.as_str()), ("idea", form.idea.as_str())];
            redirect_with_toast(failure.notice(), &typed)
        }
    }
}

/// `POST /bubbles/:id/fetch` — resource query from a card form.
pub async fn fetch_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<FetchForm>,
) -> Redirect {
    let notice = match bubbles::fetch(&state, &id, &form.query).await {
        Ok(_) => Notice::ResourcesUpdated,
        Err(failure) => failure.notice(),
    };
    redirect_with_toast(notice, &[])
}

/// `303` back to the page with the notice key and any `fields` to refill.
pub(crate) fn redirect_with_toast(notice: Notice, fields: &[(&str, &str)]) -> Redirect {
    Redirect::to(&toast_location(notice, fields))
}

pub(crate) fn toast_location(notice: Notice, fields: &[(&str, &str)]) -> String {
    let Ok(mut url) = Url::parse("http://localhost/") else {
        return "/".to_string();
    };
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("toast", notice.key());
        for (name, value) in fields {
            pairs.append_pair(name, value);
        }
    }
    format!("/?{}", url.query().unwrap_or_default())
}

#[cfg(test)]
#[path = "pages_test.rs"]
mod tests;
