//! HTML renderer for `PageView`.
//!
//! Every interpolated value goes through `escape_html`, and resource URLs are
//! only emitted as links for `http`/`https`; anything else is shown as text.

use super::model::{CardView, ListView, PageView, ResourceListView, ToastView};
use super::toast::TOAST_DURATION;
use crate::messages::Messages;

const STYLE: &str = "body{font-family:sans-serif;max-width:48rem;margin:2rem auto;padding:0 1rem}\
article.bubble{border:1px solid #ddd;border-radius:8px;padding:1rem;margin:1rem 0}\
.resource{border-top:1px solid #eee;padding:.5rem 0}\
.empty{color:#888}\
#toast{display:none;position:fixed;bottom:1rem;right:1rem;background:#333;color:#fff;padding:.5rem 1rem;border-radius:4px}\
@keyframes toast-hide{to{visibility:hidden}}";

/// Escape text for use in element content and quoted attribute values.
#[must_use]
pub fn escape_html(raw: &str) -> String {
    html_escape::encode_quoted_attribute(raw).into_owned()
}

/// Stylesheet with the toast hidden again after `TOAST_DURATION`.
fn style() -> String {
    format!(
        "{STYLE}#toast.show{{display:block;animation:toast-hide 0s linear {}ms forwards}}",
        TOAST_DURATION.as_millis()
    )
}

/// Whether `url` may be used as a link target.
#[must_use]
pub fn is_safe_href(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Render the full document.
#[must_use]
pub fn render_page(page: &PageView, messages: &Messages) -> String {
    let field = |name: &str| escape_html(page.create_form.get(name).map_or("", String::as_str));
    let lang = match messages.lang {
        crate::messages::Lang::En => "en",
        crate::messages::Lang::Zh => "zh",
    };

    let mut html = String::new();
    html.push_str(&format!(
        "<!doctype html>\n<html lang=\"{lang}\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>{style}</style>\n</head>\n<body>\n<h1>{title}</h1>\n",
        title = escape_html(messages.page_title),
        style = style(),
    ));
    html.push_str(&format!(
        "<form id=\"create-form\" method=\"post\" action=\"/bubbles\">\n<h2>{new}</h2>\n\
         <label>{title_label} <input name=\"title\" value=\"{title}\" required></label>\n\
         <label>{idea_label} <textarea name=\"idea\" required>{idea}</textarea></label>\n\
         <button type=\"submit\">{create}</button>\n</form>\n",
        new = escape_html(messages.new_bubble),
        title_label = escape_html(messages.title_field),
        idea_label = escape_html(messages.idea_field),
        create = escape_html(messages.create_button),
        title = field("title"),
        idea = field("idea"),
    ));
    html.push_str(&format!("<a id=\"refresh\" href=\"/\">{}</a>\n", escape_html(messages.refresh)));
    html.push_str(&render_list(&page.list, messages));
    html.push_str(&render_toast(&page.toast));
    html.push_str("</body>\n</html>\n");
    html
}

/// Empty-state element plus the list container.
#[must_use]
pub fn render_list(list: &ListView, messages: &Messages) -> String {
    let display = if list.empty_visible { "block" } else { "none" };
    let mut html = format!(
        "<p id=\"empty\" class=\"empty\" style=\"display:{display}\">{}</p>\n<section id=\"bubble-list\">\n",
        escape_html(messages.empty_state)
    );
    for card in &list.cards {
        html.push_str(&render_card(card, messages));
    }
    html.push_str("</section>\n");
    html
}

#[must_use]
pub fn render_card(card: &CardView, messages: &Messages) -> String {
    let disabled = if card.query_form.submit_enabled { "" } else { " disabled" };
    format!(
        "<article class=\"bubble\" data-id=\"{id}\">\n\
         <span class=\"bubble-id\">{heading}</span>\n\
         <h3 class=\"bubble-title\">{title}</h3>\n\
         <time class=\"bubble-date\">{date}</time>\n\
         <p class=\"bubble-idea\">{idea}</p>\n\
         <div class=\"resources\">\n{resources}</div>\n\
         <form class=\"fetch-form\" method=\"post\" action=\"/bubbles/{id}/fetch\">\n\
         <input name=\"query\" placeholder=\"{placeholder}\" required>\n\
         <button type=\"submit\"{disabled}>{fetch}</button>\n\
         </form>\n</article>\n",
        id = card.bubble_id,
        heading = escape_html(&card.heading),
        title = escape_html(&card.title),
        date = escape_html(&card.date),
        idea = escape_html(&card.idea),
        resources = render_resources(&card.resources),
        placeholder = escape_html(messages.query_placeholder),
        fetch = escape_html(messages.fetch_button),
    )
}

/// Contents of a card's `.resources` container.
#[must_use]
pub fn render_resources(resources: &ResourceListView) -> String {
    match resources {
        ResourceListView::Placeholder(text) => format!("<p class=\"empty\">{}</p>\n", escape_html(text)),
        ResourceListView::Items(items) => items
            .iter()
            .map(|item| {
                let link = match item.url.as_deref() {
                    Some(url) if is_safe_href(url) => {
                        let url = escape_html(url.trim());
                        format!("<a href=\"{url}\" target=\"_blank\" rel=\"noopener\">{url}</a>\n")
                    }
                    Some(url) => format!("<span class=\"url\">{}</span>\n", escape_html(url)),
                    None => String::new(),
                };
                format!(
                    "<div class=\"resource\">\n<h4>{}</h4>\n<p>{}</p>\n{link}</div>\n",
                    escape_html(&item.title),
                    escape_html(&item.snippet)
                )
            })
            .collect(),
    }
}

fn render_toast(toast: &ToastView) -> String {
    let class = if toast.visible { "toast show" } else { "toast" };
    format!("<div id=\"toast\" class=\"{class}\" role=\"status\">{}</div>\n", escape_html(&toast.message))
}

#[cfg(test)]
#[path = "html_test.rs"]
mod tests;
