//! Plain-text renderer used by the command-line front end.

use super::model::{CardView, ListView, ResourceListView};
use crate::messages::Messages;

const WRAP_WIDTH: usize = 70;
const SEPARATOR_WIDTH: usize = 50;

/// All cards separated by rules, or the empty-state line.
#[must_use]
pub fn render_list(list: &ListView, messages: &Messages) -> String {
    if list.empty_visible {
        return format!("{}\n", messages.empty_state);
    }
    let rule = "-".repeat(SEPARATOR_WIDTH);
    list.cards
        .iter()
        .map(|card| format!("{}{rule}\n", render_card(card, messages)))
        .collect()
}

#[must_use]
pub fn render_card(card: &CardView, messages: &Messages) -> String {
    let mut lines = vec![
        format!("{}: {}", card.heading, card.title),
        format!("{}: {}", messages.created_label, card.date),
        format!("{}:", messages.idea_label),
    ];
    lines.extend(wrap(&card.idea, WRAP_WIDTH).into_iter().map(|l| format!("  {l}")));
    lines.push(format!("{}:", messages.resources_label));

    match &card.resources {
        ResourceListView::Placeholder(text) => lines.push(format!("  {text}")),
        ResourceListView::Items(items) => {
            for (index, item) in items.iter().enumerate() {
                lines.push(format!("  {}. {}", index + 1, item.title));
                lines.extend(wrap(&item.snippet, WRAP_WIDTH).into_iter().map(|l| format!("     {l}")));
                if let Some(url) = &item.url {
                    lines.push(format!("     {}: {url}", messages.link_label));
                }
            }
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Greedy word wrap. Words longer than `width` get a line of their own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = current.chars().count() + usize::from(!current.is_empty()) + word.chars().count();
        if !current.is_empty() && needed > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
#[path = "text_test.rs"]
mod tests;
