use serde::Serialize;

/// Inline keyboard markup in the Bot API wire shape
/// (`{"inline_keyboard": [[...]]}`). Serialized as a JSON parameter via
/// `Params::push_json`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardMarkup {
    inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl InlineKeyboardButton {
    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: Some(data.into()),
            url: None,
        }
    }

    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: None,
            url: Some(url.into()),
        }
    }
}

impl InlineKeyboardMarkup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a full row of buttons.
    pub fn add_row(&mut self, row: Vec<InlineKeyboardButton>) {
        self.inline_keyboard.push(row);
    }

    /// Append a button to the last row, starting one if needed.
    pub fn add_button(&mut self, button: InlineKeyboardButton) {
        match self.inline_keyboard.last_mut() {
            Some(row) => row.push(button),
            None => self.inline_keyboard.push(vec![button]),
        }
    }

    pub fn rows(&self) -> &[Vec<InlineKeyboardButton>] {
        &self.inline_keyboard
    }

    pub fn is_empty(&self) -> bool {
        self.inline_keyboard.is_empty()
    }

    /// Append one row of page-browsing buttons for a paged list.
    ///
    /// Up to five buttons: the current page is labelled `• n •` with inert
    /// callback data, other pages carry `{prefix}/{n}` so the callback
    /// handler can route to the right page. With more than five pages a
    /// three-page window around the current page is shown, with jump buttons
    /// to the first and last page outside it.
    pub fn add_page_navigation(&mut self, page: usize, total_pages: usize, prefix: &str) {
        if total_pages == 0 {
            return;
        }

        let mut row = Vec::new();
        if total_pages <= 5 {
            for n in 1..=total_pages {
                row.push(page_button(n, page, prefix));
            }
        } else {
            let start = page.saturating_sub(1).clamp(1, total_pages - 2);
            if start > 1 {
                row.push(InlineKeyboardButton::callback("« 1", format!("{prefix}/1")));
            }
            for n in start..=start + 2 {
                row.push(page_button(n, page, prefix));
            }
            if start + 2 < total_pages {
                row.push(InlineKeyboardButton::callback(
                    format!("{total_pages} »"),
                    format!("{prefix}/{total_pages}"),
                ));
            }
        }
        self.inline_keyboard.push(row);
    }
}

fn page_button(n: usize, current: usize, prefix: &str) -> InlineKeyboardButton {
    if n == current {
        InlineKeyboardButton::callback(format!("• {n} •"), "none")
    } else {
        InlineKeyboardButton::callback(n.to_string(), format!("{prefix}/{n}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(markup: &InlineKeyboardMarkup) -> Vec<String> {
        markup.rows()[0].iter().map(|b| b.text.clone()).collect()
    }

    #[test]
    fn few_pages_show_all() {
        let mut markup = InlineKeyboardMarkup::new();
        markup.add_page_navigation(2, 3, "list");

        assert_eq!(labels(&markup), vec!["1", "• 2 •", "3"]);
        assert_eq!(
            markup.rows()[0][0].callback_data.as_deref(),
            Some("list/1")
        );
        assert_eq!(markup.rows()[0][1].callback_data.as_deref(), Some("none"));
    }

    #[test]
    fn many_pages_window_around_current() {
        let mut markup = InlineKeyboardMarkup::new();
        markup.add_page_navigation(5, 9, "res");

        assert_eq!(labels(&markup), vec!["« 1", "4", "• 5 •", "6", "9 »"]);
        assert_eq!(
            markup.rows()[0][4].callback_data.as_deref(),
            Some("res/9")
        );
    }

    #[test]
    fn first_page_of_many_has_no_left_jump() {
        let mut markup = InlineKeyboardMarkup::new();
        markup.add_page_navigation(1, 9, "list");

        assert_eq!(labels(&markup), vec!["• 1 •", "2", "3", "9 »"]);
    }

    #[test]
    fn last_page_of_many_has_no_right_jump() {
        let mut markup = InlineKeyboardMarkup::new();
        markup.add_page_navigation(9, 9, "list");

        assert_eq!(labels(&markup), vec!["« 1", "7", "8", "• 9 •"]);
    }

    #[test]
    fn zero_pages_add_nothing() {
        let mut markup = InlineKeyboardMarkup::new();
        markup.add_page_navigation(1, 0, "list");
        assert!(markup.is_empty());
    }

    #[test]
    fn add_button_appends_to_the_last_row() {
        let mut markup = InlineKeyboardMarkup::new();
        markup.add_button(InlineKeyboardButton::callback("a", "pick/a"));
        markup.add_button(InlineKeyboardButton::url("docs", "https://example.com"));

        assert_eq!(markup.rows().len(), 1);
        assert_eq!(markup.rows()[0].len(), 2);
    }

    #[test]
    fn serializes_to_wire_shape() {
        let mut markup = InlineKeyboardMarkup::new();
        markup.add_row(vec![InlineKeyboardButton::callback("ok", "confirm")]);

        let json = serde_json::to_string(&markup).unwrap();
        assert_eq!(
            json,
            r#"{"inline_keyboard":[[{"text":"ok","callback_data":"confirm"}]]}"#
        );
    }
}
