//! Windowing over a countable result cursor, formatted into one paged
//! message with a navigation row.

use crate::{keyboard::InlineKeyboardMarkup, Error, Result};

/// Separator between items on a page.
pub const PAGE_DELIMITER: &str = "::::::::::::::::::::::::::::::::::::::\n";

pub const DEFAULT_ITEMS_PER_PAGE: usize = 3;

/// Callback-data prefix for the navigation buttons.
pub const DEFAULT_PAGE_PREFIX: &str = "list";

/// A validated page request: 1-based page index and a positive page size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    per_page: usize,
}

impl PageRequest {
    pub fn new(page: usize, per_page: usize) -> Result<Self> {
        if page < 1 {
            return Err(Error::Validation(format!(
                "page index must be >= 1, got {page}"
            )));
        }
        if per_page < 1 {
            return Err(Error::Validation(format!(
                "items per page must be >= 1, got {per_page}"
            )));
        }
        Ok(Self { page, per_page })
    }

    pub fn first_page() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// 1-based position of the first item on this page.
    pub fn first_item_position(&self) -> usize {
        (self.page - 1) * self.per_page + 1
    }

    pub fn total_pages(&self, item_count: usize) -> usize {
        item_count.div_ceil(self.per_page)
    }
}

/// Format the items belonging to one page of `items`.
///
/// The navigation row is appended to `keyboard` before any item is
/// formatted, so `format_item` may add per-item rows below it. Items are
/// joined by `delimiter` with no leading or trailing copy. Iteration stops
/// as soon as the page window is filled; a page past the end yields an
/// empty string.
///
/// The cursor must know its length up front (`ExactSizeIterator`) — lazy
/// cursors are counted or materialized by the caller first.
pub fn paginate_items<T, I, F>(
    items: I,
    request: PageRequest,
    keyboard: &mut InlineKeyboardMarkup,
    prefix: &str,
    delimiter: &str,
    mut format_item: F,
) -> String
where
    I: IntoIterator<Item = T>,
    I::IntoIter: ExactSizeIterator,
    F: FnMut(&T, &mut InlineKeyboardMarkup) -> String,
{
    let iter = items.into_iter();
    let total_pages = request.total_pages(iter.len());
    keyboard.add_page_navigation(request.page, total_pages, prefix);

    let skip = request.first_item_position() - 1;
    let mut message = String::new();
    for (shown, item) in iter.skip(skip).take(request.per_page).enumerate() {
        if shown > 0 {
            message.push_str(delimiter);
        }
        message.push_str(&format_item(&item, keyboard));
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::InlineKeyboardButton;

    fn seven_items() -> Vec<String> {
        (1..=7).map(|n| format!("item{n}")).collect()
    }

    #[test]
    fn rejects_zero_page_and_zero_size() {
        assert!(PageRequest::new(0, 3).is_err());
        assert!(PageRequest::new(1, 0).is_err());
    }

    #[test]
    fn window_sizes_over_seven_items() {
        for (page, expected_len, expected_delims) in [(1, 3, 2), (2, 3, 2), (3, 1, 0)] {
            let request = PageRequest::new(page, 3).unwrap();
            assert_eq!(request.total_pages(7), 3);

            let mut keyboard = InlineKeyboardMarkup::new();
            let out = paginate_items(
                seven_items(),
                request,
                &mut keyboard,
                DEFAULT_PAGE_PREFIX,
                PAGE_DELIMITER,
                |item, _| item.clone(),
            );

            assert_eq!(out.matches("item").count(), expected_len, "page {page}");
            assert_eq!(
                out.matches(PAGE_DELIMITER).count(),
                expected_delims,
                "page {page}"
            );
            assert!(!out.starts_with(PAGE_DELIMITER));
            assert!(!out.ends_with(PAGE_DELIMITER));
        }
    }

    #[test]
    fn page_windows_hold_the_right_items() {
        let request = PageRequest::new(2, 3).unwrap();
        let mut keyboard = InlineKeyboardMarkup::new();
        let out = paginate_items(
            seven_items(),
            request,
            &mut keyboard,
            "list",
            ", ",
            |item, _| item.clone(),
        );
        assert_eq!(out, "item4, item5, item6");
    }

    #[test]
    fn page_past_the_end_is_empty_without_error() {
        let request = PageRequest::new(4, 3).unwrap();
        let mut keyboard = InlineKeyboardMarkup::new();
        let out = paginate_items(
            seven_items(),
            request,
            &mut keyboard,
            "list",
            PAGE_DELIMITER,
            |item, _| item.clone(),
        );
        assert_eq!(out, "");
    }

    #[test]
    fn navigation_row_is_added_before_items_format() {
        let request = PageRequest::new(1, 3).unwrap();
        let mut keyboard = InlineKeyboardMarkup::new();
        let mut rows_seen_by_formatter = Vec::new();

        paginate_items(
            seven_items(),
            request,
            &mut keyboard,
            "list",
            PAGE_DELIMITER,
            |item, kb| {
                rows_seen_by_formatter.push(kb.rows().len());
                kb.add_row(vec![InlineKeyboardButton::callback(
                    item.clone(),
                    format!("open/{item}"),
                )]);
                item.clone()
            },
        );

        // The first formatter call already sees the navigation row.
        assert_eq!(rows_seen_by_formatter[0], 1);
        // Navigation row plus one row per formatted item.
        assert_eq!(keyboard.rows().len(), 4);
    }

    #[test]
    fn stops_iterating_once_the_window_is_filled() {
        let request = PageRequest::new(1, 3).unwrap();
        let mut keyboard = InlineKeyboardMarkup::new();
        let mut formatted = 0usize;

        paginate_items(
            seven_items(),
            request,
            &mut keyboard,
            "list",
            PAGE_DELIMITER,
            |item, _| {
                formatted += 1;
                item.clone()
            },
        );

        assert_eq!(formatted, 3);
    }

    #[test]
    fn first_item_position_is_one_based() {
        let request = PageRequest::new(3, 4).unwrap();
        assert_eq!(request.first_item_position(), 9);
    }
}
