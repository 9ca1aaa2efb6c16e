use serde::Serialize;

use crate::models::{Place, SearchResult};

/// Numbered buttons shown on each side of the current page
pub const WINDOW_RADIUS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageButtonKind {
    Previous,
    Number,
    Next,
}

/// One button of the pagination control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageButton {
    pub kind: PageButtonKind,
    /// Page the button leads to
    pub page: usize,
    pub active: bool,
    pub disabled: bool,
}

impl PageButton {
    fn number(page: usize, current: usize) -> Self {
        Self {
            kind: PageButtonKind::Number,
            page,
            active: page == current,
            disabled: false,
        }
    }
}

/// Page buttons for `page` of `pages`
///
/// Returns nothing when there is at most one page; the control is hidden.
pub fn window(page: usize, pages: usize) -> Vec<PageButton> {
    if pages <= 1 {
        return Vec::new();
    }

    let start = page.saturating_sub(WINDOW_RADIUS).max(1);
    let end = pages.min(page.saturating_add(WINDOW_RADIUS));

    let mut buttons = Vec::with_capacity(2 * WINDOW_RADIUS + 3);
    buttons.push(PageButton {
        kind: PageButtonKind::Previous,
        page: page.saturating_sub(1),
        active: false,
        disabled: page <= 1,
    });
    buttons.extend((start..=end).map(|n| PageButton::number(n, page)));
    buttons.push(PageButton {
        kind: PageButtonKind::Next,
        page: page.saturating_add(1),
        active: false,
        disabled: page >= pages,
    });
    buttons
}

/// Number of pages needed for `total` items; 0 when there are none
pub fn page_count(total: usize, per_page: usize) -> usize {
    total.div_ceil(per_page.max(1))
}

/// Cuts page `page` (1-based) out of an already filtered collection
///
/// A page past the end yields no places but keeps the real totals.
pub fn paginate(places: &[Place], page: usize, per_page: usize) -> SearchResult {
    let per_page = per_page.max(1);
    let page = page.max(1);
    let total = places.len();

    let slice = places
        .iter()
        .skip((page - 1).saturating_mul(per_page))
        .take(per_page)
        .cloned()
        .collect();

    SearchResult {
        places: slice,
        total,
        page,
        pages: page_count(total, per_page),
        per_page: Some(per_page),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(buttons: &[PageButton]) -> Vec<usize> {
        buttons
            .iter()
            .filter(|b| b.kind == PageButtonKind::Number)
            .map(|b| b.page)
            .collect()
    }

    #[test]
    fn single_page_hides_control() {
        for page in 0..4 {
            assert!(window(page, 0).is_empty());
            assert!(window(page, 1).is_empty());
        }
    }

    #[test]
    fn window_is_centered_and_clipped() {
        for pages in 2..12 {
            for page in 1..=pages {
                let buttons = window(page, pages);
                let expected: Vec<usize> =
                    (page.saturating_sub(2).max(1)..=pages.min(page + 2)).collect();
                assert_eq!(numbers(&buttons), expected, "page {page} of {pages}");

                let active: Vec<_> = buttons.iter().filter(|b| b.active).collect();
                assert_eq!(active.len(), 1);
                assert_eq!(active[0].page, page);
            }
        }
    }

    #[test]
    fn last_page_disables_next() {
        let buttons = window(5, 5);
        assert_eq!(numbers(&buttons), vec![3, 4, 5]);

        let next = buttons.last().unwrap();
        assert_eq!(next.kind, PageButtonKind::Next);
        assert!(next.disabled);
        assert_eq!(next.page, 6);

        let previous = buttons.first().unwrap();
        assert_eq!(previous.kind, PageButtonKind::Previous);
        assert!(!previous.disabled);
        assert_eq!(previous.page, 4);
    }

    #[test]
    fn first_page_disables_previous() {
        let buttons = window(1, 8);
        assert!(buttons[0].disabled);
        assert_eq!(numbers(&buttons), vec![1, 2, 3]);
        assert!(!buttons.last().unwrap().disabled);
    }

    #[test]
    fn huge_page_does_not_overflow() {
        let buttons = window(usize::MAX, 3);
        assert!(numbers(&buttons).is_empty());
        assert!(buttons.last().unwrap().disabled);
        assert_eq!(buttons.last().unwrap().page, usize::MAX);

        let beyond = paginate(&[], usize::MAX, 6);
        assert!(beyond.places.is_empty());
        assert_eq!(beyond.page, usize::MAX);
    }

    #[test]
    fn page_count_convention() {
        assert_eq!(page_count(0, 6), 0);
        assert_eq!(page_count(6, 6), 1);
        assert_eq!(page_count(7, 6), 2);
        assert_eq!(page_count(3, 0), 3);
    }

    #[test]
    fn paginate_slices_and_keeps_totals() {
        let places: Vec<Place> = (1..=7)
            .map(|id| Place {
                id,
                name: format!("Café {id}"),
                city: "Uppsala".into(),
                address: None,
                description: None,
                rating: None,
                features: vec![],
                images: vec![],
            })
            .collect();

        let second = paginate(&places, 2, 3);
        assert_eq!(second.places.iter().map(|p| p.id).collect::<Vec<_>>(), vec![4, 5, 6]);
        assert_eq!((second.total, second.page, second.pages), (7, 2, 3));

        let beyond = paginate(&places, 9, 3);
        assert!(beyond.places.is_empty());
        assert_eq!((beyond.total, beyond.pages), (7, 3));

        let empty = paginate(&[], 1, 3);
        assert_eq!((empty.total, empty.pages), (0, 0));
    }
}
