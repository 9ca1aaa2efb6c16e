pub mod filter;
pub mod listing;
pub mod matcher;
pub mod pagination;
pub mod session;
pub mod state;

pub use filter::{apply, canonical_city, FilterOutcome, CITIES};
pub use listing::{city_counts, featured};
pub use matcher::{matches, searchable_query, MIN_QUERY_CHARS};
pub use pagination::{paginate, window, PageButton, PageButtonKind};
pub use session::{Debouncer, RequestTicket, SearchAction, SearchEvent, SearchSession};
pub use state::{FilterState, ALL};

use crate::models::{Place, SearchResult};

/// Places shown per page when the caller does not say otherwise
pub const DEFAULT_PER_PAGE: usize = 6;

/// Filtered, paged listing ready for a renderer
#[derive(Debug, Clone, PartialEq)]
pub enum SearchView {
    /// Default / featured content instead of results
    Default,
    Results {
        title: String,
        result: SearchResult,
        buttons: Vec<PageButton>,
    },
}

/// Runs the filter pipeline over an in-memory collection and pages the matches
pub fn run(places: &[Place], state: &FilterState, per_page: usize) -> SearchView {
    match apply(places, state) {
        FilterOutcome::ShowAll => SearchView::Default,
        FilterOutcome::Filtered { title, places } => {
            let result = paginate(&places, state.page, per_page);
            let buttons = window(result.page, result.pages);
            SearchView::Results {
                title,
                result,
                buttons,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn places(n: i64) -> Vec<Place> {
        (1..=n)
            .map(|id| Place {
                id,
                name: format!("Konditori {id}"),
                city: "Stockholm".into(),
                address: None,
                description: None,
                rating: None,
                features: vec!["kanelbullar".into()],
                images: vec![],
            })
            .collect()
    }

    #[test]
    fn run_pages_filtered_results() {
        let state = FilterState {
            specialty: "kanelbullar".into(),
            page: 2,
            ..Default::default()
        };

        let SearchView::Results { result, buttons, .. } = run(&places(14), &state, 6) else {
            panic!("expected results");
        };
        assert_eq!(result.places.len(), 6);
        assert_eq!((result.total, result.page, result.pages), (14, 2, 3));
        assert!(buttons.iter().any(|b| b.active && b.page == 2));
    }

    #[test]
    fn run_hides_pagination_for_one_page() {
        let SearchView::Results { buttons, result, .. } =
            run(&places(3), &FilterState::default(), DEFAULT_PER_PAGE)
        else {
            panic!("expected results");
        };
        assert_eq!(result.pages, 1);
        assert!(buttons.is_empty());
    }

    #[test]
    fn run_survives_out_of_range_page_attribute() {
        let state = FilterState::from_attributes([
            ("specialty", "kanelbullar"),
            ("page", "18446744073709551615"),
        ]);
        let SearchView::Results { result, buttons, .. } = run(&places(14), &state, 6) else {
            panic!("expected results");
        };
        assert!(result.places.is_empty());
        assert_eq!((result.total, result.pages), (14, 3));
        assert!(buttons.iter().all(|b| !b.active));
        assert!(buttons.last().unwrap().disabled);
    }

    #[test]
    fn run_passes_show_all_through() {
        let state = FilterState {
            feature: ALL.into(),
            ..Default::default()
        };
        assert_eq!(run(&places(3), &state, 6), SearchView::Default);
    }
}
