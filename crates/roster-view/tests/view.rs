use std::borrow::Cow;

use proptest::prelude::*;
use roster_model::{
    CollectionItem, Employee, EmployeeStatus, ItemId, PageSize, SelectionSet, SortSpec,
    StatusFilter,
};
use roster_view::{FilterState, ViewPage, matched};

fn employee(n: usize, first: &str, last: &str, status: EmployeeStatus) -> Employee {
    Employee {
        id: ItemId::new(format!("emp-{n}")).unwrap(),
        employee_number: format!("EMP-{n:04}"),
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase()),
        department: None,
        job_title: None,
        status,
        pay_group_id: None,
        hire_date: None,
    }
}

fn roster(count: usize) -> Vec<Employee> {
    (0..count)
        .map(|n| employee(n, "Worker", &format!("Number{n}"), EmployeeStatus::Active))
        .collect()
}

#[test]
fn twenty_three_items_page_five_clamps_to_last_page() {
    let items = roster(23);
    let mut state = FilterState::new().with_page_size(PageSize::Ten);
    // Force the cursor past the end without the holder's own clamp.
    state.set_page(5, 5);
    let page = ViewPage::compute(&items, &state);
    assert_eq!(page.page_count, 3);
    assert_eq!(page.page, 3);
    assert_eq!(page.rows.len(), 3);
    assert_eq!(page.first_row(), 21);
    assert_eq!(page.last_row(), 23);
    assert_eq!(page.rows[0].id.as_str(), "emp-20");
}

#[test]
fn search_for_john_matches_one_of_two() {
    let items = vec![
        employee(1, "John", "Doe", EmployeeStatus::Active),
        employee(2, "Jane", "Roe", EmployeeStatus::Active),
    ];
    let mut state = FilterState::new();
    state.set_search_term("john");
    let rows = matched(&items, &state);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].first_name, "John");
}

#[test]
fn search_matches_display_id_and_status_filter_combines() {
    let items = vec![
        employee(7, "John", "Doe", EmployeeStatus::Active),
        employee(8, "Johanna", "Smith", EmployeeStatus::Terminated),
        employee(9, "Mark", "Lee", EmployeeStatus::Active),
    ];
    let mut state = FilterState::new();
    state.set_search_term("emp-0008");
    assert_eq!(matched(&items, &state).len(), 1);

    state.set_search_term("joh");
    state.set_status_filter(StatusFilter::Only(EmployeeStatus::Active));
    let rows = matched(&items, &state);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id.as_str(), "emp-7");
}

#[test]
fn fetch_order_is_kept_without_a_sort_control() {
    let items = vec![
        employee(3, "Carl", "Zed", EmployeeStatus::Active),
        employee(1, "Anna", "Young", EmployeeStatus::Active),
        employee(2, "Bert", "Xu", EmployeeStatus::Active),
    ];
    let state = FilterState::new();
    let ids: Vec<&str> = matched(&items, &state).iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["emp-3", "emp-1", "emp-2"]);

    let sorted = FilterState::new().with_sort(Some(SortSpec::ascending("name")));
    let ids: Vec<&str> = matched(&items, &sorted).iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["emp-2", "emp-1", "emp-3"]);
}

#[test]
fn select_all_only_touches_the_visible_page() {
    let items = roster(12);
    let mut state = FilterState::new().with_page_size(PageSize::Five);
    state.set_page(2, 3);
    let page = ViewPage::compute(&items, &state);

    let mut selection = SelectionSet::new();
    selection.set(&items[0].id, true);
    page.set_page_selection(&mut selection, true);
    assert_eq!(selection.len(), 6);
    assert!(!selection.contains(&items[10].id));

    page.set_page_selection(&mut selection, false);
    assert_eq!(selection.len(), 1);
    assert!(selection.contains(&items[0].id));
}

#[derive(Debug, Clone)]
struct Item {
    id: ItemId,
    name: String,
    status: u8,
}

impl CollectionItem for Item {
    type Status = u8;

    fn id(&self) -> &ItemId {
        &self.id
    }

    fn status(&self) -> u8 {
        self.status
    }

    fn searchable_fields(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Borrowed(self.name.as_str())]
    }
}

fn items_strategy() -> impl Strategy<Value = Vec<Item>> {
    prop::collection::vec(("[a-c]{1,4}", 0u8..3), 0..80).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(n, (name, status))| Item {
                id: ItemId::new(format!("item-{n}")).unwrap(),
                name,
                status,
            })
            .collect()
    })
}

fn page_size_strategy() -> impl Strategy<Value = PageSize> {
    prop::sample::select(PageSize::ALL.to_vec())
}

fn status_strategy() -> impl Strategy<Value = StatusFilter<u8>> {
    prop_oneof![Just(StatusFilter::All), (0u8..3).prop_map(StatusFilter::Only)]
}

proptest! {
    #[test]
    fn visible_rows_never_exceed_page_size(
        items in items_strategy(),
        term in "[a-c]{0,2}",
        status in status_strategy(),
        page_size in page_size_strategy(),
        requested in 0usize..30,
    ) {
        let mut state = FilterState::new().with_page_size(page_size);
        state.set_search_term(term);
        state.set_status_filter(status);
        state.set_page(requested, usize::MAX);

        let page = ViewPage::compute(&items, &state);
        let size = page_size.get();
        prop_assert!(page.rows.len() <= size);
        if page.total > 0 {
            prop_assert_eq!(page.rows.len(), size.min(page.total - page.start_index()));
            prop_assert!(!page.rows.is_empty());
        } else {
            prop_assert_eq!(page.rows.len(), 0);
        }
        prop_assert_eq!(page.page_count, page.total.div_ceil(size).max(1));
        if requested > page.page_count {
            prop_assert_eq!(page.page, page.page_count);
        }
    }

    #[test]
    fn filter_changes_always_reset_the_cursor(
        start in 1usize..20,
        term in "[a-z]{0,5}",
        status in status_strategy(),
    ) {
        let mut state: FilterState<u8> = FilterState::new();
        state.set_page(start, 20);
        state.set_search_term(term);
        prop_assert_eq!(state.page(), 1);

        state.set_page(start, 20);
        state.set_status_filter(status);
        prop_assert_eq!(state.page(), 1);
    }

    #[test]
    fn select_all_round_trip_only_clears_the_current_page(
        items in items_strategy(),
        preselected in prop::collection::vec(any::<bool>(), 80),
        requested in 1usize..10,
    ) {
        let mut state = FilterState::new().with_page_size(PageSize::Five);
        state.set_page(requested, usize::MAX);
        let page = ViewPage::compute(&items, &state);

        let mut selection = SelectionSet::new();
        for (item, selected) in items.iter().zip(&preselected) {
            selection.set(&item.id, *selected);
        }
        let before = selection.clone();

        page.set_page_selection(&mut selection, true);
        page.set_page_selection(&mut selection, false);

        let mut expected = before;
        expected.set_many(page.visible_ids(), false);
        prop_assert_eq!(selection, expected);
    }
}
