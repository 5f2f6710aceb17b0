//! Client-side list state: the loaded page of rows, the query that produced
//! it, in-place row patching after mutations and the pager layout.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::{
    envelope::{ListPage, MutationResult, Pagination},
    models::{Entity, EntitySummary},
    resource::{Action, EntityKind},
};

/// Page number plus named filters for a list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    page: usize,
    filters: BTreeMap<String, String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            filters: BTreeMap::new(),
        }
    }
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Any filter change starts over from page one. Empty values remove the
    /// filter.
    pub fn set_filter(&mut self, name: &str, value: &str) {
        let value = value.trim();
        let changed = if value.is_empty() {
            self.filters.remove(name).is_some()
        } else {
            self.filters.insert(name.to_string(), value.to_string()).as_deref() != Some(value)
        };
        if changed {
            self.page = 1;
        }
    }

    pub fn filter(&self, name: &str) -> &str {
        self.filters.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn has_filters(&self) -> bool {
        !self.filters.is_empty()
    }

    pub fn clear_filters(&mut self) {
        if self.has_filters() {
            self.filters.clear();
            self.page = 1;
        }
    }

    /// Query pairs for `kind`'s list endpoint, fixed parameters first.
    pub fn to_pairs(&self, kind: EntityKind) -> Vec<(String, String)> {
        let (_, fixed) = kind.list_endpoint();
        let mut pairs: Vec<(String, String)> = fixed
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        pairs.push(("page".to_string(), self.page.to_string()));
        pairs.extend(
            self.filters
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        pairs
    }
}

/// What the table shows when there are no rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub title: String,
    pub hint: String,
}

impl EmptyState {
    pub fn for_kind(kind: EntityKind, filtered: bool) -> Self {
        let hint = if filtered {
            "Try adjusting your search or filters.".to_string()
        } else {
            format!("Create the first {} to get started.", kind.label().to_lowercase())
        };
        Self {
            title: format!("No {} found", kind.plural_noun()),
            hint,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableView {
    Empty(EmptyState),
    Rows(Vec<EntitySummary>),
}

/// Outcome of applying a successful mutation to the loaded rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowChange {
    Patched,
    Inserted,
    Removed,
    /// The change touches rows the client cannot patch; refetch the page.
    Reload,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableState<T> {
    rows: Vec<T>,
    pagination: Pagination,
}

impl<T> Default for TableState<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            pagination: Pagination::single_page(0),
        }
    }
}

impl<T: Entity> TableState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, page: ListPage<T>) {
        self.pagination = page.pagination_or_single();
        self.rows = page.items;
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn find(&self, id: &str) -> Option<&T> {
        self.rows.iter().find(|row| row.id() == id)
    }

    pub fn remove(&mut self, id: &str) -> Option<T> {
        let index = self.rows.iter().position(|row| row.id() == id)?;
        let removed = self.rows.remove(index);
        self.pagination.total_count = self.pagination.total_count.saturating_sub(1);
        self.pagination.end_index = self.pagination.end_index.saturating_sub(1);
        if self.rows.is_empty() {
            self.pagination.start_index = 0;
        }
        Some(removed)
    }

    /// Replace the row with the same id in place, or prepend a new one.
    pub fn upsert(&mut self, row: T) -> RowChange {
        if let Some(existing) = self.rows.iter_mut().find(|existing| existing.id() == row.id()) {
            *existing = row;
            return RowChange::Patched;
        }
        self.rows.insert(0, row);
        self.pagination.total_count += 1;
        self.pagination.end_index += 1;
        if self.pagination.start_index == 0 {
            self.pagination.start_index = 1;
        }
        RowChange::Inserted
    }

    /// Patch the loaded rows after `action` succeeded on `id`.
    pub fn apply_success(&mut self, action: Action, id: &str, result: &MutationResult) -> RowChange {
        match action {
            Action::Delete => match self.remove(id) {
                Some(_) => RowChange::Removed,
                None => RowChange::Unchanged,
            },
            Action::Create | Action::Update => match echoed_record::<T>(result) {
                Some(row) => self.upsert(row),
                None => RowChange::Reload,
            },
            Action::Publish | Action::ToggleStatus => {
                let patched = self
                    .rows
                    .iter_mut()
                    .find(|row| row.id() == id)
                    .is_some_and(|row| row.patch_status(action, result));
                if patched {
                    RowChange::Patched
                } else {
                    RowChange::Reload
                }
            },
            Action::SetCurrent | Action::AssignTeacher | Action::AssignSubjects => RowChange::Reload,
            Action::View | Action::ResetPassword | Action::ChangePassword => RowChange::Unchanged,
        }
    }

    pub fn view(&self, today: NaiveDate, filtered: bool) -> TableView {
        if self.rows.is_empty() {
            return TableView::Empty(EmptyState::for_kind(T::KIND, filtered));
        }
        TableView::Rows(self.rows.iter().map(|row| row.summary(today)).collect())
    }
}

fn echoed_record<T: Entity>(result: &MutationResult) -> Option<T> {
    T::record_key()
        .and_then(|key| result.field_as::<T>(key))
        .or_else(|| result.data_as::<T>())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSlot {
    Page(usize),
    Ellipsis,
}

/// Pager buttons: the first two and last two pages, the current page and
/// its neighbours, with an ellipsis standing in for each elided run.
pub fn page_slots(current: usize, total: usize) -> Vec<PageSlot> {
    let mut slots = Vec::new();
    for page in 1..=total {
        if page <= 2 || page + 1 >= total || page.abs_diff(current) <= 1 {
            slots.push(PageSlot::Page(page));
        } else if (page == 3 && current > 4) || (page + 2 == total && current + 3 < total) {
            slots.push(PageSlot::Ellipsis);
        }
    }
    slots
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{models::Subject, test_support::subject};

    fn table_of(ids: &[&str]) -> TableState<Subject> {
        let mut table = TableState::new();
        table.replace(ListPage {
            success: true,
            items: ids.iter().map(|id| subject(id, "Physics")).collect(),
            pagination: None,
            error: None,
        });
        table
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date")
    }

    #[test]
    fn delete_removes_exactly_the_matching_row() {
        let mut table = table_of(&["41", "42", "420"]);
        let change = table.apply_success(Action::Delete, "42", &MutationResult::ok("deleted"));
        assert_eq!(change, RowChange::Removed);
        let ids: Vec<String> = table.rows().iter().map(|row| row.id()).collect();
        assert_eq!(ids, vec!["41", "420"]);
        assert_eq!(table.pagination().total_count, 2);
    }

    #[test]
    fn update_with_echoed_record_patches_in_place() {
        let mut table = table_of(&["1", "2"]);
        let mut result = MutationResult::ok("updated");
        result.data = Some(json!({"id": "2", "name": "Chemistry", "code": "CHM"}));
        assert_eq!(table.apply_success(Action::Update, "2", &result), RowChange::Patched);
        assert_eq!(table.rows()[1].name, "Chemistry");
        assert_eq!(table.rows().len(), 2);

        let bare = MutationResult::ok("updated");
        assert_eq!(table.apply_success(Action::Update, "2", &bare), RowChange::Reload);
    }

    #[test]
    fn empty_table_renders_empty_state() {
        let table = table_of(&[]);
        match table.view(today(), false) {
            TableView::Empty(empty) => {
                assert_eq!(empty.title, "No subjects found");
                assert!(empty.hint.contains("first subject"));
            },
            TableView::Rows(_) => panic!("expected empty state"),
        }
        match table.view(today(), true) {
            TableView::Empty(empty) => assert!(empty.hint.contains("filters")),
            TableView::Rows(_) => panic!("expected empty state"),
        }
    }

    #[test]
    fn filter_change_resets_page() {
        let mut query = ListQuery::new();
        query.set_page(4);
        query.set_filter("search", "ama");
        assert_eq!(query.page(), 1);

        query.set_page(3);
        query.set_filter("search", "ama");
        assert_eq!(query.page(), 3, "unchanged filter keeps the page");

        let pairs = query.to_pairs(EntityKind::Student);
        assert_eq!(pairs[0], ("role".to_string(), "student".to_string()));
        assert!(pairs.contains(&("search".to_string(), "ama".to_string())));
    }

    #[test]
    fn pager_layout() {
        use PageSlot::{Ellipsis as E, Page as P};
        assert_eq!(page_slots(1, 3), vec![P(1), P(2), P(3)]);
        assert_eq!(page_slots(1, 10), vec![P(1), P(2), E, P(9), P(10)]);
        assert_eq!(
            page_slots(6, 12),
            vec![P(1), P(2), E, P(5), P(6), P(7), E, P(11), P(12)]
        );
        assert_eq!(page_slots(10, 10), vec![P(1), P(2), E, P(9), P(10)]);
    }
}
