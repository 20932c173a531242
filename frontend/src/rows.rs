//! Per-row view state for the rendered list.
//!
//! Rows are addressed by a local key that exists before the server id does.
//! The `done` flag and edit-field visibility belong to the view only; they
//! are not re-derived from the cache after a call settles.

use shared::Task;

pub type RowKey = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub key: RowKey,
    pub task_id: Option<String>,
    pub text: String,
    pub done: bool,
    pub editing: bool,
    pub draft: String,
}

#[derive(Debug, Clone, Default)]
pub struct Rows {
    rows: Vec<Row>,
    next_key: RowKey,
}

impl Rows {
    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, key: RowKey) -> Option<&Row> {
        self.rows.iter().find(|row| row.key == key)
    }

    /// Server id of a row, if the create call has come back.
    pub fn task_id(&self, key: RowKey) -> Option<&str> {
        self.get(key).and_then(|row| row.task_id.as_deref())
    }

    /// Renders server tasks ahead of any rows typed in before they arrived.
    pub fn load(&mut self, tasks: &[Task]) {
        let loaded: Vec<Row> = tasks
            .iter()
            .map(|task| {
                let mut row = self.fresh_row(task.value.clone());
                row.task_id = Some(task.id.clone());
                row.done = task.checked;
                row
            })
            .collect();
        self.rows.splice(0..0, loaded);
    }

    /// Inserts a row with no server id yet.
    pub fn push_pending(&mut self, text: String) -> RowKey {
        let row = self.fresh_row(text);
        let key = row.key;
        self.rows.push(row);
        key
    }

    /// Backfills the server id. Returns false when the row is gone.
    pub fn attach_id(&mut self, key: RowKey, task_id: String) -> bool {
        match self.get_mut(key) {
            Some(row) => {
                row.task_id = Some(task_id);
                true
            }
            None => false,
        }
    }

    pub fn begin_edit(&mut self, key: RowKey) {
        if let Some(row) = self.get_mut(key) {
            row.editing = true;
            row.draft = row.text.clone();
        }
    }

    pub fn set_draft(&mut self, key: RowKey, draft: String) {
        if let Some(row) = self.get_mut(key) {
            row.draft = draft;
        }
    }

    /// Hides the edit field. When the draft is non-blank it becomes the row
    /// text and is returned.
    pub fn confirm_edit(&mut self, key: RowKey) -> Option<String> {
        let row = self.get_mut(key)?;
        row.editing = false;
        if row.draft.trim().is_empty() {
            return None;
        }
        row.text = row.draft.clone();
        Some(row.text.clone())
    }

    pub fn toggle_done(&mut self, key: RowKey) {
        if let Some(row) = self.get_mut(key) {
            row.done = !row.done;
        }
    }

    pub fn remove(&mut self, key: RowKey) -> Option<Row> {
        let index = self.rows.iter().position(|row| row.key == key)?;
        Some(self.rows.remove(index))
    }

    fn get_mut(&mut self, key: RowKey) -> Option<&mut Row> {
        self.rows.iter_mut().find(|row| row.key == key)
    }

    fn fresh_row(&mut self, text: String) -> Row {
        let key = self.next_key;
        self.next_key += 1;
        Row {
            key,
            task_id: None,
            text,
            done: false,
            editing: false,
            draft: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn task(id: &str, value: &str, checked: bool) -> Task {
        Task {
            id: id.into(),
            value: value.into(),
            priority: 1,
            checked,
        }
    }

    #[test]
    fn empty_list_renders_no_rows() {
        let mut rows = Rows::default();
        rows.load(&[]);
        assert!(rows.is_empty());
    }

    #[test]
    fn loaded_rows_carry_ids_and_completion() {
        let mut rows = Rows::default();
        rows.load(&[task("a", "one", false), task("b", "two", true)]);

        let loaded: Vec<_> = rows
            .iter()
            .map(|r| (r.task_id.clone(), r.text.clone(), r.done))
            .collect();
        assert_eq!(
            loaded,
            vec![
                (Some("a".to_string()), "one".to_string(), false),
                (Some("b".to_string()), "two".to_string(), true),
            ]
        );
    }

    #[test]
    fn pending_row_gets_server_id_backfilled() {
        let mut rows = Rows::default();
        let key = rows.push_pending("Buy milk".into());
        assert_eq!(rows.task_id(key), None);

        assert!(rows.attach_id(key, "t1".into()));

        assert_eq!(rows.len(), 1);
        assert_eq!(rows.task_id(key), Some("t1"));
        assert_eq!(rows.get(key).map(|r| r.text.as_str()), Some("Buy milk"));
    }

    #[test]
    fn backfill_after_delete_is_a_no_op() {
        let mut rows = Rows::default();
        let key = rows.push_pending("gone".into());
        rows.remove(key);
        assert!(!rows.attach_id(key, "t9".into()));
        assert!(rows.is_empty());
    }

    #[test]
    fn rows_typed_before_load_stay_after_server_rows() {
        let mut rows = Rows::default();
        let early = rows.push_pending("early".into());
        rows.load(&[task("a", "one", false)]);

        let texts: Vec<_> = rows.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "early"]);
        assert_eq!(rows.get(early).map(|r| r.key), Some(early));
    }

    #[test]
    fn edit_round_trip_updates_text() {
        let mut rows = Rows::default();
        rows.load(&[task("a", "one", false)]);
        let key = rows.iter().next().map(|r| r.key).unwrap();

        rows.begin_edit(key);
        assert!(rows.get(key).unwrap().editing);
        assert_eq!(rows.get(key).unwrap().draft, "one");

        rows.set_draft(key, "uno".into());
        assert_eq!(rows.confirm_edit(key), Some("uno".to_string()));

        let row = rows.get(key).unwrap();
        assert!(!row.editing);
        assert_eq!(row.text, "uno");
    }

    #[test]
    fn blank_draft_only_hides_the_field() {
        let mut rows = Rows::default();
        let key = rows.push_pending("keep".into());
        rows.begin_edit(key);
        rows.set_draft(key, "   ".into());

        assert_eq!(rows.confirm_edit(key), None);
        let row = rows.get(key).unwrap();
        assert!(!row.editing);
        assert_eq!(row.text, "keep");
    }

    #[test]
    fn toggle_done_flips_view_state_only() {
        let mut rows = Rows::default();
        let key = rows.push_pending("x".into());
        rows.toggle_done(key);
        assert!(rows.get(key).unwrap().done);
        rows.toggle_done(key);
        assert!(!rows.get(key).unwrap().done);
    }

    #[test]
    fn remove_keeps_relative_order() {
        let mut rows = Rows::default();
        rows.load(&[
            task("a", "one", false),
            task("b", "two", false),
            task("c", "three", false),
        ]);
        let middle = rows.iter().nth(1).map(|r| r.key).unwrap();

        let removed = rows.remove(middle).unwrap();

        assert_eq!(removed.task_id.as_deref(), Some("b"));
        let ids: Vec<_> = rows.iter().filter_map(|r| r.task_id.as_deref()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }
}
