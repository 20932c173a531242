use std::rc::Rc;

use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use shared::{ClientConfig, ClientError, ListController, Task, Transport, DEFAULT_PRIORITY};

pub mod fetch;
pub mod logging;
pub mod rows;

use fetch::FetchTransport;
use rows::{Row, RowKey, Rows};

#[derive(Debug, Clone)]
pub enum Msg {
    Initialized(Vec<Task>),

    // New task input
    SetInput(String),
    InputKey(String),
    Submit,
    Created(RowKey, Option<Task>),

    // Row actions
    Edit(RowKey),
    SetDraft(RowKey, String),
    ConfirmEdit(RowKey),
    Complete(RowKey),
    Delete(RowKey),

    Settled(&'static str, Result<(), ClientError>),
}

/// Application context: owns the controller and the rendered rows.
pub struct Model<T> {
    list: Rc<ListController<T>>,
    list_name: String,
    input: String,
    rows: Rows,
}

impl Model<FetchTransport> {
    pub fn new(config: ClientConfig) -> Self {
        let list = ListController::from_config(FetchTransport, &config);
        Self::with_controller(list, config.list_name)
    }
}

impl<T: Transport> Model<T> {
    pub fn with_controller(list: ListController<T>, list_name: String) -> Self {
        Self {
            list: Rc::new(list),
            list_name,
            input: String::new(),
            rows: Rows::default(),
        }
    }

    /// Server id for a row, or `None` (logged) while its create is in flight.
    fn synced_id(&self, key: RowKey) -> Option<String> {
        let task_id = self.rows.task_id(key).map(str::to_string);
        if task_id.is_none() {
            tracing::warn!(row = key, "row has no server id yet; ignoring action");
        }
        task_id
    }
}

impl<T: Transport + 'static> Application for Model<T> {
    type MSG = Msg;

    fn init(&mut self) -> Cmd<Msg> {
        let list = Rc::clone(&self.list);
        let name = self.list_name.clone();
        Cmd::new(async move {
            // failures are logged by the controller; render whatever was cached
            let _ = list.initialize(&name).await;
            Msg::Initialized(list.tasks())
        })
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::Initialized(tasks) => {
                self.rows.load(&tasks);
                Cmd::none()
            }
            Msg::SetInput(value) => {
                self.input = value;
                Cmd::none()
            }
            Msg::InputKey(key) => {
                if key == "Enter" {
                    self.update(Msg::Submit)
                } else {
                    Cmd::none()
                }
            }
            Msg::Submit => {
                if self.input.is_empty() {
                    return Cmd::none();
                }
                let value = std::mem::take(&mut self.input);
                let row = self.rows.push_pending(value.clone());

                let list = Rc::clone(&self.list);
                Cmd::new(async move {
                    let created = list.add(&value, DEFAULT_PRIORITY).await.ok();
                    Msg::Created(row, created)
                })
            }
            Msg::Created(row, created) => {
                match created {
                    Some(task) => {
                        if !self.rows.attach_id(row, task.id.clone()) {
                            tracing::debug!(id = %task.id, "row removed before its id arrived");
                        }
                    }
                    None => tracing::warn!(row, "task was not created; row stays unsynced"),
                }
                Cmd::none()
            }
            Msg::Edit(row) => {
                if self.synced_id(row).is_some() {
                    self.rows.begin_edit(row);
                }
                Cmd::none()
            }
            Msg::SetDraft(row, draft) => {
                self.rows.set_draft(row, draft);
                Cmd::none()
            }
            Msg::ConfirmEdit(row) => {
                let Some(id) = self.synced_id(row) else {
                    return Cmd::none();
                };
                let Some(text) = self.rows.confirm_edit(row) else {
                    return Cmd::none();
                };
                let list = Rc::clone(&self.list);
                Cmd::new(async move {
                    Msg::Settled("edit", list.edit(&id, &text, DEFAULT_PRIORITY).await)
                })
            }
            Msg::Complete(row) => {
                let Some(id) = self.synced_id(row) else {
                    return Cmd::none();
                };
                self.rows.toggle_done(row);
                let list = Rc::clone(&self.list);
                Cmd::new(async move { Msg::Settled("complete", list.complete(&id).await) })
            }
            Msg::Delete(row) => {
                let Some(id) = self.synced_id(row) else {
                    return Cmd::none();
                };
                self.rows.remove(row);
                let list = Rc::clone(&self.list);
                Cmd::new(async move { Msg::Settled("delete", list.delete(&id).await) })
            }
            Msg::Settled(operation, result) => {
                if result.is_ok() {
                    tracing::debug!(operation, cached = self.list.tasks().len(), "synced");
                }
                Cmd::none()
            }
        }
    }

    fn view(&self) -> Node<Msg> {
        div(
            [class("todo")],
            [
                input(
                    [
                        r#type("text"),
                        id("userinput"),
                        placeholder("Enter a task"),
                        value(&self.input),
                        on_input(|event| Msg::SetInput(event.value())),
                        on_keypress(|event| Msg::InputKey(event.key())),
                    ],
                    [],
                ),
                button([id("enter"), on_click(|_| Msg::Submit)], [text("enter")]),
                ul(
                    [],
                    self.rows.iter().map(view_row).collect::<Vec<_>>(),
                ),
            ],
        )
    }
}

fn view_row(row: &Row) -> Node<Msg> {
    let row_key = row.key;
    let hidden = if row.editing { "" } else { "hidden" };

    let mut attrs = vec![
        key(row_key.to_string()),
        class(if row.done { "done" } else { "" }),
    ];
    if let Some(task_id) = &row.task_id {
        attrs.push(id(task_id.clone()));
    }

    li(
        attrs,
        [
            text(&row.text),
            button(
                [class("edit"), on_click(move |_| Msg::Edit(row_key))],
                [text("edit")],
            ),
            button(
                [class("complete"), on_click(move |_| Msg::Complete(row_key))],
                [text("complete")],
            ),
            button(
                [class("delete"), on_click(move |_| Msg::Delete(row_key))],
                [text("delete")],
            ),
            input(
                [
                    r#type("text"),
                    class(hidden),
                    value(&row.draft),
                    on_input(move |event| Msg::SetDraft(row_key, event.value())),
                ],
                [],
            ),
            button(
                [
                    class(&format!("input_ok {hidden}")),
                    on_click(move |_| Msg::ConfirmEdit(row_key)),
                ],
                [text("ok")],
            ),
        ],
    )
}

/// Reads `data-todo-api` / `data-todo-list` overrides from `<body>`.
fn page_config() -> ClientConfig {
    let body = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.body());
    let attribute = |name: &str| body.as_ref().and_then(|body| body.get_attribute(name));
    ClientConfig::default().with_overrides(attribute("data-todo-api"), attribute("data-todo-list"))
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    logging::init();

    let config = page_config();
    tracing::info!(base_url = %config.base_url, list = %config.list_name, "starting to-do client");
    Program::mount_to_body(Model::new(config));
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use shared::{ApiRequest, ApiResponse, Method, TodoApi};

    use super::*;

    const BASE: &str = "http://remote.test";

    /// Remote with an empty list that hands out `t1` on create.
    struct EmptyRemote;

    impl Transport for EmptyRemote {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
            let path = request.url.trim_start_matches(BASE);
            let body = match (request.method, path) {
                (Method::Post, "/auth/login") => r#"{"access_token":"abc"}"#,
                (Method::Get, "/todo") => "[]",
                (Method::Post, "/todo") => r#"{"_id":"t1","value":"Buy milk","priority":1}"#,
                _ => return Ok(ApiResponse::new(404, "")),
            };
            Ok(ApiResponse::new(200, body))
        }
    }

    async fn initialized_model() -> Model<EmptyRemote> {
        let list = ListController::new(TodoApi::new(EmptyRemote, BASE));
        let mut model = Model::with_controller(list, "New List".to_string());
        model.list.initialize("New List").await.unwrap();
        let tasks = model.list.tasks();
        let _ = model.update(Msg::Initialized(tasks));
        model
    }

    fn rendered_items(model: &Model<EmptyRemote>) -> usize {
        model.view().render_to_string().matches("<li").count()
    }

    #[tokio::test]
    async fn empty_remote_renders_no_items() {
        let model = initialized_model().await;

        assert!(model.list.tasks().is_empty());
        assert!(model.rows.is_empty());
        assert_eq!(rendered_items(&model), 0);
    }

    #[tokio::test]
    async fn submitted_task_renders_with_server_id() {
        let mut model = initialized_model().await;

        let _ = model.update(Msg::SetInput("Buy milk".to_string()));
        let _ = model.update(Msg::Submit);

        assert!(model.input.is_empty());
        assert_eq!(rendered_items(&model), 1);
        let row = model.rows.iter().next().map(|row| row.key).unwrap();
        assert_eq!(model.rows.task_id(row), None);

        let created = model.list.add("Buy milk", DEFAULT_PRIORITY).await.ok();
        let _ = model.update(Msg::Created(row, created));

        let cached: Vec<_> = model.list.tasks().into_iter().map(|task| task.id).collect();
        assert_eq!(cached, vec!["t1".to_string()]);
        let html = model.view().render_to_string();
        assert_eq!(html.matches("<li").count(), 1);
        assert!(html.contains(r#"id="t1""#), "{html}");
        assert!(html.contains("Buy milk"));
    }

    #[tokio::test]
    async fn empty_input_submits_nothing() {
        let mut model = initialized_model().await;

        let _ = model.update(Msg::Submit);
        let _ = model.update(Msg::InputKey("Enter".to_string()));

        assert_eq!(rendered_items(&model), 0);
    }

    #[test]
    fn row_renders_backfilled_id() {
        let mut rows = Rows::default();
        let key = rows.push_pending("Buy milk".to_string());
        let pending = view_row(rows.get(key).unwrap()).render_to_string();
        assert!(!pending.contains(r#"id="t1""#));

        rows.attach_id(key, "t1".to_string());
        let html = view_row(rows.get(key).unwrap()).render_to_string();

        assert!(html.contains(r#"id="t1""#), "{html}");
        assert!(html.contains("Buy milk"));
    }
}
