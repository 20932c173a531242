pub const DEFAULT_BASE_URL: &str = "https://todo.hillel.it";
pub const DEFAULT_LIST_NAME: &str = "New List";

/// Where the client talks to and which list it logs in as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub list_name: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            list_name: DEFAULT_LIST_NAME.to_string(),
        }
    }
}

impl ClientConfig {
    /// Applies optional overrides; blank values keep the current setting.
    pub fn with_overrides(mut self, base_url: Option<String>, list_name: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        if let Some(name) = list_name.filter(|n| !n.trim().is_empty()) {
            self.list_name = name.trim().to_string();
        }
        self
    }
}
