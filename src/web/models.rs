// Page data models for the web front-end

pub const AUTHOR_NAME: &str = "Def";
pub const APP_VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

/// File name offered for download when the upload carried none
pub const DEFAULT_FILE_NAME: &str = "result.png";

/// One line of the release history shown on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangelogEntry {
    pub date: &'static str,
    pub detail: &'static str,
}

/// Release history, most recent first. Rendered in this order.
pub static CHANGELOG: &[ChangelogEntry] = &[
    ChangelogEntry {
        date: "2025-11-07",
        detail: "Added interactive brush controls for manual refine.",
    },
    ChangelogEntry {
        date: "2025-11-07",
        detail: "Initial FastAPI web UI for removing backgrounds.",
    },
];

/// Everything the page template needs for one response
#[derive(Debug, Clone)]
pub struct PageContext {
    pub author_name: &'static str,
    pub app_version: &'static str,
    pub last_updated: String,
    pub update_history: &'static [ChangelogEntry],
    pub original_image: Option<String>,
    pub result_image: Option<String>,
    pub file_name: Option<String>,
}

impl PageContext {
    /// Static metadata only, no images.
    pub fn base() -> Self {
        Self::with_history(CHANGELOG)
    }

    fn with_history(history: &'static [ChangelogEntry]) -> Self {
        Self {
            author_name: AUTHOR_NAME,
            app_version: APP_VERSION,
            last_updated: last_updated(history),
            update_history: history,
            original_image: None,
            result_image: None,
            file_name: None,
        }
    }

    /// Base context carrying both images and the download name.
    pub fn with_images(
        original_image: String,
        result_image: String,
        file_name: Option<String>,
    ) -> Self {
        let file_name = file_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());

        Self {
            original_image: Some(original_image),
            result_image: Some(result_image),
            file_name: Some(file_name),
            ..Self::base()
        }
    }
}

// Date of the newest changelog entry, or today when there is none.
fn last_updated(history: &[ChangelogEntry]) -> String {
    match history.first() {
        Some(entry) => entry.date.to_string(),
        None => chrono::Local::now().date_naive().format("%Y-%m-%d").to_string(),
    }
}
