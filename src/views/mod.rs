//! Presentation layer
//!
//! The controller never builds markup itself. After every mutation it hands a
//! borrowed [`ViewState`] to a [`Presenter`] and keeps the resulting
//! [`Screen`]. The HTML presenter renders the three live panels; the page
//! template wraps them in the document shell.

pub mod catalog;
pub mod chat;
pub mod page;
pub mod selection;

use std::collections::HashSet;

use crate::catalog::{Product, ProductId};
use crate::conversation::Transcript;
use crate::core::Notice;
use crate::selection::SelectionStore;

/// Languages rendered right-to-left
const RTL_LANGUAGES: [&str; 4] = ["ar", "he", "fa", "ur"];

/// Document text direction, fixed at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

impl Direction {
    /// Pick the direction for a locale tag such as `ar-EG` or `en_US.UTF-8`
    pub fn from_locale(locale: &str) -> Self {
        let locale = locale.to_lowercase();
        if RTL_LANGUAGES.iter().any(|lang| locale.starts_with(lang)) {
            Direction::Rtl
        } else {
            Direction::Ltr
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }
}

/// Everything a presenter may look at
pub struct ViewState<'a> {
    /// Filtered subset shown in the grid
    pub visible: &'a [Product],
    /// Full catalog snapshot, used to resolve the selection
    pub catalog: &'a [Product],
    /// The last catalog load failed
    pub catalog_failed: bool,
    pub selection: &'a SelectionStore,
    pub expanded: &'a HashSet<ProductId>,
    pub transcript: &'a Transcript,
    pub notice: Option<Notice>,
    /// A relay call is in flight
    pub pending: bool,
}

/// Rendered panels
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Screen {
    pub catalog: String,
    pub selection: String,
    pub chat: String,
    /// The page should poll until the in-flight relay call resolves
    pub pending: bool,
}

pub trait Presenter: Send + Sync {
    fn present(&self, state: &ViewState<'_>) -> Screen;
}

/// Renders each panel as an HTML fragment
#[derive(Debug, Default)]
pub struct HtmlPresenter;

impl Presenter for HtmlPresenter {
    fn present(&self, state: &ViewState<'_>) -> Screen {
        let catalog = if state.catalog_failed {
            catalog::render_unavailable()
        } else {
            catalog::render(state.visible, state.selection, state.expanded)
        };

        Screen {
            catalog,
            selection: selection::render(state.catalog, state.selection),
            chat: chat::render(state.transcript, state.notice),
            pending: state.pending,
        }
    }
}

/// Escape text for HTML content and double-quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encode a product id for use as a single path segment
pub fn path_segment(id: &ProductId) -> String {
    urlencoding::encode(&id.to_string()).into_owned()
}

/// A centered single-line message
pub(crate) fn placeholder(message: &str) -> String {
    format!("<div class=\"placeholder-message\">{}</div>", escape(message))
}
