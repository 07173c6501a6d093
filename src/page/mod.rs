//! Page-query capability the scrapers run against.
//!
//! [`PageQuery`] is one browser tab; [`PageElement`] is a node found on it.
//! The Chrome implementation lives in [`chromium`] (feature `browser`), and
//! [`MemoryPage`] replays saved HTML snapshots for tests and offline runs.

#[cfg(feature = "browser")]
pub mod chromium;
mod memory;

#[cfg(feature = "browser")]
pub use chromium::{ChromiumElement, ChromiumPage};
pub use memory::{MemoryElement, MemoryPage};

use std::fmt;

use scraper::Selector;

/// How to find elements on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// Elements carrying a class token.
    Class(String),
    /// A CSS selector, e.g. `tbody.trans-tbody-wrap tr`.
    Css(String),
    /// The element with this `id` attribute.
    Id(String),
    /// Elements with this tag name.
    Tag(String),
    /// Links whose visible text is exactly this label.
    LinkText(String),
}

impl Locator {
    pub fn class(name: impl Into<String>) -> Self {
        Self::Class(name.into())
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    pub fn tag(tag: impl Into<String>) -> Self {
        Self::Tag(tag.into())
    }

    pub fn link_text(label: impl Into<String>) -> Self {
        Self::LinkText(label.into())
    }

    /// The equivalent CSS selector, if there is one.
    pub fn to_css(&self) -> Option<String> {
        match self {
            Locator::Class(name) => Some(format!(".{name}")),
            Locator::Css(selector) => Some(selector.clone()),
            Locator::Id(id) => Some(format!("#{id}")),
            Locator::Tag(tag) => Some(tag.clone()),
            Locator::LinkText(_) => None,
        }
    }

    /// Compile to a [`Selector`]. Link text has no CSS form.
    pub fn to_selector(&self) -> Result<Selector, PageError> {
        let css = self
            .to_css()
            .ok_or_else(|| PageError::Unsupported(self.clone()))?;
        Selector::parse(&css).map_err(|_| PageError::InvalidSelector(css.clone()))
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Class(name) => write!(f, "class {name:?}"),
            Locator::Css(selector) => write!(f, "selector {selector:?}"),
            Locator::Id(id) => write!(f, "id {id:?}"),
            Locator::Tag(tag) => write!(f, "tag {tag:?}"),
            Locator::LinkText(label) => write!(f, "link text {label:?}"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("invalid selector {0:?}")]
    InvalidSelector(String),
    #[error("{0} is not supported here")]
    Unsupported(Locator),
    #[error("lookup of {locator} failed: {message}")]
    Query { locator: Locator, message: String },
    #[error("browser call failed: {0}")]
    Browser(String),
}

/// An element found on a page. Lookups through it are scoped to its descendants.
#[async_trait::async_trait]
pub trait PageElement: Send + Sync + Sized {
    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self>, PageError>;

    async fn find(&self, locator: &Locator) -> Result<Option<Self>, PageError> {
        Ok(self.find_all(locator).await?.into_iter().next())
    }

    /// Rendered text of the element and its descendants.
    async fn text(&self) -> Result<String, PageError>;

    async fn attribute(&self, name: &str) -> Result<Option<String>, PageError>;

    /// Scripted click. Does not wait for the page to react.
    async fn activate(&self) -> Result<(), PageError>;

    async fn type_text(&self, text: &str) -> Result<(), PageError>;
}

/// One browser tab.
#[async_trait::async_trait]
pub trait PageQuery: Send + Sync {
    type Element: PageElement;

    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self::Element>, PageError>;

    async fn find(&self, locator: &Locator) -> Result<Option<Self::Element>, PageError> {
        Ok(self.find_all(locator).await?.into_iter().next())
    }

    /// Text of the selected option of the `<select>` matched by `locator`.
    ///
    /// `None` when there is no such select.
    async fn selected_option_text(&self, locator: &Locator) -> Result<Option<String>, PageError>;

    /// Block until a triggered page update has had time to render.
    async fn wait_for_quiescence(&self);
}

/// Keep the links whose rendered text, trimmed, is exactly `label`.
///
/// Page implementations resolve [`Locator::LinkText`] by querying every `a`
/// and passing the result through here, so a missing link is an empty list.
pub(crate) async fn links_labelled<E: PageElement>(
    links: Vec<E>,
    label: &str,
) -> Result<Vec<E>, PageError> {
    let mut matching = Vec::new();
    for link in links {
        if link.text().await?.trim() == label {
            matching.push(link);
        }
    }
    Ok(matching)
}
