//! In-memory page for tests and offline replays.
//!
//! A [`MemoryPage`] holds an ordered list of saved HTML documents. Every
//! activation moves the page on to the next one, the way each control on the
//! portal ("view more", "previous transactions", sign in) loads a new view.
//! Past the last snapshot the page stays where it is.

use std::sync::{Arc, Mutex, MutexGuard};

use scraper::{ElementRef, Html};

use super::{links_labelled, Locator, PageElement, PageError, PageQuery};

#[derive(Debug)]
struct State {
    snapshots: Vec<String>,
    current: usize,
    activations: usize,
    quiescence_waits: usize,
    typed: Vec<String>,
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().expect("memory page lock poisoned")
}

/// Rendered text: each non-blank text node, trimmed, one per line.
fn rendered_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Elements are addressed by their position in document order, which is
/// stable across re-parses of the same snapshot.
fn position_of(doc: &Html, element: ElementRef<'_>) -> usize {
    let id = (*element).id();
    doc.root_element()
        .descendants()
        .position(|node| node.id() == id)
        .unwrap_or_default()
}

fn element_at(doc: &Html, position: usize) -> Option<ElementRef<'_>> {
    doc.root_element()
        .descendants()
        .nth(position)
        .and_then(ElementRef::wrap)
}

/// Positions of the elements `locator` matches under `scope`, or in the
/// whole document when `scope` is `None`.
fn select(doc: &Html, scope: Option<usize>, locator: &Locator) -> Result<Vec<usize>, PageError> {
    let selector = locator.to_selector()?;
    let matches: Vec<ElementRef<'_>> = match scope {
        Some(position) => element_at(doc, position)
            .ok_or_else(|| stale(locator))?
            .select(&selector)
            .collect(),
        None => doc.select(&selector).collect(),
    };
    Ok(matches.into_iter().map(|e| position_of(doc, e)).collect())
}

fn stale(locator: &Locator) -> PageError {
    PageError::Query {
        locator: locator.clone(),
        message: "element is no longer in its snapshot".to_string(),
    }
}

/// A tab replaying a fixed sequence of HTML snapshots.
#[derive(Debug, Clone)]
pub struct MemoryPage {
    state: Arc<Mutex<State>>,
}

impl MemoryPage {
    pub fn new(html: impl Into<String>) -> Self {
        Self::from_snapshots([html])
    }

    pub fn from_snapshots<S: Into<String>>(snapshots: impl IntoIterator<Item = S>) -> Self {
        let mut snapshots: Vec<String> = snapshots.into_iter().map(Into::into).collect();
        if snapshots.is_empty() {
            snapshots.push(String::new());
        }
        Self {
            state: Arc::new(Mutex::new(State {
                snapshots,
                current: 0,
                activations: 0,
                quiescence_waits: 0,
                typed: Vec::new(),
            })),
        }
    }

    /// Index of the snapshot currently shown.
    pub fn current_snapshot(&self) -> usize {
        lock(&self.state).current
    }

    pub fn activations(&self) -> usize {
        lock(&self.state).activations
    }

    pub fn quiescence_waits(&self) -> usize {
        lock(&self.state).quiescence_waits
    }

    /// Everything typed into elements of this page, in order.
    pub fn typed_text(&self) -> Vec<String> {
        lock(&self.state).typed.clone()
    }

    fn current_document(&self) -> (usize, Html) {
        let state = lock(&self.state);
        (state.current, Html::parse_document(&state.snapshots[state.current]))
    }

    fn select_current(&self, locator: &Locator) -> Result<Vec<MemoryElement>, PageError> {
        let (snapshot, doc) = self.current_document();
        Ok(select(&doc, None, locator)?
            .into_iter()
            .map(|position| MemoryElement {
                snapshot,
                position,
                state: Arc::clone(&self.state),
            })
            .collect())
    }

    fn selected_option(&self, locator: &Locator) -> Result<Option<String>, PageError> {
        let (_, doc) = self.current_document();
        let selector = locator.to_selector()?;
        let Some(dropdown) = doc.select(&selector).next() else {
            return Ok(None);
        };
        let options = Locator::tag("option").to_selector()?;
        let options: Vec<ElementRef<'_>> = dropdown.select(&options).collect();
        let chosen = options
            .iter()
            .find(|o| o.value().attr("selected").is_some())
            .or_else(|| options.first());
        Ok(Some(chosen.map(|o| rendered_text(*o)).unwrap_or_default()))
    }
}

/// An element of the snapshot it was found in. It keeps reading that
/// snapshot after the page has moved on.
#[derive(Debug, Clone)]
pub struct MemoryElement {
    snapshot: usize,
    position: usize,
    state: Arc<Mutex<State>>,
}

impl MemoryElement {
    fn with_element<T>(
        &self,
        locator: &Locator,
        read: impl FnOnce(&Html, ElementRef<'_>) -> Result<T, PageError>,
    ) -> Result<T, PageError> {
        let doc = Html::parse_document(&lock(&self.state).snapshots[self.snapshot]);
        let element = element_at(&doc, self.position).ok_or_else(|| stale(locator))?;
        read(&doc, element)
    }

    fn select_within(&self, locator: &Locator) -> Result<Vec<MemoryElement>, PageError> {
        let positions =
            self.with_element(locator, |doc, _| select(doc, Some(self.position), locator))?;
        Ok(positions
            .into_iter()
            .map(|position| MemoryElement {
                snapshot: self.snapshot,
                position,
                state: Arc::clone(&self.state),
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl PageElement for MemoryElement {
    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self>, PageError> {
        if let Locator::LinkText(label) = locator {
            let links = self.select_within(&Locator::tag("a"))?;
            return links_labelled(links, label).await;
        }
        self.select_within(locator)
    }

    async fn text(&self) -> Result<String, PageError> {
        self.with_element(&Locator::tag("*"), |_, e| Ok(rendered_text(e)))
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, PageError> {
        self.with_element(&Locator::tag("*"), |_, e| {
            Ok(e.value().attr(name).map(str::to_string))
        })
    }

    async fn activate(&self) -> Result<(), PageError> {
        let mut state = lock(&self.state);
        state.activations += 1;
        if state.current + 1 < state.snapshots.len() {
            state.current += 1;
        }
        Ok(())
    }

    async fn type_text(&self, text: &str) -> Result<(), PageError> {
        lock(&self.state).typed.push(text.to_string());
        Ok(())
    }
}

#[async_trait::async_trait]
impl PageQuery for MemoryPage {
    type Element = MemoryElement;

    async fn find_all(&self, locator: &Locator) -> Result<Vec<MemoryElement>, PageError> {
        if let Locator::LinkText(label) = locator {
            let links = self.select_current(&Locator::tag("a"))?;
            return links_labelled(links, label).await;
        }
        self.select_current(locator)
    }

    async fn selected_option_text(&self, locator: &Locator) -> Result<Option<String>, PageError> {
        self.selected_option(locator)
    }

    async fn wait_for_quiescence(&self) {
        lock(&self.state).quiescence_waits += 1;
    }
}
