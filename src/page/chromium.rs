//! [`PageQuery`] over a Chrome DevTools Protocol tab.

use std::time::Duration;

use chromiumoxide::browser::Browser;
use chromiumoxide::element::Element;
use chromiumoxide::error::CdpError;
use chromiumoxide::Page;

use super::{links_labelled, Locator, PageElement, PageError, PageQuery};

const CLICK_JS: &str = "function() { this.click(); }";
const SELECTED_OPTION_JS: &str =
    "function() { const o = this.options[this.selectedIndex]; return o ? o.text : null; }";

fn browser_error(err: CdpError) -> PageError {
    PageError::Browser(err.to_string())
}

fn query_error(locator: &Locator, err: CdpError) -> PageError {
    PageError::Query {
        locator: locator.clone(),
        message: err.to_string(),
    }
}

fn css_for(locator: &Locator) -> Result<String, PageError> {
    locator
        .to_css()
        .ok_or_else(|| PageError::Unsupported(locator.clone()))
}

/// One browser tab. Quiescence is a fixed sleep after each action.
#[derive(Clone)]
pub struct ChromiumPage {
    page: Page,
    settle: Duration,
}

impl ChromiumPage {
    pub fn new(page: Page, settle: Duration) -> Self {
        Self { page, settle }
    }

    /// Open `url` in a new tab and let it render.
    pub async fn open(browser: &Browser, url: &str, settle: Duration) -> Result<Self, PageError> {
        let page = browser.new_page(url).await.map_err(browser_error)?;
        let page = Self::new(page, settle);
        page.wait_for_quiescence().await;
        Ok(page)
    }

    pub async fn close(self) -> Result<(), PageError> {
        self.page.close().await.map_err(browser_error)
    }
}

#[async_trait::async_trait]
impl PageQuery for ChromiumPage {
    type Element = ChromiumElement;

    async fn find_all(&self, locator: &Locator) -> Result<Vec<ChromiumElement>, PageError> {
        // querySelectorAll: no match is an empty list, never an error.
        if let Locator::LinkText(label) = locator {
            let links = self.find_all(&Locator::tag("a")).await?;
            return links_labelled(links, label).await;
        }
        let elements = self
            .page
            .find_elements(css_for(locator)?)
            .await
            .map_err(|err| query_error(locator, err))?;
        Ok(elements.into_iter().map(ChromiumElement::new).collect())
    }

    async fn selected_option_text(&self, locator: &Locator) -> Result<Option<String>, PageError> {
        let Some(select) = PageQuery::find(self, locator).await? else {
            return Ok(None);
        };
        let ret = select
            .element
            .call_js_fn(SELECTED_OPTION_JS, false)
            .await
            .map_err(browser_error)?;
        Ok(ret
            .result
            .value
            .and_then(|v| v.as_str().map(str::to_string)))
    }

    async fn wait_for_quiescence(&self) {
        tokio::time::sleep(self.settle).await;
    }
}

pub struct ChromiumElement {
    element: Element,
}

impl ChromiumElement {
    fn new(element: Element) -> Self {
        Self { element }
    }
}

#[async_trait::async_trait]
impl PageElement for ChromiumElement {
    async fn find_all(&self, locator: &Locator) -> Result<Vec<Self>, PageError> {
        if let Locator::LinkText(label) = locator {
            let links = self.find_all(&Locator::tag("a")).await?;
            return links_labelled(links, label).await;
        }
        let elements = self
            .element
            .find_elements(css_for(locator)?)
            .await
            .map_err(|err| query_error(locator, err))?;
        Ok(elements.into_iter().map(ChromiumElement::new).collect())
    }

    async fn text(&self) -> Result<String, PageError> {
        Ok(self
            .element
            .inner_text()
            .await
            .map_err(browser_error)?
            .unwrap_or_default())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, PageError> {
        self.element.attribute(name).await.map_err(browser_error)
    }

    async fn activate(&self) -> Result<(), PageError> {
        // A scripted click works even when the control is scrolled out of view.
        self.element
            .call_js_fn(CLICK_JS, false)
            .await
            .map_err(browser_error)?;
        Ok(())
    }

    async fn type_text(&self, text: &str) -> Result<(), PageError> {
        self.element.focus().await.map_err(browser_error)?;
        self.element.type_str(text).await.map_err(browser_error)?;
        Ok(())
    }
}
