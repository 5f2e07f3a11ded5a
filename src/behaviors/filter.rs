//! Category filter for portfolio-style item grids.

use super::markup::{DATA_CATEGORY, DATA_FILTER, FILTER_ALL, IS_ACTIVE};
use crate::controller::{ControllerState, claim};
use crate::dom::NodeId;
use crate::event::{EventTarget, EventType};
use crate::page::Page;
use std::cell::RefCell;
use std::rc::Rc;

/// Whether an item in `category` is shown under filter `key`.
pub fn is_shown(key: &str, category: &str) -> bool {
    key == FILTER_ALL || key == category
}

/// Shared state of one filter bar.
#[derive(Debug, Default)]
pub struct FilterBar {
    buttons: Vec<NodeId>,
    active: RefCell<Option<String>>,
}

impl FilterBar {
    /// The key selected by the last click, if any.
    pub fn active_key(&self) -> Option<String> {
        self.active.borrow().clone()
    }

    fn select(&self, page: &mut Page, button: NodeId) {
        let key = page
            .document()
            .attr(button, DATA_FILTER)
            .unwrap_or_default()
            .to_string();
        let doc = page.document_mut();
        for other in &self.buttons {
            doc.remove_class(*other, IS_ACTIVE);
        }
        doc.add_class(button, IS_ACTIVE);

        let items = doc.find_all(doc.root(), |el| el.has_attr(DATA_CATEGORY));
        for item in items {
            let category = doc.attr(item, DATA_CATEGORY).unwrap_or_default();
            let display = if is_shown(&key, category) { "" } else { "none" };
            doc.set_style_property(item, "display", display);
        }
        *self.active.borrow_mut() = Some(key);
    }
}

/// Wire every `[data-filter]` button. Returns the bar state, or `None` when
/// the page has no filter buttons.
pub fn init(page: &mut Page, state: &mut ControllerState) -> Option<Rc<FilterBar>> {
    if !claim(&mut state.filter) {
        return None;
    }
    let doc = page.document();
    let buttons = doc.find_all(doc.root(), |el| el.has_attr(DATA_FILTER));
    if buttons.is_empty() {
        tracing::debug!("filter: no filter buttons, skipping");
        return None;
    }
    let bar = Rc::new(FilterBar {
        buttons: buttons.clone(),
        active: RefCell::new(None),
    });
    for button in buttons {
        let bar = Rc::clone(&bar);
        page.add_listener(EventTarget::Node(button), EventType::Click, move |page, _| {
            bar.select(page, button);
        });
    }
    Some(bar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    const PAGE: &str = r##"
        <div class="filters">
          <button data-filter="all" class="is-active">All</button>
          <button data-filter="web">Web</button>
          <button data-filter="design">Design</button>
        </div>
        <article id="p1" data-category="web"></article>
        <article id="p2" data-category="design"></article>
        <article id="p3" data-category="web"></article>
    "##;

    fn displays(page: &Page) -> Vec<Option<String>> {
        ["p1", "p2", "p3"]
            .iter()
            .map(|id| page.document().style_property(by_id(page, id), "display"))
            .collect()
    }

    #[test]
    fn filtering_by_key_then_all() {
        let mut page = page_from(PAGE);
        let mut state = ControllerState::default();
        let bar = init(&mut page, &mut state).unwrap();

        page.click(by_selector(&page, "[data-filter=\"web\"]"));
        assert_eq!(displays(&page), vec![None, Some("none".into()), None]);
        assert_eq!(bar.active_key().as_deref(), Some("web"));
        assert_has_class(&page, "[data-filter=\"web\"]", "is-active");
        assert_lacks_class(&page, "[data-filter=\"all\"]", "is-active");

        page.click(by_selector(&page, "[data-filter=\"all\"]"));
        assert_eq!(displays(&page), vec![None, None, None]);
        assert_eq!(bar.active_key().as_deref(), Some("all"));
    }

    #[test]
    fn items_added_later_are_filtered() {
        let mut page = page_from(PAGE);
        let mut state = ControllerState::default();
        init(&mut page, &mut state);
        let body = page.document().body().unwrap();
        let late = page.document_mut().create_element("article");
        page.document_mut().set_attr(late, "data-category", "design");
        page.document_mut().append_child(body, late);

        page.click(by_selector(&page, "[data-filter=\"web\"]"));
        assert_eq!(page.document().style_property(late, "display").as_deref(), Some("none"));
    }

    #[test]
    fn no_buttons_is_inert() {
        let mut page = page_from("<article data-category=\"web\"></article>");
        let mut state = ControllerState::default();
        assert!(init(&mut page, &mut state).is_none());
        assert_eq!(page.listener_count(), 0);
    }

    #[test]
    fn repeated_init_is_a_no_op() {
        let mut page = page_from(PAGE);
        let mut state = ControllerState::default();
        assert!(init(&mut page, &mut state).is_some());
        let count = page.listener_count();
        assert!(init(&mut page, &mut state).is_none());
        assert_eq!(page.listener_count(), count);

        page.click(by_selector(&page, "[data-filter=\"design\"]"));
        assert_eq!(displays(&page), vec![Some("none".into()), None, Some("none".into())]);
    }
}
