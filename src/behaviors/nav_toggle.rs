//! Collapsible navigation menu.
//!
//! The menu is open exactly when the collapse panel has the `show` class.
//! Opening marks the toggle expanded, locks body scrolling, and moves focus
//! to the first menu link after a short delay. Closing reverses all of that
//! and returns focus to the toggle.
//!
//! The menu closes on Escape, on a click outside both toggle and panel, on a
//! click of any menu link, and when the viewport grows past the desktop
//! breakpoint.

use super::markup::{ARIA_EXPANDED, NAV_COLLAPSE, NAV_LINK, NAV_TOGGLE_CLASSES, NO_SCROLL, SHOW};
use crate::config::NavigationConfig;
use crate::controller::{ControllerState, claim};
use crate::dom::NodeId;
use crate::event::{EventTarget, EventType};
use crate::page::Page;
use crate::rate_limit::debounce;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Open,
    Closed,
}

/// The toggle button and the panel it controls.
#[derive(Debug, Clone, Copy)]
struct Menu {
    toggle: NodeId,
    panel: NodeId,
    focus_delay_ms: u64,
}

impl Menu {
    fn state(self, page: &Page) -> MenuState {
        if page.document().has_class(self.panel, SHOW) {
            MenuState::Open
        } else {
            MenuState::Closed
        }
    }

    fn is_open(self, page: &Page) -> bool {
        self.state(page) == MenuState::Open
    }

    fn open(self, page: &mut Page) {
        let doc = page.document_mut();
        doc.add_class(self.panel, SHOW);
        doc.set_attr(self.toggle, ARIA_EXPANDED, "true");
        if let Some(body) = doc.body() {
            doc.add_class(body, NO_SCROLL);
        }
        let panel = self.panel;
        page.set_timeout(self.focus_delay_ms, move |page| {
            if let Some(link) = page
                .document()
                .find_first(panel, |el| el.has_class(NAV_LINK))
            {
                page.focus(link);
            }
        });
    }

    fn close(self, page: &mut Page) {
        let doc = page.document_mut();
        doc.remove_class(self.panel, SHOW);
        doc.set_attr(self.toggle, ARIA_EXPANDED, "false");
        if let Some(body) = doc.body() {
            doc.remove_class(body, NO_SCROLL);
        }
        page.focus(self.toggle);
    }
}

/// Current menu state, or `None` when the page has no menu.
pub fn menu_state(page: &Page) -> Option<MenuState> {
    find_menu(page, 0).map(|menu| menu.state(page))
}

fn find_menu(page: &Page, focus_delay_ms: u64) -> Option<Menu> {
    let doc = page.document();
    let toggle = doc.find_first(doc.root(), |el| el.has_any_class(NAV_TOGGLE_CLASSES))?;
    let panel = doc.find_first(doc.root(), |el| el.has_class(NAV_COLLAPSE))?;
    Some(Menu {
        toggle,
        panel,
        focus_delay_ms,
    })
}

pub fn init(page: &mut Page, state: &mut ControllerState, config: &NavigationConfig) {
    if !claim(&mut state.nav_toggle) {
        return;
    }
    let Some(menu) = find_menu(page, config.focus_delay_ms) else {
        tracing::debug!("nav toggle: no toggle or collapse panel, skipping");
        return;
    };

    page.add_listener(EventTarget::Node(menu.toggle), EventType::Click, move |page, event| {
        event.prevent_default();
        if menu.is_open(page) {
            menu.close(page);
        } else {
            menu.open(page);
        }
    });

    let document = page.document_target();
    page.add_listener(document, EventType::KeyDown, move |page, event| {
        if event.key() == Some("Escape") && menu.is_open(page) {
            menu.close(page);
        }
    });

    page.add_listener(document, EventType::Click, move |page, event| {
        let Some(target) = event.target_node() else {
            return;
        };
        let doc = page.document();
        if menu.is_open(page)
            && !doc.contains(menu.panel, target)
            && !doc.contains(menu.toggle, target)
        {
            menu.close(page);
        }
    });

    let links = page
        .document()
        .find_all(menu.panel, |el| el.has_class(NAV_LINK));
    for link in links {
        page.add_listener(EventTarget::Node(link), EventType::Click, move |page, _| {
            if menu.is_open(page) {
                menu.close(page);
            }
        });
    }

    let breakpoint = config.breakpoint;
    let on_resize = debounce(config.resize_debounce_ms, move |page: &mut Page, ()| {
        if page.window().inner_width >= breakpoint && menu.is_open(page) {
            menu.close(page);
        }
    });
    page.add_listener(EventTarget::Window, EventType::Resize, move |page, _| {
        on_resize.call(page, ());
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    const MENU: &str = r##"
        <header class="l-header">
          <button class="navbar-toggler" aria-expanded="false">Menu</button>
          <nav class="navbar-collapse">
            <a class="nav-link" href="/">Home</a>
            <a class="nav-link" href="/about.html">About</a>
          </nav>
        </header>
        <main><p id="content">Body copy</p></main>
    "##;

    fn setup() -> Page {
        let mut page = page_from(MENU).with_viewport_width(375);
        let mut state = ControllerState::default();
        init(&mut page, &mut state, &NavigationConfig::default());
        page
    }

    #[test]
    fn toggle_opens_and_focuses_first_link_later() {
        let mut page = setup();
        let toggle = by_selector(&page, ".navbar-toggler");
        page.click(toggle);

        assert_eq!(menu_state(&page), Some(MenuState::Open));
        assert_eq!(page.document().attr(toggle, "aria-expanded"), Some("true"));
        assert_has_class(&page, "body", "u-no-scroll");
        assert_eq!(page.focused(), None);

        page.advance(100).unwrap();
        assert_eq!(page.focused(), Some(by_selector(&page, ".nav-link")));
    }

    #[test]
    fn second_toggle_click_closes_and_refocuses_toggle() {
        let mut page = setup();
        let toggle = by_selector(&page, ".navbar-toggler");
        page.click(toggle);
        page.click(toggle);

        assert_eq!(menu_state(&page), Some(MenuState::Closed));
        assert_eq!(page.document().attr(toggle, "aria-expanded"), Some("false"));
        assert_lacks_class(&page, "body", "u-no-scroll");
        assert_eq!(page.focused(), Some(toggle));
    }

    #[test]
    fn escape_closes_open_menu() {
        let mut page = setup();
        page.click(by_selector(&page, ".navbar-toggler"));
        page.press_key("Enter");
        assert_eq!(menu_state(&page), Some(MenuState::Open));
        page.press_key("Escape");
        assert_eq!(menu_state(&page), Some(MenuState::Closed));
    }

    #[test]
    fn outside_click_closes_but_inside_click_does_not() {
        let mut page = setup();
        page.click(by_selector(&page, ".navbar-toggler"));
        page.click(by_selector(&page, ".navbar-collapse"));
        assert_eq!(menu_state(&page), Some(MenuState::Open));
        page.click(by_id(&page, "content"));
        assert_eq!(menu_state(&page), Some(MenuState::Closed));
    }

    #[test]
    fn nav_link_click_closes() {
        let mut page = setup();
        page.click(by_selector(&page, ".navbar-toggler"));
        page.click(by_selector(&page, ".nav-link"));
        assert_eq!(menu_state(&page), Some(MenuState::Closed));
    }

    #[test]
    fn resize_past_breakpoint_closes_after_debounce() {
        let mut page = setup();
        page.click(by_selector(&page, ".navbar-toggler"));
        page.resize(800);
        page.resize(1200);
        page.advance(199).unwrap();
        assert_eq!(menu_state(&page), Some(MenuState::Open));
        page.advance(1).unwrap();
        assert_eq!(menu_state(&page), Some(MenuState::Closed));
    }

    #[test]
    fn resize_below_breakpoint_keeps_menu_open() {
        let mut page = setup();
        page.click(by_selector(&page, ".navbar-toggler"));
        page.resize(900);
        page.advance(500).unwrap();
        assert_eq!(menu_state(&page), Some(MenuState::Open));
    }

    #[test]
    fn init_is_idempotent() {
        let mut page = page_from(MENU);
        let mut state = ControllerState::default();
        let config = NavigationConfig::default();
        init(&mut page, &mut state, &config);
        let count = page.listener_count();
        init(&mut page, &mut state, &config);
        assert_eq!(page.listener_count(), count);
    }

    #[test]
    fn missing_markup_is_inert() {
        let mut page = page_from("<nav class=\"navbar-collapse\"></nav>");
        let mut state = ControllerState::default();
        init(&mut page, &mut state, &NavigationConfig::default());
        assert!(state.nav_toggle);
        assert_eq!(page.listener_count(), 0);
        assert_eq!(menu_state(&page), None);
    }
}
