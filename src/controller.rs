//! Orchestrator: runs every behavior module once the document is ready.

use crate::behaviors::filter::FilterBar;
use crate::behaviors::submit::{SimulatedSubmitter, Submitter};
use crate::behaviors::{
    accordion, active_link, count_up, filter, forms, images, modal, nav_toggle, scroll_spy,
    scroll_top, smooth_scroll,
};
use crate::config::BehaviorConfig;
use crate::event::EventType;
use crate::page::{Page, ReadyState};
use std::cell::RefCell;
use std::rc::Rc;

/// Which modules have been initialised. Flags are only ever set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerState {
    pub initialized: bool,
    pub nav_toggle: bool,
    pub smooth_scroll: bool,
    pub scroll_spy: bool,
    pub active_link: bool,
    pub images: bool,
    pub forms: bool,
    pub scroll_to_top: bool,
    pub modals: bool,
    pub accordions: bool,
    pub filter: bool,
    pub count_up: bool,
}

/// Set `flag`, returning `true` only the first time.
pub fn claim(flag: &mut bool) -> bool {
    !std::mem::replace(flag, true)
}

pub struct Controller {
    state: ControllerState,
    config: Rc<BehaviorConfig>,
    submitter: Rc<dyn Submitter>,
    filter: Option<Rc<FilterBar>>,
}

impl Controller {
    pub fn new(config: BehaviorConfig) -> Self {
        let submitter = Rc::new(SimulatedSubmitter::new(config.forms.submit_latency_ms));
        Self {
            state: ControllerState::default(),
            config: Rc::new(config),
            submitter,
            filter: None,
        }
    }

    #[must_use]
    pub fn with_submitter(mut self, submitter: Rc<dyn Submitter>) -> Self {
        self.submitter = submitter;
        self
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn config(&self) -> &BehaviorConfig {
        &self.config
    }

    /// State of the category filter, if the page has one.
    pub fn filter(&self) -> Option<&FilterBar> {
        self.filter.as_deref()
    }

    /// Run every module's setup. Only the first call does anything.
    pub fn init(&mut self, page: &mut Page) {
        if !claim(&mut self.state.initialized) {
            return;
        }
        let config = Rc::clone(&self.config);
        let state = &mut self.state;
        nav_toggle::init(page, state, &config.navigation);
        smooth_scroll::init(page, state, &config.scrolling);
        scroll_spy::init(page, state, &config.scrolling);
        active_link::init(page, state);
        images::init(page, state);
        forms::init(page, state, &config, &self.submitter);
        scroll_top::init(page, state, &config.scrolling);
        modal::init(page, state);
        accordion::init(page, state);
        self.filter = filter::init(page, state);
        count_up::init(page, state, &config.counters);
        tracing::info!(listeners = page.listener_count(), "behaviors initialised");
    }
}

/// Initialise now if the page is parsed, otherwise on `DOMContentLoaded`.
pub fn boot(controller: &Rc<RefCell<Controller>>, page: &mut Page) {
    if page.ready_state() == ReadyState::Complete {
        controller.borrow_mut().init(page);
        return;
    }
    let controller = Rc::clone(controller);
    let document = page.document_target();
    page.add_listener(document, EventType::DomContentLoaded, move |page, _| {
        controller.borrow_mut().init(page);
    });
}
