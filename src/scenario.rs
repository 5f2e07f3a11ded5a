//! Declarative scenarios: load a page, act on it, check the result.
//!
//! A scenario is a TOML file that names an HTML page, describes the layout
//! the host should pretend to have, and lists steps. Steps are either user
//! actions (click, type, scroll, advance the clock, ...) or expectations
//! about the document at that point.
//!
//! ```toml
//! page = "../site/index.html"
//! path = "/index.html"
//! viewport_width = 800
//!
//! [layout]
//! ".l-header" = { top = 0, height = 64 }
//! "#services" = { top = 900, height = 600 }
//!
//! [[steps]]
//! action = "click"
//! target = ".navbar-toggler"
//!
//! [[steps]]
//! action = "expect"
//! target = ".navbar-collapse"
//! has_class = "show"
//! ```
//!
//! ## Failures vs Errors
//!
//! An expectation that does not hold is a *failure*: it is recorded in the
//! report and the run continues, so one report lists everything that is off.
//! A scenario that cannot be run at all (unreadable file, bad selector, an
//! action whose target is missing, a runaway timer loop) is an *error*.
//!
//! ## Discovery
//!
//! [`discover_scenarios`] walks a directory tree for `*.toml` files, skipping
//! `behaviors.toml`, which configures the run rather than describing a
//! scenario. Results are sorted so parallel runs report in a stable order.

use crate::config::{self, BehaviorConfig, ConfigError};
use crate::controller::{self, Controller};
use crate::dom::{Geometry, NodeId, ParseError, Selector, SelectorError};
use crate::page::{Page, PageError, ReadyState, ScrollBehavior};
use crate::render::render_document;
use crate::snapshot::digest_state;
use serde::Deserialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;
use walkdir::WalkDir;

/// Tolerance for comparing scroll offsets.
const SCROLL_EPSILON: f64 = 0.5;

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("HTML parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("invalid selector `{selector}`: {source}")]
    Selector {
        selector: String,
        #[source]
        source: SelectorError,
    },
    #[error("step {step}: nothing matches `{selector}`")]
    TargetNotFound { step: usize, selector: String },
    #[error("page error: {0}")]
    Page(#[from] PageError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Readiness {
    #[default]
    Complete,
    Loading,
}

impl From<Readiness> for ReadyState {
    fn from(ready: Readiness) -> Self {
        match ready {
            Readiness::Complete => ReadyState::Complete,
            Readiness::Loading => ReadyState::Loading,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutBox {
    pub top: f64,
    #[serde(default)]
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// HTML file, relative to the scenario file.
    pub page: PathBuf,
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,
    #[serde(default = "default_true")]
    pub smooth_scroll: bool,
    #[serde(default)]
    pub ready: Readiness,
    #[serde(default)]
    pub description: Option<String>,
    /// Selector → box, applied to every matching element before boot.
    #[serde(default)]
    pub layout: BTreeMap<String, LayoutBox>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

fn default_path() -> String {
    "/".to_string()
}

fn default_viewport_width() -> u32 {
    1280
}

fn default_true() -> bool {
    true
}

fn default_ratio() -> f64 {
    1.0
}

/// One scenario step, tagged by `action`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Step {
    Click {
        target: String,
    },
    /// Key press on the focused element (or the body).
    Key {
        key: String,
    },
    Focus {
        target: String,
    },
    Blur {
        target: String,
    },
    Type {
        target: String,
        text: String,
    },
    Check {
        target: String,
        #[serde(default = "default_true")]
        checked: bool,
    },
    Submit {
        target: String,
    },
    Scroll {
        to: f64,
        #[serde(default)]
        smooth: bool,
    },
    Resize {
        width: u32,
    },
    ImageError {
        target: String,
    },
    /// Set the visible ratio of every match.
    Reveal {
        target: String,
        #[serde(default = "default_ratio")]
        ratio: f64,
    },
    Advance {
        ms: u64,
    },
    /// Fire `DOMContentLoaded` on a page that started out loading.
    Load,
    Expect(Expectation),
}

/// Assertions about the page. Every field is optional; element checks apply
/// to the first match of `target`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Expectation {
    pub target: Option<String>,
    pub has_class: Option<String>,
    pub lacks_class: Option<String>,
    /// Attribute must be present; with `equals`, it must have that value.
    pub attribute: Option<String>,
    pub equals: Option<String>,
    pub lacks_attribute: Option<String>,
    /// Trimmed text content.
    pub text: Option<String>,
    /// No inline `display: none` on the element or any ancestor.
    pub visible: Option<bool>,
    /// Number of elements matching `target`.
    pub count: Option<usize>,
    pub location: Option<String>,
    pub hash: Option<String>,
    pub scroll_y: Option<f64>,
}

impl Expectation {
    fn checks_element(&self) -> bool {
        self.has_class.is_some()
            || self.lacks_class.is_some()
            || self.attribute.is_some()
            || self.lacks_attribute.is_some()
            || self.text.is_some()
            || self.visible.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectationFailure {
    /// 1-based step number.
    pub step: usize,
    pub message: String,
}

/// Outcome of one scenario run. Plain owned data, safe to send across threads.
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub name: String,
    pub description: Option<String>,
    pub steps: usize,
    pub failures: Vec<ExpectationFailure>,
    pub final_time_ms: u64,
    /// Final pathname plus hash.
    pub location: String,
    pub html: String,
    pub digest: String,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

pub fn load_scenario(path: &Path) -> Result<Scenario, ScenarioError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load and run a scenario file with `config`. The page path is resolved
/// against the scenario file's directory.
pub fn run_file(
    path: &Path,
    config: &BehaviorConfig,
    name: &str,
) -> Result<ScenarioReport, ScenarioError> {
    let scenario = load_scenario(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let html = fs::read_to_string(base.join(&scenario.page))?;
    run_scenario(&scenario, &html, config, name)
}

/// Run one scenario file on its own, outside a `check`.
///
/// When the file lives under `root` it gets the same name and cascaded
/// config a `check` of `root` would give it; otherwise it is named by its
/// file name and configured from its own directory.
pub fn run_standalone(path: &Path, root: &Path) -> Result<ScenarioReport, ScenarioError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let config = config::load_cascaded_config(root, dir)?;
    let name = if path.starts_with(root) {
        scenario_name(root, path)
    } else {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    };
    run_file(path, &config, &name)
}

/// Run `scenario` against already-loaded page markup.
pub fn run_scenario(
    scenario: &Scenario,
    html: &str,
    config: &BehaviorConfig,
    name: &str,
) -> Result<ScenarioReport, ScenarioError> {
    tracing::info!(scenario = name, steps = scenario.steps.len(), "running scenario");
    let mut page = Page::from_html(html)?
        .with_path(&scenario.path)
        .with_viewport_width(scenario.viewport_width)
        .with_smooth_scroll(scenario.smooth_scroll)
        .with_ready_state(scenario.ready.into());

    for (selector, layout) in &scenario.layout {
        for node in select_all(&page, selector)? {
            page.document_mut().set_geometry(
                node,
                Geometry {
                    top: layout.top,
                    height: layout.height,
                },
            );
        }
    }

    let controller = Rc::new(RefCell::new(Controller::new(config.clone())));
    controller::boot(&controller, &mut page);

    let mut failures = Vec::new();
    for (index, step) in scenario.steps.iter().enumerate() {
        let number = index + 1;
        tracing::debug!(step = number, ?step, "scenario step");
        match step {
            Step::Expect(expectation) => {
                failures.extend(check(&page, expectation)?.into_iter().map(|message| {
                    ExpectationFailure {
                        step: number,
                        message,
                    }
                }));
            }
            action => perform(&mut page, number, action)?,
        }
    }

    let location = page.location();
    let location = format!("{}{}", location.pathname, location.hash);
    let html = render_document(page.document());
    let digest = digest_state(&location, &html);
    Ok(ScenarioReport {
        name: name.to_string(),
        description: scenario.description.clone(),
        steps: scenario.steps.len(),
        failures,
        final_time_ms: page.now(),
        location,
        html,
        digest,
    })
}

fn perform(page: &mut Page, step: usize, action: &Step) -> Result<(), ScenarioError> {
    match action {
        Step::Click { target } => {
            let node = resolve(page, step, target)?;
            page.click(node);
        }
        Step::Key { key } => page.press_key(key),
        Step::Focus { target } => {
            let node = resolve(page, step, target)?;
            page.focus(node);
        }
        Step::Blur { target } => {
            let node = resolve(page, step, target)?;
            page.blur(node);
        }
        Step::Type { target, text } => {
            let node = resolve(page, step, target)?;
            page.type_text(node, text);
        }
        Step::Check { target, checked } => {
            let node = resolve(page, step, target)?;
            page.set_checked(node, *checked);
        }
        Step::Submit { target } => {
            let node = resolve(page, step, target)?;
            page.submit(node);
        }
        Step::Scroll { to, smooth } => {
            let behavior = if *smooth {
                ScrollBehavior::Smooth
            } else {
                ScrollBehavior::Instant
            };
            page.scroll_to(*to, behavior);
        }
        Step::Resize { width } => page.resize(*width),
        Step::ImageError { target } => {
            let node = resolve(page, step, target)?;
            page.fail_image_load(node);
        }
        Step::Reveal { target, ratio } => {
            let nodes = select_all(page, target)?;
            if nodes.is_empty() {
                return Err(ScenarioError::TargetNotFound {
                    step,
                    selector: target.clone(),
                });
            }
            for node in nodes {
                page.set_visible_ratio(node, *ratio);
            }
        }
        Step::Advance { ms } => {
            page.advance(*ms)?;
        }
        Step::Load => page.finish_loading(),
        Step::Expect(_) => {}
    }
    Ok(())
}

fn check(page: &Page, expect: &Expectation) -> Result<Vec<String>, ScenarioError> {
    let mut failures = Vec::new();

    match &expect.target {
        Some(target) => {
            let nodes = select_all(page, target)?;
            if let Some(count) = expect.count
                && nodes.len() != count
            {
                failures.push(format!(
                    "expected {count} match(es) for `{target}`, found {}",
                    nodes.len()
                ));
            }
            if expect.checks_element() {
                match nodes.first() {
                    Some(&node) => failures.extend(check_element(page, node, target, expect)),
                    None => failures.push(format!("nothing matches `{target}`")),
                }
            }
        }
        None if expect.checks_element() || expect.count.is_some() => {
            failures.push("element expectation without a `target`".to_string());
        }
        None => {}
    }

    let location = page.location();
    if let Some(path) = &expect.location
        && &location.pathname != path
    {
        failures.push(format!(
            "expected location `{path}`, got `{}`",
            location.pathname
        ));
    }
    if let Some(hash) = &expect.hash
        && &location.hash != hash
    {
        failures.push(format!("expected hash `{hash}`, got `{}`", location.hash));
    }
    if let Some(scroll_y) = expect.scroll_y {
        let actual = page.window().scroll_y;
        if (actual - scroll_y).abs() > SCROLL_EPSILON {
            failures.push(format!("expected scroll_y {scroll_y}, got {actual}"));
        }
    }
    Ok(failures)
}

fn check_element(page: &Page, node: NodeId, target: &str, expect: &Expectation) -> Vec<String> {
    let doc = page.document();
    let classes = || doc.attr(node, "class").unwrap_or_default().to_string();
    let mut failures = Vec::new();

    if let Some(class) = &expect.has_class
        && !doc.has_class(node, class)
    {
        failures.push(format!(
            "`{target}` lacks class `{class}` (class=\"{}\")",
            classes()
        ));
    }
    if let Some(class) = &expect.lacks_class
        && doc.has_class(node, class)
    {
        failures.push(format!(
            "`{target}` has class `{class}` (class=\"{}\")",
            classes()
        ));
    }
    if let Some(name) = &expect.attribute {
        match (doc.attr(node, name), &expect.equals) {
            (None, _) => failures.push(format!("`{target}` has no `{name}` attribute")),
            (Some(actual), Some(wanted)) if actual != wanted => failures.push(format!(
                "`{target}` {name}=\"{actual}\", expected \"{wanted}\""
            )),
            _ => {}
        }
    }
    if let Some(name) = &expect.lacks_attribute
        && let Some(actual) = doc.attr(node, name)
    {
        failures.push(format!("`{target}` has {name}=\"{actual}\""));
    }
    if let Some(text) = &expect.text {
        let actual = doc.text_content(node);
        if actual.trim() != text {
            failures.push(format!(
                "`{target}` text is \"{}\", expected \"{text}\"",
                actual.trim()
            ));
        }
    }
    if let Some(visible) = expect.visible {
        let actual = is_displayed(page, node);
        if actual != visible {
            let state = if actual { "visible" } else { "hidden" };
            failures.push(format!("`{target}` is {state}"));
        }
    }
    failures
}

/// No inline `display: none` on `node` or any of its ancestors.
fn is_displayed(page: &Page, node: NodeId) -> bool {
    let doc = page.document();
    doc.ancestors(node)
        .all(|n| doc.style_property(n, "display").as_deref() != Some("none"))
}

fn parse_selector(selector: &str) -> Result<Selector, ScenarioError> {
    Selector::parse(selector).map_err(|source| ScenarioError::Selector {
        selector: selector.to_string(),
        source,
    })
}

fn select_all(page: &Page, selector: &str) -> Result<Vec<NodeId>, ScenarioError> {
    let parsed = parse_selector(selector)?;
    let doc = page.document();
    Ok(doc.select_all(doc.root(), &parsed))
}

fn resolve(page: &Page, step: usize, selector: &str) -> Result<NodeId, ScenarioError> {
    select_all(page, selector)?
        .into_iter()
        .next()
        .ok_or_else(|| ScenarioError::TargetNotFound {
            step,
            selector: selector.to_string(),
        })
}

/// Every scenario file under `dir`, sorted.
pub fn discover_scenarios(dir: &Path) -> Result<Vec<PathBuf>, ScenarioError> {
    let mut found = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(std::io::Error::from)?;
        let path = entry.path();
        let is_toml = path.extension().is_some_and(|ext| ext == "toml");
        let is_config = path.file_name().is_some_and(|n| n == config::CONFIG_FILE);
        if entry.file_type().is_file() && is_toml && !is_config {
            found.push(path.to_path_buf());
        }
    }
    found.sort();
    Ok(found)
}

/// Manifest key for a scenario: its path relative to `dir`, `/`-separated.
pub fn scenario_name(dir: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(dir).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const PAGE: &str = r##"<html><body>
        <header class="l-header"><nav>
            <button class="navbar-toggler">Menu</button>
            <div class="navbar-collapse" id="menu">
                <a class="nav-link" href="#about">About</a>
            </div>
        </nav></header>
        <section id="about"><h2>About</h2></section>
        <button data-filter="all">All</button>
        <button data-filter="web">Web</button>
        <div data-category="web">Site</div>
        <div data-category="design">Logo</div>
        <span id="stat" data-count="100">0</span>
    </body></html>"##;

    fn scenario(toml_src: &str) -> Scenario {
        toml::from_str(toml_src).unwrap()
    }

    fn run(toml_src: &str) -> ScenarioReport {
        run_scenario(&scenario(toml_src), PAGE, &BehaviorConfig::default(), "test").unwrap()
    }

    #[test]
    fn defaults_apply_to_sparse_scenario() {
        let s = scenario(r#"page = "index.html""#);
        assert_eq!(s.path, "/");
        assert_eq!(s.viewport_width, 1280);
        assert!(s.smooth_scroll);
        assert_eq!(s.ready, Readiness::Complete);
        assert!(s.steps.is_empty());
    }

    #[test]
    fn steps_parse_by_action_tag() {
        let s = scenario(
            r##"
            page = "index.html"
            [[steps]]
            action = "image-error"
            target = "img"
            [[steps]]
            action = "reveal"
            target = "[data-count]"
            [[steps]]
            action = "check"
            target = "#agree"
            [[steps]]
            action = "load"
            [[steps]]
            action = "expect"
            target = ".nav-link"
            has_class = "active"
            "##,
        );
        assert_eq!(
            s.steps[0],
            Step::ImageError {
                target: "img".into()
            }
        );
        assert_eq!(
            s.steps[1],
            Step::Reveal {
                target: "[data-count]".into(),
                ratio: 1.0
            }
        );
        assert_eq!(
            s.steps[2],
            Step::Check {
                target: "#agree".into(),
                checked: true
            }
        );
        assert_eq!(s.steps[3], Step::Load);
        let Step::Expect(expect) = &s.steps[4] else {
            panic!("expected an expect step, got {:?}", s.steps[4]);
        };
        assert_eq!(expect.has_class.as_deref(), Some("active"));
    }

    #[test]
    fn unknown_expectation_field_is_rejected() {
        let result: Result<Scenario, _> = toml::from_str(
            r#"
            page = "index.html"
            [[steps]]
            action = "expect"
            target = "body"
            has_klass = "x"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn menu_toggle_scenario_passes() {
        let report = run(r#"
            page = "index.html"
            viewport_width = 800
            [[steps]]
            action = "click"
            target = ".navbar-toggler"
            [[steps]]
            action = "expect"
            target = ".navbar-collapse"
            has_class = "show"
            [[steps]]
            action = "expect"
            target = ".navbar-toggler"
            attribute = "aria-expanded"
            equals = "true"
            [[steps]]
            action = "key"
            key = "Escape"
            [[steps]]
            action = "expect"
            target = ".navbar-collapse"
            lacks_class = "show"
            "#);
        assert!(report.passed(), "{:?}", report.failures);
        assert_eq!(report.steps, 5);
    }

    #[test]
    fn failed_expectation_is_recorded_and_run_continues() {
        let report = run(r##"
            page = "index.html"
            [[steps]]
            action = "expect"
            target = ".navbar-collapse"
            has_class = "show"
            [[steps]]
            action = "expect"
            target = "[data-category]"
            count = 3
            [[steps]]
            action = "expect"
            target = "#missing"
            text = "x"
            "##);
        assert!(!report.passed());
        let steps: Vec<usize> = report.failures.iter().map(|f| f.step).collect();
        assert_eq!(steps, vec![1, 2, 3]);
        assert!(report.failures[1].message.contains("found 2"));
    }

    #[test]
    fn filter_hides_items_through_inline_display() {
        let report = run(r#"
            page = "index.html"
            [[steps]]
            action = "click"
            target = "[data-filter=web]"
            [[steps]]
            action = "expect"
            target = "[data-category=design]"
            visible = false
            [[steps]]
            action = "expect"
            target = "[data-category=web]"
            visible = true
            "#);
        assert!(report.passed(), "{:?}", report.failures);
    }

    #[test]
    fn smooth_scroll_uses_layout_table() {
        let report = run(r##"
            page = "index.html"
            [layout]
            ".l-header" = { top = 0, height = 64 }
            "#about" = { top = 900, height = 400 }
            [[steps]]
            action = "click"
            target = ".nav-link"
            [[steps]]
            action = "expect"
            scroll_y = 836
            hash = "#about"
            "##);
        assert!(report.passed(), "{:?}", report.failures);
        assert_eq!(report.location, "/#about");
    }

    #[test]
    fn reveal_and_advance_run_the_counter() {
        let report = run(r##"
            page = "index.html"
            [[steps]]
            action = "reveal"
            target = "#stat"
            [[steps]]
            action = "advance"
            ms = 3000
            [[steps]]
            action = "expect"
            target = "#stat"
            text = "100"
            has_class = "counted"
            "##);
        assert!(report.passed(), "{:?}", report.failures);
        assert_eq!(report.final_time_ms, 3000);
    }

    #[test]
    fn loading_page_boots_on_load_step() {
        let report = run(r#"
            page = "index.html"
            ready = "loading"
            [[steps]]
            action = "click"
            target = ".navbar-toggler"
            [[steps]]
            action = "expect"
            target = ".navbar-collapse"
            lacks_class = "show"
            [[steps]]
            action = "load"
            [[steps]]
            action = "click"
            target = ".navbar-toggler"
            [[steps]]
            action = "expect"
            target = ".navbar-collapse"
            has_class = "show"
            "#);
        assert!(report.passed(), "{:?}", report.failures);
    }

    #[test]
    fn missing_action_target_is_an_error() {
        let result = run_scenario(
            &scenario(
                r##"
                page = "index.html"
                [[steps]]
                action = "click"
                target = "#nope"
                "##,
            ),
            PAGE,
            &BehaviorConfig::default(),
            "test",
        );
        assert!(matches!(
            result,
            Err(ScenarioError::TargetNotFound { step: 1, ref selector }) if selector == "#nope"
        ));
    }

    #[test]
    fn bad_selector_is_an_error() {
        let result = run_scenario(
            &scenario(
                r#"
                page = "index.html"
                [[steps]]
                action = "expect"
                target = "[unterminated"
                count = 0
                "#,
            ),
            PAGE,
            &BehaviorConfig::default(),
            "test",
        );
        assert!(matches!(result, Err(ScenarioError::Selector { .. })));
    }

    #[test]
    fn digest_is_stable_across_runs() {
        let src = r#"
            page = "index.html"
            [[steps]]
            action = "click"
            target = ".navbar-toggler"
            "#;
        assert_eq!(run(src).digest, run(src).digest);
        assert_ne!(run(src).digest, run(r#"page = "index.html""#).digest);
    }

    #[test]
    fn run_file_resolves_page_relative_to_scenario() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("site")).unwrap();
        fs::create_dir_all(tmp.path().join("scenarios")).unwrap();
        fs::write(tmp.path().join("site/index.html"), PAGE).unwrap();
        let file = tmp.path().join("scenarios/nav.toml");
        fs::write(
            &file,
            r#"
            page = "../site/index.html"
            [[steps]]
            action = "expect"
            target = ".nav-link"
            count = 1
            "#,
        )
        .unwrap();
        let report = run_file(&file, &BehaviorConfig::default(), "nav.toml").unwrap();
        assert!(report.passed(), "{:?}", report.failures);
    }

    #[test]
    fn run_standalone_reads_neighbouring_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("index.html"), PAGE).unwrap();
        fs::write(
            tmp.path().join(config::CONFIG_FILE),
            "[counters]\nthreshold = 2.0\n",
        )
        .unwrap();
        let file = tmp.path().join("s.toml");
        fs::write(&file, r#"page = "index.html""#).unwrap();
        assert!(matches!(
            run_standalone(&file, tmp.path()),
            Err(ScenarioError::Config(_))
        ));
    }

    #[test]
    fn run_standalone_names_by_root_relative_path() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("nav")).unwrap();
        fs::write(tmp.path().join("index.html"), PAGE).unwrap();
        let file = tmp.path().join("nav/menu.toml");
        fs::write(&file, r#"page = "../index.html""#).unwrap();
        let report = run_standalone(&file, tmp.path()).unwrap();
        assert_eq!(report.name, "nav/menu.toml");

        let other = TempDir::new().unwrap();
        let report = run_standalone(&file, other.path()).unwrap();
        assert_eq!(report.name, "menu.toml");
    }

    #[test]
    fn discovery_is_recursive_sorted_and_skips_config() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("forms")).unwrap();
        for file in ["nav.toml", "forms/contact.toml", "behaviors.toml", "notes.md"] {
            fs::write(tmp.path().join(file), "").unwrap();
        }
        let names: Vec<String> = discover_scenarios(tmp.path())
            .unwrap()
            .iter()
            .map(|p| scenario_name(tmp.path(), p))
            .collect();
        assert_eq!(names, vec!["forms/contact.toml", "nav.toml"]);
    }
}
