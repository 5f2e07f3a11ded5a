//! Lazy loading hints and broken-image placeholders.

use super::markup::{DATA_CRITICAL, LOGO_IMAGE, PLACEHOLDER_IMAGE};
use crate::controller::{ControllerState, claim};
use crate::dom::Element;
use crate::event::{EventTarget, EventType};
use crate::page::Page;

fn is_critical(img: &Element) -> bool {
    img.has_class(LOGO_IMAGE) || img.has_attr(DATA_CRITICAL)
}

pub fn init(page: &mut Page, state: &mut ControllerState) {
    if !claim(&mut state.images) {
        return;
    }
    let doc = page.document();
    let images = doc.find_all(doc.root(), |el| el.is("img"));
    let lazy: Vec<_> = images
        .iter()
        .copied()
        .filter(|img| {
            doc.element(*img)
                .is_some_and(|el| !el.has_attr("loading") && !is_critical(el))
        })
        .collect();
    for img in lazy {
        page.document_mut().set_attr(img, "loading", "lazy");
    }

    for img in images {
        page.add_listener(EventTarget::Node(img), EventType::Error, |page, event| {
            let Some(img) = event.target_node() else {
                return;
            };
            if page.document().attr(img, "src") == Some(PLACEHOLDER_IMAGE) {
                return;
            }
            tracing::debug!(%img, "image failed to load, showing placeholder");
            page.document_mut().set_attr(img, "src", PLACEHOLDER_IMAGE);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    const PAGE: &str = r##"
        <img id="logo" class="c-logo__img" src="logo.svg">
        <img id="hero" src="hero.jpg" data-critical>
        <img id="eager" src="team.jpg" loading="eager">
        <img id="photo" src="photo.jpg">
    "##;

    fn setup() -> Page {
        let mut page = page_from(PAGE);
        let mut state = ControllerState::default();
        init(&mut page, &mut state);
        page
    }

    #[test]
    fn only_non_critical_images_without_loading_become_lazy() {
        let page = setup();
        let loading = |id| page.document().attr(by_id(&page, id), "loading");
        assert_eq!(loading("logo"), None);
        assert_eq!(loading("hero"), None);
        assert_eq!(loading("eager"), Some("eager"));
        assert_eq!(loading("photo"), Some("lazy"));
    }

    #[test]
    fn failed_image_gets_placeholder_once() {
        let mut page = setup();
        let photo = by_id(&page, "photo");
        page.fail_image_load(photo);
        assert_eq!(page.document().attr(photo, "src"), Some(PLACEHOLDER_IMAGE));
        page.fail_image_load(photo);
        assert_eq!(page.document().attr(photo, "src"), Some(PLACEHOLDER_IMAGE));
    }

    #[test]
    fn placeholder_is_the_labelled_svg() {
        assert!(PLACEHOLDER_IMAGE.starts_with("data:image/svg+xml,"));
        assert!(PLACEHOLDER_IMAGE.contains("viewBox=\"0 0 400 300\""));
        assert!(PLACEHOLDER_IMAGE.contains("%23e9ecef"));
        assert!(PLACEHOLDER_IMAGE.contains("%3EImage%3C"));
    }

    #[test]
    fn repeated_init_keeps_one_error_handler_per_image() {
        let mut page = page_from(PAGE);
        let mut state = ControllerState::default();
        init(&mut page, &mut state);
        let count = page.listener_count();
        let photo = by_id(&page, "photo");
        page.document_mut().remove_attr(photo, "loading");

        init(&mut page, &mut state);
        assert_eq!(page.listener_count(), count);
        assert_eq!(page.listener_count_for(EventTarget::Node(photo), EventType::Error), 1);
        assert_eq!(page.document().attr(photo, "loading"), None);
    }
}
