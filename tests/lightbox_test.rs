//! Lightbox behavior against the Slate gallery markup and random input.

use proptest::prelude::*;

use themekit::dom::parse_html;
use themekit::lightbox::{
    Control, DomView, GalleryDocument, GalleryItem, Key, Lightbox, LightboxState, ViewState,
};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!("{}/{}", FIXTURES_DIR, name)).expect("fixture readable")
}

fn gallery(n: usize) -> Vec<GalleryItem> {
    (0..n)
        .map(|i| GalleryItem::new(format!("/img/{i}.jpg"), format!("Image {i}")))
        .collect()
}

#[test]
fn test_slate_fixture_walkthrough() {
    let mut dom = parse_html(&fixture("slate_gallery.html"));
    let doc = GalleryDocument::from_dom(&dom).unwrap();
    assert_eq!(doc.items.len(), 3);
    assert_eq!(doc.items[0].link_url.as_deref(), Some("/photos/dawn/"));
    assert_eq!(doc.items[2].title, "");

    let elements = doc.elements.expect("lightbox markup present");
    let thumb = dom.query_all(".gallery-item img").unwrap()[1];
    let control = doc.control_for(&dom, thumb).unwrap();
    assert_eq!(control, Control::Item(1));

    let mut lightbox = Lightbox::new(doc.items.clone(), DomView::new(&mut dom, elements));
    let first = lightbox.click(control).unwrap();
    let second = lightbox.key_down(Key::ArrowRight).unwrap();

    assert!(!lightbox.image_loaded(first));
    assert!(lightbox.image_loaded(second));
    assert_eq!(lightbox.state(), LightboxState::Open(2));

    let view = lightbox.view();
    let page = view.dom();
    assert_eq!(
        page.get_attr(elements.image, "src"),
        Some("/content/images/dusk.jpg")
    );
    assert_eq!(page.text_content(elements.title), "");
    assert!(page.has_class(elements.next, "is-hidden"));
    assert!(page.has_class(elements.image, "is-loaded"));

    lightbox.key_down(Key::Escape);
    let page = lightbox.view().dom();
    assert_eq!(page.get_attr(elements.root, "aria-hidden"), Some("true"));
    let body = elements.body.unwrap();
    assert_eq!(page.get_attr(body, "style"), None);
}

#[test]
fn test_three_item_navigation() {
    let mut lightbox = Lightbox::new(gallery(3), ViewState::default());

    lightbox.open(0);
    assert!(lightbox.view().prev_hidden);
    assert!(!lightbox.view().next_hidden);

    assert!(lightbox.navigate_to(-1).is_none());
    assert_eq!(lightbox.current_index(), Some(0));

    lightbox.navigate_to(2);
    assert!(lightbox.view().next_hidden);
    assert!(!lightbox.view().prev_hidden);

    lightbox.close();
    assert_eq!(lightbox.state(), LightboxState::Closed);
    assert!(!lightbox.view().scroll_locked);
}

#[test]
fn test_swipe_distances() {
    let mut lightbox = Lightbox::new(gallery(3), ViewState::default());
    lightbox.open(1);

    lightbox.touch_start(300.0);
    assert!(lightbox.touch_end(260.0).is_none());
    assert_eq!(lightbox.current_index(), Some(1));

    lightbox.touch_start(300.0);
    lightbox.touch_end(240.0);
    assert_eq!(lightbox.current_index(), Some(2));
}

#[derive(Debug, Clone)]
enum Op {
    Open(usize),
    Close,
    Navigate(isize),
    Key(Key),
    Swipe(f64, f64),
    Click(Control),
    Loaded(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..8).prop_map(Op::Open),
        Just(Op::Close),
        (-3isize..8).prop_map(Op::Navigate),
        prop_oneof![
            Just(Key::Escape),
            Just(Key::ArrowLeft),
            Just(Key::ArrowRight),
            Just(Key::Other),
        ]
        .prop_map(Op::Key),
        (0.0f64..400.0, 0.0f64..400.0).prop_map(|(a, b)| Op::Swipe(a, b)),
        prop_oneof![
            (0usize..8).prop_map(Control::Item),
            Just(Control::Prev),
            Just(Control::Next),
            Just(Control::Close),
            Just(Control::Backdrop),
        ]
        .prop_map(Op::Click),
        (0usize..16).prop_map(Op::Loaded),
    ]
}

proptest! {
    #[test]
    fn prop_view_tracks_state(n in 0usize..6, ops in prop::collection::vec(op(), 0..40)) {
        let mut lightbox = Lightbox::new(gallery(n), ViewState::default());
        let mut tickets = Vec::new();

        for op in ops {
            let ticket = match op {
                Op::Open(i) => lightbox.open(i),
                Op::Close => {
                    lightbox.close();
                    None
                }
                Op::Navigate(i) => lightbox.navigate_to(i),
                Op::Key(key) => lightbox.key_down(key),
                Op::Swipe(start, end) => {
                    lightbox.touch_start(start);
                    lightbox.touch_end(end)
                }
                Op::Click(control) => lightbox.click(control),
                Op::Loaded(k) => {
                    if let Some(&ticket) = tickets.get(k) {
                        lightbox.image_loaded(ticket);
                    }
                    None
                }
            };
            tickets.extend(ticket);

            let view = lightbox.view();
            match lightbox.state() {
                LightboxState::Open(i) => {
                    prop_assert!(i < n);
                    prop_assert!(view.active && !view.aria_hidden && view.scroll_locked);
                    prop_assert_eq!(view.prev_hidden, i == 0);
                    prop_assert_eq!(view.next_hidden, i + 1 == n);
                    prop_assert_eq!(&view.image_src, &format!("/img/{i}.jpg"));
                }
                LightboxState::Closed => {
                    prop_assert!(!view.active && view.aria_hidden && !view.scroll_locked);
                    prop_assert!(!view.loaded);
                }
            }
        }

        // Only the newest ticket can still be current.
        if let Some((last, older)) = tickets.split_last() {
            for &stale in older {
                prop_assert!(!lightbox.image_loaded(stale));
            }
            let open = lightbox.is_open();
            prop_assert_eq!(lightbox.image_loaded(*last), open);
        }
    }
}
