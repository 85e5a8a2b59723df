use lazyload_core::{lazyload, LazyLoad, LazyLoadStats, Lifecycle, Record};
use lazyload_testing::{FakeDocument, FakeElement};

/// Three images stacked one viewport apart, the first one on screen.
fn stacked_gallery(document: &FakeDocument) -> Vec<FakeElement> {
    (0..3)
        .map(|i| {
            document.append(
                FakeElement::img()
                    .with_class("lazyload")
                    .with_attribute("data-src", &format!("photo-{i}.jpg"))
                    .at(i as f64 * 1000.0, 200.0),
            )
        })
        .collect()
}

#[test]
fn defaults_to_selector_query() {
    let document = FakeDocument::new();
    let gallery = stacked_gallery(&document);
    document.append(FakeElement::img().with_attribute("data-src", "eager.jpg"));

    let lazy = LazyLoad::new(document.clone(), None, None);

    assert_eq!(lazy.images(), gallery.as_slice());
    assert_eq!(lazy.strategy_name(), Some("threshold"));
    assert!(lazy.is_watching());
    assert_eq!(document.last_observer().unwrap().watched(), gallery);
}

#[test]
fn custom_selector_option() {
    let document = FakeDocument::new();
    stacked_gallery(&document);
    let hero = document.append(
        FakeElement::div()
            .with_class("hero")
            .with_attribute("data-src", "hero.jpg"),
    );

    let options = Record::new().with("selector", ".hero");
    let lazy = LazyLoad::new(document.clone(), None, Some(&options));

    assert_eq!(lazy.images(), &[hero]);
}

#[test]
fn explicit_elements_take_precedence() {
    let document = FakeDocument::new();
    let gallery = stacked_gallery(&document);

    let lazy = LazyLoad::new(document.clone(), Some(vec![gallery[2].clone()]), None);

    assert_eq!(lazy.images(), &gallery[2..]);
}

#[test]
fn only_intersecting_elements_load() {
    let document = FakeDocument::new();
    let gallery = stacked_gallery(&document);
    let lazy = LazyLoad::new(document.clone(), None, None);

    document.scroll_to(0.0);

    assert_eq!(gallery[0].src().as_deref(), Some("photo-0.jpg"));
    assert_eq!(gallery[1].src(), None);
    assert_eq!(gallery[2].src(), None);
    assert_eq!(
        lazy.stats(),
        LazyLoadStats {
            total: 3,
            pending: 2,
            loaded: 1
        }
    );
}

#[test]
fn scrolling_back_and_forth_loads_each_element_once() {
    let document = FakeDocument::new();
    let gallery = stacked_gallery(&document);
    let lazy = LazyLoad::new(document.clone(), None, None);

    for top in [0.0, 900.0, 0.0, 1900.0, 900.0, 0.0] {
        document.scroll_to(top);
    }

    assert!(gallery.iter().all(|image| image.mutation_count() == 1));
    assert_eq!(lazy.stats().pending, 0);
    assert!(document.last_observer().unwrap().watched().is_empty());
}

#[test]
fn element_at_viewport_edge_stays_pending() {
    let document = FakeDocument::new();
    let edge = document.append(
        FakeElement::img()
            .with_class("lazyload")
            .with_attribute("data-src", "edge.jpg")
            .at(600.0, 100.0),
    );
    let _lazy = LazyLoad::new(document.clone(), None, None);

    document.scroll_to(0.0);

    assert_eq!(edge.src(), None);
    document.scroll_to(1.0);
    assert_eq!(edge.src().as_deref(), Some("edge.jpg"));
}

#[test]
fn load_images_bypasses_visibility() {
    let document = FakeDocument::new();
    let gallery = stacked_gallery(&document);
    let lazy = LazyLoad::new(document.clone(), None, None);

    lazy.load_images();

    assert!(gallery.iter().all(|image| image.src().is_some()));
    assert_eq!(lazy.stats().pending, 3);
    assert!(lazy.is_watching());
    assert_eq!(document.last_observer().unwrap().watched().len(), 3);
}

#[test]
fn load_and_destroy_loads_everything_and_releases() {
    let document = FakeDocument::new();
    let gallery = stacked_gallery(&document);
    let mut lazy = LazyLoad::new(document.clone(), None, None);

    lazy.load_and_destroy();

    assert!(gallery.iter().all(|image| image.mutation_count() == 1));
    assert!(lazy.is_destroyed());
    assert!(!lazy.is_watching());
    assert_eq!(document.last_observer().unwrap().disconnect_calls(), 1);
}

#[test]
fn destroy_twice_is_harmless() {
    let document = FakeDocument::new();
    stacked_gallery(&document);
    let mut lazy = LazyLoad::new(document.clone(), None, None);

    lazy.destroy();
    lazy.destroy();

    assert_eq!(lazy.lifecycle(), Lifecycle::Destroyed);
    assert!(lazy.settings().is_none());
    assert_eq!(document.last_observer().unwrap().disconnect_calls(), 1);
}

#[test]
fn destroyed_controller_is_inert() {
    let document = FakeDocument::new();
    let gallery = stacked_gallery(&document);
    let mut lazy = LazyLoad::new(document.clone(), None, None);

    lazy.destroy();
    lazy.init();
    lazy.load_images();
    lazy.load_and_destroy();
    document.scroll_to(0.0);

    assert!(gallery.iter().all(|image| image.mutation_count() == 0));
    assert_eq!(document.observers().len(), 1);
    assert_eq!(lazy.strategy_name(), None);
}

#[test]
fn fallback_mode_loads_synchronously() {
    let document = FakeDocument::without_intersection_observer();
    let gallery = stacked_gallery(&document);
    let banner = document.append(
        FakeElement::div()
            .with_class("lazyload")
            .with_attribute("data-src", "banner.png"),
    );

    let lazy = LazyLoad::new(document.clone(), None, None);

    assert!(gallery.iter().all(|image| image.src().is_some()));
    assert_eq!(banner.background_image().as_deref(), Some("url(banner.png)"));
    assert_eq!(lazy.strategy_name(), Some("immediate"));
    assert!(!lazy.is_watching());
    assert_eq!(lazy.stats().loaded, 4);
}

#[test]
fn destroy_in_fallback_mode() {
    let document = FakeDocument::without_intersection_observer();
    stacked_gallery(&document);
    let mut lazy = LazyLoad::new(document.clone(), None, None);

    lazy.destroy();
    lazy.destroy();

    assert!(lazy.is_destroyed());
    assert!(document.observers().is_empty());
}

#[test]
fn init_again_does_not_reload() {
    let document = FakeDocument::new();
    let gallery = stacked_gallery(&document);
    let mut lazy = LazyLoad::new(document.clone(), None, None);
    document.scroll_to(0.0);

    lazy.init();
    document.scroll_to(0.0);
    document.scroll_to(1000.0);

    let observers = document.observers();
    assert_eq!(observers.len(), 2);
    assert_eq!(observers[0].disconnect_calls(), 1);
    assert_eq!(gallery[0].mutation_count(), 1);
    assert_eq!(gallery[1].mutation_count(), 1);
    assert_eq!(gallery[2].src(), None);
}

#[test]
fn removed_element_is_not_loaded() {
    let document = FakeDocument::new();
    let gallery = stacked_gallery(&document);
    let lazy = LazyLoad::new(document.clone(), None, None);

    document.remove(&gallery[0]);
    document.reveal(&gallery[0]);

    assert_eq!(gallery[0].mutation_count(), 0);
    assert!(!document.last_observer().unwrap().is_watching(&gallery[0]));
    assert_eq!(lazy.stats().pending, 3);
}

#[test]
fn reattached_element_loads_after_init() {
    let document = FakeDocument::new();
    let gallery = stacked_gallery(&document);
    let mut lazy = LazyLoad::new(document.clone(), None, None);
    document.remove(&gallery[0]);
    document.reveal(&gallery[0]);

    document.append(gallery[0].clone());
    lazy.init();
    document.reveal(&gallery[0]);

    assert_eq!(gallery[0].src().as_deref(), Some("photo-0.jpg"));
    assert_eq!(lazy.stats().loaded, 1);
}

#[test]
fn elements_added_later_are_not_picked_up() {
    let document = FakeDocument::new();
    stacked_gallery(&document);
    let lazy = LazyLoad::new(document.clone(), None, None);

    let late = document.append(
        FakeElement::img()
            .with_class("lazyload")
            .with_attribute("data-src", "late.jpg"),
    );
    document.reveal(&late);

    assert_eq!(late.src(), None);
    assert_eq!(lazy.images().len(), 3);
}

#[test]
fn dropping_the_controller_releases_the_observer() {
    let document = FakeDocument::new();
    stacked_gallery(&document);

    let lazy = lazyload(document.clone(), None, None);
    drop(lazy);

    assert_eq!(document.last_observer().unwrap().disconnect_calls(), 1);
}

#[test]
fn observer_options_follow_settings() {
    let document = FakeDocument::new();
    stacked_gallery(&document);
    let options = Record::new()
        .with("rootMargin", "300px 0px")
        .with("threshold", 0.1);

    let _lazy = LazyLoad::new(document.clone(), None, Some(&options));

    let observer_options = document.last_observer().unwrap().options();
    assert_eq!(observer_options.root_margin, "300px 0px");
    assert_eq!(observer_options.thresholds.as_slice(), &[0.1]);
}
