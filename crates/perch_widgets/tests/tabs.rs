//! Tab navigator scenarios

use std::cell::RefCell;
use std::rc::Rc;

use perch_core::EventLoop;
use perch_dom::{NodeId, HIDDEN_CLASS};
use perch_overlay::{MemoryProvider, OverlaySystem};
use perch_widgets::{TabNavigator, OPEN_TAB_CLASS, TAB_CONTENT_CLASS, TRIGGER_CLASS};

struct Page {
    system: OverlaySystem,
    provider: Rc<MemoryProvider>,
    root: NodeId,
    links: Vec<NodeId>,
    intro: NodeId,
    details: NodeId,
}

/// Set `RUST_LOG=perch_widgets=debug` to watch transitions
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Three tabs: two in-page panels and one remote
fn page() -> Page {
    let event_loop = EventLoop::new();
    let provider = Rc::new(MemoryProvider::new(event_loop.clone()).with_latency(10));
    provider.insert("/reviews.html", "<p>Reviews</p>");
    let system = OverlaySystem::builder()
        .event_loop(event_loop)
        .provider(provider.clone())
        .build();

    let (root, links, intro, details) = {
        let mut doc = system.document().borrow_mut();
        let body = doc.body();
        let root = doc.create_element("div");
        let list = doc.create_element("ul");
        let content = doc.create_element("div");
        doc.append_child(body, root).unwrap();
        doc.append_child(root, list).unwrap();
        doc.append_child(root, content).unwrap();

        let mut links = Vec::new();
        for href in ["#intro", "#details", "/reviews.html"] {
            let item = doc.create_element("li");
            let link = doc.create_element("a");
            doc.set_attr(link, "href", href).unwrap();
            doc.append_child(list, item).unwrap();
            doc.append_child(item, link).unwrap();
            links.push(link);
        }

        let intro = doc.create_element("div");
        doc.set_attr(intro, "id", "intro").unwrap();
        doc.set_html(intro, "Intro").unwrap();
        let details = doc.create_element("div");
        doc.set_attr(details, "id", "details").unwrap();
        doc.set_html(details, "Details").unwrap();
        doc.append_child(content, intro).unwrap();
        doc.append_child(content, details).unwrap();
        (root, links, intro, details)
    };

    Page {
        system,
        provider,
        root,
        links,
        intro,
        details,
    }
}

#[test]
fn test_initial_state() {
    let page = page();
    let navigator = TabNavigator::new(&page.system, page.root);

    assert_eq!(navigator.len(), 3);
    assert_eq!(navigator.open_index(), Some(0));
    assert_eq!(navigator.tabs()[0].panel, page.intro);
    assert_eq!(navigator.tabs()[1].panel, page.details);
    assert_eq!(navigator.tabs()[2].remote.as_deref(), Some("/reviews.html"));

    let doc = page.system.document().borrow();
    assert!(doc.is_visible(page.intro));
    assert!(!doc.is_visible(page.details));
    assert!(doc.has_class(page.links[0], OPEN_TAB_CLASS));
    assert!(!doc.has_class(page.links[1], OPEN_TAB_CLASS));
    assert!(page.links.iter().all(|l| doc.has_class(*l, TRIGGER_CLASS)));

    let created = navigator.tabs()[2].panel;
    assert_eq!(doc.attr(created, "id"), Some("perch-tab-2"));
    assert!(doc.has_class(created, HIDDEN_CLASS));
    assert!(doc.has_class(doc.parent(created).unwrap(), TAB_CONTENT_CLASS));
    assert!(page.provider.requests().is_empty());
}

#[test]
fn test_click_switches_tabs() {
    let page = page();
    let navigator = TabNavigator::new(&page.system, page.root);
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    navigator.on("select", move |name| sink.borrow_mut().push(name.to_string()));
    let sink = Rc::clone(&log);
    navigator.on_select(move || sink.borrow_mut().push("onSelect".into()));

    let event = page.system.click(page.links[1]);

    assert!(event.is_default_prevented());
    assert_eq!(navigator.open_index(), Some(1));
    assert_eq!(*log.borrow(), vec!["select".to_string(), "onSelect".to_string()]);
    let doc = page.system.document().borrow();
    assert!(!doc.is_visible(page.intro));
    assert!(doc.is_visible(page.details));
    assert!(!doc.has_class(page.links[0], OPEN_TAB_CLASS));
    assert!(doc.has_class(page.links[1], OPEN_TAB_CLASS));
}

#[test]
fn test_open_tab_is_a_noop() {
    let page = page();
    let navigator = TabNavigator::new(&page.system, page.root);
    let count = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&count);
    navigator.on("select", move |_| *sink.borrow_mut() += 1);

    assert!(!navigator.select(0));
    assert!(!navigator.select(7));
    assert_eq!(*count.borrow(), 0);
    assert_eq!(navigator.open_index(), Some(0));
}

#[test]
fn test_remote_panel_loads_once() {
    init_tracing();
    let page = page();
    let navigator = TabNavigator::new(&page.system, page.root);
    let panel = navigator.tabs()[2].panel;

    assert!(navigator.select(2));
    assert_eq!(page.system.document().borrow().html(panel).unwrap(), "");
    page.system.advance(10);
    assert_eq!(page.system.document().borrow().html(panel).unwrap(), "<p>Reviews</p>");
    assert!(page.system.document().borrow().is_visible(panel));

    navigator.select(0);
    navigator.select(2);
    page.system.advance(10);
    assert_eq!(page.provider.requests(), vec!["/reviews.html".to_string()]);
}
