//! End-to-end listing runs against a scripted backend.

mod common;

use std::time::{Duration, Instant};

use serde_json::json;

use bike_rental::domain::{BikeType, Filter};
use bike_rental::ui::{render_to_string, ListBody};
use bike_rental::Event;
use common::{bike, listing, logged_out_store, query_param, runtime, MockTransport};

fn mount(query: &str) -> Event {
    Event::Mount {
        query: query.to_string(),
    }
}

#[test]
fn mount_with_type_filter_fetches_and_displays() {
    let transport = MockTransport::new();
    transport.reply(
        200,
        listing(vec![bike(1, "Ridge", "Mountain"), bike(2, "Peak", "Mountain")], 2),
    );
    let mut rt = runtime(&transport, logged_out_store());

    assert!(rt.dispatch(mount("type=Mountain")).unwrap());
    assert_eq!(rt.pending_fetches(), 1);
    assert!(matches!(rt.view().body, ListBody::Loading { initial: true }));

    rt.settle().unwrap();

    let url = transport.last_request().url;
    assert_eq!(query_param(&url, "bike_type").as_deref(), Some("Mountain"));
    assert_eq!(query_param(&url, "page").as_deref(), Some("1"));
    assert_eq!(rt.current_url(), "type=Mountain");

    let view = rt.view();
    assert!(view.show_clear_filters);
    assert!(view.pagination.is_none());
    assert_eq!(view.filters[0].selected().unwrap().value, "Mountain");
    let ListBody::Results { header, cards, error } = view.body else {
        panic!("expected results, got {:?}", view.body);
    };
    assert_eq!(header, "2 Bikes Found");
    assert_eq!(cards[0].name, "Ridge");
    assert_eq!(
        cards[0].image_url.as_deref(),
        Some("https://api.test/media/bikes/1.jpg")
    );
    assert!(error.is_none());
}

#[test]
fn second_mount_is_ignored() {
    let transport = MockTransport::new();
    transport.reply(200, listing(vec![], 0));
    let mut rt = runtime(&transport, logged_out_store());

    rt.dispatch(mount("")).unwrap();
    assert!(!rt.dispatch(mount("type=Road")).unwrap());
    rt.settle().unwrap();

    assert_eq!(transport.request_count(), 1);
    assert_eq!(rt.state().query.type_filter, None);
    assert_eq!(rt.view().body, ListBody::Empty);
}

#[test]
fn typing_is_debounced_into_one_fetch() {
    let transport = MockTransport::new();
    transport
        .reply(200, listing(vec![], 0))
        .reply(200, listing(vec![bike(7, "Cat Cruiser", "City ride")], 1));
    let mut rt = runtime(&transport, logged_out_store());
    rt.dispatch(mount("")).unwrap();
    rt.settle().unwrap();

    let t0 = Instant::now();
    rt.type_search("c", t0);
    rt.type_search("ca", t0 + Duration::from_millis(100));
    rt.type_search("cat", t0 + Duration::from_millis(200));
    assert_eq!(rt.view().search.text, "cat");

    assert!(!rt.tick(t0 + Duration::from_millis(400)).unwrap());
    assert_eq!(rt.pending_fetches(), 0);

    assert!(rt.tick(t0 + Duration::from_millis(500)).unwrap());
    assert!(!rt.tick(t0 + Duration::from_millis(900)).unwrap());
    rt.settle().unwrap();

    assert_eq!(transport.request_count(), 2);
    let url = transport.last_request().url;
    assert_eq!(query_param(&url, "search").as_deref(), Some("cat"));
    assert_eq!(rt.current_url(), "search=cat");
    assert_eq!(rt.state().page_data.items.len(), 1);
}

#[test]
fn clearing_filters_cancels_pending_search() {
    let transport = MockTransport::new();
    transport
        .reply(200, listing(vec![], 0))
        .reply(200, listing(vec![bike(1, "A", "Road")], 1));
    let mut rt = runtime(&transport, logged_out_store());
    rt.dispatch(mount("search=old&type=Road&page=1")).unwrap();
    rt.settle().unwrap();
    assert_eq!(rt.search().text(), "old");

    let t0 = Instant::now();
    rt.type_search("newer", t0);
    assert!(rt.search().is_pending());

    rt.dispatch(Event::ClearFilters).unwrap();
    assert!(!rt.search().is_pending());
    assert_eq!(rt.search().text(), "");
    assert!(!rt.tick(t0 + Duration::from_secs(1)).unwrap());

    rt.settle().unwrap();
    assert_eq!(rt.current_url(), "");
    assert!(!rt.view().show_clear_filters);
    assert_eq!(transport.request_count(), 2);
}

#[test]
fn clear_search_propagates_immediately() {
    let transport = MockTransport::new();
    transport
        .reply(200, listing(vec![], 0))
        .reply(200, listing(vec![], 0));
    let mut rt = runtime(&transport, logged_out_store());
    rt.dispatch(mount("search=trek")).unwrap();
    rt.settle().unwrap();

    rt.type_search("trekk", Instant::now());
    assert!(rt.clear_search().unwrap());
    assert!(!rt.search().is_pending());
    assert_eq!(rt.state().query.search_term, "");
    assert_eq!(rt.pending_fetches(), 1);
}

#[test]
fn repeated_query_is_served_from_cache() {
    let transport = MockTransport::new();
    transport
        .reply(200, listing(vec![bike(1, "All", "Road")], 1))
        .reply(200, listing(vec![bike(2, "Ridge", "Mountain")], 1));
    let mut rt = runtime(&transport, logged_out_store());

    rt.dispatch(mount("")).unwrap();
    rt.settle().unwrap();
    rt.dispatch(Event::FilterChanged(Filter::Type(Some(BikeType::Mountain))))
        .unwrap();
    rt.settle().unwrap();
    assert_eq!(rt.state().page_data.items[0].name, "Ridge");

    rt.dispatch(Event::FilterChanged(Filter::Type(None))).unwrap();
    rt.settle().unwrap();

    assert_eq!(transport.request_count(), 2);
    assert_eq!(rt.cached_results(), 2);
    assert_eq!(rt.state().page_data.items[0].name, "All");

    rt.invalidate_cache();
    assert_eq!(rt.cached_results(), 0);
}

#[test]
fn only_the_latest_of_overlapping_fetches_is_shown() {
    let transport = MockTransport::new();
    transport
        .reply(200, listing(vec![], 0))
        .reply(200, listing(vec![bike(1, "Stale", "Road")], 1))
        .reply(200, listing(vec![bike(2, "Fresh", "Electric")], 1));
    let mut rt = runtime(&transport, logged_out_store());
    rt.dispatch(mount("")).unwrap();
    rt.settle().unwrap();

    rt.dispatch(Event::FilterChanged(Filter::Type(Some(BikeType::Road))))
        .unwrap();
    rt.dispatch(Event::FilterChanged(Filter::Type(Some(BikeType::Electric))))
        .unwrap();
    assert_eq!(rt.pending_fetches(), 2);

    rt.settle().unwrap();

    assert_eq!(transport.request_count(), 3);
    assert_eq!(rt.state().page_data.items[0].name, "Fresh");
    assert_eq!(rt.current_url(), "type=Electric");
}

#[test]
fn failed_page_load_keeps_results_until_retry() {
    let transport = MockTransport::new();
    transport
        .reply(200, listing(vec![bike(1, "A", "Road"), bike(2, "B", "Road")], 30))
        .fail()
        .reply(200, listing(vec![bike(13, "M", "Road")], 30));
    let mut rt = runtime(&transport, logged_out_store());
    rt.dispatch(mount("")).unwrap();
    rt.settle().unwrap();
    assert_eq!(rt.view().pagination.unwrap().total, 3);

    rt.dispatch(Event::PageRequested(2)).unwrap();
    rt.settle().unwrap();

    let ListBody::Results { cards, error, .. } = rt.view().body else {
        panic!("previous results should stay visible");
    };
    assert_eq!(cards.len(), 2);
    assert_eq!(
        error.as_deref(),
        Some("Network error. Please check your connection.")
    );
    assert_eq!(rt.current_url(), "page=2");

    assert!(rt.dispatch(Event::Retry).unwrap());
    rt.settle().unwrap();
    assert!(rt.state().error.is_none());
    assert_eq!(rt.state().page_data.items[0].name, "M");

    let rendered = render_to_string(&rt.view());
    assert!(rendered.contains("< Previous 1 [2] 3 Next >"), "{rendered}");
}

#[test]
fn initial_failure_shows_error_body() {
    let transport = MockTransport::new();
    transport.reply(500, json!({"detail": "boom"}));
    let mut rt = runtime(&transport, logged_out_store());
    rt.dispatch(mount("")).unwrap();
    rt.settle().unwrap();

    assert_eq!(
        rt.view().body,
        ListBody::Failed {
            message: "Server error. Please try again later.".to_string()
        }
    );
}

#[test]
fn out_of_range_page_is_rejected() {
    let transport = MockTransport::new();
    transport.reply(200, listing(vec![bike(1, "A", "Road")], 1));
    let mut rt = runtime(&transport, logged_out_store());
    rt.dispatch(mount("")).unwrap();
    rt.settle().unwrap();

    assert!(!rt.dispatch(Event::PageRequested(5)).unwrap());
    assert_eq!(rt.pending_fetches(), 0);
    assert_eq!(rt.state().query.page, 1);
}

#[test]
fn user_events_before_mount_are_errors() {
    let transport = MockTransport::new();
    let mut rt = runtime(&transport, logged_out_store());

    assert!(rt.dispatch(Event::ClearFilters).is_err());
    assert!(!rt.dispatch(Event::Retry).unwrap());
    assert_eq!(transport.request_count(), 0);
}

#[test]
fn shutdown_drops_pending_search() {
    let transport = MockTransport::new();
    transport.reply(200, listing(vec![], 0));
    let mut rt = runtime(&transport, logged_out_store());
    rt.dispatch(mount("")).unwrap();
    rt.settle().unwrap();

    rt.type_search("late", Instant::now());
    assert!(rt.search().is_pending());
    rt.shutdown();

    assert_eq!(transport.request_count(), 1);
    assert_eq!(transport.remaining_replies(), 0);
}

#[test]
fn search_box_follows_directly_dispatched_term() {
    let transport = MockTransport::new();
    transport
        .reply(200, listing(vec![], 0))
        .reply(200, listing(vec![], 0));
    let mut rt = runtime(&transport, logged_out_store());
    rt.dispatch(mount("search=old")).unwrap();
    rt.settle().unwrap();

    rt.dispatch(Event::SearchChanged("new".to_string())).unwrap();
    rt.settle().unwrap();

    assert_eq!(rt.current_url(), "search=new");
    assert_eq!(rt.view().search.text, rt.state().query.search_term);
    assert_eq!(rt.search().text(), "new");
}

#[test]
fn fetch_completion_keeps_text_being_typed() {
    let transport = MockTransport::new();
    transport.reply(200, listing(vec![], 0));
    let mut rt = runtime(&transport, logged_out_store());
    rt.dispatch(mount("")).unwrap();

    let t0 = Instant::now();
    rt.type_search("tre", t0);
    rt.settle().unwrap();

    assert_eq!(rt.search().text(), "tre");
    assert!(rt.search().is_pending());
    assert!(rt.tick(t0 + Duration::from_millis(300)).unwrap());
    assert_eq!(rt.state().query.search_term, "tre");
}

mod analytics {
    use std::sync::{Arc, Mutex};

    use tracing::field::{Field, Visit};
    use tracing::Subscriber;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    use bike_rental::domain::{BikeType, Filter};
    use bike_rental::runtime::ANALYTICS_TARGET;
    use bike_rental::{initialize, Event};

    use super::common::{logged_out_store, test_config, MockTransport};
    use super::mount;

    #[derive(Clone, Default)]
    struct Recorded(Arc<Mutex<Vec<String>>>);

    struct ActionField(Option<String>);

    impl Visit for ActionField {
        fn record_str(&mut self, field: &Field, value: &str) {
            if field.name() == "action" {
                self.0 = Some(value.to_string());
            }
        }

        fn record_debug(&mut self, _field: &Field, _value: &dyn std::fmt::Debug) {}
    }

    impl<S: Subscriber> Layer<S> for Recorded {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if event.metadata().target() != ANALYTICS_TARGET {
                return;
            }
            let mut visitor = ActionField(None);
            event.record(&mut visitor);
            if let Some(action) = visitor.0 {
                self.0.lock().unwrap().push(action);
            }
        }
    }

    #[test]
    fn only_accepted_changes_are_reported() {
        let recorded = Recorded::default();
        let subscriber = tracing_subscriber::registry().with(recorded.clone());

        tracing::subscriber::with_default(subscriber, || {
            let config = bike_rental::Config {
                enable_analytics: true,
                ..test_config()
            };
            let transport = MockTransport::new();

            let mut unmounted = initialize(&config, transport.clone(), logged_out_store());
            assert!(unmounted.dispatch(Event::ClearFilters).is_err());

            let mut rt = initialize(&config, transport, logged_out_store());
            rt.dispatch(mount("")).unwrap();
            rt.dispatch(Event::FilterChanged(Filter::Type(None))).unwrap();
            rt.dispatch(Event::PageRequested(9)).unwrap();
            rt.dispatch(mount("type=Road")).unwrap();
            rt.dispatch(Event::FilterChanged(Filter::Type(Some(BikeType::Road))))
                .unwrap();
        });

        assert_eq!(
            *recorded.0.lock().unwrap(),
            vec!["listing_viewed".to_string(), "filter".to_string()]
        );
    }
}
