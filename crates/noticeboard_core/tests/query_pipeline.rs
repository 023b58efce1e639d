use noticeboard_core::query::{run, NoticeQuery, Scope, SortKey};
use noticeboard_core::{Category, Notice, Priority};

fn notice(id: &str, title: &str, owner: &str) -> Notice {
    Notice {
        id: id.to_string(),
        title: title.to_string(),
        category: Category::Community,
        priority: Priority::Normal,
        content: "<p>body</p>".to_string(),
        location: None,
        contact_name: None,
        contact_email: None,
        contact_phone: None,
        image_url: None,
        expiry_date: None,
        created_at: 1_000,
        updated_at: 1_000,
        views: 0,
        comments: Vec::new(),
        user_id: owner.to_string(),
    }
}

fn ids<'a>(items: &[&'a Notice]) -> Vec<&'a str> {
    items.iter().map(|notice| notice.id.as_str()).collect()
}

#[test]
fn lost_cat_scenario() {
    let mut lost_cat = notice("a", "Lost cat", "alice");
    lost_cat.category = Category::LostFound;
    lost_cat.priority = Priority::Urgent;
    lost_cat.content = "<p>Orange tabby</p>".to_string();
    let notices = vec![lost_cat, notice("b", "Book club", "bob")];

    let mut query = NoticeQuery::new();
    query.set_search_term("cat");
    assert_eq!(ids(&run(&notices, &query).items), ["a"]);

    let mut query = NoticeQuery::new();
    query.set_category(Some(Category::Event));
    assert!(run(&notices, &query).items.is_empty());
}

#[test]
fn search_is_case_insensitive_across_fields_with_or_semantics() {
    let mut by_content = notice("content", "Quiet title", "alice");
    by_content.content = "<p>Free FIREWOOD to collect</p>".to_string();
    let mut by_location = notice("location", "Another", "alice");
    by_location.location = Some("Firewood Lane".to_string());
    let mut by_contact = notice("contact", "Third", "alice");
    by_contact.contact_name = Some("Mr. Firewood".to_string());
    let unrelated = notice("other", "Nothing here", "alice");

    let notices = vec![by_content, by_location, by_contact, unrelated];
    let mut query = NoticeQuery::new();
    query.set_search_term("firewood");

    let found = ids(&run(&notices, &query).items);
    assert_eq!(found, ["content", "location", "contact"]);
}

#[test]
fn search_does_not_match_markup_tags() {
    let mut styled = notice("styled", "Plain", "alice");
    styled.content = "<strong>short</strong>".to_string();
    let notices = vec![styled];

    let mut query = NoticeQuery::new();
    query.set_search_term("strong");
    assert!(run(&notices, &query).items.is_empty());
}

#[test]
fn owned_scope_without_identity_is_empty_not_an_error() {
    let notices = vec![notice("a", "Mine", "alice")];
    let query = NoticeQuery::owned_by(None);
    let outcome = run(&notices, &query);
    assert!(outcome.items.is_empty());
    assert_eq!(outcome.total_matched, 0);
}

#[test]
fn owned_scope_filters_by_identity() {
    let notices = vec![
        notice("a", "Alice's", "alice"),
        notice("b", "Bob's", "bob"),
        notice("c", "Alice again", "alice"),
    ];
    let query = NoticeQuery::owned_by(Some("alice".to_string()));
    assert_eq!(ids(&run(&notices, &query).items), ["a", "c"]);
}

#[test]
fn category_and_priority_filters_are_exact_and_compose() {
    let mut urgent_event = notice("a", "Street fair", "alice");
    urgent_event.category = Category::Event;
    urgent_event.priority = Priority::Urgent;
    let mut low_event = notice("b", "Small gathering", "alice");
    low_event.category = Category::Event;
    low_event.priority = Priority::Low;
    let mut urgent_job = notice("c", "Plumber needed", "alice");
    urgent_job.category = Category::Job;
    urgent_job.priority = Priority::Urgent;

    let notices = vec![urgent_event, low_event, urgent_job];
    let mut query = NoticeQuery::new();
    query.set_category(Some(Category::Event));
    query.set_priority(Some(Priority::Urgent));
    assert_eq!(ids(&run(&notices, &query).items), ["a"]);
}

#[test]
fn date_sort_orders_by_created_at() {
    let mut oldest = notice("oldest", "x", "alice");
    oldest.created_at = 100;
    let mut newest = notice("newest", "x", "alice");
    newest.created_at = 300;
    let mut middle = notice("middle", "x", "alice");
    middle.created_at = 200;

    let notices = vec![oldest, newest, middle];

    let query = NoticeQuery::new();
    assert_eq!(
        ids(&run(&notices, &query).items),
        ["newest", "middle", "oldest"]
    );

    let mut query = NoticeQuery::new();
    query.set_sort(SortKey::DateAsc);
    assert_eq!(
        ids(&run(&notices, &query).items),
        ["oldest", "middle", "newest"]
    );
}

#[test]
fn priority_sort_is_stable_for_equal_ranks() {
    let mut a = notice("a", "x", "alice");
    a.priority = Priority::Normal;
    let mut b = notice("b", "x", "alice");
    b.priority = Priority::Normal;
    let mut c = notice("c", "x", "alice");
    c.priority = Priority::Normal;
    let mut urgent = notice("urgent", "x", "alice");
    urgent.priority = Priority::Urgent;
    let mut low = notice("low", "x", "alice");
    low.priority = Priority::Low;

    let notices = vec![a, b, low, c, urgent];
    let mut query = NoticeQuery::new();
    query.set_sort(SortKey::Priority);

    assert_eq!(
        ids(&run(&notices, &query).items),
        ["urgent", "a", "b", "c", "low"]
    );
}

#[test]
fn views_sort_is_descending() {
    let mut quiet = notice("quiet", "x", "alice");
    quiet.views = 0;
    let mut popular = notice("popular", "x", "alice");
    popular.views = 40;
    let mut seen = notice("seen", "x", "alice");
    seen.views = 7;

    let notices = vec![quiet, popular, seen];
    let mut query = NoticeQuery::new();
    query.set_sort(SortKey::Views);
    assert_eq!(
        ids(&run(&notices, &query).items),
        ["popular", "seen", "quiet"]
    );
}

#[test]
fn window_grows_by_page_size_and_stays_a_prefix() {
    let notices: Vec<Notice> = (0..15)
        .map(|index| {
            let mut item = notice(&format!("n{index}"), "x", "alice");
            item.created_at = 1_000 - index as i64;
            item
        })
        .collect();

    let mut query = NoticeQuery::new();
    let mut previous: Vec<String> = Vec::new();
    for expected_len in [6, 12, 15, 15] {
        let outcome = run(&notices, &query);
        assert_eq!(outcome.items.len(), expected_len);
        assert_eq!(outcome.total_matched, 15);
        assert_eq!(outcome.has_more, expected_len < 15);

        let current: Vec<String> = outcome
            .items
            .iter()
            .map(|notice| notice.id.clone())
            .collect();
        assert_eq!(&current[..previous.len()], &previous[..]);
        previous = current;
        query.load_more();
    }
}

#[test]
fn filter_change_after_load_more_resets_the_window() {
    let notices: Vec<Notice> = (0..20)
        .map(|index| notice(&format!("n{index}"), "Match", "alice"))
        .collect();

    let mut query = NoticeQuery::new();
    query.load_more();
    assert_eq!(run(&notices, &query).items.len(), 12);

    query.set_search_term("match");
    let outcome = run(&notices, &query);
    assert_eq!(outcome.items.len(), 6);
    assert_eq!(outcome.total_matched, 20);
}

#[test]
fn scope_change_resets_the_window() {
    let notices: Vec<Notice> = (0..20)
        .map(|index| notice(&format!("n{index}"), "x", "alice"))
        .collect();

    let mut query = NoticeQuery::new();
    query.load_more();
    query.set_scope(Scope::OwnedBy(Some("alice".to_string())));
    assert_eq!(run(&notices, &query).items.len(), 6);
}
