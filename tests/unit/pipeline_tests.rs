use lead_desk::models::lead::{Lead, LeadStatus, Priority};
use lead_desk::queue::pipeline::{run, LeadFilter, QueueQuery, SortKey};
use lead_desk::queue::summary::TabCounts;
use lead_desk::scoring::categorizer::Category;
use lead_desk::scoring::scorer::PriorityScorer;
use lead_desk::scoring::weights::ScoringWeights;

use super::fixtures::{lead, lead_with, now};

fn scorer() -> PriorityScorer {
    PriorityScorer::new(ScoringWeights::default(), now())
}

fn ids(leads: &[Lead], query: &QueueQuery) -> Vec<String> {
    run(leads, query, &scorer())
        .unwrap()
        .into_iter()
        .map(|entry| entry.lead.id.clone())
        .collect()
}

fn lot() -> Vec<Lead> {
    vec![
        Lead {
            name: "Sarah Johnson".into(),
            vehicle: "2024 BMW X5".into(),
            value: 68_000,
            time_on_lot: Some("15 min".into()),
            ..lead_with("L-1", "Just now", Priority::Hot, LeadStatus::New)
        },
        Lead {
            name: "Mike Chen".into(),
            vehicle: "2024 Tesla Model 3".into(),
            value: 42_000,
            ..lead_with("L-2", "contact sent", Priority::Warm, LeadStatus::Contacted)
        },
        Lead {
            name: "Emily Davis".into(),
            email: "emily.d@example.com".into(),
            vehicle: "2023 Honda CR-V".into(),
            value: 31_000,
            ..lead_with("L-3", "2 weeks ago", Priority::Warm, LeadStatus::Qualified)
        },
        Lead {
            name: "James Wilson".into(),
            vehicle: "2024 Ford F-150".into(),
            value: 55_000,
            ..lead_with("L-4", "3 hours ago", Priority::Cold, LeadStatus::New)
        },
        Lead {
            name: "Lisa Park".into(),
            vehicle: "2024 BMW 3 Series".into(),
            value: 47_000,
            ..lead_with("L-5", "20 min ago", Priority::Hot, LeadStatus::New)
        },
    ]
}

#[test]
fn cold_tab_sorted_by_value_holds_cold_tier_and_stale_leads() {
    let leads = lot();
    let query = QueueQuery {
        category: Category::Cold,
        sort: SortKey::Value,
        ..QueueQuery::default()
    };
    assert_eq!(ids(&leads, &query), ["L-4", "L-3"]);
}

#[test]
fn repeated_runs_are_identical() {
    let leads = lot();
    for sort in [
        SortKey::Priority,
        SortKey::Value,
        SortKey::Activity,
        SortKey::Status,
    ] {
        let query = QueueQuery {
            sort,
            ..QueueQuery::default()
        };
        let first = run(&leads, &query, &scorer()).unwrap();
        let second = run(&leads, &query, &scorer()).unwrap();
        assert_eq!(first, second, "{sort:?}");
    }
}

#[test]
fn priority_sort_is_descending_score() {
    let leads = lot();
    let entries = run(&leads, &QueueQuery::default(), &scorer()).unwrap();
    assert_eq!(entries.len(), leads.len());
    assert!(entries.windows(2).all(|pair| pair[0].score >= pair[1].score));
    assert_eq!(entries[0].lead.id, "L-1");
}

#[test]
fn search_is_case_insensitive_over_name_vehicle_and_email() {
    let leads = lot();
    let search = |needle: &str| {
        ids(
            &leads,
            &QueueQuery {
                search: needle.into(),
                sort: SortKey::Value,
                ..QueueQuery::default()
            },
        )
    };
    assert_eq!(search("bmw"), ["L-1", "L-5"]);
    assert_eq!(search("CHEN"), ["L-2"]);
    assert_eq!(search("emily.d@"), ["L-3"]);
    assert!(search("porsche").is_empty());
}

#[test]
fn filter_accepts_priority_or_status() {
    let leads = lot();
    let filtered = |raw: &str| {
        ids(
            &leads,
            &QueueQuery {
                filter: raw.parse().unwrap(),
                sort: SortKey::Value,
                ..QueueQuery::default()
            },
        )
    };
    assert_eq!(filtered("hot"), ["L-1", "L-5"]);
    assert_eq!(filtered("contacted"), ["L-2"]);
    assert_eq!(filtered("all").len(), 5);
}

#[test]
fn unknown_filter_matches_nothing() {
    let filter: LeadFilter = "urgent".parse().unwrap();
    assert_eq!(filter, LeadFilter::Unknown("urgent".into()));
    let query = QueueQuery {
        filter,
        ..QueueQuery::default()
    };
    assert!(ids(&lot(), &query).is_empty());
}

#[test]
fn status_sort_follows_pipeline_order_and_is_stable() {
    let query = QueueQuery {
        sort: SortKey::Status,
        ..QueueQuery::default()
    };
    assert_eq!(ids(&lot(), &query), ["L-1", "L-4", "L-5", "L-2", "L-3"]);
}

#[test]
fn activity_sort_orders_by_activity_text() {
    let leads = vec![
        lead("a", "Just now"),
        lead("b", "1 hour ago"),
        lead("c", "2 days ago"),
    ];
    let query = QueueQuery {
        sort: SortKey::Activity,
        ..QueueQuery::default()
    };
    // Plain string order: digits sort before letters.
    assert_eq!(ids(&leads, &query), ["b", "c", "a"]);
}

#[test]
fn activity_sort_keeps_input_order_for_equal_text() {
    let leads = vec![
        lead("x", "3 hours ago"),
        lead("y", "1 hour ago"),
        lead("z", "3 hours ago"),
    ];
    let query = QueueQuery {
        sort: SortKey::Activity,
        ..QueueQuery::default()
    };
    assert_eq!(ids(&leads, &query), ["y", "x", "z"]);
}

#[test]
fn tab_selection_narrows_before_search() {
    let leads = lot();
    let query = QueueQuery {
        category: Category::ReEngaged,
        search: "bmw".into(),
        ..QueueQuery::default()
    };
    assert_eq!(ids(&leads, &query), ["L-1"]);
}

#[test]
fn tab_counts_cover_every_lead() {
    let leads = lot();
    let counts = TabCounts::tally(&leads, &scorer()).unwrap();
    assert_eq!(counts.all, 5);
    assert_eq!(counts.re_engaged, 1);
    assert_eq!(counts.awaiting_response, 1);
    assert_eq!(counts.cold, 2);
    assert_eq!(counts.action_required, 1);
    let bucket_total: usize = Category::BUCKETS.iter().map(|c| counts.get(*c)).sum();
    assert_eq!(bucket_total, counts.get(Category::All));
}

#[test]
fn empty_input_yields_empty_tab() {
    let leads: Vec<Lead> = Vec::new();
    assert!(ids(&leads, &QueueQuery::default()).is_empty());
}
