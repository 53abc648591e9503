//! This bench test simulates searching a registry holding a large number of
//! tagged, assigned and commented issues.

#![allow(missing_docs)]

use bugtrack::{Config, Priority, Query, Registry, Status};
use criterion::{BatchSize, Criterion, criterion_group, criterion_main};

const USERS: [&str; 4] = ["DEV001", "TEST001", "PM001", "ADMIN001"];

/// Generates a registry with a mix of priorities, statuses and tags
fn preseed_registry(count: usize) -> Registry {
    let mut registry = Registry::with_config(&Config::default());
    for i in 0..count {
        let reporter = USERS[i % USERS.len()];
        let priority = Priority::ALL[i % Priority::ALL.len()];
        let id = registry
            .create_issue(
                format!("Issue {i}: timeout in module {}", i % 17),
                format!("Reproduced {} times by {reporter}", i % 5),
                priority,
                reporter,
            )
            .unwrap();
        registry
            .assign_issue(id, USERS[(i + 1) % USERS.len()])
            .unwrap();
        registry.add_tag(id, &format!("area-{}", i % 11)).unwrap();
        registry
            .add_comment(id, "Looking into it", USERS[(i + 2) % USERS.len()])
            .unwrap();
        registry
            .update_status(id, Status::ALL[i % Status::ALL.len()])
            .unwrap();
    }
    registry
}

fn search(c: &mut Criterion) {
    let registry = preseed_registry(5_000);

    c.bench_function("search by tag", |b| {
        b.iter(|| registry.search_by_tag("area-3").len());
    });

    c.bench_function("search by keyword", |b| {
        b.iter(|| registry.search_by_keyword("MODULE 1").len());
    });

    let query = Query::default()
        .status(Status::Open)
        .priority(Priority::High)
        .assignee("DEV001")
        .keyword("timeout");
    c.bench_function("combined query", |b| {
        b.iter(|| registry.search(&query).len());
    });

    c.bench_function("summarize", |b| {
        b.iter(|| registry.summarize().total);
    });
}

fn create(c: &mut Criterion) {
    c.bench_function("create issues", |b| {
        b.iter_batched(
            || Registry::with_config(&Config::default()),
            |mut registry| {
                for i in 0..1_000 {
                    registry
                        .create_issue(format!("Issue {i}"), "", Priority::Low, "DEV001")
                        .unwrap();
                }
                registry
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, search, create);
criterion_main!(benches);
