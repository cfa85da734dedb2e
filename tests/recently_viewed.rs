use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use folio::model::{ArticleId, UserId};
use folio::recent::{RecentlyViewed, CAPACITY};
use pretty_assertions::assert_eq;

fn ids(raw: &[u64]) -> Vec<ArticleId> {
    raw.iter().copied().map(ArticleId).collect()
}

#[test]
fn test_invariants_hold_over_long_sequence() {
    let tracker = RecentlyViewed::new();
    let user = UserId(1);

    // small linear congruential sequence, lots of repeats within 0..8
    let mut seed: u64 = 17;
    for _ in 0..500 {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let article = ArticleId((seed >> 33) % 8);

        tracker.record_view(user, article);
        let history = tracker.list_viewed(user);

        assert_eq!(history[0], article);
        assert!(history.len() <= CAPACITY.get());

        let unique: HashSet<_> = history.iter().collect();
        assert_eq!(unique.len(), history.len());
    }
}

#[test]
fn test_histories_are_isolated() {
    let tracker = RecentlyViewed::new();
    let alice = UserId(1);
    let bob = UserId(2);

    tracker.record_view(alice, ArticleId(1));
    tracker.record_view(alice, ArticleId(2));
    tracker.record_view(bob, ArticleId(9));

    assert_eq!(tracker.list_viewed(alice), ids(&[2, 1]));
    assert_eq!(tracker.list_viewed(bob), ids(&[9]));
    assert!(tracker.list_viewed(UserId(3)).is_empty());
    assert_eq!(tracker.tracked_users(), 2);
}

#[test]
fn test_concurrent_views_for_one_user() {
    const VIEWERS: u64 = 64;

    let tracker = Arc::new(RecentlyViewed::new());
    let user = UserId(1);

    let handles: Vec<_> = (0..VIEWERS)
        .map(|i| {
            let tracker = Arc::clone(&tracker);
            thread::spawn(move || tracker.record_view(user, ArticleId(i)))
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let history = tracker.list_viewed(user);
    let unique: HashSet<_> = history.iter().copied().collect();

    assert_eq!(history.len(), CAPACITY.get());
    assert_eq!(unique.len(), CAPACITY.get());
    assert!(history.iter().all(|id| id.0 < VIEWERS));
}

#[test]
fn test_concurrent_views_fewer_than_capacity() {
    let tracker = Arc::new(RecentlyViewed::new());
    let user = UserId(5);

    thread::scope(|scope| {
        for i in 0..3 {
            let tracker = &tracker;
            scope.spawn(move || tracker.record_view(user, ArticleId(i)));
        }
    });

    let mut history = tracker.list_viewed(user);
    history.sort();
    assert_eq!(history, ids(&[0, 1, 2]));
}

#[test]
fn test_concurrent_users_and_readers() {
    let tracker = Arc::new(RecentlyViewed::new());

    thread::scope(|scope| {
        for user in 0..8u64 {
            let tracker = &tracker;
            scope.spawn(move || {
                for article in 0..100u64 {
                    tracker.record_view(UserId(user), ArticleId(article % 7));
                }
            });
        }

        let tracker = &tracker;
        scope.spawn(move || {
            for _ in 0..200 {
                for user in 0..8u64 {
                    let snapshot = tracker.list_viewed(UserId(user));
                    let unique: HashSet<_> = snapshot.iter().collect();
                    assert!(snapshot.len() <= CAPACITY.get());
                    assert_eq!(unique.len(), snapshot.len());
                }
            }
        });
    });

    for user in 0..8u64 {
        // views 95..=99 land on articles 4, 5, 6, 0, 1
        assert_eq!(tracker.list_viewed(UserId(user)), ids(&[1, 0, 6, 5, 4]));
    }
}
