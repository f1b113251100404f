use super::*;
use crate::garden::FlowerColor;
use crate::test_helpers::{MockRemote, garden, red, user};

fn drain(rx: &mut mpsc::UnboundedReceiver<GardenEvent>) -> Vec<GardenEvent> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        out.push(event);
    }
    out
}

async fn loaded(flowers: Vec<Flower>) -> (Arc<MockRemote>, GardenState) {
    let alice = user(1, "alice");
    let remote = Arc::new(MockRemote::new().with_garden(garden(7, &alice, flowers)));
    let mut state = GardenState::new(remote.clone());
    state.load(7).await.unwrap();
    (remote, state)
}

// =============================================================================
// load / clear
// =============================================================================

#[tokio::test]
async fn new_state_has_no_garden() {
    let state = GardenState::new(Arc::new(MockRemote::new()));
    assert_eq!(state.garden_id(), NO_GARDEN);
    assert!(state.current().is_none());
    assert!(state.flowers().is_empty());
    assert!(state.comments().is_empty());
    assert!(state.snapshot().flowers().is_empty());
    assert_eq!(state.save_status(), SaveStatus::Idle);
}

#[tokio::test]
async fn load_takes_snapshot_of_flowers() {
    let (_, state) = loaded(vec![red(1, 10.0, 10.0), red(2, 50.0, 50.0)]).await;
    assert_eq!(state.garden_id(), 7);
    assert_eq!(state.flowers().len(), 2);
    assert_eq!(state.snapshot().flowers(), state.flowers());
    assert!(!state.has_unsaved_changes());
}

#[tokio::test]
async fn load_emits_loaded_event() {
    let alice = user(1, "alice");
    let remote = Arc::new(MockRemote::new().with_garden(garden(7, &alice, vec![])));
    let mut state = GardenState::new(remote);
    let mut rx = state.subscribe();
    state.load(7).await.unwrap();
    assert_eq!(drain(&mut rx), vec![GardenEvent::Loaded(7), GardenEvent::SaveStatus(SaveStatus::Idle)]);
}

#[tokio::test]
async fn load_sentinel_clears_without_remote_call() {
    let (remote, mut state) = loaded(vec![red(1, 10.0, 10.0)]).await;
    remote.clear_calls();
    let mut rx = state.subscribe();

    state.load(NO_GARDEN).await.unwrap();

    assert!(remote.calls().is_empty());
    assert_eq!(state.garden_id(), NO_GARDEN);
    assert!(state.flowers().is_empty());
    assert!(state.snapshot().flowers().is_empty());
    assert_eq!(drain(&mut rx), vec![GardenEvent::Cleared]);
}

#[tokio::test]
async fn load_failure_leaves_state_untouched() {
    let (remote, mut state) = loaded(vec![red(1, 10.0, 10.0)]).await;
    state.add_flower_local(FlowerColor::Blue, 5.0, 5.0);

    let err = state.load(99).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(state.garden_id(), 7);
    assert_eq!(state.flowers().len(), 2);

    remote.set_fail_fetches(true);
    assert!(state.load(7).await.is_err());
    assert_eq!(state.flowers().len(), 2);
}

#[tokio::test]
async fn reload_replaces_previous_garden() {
    let alice = user(1, "alice");
    let remote = Arc::new(
        MockRemote::new()
            .with_garden(garden(7, &alice, vec![red(1, 10.0, 10.0)]))
            .with_garden(garden(8, &alice, vec![])),
    );
    let mut state = GardenState::new(remote);
    state.load(7).await.unwrap();
    state.load(8).await.unwrap();
    assert_eq!(state.garden_id(), 8);
    assert!(state.flowers().is_empty());
    assert!(state.snapshot().flowers().is_empty());
}

// =============================================================================
// local edits
// =============================================================================

#[tokio::test]
async fn add_flower_without_garden_is_ignored() {
    let mut state = GardenState::new(Arc::new(MockRemote::new()));
    assert!(!state.add_flower_local(FlowerColor::Red, 1.0, 1.0));
    assert!(state.flowers().is_empty());
}

#[tokio::test]
async fn add_flower_appends_unsaved_and_leaves_snapshot() {
    let (_, mut state) = loaded(vec![red(1, 10.0, 10.0)]).await;
    let mut rx = state.subscribe();

    assert!(state.add_flower_local(FlowerColor::Purple, 30.0, 40.0));

    let last = state.flowers().last().unwrap();
    assert_eq!(last.color, FlowerColor::Purple);
    assert!(!last.is_saved());
    assert_eq!(state.snapshot().flowers().len(), 1);
    assert_eq!(state.save_status(), SaveStatus::Unsaved);
    assert_eq!(
        drain(&mut rx),
        vec![GardenEvent::FlowersChanged, GardenEvent::SaveStatus(SaveStatus::Unsaved)]
    );
}

#[tokio::test]
async fn pending_changes_reflect_local_edits() {
    let (_, mut state) = loaded(vec![red(1, 10.0, 10.0), red(2, 100.0, 100.0)]).await;
    state.add_flower_local(FlowerColor::White, 0.0, 0.0);
    state.remove_flower_local(&red(2, 100.0, 100.0));

    let diff = state.pending_changes();
    assert_eq!(diff.to_delete, vec![red(2, 100.0, 100.0)]);
    assert_eq!(diff.to_create.len(), 1);
    assert_eq!(diff.to_create[0].color, FlowerColor::White);
    assert!(state.has_unsaved_changes());
}

#[tokio::test]
async fn remove_absent_flower_is_noop() {
    let (_, mut state) = loaded(vec![red(1, 10.0, 10.0)]).await;
    let mut rx = state.subscribe();
    assert!(!state.remove_flower_local(&red(9, 10.0, 10.0)));
    assert_eq!(state.flowers().len(), 1);
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn remove_saved_flower_matches_by_id() {
    let (_, mut state) = loaded(vec![red(1, f64::NAN, 10.0), red(2, 50.0, 50.0)]).await;
    assert!(state.remove_flower_local(&red(1, f64::NAN, 10.0)));
    assert_eq!(state.flowers(), &[red(2, 50.0, 50.0)]);

    // A saved flower that has since moved is still the same flower.
    assert!(state.remove_flower_local(&red(2, 0.0, 0.0)));
    assert!(state.flowers().is_empty());
}

#[tokio::test]
async fn remove_takes_only_first_of_identical_unsaved() {
    let (_, mut state) = loaded(vec![]).await;
    state.add_flower_local(FlowerColor::Red, 5.0, 5.0);
    state.add_flower_local(FlowerColor::Red, 5.0, 5.0);
    assert!(state.remove_flower_local(&Flower::new(FlowerColor::Red, 5.0, 5.0)));
    assert_eq!(state.flowers().len(), 1);
}

#[tokio::test]
async fn erase_removes_every_hit_flower() {
    let (_, mut state) = loaded(vec![red(1, 100.0, 100.0), red(2, 110.0, 110.0), red(3, 300.0, 300.0)]).await;
    let removed = state.erase_at(Point::new(105.0, 105.0), 40.0);
    assert_eq!(removed, 2);
    assert_eq!(state.flowers(), &[red(3, 300.0, 300.0)]);
    assert_eq!(state.pending_changes().to_delete.len(), 2);
}

#[tokio::test]
async fn erase_miss_changes_nothing() {
    let (_, mut state) = loaded(vec![red(1, 100.0, 100.0)]).await;
    let mut rx = state.subscribe();
    assert_eq!(state.erase_at(Point::new(500.0, 500.0), 40.0), 0);
    assert_eq!(state.save_status(), SaveStatus::Idle);
    assert!(drain(&mut rx).is_empty());
}

// =============================================================================
// reload
// =============================================================================

#[tokio::test]
async fn reload_flowers_replaces_list_and_snapshot() {
    let (remote, mut state) = loaded(vec![red(1, 10.0, 10.0)]).await;
    state.add_flower_local(FlowerColor::Yellow, 1.0, 1.0);
    remote.create_flower(7, &Flower::new(FlowerColor::Blue, 2.0, 2.0)).await.unwrap();

    state.reload_flowers().await.unwrap();

    let server = remote.garden(7).unwrap().flowers;
    assert_eq!(state.flowers(), server.as_slice());
    assert_eq!(state.snapshot().flowers(), server.as_slice());
    assert!(state.flowers().iter().all(Flower::is_saved));
    assert!(!state.has_unsaved_changes());
}

#[tokio::test]
async fn reload_without_garden_is_noop() {
    let remote = Arc::new(MockRemote::new());
    let mut state = GardenState::new(remote.clone());
    state.reload_flowers().await.unwrap();
    state.reload_comments().await.unwrap();
    assert!(remote.calls().is_empty());
}

#[tokio::test]
async fn reload_comments_keeps_local_flowers() {
    let alice = user(1, "alice");
    let remote = Arc::new(MockRemote::new().with_garden(garden(7, &alice, vec![])).logged_in_as(alice));
    let mut state = GardenState::new(remote.clone());
    state.load(7).await.unwrap();
    state.add_flower_local(FlowerColor::Red, 1.0, 1.0);
    remote.create_comment(7, "lovely").await.unwrap();
    let mut rx = state.subscribe();

    state.reload_comments().await.unwrap();

    assert_eq!(state.comments().len(), 1);
    assert_eq!(state.comments()[0].content, "lovely");
    assert_eq!(state.flowers().len(), 1);
    assert_eq!(drain(&mut rx), vec![GardenEvent::CommentsChanged]);
}

#[tokio::test]
async fn dropped_subscriber_is_pruned() {
    let (_, mut state) = loaded(vec![]).await;
    let rx = state.subscribe();
    drop(rx);
    state.add_flower_local(FlowerColor::Red, 1.0, 1.0);
    assert!(state.subscribers.is_empty());
}
