use super::*;

fn solid(v: u8) -> RasterBuffer {
    RasterBuffer::solid(2, 2, [v, v, v, 255]).unwrap()
}

#[test]
fn empty_stack_cannot_move() {
    let mut h = HistoryStack::new();
    assert!(!h.can_undo());
    assert!(!h.can_redo());
    assert!(!h.undo());
    assert!(!h.redo());
    assert!(h.current().is_none());
}

#[test]
fn first_commit_has_nothing_to_undo() {
    let mut h = HistoryStack::new();
    h.commit(solid(1));
    assert!(!h.can_undo());
    assert_eq!(h.current(), Some(&solid(1)));
}

#[test]
fn undo_redo_restore_exact_snapshots() {
    let mut h = HistoryStack::new();
    h.commit(solid(1));
    h.commit(solid(2));
    h.commit(solid(3));

    assert!(h.undo());
    assert_eq!(h.current().unwrap().as_rgba8(), solid(2).as_rgba8());
    assert!(h.undo());
    assert_eq!(h.current(), Some(&solid(1)));
    assert!(!h.can_undo());
    assert!(h.can_redo());

    assert!(h.redo());
    assert!(h.redo());
    assert_eq!(h.current(), Some(&solid(3)));
    assert!(!h.can_redo());
    assert_eq!(h.undo_depth(), 2);
}

#[test]
fn commit_clears_redo_branch() {
    let mut h = HistoryStack::new();
    h.commit(solid(1));
    h.commit(solid(2));
    assert!(h.undo());
    assert!(h.can_redo());

    h.commit(solid(9));
    assert!(!h.can_redo());
    assert_eq!(h.redo_depth(), 0);
    assert!(h.undo());
    assert_eq!(h.current(), Some(&solid(1)));
}

#[test]
fn revision_bumps_on_every_mutation() {
    let mut h = HistoryStack::new();
    let r0 = h.revision();
    h.commit(solid(1));
    let r1 = h.revision();
    assert!(r1 > r0);
    h.commit(solid(2));
    assert!(h.undo());
    assert!(h.redo());
    assert_eq!(h.revision(), r1 + 3);

    // Failed moves leave the revision alone.
    assert!(!h.redo());
    assert_eq!(h.revision(), r1 + 3);
}

#[test]
fn limit_evicts_oldest_snapshots() {
    let mut h = HistoryStack::with_limit(Some(2));
    for v in 1..=5 {
        h.commit(solid(v));
    }
    assert_eq!(h.undo_depth(), 2);
    assert!(h.undo());
    assert!(h.undo());
    assert!(!h.undo());
    assert_eq!(h.current(), Some(&solid(3)));
}

#[test]
fn zero_limit_is_uncapped() {
    let mut h = HistoryStack::with_limit(Some(0));
    for v in 1..=3 {
        h.commit(solid(v));
    }
    assert_eq!(h.undo_depth(), 2);
    assert!(h.undo());
    assert_eq!(h.current(), Some(&solid(2)));
}

#[test]
fn clear_drops_everything() {
    let mut h = HistoryStack::new();
    h.commit(solid(1));
    h.commit(solid(2));
    h.clear();
    assert!(h.current().is_none());
    assert!(!h.can_undo());
    assert!(!h.can_redo());
}
