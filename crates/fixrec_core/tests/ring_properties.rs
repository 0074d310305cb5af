//! Property and durability tests for record stores and rings.

use fixrec_codec::{CborCodec, RawCodec};
use fixrec_core::{CoreError, RecordStore, RingRecordStore};
use fixrec_storage::MemoryTarget;
use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use tempfile::tempdir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Event {
    id: u32,
    label: String,
}

fn event(id: u32) -> Event {
    Event {
        id,
        label: format!("event-{id}"),
    }
}

fn codec() -> CborCodec<Event> {
    CborCodec::new(48)
}

fn traverse(ring: &mut RingRecordStore<CborCodec<Event>>) -> Vec<u32> {
    let mut ids = Vec::new();
    let mut current = ring.first().unwrap();
    while let Some(e) = current {
        ids.push(e.id);
        current = ring.next().unwrap();
    }
    ids
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn wraparound_tracks_oldest(capacity in 1u32..9, extra in 0u32..40) {
        let mut ring = RingRecordStore::new(codec(), capacity).unwrap();
        ring.open_target(&MemoryTarget::new()).unwrap();

        let total = capacity + extra;
        for id in 0..total {
            ring.append_overwriting(&event(id)).unwrap();
        }

        prop_assert_eq!(ring.record_count().unwrap(), capacity);
        prop_assert_eq!(ring.first_index().unwrap(), extra % capacity);
        prop_assert_eq!(
            ring.last_index().unwrap(),
            (extra + capacity - 1) % capacity
        );

        let expected: Vec<u32> = (extra..total).collect();
        prop_assert_eq!(traverse(&mut ring), expected.clone());
        let via_iter: Vec<u32> = ring.iter().unwrap().map(|e| e.unwrap().id).collect();
        prop_assert_eq!(via_iter, expected);
    }

    #[test]
    fn growth_phase_matches_plain_append(capacity in 1u32..12, appends in 0u32..12) {
        let mut ring = RingRecordStore::new(codec(), capacity).unwrap();
        ring.open_target(&MemoryTarget::new()).unwrap();

        for id in 0..appends {
            ring.append_overwriting(&event(id)).unwrap();
        }

        let kept = appends.min(capacity);
        prop_assert_eq!(ring.record_count().unwrap(), kept);
        let expected: Vec<u32> = (appends - kept..appends).collect();
        prop_assert_eq!(traverse(&mut ring), expected);
        if appends <= capacity {
            prop_assert_eq!(ring.first_index().unwrap(), 0);
        }
    }

    #[test]
    fn write_then_read_returns_value(
        initial in 1u32..20,
        writes in prop::collection::vec((any::<u32>(), any::<u32>()), 1..20),
    ) {
        let mut store = RecordStore::new(codec()).unwrap();
        store.open_target(&MemoryTarget::new()).unwrap();
        for id in 0..initial {
            store.append_record(&event(id)).unwrap();
        }

        for (slot, id) in writes {
            let slot = slot % initial;
            store.write_record(slot, &event(id)).unwrap();
            prop_assert_eq!(store.read_record(slot).unwrap(), event(id));
        }
        prop_assert_eq!(store.record_count().unwrap(), initial);
    }

    #[test]
    fn reopen_reproduces_ring(capacity in 1u32..8, total in 0u32..30) {
        let target = MemoryTarget::new();
        let mut ring = RingRecordStore::new(codec(), capacity).unwrap();
        ring.open_target(&target).unwrap();
        for id in 0..total {
            ring.append_overwriting(&event(id)).unwrap();
        }
        let count = ring.record_count().unwrap();
        let first = ring.first_index().unwrap();
        let last = ring.last_index().unwrap();
        let contents = traverse(&mut ring);
        ring.close().unwrap();

        let mut reopened = RingRecordStore::new(codec(), capacity).unwrap();
        reopened.open_target(&target).unwrap();
        prop_assert_eq!(reopened.record_count().unwrap(), count);
        prop_assert_eq!(reopened.first_index().unwrap(), first);
        prop_assert_eq!(reopened.last_index().unwrap(), last);
        prop_assert_eq!(traverse(&mut reopened), contents);
    }
}

#[test]
fn append_order_is_slot_order() {
    let mut store = RecordStore::new(codec()).unwrap();
    store.open_target(&MemoryTarget::new()).unwrap();
    for id in 0..25 {
        store.append_record(&event(id)).unwrap();
    }

    assert_eq!(store.record_count().unwrap(), 25);
    let ids: Vec<u32> = store.iter().unwrap().map(|e| e.unwrap().id).collect();
    assert_eq!(ids, (0..25).collect::<Vec<_>>());
}

#[test]
fn five_slot_ring_on_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data-circular.dat");

    let mut ring = RingRecordStore::new(codec(), 5).unwrap();
    ring.open(&path).unwrap();

    for id in 0..10 {
        ring.append_overwriting(&event(id)).unwrap();
        if id == 4 {
            assert_eq!(traverse(&mut ring), vec![0, 1, 2, 3, 4]);
        }
    }
    assert_eq!(traverse(&mut ring), vec![5, 6, 7, 8, 9]);
    ring.close().unwrap();

    // 14-byte header plus five 48-byte slots, never more.
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 14 + 5 * 48);

    let mut reopened = RingRecordStore::new(codec(), 5).unwrap();
    reopened.open(&path).unwrap();
    assert_eq!(reopened.first_index().unwrap(), 0);
    assert_eq!(reopened.last_index().unwrap(), 4);
    assert_eq!(traverse(&mut reopened), vec![5, 6, 7, 8, 9]);
}

#[test]
fn schema_mismatch_leaves_file_untouched() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("forty.dat");

    let mut store = RecordStore::new(RawCodec::new(40)).unwrap();
    store.open(&path).unwrap();
    store.append_record(&vec![0xAB; 40]).unwrap();
    store.close().unwrap();
    let before = std::fs::read(&path).unwrap();

    let mut wider = RecordStore::new(RawCodec::new(48)).unwrap();
    let err = wider.open(&path).unwrap_err();
    assert!(matches!(
        err,
        CoreError::SchemaMismatch {
            stored: 40,
            expected: 48
        }
    ));
    assert_eq!(std::fs::read(&path).unwrap(), before);
}

#[test]
fn ring_file_opened_as_plain_store_sees_wider_header() {
    let target = MemoryTarget::new();
    let mut ring = RingRecordStore::new(RawCodec::new(2), 2).unwrap();
    ring.open_target(&target).unwrap();
    ring.append_overwriting(&vec![1, 2]).unwrap();
    ring.close().unwrap();

    // A plain store reads only the first six header bytes; the record size
    // still matches, so the mismatch goes unnoticed and slot 0 is misread.
    let mut plain = RecordStore::new(RawCodec::new(2)).unwrap();
    plain.open_target(&target).unwrap();
    assert_eq!(plain.record_count().unwrap(), 1);
    assert_ne!(plain.read_record(0).unwrap(), vec![1, 2]);
}
