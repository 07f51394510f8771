// Runs the same scenarios on both lock modes.

use std::sync::{Arc, Mutex};

use hashlatch::{hash, Error, HashTable, HashTableBuilder, RemovalCause, UnsyncHashTable};
use paste::paste;

type FreeLog = Arc<Mutex<Vec<(Vec<u8>, RemovalCause)>>>;

fn free_log() -> (FreeLog, impl Fn(&[u8], &[u8], RemovalCause) + Send + Sync + 'static) {
    let log = FreeLog::default();
    let log1 = Arc::clone(&log);
    let f = move |k: &[u8], _v: &[u8], cause: RemovalCause| {
        log1.lock().unwrap().push((k.to_vec(), cause))
    };
    (log, f)
}

fn sync_table(update_allowed: bool) -> HashTable {
    HashTable::new(4, hash::murmur3_32, update_allowed).unwrap()
}

fn unsync_table(update_allowed: bool) -> UnsyncHashTable {
    HashTableBuilder::new(4)
        .hash_fn(hash::murmur3_32)
        .enable_update(update_allowed)
        .without_locking()
        .build()
        .unwrap()
}

macro_rules! generate_table_tests {
    ($name:ident, $table_init:ident) => {
        paste! {
            #[test]
            fn [<test_ $name _basic_scenario>]() {
                let table = $table_init(true);
                table.put(b"a", b"1").unwrap();
                table.put(b"b", b"2").unwrap();
                table.put(b"c", b"3").unwrap();
                assert_eq!(table.len(), 3);

                table.put(b"a", b"99").unwrap();
                assert_eq!(table.get(b"a").as_deref(), Some(&b"99"[..]));
                assert_eq!(table.len(), 3);

                assert!(table.remove(b"b"));
                assert!(table.get(b"b").is_none());
                assert_eq!(table.len(), 2);
            }

            #[test]
            fn [<test_ $name _growth>]() {
                const NUM_KEYS: u32 = 10_000;

                let table = $table_init(false);
                for i in 0..NUM_KEYS {
                    table.put(&i.to_le_bytes(), &(i + 1).to_le_bytes()).unwrap();
                    assert!(table.len() * 4 <= table.capacity() as u64 * 3 + 4);
                }

                assert_eq!(table.len(), NUM_KEYS as u64);
                assert_eq!(table.capacity(), 16_384);
                for i in 0..NUM_KEYS {
                    let entry = table.get(&i.to_le_bytes()).unwrap();
                    assert_eq!(entry.value(), &(i + 1).to_le_bytes());
                }
                assert_eq!(table.iter().count(), NUM_KEYS as usize);
            }

            #[test]
            fn [<test_ $name _removal>]() {
                const NUM_KEYS: u32 = 512;

                let table = $table_init(false);
                for i in 0..NUM_KEYS {
                    table.put(&i.to_le_bytes(), b"v").unwrap();
                }

                for i in 0..NUM_KEYS {
                    assert!(table.remove(&i.to_le_bytes()));
                    assert!(!table.remove(&i.to_le_bytes()));
                    assert_eq!(table.len(), (NUM_KEYS - i - 1) as u64);

                    for j in 0..=i {
                        assert!(!table.contains_key(&j.to_le_bytes()));
                    }
                    if i + 1 < NUM_KEYS {
                        assert!(table.contains_key(&(i + 1).to_le_bytes()));
                    }
                }

                assert!(table.is_empty());
                assert_eq!(table.max_chain_length(), 0);
            }

            #[test]
            fn [<test_ $name _duplicate_key>]() {
                let table = $table_init(false);
                table.put(b"k", b"first").unwrap();
                assert_eq!(table.put(b"k", b"second"), Err(Error::DuplicateKey));
                assert_eq!(table.put(b"", b"x"), Err(Error::EmptyKey));
                assert_eq!(table.get(b"k").unwrap().value(), b"first");
                assert_eq!(table.len(), 1);
            }

            #[test]
            fn [<test_ $name _iteration_with_removals>]() {
                let table = $table_init(true);
                for i in 0..100u32 {
                    table.put(&i.to_le_bytes(), &i.to_le_bytes()).unwrap();
                }

                // Remove every key while walking the table.
                let mut visited = 0;
                let mut cursor = table.iterate(None);
                while let Some(pinned) = cursor {
                    assert!(table.remove(pinned.key()));
                    assert!(pinned.is_stale());
                    visited += 1;
                    cursor = table.iterate(Some(pinned));
                }

                assert_eq!(visited, 100);
                assert!(table.is_empty());
                assert_eq!(table.max_chain_length(), 0);
            }

            #[test]
            fn [<test_ $name _tombstone_lifetime>]() {
                let (log, free_fn) = free_log();
                let mut table = $table_init(true);
                table.set_free_fn(free_fn);

                table.put(b"k", b"old").unwrap();
                let held = table.acquire(b"k").unwrap().unwrap();
                table.put(b"k", b"new").unwrap();
                table.remove(b"k");

                assert_eq!(held.value(), b"old");
                assert!(table.get(b"k").is_none());
                assert!(table.is_empty());
                // The new node went away at once; the old one waits for its pin.
                assert_eq!(
                    *log.lock().unwrap(),
                    vec![(b"k".to_vec(), RemovalCause::Removed)]
                );

                table.release(held);
                assert_eq!(log.lock().unwrap().len(), 2);
                assert_eq!(log.lock().unwrap()[1].1, RemovalCause::Replaced);
                assert_eq!(table.max_chain_length(), 0);
            }

            #[test]
            fn [<test_ $name _panicking_free_fn>]() {
                let calls = Arc::new(Mutex::new(0));
                let calls1 = Arc::clone(&calls);
                let mut table = $table_init(true);
                table.set_free_fn(move |_, _, _| {
                    *calls1.lock().unwrap() += 1;
                    panic!("free_fn panicked");
                });

                table.put(b"a", b"1").unwrap();
                table.put(b"b", b"2").unwrap();
                assert!(table.remove(b"a"));
                assert!(table.remove(b"b"));

                // The table keeps working and the callback is disabled.
                assert!(table.is_empty());
                assert_eq!(*calls.lock().unwrap(), 1);
                table.put(b"c", b"3").unwrap();
                assert!(table.contains_key(b"c"));
            }

            #[test]
            fn [<test_ $name _clear_and_reuse>]() {
                let (log, free_fn) = free_log();
                let mut table = $table_init(true);
                table.set_free_fn(free_fn);

                for i in 0..50u32 {
                    table.put(&i.to_le_bytes(), b"v").unwrap();
                }
                let capacity = table.capacity();
                table.clear();
                assert!(table.is_empty());
                assert_eq!(table.capacity(), capacity);
                assert_eq!(log.lock().unwrap().len(), 50);

                table.put(b"again", b"v").unwrap();
                assert_eq!(table.len(), 1);
                drop(table);
                assert_eq!(log.lock().unwrap().len(), 51);
                assert!(log
                    .lock()
                    .unwrap()
                    .iter()
                    .all(|(_, cause)| *cause == RemovalCause::Cleared));
            }
        }
    };
}

generate_table_tests!(sync, sync_table);
generate_table_tests!(unsync, unsync_table);
