use crate::*;
use parking_lot::RwLock;
use quickcheck_macros::quickcheck;
use std::{collections::BTreeMap, sync::Arc};

fn mem_state() -> State<MemoryDB> {
    let cs = Arc::new(RwLock::new(ChainState::new(
        MemoryDB::new(),
        "temp_db".to_string(),
    )));
    State::new(cs)
}

#[test]
fn session_discard_keeps_block_cache() {
    let mut state = mem_state();
    state.set(b"a", b"1".to_vec());
    state.commit_session();

    state.set(b"b", b"2".to_vec());
    state.delete(b"a");
    state.discard_session();

    assert_eq!(state.get(b"a").unwrap(), Some(b"1".to_vec()));
    assert_eq!(state.get(b"b").unwrap(), None);
}

#[test]
fn discarded_block_leaves_no_trace() {
    let mut state = mem_state();
    state.set(b"a", b"1".to_vec());
    state.commit(1).unwrap();

    state.set(b"a", b"2".to_vec());
    state.set(b"c", b"3".to_vec());
    state.commit_session();
    state.discard();

    assert_eq!(state.get(b"a").unwrap(), Some(b"1".to_vec()));
    assert!(!state.exists(b"c").unwrap());
    assert_eq!(state.height().unwrap(), 1);
}

#[test]
fn iterate_merges_layers_in_key_order() {
    let mut state = mem_state();
    state.set(b"p/3", b"c".to_vec());
    state.set(b"p/1", b"a".to_vec());
    state.set(b"q/1", b"x".to_vec());
    state.commit(1).unwrap();

    state.set(b"p/2", b"b".to_vec());
    state.commit_session();
    state.delete(b"p/3");

    let kvs = state.iterate(b"p/").unwrap();
    assert_eq!(
        kvs,
        vec![
            (b"p/1".to_vec(), b"a".to_vec()),
            (b"p/2".to_vec(), b"b".to_vec()),
        ]
    );
}

#[test]
fn commit_height_must_not_go_backwards() {
    let mut state = mem_state();
    state.commit(5).unwrap();
    state.set(b"k", b"v".to_vec());
    assert!(state.commit(4).is_err());
}

#[test]
fn sled_backend_persists_height_and_data() {
    let dir = tempfile::tempdir().unwrap();
    {
        let db = SledDB::open(dir.path()).unwrap();
        let cs = Arc::new(RwLock::new(ChainState::new(db, "sled".to_string())));
        let mut state = State::new(cs);
        state.set(b"k/1", b"v1".to_vec());
        state.set(b"k/2", b"v2".to_vec());
        state.commit(7).unwrap();
    }

    let db = SledDB::open(dir.path()).unwrap();
    let cs = ChainState::new(db, "sled".to_string());
    assert_eq!(cs.height().unwrap(), 7);
    assert_eq!(cs.iterate(b"k/").unwrap().len(), 2);
}

#[test]
fn root_hash_depends_only_on_content() {
    let mut s1 = mem_state();
    s1.set(b"a", b"1".to_vec());
    s1.set(b"b", b"2".to_vec());
    s1.commit(1).unwrap();

    let mut s2 = mem_state();
    s2.set(b"b", b"2".to_vec());
    s2.commit_session();
    s2.set(b"a", b"1".to_vec());
    s2.commit(1).unwrap();

    assert_eq!(
        s1.chain_state().read().root_hash().unwrap(),
        s2.chain_state().read().root_hash().unwrap()
    );
}

#[quickcheck]
fn committed_view_matches_model(ops: Vec<(u8, Option<u8>, bool)>) -> bool {
    let mut state = mem_state();
    let mut model: BTreeMap<Vec<u8>, Vec<u8>> = BTreeMap::new();
    let mut pending: Vec<(Vec<u8>, Option<Vec<u8>>)> = vec![];

    for (k, v, keep) in ops.into_iter() {
        let key = vec![k % 16];
        match v {
            Some(v) => state.set(&key, vec![v]),
            None => state.delete(&key),
        }
        pending.push((key, v.map(|v| vec![v])));
        if keep {
            state.commit_session();
            for (k, v) in pending.drain(..) {
                match v {
                    Some(v) => model.insert(k, v),
                    None => model.remove(&k),
                };
            }
        } else {
            state.discard_session();
            pending.clear();
        }
    }

    state.iterate(&[]).unwrap() == model.into_iter().collect::<Vec<_>>()
}
