//! Fuzz target for snapshot import.
//!
//! Arbitrary snapshot documents, including inconsistent ones, must load and
//! survive every store operation without panicking.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use scoop_store::{ContentStore, NewArticle, NewComment, Snapshot};

#[derive(Debug, Arbitrary)]
enum Op {
    User(String),
    Article(String),
    Comment(String, u64),
    DeleteArticle(u64),
    DeleteComment(u64),
    Upvote(u64, String),
    Downvote(u64, String),
}

#[derive(Debug, Arbitrary)]
struct Input {
    snapshot: Vec<u8>,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let Ok(snapshot) = Snapshot::from_json(&input.snapshot) else {
        return;
    };

    // Imported counters never point at an id already in use
    if let Some(max) = snapshot.articles.keys().next_back() {
        assert!(snapshot.next_article_id > *max || snapshot.next_article_id == u64::MAX);
    }

    let store = ContentStore::from_snapshot(snapshot);
    for op in input.ops {
        match op {
            Op::User(name) => {
                let _ = store.get_or_create_user(&name);
            }
            Op::Article(name) => {
                let _ = store.create_article(NewArticle::new("t", "u", name));
            }
            Op::Comment(name, article_id) => {
                let _ = store.create_comment(NewComment::new("b", name, article_id));
            }
            Op::DeleteArticle(id) => {
                let _ = store.delete_article(id);
            }
            Op::DeleteComment(id) => {
                let _ = store.delete_comment(id);
            }
            Op::Upvote(id, name) => {
                let _ = store.upvote_article(id, &name);
                let _ = store.upvote_comment(id, &name);
            }
            Op::Downvote(id, name) => {
                let _ = store.downvote_article(id, &name);
                let _ = store.downvote_comment(id, &name);
            }
        }
    }

    let exported = store.snapshot();
    let reimported = Snapshot::from_json(&exported.to_json().unwrap()).unwrap();
    assert_eq!(reimported, exported);
});
