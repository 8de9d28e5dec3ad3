//! A preordered-but-unregistered name cannot be updated, renewed,
//! transferred or revoked, by anyone.
//!
//! Blocks 1–3 bring namespace `test` to READY, block 4 preorders
//! `foo.test` for wallet 3, and blocks 5–9 each attempt one modification.

mod common;

use bns_protocol::engine::NamingQuery;
use bns_protocol::error::ErrorKind;

use common::{Harness, NS};

#[test]
fn preordered_name_cannot_be_modified() {
    let h = Harness::new();

    h.ready_namespace();
    assert_eq!(h.height(), 3);

    let preorder = h.mine_one(h.name_preorder_op("foo.test", 2, 3));
    assert!(preorder.accepted(), "{:?}", preorder.result);
    let root_after_preorder = h.processor.state_root();

    let attempts = [
        ("update", h.update_op("foo.test", 3, [0x11; 20])),
        ("renew", h.renew_op("foo.test", 3)),
        ("transfer", h.transfer_op("foo.test", 3, 4, true)),
        ("revoke by stranger", h.revoke_op("foo.test", 4)),
        ("revoke by would-be owner", h.revoke_op("foo.test", 3)),
    ];

    for (height, (label, op)) in (5u64..).zip(attempts) {
        let outcome = h.mine_one(op);
        assert_eq!(
            outcome.error_kind(),
            Some(ErrorKind::NotRegistered),
            "{label} at block {height}"
        );
        assert_eq!(h.height(), height);
    }

    assert_eq!(h.height(), 9);
    assert!(h.processor.get_namespace_reveal(NS).is_none());
    assert!(h.processor.get_namespace(NS).is_some());

    let preorder = h
        .processor
        .get_name_preorder("foo.test", &h.addr(2).payment_script(), &h.addr(3))
        .expect("preorder still live");
    assert!(!preorder.consumed);
    assert_eq!(preorder.block_number, 4);

    assert!(h.processor.get_name("foo.test").is_none());
    assert_eq!(h.processor.state_root(), root_after_preorder);
}
