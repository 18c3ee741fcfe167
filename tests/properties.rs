//! Property tests for the store contract.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use watchbox::{Store, SyncStore};

proptest! {
    #[test]
    fn get_after_new_returns_initial(initial in any::<i64>(), label in "[a-z]{0,8}") {
        prop_assert_eq!(Store::new(initial).get(), initial);
        prop_assert_eq!(SyncStore::named(label, initial).get(), initial);
    }

    #[test]
    fn set_replaces_without_notifying(first in any::<String>(), second in any::<String>()) {
        let store = Store::new(first);
        let calls = Rc::new(RefCell::new(0usize));
        let _sub = store.subscribe({
            let calls = calls.clone();
            move |_: &String| *calls.borrow_mut() += 1
        });

        store.set(second.clone());

        prop_assert_eq!(store.get(), second);
        prop_assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn update_applies_function_and_notifies_each_once(
        initial in any::<i32>(),
        delta in any::<i32>(),
        subscribers in 0usize..8,
    ) {
        let store = Store::new(initial);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _subs: Vec<_> = (0..subscribers)
            .map(|i| {
                let seen = seen.clone();
                store.subscribe(move |value: &i32| seen.borrow_mut().push((i, *value)))
            })
            .collect();

        store.update(|v| v.wrapping_add(delta));

        let expected = initial.wrapping_add(delta);
        prop_assert_eq!(store.get(), expected);

        let mut seen = seen.borrow().clone();
        seen.sort();
        let wanted: Vec<_> = (0..subscribers).map(|i| (i, expected)).collect();
        prop_assert_eq!(seen, wanted);
    }

    #[test]
    fn unsubscribe_is_idempotent(times in 1usize..5) {
        let store = SyncStore::new(0u8);
        let keep = store.subscribe(|_| {});
        let drop_me = store.subscribe(|_| {});

        for _ in 0..times {
            drop_me.unsubscribe();
        }

        prop_assert_eq!(store.subscriber_count(), 1);
        prop_assert!(keep.is_active());
        prop_assert!(!drop_me.is_active());
    }
}
