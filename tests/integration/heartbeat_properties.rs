//! Property-based tests for heartbeat ordering

use pagewire::heartbeat::Heartbeat;
use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

proptest! {
    /// Each scope runs exactly its own actions, in deferral order, when it ends.
    #[test]
    fn nested_scopes_run_their_own_actions_in_order(scopes in prop::collection::vec(0usize..6, 1..6)) {
        let heartbeat = Heartbeat::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for (depth, count) in scopes.iter().enumerate() {
            heartbeat.begin();
            for i in 0..*count {
                let log = log.clone();
                heartbeat.defer(move || log.borrow_mut().push((depth, i))).unwrap();
            }
        }

        for depth in (0..scopes.len()).rev() {
            log.borrow_mut().clear();
            heartbeat.end().unwrap();
            let expected: Vec<(usize, usize)> = (0..scopes[depth]).map(|i| (depth, i)).collect();
            prop_assert_eq!(&*log.borrow(), &expected);
        }
        prop_assert_eq!(heartbeat.depth(), 0);
        prop_assert!(heartbeat.end().is_err());
    }
}
