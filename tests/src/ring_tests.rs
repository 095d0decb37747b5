//! Property tests for the lossy pulse ring

#[cfg(test)]
mod tests {
    use decoder_core::{PulseBuffer, PulseCode, PulseRing, PULSE_RING_CAPACITY};
    use heapless::Deque;
    use proptest::prelude::*;

    #[derive(Debug, Clone, Copy)]
    enum Op {
        Push(u8),
        Pop,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => any::<u8>().prop_map(Op::Push),
            2 => Just(Op::Pop),
        ]
    }

    proptest! {
        #[test]
        fn prop_fifo_within_capacity(raws in prop::collection::vec(any::<u8>(), 0..=PULSE_RING_CAPACITY)) {
            let mut ring = PulseBuffer::new();
            let (mut tx, mut rx) = ring.split();

            for &raw in &raws {
                tx.push(PulseCode::from_raw(raw));
            }
            prop_assert_eq!(rx.len(), raws.len());
            for &raw in &raws {
                prop_assert_eq!(rx.try_pop(), Some(PulseCode::from_raw(raw)));
            }
            prop_assert_eq!(rx.try_pop(), None);
        }

        #[test]
        fn prop_overrun_yields_newest(extra in 1usize..2000) {
            let total = PULSE_RING_CAPACITY + extra;
            let mut ring = PulseBuffer::new();
            let (mut tx, mut rx) = ring.split();

            for i in 0..total {
                tx.push(PulseCode::from_raw(i as u8));
            }
            for i in extra..total {
                prop_assert_eq!(rx.try_pop(), Some(PulseCode::from_raw(i as u8)));
            }
            prop_assert_eq!(rx.try_pop(), None);
        }

        #[test]
        fn prop_matches_lossy_queue_model(ops in prop::collection::vec(op_strategy(), 0..200)) {
            let mut ring = PulseRing::<8>::new();
            let (mut tx, mut rx) = ring.split();
            let mut model: Deque<u8, 8> = Deque::new();

            for op in ops {
                match op {
                    Op::Push(raw) => {
                        tx.push(PulseCode::from_raw(raw));
                        if model.is_full() {
                            model.pop_front();
                        }
                        let _ = model.push_back(raw);
                    }
                    Op::Pop => {
                        let expected = model.pop_front().map(PulseCode::from_raw);
                        prop_assert_eq!(rx.try_pop(), expected);
                    }
                }
                prop_assert_eq!(rx.len(), model.len());
            }
        }
    }
}
