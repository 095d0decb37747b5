//! Lossy single-producer/single-consumer ring of pulse codes
//!
//! The timer interrupt pushes completed codes, the main loop pops them.
//! Pushing never fails: when the consumer falls behind, the oldest unread
//! codes are overwritten and the consumer skips forward to the newest
//! `N` codes on its next pop.

use portable_atomic::{fence, AtomicU8, AtomicUsize, Ordering};

use crate::types::PulseCode;

/// Capacity of the decoder's handoff buffer
pub const PULSE_RING_CAPACITY: usize = 16;

/// Ring buffer sized for the decoder pipeline
pub type PulseBuffer = PulseRing<PULSE_RING_CAPACITY>;

/// Fixed-capacity ring with free-running `usize` cursors.
///
/// `N` must be a power of two so that slot indices stay consistent when the
/// cursors wrap.
pub struct PulseRing<const N: usize> {
    slots: [AtomicU8; N],
    write: AtomicUsize,
    claim: AtomicUsize,
    read: AtomicUsize,
}

impl<const N: usize> PulseRing<N> {
    const CAPACITY_OK: () = assert!(N.is_power_of_two(), "capacity must be a power of two");

    /// Create an empty ring with both cursors at zero
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CAPACITY_OK;
        #[allow(clippy::declare_interior_mutable_const)]
        const EMPTY: AtomicU8 = AtomicU8::new(0);
        Self {
            slots: [EMPTY; N],
            write: AtomicUsize::new(0),
            claim: AtomicUsize::new(0),
            read: AtomicUsize::new(0),
        }
    }

    /// Number of slots
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Split into the producer (timer context) and consumer (main loop) halves
    pub fn split(&mut self) -> (PulseProducer<'_, N>, PulseConsumer<'_, N>) {
        let ring: &Self = self;
        (PulseProducer { ring }, PulseConsumer { ring })
    }

    /// Producer cursor, counting every push
    pub fn write_cursor(&self) -> usize {
        self.write.load(Ordering::Acquire)
    }

    /// Consumer cursor, counting every pop
    pub fn read_cursor(&self) -> usize {
        self.read.load(Ordering::Acquire)
    }

    /// Number of codes a pop could still return
    pub fn len(&self) -> usize {
        let pending = self.write_cursor().wrapping_sub(self.read_cursor());
        pending.min(N)
    }

    /// True if no code is waiting
    pub fn is_empty(&self) -> bool {
        self.write_cursor() == self.read_cursor()
    }

    const fn slot(cursor: usize) -> usize {
        cursor & (N - 1)
    }

    fn push(&self, code: PulseCode) {
        let w = self.write.load(Ordering::Relaxed);
        let next = w.wrapping_add(1);
        // Announce the slot before touching it so a lapped consumer can tell
        // that the value it read may already belong to a newer push.
        self.claim.store(next, Ordering::Relaxed);
        fence(Ordering::Release);
        self.slots[Self::slot(w)].store(code.raw(), Ordering::Relaxed);
        self.write.store(next, Ordering::Release);
    }

    fn try_pop(&self) -> Option<PulseCode> {
        loop {
            let w = self.write.load(Ordering::Acquire);
            let mut r = self.read.load(Ordering::Relaxed);
            if w == r {
                return None;
            }
            if w.wrapping_sub(r) > N {
                // Overrun: the oldest codes are gone
                r = w.wrapping_sub(N);
            }

            let raw = self.slots[Self::slot(r)].load(Ordering::Relaxed);
            fence(Ordering::Acquire);
            if self.claim.load(Ordering::Relaxed).wrapping_sub(r) > N {
                continue;
            }

            self.read.store(r.wrapping_add(1), Ordering::Release);
            return Some(PulseCode::from_raw(raw));
        }
    }
}

impl<const N: usize> Default for PulseRing<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Write half of a [`PulseRing`], owned by the timer context
pub struct PulseProducer<'a, const N: usize> {
    ring: &'a PulseRing<N>,
}

impl<'a, const N: usize> PulseProducer<'a, N> {
    /// Store a code, overwriting the oldest slot when full
    pub fn push(&mut self, code: PulseCode) {
        self.ring.push(code);
    }

    /// Producer cursor
    pub fn write_cursor(&self) -> usize {
        self.ring.write_cursor()
    }
}

/// Read half of a [`PulseRing`], owned by the main loop
pub struct PulseConsumer<'a, const N: usize> {
    ring: &'a PulseRing<N>,
}

impl<'a, const N: usize> PulseConsumer<'a, N> {
    /// Take the oldest code still held, `None` when empty
    pub fn try_pop(&mut self) -> Option<PulseCode> {
        self.ring.try_pop()
    }

    /// Producer cursor as seen by the consumer
    pub fn write_cursor(&self) -> usize {
        self.ring.write_cursor()
    }

    /// Consumer cursor
    pub fn read_cursor(&self) -> usize {
        self.ring.read_cursor()
    }

    /// True if a pop would return a code
    pub fn ready(&self) -> bool {
        !self.ring.is_empty()
    }

    /// Number of codes waiting
    pub fn len(&self) -> usize {
        self.ring.len()
    }
}
