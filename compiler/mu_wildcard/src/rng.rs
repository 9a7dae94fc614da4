//! Seeded generator shared by the wildcard and tag stages.

use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;

/// Saved generator position, see [`WildcardRng::snapshot`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RngSnapshot(Pcg32);

/// A `Pcg32` that remembers the state it was seeded with.
///
/// One generator is created per resolution call. Plain draws advance the
/// shared sequence; [`WildcardRng::choose_at_offset`] replays from the
/// seeded origin and leaves the shared sequence where it was.
#[derive(Clone, Debug)]
pub struct WildcardRng {
    origin: Pcg32,
    state: Pcg32,
}

impl WildcardRng {
    pub fn new(seed: u64) -> Self {
        let origin = Pcg32::seed_from_u64(seed);
        WildcardRng {
            state: origin.clone(),
            origin,
        }
    }

    pub fn snapshot(&self) -> RngSnapshot {
        RngSnapshot(self.state.clone())
    }

    pub fn restore(&mut self, snapshot: RngSnapshot) {
        self.state = snapshot.0;
    }

    /// Reset the shared sequence to the seeded origin.
    pub fn rewind(&mut self) {
        self.state = self.origin.clone();
    }

    /// Uniform pick from `items`, advancing the shared sequence.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.state)
    }

    /// The `offset + 1`-th pick from the seeded origin.
    ///
    /// Does not consume anything from the shared sequence.
    pub fn choose_at_offset<'a, T>(&mut self, items: &'a [T], offset: u32) -> Option<&'a T> {
        let saved = self.snapshot();
        self.rewind();
        let mut pick = None;
        for _ in 0..=offset {
            pick = self.choose(items);
        }
        self.restore(saved);
        pick
    }
}

impl RngCore for WildcardRng {
    fn next_u32(&mut self) -> u32 {
        self.state.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.state.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.state.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.state.try_fill_bytes(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ITEMS: &[u32] = &[1, 2, 3, 4, 5, 6, 7, 8, 9];

    #[test]
    fn same_seed_same_sequence() {
        let mut a = WildcardRng::new(7);
        let mut b = WildcardRng::new(7);
        for _ in 0..20 {
            assert_eq!(a.choose(ITEMS), b.choose(ITEMS));
        }
    }

    #[test]
    fn snapshot_restore_replays() {
        let mut rng = WildcardRng::new(3);
        rng.choose(ITEMS);
        let saved = rng.snapshot();
        let first: Vec<_> = (0..5).map(|_| rng.choose(ITEMS)).collect();
        rng.restore(saved);
        let second: Vec<_> = (0..5).map(|_| rng.choose(ITEMS)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn offset_pick_leaves_shared_sequence_alone() {
        let mut plain = WildcardRng::new(11);
        let mut mixed = WildcardRng::new(11);
        plain.choose(ITEMS);
        mixed.choose(ITEMS);
        mixed.choose_at_offset(ITEMS, 4);
        assert_eq!(plain.choose(ITEMS), mixed.choose(ITEMS));
    }

    #[test]
    fn offset_pick_counts_from_origin() {
        let mut fresh = WildcardRng::new(5);
        let expected = (0..3).map(|_| fresh.choose(ITEMS)).last().flatten();

        let mut rng = WildcardRng::new(5);
        rng.choose(ITEMS);
        rng.choose(ITEMS);
        assert_eq!(rng.choose_at_offset(ITEMS, 2), expected);
    }

    #[test]
    fn empty_slice() {
        let mut rng = WildcardRng::new(0);
        let empty: &[u32] = &[];
        assert_eq!(rng.choose(empty), None);
        assert_eq!(rng.choose_at_offset(empty, 3), None);
    }
}
