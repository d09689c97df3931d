use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::constants::{MAX_VEHICLES, MIN_VEHICLES};

/// Produces the vehicle count appended to the live window on each rotation.
pub trait VehicleSource {
    fn next_count(&mut self) -> u32;
}

// Synthetic counts, uniform over MIN_VEHICLES..=MAX_VEHICLES
pub struct RandomFeed {
    rng: StdRng,
}

impl RandomFeed {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl VehicleSource for RandomFeed {
    fn next_count(&mut self) -> u32 {
        self.rng.gen_range(MIN_VEHICLES..=MAX_VEHICLES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_stay_in_range() {
        let mut feed = RandomFeed::new(None);
        for _ in 0..1000 {
            let n = feed.next_count();
            assert!((MIN_VEHICLES..=MAX_VEHICLES).contains(&n), "out of range: {n}");
        }
    }

    #[test]
    fn seeded_feeds_repeat() {
        let mut a = RandomFeed::new(Some(42));
        let mut b = RandomFeed::new(Some(42));
        let xs: Vec<u32> = (0..32).map(|_| a.next_count()).collect();
        let ys: Vec<u32> = (0..32).map(|_| b.next_count()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn covers_both_ends_of_range() {
        let mut feed = RandomFeed::new(Some(7));
        let seen: Vec<u32> = (0..2000).map(|_| feed.next_count()).collect();
        assert!(seen.contains(&MIN_VEHICLES));
        assert!(seen.contains(&MAX_VEHICLES));
    }
}
