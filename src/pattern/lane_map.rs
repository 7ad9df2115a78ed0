//! Logical/visual column mapping.
//!
//! The permutation is fixed for a whole session and shared by input
//! resolution and rendering, so a key always triggers the lane the player
//! sees under it.

use crate::models::modifiers::Modifiers;
use rand::Rng;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneMapper {
    /// `visual_to_logical[visual_lane] = logical_column`.
    visual_to_logical: Vec<usize>,
    logical_to_visual: Vec<usize>,
}

impl LaneMapper {
    fn from_permutation(visual_to_logical: Vec<usize>) -> Self {
        let mut logical_to_visual = vec![0; visual_to_logical.len()];
        for (visual, &logical) in visual_to_logical.iter().enumerate() {
            logical_to_visual[logical] = visual;
        }
        Self {
            visual_to_logical,
            logical_to_visual,
        }
    }

    pub fn identity(lane_count: usize) -> Self {
        Self::from_permutation((0..lane_count).collect())
    }

    pub fn mirror(lane_count: usize) -> Self {
        Self::from_permutation((0..lane_count).rev().collect())
    }

    /// Fisher-Yates shuffle of the identity permutation.
    pub fn shuffled(lane_count: usize, rng: &mut impl Rng) -> Self {
        let mut perm: Vec<usize> = (0..lane_count).collect();
        for i in (1..perm.len()).rev() {
            let j = rng.random_range(0..=i);
            perm.swap(i, j);
        }
        Self::from_permutation(perm)
    }

    /// Permutation for a new session. Mirror wins over random.
    pub fn for_session(lane_count: usize, modifiers: &Modifiers, rng: &mut impl Rng) -> Self {
        let mapper = if modifiers.mirror {
            Self::mirror(lane_count)
        } else if modifiers.random {
            Self::shuffled(lane_count, rng)
        } else {
            Self::identity(lane_count)
        };
        log::debug!("LANES: Mapping {:?}", mapper.visual_to_logical);
        mapper
    }

    pub fn lane_count(&self) -> usize {
        self.visual_to_logical.len()
    }

    /// Logical column triggered by a visual (key/touch) lane.
    pub fn to_logical(&self, visual_lane: usize) -> Option<usize> {
        self.visual_to_logical.get(visual_lane).copied()
    }

    /// Visual lane a logical column is drawn in.
    pub fn to_visual(&self, logical_column: usize) -> Option<usize> {
        self.logical_to_visual.get(logical_column).copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.visual_to_logical
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn mirror_reverses_four_lanes() {
        let mapper = LaneMapper::mirror(4);
        assert_eq!(mapper.to_logical(0), Some(3));
        assert_eq!(mapper.to_logical(1), Some(2));
        assert_eq!(mapper.to_logical(2), Some(1));
        assert_eq!(mapper.to_logical(3), Some(0));
        assert_eq!(mapper.to_visual(0), Some(3));
        assert_eq!(mapper.to_logical(4), None);
    }

    #[test]
    fn mirror_wins_over_random() {
        let mods = Modifiers {
            mirror: true,
            random: true,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(LaneMapper::for_session(7, &mods, &mut rng), LaneMapper::mirror(7));

        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(
            LaneMapper::for_session(7, &Modifiers::default(), &mut rng),
            LaneMapper::identity(7)
        );
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(42);
        let mapper = LaneMapper::shuffled(7, &mut rng);
        let mut lanes = mapper.as_slice().to_vec();
        lanes.sort_unstable();
        assert_eq!(lanes, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn same_seed_same_shuffle() {
        let a = LaneMapper::shuffled(10, &mut StdRng::seed_from_u64(3));
        let b = LaneMapper::shuffled(10, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn round_trip_holds(lanes in 1usize..=10, seed in any::<u64>(), mirror in any::<bool>()) {
            let mods = Modifiers { random: true, mirror, ..Default::default() };
            let mapper = LaneMapper::for_session(lanes, &mods, &mut StdRng::seed_from_u64(seed));
            for col in 0..lanes {
                let visual = mapper.to_visual(col).unwrap();
                prop_assert_eq!(mapper.to_logical(visual), Some(col));
            }
        }
    }
}
