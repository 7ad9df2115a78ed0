//! Lane permutations applied once per session.

mod lane_map;

pub use lane_map::LaneMapper;
