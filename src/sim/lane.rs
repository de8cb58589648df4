//! Lane geometry for the road
//!
//! The road is split into `lane_count` equal-width vertical corridors:
//! - lane_width = road_width / lane_count
//! - lane_center(i) = left x of a car centred in lane i

use serde::{Deserialize, Serialize};

use crate::Tuning;

/// Road layout (pure, copyable)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneGeometry {
    /// Left edge of the road
    pub road_x: f32,
    /// Road width in pixels
    pub road_width: f32,
    /// Number of lanes (at least 1)
    pub lane_count: u32,
    /// Width of a car placed in a lane
    pub car_width: f32,
    /// Gap kept between the player and the road edges
    pub margin: f32,
}

impl LaneGeometry {
    pub fn new(road_x: f32, road_width: f32, lane_count: u32, car_width: f32) -> Self {
        Self {
            road_x,
            road_width,
            lane_count,
            car_width,
            margin: 0.0,
        }
    }

    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            margin: tuning.road_margin,
            ..Self::new(
                tuning.road_x,
                tuning.road_width,
                tuning.lane_count,
                tuning.car_width,
            )
        }
    }

    #[inline]
    pub fn lane_width(&self) -> f32 {
        self.road_width / self.lane_count as f32
    }

    /// Left x of a car centred in `lane`
    #[inline]
    pub fn lane_center(&self, lane: u32) -> f32 {
        let lane_width = self.lane_width();
        self.road_x + lane as f32 * lane_width + (lane_width - self.car_width) / 2.0
    }

    /// Middle lane (rounded down for an even count), where the player starts
    #[inline]
    pub fn center_lane(&self) -> u32 {
        self.lane_count / 2
    }

    /// Leftmost x the player may occupy
    #[inline]
    pub fn min_x(&self) -> f32 {
        self.road_x + self.margin
    }

    /// Rightmost x the player may occupy
    #[inline]
    pub fn max_x(&self) -> f32 {
        self.road_x + self.road_width - self.car_width - self.margin
    }

    /// Clamp a car's x into the drivable span
    #[inline]
    pub fn clamp_x(&self, x: f32) -> f32 {
        x.clamp(self.min_x(), self.max_x())
    }
}
