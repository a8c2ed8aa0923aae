//! Pick-order strategies and the registry the experiment runner iterates.
//! This module exists to keep every strategy behind one interface: layout in, full order out.
//! It does not resolve picks against the rules; the game simulator does.

mod refined;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, PickOrderError};
use crate::layout::BoxLayout;
use crate::rng::{RandomSource, shuffle};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    #[serde(rename = "static_random")]
    StaticRandom,
    #[serde(rename = "static_sequential")]
    StaticSequential,
    #[serde(rename = "static_sequential_reverse")]
    StaticSequentialReverse,
    #[serde(rename = "dynamic_random")]
    DynamicRandom,
    #[serde(rename = "dynamic_sequential")]
    DynamicSequential,
    #[serde(rename = "dynamic_sequential_reverse")]
    DynamicSequentialReverse,
    #[serde(rename = "refined_dynamic_strategy")]
    RefinedDynamic,
}

impl Strategy {
    pub const ALL: [Strategy; 7] = [
        Strategy::StaticRandom,
        Strategy::StaticSequential,
        Strategy::StaticSequentialReverse,
        Strategy::DynamicRandom,
        Strategy::DynamicSequential,
        Strategy::DynamicSequentialReverse,
        Strategy::RefinedDynamic,
    ];

    /// Strategies compared by a default experiment, in report order.
    pub const DEFAULT_SET: [Strategy; 4] = [
        Strategy::DynamicRandom,
        Strategy::DynamicSequential,
        Strategy::DynamicSequentialReverse,
        Strategy::RefinedDynamic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::StaticRandom => "static_random",
            Strategy::StaticSequential => "static_sequential",
            Strategy::StaticSequentialReverse => "static_sequential_reverse",
            Strategy::DynamicRandom => "dynamic_random",
            Strategy::DynamicSequential => "dynamic_sequential",
            Strategy::DynamicSequentialReverse => "dynamic_sequential_reverse",
            Strategy::RefinedDynamic => "refined_dynamic_strategy",
        }
    }

    /// Whether the pick order depends only on the layout.
    pub fn is_deterministic(self) -> bool {
        !matches!(self, Strategy::StaticRandom | Strategy::DynamicRandom)
    }

    /// Full pick order for `layout`. Only the random variants draw from `rng`.
    pub fn pick_order<R: RandomSource + ?Sized>(
        self,
        layout: &BoxLayout,
        safe_picks: usize,
        rng: &mut R,
    ) -> Vec<usize> {
        let num_boxes = layout.num_boxes();
        match self {
            Strategy::StaticRandom => random_order(num_boxes, rng),
            Strategy::StaticSequential => (0..num_boxes).collect(),
            Strategy::StaticSequentialReverse => (0..num_boxes).rev().collect(),
            Strategy::DynamicRandom => {
                reposition_saver(random_order(num_boxes, rng), layout, safe_picks)
            }
            Strategy::DynamicSequential => {
                reposition_saver((0..num_boxes).collect(), layout, safe_picks)
            }
            Strategy::DynamicSequentialReverse => {
                reposition_saver((0..num_boxes).rev().collect(), layout, safe_picks)
            }
            Strategy::RefinedDynamic => refined::pick_order(layout),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == raw)
            .ok_or_else(|| ConfigError::UnknownStrategy(raw.to_string()))
    }
}

fn random_order<R: RandomSource + ?Sized>(num_boxes: usize, rng: &mut R) -> Vec<usize> {
    let mut order: Vec<usize> = (0..num_boxes).collect();
    shuffle(&mut order, rng);
    order
}

/// Moves the saver right behind the safe picks, or behind the multiplier when a
/// safe pick already spent itself on a mimic.
fn reposition_saver(mut order: Vec<usize>, layout: &BoxLayout, safe_picks: usize) -> Vec<usize> {
    let saver = layout.saver_position();
    order.retain(|&position| position != saver);

    let safe_end = safe_picks.min(order.len());
    let mimic_in_safe_picks = order[..safe_end].iter().any(|&position| layout.is_mimic(position));

    let insert_at = if mimic_in_safe_picks {
        order
            .iter()
            .position(|&position| position == layout.multiplier_position())
            .map_or(order.len(), |index| index + 1)
    } else {
        safe_end
    };
    order.insert(insert_at, saver);
    order
}

/// Checks that `order` opens every box of a `num_boxes` board exactly once.
pub fn validate_pick_order(order: &[usize], num_boxes: usize) -> Result<(), PickOrderError> {
    let mut seen = vec![false; num_boxes];
    for (index, &position) in order.iter().enumerate() {
        if position >= num_boxes {
            return Err(PickOrderError::OutOfRange { index, position, num_boxes });
        }
        if seen[position] {
            return Err(PickOrderError::Duplicate { index, position });
        }
        seen[position] = true;
    }
    if order.len() != num_boxes {
        return Err(PickOrderError::WrongLength { expected: num_boxes, actual: order.len() });
    }
    Ok(())
}
