//! Hidden box layouts: where the saver, the multiplier and the mimics sit.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::{ConfigError, LayoutError};
use crate::rng::{RandomSource, sample_distinct};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoxContent {
    Empty,
    Saver,
    Multiplier,
    Mimic,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoxLayout {
    contents: Vec<BoxContent>,
    saver: usize,
    multiplier: usize,
    mimics: Vec<usize>,
}

impl BoxLayout {
    /// Draws a fresh layout uniformly at random.
    pub fn generate<R: RandomSource + ?Sized>(
        config: &GameConfig,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        // One saver, one multiplier, the mimics, and at least one box left over.
        if config.num_boxes <= config.mimic_count + 1 {
            return Err(ConfigError::TooFewBoxes {
                num_boxes: config.num_boxes,
                mimic_count: config.mimic_count,
            });
        }
        let drawn = sample_distinct(config.num_boxes, config.mimic_count + 2, rng);
        Ok(Self::assemble(config.num_boxes, drawn[0], drawn[1], drawn[2..].to_vec()))
    }

    /// Builds a layout from known positions, rejecting overlaps and out-of-range slots.
    pub fn from_positions(
        num_boxes: usize,
        saver: usize,
        multiplier: usize,
        mimics: &[usize],
    ) -> Result<Self, LayoutError> {
        let mut seen = vec![false; num_boxes];
        for &position in [saver, multiplier].iter().chain(mimics) {
            if position >= num_boxes {
                return Err(LayoutError::OutOfRange { position, num_boxes });
            }
            if seen[position] {
                return Err(LayoutError::Overlap { position });
            }
            seen[position] = true;
        }
        Ok(Self::assemble(num_boxes, saver, multiplier, mimics.to_vec()))
    }

    fn assemble(num_boxes: usize, saver: usize, multiplier: usize, mimics: Vec<usize>) -> Self {
        let mut contents = vec![BoxContent::Empty; num_boxes];
        contents[saver] = BoxContent::Saver;
        contents[multiplier] = BoxContent::Multiplier;
        for &mimic in &mimics {
            contents[mimic] = BoxContent::Mimic;
        }
        Self { contents, saver, multiplier, mimics }
    }

    pub fn num_boxes(&self) -> usize {
        self.contents.len()
    }

    pub fn saver_position(&self) -> usize {
        self.saver
    }

    pub fn multiplier_position(&self) -> usize {
        self.multiplier
    }

    pub fn mimic_positions(&self) -> &[usize] {
        &self.mimics
    }

    pub fn contents(&self) -> &[BoxContent] {
        &self.contents
    }

    pub fn content_at(&self, position: usize) -> BoxContent {
        self.contents[position]
    }

    pub fn is_mimic(&self, position: usize) -> bool {
        self.contents.get(position) == Some(&BoxContent::Mimic)
    }
}
