//! Saver-anchored heuristic: probe near the saver, walk outwards in steps of two,
//! then sweep whatever is left.

use crate::layout::BoxLayout;

struct PickBuilder {
    order: Vec<usize>,
    picked: Vec<bool>,
    saver: usize,
    multiplier: usize,
}

impl PickBuilder {
    fn new(layout: &BoxLayout) -> Self {
        Self {
            order: Vec::with_capacity(layout.num_boxes()),
            picked: vec![false; layout.num_boxes()],
            saver: layout.saver_position(),
            multiplier: layout.multiplier_position(),
        }
    }

    /// Returns `false` only for positions off the board; re-picking is a successful no-op.
    fn pick(&mut self, position: isize) -> bool {
        let Ok(position) = usize::try_from(position) else {
            return false;
        };
        if position >= self.picked.len() {
            return false;
        }
        if self.picked[position] {
            return true;
        }
        self.push(position);
        // The multiplier only pays off if the saver is collected right behind it.
        if position == self.multiplier && !self.picked[self.saver] {
            self.push(self.saver);
        }
        true
    }

    fn push(&mut self, position: usize) {
        self.order.push(position);
        self.picked[position] = true;
    }

    fn walk(&mut self, from: isize, step: isize) {
        let mut current = from + step;
        while self.pick(current) {
            current += step;
        }
    }

    fn is_complete(&self) -> bool {
        self.order.len() == self.picked.len()
    }
}

pub(super) fn pick_order(layout: &BoxLayout) -> Vec<usize> {
    let mut builder = PickBuilder::new(layout);
    let num_boxes = layout.num_boxes();
    let saver = layout.saver_position() as isize;

    // Two probes that would reveal a multiplier sitting two slots from the saver.
    if !builder.pick(saver + 2) {
        builder.pick(saver - 4);
    }
    if !builder.pick(saver - 2) {
        builder.pick(saver + 4);
    }

    let found_special = builder.picked[layout.multiplier_position()]
        || builder.order.iter().any(|&position| layout.is_mimic(position));
    if !found_special {
        builder.pick(saver);
    }

    let first_step = if layout.saver_position() * 2 < num_boxes { -2 } else { 2 };
    builder.walk(saver, first_step);
    builder.walk(saver, -first_step);

    let mut take_next = true;
    while !builder.is_complete() {
        for position in 0..num_boxes {
            if !builder.picked[position] {
                if take_next {
                    builder.pick(position as isize);
                }
                take_next = !take_next;
            }
        }
    }

    builder.order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::validate_pick_order;

    fn order_for(num_boxes: usize, saver: usize, multiplier: usize, mimics: &[usize]) -> Vec<usize> {
        let layout =
            BoxLayout::from_positions(num_boxes, saver, multiplier, mimics).expect("valid layout");
        pick_order(&layout)
    }

    #[test]
    fn probes_then_opens_saver_when_nothing_special_turns_up() {
        let order = order_for(30, 10, 25, &[0, 1, 2, 3]);
        assert_eq!(&order[..3], &[12, 8, 10]);
        validate_pick_order(&order, 30).expect("permutation");
    }

    #[test]
    fn multiplier_probe_is_followed_by_the_saver() {
        let order = order_for(30, 10, 12, &[0, 1, 2, 3]);
        assert_eq!(&order[..3], &[12, 10, 8]);
        validate_pick_order(&order, 30).expect("permutation");
    }

    #[test]
    fn mimic_probe_skips_the_early_saver_pick() {
        let order = order_for(30, 10, 25, &[8, 1, 2, 3]);
        assert_eq!(&order[..2], &[12, 8]);
        // The walk goes down from the saver first, skipping the already opened 8.
        assert_eq!(&order[2..5], &[6, 4, 2]);
        assert!(!order[..5].contains(&10));
        validate_pick_order(&order, 30).expect("permutation");
    }

    #[test]
    fn probes_fall_back_inside_the_board_near_the_edges() {
        // saver + 2 is off the board, so the first probe falls back to saver - 4.
        let order = order_for(30, 29, 5, &[0, 1, 2, 3]);
        assert_eq!(&order[..3], &[25, 27, 29]);

        // saver - 2 is off the board, so the second probe falls back to saver + 4.
        let order = order_for(30, 1, 20, &[10, 11, 12, 13]);
        assert_eq!(&order[..3], &[3, 5, 1]);
    }

    #[test]
    fn walk_starts_towards_the_nearer_end() {
        let order = order_for(30, 20, 0, &[1, 3, 5, 7]);
        // Probes 22 and 18, saver 20, then upwards first: 24, 26, 28.
        assert_eq!(&order[..6], &[22, 18, 20, 24, 26, 28]);
        assert_eq!(&order[6..9], &[16, 14, 12]);
    }

    #[test]
    fn sweep_alternates_over_the_remaining_boxes() {
        let order = order_for(10, 4, 9, &[0, 2]);
        // Probes 6 and 2 (a mimic), walk down: 2 already open, 0; walk up: 6 open, 8.
        assert_eq!(&order[..4], &[6, 2, 0, 8]);
        // Remaining 1, 3, 4, 5, 7, 9: take 1, skip 3, take 4, skip 5, take 7, skip 9,
        // then 3, skip 5, take 9 (pulling in nothing new), then 5.
        assert_eq!(&order[4..], &[1, 4, 7, 3, 9, 5]);
    }

    #[test]
    fn every_saver_position_yields_a_permutation() {
        for num_boxes in [6, 7, 12, 30, 31] {
            for saver in 0..num_boxes {
                let multiplier = (saver + 3) % num_boxes;
                let mimics: Vec<usize> = (0..num_boxes)
                    .filter(|&position| position != saver && position != multiplier)
                    .take(4)
                    .collect();
                let order = order_for(num_boxes, saver, multiplier, &mimics);
                validate_pick_order(&order, num_boxes).unwrap_or_else(|err| {
                    panic!("saver {saver} on {num_boxes} boxes: {err}");
                });
            }
        }
    }
}
