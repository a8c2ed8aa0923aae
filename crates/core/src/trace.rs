//! Row-per-pick text view of a single traced game.
//! This module exists to keep board visualization out of the simulator.
//! It does not play games; it renders records produced by `game::play_traced`.

use std::fmt::Write;

use crate::game::{GameStatus, PickEvent, PickRecord, TrialOutcome};
use crate::layout::{BoxContent, BoxLayout};

fn glyph(layout: &BoxLayout, position: usize, opened: bool) -> char {
    match (layout.content_at(position), opened) {
        (BoxContent::Mimic, true) => 'M',
        (BoxContent::Saver, true) => 'S',
        (BoxContent::Multiplier, true) => 'X',
        (BoxContent::Empty, true) => '.',
        // The saver's location is known before it is opened.
        (BoxContent::Saver, false) => 's',
        (_, false) => '#',
    }
}

fn describe(event: PickEvent) -> String {
    match event {
        PickEvent::Empty => "empty".to_string(),
        PickEvent::SaverCollected { gained } => format!("saver +{gained}"),
        PickEvent::MultiplierArmed => "multiplier armed".to_string(),
        PickEvent::MimicNeutralizedBySafePick => "mimic killed by safe pick".to_string(),
        PickEvent::MimicAbsorbedBySaver => "mimic absorbed by saver".to_string(),
        PickEvent::MimicSuckerPunched => "mimic sucker punched".to_string(),
        PickEvent::MimicFatal => "mimic wins".to_string(),
    }
}

pub fn render_row(layout: &BoxLayout, record: &PickRecord, opened: &[bool]) -> String {
    let mut row = format!("{:02}: ", record.turn);
    for (position, &is_open) in opened.iter().enumerate() {
        let marker = if position == record.position { '>' } else { ' ' };
        row.push(marker);
        row.push(glyph(layout, position, is_open));
        row.push(' ');
    }
    let _ = write!(
        row,
        "| {:<26} savers={} x{} mimics_left={}",
        describe(record.event),
        record.savers,
        record.multiplier,
        record.mimics_remaining
    );
    row
}

/// Renders every pick of a game, then a closing line with the outcome.
pub fn render_trace(layout: &BoxLayout, records: &[PickRecord], outcome: &TrialOutcome) -> String {
    let mut opened = vec![false; layout.num_boxes()];
    let mut out = String::new();
    for record in records {
        opened[record.position] = true;
        out.push_str(&render_row(layout, record, &opened));
        out.push('\n');
    }

    let verdict = match records.last().map(|record| record.status) {
        Some(GameStatus::Won) => "WON",
        Some(GameStatus::Lost) | Some(GameStatus::InProgress) | None => "LOST",
    };
    let _ = writeln!(
        out,
        "{verdict}: {} boxes opened, {} mimics encountered, {} sucker punch kills",
        outcome.boxes_opened, outcome.mimics_encountered, outcome.sucker_punch_kills
    );
    out
}
