//! Single-game state machine: replays a pick order against a hidden layout.
//! This module exists to own the pick-resolution rules and the win/loss checks.
//! It does not choose picks or aggregate outcomes across trials.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::{PickOrderError, SimError, SimResult};
use crate::layout::{BoxContent, BoxLayout};
use crate::rng::RandomSource;
use crate::strategy::validate_pick_order;

/// Value the multiplier takes once its box is opened.
pub const MULTIPLIER_BONUS: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialOutcome {
    pub won: bool,
    pub boxes_opened: usize,
    pub mimics_encountered: usize,
    pub sucker_punch_kills: usize,
}

/// How a single opened box was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickEvent {
    Empty,
    SaverCollected { gained: u32 },
    MultiplierArmed,
    MimicNeutralizedBySafePick,
    MimicAbsorbedBySaver,
    MimicSuckerPunched,
    MimicFatal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PickRecord {
    pub turn: usize,
    pub position: usize,
    pub content: BoxContent,
    pub event: PickEvent,
    pub savers: u32,
    pub multiplier: u32,
    pub mimics_remaining: usize,
    pub status: GameStatus,
}

pub struct Game<'a> {
    config: &'a GameConfig,
    contents: Vec<BoxContent>,
    opened: Vec<bool>,
    savers: u32,
    multiplier: u32,
    mimics_remaining: usize,
    boxes_opened: usize,
    mimics_encountered: usize,
    sucker_punch_kills: usize,
    status: GameStatus,
}

impl<'a> Game<'a> {
    pub fn new(config: &'a GameConfig, layout: &BoxLayout) -> Self {
        Self {
            config,
            contents: layout.contents().to_vec(),
            opened: vec![false; layout.num_boxes()],
            savers: 0,
            multiplier: 1,
            mimics_remaining: layout.mimic_positions().len(),
            boxes_opened: 0,
            mimics_encountered: 0,
            sucker_punch_kills: 0,
            status: GameStatus::InProgress,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn savers(&self) -> u32 {
        self.savers
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    pub fn mimics_remaining(&self) -> usize {
        self.mimics_remaining
    }

    pub fn outcome(&self) -> TrialOutcome {
        TrialOutcome {
            won: self.status == GameStatus::Won,
            boxes_opened: self.boxes_opened,
            mimics_encountered: self.mimics_encountered,
            sucker_punch_kills: self.sucker_punch_kills,
        }
    }

    /// Opens one box and resolves it. The sucker-punch roll is the only draw from `rng`.
    pub fn open<R: RandomSource + ?Sized>(
        &mut self,
        position: usize,
        rng: &mut R,
    ) -> SimResult<PickRecord> {
        if self.status != GameStatus::InProgress {
            return Err(SimError::GameFinished);
        }
        let num_boxes = self.contents.len();
        let turn = self.boxes_opened;
        if position >= num_boxes {
            return Err(PickOrderError::OutOfRange { index: turn, position, num_boxes }.into());
        }
        if self.opened[position] {
            return Err(SimError::AlreadyOpened(position));
        }

        self.opened[position] = true;
        self.boxes_opened += 1;
        let content = self.contents[position];
        let safe = turn < self.config.safe_picks;

        let event = match content {
            BoxContent::Empty => PickEvent::Empty,
            BoxContent::Saver => {
                let gained = self.multiplier;
                self.savers += gained;
                self.multiplier = 1;
                PickEvent::SaverCollected { gained }
            }
            BoxContent::Multiplier => {
                self.multiplier = MULTIPLIER_BONUS;
                PickEvent::MultiplierArmed
            }
            BoxContent::Mimic => {
                self.mimics_encountered += 1;
                if safe {
                    self.neutralize(position);
                    PickEvent::MimicNeutralizedBySafePick
                } else if self.savers > 0 {
                    self.savers -= 1;
                    self.neutralize(position);
                    PickEvent::MimicAbsorbedBySaver
                } else if rng.unit_f64() < self.config.sucker_punch_chance {
                    self.sucker_punch_kills += 1;
                    self.neutralize(position);
                    PickEvent::MimicSuckerPunched
                } else {
                    self.status = GameStatus::Lost;
                    PickEvent::MimicFatal
                }
            }
        };

        if self.status == GameStatus::InProgress {
            self.check_cleared();
        }

        Ok(PickRecord {
            turn,
            position,
            content,
            event,
            savers: self.savers,
            multiplier: self.multiplier,
            mimics_remaining: self.mimics_remaining,
            status: self.status,
        })
    }

    fn neutralize(&mut self, position: usize) {
        self.contents[position] = BoxContent::Empty;
        self.mimics_remaining -= 1;
    }

    /// The board is won once no mimic is left or only mimics remain closed.
    /// Mimics that were never opened still count as encountered.
    fn check_cleared(&mut self) {
        let num_boxes = self.contents.len();
        if self.mimics_remaining == 0 || self.boxes_opened == num_boxes - self.mimics_remaining {
            self.status = GameStatus::Won;
            self.boxes_opened = num_boxes;
            self.mimics_encountered += self.mimics_remaining;
            self.mimics_remaining = 0;
        }
    }

    /// Marks a game whose pick order ran out as lost.
    fn abandon(&mut self) {
        if self.status == GameStatus::InProgress {
            self.status = GameStatus::Lost;
        }
    }
}

/// Plays a full pick order against `layout` and returns the trial summary.
pub fn play<R: RandomSource + ?Sized>(
    config: &GameConfig,
    layout: &BoxLayout,
    order: &[usize],
    rng: &mut R,
) -> SimResult<TrialOutcome> {
    run(config, layout, order, rng, |_| {})
}

/// Like [`play`], also returning how every opened box was resolved.
pub fn play_traced<R: RandomSource + ?Sized>(
    config: &GameConfig,
    layout: &BoxLayout,
    order: &[usize],
    rng: &mut R,
) -> SimResult<(TrialOutcome, Vec<PickRecord>)> {
    let mut records = Vec::with_capacity(order.len());
    let outcome = run(config, layout, order, rng, |record| records.push(record))?;
    Ok((outcome, records))
}

/// [`play`] for an order the caller has already checked with `validate_pick_order`.
pub(crate) fn play_validated<R: RandomSource + ?Sized>(
    config: &GameConfig,
    layout: &BoxLayout,
    order: &[usize],
    rng: &mut R,
) -> SimResult<TrialOutcome> {
    resolve(config, layout, order, rng, |_| {})
}

fn run<R: RandomSource + ?Sized>(
    config: &GameConfig,
    layout: &BoxLayout,
    order: &[usize],
    rng: &mut R,
    on_pick: impl FnMut(PickRecord),
) -> SimResult<TrialOutcome> {
    validate_pick_order(order, layout.num_boxes())?;
    resolve(config, layout, order, rng, on_pick)
}

fn resolve<R: RandomSource + ?Sized>(
    config: &GameConfig,
    layout: &BoxLayout,
    order: &[usize],
    rng: &mut R,
    mut on_pick: impl FnMut(PickRecord),
) -> SimResult<TrialOutcome> {
    let mut game = Game::new(config, layout);
    for &position in order {
        let record = game.open(position, rng)?;
        on_pick(record);
        if record.status != GameStatus::InProgress {
            return Ok(game.outcome());
        }
    }
    game.abandon();
    Ok(game.outcome())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedSource;

    fn small_config(safe_picks: usize) -> GameConfig {
        GameConfig { num_boxes: 6, mimic_count: 1, safe_picks, ..GameConfig::default() }
    }

    fn small_layout() -> BoxLayout {
        BoxLayout::from_positions(6, 0, 1, &[5]).expect("valid layout")
    }

    #[test]
    fn sequential_order_wins_after_clearing_the_last_mimic() {
        let config = small_config(2);
        let mut rng = ScriptedSource::unit(0.99);
        let outcome = play(&config, &small_layout(), &[0, 1, 2, 3, 4, 5], &mut rng).unwrap();
        assert_eq!(
            outcome,
            TrialOutcome {
                won: true,
                boxes_opened: 6,
                mimics_encountered: 1,
                sucker_punch_kills: 0
            }
        );
        assert_eq!(rng.draws, 0, "no sucker punch roll when a saver is available");
    }

    #[test]
    fn first_pick_mimic_is_neutralized_for_free() {
        let config = small_config(2);
        let mut rng = ScriptedSource::unit(0.99);
        let (outcome, records) =
            play_traced(&config, &small_layout(), &[5, 2, 3, 4, 0, 1], &mut rng).unwrap();

        assert_eq!(records[0].event, PickEvent::MimicNeutralizedBySafePick);
        assert_eq!(records[0].mimics_remaining, 0);
        assert!(outcome.won);
        assert_eq!(outcome.boxes_opened, 6);
        assert_eq!(outcome.mimics_encountered, 1);
        assert_eq!(outcome.sucker_punch_kills, 0);
        assert_eq!(records.len(), 1, "the board is clear as soon as its only mimic is gone");
    }

    #[test]
    fn multiplier_doubles_the_next_saver_and_then_resets() {
        let config = GameConfig::default();
        let layout = BoxLayout::from_positions(30, 1, 0, &[10, 11, 12, 13]).unwrap();
        let mut game = Game::new(&config, &layout);
        let mut rng = ScriptedSource::unit(0.99);

        let armed = game.open(0, &mut rng).unwrap();
        assert_eq!(armed.event, PickEvent::MultiplierArmed);
        assert_eq!(game.multiplier(), 2);

        let collected = game.open(1, &mut rng).unwrap();
        assert_eq!(collected.event, PickEvent::SaverCollected { gained: 2 });
        assert_eq!(game.savers(), 2);
        assert_eq!(game.multiplier(), 1);
    }

    #[test]
    fn topped_up_saver_pool_absorbs_every_later_mimic() {
        // Multiplier then saver as the two safe picks: two charges. Then two mimics
        // eat the charges; the remaining two are cleared by the early-win rule.
        let config = GameConfig::default();
        let layout = BoxLayout::from_positions(30, 1, 0, &[2, 3, 28, 29]).unwrap();
        let order: Vec<usize> = (0..30).collect();
        let mut rng = ScriptedSource::unit(0.99);
        let (outcome, records) = play_traced(&config, &layout, &order, &mut rng).unwrap();

        assert_eq!(records[2].event, PickEvent::MimicAbsorbedBySaver);
        assert_eq!(records[3].event, PickEvent::MimicAbsorbedBySaver);
        assert!(records.iter().all(|record| record.event != PickEvent::MimicFatal));
        assert!(outcome.won);
        assert_eq!(outcome.mimics_encountered, 4);
        assert_eq!(outcome.boxes_opened, 30);
        assert_eq!(rng.draws, 0);
    }

    #[test]
    fn mimic_without_saver_loses_unless_sucker_punched() {
        let config = GameConfig::default();
        let layout = BoxLayout::from_positions(30, 29, 28, &[2, 10, 11, 12]).unwrap();
        let order: Vec<usize> = (0..30).collect();

        let (outcome, records) =
            play_traced(&config, &layout, &order, &mut ScriptedSource::unit(0.5)).unwrap();
        assert!(!outcome.won);
        assert_eq!(outcome.boxes_opened, 3);
        assert_eq!(outcome.mimics_encountered, 1);
        assert_eq!(records.last().map(|record| record.event), Some(PickEvent::MimicFatal));
        assert_eq!(records.last().map(|record| record.status), Some(GameStatus::Lost));

        let (outcome, records) =
            play_traced(&config, &layout, &order, &mut ScriptedSource::unit(0.0)).unwrap();
        assert_eq!(records[2].event, PickEvent::MimicSuckerPunched);
        assert!(outcome.won);
        assert_eq!(outcome.sucker_punch_kills, 4);
    }

    #[test]
    fn game_is_won_once_only_mimics_stay_closed() {
        let config = small_config(2);
        let layout = small_layout();
        let (outcome, records) =
            play_traced(&config, &layout, &[0, 1, 2, 3, 4, 5], &mut ScriptedSource::unit(0.99))
                .unwrap();
        // Box 4 is the last non-mimic box: the mimic at 5 is credited without opening it.
        assert_eq!(records.len(), 5);
        assert_eq!(records[4].status, GameStatus::Won);
        assert_eq!(outcome.mimics_encountered, 1);
        assert_eq!(outcome.boxes_opened, 6);
    }

    #[test]
    fn same_inputs_give_the_same_outcome() {
        let config = GameConfig::default();
        let layout = BoxLayout::from_positions(30, 7, 19, &[3, 4, 20, 25]).unwrap();
        let order: Vec<usize> = (0..30).rev().collect();
        let first = play(&config, &layout, &order, &mut ScriptedSource::new(&[1, 2, 3])).unwrap();
        let second = play(&config, &layout, &order, &mut ScriptedSource::new(&[1, 2, 3])).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn prevalidated_orders_resolve_like_checked_ones() {
        let config = GameConfig { sucker_punch_chance: 0.5, ..GameConfig::default() };
        let layout = BoxLayout::from_positions(30, 7, 19, &[3, 4, 20, 25]).unwrap();
        let orders: [Vec<usize>; 3] =
            [(0..30).collect(), (0..30).rev().collect(), (0..30).map(|i| (i * 7) % 30).collect()];
        for order in &orders {
            for script in [[0_u64, u64::MAX], [u64::MAX, 0]] {
                let checked = play(&config, &layout, order, &mut ScriptedSource::new(&script));
                let direct =
                    play_validated(&config, &layout, order, &mut ScriptedSource::new(&script));
                assert_eq!(checked.unwrap(), direct.unwrap());
            }
        }
    }

    #[test]
    fn malformed_orders_are_rejected_before_play() {
        let config = small_config(2);
        let layout = small_layout();
        let mut rng = ScriptedSource::unit(0.99);
        assert!(matches!(
            play(&config, &layout, &[0, 1, 2], &mut rng),
            Err(SimError::PickOrder(PickOrderError::WrongLength { expected: 6, actual: 3 }))
        ));
        assert!(matches!(
            play(&config, &layout, &[0, 1, 1, 2, 3, 4], &mut rng),
            Err(SimError::PickOrder(PickOrderError::Duplicate { index: 2, position: 1 }))
        ));
    }

    #[test]
    fn step_api_rejects_reopening_and_playing_past_the_end() {
        let config = small_config(2);
        let layout = small_layout();
        let mut rng = ScriptedSource::unit(0.99);
        let mut game = Game::new(&config, &layout);

        game.open(2, &mut rng).unwrap();
        assert!(matches!(game.open(2, &mut rng), Err(SimError::AlreadyOpened(2))));
        assert!(matches!(game.open(9, &mut rng), Err(SimError::PickOrder(_))));

        game.open(5, &mut rng).unwrap();
        assert_eq!(game.status(), GameStatus::Won);
        assert!(matches!(game.open(0, &mut rng), Err(SimError::GameFinished)));
    }

    #[test]
    fn no_safe_picks_means_the_first_mimic_can_end_the_game() {
        let config = small_config(0);
        let outcome =
            play(&config, &small_layout(), &[5, 0, 1, 2, 3, 4], &mut ScriptedSource::unit(0.99))
                .unwrap();
        assert!(!outcome.won);
        assert_eq!(outcome.boxes_opened, 1);
    }
}
