//! Error types for configuration, layouts, pick orders and simulation.

pub type SimResult<T> = Result<T, SimError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{num_boxes} boxes cannot hold a saver, a multiplier and {mimic_count} mimics")]
    TooFewBoxes { num_boxes: usize, mimic_count: usize },

    #[error("sucker punch chance must be a probability in [0, 1], got {0}")]
    InvalidSuckerPunchChance(f64),

    #[error("{safe_picks} safe picks exceed the {num_boxes} available boxes")]
    TooManySafePicks { safe_picks: usize, num_boxes: usize },

    #[error("trial count must be at least 1")]
    NoTrials,

    #[error("at least one strategy must be selected")]
    NoStrategies,

    #[error("thread count must be at least 1")]
    NoThreads,

    #[error("unknown strategy '{0}'")]
    UnknownStrategy(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("position {position} is outside a board of {num_boxes} boxes")]
    OutOfRange { position: usize, num_boxes: usize },

    #[error("position {position} holds more than one special box")]
    Overlap { position: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PickOrderError {
    #[error("pick #{index} targets box {position}, outside a board of {num_boxes} boxes")]
    OutOfRange { index: usize, position: usize, num_boxes: usize },

    #[error("pick #{index} opens box {position} a second time")]
    Duplicate { index: usize, position: usize },

    #[error("pick order lists {actual} boxes, expected {expected}")]
    WrongLength { expected: usize, actual: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid layout: {0}")]
    Layout(#[from] LayoutError),

    #[error("strategy {strategy} produced an invalid pick order: {source}")]
    InvalidPickOrder {
        strategy: &'static str,
        #[source]
        source: PickOrderError,
    },

    #[error("invalid pick order: {0}")]
    PickOrder(#[from] PickOrderError),

    #[error("box {0} was already opened")]
    AlreadyOpened(usize),

    #[error("the game has already finished")]
    GameFinished,

    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}
