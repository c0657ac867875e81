use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum ScriptError {
    EmptyScript,
    TickOutOfOrder { index: usize, tick: u32, previous: u32 },
    DuplicateBallId { tick: u32, id: u32 },
    UnknownBall { tick: u32, id: u32 },
    NonFiniteCoordinate { tick: u32 },
    ActionSlotCount { expected: usize, actual: usize },
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyScript => write!(f, "episode script has no ticks"),
            Self::TickOutOfOrder {
                index,
                tick,
                previous,
            } => write!(
                f,
                "tick {tick} at index {index} does not follow tick {previous}"
            ),
            Self::DuplicateBallId { tick, id } => {
                write!(f, "ball id {id} appears twice at tick {tick}")
            }
            Self::UnknownBall { tick, id } => {
                write!(f, "contact with unknown ball {id} at tick {tick}")
            }
            Self::NonFiniteCoordinate { tick } => {
                write!(f, "non-finite coordinate at tick {tick}")
            }
            Self::ActionSlotCount { expected, actual } => write!(
                f,
                "action vector has {actual} slots, expected {expected}"
            ),
        }
    }
}

impl std::error::Error for ScriptError {}
