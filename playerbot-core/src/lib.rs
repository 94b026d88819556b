pub mod bot;
pub mod config;
pub mod constants;
pub mod error;
pub mod rng;
pub mod world;

pub use bot::{
    decide, should_close, BotDecisionState, PlayerBot, SteeringMode, TickDecision, TickOutcome,
};
pub use config::BotConfig;
pub use error::{ConfigError, ConfigField};
pub use rng::{RandomSource, SeededRng};
pub use world::{
    BodySegment, CellOwner, ControlledPlayer, EntityId, EntityKind, PlayerId, PlayerState, TeamId,
    Vec2, ViewArea, VisibleEntity,
};
