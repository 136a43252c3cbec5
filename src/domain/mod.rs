// Domain data shapes shared across layers

pub mod email;
pub mod exploration;
pub mod rights;
pub mod stats;
pub mod summary;

pub use email::{EmailIntent, Role, SenderRequirement, SentEmailRecord};
pub use exploration::{Exploration, State};
pub use rights::{ActivityStatus, ExplorationRights, RightsSnapshot};
pub use stats::{AnswerFrequencyPair, AnswerValue, CalculationResult, StateAnswers, SubmittedAnswer};
pub use summary::ExplorationSummary;
