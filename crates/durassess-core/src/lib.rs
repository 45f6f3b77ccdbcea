pub mod diagnostic;
pub mod error;
pub mod measurement;
pub mod score;
pub mod sequencer;

pub use diagnostic::*;
pub use error::*;
pub use measurement::*;
pub use score::*;
pub use sequencer::*;
