//! Crisis-preparedness simulation engine with an LLM narrator.
//!
//! This crate provides:
//! - A parser for the two-marker reply format the model is asked to emit
//! - A directive interpreter that turns free-text modification lines into
//!   typed mutations over a semi-structured session state
//! - A phase-driven session state machine with a hard day cap
//! - A director that owns the Mistral client and prompt construction
//!
//! # Quick Start
//!
//! ```ignore
//! use crisis_core::{CrisisSession, Profile, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = CrisisSession::new(SessionConfig::new())?;
//!
//!     session.submit_profile(Profile::new("Ada", 34, "Lyon"))?;
//!     let scenario = session.generate_scenario().await?;
//!     println!("{scenario}");
//!
//!     let report = session.decide("move valuables upstairs").await?;
//!     println!("Day {}: {}", report.day, report.narrative);
//!     Ok(())
//! }
//! ```

pub mod directive;
pub mod director;
pub mod parse;
pub mod phase;
pub mod prompts;
pub mod session;
pub mod simulation;
pub mod state;
pub mod testing;

// Primary public API
pub use directive::{apply_directive, Directive};
pub use director::{CrisisDirector, DirectorConfig, DirectorError};
pub use parse::{parse_reply, ModelReply};
pub use phase::{Phase, PhaseEvent, TransitionError};
pub use session::{CrisisSession, SessionConfig, SessionError, TurnReport};
pub use simulation::{Profile, Simulation, SimulationError, TurnOutcome};
pub use state::SessionState;
pub use testing::{MockDirector, TestHarness};
