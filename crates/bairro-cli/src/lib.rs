//! Scripted sessions for the Meu Bairro proposal engine.
//!
//! Used by the `bairro-cli` binary to replay a YAML script of member actions
//! and print the resulting views as JSON.

pub mod output;
pub mod script;

pub use output::{OutputView, Report, ViewOutput};
pub use script::{Replayer, Script, ScriptError, Step, StepReport};
