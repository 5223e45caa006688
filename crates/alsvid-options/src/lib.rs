//! Layered execution options for Alsvid primitives.
//!
//! The options model has three layers:
//!
//! - [`ConfigValue`]: a per-field unset sentinel, so "not specified" is
//!   distinguishable from "explicitly set to the default".
//! - Option groups ([`ExecutionOptions`], [`TranspilationOptions`],
//!   [`ResilienceOptions`], [`TwirlingOptions`], [`EnvironmentOptions`],
//!   [`SimulatorOptions`]): nested structs of `ConfigValue` leaves with
//!   documented resolve-time defaults.
//! - [`PrimitiveOptions`]: the validated root tree. Field ranges and
//!   cross-field rules are enforced at assignment time; `resolve()` emits
//!   the plain map embedded in a submission request.

pub mod error;
pub mod groups;
pub mod primitive;
pub mod value;

pub use error::{OptionsError, OptionsResult};
pub use groups::{
    EnvironmentOptions, ExecutionOptions, ResilienceOptions, SimulatorOptions,
    TranspilationOptions, TwirlingOptions, TwirlingStrategy,
};
pub use primitive::{DdSequence, PrimitiveOptions};
pub use value::ConfigValue;
