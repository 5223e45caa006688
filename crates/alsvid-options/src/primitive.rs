//! The primitive options tree.
//!
//! [`PrimitiveOptions`] is the root of the layered configuration consumed by
//! primitive submissions. Fields are private: every mutation goes through a
//! validating setter (or the bulk [`update_from_value`]
//! (PrimitiveOptions::update_from_value)), so an invalid value can never be
//! observed in a tree. Cross-field rules are re-checked on every mutation
//! that could affect them, against the whole candidate tree — not just the
//! changed leaf.
//!
//! [`resolve`](PrimitiveOptions::resolve) produces the plain `options` map
//! embedded in a submission request. The submission holds the resolved map by
//! value; later mutation of the tree never reaches an in-flight request.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{OptionsError, OptionsResult};
use crate::groups::{
    EnvironmentOptions, ExecutionOptions, ResilienceOptions, SimulatorOptions,
    TranspilationOptions, TwirlingOptions,
};
use crate::value::ConfigValue;

/// Dynamical-decoupling sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DdSequence {
    /// Two X pulses.
    #[serde(rename = "XX")]
    Xx,
    /// X-plus / X-minus pulse pair.
    #[serde(rename = "XpXm")]
    XpXm,
    /// Four-pulse XY sequence.
    #[serde(rename = "XY4")]
    Xy4,
}

impl DdSequence {
    /// The wire-level sequence name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DdSequence::Xx => "XX",
            DdSequence::XpXm => "XpXm",
            DdSequence::Xy4 => "XY4",
        }
    }
}

const MAX_OPTIMIZATION_LEVEL: u8 = 3;
const MAX_RESILIENCE_LEVEL: u8 = 3;

/// Options tree for primitive executions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrimitiveOptions {
    optimization_level: ConfigValue<u8>,
    resilience_level: ConfigValue<u8>,
    dynamical_decoupling: ConfigValue<DdSequence>,
    experimental: ConfigValue<Value>,
    transpilation: TranspilationOptions,
    resilience: ResilienceOptions,
    execution: ExecutionOptions,
    twirling: TwirlingOptions,
    environment: EnvironmentOptions,
    simulator: SimulatorOptions,
    /// Whether the resolved backend is a simulator. Not serialized; feeds
    /// the coupling-map cross-field rule.
    simulator_target: bool,
}

/// Bulk-update patch. The closed schema lives here: an unrecognized key
/// fails deserialization before any field is touched.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct OptionsPatch {
    optimization_level: ConfigValue<u8>,
    resilience_level: ConfigValue<u8>,
    dynamical_decoupling: ConfigValue<DdSequence>,
    experimental: ConfigValue<Value>,
    transpilation: Option<TranspilationOptions>,
    resilience: Option<ResilienceOptions>,
    execution: Option<ExecutionOptions>,
    twirling: Option<TwirlingOptions>,
    environment: Option<EnvironmentOptions>,
    simulator: Option<SimulatorOptions>,
}

impl PrimitiveOptions {
    /// Create an all-unset options tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an options tree targeting a simulator backend.
    pub fn for_simulator() -> Self {
        Self {
            simulator_target: true,
            ..Self::default()
        }
    }

    /// Current optimization level, if set.
    pub fn optimization_level(&self) -> Option<u8> {
        self.optimization_level.as_set().copied()
    }

    /// Current resilience level, if set.
    pub fn resilience_level(&self) -> Option<u8> {
        self.resilience_level.as_set().copied()
    }

    /// Current dynamical-decoupling sequence, if set.
    pub fn dynamical_decoupling(&self) -> Option<DdSequence> {
        self.dynamical_decoupling.as_set().copied()
    }

    /// Whether the tree targets a simulator backend.
    pub fn is_simulator_target(&self) -> bool {
        self.simulator_target
    }

    /// The simulator group.
    pub fn simulator(&self) -> &SimulatorOptions {
        &self.simulator
    }

    /// The execution group.
    pub fn execution(&self) -> &ExecutionOptions {
        &self.execution
    }

    /// Set the optimization level. Valid range: 0-3.
    pub fn set_optimization_level(&mut self, level: u8) -> OptionsResult<()> {
        if level > MAX_OPTIMIZATION_LEVEL {
            return Err(OptionsError::invalid(
                "optimization_level",
                format!("valid range is 0-{MAX_OPTIMIZATION_LEVEL}"),
            ));
        }
        self.optimization_level = ConfigValue::Set(level);
        Ok(())
    }

    /// Set the resilience level. Valid range: 0-3; level 3 on a simulator
    /// target additionally requires a coupling map.
    pub fn set_resilience_level(&mut self, level: u8) -> OptionsResult<()> {
        if level > MAX_RESILIENCE_LEVEL {
            return Err(OptionsError::invalid(
                "resilience_level",
                format!("valid range is 0-{MAX_RESILIENCE_LEVEL}"),
            ));
        }
        let mut candidate = self.clone();
        candidate.resilience_level = ConfigValue::Set(level);
        candidate.cross_validate()?;
        *self = candidate;
        Ok(())
    }

    /// Set the dynamical-decoupling sequence.
    pub fn set_dynamical_decoupling(&mut self, sequence: DdSequence) -> OptionsResult<()> {
        self.dynamical_decoupling = ConfigValue::Set(sequence);
        Ok(())
    }

    /// Set the experimental options blob.
    pub fn set_experimental(&mut self, experimental: Value) -> OptionsResult<()> {
        self.experimental = ConfigValue::Set(experimental);
        Ok(())
    }

    /// Flag whether the resolved backend is a simulator.
    ///
    /// Re-checks the coupling-map rule: flipping the flag alone can make an
    /// otherwise valid tree invalid.
    pub fn set_simulator_target(&mut self, simulator: bool) -> OptionsResult<()> {
        let mut candidate = self.clone();
        candidate.simulator_target = simulator;
        candidate.cross_validate()?;
        *self = candidate;
        Ok(())
    }

    /// Set the simulator coupling map.
    pub fn set_coupling_map(&mut self, coupling_map: Vec<(u32, u32)>) -> OptionsResult<()> {
        self.simulator.coupling_map = ConfigValue::Set(coupling_map);
        Ok(())
    }

    /// Set the simulator RNG seed.
    pub fn set_seed_simulator(&mut self, seed: u64) -> OptionsResult<()> {
        self.simulator.seed_simulator = ConfigValue::Set(seed);
        Ok(())
    }

    /// Overlay transpilation options; set fields win.
    pub fn update_transpilation(&mut self, options: TranspilationOptions) {
        self.transpilation = self.transpilation.clone().merged(options);
    }

    /// Overlay resilience options; set fields win.
    pub fn update_resilience(&mut self, options: ResilienceOptions) {
        self.resilience = self.resilience.clone().merged(options);
    }

    /// Overlay execution options; set fields win.
    pub fn update_execution(&mut self, options: ExecutionOptions) {
        self.execution = self.execution.clone().merged(options);
    }

    /// Overlay twirling options; set fields win.
    pub fn update_twirling(&mut self, options: TwirlingOptions) {
        self.twirling = self.twirling.clone().merged(options);
    }

    /// Overlay environment options; set fields win.
    pub fn update_environment(&mut self, options: EnvironmentOptions) {
        self.environment = self.environment.clone().merged(options);
    }

    /// Bulk update from a JSON object.
    ///
    /// Unknown keys are rejected without touching the tree, and every
    /// recognized field passes the same validation as its typed setter. On
    /// any failure the tree is left unchanged.
    pub fn update_from_value(&mut self, value: Value) -> OptionsResult<()> {
        let patch: OptionsPatch = serde_json::from_value(value)
            .map_err(|e| OptionsError::invalid("options", e.to_string()))?;

        let mut candidate = self.clone();

        if let ConfigValue::Set(level) = patch.optimization_level {
            candidate.set_optimization_level(level)?;
        }
        if let ConfigValue::Set(level) = patch.resilience_level {
            if level > MAX_RESILIENCE_LEVEL {
                return Err(OptionsError::invalid(
                    "resilience_level",
                    format!("valid range is 0-{MAX_RESILIENCE_LEVEL}"),
                ));
            }
            candidate.resilience_level = ConfigValue::Set(level);
        }
        candidate.dynamical_decoupling =
            patch.dynamical_decoupling.or(candidate.dynamical_decoupling);
        candidate.experimental = patch.experimental.or(candidate.experimental);

        if let Some(options) = patch.transpilation {
            candidate.update_transpilation(options);
        }
        if let Some(options) = patch.resilience {
            candidate.update_resilience(options);
        }
        if let Some(options) = patch.execution {
            candidate.update_execution(options);
        }
        if let Some(options) = patch.twirling {
            candidate.update_twirling(options);
        }
        if let Some(options) = patch.environment {
            candidate.update_environment(options);
        }
        if let Some(options) = patch.simulator {
            candidate.simulator = candidate.simulator.clone().merged(options);
        }

        candidate.cross_validate()?;
        *self = candidate;
        Ok(())
    }

    /// Cross-field rules, checked against the whole tree.
    fn cross_validate(&self) -> OptionsResult<()> {
        if self.resilience_level == ConfigValue::Set(MAX_RESILIENCE_LEVEL)
            && self.simulator_target
            && self.simulator.coupling_map.is_unset()
        {
            return Err(OptionsError::invalid(
                "resilience_level",
                "a coupling map is required when the target is a simulator \
                 and resilience_level is 3",
            ));
        }
        Ok(())
    }

    /// Resolve into the plain options map sent with a submission.
    ///
    /// Groups with server defaults resolve to complete sub-maps; unset
    /// scalars are omitted; the simulator group carries set fields only and
    /// is dropped when empty. The output never contains an unset marker.
    pub fn resolve(&self) -> Map<String, Value> {
        let mut out = Map::new();

        if let ConfigValue::Set(level) = self.optimization_level {
            out.insert("optimization_level".into(), level.into());
        }
        if let ConfigValue::Set(level) = self.resilience_level {
            out.insert("resilience_level".into(), level.into());
        }
        if let ConfigValue::Set(sequence) = self.dynamical_decoupling {
            out.insert("dynamical_decoupling".into(), sequence.as_str().into());
        }
        if let ConfigValue::Set(experimental) = &self.experimental {
            out.insert("experimental".into(), experimental.clone());
        }

        out.insert("transpilation".into(), Value::Object(self.transpilation.resolve()));
        out.insert("resilience".into(), Value::Object(self.resilience.resolve()));
        out.insert("execution".into(), Value::Object(self.execution.resolve()));
        out.insert("twirling".into(), Value::Object(self.twirling.resolve()));
        out.insert("environment".into(), Value::Object(self.environment.resolve()));

        let simulator = self.simulator.resolve();
        if !simulator.is_empty() {
            out.insert("simulator".into(), Value::Object(simulator));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_level_range_validation() {
        let mut options = PrimitiveOptions::new();
        assert!(options.set_optimization_level(3).is_ok());
        assert!(options.set_optimization_level(4).is_err());
        // The failed set left the previous value in place.
        assert_eq!(options.optimization_level(), Some(3));

        assert!(options.set_resilience_level(4).is_err());
        assert_eq!(options.resilience_level(), None);
    }

    #[test]
    fn test_resilience_three_requires_coupling_map_on_simulator() {
        let mut options = PrimitiveOptions::for_simulator();
        let err = options.set_resilience_level(3).unwrap_err();
        let OptionsError::InvalidOption { field, .. } = err;
        assert_eq!(field, "resilience_level");
        assert_eq!(options.resilience_level(), None);

        // Setting a coupling map first makes the same assignment succeed.
        options.set_coupling_map(vec![(0, 1), (1, 2)]).unwrap();
        options.set_resilience_level(3).unwrap();
        assert_eq!(options.resilience_level(), Some(3));
    }

    #[test]
    fn test_resilience_three_fine_on_hardware() {
        let mut options = PrimitiveOptions::new();
        options.set_resilience_level(3).unwrap();
        assert_eq!(options.resilience_level(), Some(3));
    }

    #[test]
    fn test_flipping_simulator_flag_rechecks_rule() {
        let mut options = PrimitiveOptions::new();
        options.set_resilience_level(3).unwrap();

        // The flag change alone now violates the coupling-map rule.
        assert!(options.set_simulator_target(true).is_err());
        assert!(!options.is_simulator_target());

        options.set_coupling_map(vec![(0, 1)]).unwrap();
        options.set_simulator_target(true).unwrap();
        assert!(options.is_simulator_target());
    }

    #[test]
    fn test_resolve_policy() {
        let resolved = PrimitiveOptions::new().resolve();

        // Unset scalars are omitted.
        assert!(!resolved.contains_key("optimization_level"));
        assert!(!resolved.contains_key("resilience_level"));
        assert!(!resolved.contains_key("dynamical_decoupling"));
        assert!(!resolved.contains_key("experimental"));
        assert!(!resolved.contains_key("simulator"));

        // Groups resolve complete.
        assert_eq!(resolved["execution"]["shots"], 4096);
        assert_eq!(resolved["transpilation"]["skip_transpilation"], false);
        assert_eq!(resolved["resilience"]["measure_mitigation"], true);
        assert_eq!(resolved["twirling"]["strategy"], "active-accum");
        assert_eq!(resolved["environment"]["log_level"], "WARNING");
    }

    #[test]
    fn test_resolve_never_contains_null() {
        let mut options = PrimitiveOptions::new();
        options.set_optimization_level(2).unwrap();
        options.set_dynamical_decoupling(DdSequence::Xy4).unwrap();
        options.set_seed_simulator(42).unwrap();

        fn no_nulls(value: &Value) -> bool {
            match value {
                Value::Null => false,
                Value::Object(map) => map.values().all(no_nulls),
                Value::Array(items) => items.iter().all(no_nulls),
                _ => true,
            }
        }
        assert!(no_nulls(&Value::Object(options.resolve())));
    }

    #[test]
    fn test_bulk_update() {
        let mut options = PrimitiveOptions::new();
        options
            .update_from_value(json!({
                "optimization_level": 2,
                "dynamical_decoupling": "XpXm",
                "execution": {"shots": 128},
                "twirling": {"enable_gates": true},
            }))
            .unwrap();

        assert_eq!(options.optimization_level(), Some(2));
        assert_eq!(options.dynamical_decoupling(), Some(DdSequence::XpXm));
        let resolved = options.resolve();
        assert_eq!(resolved["execution"]["shots"], 128);
        assert_eq!(resolved["twirling"]["enable_gates"], true);
        // Untouched group fields keep their defaults.
        assert_eq!(resolved["twirling"]["enable_measure"], true);
    }

    #[test]
    fn test_bulk_update_rejects_unknown_field() {
        let mut options = PrimitiveOptions::new();
        let err = options
            .update_from_value(json!({"optimisation_level": 2}))
            .unwrap_err();
        let OptionsError::InvalidOption { field, .. } = err;
        assert_eq!(field, "options");

        // Nested unknown fields are rejected too.
        assert!(options
            .update_from_value(json!({"execution": {"shotz": 1}}))
            .is_err());
    }

    #[test]
    fn test_bulk_update_is_atomic() {
        let mut options = PrimitiveOptions::new();
        let err = options.update_from_value(json!({
            "optimization_level": 2,
            "resilience_level": 9,
        }));
        assert!(err.is_err());
        // The valid part of the patch was not applied.
        assert_eq!(options.optimization_level(), None);
    }
}
