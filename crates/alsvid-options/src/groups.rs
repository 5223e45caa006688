//! Nested option groups.
//!
//! Every field starts [`ConfigValue::Unset`]. Defaults are applied only at
//! [`resolve`](ExecutionOptions::resolve) time, so a group always knows
//! whether the caller touched a field. The resolve policy per group:
//! execution, transpilation, resilience, twirling and environment emit a
//! complete map with defaults filled in; simulator emits set fields only.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::value::ConfigValue;

/// Execution-time options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExecutionOptions {
    /// Number of shots per circuit. Default: 4096.
    #[serde(skip_serializing_if = "ConfigValue::is_unset")]
    pub shots: ConfigValue<u32>,
    /// Reset qubits to the ground state before each shot. Default: true.
    #[serde(skip_serializing_if = "ConfigValue::is_unset")]
    pub init_qubits: ConfigValue<bool>,
}

impl ExecutionOptions {
    /// Default shot count.
    pub const DEFAULT_SHOTS: u32 = 4096;

    /// Overlay `other` onto `self`; set fields of `other` win.
    pub fn merged(self, other: ExecutionOptions) -> ExecutionOptions {
        ExecutionOptions {
            shots: other.shots.or(self.shots),
            init_qubits: other.init_qubits.or(self.init_qubits),
        }
    }

    /// Resolve to a complete map with defaults filled.
    pub fn resolve(&self) -> Map<String, Value> {
        let mut out = Map::new();
        out.insert("shots".into(), json!(self.shots.set_or(Self::DEFAULT_SHOTS)));
        out.insert("init_qubits".into(), json!(self.init_qubits.set_or(true)));
        out
    }
}

/// Transpilation options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranspilationOptions {
    /// Skip server-side transpilation entirely. Default: false.
    #[serde(skip_serializing_if = "ConfigValue::is_unset")]
    pub skip_transpilation: ConfigValue<bool>,
    /// Layout selection method. Default: "stochastic".
    #[serde(skip_serializing_if = "ConfigValue::is_unset")]
    pub optimization_method: ConfigValue<String>,
}

impl TranspilationOptions {
    /// Overlay `other` onto `self`; set fields of `other` win.
    pub fn merged(self, other: TranspilationOptions) -> TranspilationOptions {
        TranspilationOptions {
            skip_transpilation: other.skip_transpilation.or(self.skip_transpilation),
            optimization_method: other.optimization_method.or(self.optimization_method),
        }
    }

    /// Resolve to a complete map with defaults filled.
    pub fn resolve(&self) -> Map<String, Value> {
        let mut out = Map::new();
        out.insert(
            "skip_transpilation".into(),
            json!(self.skip_transpilation.set_or(false)),
        );
        out.insert(
            "optimization_method".into(),
            json!(self.optimization_method.cloned_or("stochastic".into())),
        );
        out
    }
}

/// Fine-grained error-mitigation options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResilienceOptions {
    /// Mitigate readout errors. Default: true.
    #[serde(skip_serializing_if = "ConfigValue::is_unset")]
    pub measure_mitigation: ConfigValue<bool>,
    /// Zero-noise extrapolation. Default: false.
    #[serde(skip_serializing_if = "ConfigValue::is_unset")]
    pub zne_mitigation: ConfigValue<bool>,
    /// Probabilistic error cancellation. Default: false.
    #[serde(skip_serializing_if = "ConfigValue::is_unset")]
    pub pec_mitigation: ConfigValue<bool>,
}

impl ResilienceOptions {
    /// Overlay `other` onto `self`; set fields of `other` win.
    pub fn merged(self, other: ResilienceOptions) -> ResilienceOptions {
        ResilienceOptions {
            measure_mitigation: other.measure_mitigation.or(self.measure_mitigation),
            zne_mitigation: other.zne_mitigation.or(self.zne_mitigation),
            pec_mitigation: other.pec_mitigation.or(self.pec_mitigation),
        }
    }

    /// Resolve to a complete map with defaults filled.
    pub fn resolve(&self) -> Map<String, Value> {
        let mut out = Map::new();
        out.insert(
            "measure_mitigation".into(),
            json!(self.measure_mitigation.set_or(true)),
        );
        out.insert("zne_mitigation".into(), json!(self.zne_mitigation.set_or(false)));
        out.insert("pec_mitigation".into(), json!(self.pec_mitigation.set_or(false)));
        out
    }
}

/// Pauli-twirling strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TwirlingStrategy {
    /// Twirl active qubits per layer.
    #[serde(rename = "active")]
    Active,
    /// Twirl the accumulated set of active qubits.
    #[serde(rename = "active-accum")]
    ActiveAccum,
    /// Twirl all qubits in the circuit.
    #[serde(rename = "active-circuit")]
    ActiveCircuit,
    /// Twirl every qubit.
    #[serde(rename = "all")]
    All,
}

impl TwirlingStrategy {
    /// The wire-level strategy string.
    pub fn as_str(&self) -> &'static str {
        match self {
            TwirlingStrategy::Active => "active",
            TwirlingStrategy::ActiveAccum => "active-accum",
            TwirlingStrategy::ActiveCircuit => "active-circuit",
            TwirlingStrategy::All => "all",
        }
    }
}

/// Pauli-twirling options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TwirlingOptions {
    /// Twirl two-qubit gates. Default: false.
    #[serde(skip_serializing_if = "ConfigValue::is_unset")]
    pub enable_gates: ConfigValue<bool>,
    /// Twirl measurements. Default: true.
    #[serde(skip_serializing_if = "ConfigValue::is_unset")]
    pub enable_measure: ConfigValue<bool>,
    /// Strategy for selecting twirled qubits. Default: "active-accum".
    #[serde(skip_serializing_if = "ConfigValue::is_unset")]
    pub strategy: ConfigValue<TwirlingStrategy>,
}

impl TwirlingOptions {
    /// Overlay `other` onto `self`; set fields of `other` win.
    pub fn merged(self, other: TwirlingOptions) -> TwirlingOptions {
        TwirlingOptions {
            enable_gates: other.enable_gates.or(self.enable_gates),
            enable_measure: other.enable_measure.or(self.enable_measure),
            strategy: other.strategy.or(self.strategy),
        }
    }

    /// Resolve to a complete map with defaults filled.
    pub fn resolve(&self) -> Map<String, Value> {
        let mut out = Map::new();
        out.insert("enable_gates".into(), json!(self.enable_gates.set_or(false)));
        out.insert("enable_measure".into(), json!(self.enable_measure.set_or(true)));
        out.insert(
            "strategy".into(),
            json!(self.strategy.set_or(TwirlingStrategy::ActiveAccum).as_str()),
        );
        out
    }
}

/// Execution-environment options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvironmentOptions {
    /// Server-side log level. Default: "WARNING".
    #[serde(skip_serializing_if = "ConfigValue::is_unset")]
    pub log_level: ConfigValue<String>,
    /// Free-form tags attached to the job. Default: empty.
    #[serde(skip_serializing_if = "ConfigValue::is_unset")]
    pub job_tags: ConfigValue<Vec<String>>,
}

impl EnvironmentOptions {
    /// Overlay `other` onto `self`; set fields of `other` win.
    pub fn merged(self, other: EnvironmentOptions) -> EnvironmentOptions {
        EnvironmentOptions {
            log_level: other.log_level.or(self.log_level),
            job_tags: other.job_tags.or(self.job_tags),
        }
    }

    /// Resolve to a complete map with defaults filled.
    pub fn resolve(&self) -> Map<String, Value> {
        let mut out = Map::new();
        out.insert("log_level".into(), json!(self.log_level.cloned_or("WARNING".into())));
        out.insert(
            "job_tags".into(),
            json!(self.job_tags.cloned_or(Vec::new())),
        );
        out
    }
}

/// Simulator-target options.
///
/// Unlike the other groups these have no server defaults; only explicitly
/// set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulatorOptions {
    /// Coupling map as directed qubit pairs.
    #[serde(skip_serializing_if = "ConfigValue::is_unset")]
    pub coupling_map: ConfigValue<Vec<(u32, u32)>>,
    /// Seed for the simulator's RNG.
    #[serde(skip_serializing_if = "ConfigValue::is_unset")]
    pub seed_simulator: ConfigValue<u64>,
}

impl SimulatorOptions {
    /// Overlay `other` onto `self`; set fields of `other` win.
    pub fn merged(self, other: SimulatorOptions) -> SimulatorOptions {
        SimulatorOptions {
            coupling_map: other.coupling_map.or(self.coupling_map),
            seed_simulator: other.seed_simulator.or(self.seed_simulator),
        }
    }

    /// Resolve to a map of set fields only.
    pub fn resolve(&self) -> Map<String, Value> {
        let mut out = Map::new();
        if let ConfigValue::Set(map) = &self.coupling_map {
            out.insert("coupling_map".into(), json!(map));
        }
        if let ConfigValue::Set(seed) = &self.seed_simulator {
            out.insert("seed_simulator".into(), json!(seed));
        }
        out
    }
}
