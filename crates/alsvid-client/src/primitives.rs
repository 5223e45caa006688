//! Primitive front ends.
//!
//! [`Estimator`] and [`Sampler`] translate a domain request into session
//! inputs plus resolved options under a fixed program id, and hand back a
//! live session — the caller drives `write`/`read` explicitly, or uses the
//! one-shot `execute` that does both and decodes the payload.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value, json};

use alsvid_api::RuntimeClient;
use alsvid_options::PrimitiveOptions;

use crate::error::ClientResult;
use crate::result::{EstimatorResult, SamplerResult};
use crate::session::{Session, SessionInfo};

/// Server-side program id of the estimator primitive.
pub const ESTIMATOR_PROGRAM_ID: &str = "estimator-zE8wQ3tP1c";

/// Server-side program id of the sampler primitive.
pub const SAMPLER_PROGRAM_ID: &str = "sampler-rV5kD7mX2a";

fn write_overrides(parameters: Option<Value>, run_options: Map<String, Value>) -> Map<String, Value> {
    let mut overrides = Map::new();
    if let Some(parameters) = parameters {
        overrides.insert("parameters".into(), parameters);
    }
    overrides.insert("run_options".into(), Value::Object(run_options));
    overrides
}

/// Expectation-value estimation front end.
pub struct Estimator {
    client: Arc<dyn RuntimeClient>,
    backend_name: Option<String>,
    options: PrimitiveOptions,
    poll_interval: Duration,
}

impl Estimator {
    /// Create an estimator front end.
    pub fn new(client: Arc<dyn RuntimeClient>) -> Self {
        Self {
            client,
            backend_name: None,
            options: PrimitiveOptions::new(),
            poll_interval: Duration::from_secs(5),
        }
    }

    /// Pin a backend.
    pub fn with_backend(mut self, backend_name: impl Into<String>) -> Self {
        self.backend_name = Some(backend_name.into());
        self
    }

    /// Use the given options tree for submissions.
    pub fn with_options(mut self, options: PrimitiveOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the poll cadence of the returned sessions.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Open an estimation session for the given circuits and observables.
    pub fn run(
        &self,
        circuits: Vec<Value>,
        observables: Vec<Value>,
        grouping: Option<Value>,
        transpile_options: Option<Value>,
    ) -> EstimatorSession {
        let mut inputs = Map::new();
        inputs.insert("circuits".into(), json!(circuits));
        inputs.insert("observables".into(), json!(observables));
        if let Some(grouping) = grouping {
            inputs.insert("grouping".into(), grouping);
        }
        if let Some(transpile_options) = transpile_options {
            inputs.insert("transpile_options".into(), transpile_options);
        }

        let mut session = Session::new(
            Arc::clone(&self.client),
            ESTIMATOR_PROGRAM_ID,
            inputs,
            self.options.resolve(),
        )
        .with_poll_interval(self.poll_interval);
        if let Some(backend_name) = &self.backend_name {
            session = session.with_backend(backend_name.clone());
        }
        EstimatorSession { session }
    }
}

/// A session returning [`EstimatorResult`]s.
pub struct EstimatorSession {
    session: Session,
}

impl EstimatorSession {
    /// Submit an execution with the given parameter bindings.
    pub async fn write(
        &mut self,
        parameters: Option<Value>,
        run_options: Map<String, Value>,
    ) -> ClientResult<()> {
        self.session.write(write_overrides(parameters, run_options)).await
    }

    /// Block for the pending execution and decode its result.
    pub async fn read(&mut self) -> ClientResult<EstimatorResult> {
        EstimatorResult::from_raw(self.session.read().await?)
    }

    /// One-shot convenience: write, read, decode.
    pub async fn execute(&mut self, parameters: Option<Value>) -> ClientResult<EstimatorResult> {
        self.write(parameters, Map::new()).await?;
        self.read().await
    }

    /// Snapshot of the underlying session.
    pub async fn info(&self) -> ClientResult<SessionInfo> {
        self.session.info().await
    }

    /// Close the underlying session.
    pub fn close(&mut self) {
        self.session.close();
    }

    /// The underlying session.
    pub fn session(&self) -> &Session {
        &self.session
    }
}

/// Sampling front end.
pub struct Sampler {
    client: Arc<dyn RuntimeClient>,
    backend_name: Option<String>,
    options: PrimitiveOptions,
    poll_interval: Duration,
}

impl Sampler {
    /// Create a sampler front end.
    pub fn new(client: Arc<dyn RuntimeClient>) -> Self {
        Self {
            client,
            backend_name: None,
            options: PrimitiveOptions::new(),
            poll_interval: Duration::from_secs(5),
        }
    }

    /// Pin a backend.
    pub fn with_backend(mut self, backend_name: impl Into<String>) -> Self {
        self.backend_name = Some(backend_name.into());
        self
    }

    /// Use the given options tree for submissions.
    pub fn with_options(mut self, options: PrimitiveOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the poll cadence of the returned sessions.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Open a sampling session for the given circuits.
    pub fn run(
        &self,
        circuits: Vec<Value>,
        transpile_options: Option<Value>,
        skip_transpilation: bool,
    ) -> SamplerSession {
        let mut inputs = Map::new();
        inputs.insert("circuits".into(), json!(circuits));
        if let Some(transpile_options) = transpile_options {
            inputs.insert("transpile_options".into(), transpile_options);
        }
        inputs.insert("skip_transpilation".into(), json!(skip_transpilation));

        let mut session = Session::new(
            Arc::clone(&self.client),
            SAMPLER_PROGRAM_ID,
            inputs,
            self.options.resolve(),
        )
        .with_poll_interval(self.poll_interval);
        if let Some(backend_name) = &self.backend_name {
            session = session.with_backend(backend_name.clone());
        }
        SamplerSession { session }
    }
}

/// A session returning [`SamplerResult`]s.
pub struct SamplerSession {
    session: Session,
}

impl SamplerSession {
    /// Submit an execution with the given parameter bindings.
    pub async fn write(
        &mut self,
        parameters: Option<Value>,
        run_options: Map<String, Value>,
    ) -> ClientResult<()> {
        self.session.write(write_overrides(parameters, run_options)).await
    }

    /// Block for the pending execution and decode its result.
    pub async fn read(&mut self) -> ClientResult<SamplerResult> {
        SamplerResult::from_raw(self.session.read().await?)
    }

    /// One-shot convenience: write, read, decode.
    pub async fn execute(&mut self, parameters: Option<Value>) -> ClientResult<SamplerResult> {
        self.write(parameters, Map::new()).await?;
        self.read().await
    }

    /// Snapshot of the underlying session.
    pub async fn info(&self) -> ClientResult<SessionInfo> {
        self.session.info().await
    }

    /// Close the underlying session.
    pub fn close(&mut self) {
        self.session.close();
    }

    /// The underlying session.
    pub fn session(&self) -> &Session {
        &self.session
    }
}
