//! Driving an engine over input.

use std::time::Duration;

use rbison_core::{EngineArtifact, Value};

use super::adapter::{EngineAdapter, EngineExit};
use super::dispatch::Dispatcher;
use super::error::ParseError;
use super::input::Input;
use super::native::NativeEngine;
use super::session::Session;

/// Options for a run.
#[derive(Clone, Copy, Debug, Default)]
pub struct RunConfig {
    /// Ask the engine for its parse trace.
    pub(crate) debug: bool,
    /// Report syntax errors and keep going instead of stopping.
    pub(crate) interactive: bool,
    /// Wall-clock limit for one run.
    pub(crate) timeout: Option<Duration>,
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn debug(mut self, value: bool) -> Self {
        self.debug = value;
        self
    }

    pub fn interactive(mut self, value: bool) -> Self {
        self.interactive = value;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn get_debug(&self) -> bool {
        self.debug
    }
    pub fn get_interactive(&self) -> bool {
        self.interactive
    }
    pub fn get_timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Where a parser is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    /// The last run was accepted without errors.
    Done,
    /// The last run recorded an error or was not accepted.
    Error,
}

/// Result of one run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunOutcome {
    /// Value of the last reduction.
    pub value: Value,
    /// Most recent recoverable error.
    pub error: Option<ParseError>,
    pub state: RunState,
    pub exit: EngineExit,
    pub reductions: usize,
    /// Whether the run consumed all of its input.
    pub input_exhausted: bool,
}

/// Runs an engine, dispatching its reductions.
pub struct Parser<E> {
    engine: E,
    dispatcher: Dispatcher,
    config: RunConfig,
    state: RunState,
    last_error: Option<ParseError>,
    /// Input a stopped run read but never handed to the engine
    unread: Vec<u8>,
}

impl Parser<NativeEngine> {
    /// Parser for a built engine.
    pub fn load(artifact: &EngineArtifact, dispatcher: Dispatcher) -> Result<Self, ParseError> {
        Ok(Self::new(NativeEngine::load(artifact)?, dispatcher))
    }
}

impl<E: EngineAdapter> Parser<E> {
    pub fn new(engine: E, dispatcher: Dispatcher) -> Self {
        Self {
            engine,
            dispatcher,
            config: RunConfig::default(),
            state: RunState::Idle,
            last_error: None,
            unread: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: RunConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Error recorded by the most recent run, fatal or not.
    pub fn last_error(&self) -> Option<&ParseError> {
        self.last_error.as_ref()
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher {
        &mut self.dispatcher
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Run the engine once over `input`.
    ///
    /// Handler failures, and syntax errors in interactive mode, come back
    /// in [`RunOutcome::error`]. Timeouts, input failures, engine failures
    /// and non-interactive syntax errors end the run with `Err`.
    pub fn run(&mut self, input: &mut dyn Input) -> Result<RunOutcome, ParseError> {
        self.state = RunState::Running;
        self.last_error = None;

        let unread = std::mem::take(&mut self.unread);
        let mut session = Session::new(
            input,
            &mut self.dispatcher,
            self.config.interactive,
            self.config.timeout,
        )
        .resume(unread);
        let exit = self.engine.run(&mut session, self.config.debug);
        let mut report = session.finish();
        self.unread = std::mem::take(&mut report.unread);

        let exit = match exit {
            Ok(exit) => exit,
            Err(e) => return Err(self.fail(e.into())),
        };
        if let Some(fatal) = report.fatal {
            return Err(self.fail(fatal));
        }

        self.state = if exit == EngineExit::Accepted && report.error.is_none() {
            RunState::Done
        } else {
            RunState::Error
        };
        self.last_error = report.error.clone();
        log::debug!(
            "run finished: {exit:?}, {} reductions, {} bytes",
            report.reductions,
            report.bytes_read
        );
        Ok(RunOutcome {
            value: report.value,
            error: report.error,
            state: self.state,
            exit,
            reductions: report.reductions,
            input_exhausted: report.input_exhausted || report.bytes_read == 0,
        })
    }

    /// Run repeatedly until the input is used up, one outcome per run.
    ///
    /// An engine may stop before its input ends (a lexer rule that
    /// terminates, say). The next run starts with whatever the session read
    /// but never handed over, then continues with `input`. Text the engine
    /// had already taken and buffered is gone; with the line-at-a-time
    /// sources in this crate that is at most the rest of the stopping line.
    pub fn run_to_end(&mut self, input: &mut dyn Input) -> Result<Vec<RunOutcome>, ParseError> {
        let mut outcomes = Vec::new();
        loop {
            let outcome = self.run(input)?;
            let done = outcome.input_exhausted;
            outcomes.push(outcome);
            if done {
                return Ok(outcomes);
            }
        }
    }

    fn fail(&mut self, error: ParseError) -> ParseError {
        log::debug!("run failed: {error}");
        self.state = RunState::Error;
        self.last_error = Some(error.clone());
        error
    }
}
