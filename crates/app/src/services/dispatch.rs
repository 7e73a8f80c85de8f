//! Reactor dispatch: fan a transition out to every registered reactor.

use hometick_domain::activity::{ActivityLabel, Transition};
use hometick_domain::error::ErrorChain;
use hometick_domain::reactor::DynReactor;

use crate::executor::{ActionExecutor, execute_all};

/// Outcome of one dispatch, for logging and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub invoked: usize,
    pub failed: Vec<String>,
}

impl DispatchReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Ordered list of reactors.
#[derive(Default)]
pub struct ReactorRegistry {
    reactors: Vec<DynReactor>,
}

impl ReactorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a reactor; it runs after every reactor registered before it.
    pub fn register(&mut self, reactor: DynReactor) {
        tracing::debug!(reactor = reactor.name(), "reactor registered");
        self.reactors.push(reactor);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.reactors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reactors.is_empty()
    }

    /// Invoke every reactor, in registration order, with the same transition.
    ///
    /// A failing reactor is logged and recorded in the report; later
    /// reactors still run.
    #[tracing::instrument(skip_all, fields(%transition))]
    pub async fn dispatch<E: ActionExecutor>(
        &self,
        transition: &Transition,
        executor: &E,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();
        for reactor in &self.reactors {
            run_reactor(reactor, transition, executor, &mut report).await;
        }
        if !report.is_clean() {
            tracing::warn!(failed = ?report.failed, "some reactors failed");
        }
        report
    }

    /// Re-apply reactors that opted into resync against the current label.
    pub async fn resync<E: ActionExecutor>(
        &self,
        label: &ActivityLabel,
        executor: &E,
    ) -> DispatchReport {
        let transition = Transition::steady(label.clone());
        let mut report = DispatchReport::default();
        for reactor in self.reactors.iter().filter(|reactor| reactor.resync()) {
            run_reactor(reactor, &transition, executor, &mut report).await;
        }
        report
    }
}

async fn run_reactor<E: ActionExecutor>(
    reactor: &DynReactor,
    transition: &Transition,
    executor: &E,
    report: &mut DispatchReport,
) {
    let actions = reactor.on_transition(transition);
    report.invoked += 1;
    if actions.is_empty() {
        return;
    }
    tracing::debug!(reactor = reactor.name(), actions = actions.len(), "running reactor");
    if let Err(err) = execute_all(executor, &actions).await {
        tracing::warn!(
            reactor = reactor.name(),
            error = %ErrorChain(&err),
            "reactor failed"
        );
        report.failed.push(reactor.name().to_string());
    }
}
