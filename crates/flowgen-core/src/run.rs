use crate::scheduler::FlowScheduler;
use crate::spec::{RunSpec, SpecError};

/// The core routine. This validates a specification and returns the scheduler that generates its
/// flows in start time order.
///
/// This function returns an error if the specification is invalid. No flow is generated before
/// the whole specification has been checked.
pub fn generate(spec: RunSpec) -> Result<FlowScheduler, Error> {
    let spec = spec.validate()?;
    Ok(FlowScheduler::new(spec))
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    InvalidSpec(#[from] SpecError),
}
