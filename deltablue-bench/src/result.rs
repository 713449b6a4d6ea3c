use deltablue_core::PlannerError;
use thiserror::Error;

pub(crate) type BenchResult<T> = Result<T, BenchError>;

#[derive(Error, Debug)]
pub(crate) enum BenchError {
    #[error("IO error, more details: {0}")]
    IOError(#[from] std::io::Error),
    #[error("The planner rejected a change to the constraint graph: {0}")]
    Planner(#[from] PlannerError),
    #[error("The {benchmark} benchmark computed a wrong value: {details}")]
    CheckFailed {
        benchmark: &'static str,
        details: String,
    },
}

impl BenchError {
    pub(crate) fn check_failed(benchmark: &'static str, details: impl Into<String>) -> Self {
        Self::CheckFailed {
            benchmark,
            details: details.into(),
        }
    }
}
