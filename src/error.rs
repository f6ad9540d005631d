use chrono::NaiveDate;

/// Error taxonomy for the panel pipeline.
///
/// Each variant maps to a distinct caller policy:
///
/// - `InvalidQuery`, `MissingCredential`, `Io`: usage/configuration problems,
///   rejected before any network traffic where possible
/// - `Authentication`: fatal, retrying without a valid key cannot succeed
/// - `Transport`: transient, safe to retry with backoff
/// - `MalformedResponse`: the remote source returned a shape we cannot
///   interpret; not retried
/// - `DuplicateKey`: a normalization invariant was violated; surfaced rather
///   than silently resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The query is unusable as stated (empty series id, start after end).
    InvalidQuery { series: String, reason: String },
    /// No API key could be resolved from the environment.
    MissingCredential,
    /// A local file or resource could not be used.
    Io { context: String },
    /// The remote source rejected the supplied credential.
    Authentication { series: String, detail: String },
    /// The network call could not complete.
    Transport { series: String, detail: String },
    /// The response body lacked the expected observation shape.
    MalformedResponse { series: String, detail: String },
    /// Two observations shared the same date within one column.
    DuplicateKey { column: String, date: NaiveDate },
}

impl PipelineError {
    /// Process exit code for the binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            PipelineError::InvalidQuery { .. }
            | PipelineError::MissingCredential
            | PipelineError::Io { .. } => 2,
            PipelineError::Authentication { .. } => 3,
            PipelineError::Transport { .. } => 4,
            PipelineError::MalformedResponse { .. } => 5,
            PipelineError::DuplicateKey { .. } => 6,
        }
    }

    /// Whether a retry with backoff can plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, PipelineError::Transport { .. })
    }
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::InvalidQuery { series, reason } => {
                write!(f, "Invalid query for series {series}: {reason}")
            }
            PipelineError::MissingCredential => {
                write!(f, "Missing FRED_API_KEY in environment (.env).")
            }
            PipelineError::Io { context } => write!(f, "{context}"),
            PipelineError::Authentication { series, detail } => {
                write!(f, "FRED rejected the API key while fetching {series}: {detail}")
            }
            PipelineError::Transport { series, detail } => {
                write!(f, "FRED request for series {series} failed: {detail}")
            }
            PipelineError::MalformedResponse { series, detail } => {
                write!(f, "Unexpected FRED response shape for series {series}: {detail}")
            }
            PipelineError::DuplicateKey { column, date } => {
                write!(f, "Duplicate observation date {date} in column '{column}'.")
            }
        }
    }
}

impl std::error::Error for PipelineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transport_errors_are_transient() {
        let transport = PipelineError::Transport {
            series: "PAYEMS".into(),
            detail: "timed out".into(),
        };
        let auth = PipelineError::Authentication {
            series: "PAYEMS".into(),
            detail: "status 403".into(),
        };
        assert!(transport.is_transient());
        assert!(!auth.is_transient());
        assert!(!PipelineError::MissingCredential.is_transient());
    }

    #[test]
    fn exit_codes_distinguish_error_families() {
        let q = PipelineError::InvalidQuery {
            series: "X".into(),
            reason: "empty".into(),
        };
        let t = PipelineError::Transport {
            series: "X".into(),
            detail: "refused".into(),
        };
        assert_eq!(q.exit_code(), 2);
        assert_eq!(PipelineError::MissingCredential.exit_code(), 2);
        assert_eq!(t.exit_code(), 4);
        assert_ne!(
            PipelineError::Authentication {
                series: "X".into(),
                detail: String::new()
            }
            .exit_code(),
            t.exit_code()
        );
    }
}
