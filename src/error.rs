use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Team,
    QualificationRecord,
    ConfederationFormat,
    Match,
    Player,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::Team => "team",
            EntityKind::QualificationRecord => "qualification record",
            EntityKind::ConfederationFormat => "confederation format",
            EntityKind::Match => "match",
            EntityKind::Player => "player",
        };
        f.write_str(label)
    }
}

/// Errors surfaced by registry lookups and validation.
///
/// Missing denominators never produce an error; calculators return 0 instead so
/// aggregate reports stay complete.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalyticsError {
    #[error("{kind} {code} not found")]
    NotFound { kind: EntityKind, code: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl AnalyticsError {
    pub fn not_found(kind: EntityKind, code: impl Into<String>) -> Self {
        AnalyticsError::NotFound {
            kind,
            code: code.into(),
        }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        AnalyticsError::InvalidInput(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AnalyticsError::NotFound { .. })
    }
}

pub type AnalyticsResult<T> = std::result::Result<T, AnalyticsError>;
