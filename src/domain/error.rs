use crate::domain::catalog::FortuneType;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FortuneError {
    #[error("Unknown {kind} member: {id}")]
    UnknownMember { kind: FortuneType, id: String },
}
