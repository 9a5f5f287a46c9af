use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryBuildError {
    #[error("Base query template is empty")]
    EmptyQuery,

    #[error("Sequence field name is empty")]
    EmptySequenceField,
}
