use crate::SettingsKind;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Couldn't find exercise '{0}'")]
    ExerciseNotFound(String),
    #[error("Couldn't find workout '{0}'")]
    WorkoutNotFound(String),
    #[error("Exercise '{exercise}' uses {found} settings instead of {expected} settings")]
    WrongSettings {
        exercise: String,
        expected: SettingsKind,
        found: SettingsKind,
    },
    #[error("Exercise '{0}' has no weight")]
    NoWeight(String),
}

#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    #[error("no saved program named '{0}'")]
    NotFound(String),
    #[error("corrupt data: {0}")]
    Decode(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(thiserror::Error, Debug)]
pub enum WriteError {
    #[error("failed to encode: {0}")]
    Encode(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<WriteError> for ReadError {
    fn from(value: WriteError) -> Self {
        match value {
            WriteError::Encode(message) => ReadError::Decode(message),
            WriteError::Storage(storage) => ReadError::Storage(storage),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("storage unavailable")]
    Unavailable,
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}
