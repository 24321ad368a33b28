#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    InvalidContainer(String),
    DuplicateEntityId(String),
    Destroyed,
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::InvalidContainer(msg) => write!(f, "invalid viewer container: {msg}"),
            SceneError::DuplicateEntityId(id) => write!(f, "an entity with id {id} already exists"),
            SceneError::Destroyed => write!(f, "viewer has been destroyed"),
        }
    }
}

impl std::error::Error for SceneError {}
