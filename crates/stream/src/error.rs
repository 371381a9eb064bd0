use scenestream_common::ObjectId;

/// Errors from the streaming controller.
///
/// Every variant is an invariant violation or a failed lookup the caller
/// asserted would succeed. Soft conditions (no destination scene for an
/// object, a binding that has not registered yet) are not errors.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("scene '{0}' not found in registry")]
    SceneNotFound(String),
    #[error("scene {0} has no live binding")]
    BindingNotFound(usize),
    #[error("object {0} not found in world")]
    ObjectNotFound(ObjectId),
    #[error("object {0} is not transferable")]
    NotTransferable(ObjectId),
    #[error("scene {0} is already active")]
    AlreadyActive(usize),
    #[error("scene {0} already has a live binding")]
    AlreadyLoaded(usize),
    #[error("object {object} is already owned by {owner}")]
    DuplicateTransfer { object: ObjectId, owner: crate::Owner },
    #[error("invalid stream config: {0}")]
    InvalidConfig(String),
}
