use sketchform_core::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    #[error("Snapshot encoding failed: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Snapshot decoding failed: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Snapshot has size {actual:?}, expected {expected:?}")]
    SizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("Snapshot restore task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Core(#[from] CoreError),
}
