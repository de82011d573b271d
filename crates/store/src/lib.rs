//! Record persistence: a key-value blob port, the ordered record list
//! written through to it, and the edit-form binding.

pub mod binding;
pub mod blob;
pub mod error;
pub mod records;

pub use binding::{FormBinding, FormState, SubmitOutcome};
pub use blob::{BlobStore, FileBlobStore, MemoryBlobStore};
pub use error::{RecordStoreError, StoreError};
pub use records::RecordStore;
