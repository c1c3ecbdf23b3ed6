use lineage_types::ObjectId;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A caller required an object that is not in the store.
    #[error("object not found: {0}")]
    NotFound(ObjectId),

    /// The bytes on disk hash to a different id than they are filed under.
    #[error("hash mismatch for {id}: content hashes to {computed}")]
    HashMismatch { id: ObjectId, computed: ObjectId },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The object has the wrong kind or its payload does not decode.
    #[error("corrupt object {id}: {reason}")]
    CorruptObject { id: ObjectId, reason: String },

    #[error("refusing to store an object with the null id")]
    NullObjectId,
}

pub type StoreResult<T> = Result<T, StoreError>;
