pub mod serialization;
pub mod store;
pub mod traits;

pub use serialization::JsonSerializer;
pub use store::json_file_store::FORMAT_VERSION;
pub use store::JsonFileStore;
pub use traits::{PersistenceMetadata, PersistenceStore, Serializer, StoreSnapshot};
