pub mod items;
pub mod registry;

pub use items::{ItemDraft, ItemError, ItemService, Page};
pub use registry::{CollectionDraft, FieldDraft, RegistryError, SchemaRegistry};
