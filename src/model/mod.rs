pub mod api_key;
pub mod collection;
pub mod item;
pub mod user;

pub use api_key::{ApiKey, CreatedApiKey};
pub use collection::{Collection, Field, FieldInput, FieldType, InvalidFieldType};
pub use item::{InvalidStatus, Item, ItemProjection, ItemStatus};
pub use user::User;
