pub mod hashmap_member_store;
pub mod postgres_member_store;

pub use hashmap_member_store::*;
pub use postgres_member_store::*;
