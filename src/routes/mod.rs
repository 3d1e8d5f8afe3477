pub mod members;

pub use members::member_routes;
