//! Supplier resource: in-memory repository and its REST routes.
pub mod repository;
pub mod routes;

pub use repository::SupplierRepository;
pub use routes::router;
