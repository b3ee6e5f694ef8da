//! In-memory supplier collection.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::aggregates::{seed_suppliers, Supplier};

/// Supplier list shared by the request handlers. Nothing is persisted; a
/// new repository starts from its seed.
#[derive(Clone, Debug, Default)]
pub struct SupplierRepository {
    suppliers: Arc<RwLock<Vec<Supplier>>>,
}

impl SupplierRepository {
    pub fn new(seed: Vec<Supplier>) -> Self {
        Self { suppliers: Arc::new(RwLock::new(seed)) }
    }

    pub fn seeded() -> Self { Self::new(seed_suppliers()) }

    pub async fn list(&self) -> Vec<Supplier> { self.suppliers.read().await.clone() }

    pub async fn get(&self, supplier_id: u64) -> Option<Supplier> {
        self.suppliers.read().await.iter().find(|s| s.supplier_id == supplier_id).cloned()
    }

    pub async fn find_by_name(&self, query: &str) -> Vec<Supplier> {
        self.suppliers.read().await.iter().filter(|s| s.name_contains(query)).cloned().collect()
    }

    /// Appends the supplier as given.
    pub async fn create(&self, supplier: Supplier) -> Supplier {
        self.suppliers.write().await.push(supplier.clone());
        supplier
    }

    /// Replaces the first supplier with `supplier_id` by `supplier`.
    pub async fn update(&self, supplier_id: u64, supplier: Supplier) -> Option<Supplier> {
        let mut suppliers = self.suppliers.write().await;
        let slot = suppliers.iter_mut().find(|s| s.supplier_id == supplier_id)?;
        *slot = supplier.clone();
        Some(supplier)
    }

    pub async fn delete(&self, supplier_id: u64) -> bool {
        let mut suppliers = self.suppliers.write().await;
        match suppliers.iter().position(|s| s.supplier_id == supplier_id) {
            Some(index) => {
                suppliers.remove(index);
                true
            }
            None => false,
        }
    }
}
