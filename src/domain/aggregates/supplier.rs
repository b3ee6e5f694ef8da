//! Supplier record

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub supplier_id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub contact_person: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

impl Supplier {
    /// Case-insensitive substring match on the name.
    pub fn name_contains(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

fn supplier(supplier_id: u64, name: &str, description: &str, contact_person: &str, email: &str, phone: &str) -> Supplier {
    Supplier {
        supplier_id,
        name: name.into(),
        description: description.into(),
        contact_person: contact_person.into(),
        email: email.into(),
        phone: phone.into(),
    }
}

/// Suppliers present at every process start.
pub fn seed_suppliers() -> Vec<Supplier> {
    vec![
        supplier(1, "Catnip Logistics", "Feline-grade packaging and fulfilment", "Mona Lisa", "mona@catniplogistics.example", "555-0101"),
        supplier(2, "Octo Hardware Co", "Sensors, boards and smart collars", "Hubot Jones", "hubot@octohardware.example", "555-0102"),
        supplier(3, "Tentacle Textiles", "Plush toys and apparel", "Ada Ink", "ada@tentacletextiles.example", "555-0103"),
        supplier(4, "Blue Fin Foods", "Treats and feeders", "Linus Mer", "linus@bluefinfoods.example", "555-0104"),
    ]
}
