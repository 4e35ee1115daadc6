use serde::{Deserialize, Serialize};

/// One inventory item definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: String,
    pub name: String,
    /// Icon sprite id shown in the inventory grid.
    pub icon: String,
    #[serde(default)]
    pub stackable: bool,
    /// Largest stack a single slot holds. Ignored unless `stackable`.
    #[serde(default = "default_max_stack")]
    pub max_stack: u32,
}

impl ItemDef {
    /// How many of this item one inventory slot can hold.
    pub fn slot_capacity(&self) -> u32 {
        if self.stackable { self.max_stack } else { 1 }
    }
}

fn default_max_stack() -> u32 {
    1
}

/// The full item catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemsManifest {
    /// Category tag, always `items`.
    pub category: String,
    pub items: Vec<ItemDef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unstackable_items_cap_at_one() {
        let item = ItemDef {
            id: "rusted-key".to_owned(),
            name: "Rusted Key".to_owned(),
            icon: "icon-key".to_owned(),
            stackable: false,
            max_stack: 99,
        };
        assert_eq!(item.slot_capacity(), 1);
    }
}
