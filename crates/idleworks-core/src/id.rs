use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Identifies a factory owned by the engine.
    pub struct FactoryId;
}

/// Identifies a material in the registry. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MaterialId(pub u32);

impl MaterialId {
    /// Dense index into per-material tables.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_id_equality() {
        assert_eq!(MaterialId(0), MaterialId(0));
        assert_ne!(MaterialId(0), MaterialId(1));
    }

    #[test]
    fn material_id_index() {
        assert_eq!(MaterialId(4).index(), 4);
    }

    #[test]
    fn factory_ids_are_distinct() {
        use slotmap::SlotMap;
        let mut sm = SlotMap::<FactoryId, ()>::with_key();
        let a = sm.insert(());
        let b = sm.insert(());
        assert_ne!(a, b);
    }
}
