use crate::fixed::Fixed64;
use crate::id::MaterialId;
use std::collections::HashMap;

/// A material definition in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialDef {
    pub name: String,
    /// Units produced per minute by a level 1 factory.
    pub base_rate: Fixed64,
    /// Cumulative amount that must be collected to win. `None` means the
    /// material can be produced but does not count toward the goal.
    pub required: Option<Fixed64>,
}

/// Builder for constructing an immutable [`MaterialRegistry`].
#[derive(Debug, Default)]
pub struct MaterialRegistryBuilder {
    materials: Vec<MaterialDef>,
}

impl MaterialRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a material. Returns its ID. Validation happens in [`build`].
    ///
    /// [`build`]: MaterialRegistryBuilder::build
    pub fn register(
        &mut self,
        name: &str,
        base_rate: Fixed64,
        required: Option<Fixed64>,
    ) -> MaterialId {
        let id = MaterialId(self.materials.len() as u32);
        self.materials.push(MaterialDef {
            name: name.to_string(),
            base_rate,
            required,
        });
        id
    }

    /// Number of materials registered so far.
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Finalize and build the immutable registry.
    pub fn build(self) -> Result<MaterialRegistry, RegistryError> {
        if self.materials.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut name_to_id = HashMap::with_capacity(self.materials.len());
        for (index, def) in self.materials.iter().enumerate() {
            if def.base_rate <= Fixed64::ZERO {
                return Err(RegistryError::NonPositiveRate(def.name.clone()));
            }
            if def.required.is_some_and(|r| r < Fixed64::ZERO) {
                return Err(RegistryError::NegativeTarget(def.name.clone()));
            }
            if name_to_id
                .insert(def.name.clone(), MaterialId(index as u32))
                .is_some()
            {
                return Err(RegistryError::DuplicateName(def.name.clone()));
            }
        }

        Ok(MaterialRegistry {
            materials: self.materials,
            name_to_id,
        })
    }
}

/// Immutable material table. Frozen after build().
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialRegistry {
    materials: Vec<MaterialDef>,
    name_to_id: HashMap<String, MaterialId>,
}

impl MaterialRegistry {
    pub fn get(&self, id: MaterialId) -> Option<&MaterialDef> {
        self.materials.get(id.index())
    }

    /// Display name of a material, or `"?"` for an unknown ID.
    pub fn name(&self, id: MaterialId) -> &str {
        self.get(id).map(|m| m.name.as_str()).unwrap_or("?")
    }

    pub fn id_of(&self, name: &str) -> Option<MaterialId> {
        self.name_to_id.get(name).copied()
    }

    pub fn contains(&self, id: MaterialId) -> bool {
        id.index() < self.materials.len()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// All materials in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, &MaterialDef)> {
        self.materials
            .iter()
            .enumerate()
            .map(|(i, def)| (MaterialId(i as u32), def))
    }

    /// Materials that carry a collection target, with that target.
    pub fn targets(&self) -> impl Iterator<Item = (MaterialId, Fixed64)> + '_ {
        self.iter()
            .filter_map(|(id, def)| def.required.map(|r| (id, r)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("registry has no materials")]
    Empty,
    #[error("duplicate material name: {0}")]
    DuplicateName(String),
    #[error("material '{0}' must have a positive base rate")]
    NonPositiveRate(String),
    #[error("material '{0}' has a negative collection target")]
    NegativeTarget(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::f64_to_fixed64;

    fn rate(v: f64) -> Fixed64 {
        f64_to_fixed64(v)
    }

    #[test]
    fn register_assigns_dense_ids() {
        let mut b = MaterialRegistryBuilder::new();
        let wheat = b.register("wheat", rate(14.017), Some(rate(75700.0)));
        let fruit = b.register("fruit", rate(42.733), Some(rate(219000.0)));
        assert_eq!(wheat, MaterialId(0));
        assert_eq!(fruit, MaterialId(1));
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn build_and_lookup() {
        let mut b = MaterialRegistryBuilder::new();
        let wheat = b.register("wheat", rate(14.017), Some(rate(75700.0)));
        let reg = b.build().unwrap();

        assert_eq!(reg.id_of("wheat"), Some(wheat));
        assert_eq!(reg.id_of("iron"), None);
        assert_eq!(reg.name(wheat), "wheat");
        assert_eq!(reg.name(MaterialId(9)), "?");
        assert_eq!(reg.get(wheat).unwrap().base_rate, rate(14.017));
        assert!(reg.contains(wheat));
        assert!(!reg.contains(MaterialId(1)));
    }

    #[test]
    fn targets_skip_untargeted_materials() {
        let mut b = MaterialRegistryBuilder::new();
        b.register("wheat", rate(1.0), Some(rate(10.0)));
        let water = b.register("water", rate(1.0), None);
        let reg = b.build().unwrap();

        let targets: Vec<_> = reg.targets().collect();
        assert_eq!(targets.len(), 1);
        assert!(targets.iter().all(|(id, _)| *id != water));
    }

    #[test]
    fn empty_registry_rejected() {
        let err = MaterialRegistryBuilder::new().build().unwrap_err();
        assert_eq!(err, RegistryError::Empty);
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut b = MaterialRegistryBuilder::new();
        b.register("iron", rate(1.0), None);
        b.register("iron", rate(2.0), None);
        assert_eq!(
            b.build().unwrap_err(),
            RegistryError::DuplicateName("iron".to_string())
        );
    }

    #[test]
    fn zero_rate_rejected() {
        let mut b = MaterialRegistryBuilder::new();
        b.register("silver", Fixed64::ZERO, None);
        assert!(matches!(
            b.build(),
            Err(RegistryError::NonPositiveRate(name)) if name == "silver"
        ));
    }

    #[test]
    fn negative_target_rejected() {
        let mut b = MaterialRegistryBuilder::new();
        b.register("water", rate(1.0), Some(rate(-5.0)));
        assert!(matches!(b.build(), Err(RegistryError::NegativeTarget(_))));
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            RegistryError::DuplicateName("iron".into()).to_string(),
            "duplicate material name: iron"
        );
        assert_eq!(RegistryError::Empty.to_string(), "registry has no materials");
    }
}
