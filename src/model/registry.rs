//! Canonical store of every rigid-body operator in one NCS model.

use super::transform::{serial_key, NcsTransform};
use super::types::{Rotation, Translation};
use crate::ops::error::Error;

/// Write-once registry assigning globally unique serial numbers.
///
/// Serials start at 1, are never reused, and grow monotonically across the
/// whole model regardless of group. There is no removal operation: groups
/// and transforms are additive during construction and frozen afterwards.
/// Serial numbering is per-registry, so independent models never share it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformRegistry {
    transforms: Vec<NcsTransform>,
}

impl TransformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a copy's operator and returns its serial number.
    pub fn register(
        &mut self,
        rotation: Rotation,
        translation: Translation,
        ncs_group_id: usize,
        rmsd: f64,
    ) -> usize {
        self.push(rotation, translation, ncs_group_id, rmsd, false)
    }

    /// Registers the identity operator for a group's reference member.
    ///
    /// A second identity registration for the same group is an internal
    /// invariant breach: the group matcher registers exactly one reference
    /// per group, so this is unreachable from valid external input.
    pub fn identity_for(&mut self, ncs_group_id: usize) -> Result<usize, Error> {
        if self
            .transforms
            .iter()
            .any(|t| t.is_master && t.ncs_group_id == ncs_group_id)
        {
            return Err(Error::DuplicateTransform { ncs_group_id });
        }
        Ok(self.push(
            Rotation::identity(),
            Translation::zeros(),
            ncs_group_id,
            0.0,
            true,
        ))
    }

    fn push(
        &mut self,
        rotation: Rotation,
        translation: Translation,
        ncs_group_id: usize,
        rmsd: f64,
        is_master: bool,
    ) -> usize {
        let serial_num = self.transforms.len() + 1;
        self.transforms.push(NcsTransform {
            rotation,
            translation,
            ncs_group_id,
            serial_num,
            rmsd,
            is_master,
        });
        serial_num
    }

    pub fn get(&self, serial_num: usize) -> Option<&NcsTransform> {
        self.transforms.get(serial_num.checked_sub(1)?)
    }

    /// Looks a transform up by its zero-padded registry key.
    pub fn get_by_key(&self, key: &str) -> Option<&NcsTransform> {
        self.transforms
            .iter()
            .find(|t| serial_key(t.serial_num) == key)
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NcsTransform> {
        self.transforms.iter()
    }

    /// Transforms belonging to one group, in registration order.
    pub fn group_transforms(
        &self,
        ncs_group_id: usize,
    ) -> impl Iterator<Item = &NcsTransform> {
        self.transforms
            .iter()
            .filter(move |t| t.ncs_group_id == ncs_group_id)
    }

    /// Non-reference transforms of one group, i.e. one per copy, in
    /// registration order.
    pub fn copy_transforms(
        &self,
        ncs_group_id: usize,
    ) -> impl Iterator<Item = &NcsTransform> {
        self.group_transforms(ncs_group_id).filter(|t| !t.is_master)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_assigns_monotonic_serials_across_groups() {
        let mut registry = TransformRegistry::new();

        let s1 = registry.identity_for(1).unwrap();
        let s2 = registry.register(Rotation::identity(), Translation::zeros(), 1, 0.1);
        let s3 = registry.identity_for(2).unwrap();
        let s4 = registry.register(Rotation::identity(), Translation::zeros(), 2, 0.2);

        assert_eq!([s1, s2, s3, s4], [1, 2, 3, 4]);
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn identity_for_rejects_second_identity_in_group() {
        let mut registry = TransformRegistry::new();
        registry.identity_for(1).unwrap();

        let err = registry.identity_for(1).unwrap_err();
        assert!(matches!(
            err,
            Error::DuplicateTransform { ncs_group_id: 1 }
        ));
    }

    #[test]
    fn copy_transforms_excludes_reference_member() {
        let mut registry = TransformRegistry::new();
        registry.identity_for(1).unwrap();
        registry.register(Rotation::identity(), Translation::zeros(), 1, 0.0);
        registry.register(Rotation::identity(), Translation::zeros(), 1, 0.0);

        let serials: Vec<usize> =
            registry.copy_transforms(1).map(|t| t.serial_num).collect();
        assert_eq!(serials, [2, 3]);
    }

    #[test]
    fn get_by_key_uses_zero_padded_serial() {
        let mut registry = TransformRegistry::new();
        registry.identity_for(1).unwrap();

        assert!(registry.get_by_key("0000000001").is_some());
        assert!(registry.get_by_key("0000000002").is_none());
    }
}
