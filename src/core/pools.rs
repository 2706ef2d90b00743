use crate::domain::model::{Manager, Office};
use crate::domain::rules::{normalize_id, AssignmentRules};
use crate::utils::error::{AllocatorError, Result};
use std::collections::HashMap;

/// Manager pools for one run.
///
/// Pools hold indices into the roster's manager list. Office pools live on the
/// `Office` records themselves.
#[derive(Debug, Clone, Default)]
pub struct ManagerPools {
    vip: Vec<usize>,
    foreign: Vec<usize>,
}

impl ManagerPools {
    /// Partitions `managers` into office, VIP and foreign pools.
    ///
    /// Office pools are rebuilt from scratch, so calling this again on the same
    /// roster yields the same membership. Two offices whose ids differ only in
    /// case or surrounding whitespace are rejected.
    pub fn build(
        managers: &[Manager],
        offices: &mut [Office],
        rules: &AssignmentRules,
    ) -> Result<Self> {
        let mut office_index = HashMap::with_capacity(offices.len());
        for (index, office) in offices.iter_mut().enumerate() {
            office.clear_managers();
            if office_index.insert(normalize_id(&office.id), index).is_some() {
                return Err(AllocatorError::DuplicateOffice {
                    office_id: office.id.clone(),
                });
            }
        }

        let mut vip = Vec::new();
        let mut foreign = Vec::new();

        for (index, manager) in managers.iter().enumerate() {
            let office = office_index
                .get(&normalize_id(&manager.office_id))
                .copied()
                .ok_or_else(|| AllocatorError::UnknownOffice {
                    manager_id: manager.id.clone(),
                    office_id: manager.office_id.clone(),
                })?;
            offices[office].add_manager(index);

            if manager.is_vip {
                vip.push(index);
            }
            if rules.is_foreign_office(&manager.office_id) {
                foreign.push(index);
            }
        }

        tracing::debug!(
            "Built pools: {} offices, {} VIP managers, {} foreign-client managers",
            office_index.len(),
            vip.len(),
            foreign.len()
        );

        Ok(Self { vip, foreign })
    }

    pub fn vip(&self) -> &[usize] {
        &self.vip
    }

    pub fn foreign(&self) -> &[usize] {
        &self.foreign
    }
}

/// Index of the manager with the smallest current load; the first one wins a tie.
pub fn least_loaded(pool: &[usize], managers: &[Manager]) -> Option<usize> {
    pool.iter()
        .copied()
        .min_by_key(|&index| managers[index].client_count())
}
