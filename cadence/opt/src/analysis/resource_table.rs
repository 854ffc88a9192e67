use super::Resource;
use cadence_utils::{CadenceResult, Error};
use smallvec::SmallVec;
use std::collections::{BTreeMap, HashMap};
use std::ops::Range;

/// Default number of instances of every shared function unit.
pub const MAX_FUNC_UNIT: usize = 10;

/// Occupants of one cycle of a resource, with the instance each one holds.
type Slot<K> = SmallVec<[(K, usize); 4]>;

/// Cycle-by-cycle occupancy of the shared resources of one scheduling run.
///
/// Reservations are never released. A table must not outlive the run it was
/// created for since cycle numbers restart at zero for every run.
#[derive(Debug, Clone)]
pub struct ResourceTable<K> {
    max_func_unit: usize,
    tables: HashMap<Resource, BTreeMap<u64, Slot<K>>>,
}

impl<K> Default for ResourceTable<K> {
    fn default() -> Self {
        Self::new(MAX_FUNC_UNIT)
    }
}

impl<K> ResourceTable<K> {
    /// A table allowing `max_func_unit` concurrent users per resource. A
    /// ceiling of zero is treated as one.
    pub fn new(max_func_unit: usize) -> Self {
        ResourceTable {
            max_func_unit: max_func_unit.max(1),
            tables: HashMap::new(),
        }
    }

    pub fn max_func_unit(&self) -> usize {
        self.max_func_unit
    }

    /// Number of occupants of `res` at `cycle`.
    pub fn occupancy(&self, res: &Resource, cycle: u64) -> usize {
        self.tables
            .get(res)
            .and_then(|table| table.get(&cycle))
            .map_or(0, |slot| slot.len())
    }
}

impl<K: Copy + Eq + std::fmt::Debug> ResourceTable<K> {
    /// Reserve an instance of `res` for `node`, starting no earlier than
    /// `time` and held for `latency` cycles (at least one). Returns the start
    /// cycle and the instance number.
    ///
    /// If `node` already occupies `res` at `time` nothing is reserved and its
    /// existing instance is returned. A reservation that would end past the
    /// last representable cycle is an error.
    pub fn earliest_free_time(
        &mut self,
        node: K,
        res: Resource,
        mut time: u64,
        latency: u64,
    ) -> CadenceResult<(u64, usize)> {
        let max = self.max_func_unit;
        let table = self.tables.entry(res).or_default();
        if let Some((_, inst)) = table
            .get(&time)
            .and_then(|slot| slot.iter().find(|(occ, _)| *occ == node))
        {
            return Ok((time, *inst));
        }

        let span = latency.max(1);
        let (end, instance) = loop {
            let end = time.checked_add(span).ok_or_else(|| {
                Error::malformed_structure(format!(
                    "reservation of {res:?} for {span} cycles from cycle {time} overflows the cycle count"
                ))
            })?;
            match free_instance(table, time..end, max) {
                Some(inst) => break (end, inst),
                None => {
                    log::debug!("resource {res:?} is full at cycle {time}");
                    time += 1;
                }
            }
        };
        for cycle in time..end {
            table.entry(cycle).or_default().push((node, instance));
        }
        Ok((time, instance))
    }
}

/// The lowest instance that is unused in every cycle of `cycles`.
fn free_instance<K>(
    table: &BTreeMap<u64, Slot<K>>,
    cycles: Range<u64>,
    max: usize,
) -> Option<usize> {
    (0..max).find(|inst| {
        table
            .range(cycles.clone())
            .all(|(_, slot)| slot.iter().all(|(_, used)| used != inst))
    })
}
