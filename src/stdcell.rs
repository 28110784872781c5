//!
//! # Standard-Cell Library
//!
//! Definitions of the standard-cell *types* a netlist's cells instantiate:
//! each type declares a name and an ordered list of pins. Many netlist cells
//! share one type, and the netlist holds the library through a shared [crate::Ptr]
//! handle - it reads type and pin definitions but never copies them.
//!
//! Like the netlist itself, the library is built on [EntitySystem]s, so external
//! subsystems can register their own per-type data (cell geometry, pin capacitance)
//! against it without the library knowing about them.
//!

// Std-Lib
use std::collections::HashMap;

// Crates.io
use slotmap::{new_key_type, Key, SecondaryMap};

// Local Imports
use crate::entity::{EntityProperty, EntitySystem};
use crate::error::{EntityKind, NetlistError, NetlistResult};
use crate::ptr::Ptr;

new_key_type! {
    /// Keys for standard-cell type entries
    pub struct StdCellKey;
    /// Keys for standard-cell pin entries
    pub struct StdPinKey;
}

///
/// # Standard-Cell Library
///
#[derive(Debug)]
pub struct StdCellLib {
    /// Cell-type entity system
    cell_system: EntitySystem<StdCellKey>,
    /// Pin-type entity system
    pin_system: EntitySystem<StdPinKey>,
    /// Cell-type names
    cell_names: SecondaryMap<StdCellKey, String>,
    /// Declared pins per cell type, in declaration order
    cell_pins: SecondaryMap<StdCellKey, Vec<StdPinKey>>,
    /// Pin names, qualified `<cell>:<pin>` for owned pins
    pin_names: SecondaryMap<StdPinKey, String>,
    /// Owning cell type per pin; null for ownerless (primary-I/O) pin types
    pin_owners: SecondaryMap<StdPinKey, StdCellKey>,
    /// Name-to-cell-type index
    name2cell: HashMap<String, StdCellKey>,
    /// Name-to-pin-type index
    name2pin: HashMap<String, StdPinKey>,
}
impl StdCellLib {
    /// Create a new and empty [StdCellLib]
    pub fn new() -> Self {
        Self {
            cell_system: EntitySystem::new(EntityKind::StdCell),
            pin_system: EntitySystem::new(EntityKind::StdCellPin),
            cell_names: SecondaryMap::new(),
            cell_pins: SecondaryMap::new(),
            pin_names: SecondaryMap::new(),
            pin_owners: SecondaryMap::new(),
            name2cell: HashMap::new(),
            name2pin: HashMap::new(),
        }
    }

    /// Get or create the cell type named `name`
    pub fn cell_create(&mut self, name: impl Into<String>) -> NetlistResult<StdCellKey> {
        let name = name.into();
        if let Some(key) = self.name2cell.get(&name) {
            return Ok(*key);
        }
        let key = self.cell_system.create()?;
        self.cell_names.insert(key, name.clone());
        self.cell_pins.insert(key, Vec::new());
        self.name2cell.insert(name, key);
        Ok(key)
    }
    /// Get or create the pin type named `name` under cell type `owner`.
    /// Owned pins are stored and indexed under the qualified name `<cell>:<pin>`
    /// and appended to the owner's declared-pin list;
    /// a null `owner` creates an ownerless pin type (backing primary I/Os).
    pub fn pin_create(
        &mut self,
        owner: StdCellKey,
        name: impl Into<String>,
    ) -> NetlistResult<StdPinKey> {
        let name = name.into();
        let qualified = if owner.is_null() {
            name
        } else {
            let cell_name = self
                .cell_names
                .get(owner)
                .ok_or(NetlistError::UnknownEntity {
                    kind: EntityKind::StdCell,
                })?;
            format!("{}:{}", cell_name, name)
        };
        if let Some(key) = self.name2pin.get(&qualified) {
            return Ok(*key);
        }
        let key = self.pin_system.create()?;
        self.pin_names.insert(key, qualified.clone());
        self.pin_owners.insert(key, owner);
        if let Some(pins) = self.cell_pins.get_mut(owner) {
            pins.push(key);
        }
        self.name2pin.insert(qualified, key);
        Ok(key)
    }

    /// Find the cell type named `name`
    pub fn cell_find(&self, name: &str) -> NetlistResult<StdCellKey> {
        self.name2cell
            .get(name)
            .copied()
            .ok_or_else(|| NetlistError::NotFound {
                kind: EntityKind::StdCell,
                name: name.to_string(),
            })
    }
    /// Find the pin type registered under (qualified) `name`
    pub fn pin_find(&self, name: &str) -> NetlistResult<StdPinKey> {
        self.name2pin
            .get(name)
            .copied()
            .ok_or_else(|| NetlistError::NotFound {
                kind: EntityKind::StdCellPin,
                name: name.to_string(),
            })
    }
    /// Get the name of cell type `cell`
    pub fn cell_name(&self, cell: StdCellKey) -> NetlistResult<&str> {
        self.cell_names
            .get(cell)
            .map(String::as_str)
            .ok_or(NetlistError::UnknownEntity {
                kind: EntityKind::StdCell,
            })
    }
    /// Get the declared pins of cell type `cell`, in declaration order
    pub fn cell_pins(&self, cell: StdCellKey) -> NetlistResult<&[StdPinKey]> {
        self.cell_pins
            .get(cell)
            .map(Vec::as_slice)
            .ok_or(NetlistError::UnknownEntity {
                kind: EntityKind::StdCell,
            })
    }
    /// Get the declared pin count of cell type `cell`
    pub fn pin_count(&self, cell: StdCellKey) -> NetlistResult<usize> {
        Ok(self.cell_pins(cell)?.len())
    }
    /// Get the (qualified) name of pin type `pin`
    pub fn pin_name(&self, pin: StdPinKey) -> NetlistResult<&str> {
        self.pin_names
            .get(pin)
            .map(String::as_str)
            .ok_or(NetlistError::UnknownEntity {
                kind: EntityKind::StdCellPin,
            })
    }
    /// Get the owning cell type of pin type `pin`; null for ownerless pin types
    pub fn pin_owner(&self, pin: StdPinKey) -> NetlistResult<StdCellKey> {
        self.pin_owners
            .get(pin)
            .copied()
            .ok_or(NetlistError::UnknownEntity {
                kind: EntityKind::StdCellPin,
            })
    }
    /// Number of cell types
    pub fn cell_count(&self) -> usize {
        self.cell_system.len()
    }
    /// Number of pin types, across all cell types
    pub fn pin_count_total(&self) -> usize {
        self.pin_system.len()
    }

    /// Get the cell-type entity system
    pub fn cell_system(&self) -> &EntitySystem<StdCellKey> {
        &self.cell_system
    }
    /// Get the pin-type entity system
    pub fn pin_system(&self) -> &EntitySystem<StdPinKey> {
        &self.pin_system
    }
    /// Register a property against the cell-type system
    pub fn register_cell_property<P: EntityProperty<StdCellKey> + 'static>(
        &mut self,
        prop: &Ptr<P>,
    ) -> NetlistResult<()> {
        self.cell_system.register(prop)
    }
    /// Register a property against the pin-type system
    pub fn register_pin_property<P: EntityProperty<StdPinKey> + 'static>(
        &mut self,
        prop: &Ptr<P>,
    ) -> NetlistResult<()> {
        self.pin_system.register(prop)
    }
}
impl Default for StdCellLib {
    fn default() -> Self {
        Self::new()
    }
}
