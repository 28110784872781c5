//!
//! # Netlist Data Model
//!
//! Defines the primary [Netlist] structure: cells, pins, and nets as entities,
//! their owned attribute bundles, name indices, and primary-I/O bookkeeping.
//!
//! The netlist composes three independent [EntitySystem]s.
//! Its own attributes (names, ownership, connectivity, type bindings) live in
//! the [CellProps]/[PinProps]/[NetProps] bundles; everything else - placement
//! geometry, timing data - is registered externally via `register_*_property`
//! and keyed by the same entities.
//!
//! Mutations validate before touching anything, so a rejected operation
//! never leaves the structure partially updated. Cell and net removal are
//! rejected while connections remain; callers disconnect first.
//!

// Std-Lib
use std::collections::HashMap;

// Crates.io
use slotmap::{new_key_type, Key, SecondaryMap};
use tracing::{debug, trace};

// Local Imports
use crate::entity::{EntityProperty, EntitySystem};
use crate::error::{EntityKind, NetlistError, NetlistResult};
use crate::ptr::Ptr;
use crate::stdcell::{StdCellKey, StdCellLib, StdPinKey};

new_key_type! {
    /// Keys for [Netlist] cell entities
    pub struct CellKey;
    /// Keys for [Netlist] pin entities
    pub struct PinKey;
    /// Keys for [Netlist] net entities
    pub struct NetKey;
}

/// Trailing segment of a (possibly `cell:pin`-qualified) pin-type name
fn leaf_name(name: &str) -> &str {
    match name.rfind(':') {
        Some(idx) => &name[idx + 1..],
        None => name,
    }
}

/// Cell attribute bundle: name, owned pins, standard-cell type binding
#[derive(Debug, Default)]
pub struct CellProps {
    names: SecondaryMap<CellKey, String>,
    pins: SecondaryMap<CellKey, Vec<PinKey>>,
    types: SecondaryMap<CellKey, StdCellKey>,
}
impl CellProps {
    /// Get the name of `cell`
    pub fn name(&self, cell: CellKey) -> Option<&str> {
        self.names.get(cell).map(String::as_str)
    }
    /// Get the owned pins of `cell`, in type-declaration order
    pub fn pins(&self, cell: CellKey) -> Option<&[PinKey]> {
        self.pins.get(cell).map(Vec::as_slice)
    }
    /// Get the standard-cell type of `cell`; null if `cell` is not live
    pub fn std_cell(&self, cell: CellKey) -> StdCellKey {
        self.types.get(cell).copied().unwrap_or_else(StdCellKey::null)
    }
}

/// Pin attribute bundle: owner, net, standard-cell pin-type binding
#[derive(Debug, Default)]
pub struct PinProps {
    owners: SecondaryMap<PinKey, CellKey>,
    nets: SecondaryMap<PinKey, NetKey>,
    types: SecondaryMap<PinKey, StdPinKey>,
}
impl PinProps {
    /// Get the owning cell of `pin`; null marks a primary input or output
    pub fn owner(&self, pin: PinKey) -> CellKey {
        self.owners.get(pin).copied().unwrap_or_else(CellKey::null)
    }
    /// Get the net of `pin`; null marks an unconnected pin
    pub fn net(&self, pin: PinKey) -> NetKey {
        self.nets.get(pin).copied().unwrap_or_else(NetKey::null)
    }
    /// Get the standard-cell pin type of `pin`; null if `pin` is not live
    pub fn std_cell_pin(&self, pin: PinKey) -> StdPinKey {
        self.types.get(pin).copied().unwrap_or_else(StdPinKey::null)
    }
}

/// Net attribute bundle: name and ordered connected-pin list
#[derive(Debug, Default)]
pub struct NetProps {
    names: SecondaryMap<NetKey, String>,
    pins: SecondaryMap<NetKey, Vec<PinKey>>,
}
impl NetProps {
    /// Get the name of `net`
    pub fn name(&self, net: NetKey) -> Option<&str> {
        self.names.get(net).map(String::as_str)
    }
    /// Get the connected pins of `net`, in connection order
    pub fn pins(&self, net: NetKey) -> Option<&[PinKey]> {
        self.pins.get(net).map(Vec::as_slice)
    }
}

///
/// # Netlist
///
/// The in-memory circuit graph: cells instantiate standard-cell types,
/// own one pin per declared type pin, and pins connect through nets.
/// Primary inputs and outputs are pins with a null owner, kept in ordered
/// lists with an entity-to-position index for O(1) removal.
///
#[derive(Debug)]
pub struct Netlist {
    /// Shared, non-owning handle on the standard-cell library.
    /// The library must be populated before cells referencing its types are inserted.
    std_cells: Ptr<StdCellLib>,
    /// Design/module name
    module_name: String,

    cell_system: EntitySystem<CellKey>,
    pin_system: EntitySystem<PinKey>,
    net_system: EntitySystem<NetKey>,

    cells: CellProps,
    pins: PinProps,
    nets: NetProps,

    name2cell: HashMap<String, CellKey>,
    name2pin: HashMap<String, PinKey>,
    name2net: HashMap<String, NetKey>,

    /// Primary inputs, in insertion order (modulo swap-removal)
    pi: Vec<PinKey>,
    /// Primary-input positions in `pi`
    pi_index: SecondaryMap<PinKey, usize>,
    /// Primary outputs, in insertion order (modulo swap-removal)
    po: Vec<PinKey>,
    /// Primary-output positions in `po`
    po_index: SecondaryMap<PinKey, usize>,
}

impl Netlist {
    /// Create a new and empty [Netlist] over the standard-cell library `std_cells`
    pub fn new(std_cells: Ptr<StdCellLib>) -> Self {
        Self {
            std_cells,
            module_name: String::new(),
            cell_system: EntitySystem::new(EntityKind::Cell),
            pin_system: EntitySystem::new(EntityKind::Pin),
            net_system: EntitySystem::new(EntityKind::Net),
            cells: CellProps::default(),
            pins: PinProps::default(),
            nets: NetProps::default(),
            name2cell: HashMap::new(),
            name2pin: HashMap::new(),
            name2net: HashMap::new(),
            pi: Vec::new(),
            pi_index: SecondaryMap::new(),
            po: Vec::new(),
            po_index: SecondaryMap::new(),
        }
    }
    /// Get the standard-cell library handle
    pub fn std_cells(&self) -> &Ptr<StdCellLib> {
        &self.std_cells
    }
    /// Get the module name
    pub fn module_name(&self) -> &str {
        &self.module_name
    }
    /// Set the module name
    pub fn set_module_name(&mut self, name: impl Into<String>) {
        self.module_name = name.into();
    }

    // Cells

    /// Insert a new cell named `name`, instantiating standard-cell type `ty`.
    /// Allocates one owned pin per declared type pin, in declaration order,
    /// each bound to the corresponding type pin and indexed under its derived name.
    pub fn cell_insert(&mut self, name: impl Into<String>, ty: &str) -> NetlistResult<CellKey> {
        let name = name.into();
        if self.name2cell.contains_key(&name) {
            return Err(NetlistError::NameConflict {
                kind: EntityKind::Cell,
                name,
            });
        }
        // Resolve the type and its declared pins up front; nothing is allocated on failure.
        let (type_key, type_pins, leaves) = {
            let lib = self.std_cells.read()?;
            let type_key = lib
                .cell_find(ty)
                .map_err(|_| NetlistError::UnknownType {
                    name: ty.to_string(),
                })?;
            let type_pins = lib.cell_pins(type_key)?.to_vec();
            let mut leaves = Vec::with_capacity(type_pins.len());
            for &tp in &type_pins {
                leaves.push(leaf_name(lib.pin_name(tp)?).to_string());
            }
            (type_key, type_pins, leaves)
        };
        let mut derived = Vec::with_capacity(leaves.len());
        for leaf in &leaves {
            let pin_name = format!("{}:{}", name, leaf);
            if self.name2pin.contains_key(&pin_name) {
                return Err(NetlistError::NameConflict {
                    kind: EntityKind::Pin,
                    name: pin_name,
                });
            }
            derived.push(pin_name);
        }
        let cell = self.cell_system.create()?;
        self.cells.names.insert(cell, name.clone());
        self.cells.types.insert(cell, type_key);
        self.cells.pins.insert(cell, Vec::with_capacity(type_pins.len()));
        self.name2cell.insert(name.clone(), cell);
        for (tp, pin_name) in type_pins.into_iter().zip(derived) {
            self.pin_bind(cell, tp, pin_name)?;
        }
        debug!(?cell, %name, ty, "inserted cell");
        Ok(cell)
    }
    /// Remove cell `cell` and its owned pins.
    /// Rejected with [NetlistError::InvalidState] while any owned pin is still
    /// connected to a net; disconnect them first.
    pub fn cell_remove(&mut self, cell: CellKey) -> NetlistResult<()> {
        let pins = self
            .cells
            .pins
            .get(cell)
            .ok_or(NetlistError::UnknownEntity {
                kind: EntityKind::Cell,
            })?
            .clone();
        for &pin in &pins {
            if !self.pins.net(pin).is_null() {
                return Err(NetlistError::invalid_state(
                    "cell has connected pins; disconnect them before removal",
                ));
            }
        }
        let mut pin_names = Vec::with_capacity(pins.len());
        for &pin in &pins {
            pin_names.push(self.pin_name(pin)?);
        }
        for (&pin, pname) in pins.iter().zip(&pin_names) {
            self.name2pin.remove(pname);
            self.pins.owners.remove(pin);
            self.pins.nets.remove(pin);
            self.pins.types.remove(pin);
            self.pin_system.destroy(pin)?;
        }
        let name = self.cells.names.remove(cell).unwrap_or_default();
        self.name2cell.remove(&name);
        self.cells.pins.remove(cell);
        self.cells.types.remove(cell);
        self.cell_system.destroy(cell)?;
        debug!(?cell, %name, "removed cell");
        Ok(())
    }
    /// Number of live cells
    pub fn cell_count(&self) -> usize {
        self.cell_system.len()
    }
    /// Get the name of `cell`
    pub fn cell_name(&self, cell: CellKey) -> NetlistResult<&str> {
        self.cells.name(cell).ok_or(NetlistError::UnknownEntity {
            kind: EntityKind::Cell,
        })
    }
    /// Get the owned pins of `cell`, in type-declaration order
    pub fn cell_pins(&self, cell: CellKey) -> NetlistResult<&[PinKey]> {
        self.cells.pins(cell).ok_or(NetlistError::UnknownEntity {
            kind: EntityKind::Cell,
        })
    }
    /// Get the standard-cell type of `cell`
    pub fn cell_std_cell(&self, cell: CellKey) -> NetlistResult<StdCellKey> {
        let ty = self.cells.std_cell(cell);
        if ty.is_null() {
            return Err(NetlistError::UnknownEntity {
                kind: EntityKind::Cell,
            });
        }
        Ok(ty)
    }
    /// Change the standard-cell type of `cell` to `ty`.
    /// The new type must declare exactly as many pins as the cell currently owns;
    /// on [NetlistError::TypeMismatch] nothing is mutated. On success each owned pin
    /// is re-bound, by position, to the corresponding pin of `ty`, and the derived
    /// pin-name index entries are refreshed.
    pub fn cell_std_cell_set(&mut self, cell: CellKey, ty: StdCellKey) -> NetlistResult<()> {
        let pins = self
            .cells
            .pins
            .get(cell)
            .ok_or(NetlistError::UnknownEntity {
                kind: EntityKind::Cell,
            })?
            .clone();
        let (type_pins, new_names) = {
            let lib = self.std_cells.read()?;
            let type_pins = lib.cell_pins(ty)?.to_vec();
            if type_pins.len() != pins.len() {
                return Err(NetlistError::TypeMismatch {
                    have: pins.len(),
                    want: type_pins.len(),
                });
            }
            let cell_name = self
                .cells
                .names
                .get(cell)
                .ok_or(NetlistError::UnknownEntity {
                    kind: EntityKind::Cell,
                })?;
            let mut new_names = Vec::with_capacity(type_pins.len());
            for &tp in &type_pins {
                new_names.push(format!("{}:{}", cell_name, leaf_name(lib.pin_name(tp)?)));
            }
            (type_pins, new_names)
        };
        let mut old_names = Vec::with_capacity(pins.len());
        for &pin in &pins {
            old_names.push(self.pin_name(pin)?);
        }
        for old in &old_names {
            self.name2pin.remove(old);
        }
        self.cells.types.insert(cell, ty);
        for ((&pin, tp), name) in pins.iter().zip(type_pins).zip(new_names) {
            self.pins.types.insert(pin, tp);
            self.name2pin.insert(name, pin);
        }
        debug!(?cell, ?ty, "re-typed cell");
        Ok(())
    }
    /// Change the standard-cell type of `cell` to the type named `ty`
    pub fn cell_std_cell_set_by_name(&mut self, cell: CellKey, ty: &str) -> NetlistResult<()> {
        let key = {
            let lib = self.std_cells.read()?;
            lib.cell_find(ty).map_err(|_| NetlistError::UnknownType {
                name: ty.to_string(),
            })?
        };
        self.cell_std_cell_set(cell, key)
    }
    /// Find the cell named `name`
    pub fn cell_find(&self, name: &str) -> NetlistResult<CellKey> {
        self.name2cell
            .get(name)
            .copied()
            .ok_or_else(|| NetlistError::NotFound {
                kind: EntityKind::Cell,
                name: name.to_string(),
            })
    }
    /// Get the cell entity system
    pub fn cell_system(&self) -> &EntitySystem<CellKey> {
        &self.cell_system
    }
    /// Get the cell attribute bundle
    pub fn cells_properties(&self) -> &CellProps {
        &self.cells
    }
    /// Register a property against the cell system
    pub fn register_cell_property<P: EntityProperty<CellKey> + 'static>(
        &mut self,
        prop: &Ptr<P>,
    ) -> NetlistResult<()> {
        self.cell_system.register(prop)
    }

    // Pins

    /// Insert a new pin named `name`.
    /// A null `cell` creates an owner-less pin backed by an ownerless library pin type;
    /// otherwise `name` must be one of the pins declared by the cell's type, and the
    /// new pin is appended to the cell's owned-pin list.
    pub fn pin_insert(&mut self, cell: CellKey, name: &str) -> NetlistResult<PinKey> {
        let type_pin = if cell.is_null() {
            self.std_cells
                .write()?
                .pin_create(StdCellKey::null(), name)?
        } else {
            let ty = self
                .cells
                .types
                .get(cell)
                .copied()
                .ok_or(NetlistError::UnknownEntity {
                    kind: EntityKind::Cell,
                })?;
            let lib = self.std_cells.read()?;
            let qualified = format!("{}:{}", lib.cell_name(ty)?, leaf_name(name));
            lib.pin_find(&qualified)
                .map_err(|_| NetlistError::UnknownType { name: qualified })?
        };
        let derived = self.derived_pin_name(cell, type_pin)?;
        if self.name2pin.contains_key(&derived) {
            return Err(NetlistError::NameConflict {
                kind: EntityKind::Pin,
                name: derived,
            });
        }
        let pin = self.pin_bind(cell, type_pin, derived)?;
        debug!(?pin, name, "inserted pin");
        Ok(pin)
    }
    /// Number of live pins
    pub fn pin_count(&self) -> usize {
        self.pin_system.len()
    }
    /// Get the derived name of `pin`: `<cell_name>:<type_pin_name>` when owned,
    /// the bare type-pin name otherwise. Computed on demand, so it always
    /// reflects the current owner name and type binding.
    pub fn pin_name(&self, pin: PinKey) -> NetlistResult<String> {
        let owner = self
            .pins
            .owners
            .get(pin)
            .copied()
            .ok_or(NetlistError::UnknownEntity {
                kind: EntityKind::Pin,
            })?;
        let type_pin = self
            .pins
            .types
            .get(pin)
            .copied()
            .ok_or(NetlistError::UnknownEntity {
                kind: EntityKind::Pin,
            })?;
        self.derived_pin_name(owner, type_pin)
    }
    /// Get the owning cell of `pin`; null marks a primary input or output
    pub fn pin_owner(&self, pin: PinKey) -> NetlistResult<CellKey> {
        self.pins
            .owners
            .get(pin)
            .copied()
            .ok_or(NetlistError::UnknownEntity {
                kind: EntityKind::Pin,
            })
    }
    /// Get the net of `pin`; null marks an unconnected pin
    pub fn pin_net(&self, pin: PinKey) -> NetlistResult<NetKey> {
        self.pins
            .nets
            .get(pin)
            .copied()
            .ok_or(NetlistError::UnknownEntity {
                kind: EntityKind::Pin,
            })
    }
    /// Get the standard-cell pin type of `pin`
    pub fn pin_std_cell(&self, pin: PinKey) -> NetlistResult<StdPinKey> {
        self.pins
            .types
            .get(pin)
            .copied()
            .ok_or(NetlistError::UnknownEntity {
                kind: EntityKind::Pin,
            })
    }
    /// Find the pin registered under derived name `name`
    pub fn pin_by_name(&self, name: &str) -> NetlistResult<PinKey> {
        self.name2pin
            .get(name)
            .copied()
            .ok_or_else(|| NetlistError::NotFound {
                kind: EntityKind::Pin,
                name: name.to_string(),
            })
    }
    /// Get the pin entity system
    pub fn pin_system(&self) -> &EntitySystem<PinKey> {
        &self.pin_system
    }
    /// Get the pin attribute bundle
    pub fn pins_properties(&self) -> &PinProps {
        &self.pins
    }
    /// Register a property against the pin system
    pub fn register_pin_property<P: EntityProperty<PinKey> + 'static>(
        &mut self,
        prop: &Ptr<P>,
    ) -> NetlistResult<()> {
        self.pin_system.register(prop)
    }

    // Nets

    /// Insert a new net named `name`, with an initially empty pin list
    pub fn net_insert(&mut self, name: impl Into<String>) -> NetlistResult<NetKey> {
        let name = name.into();
        if self.name2net.contains_key(&name) {
            return Err(NetlistError::NameConflict {
                kind: EntityKind::Net,
                name,
            });
        }
        let net = self.net_system.create()?;
        self.nets.names.insert(net, name.clone());
        self.nets.pins.insert(net, Vec::new());
        self.name2net.insert(name.clone(), net);
        debug!(?net, %name, "inserted net");
        Ok(net)
    }
    /// Remove net `net`.
    /// Rejected with [NetlistError::InvalidState] while any pin is still connected.
    pub fn net_remove(&mut self, net: NetKey) -> NetlistResult<()> {
        let pins = self.nets.pins.get(net).ok_or(NetlistError::UnknownEntity {
            kind: EntityKind::Net,
        })?;
        if !pins.is_empty() {
            return Err(NetlistError::invalid_state(
                "net still has connected pins; disconnect them before removal",
            ));
        }
        let name = self.nets.names.remove(net).unwrap_or_default();
        self.name2net.remove(&name);
        self.nets.pins.remove(net);
        self.net_system.destroy(net)?;
        debug!(?net, %name, "removed net");
        Ok(())
    }
    /// Number of live nets
    pub fn net_count(&self) -> usize {
        self.net_system.len()
    }
    /// Get the name of `net`
    pub fn net_name(&self, net: NetKey) -> NetlistResult<&str> {
        self.nets.name(net).ok_or(NetlistError::UnknownEntity {
            kind: EntityKind::Net,
        })
    }
    /// Get the connected pins of `net`, in connection order
    pub fn net_pins(&self, net: NetKey) -> NetlistResult<&[PinKey]> {
        self.nets.pins(net).ok_or(NetlistError::UnknownEntity {
            kind: EntityKind::Net,
        })
    }
    /// Find the net named `name`
    pub fn net_by_name(&self, name: &str) -> NetlistResult<NetKey> {
        self.name2net
            .get(name)
            .copied()
            .ok_or_else(|| NetlistError::NotFound {
                kind: EntityKind::Net,
                name: name.to_string(),
            })
    }
    /// Iterate over the names of all live nets
    pub fn net_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.net_system
            .keys()
            .filter_map(move |net| self.nets.names.get(net).map(String::as_str))
    }
    /// Get the net entity system
    pub fn net_system(&self) -> &EntitySystem<NetKey> {
        &self.net_system
    }
    /// Get the net attribute bundle
    pub fn nets_properties(&self) -> &NetProps {
        &self.nets
    }
    /// Register a property against the net system
    pub fn register_net_property<P: EntityProperty<NetKey> + 'static>(
        &mut self,
        prop: &Ptr<P>,
    ) -> NetlistResult<()> {
        self.net_system.register(prop)
    }

    // Connectivity

    /// Connect `pin` to `net`, appending it to the net's pin list.
    /// Rejected with [NetlistError::InvalidState] if the pin is already connected;
    /// there is no silent reassignment.
    pub fn connect(&mut self, net: NetKey, pin: PinKey) -> NetlistResult<()> {
        let current = self
            .pins
            .nets
            .get(pin)
            .copied()
            .ok_or(NetlistError::UnknownEntity {
                kind: EntityKind::Pin,
            })?;
        if !current.is_null() {
            return Err(NetlistError::invalid_state(
                "pin is already connected; disconnect it first",
            ));
        }
        let pins = self
            .nets
            .pins
            .get_mut(net)
            .ok_or(NetlistError::UnknownEntity {
                kind: EntityKind::Net,
            })?;
        pins.push(pin);
        self.pins.nets.insert(pin, net);
        trace!(?net, ?pin, "connected");
        Ok(())
    }
    /// Disconnect `pin` from its net, removing it from the net's pin list and
    /// clearing the pin's net attribute. A no-op if the pin is already disconnected.
    pub fn disconnect(&mut self, pin: PinKey) -> NetlistResult<()> {
        let current = self
            .pins
            .nets
            .get(pin)
            .copied()
            .ok_or(NetlistError::UnknownEntity {
                kind: EntityKind::Pin,
            })?;
        if current.is_null() {
            return Ok(());
        }
        if let Some(pins) = self.nets.pins.get_mut(current) {
            pins.retain(|p| *p != pin);
        }
        self.pins.nets.insert(pin, NetKey::null());
        trace!(?pin, "disconnected");
        Ok(())
    }

    // Primary inputs & outputs

    /// Insert a new primary input named `name`: an owner-less pin,
    /// appended to the primary-input list
    pub fn pi_insert(&mut self, name: &str) -> NetlistResult<PinKey> {
        let pin = self.pin_insert(CellKey::null(), name)?;
        self.pi_index.insert(pin, self.pi.len());
        self.pi.push(pin);
        debug!(?pin, name, "inserted primary input");
        Ok(pin)
    }
    /// Remove primary input `pi`, destroying the pin.
    /// Rejected with [NetlistError::InvalidState] while still connected.
    /// The list is compacted by swapping the last element into the freed slot;
    /// the relative order of the other elements is preserved.
    pub fn pi_remove(&mut self, pi: PinKey) -> NetlistResult<()> {
        let idx = self
            .pi_index
            .get(pi)
            .copied()
            .ok_or(NetlistError::UnknownEntity {
                kind: EntityKind::Pin,
            })?;
        if !self.pins.net(pi).is_null() {
            return Err(NetlistError::invalid_state(
                "primary input is still connected; disconnect it before removal",
            ));
        }
        self.pi_index.remove(pi);
        self.pi.swap_remove(idx);
        if idx < self.pi.len() {
            self.pi_index.insert(self.pi[idx], idx);
        }
        self.pin_destroy(pi)?;
        debug!(?pi, "removed primary input");
        Ok(())
    }
    /// Number of primary inputs
    pub fn pi_count(&self) -> usize {
        self.pi.len()
    }
    /// Get the primary inputs, in list order
    pub fn primary_inputs(&self) -> &[PinKey] {
        &self.pi
    }
    /// Insert a new primary output named `name`: an owner-less pin,
    /// appended to the primary-output list
    pub fn po_insert(&mut self, name: &str) -> NetlistResult<PinKey> {
        let pin = self.pin_insert(CellKey::null(), name)?;
        self.po_index.insert(pin, self.po.len());
        self.po.push(pin);
        debug!(?pin, name, "inserted primary output");
        Ok(pin)
    }
    /// Remove primary output `po`, destroying the pin.
    /// Same compaction and connectivity policy as [Netlist::pi_remove].
    pub fn po_remove(&mut self, po: PinKey) -> NetlistResult<()> {
        let idx = self
            .po_index
            .get(po)
            .copied()
            .ok_or(NetlistError::UnknownEntity {
                kind: EntityKind::Pin,
            })?;
        if !self.pins.net(po).is_null() {
            return Err(NetlistError::invalid_state(
                "primary output is still connected; disconnect it before removal",
            ));
        }
        self.po_index.remove(po);
        self.po.swap_remove(idx);
        if idx < self.po.len() {
            self.po_index.insert(self.po[idx], idx);
        }
        self.pin_destroy(po)?;
        debug!(?po, "removed primary output");
        Ok(())
    }
    /// Number of primary outputs
    pub fn po_count(&self) -> usize {
        self.po.len()
    }
    /// Get the primary outputs, in list order
    pub fn primary_outputs(&self) -> &[PinKey] {
        &self.po
    }

    // Internal helpers

    /// Compute the derived name for a pin with owner `owner` and type pin `type_pin`
    fn derived_pin_name(&self, owner: CellKey, type_pin: StdPinKey) -> NetlistResult<String> {
        let lib = self.std_cells.read()?;
        let type_name = lib.pin_name(type_pin)?;
        if owner.is_null() {
            return Ok(type_name.to_string());
        }
        let cell_name = self
            .cells
            .names
            .get(owner)
            .ok_or(NetlistError::UnknownEntity {
                kind: EntityKind::Cell,
            })?;
        Ok(format!("{}:{}", cell_name, leaf_name(type_name)))
    }
    /// Allocate a pin entity bound to `type_pin`, owned by `owner` (may be null),
    /// indexed under the precomputed derived `name`
    fn pin_bind(&mut self, owner: CellKey, type_pin: StdPinKey, name: String) -> NetlistResult<PinKey> {
        let pin = self.pin_system.create()?;
        self.pins.owners.insert(pin, owner);
        self.pins.nets.insert(pin, NetKey::null());
        self.pins.types.insert(pin, type_pin);
        if let Some(pins) = self.cells.pins.get_mut(owner) {
            pins.push(pin);
        }
        self.name2pin.insert(name, pin);
        Ok(pin)
    }
    /// Destroy a (disconnected, owner-less) pin entity and its bundle slots
    fn pin_destroy(&mut self, pin: PinKey) -> NetlistResult<()> {
        let name = self.pin_name(pin)?;
        self.name2pin.remove(&name);
        self.pins.owners.remove(pin);
        self.pins.nets.remove(pin);
        self.pins.types.remove(pin);
        self.pin_system.destroy(pin)?;
        Ok(())
    }
}
