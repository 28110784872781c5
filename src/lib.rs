//!
//! # Netlist21 Integrated Circuit Netlist Data Model
//!
//! The foundational in-memory data model of a physical-design toolchain:
//! a digital circuit as cells, pins, and nets, plus the generic entity/property
//! infrastructure that lets independent subsystems (placement, timing, parsers)
//! attach typed attributes to the same entities without the netlist knowing about them.
//!
//! Entities are versioned [slotmap] keys issued by per-kind [EntitySystem]s:
//! opaque, copyable, stable across unrelated insertions and removals, and never
//! confusable with a reused slot. The [Netlist] composes three such systems -
//! cells, pins, nets - alongside name indices and primary-I/O bookkeeping, and
//! references (but does not own) a [StdCellLib] of standard-cell type definitions.
//!
//! Building a two-cell circuit:
//!
//! ```text
//! let mut lib = StdCellLib::new();
//! let inv = lib.cell_create("INV_X1")?;
//! lib.pin_create(inv, "a")?;
//! lib.pin_create(inv, "o")?;
//!
//! let mut netlist = Netlist::new(Ptr::new(lib));
//! let u1 = netlist.cell_insert("u1", "INV_X1")?;
//! let u2 = netlist.cell_insert("u2", "INV_X1")?;
//! let n1 = netlist.net_insert("n1")?;
//! netlist.connect(n1, netlist.pin_by_name("u1:o")?)?;
//! netlist.connect(n1, netlist.pin_by_name("u2:a")?)?;
//! ```
//!
//! The netlist is single-threaded and synchronous: one writer phase
//! (typically a parser), then any number of readers.
//!

pub mod entity;
pub mod error;
pub mod netlist;
pub mod ptr;
pub mod stdcell;

#[cfg(test)]
mod tests;

pub use entity::{EntityProperty, EntitySystem, PropertyMap};
pub use error::{EntityKind, NetlistError, NetlistResult};
pub use netlist::{CellKey, CellProps, NetKey, NetProps, Netlist, PinKey, PinProps};
pub use ptr::Ptr;
pub use slotmap::Key;
pub use stdcell::{StdCellKey, StdCellLib, StdPinKey};
