//!
//! # Entity Systems & Properties
//!
//! An [EntitySystem] is a pool of live entities of one kind - cells, pins, or nets -
//! identified by versioned [slotmap] keys. Keys are opaque, copyable, and totally ordered;
//! a slot freed by [EntitySystem::destroy] may be reused, but its key version advances,
//! so a reused slot never compares equal to a stale key. The null key
//! (via [slotmap::Key::null]) is distinguishable from every live entity and marks
//! "no owner" / "no net" style absences.
//!
//! Attributes are never stored *inside* an entity. Instead, any subsystem may
//! [EntitySystem::register] a property - a dense entity-indexed map - and the system
//! notifies it as entities come and go. The netlist core, placement, and timing all
//! attach their data this same way, without extending the entity types themselves.
//!

// Std-Lib
use std::fmt;
use std::sync::{Arc, RwLock};

// Crates.io
use serde::{Deserialize, Serialize};
use slotmap::{Key, SecondaryMap, SlotMap};

// Local Imports
use crate::error::{EntityKind, NetlistError, NetlistResult};
use crate::ptr::Ptr;

/// Notification interface for entity-keyed attribute stores.
///
/// Implementers own a mapping from entity key to some value type of their choosing,
/// and keep it in lock-step with the system's live-entity set via these two hooks.
pub trait EntityProperty<K: Key> {
    /// A fresh entity `key` was allocated; backfill a default slot for it.
    fn created(&mut self, key: K);
    /// Entity `key` was destroyed; drop or invalidate its slot.
    fn destroyed(&mut self, key: K);
}

///
/// # Entity System
///
/// Allocates entity keys and tracks which are currently live,
/// broadcasting creation and destruction to every registered [EntityProperty].
///
pub struct EntitySystem<K: Key + 'static> {
    /// Which entity namespace this system manages, for error reporting
    kind: EntityKind,
    /// Live-entity slots. Values are unit; all data lives in properties.
    slots: SlotMap<K, ()>,
    /// Registered attribute stores
    properties: Vec<Ptr<dyn EntityProperty<K>>>,
}
impl<K: Key + 'static> EntitySystem<K> {
    /// Create a new and empty [EntitySystem]
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            slots: SlotMap::with_key(),
            properties: Vec::new(),
        }
    }
    /// Get this system's [EntityKind]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }
    /// Allocate a fresh entity, not equal to any currently-live one.
    /// Registered properties are notified to backfill a default slot.
    pub fn create(&mut self) -> NetlistResult<K> {
        let key = self.slots.insert(());
        for prop in &self.properties {
            prop.write()?.created(key);
        }
        Ok(key)
    }
    /// Destroy a live entity, invalidating `key` for all registered properties.
    /// Destroying a stale, already-destroyed, or null key is an error.
    pub fn destroy(&mut self, key: K) -> NetlistResult<()> {
        self.slots
            .remove(key)
            .ok_or(NetlistError::UnknownEntity { kind: self.kind })?;
        for prop in &self.properties {
            prop.write()?.destroyed(key);
        }
        Ok(())
    }
    /// Number of live entities
    pub fn len(&self) -> usize {
        self.slots.len()
    }
    /// Boolean indication of whether the system is empty
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
    /// Boolean indication of whether `key` refers to a live entity
    pub fn is_valid(&self, key: K) -> bool {
        self.slots.contains_key(key)
    }
    /// Iterate over all live entity keys
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.slots.keys()
    }
    /// Register an attribute store, backfilling default slots for every live entity.
    /// The registrant keeps its own handle on `prop` for subsequent `get`/`set` access;
    /// the system only drives the [EntityProperty] notifications.
    pub fn register<P: EntityProperty<K> + 'static>(&mut self, prop: &Ptr<P>) -> NetlistResult<()> {
        // Clone the concrete Arc first; it unsizes to the trait object at the binding.
        let arc: Arc<RwLock<dyn EntityProperty<K>>> = prop.inner().clone();
        let prop = Ptr::from_arc(arc);
        {
            let mut guard = prop.write()?;
            for key in self.slots.keys() {
                guard.created(key);
            }
        }
        self.properties.push(prop);
        Ok(())
    }
}
impl<K: Key + 'static> fmt::Debug for EntitySystem<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("EntitySystem")
            .field("kind", &self.kind)
            .field("len", &self.slots.len())
            .field("properties", &self.properties.len())
            .finish()
    }
}

///
/// # Property Map
///
/// Ready-made dense [EntityProperty]: a [SecondaryMap] plus a default value.
/// Reading a key with no slot (stale, or never backfilled) yields the default.
///
/// Typical use, e.g. from a placement engine:
///
/// ```text
/// let positions = Ptr::new(PropertyMap::<CellKey, Point>::new(Point::default()));
/// netlist.register_cell_property(&positions)?;
/// positions.write()?.set(cell, point);
/// ```
///
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyMap<K: Key, V> {
    slots: SecondaryMap<K, V>,
    default: V,
}
impl<K: Key, V: Clone> PropertyMap<K, V> {
    /// Create a new [PropertyMap] whose unset slots read as `default`
    pub fn new(default: V) -> Self {
        Self {
            slots: SecondaryMap::new(),
            default,
        }
    }
    /// Get the value for `key`
    pub fn get(&self, key: K) -> &V {
        self.slots.get(key).unwrap_or(&self.default)
    }
    /// Get a mutable reference to the value for `key`,
    /// backfilling the default if its slot is empty.
    /// Returns [None] only for the null key.
    pub fn get_mut(&mut self, key: K) -> Option<&mut V> {
        let default = self.default.clone();
        self.slots.entry(key).map(|e| e.or_insert(default))
    }
    /// Set the value for `key`. Setting the null key is a no-op.
    pub fn set(&mut self, key: K, value: V) {
        if !key.is_null() {
            self.slots.insert(key, value);
        }
    }
}
impl<K: Key, V: Clone> EntityProperty<K> for PropertyMap<K, V> {
    fn created(&mut self, key: K) {
        self.slots.insert(key, self.default.clone());
    }
    fn destroyed(&mut self, key: K) {
        self.slots.remove(key);
    }
}
