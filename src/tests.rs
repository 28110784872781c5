//!
//! # netlist21 unit tests
//!

use super::*;

/// Create a [StdCellLib] with a few types, used by most tests
fn sample_lib() -> NetlistResult<Ptr<StdCellLib>> {
    let mut lib = StdCellLib::new();
    let inv = lib.cell_create("INV_X1")?;
    lib.pin_create(inv, "a")?;
    lib.pin_create(inv, "o")?;
    let buf = lib.cell_create("BUF_X1")?;
    lib.pin_create(buf, "i")?;
    lib.pin_create(buf, "z")?;
    let nand = lib.cell_create("NAND2_X1")?;
    lib.pin_create(nand, "a")?;
    lib.pin_create(nand, "b")?;
    lib.pin_create(nand, "o")?;
    Ok(Ptr::new(lib))
}

#[test]
fn entity_identity_survives_slot_reuse() -> NetlistResult<()> {
    let mut sys = EntitySystem::<CellKey>::new(EntityKind::Cell);
    let a = sys.create()?;
    let b = sys.create()?;
    sys.destroy(a)?;
    // The freed slot may be reused, but never under the same key
    let c = sys.create()?;
    assert_ne!(a, c);
    assert!(!sys.is_valid(a));
    assert!(sys.is_valid(b));
    assert!(sys.is_valid(c));
    assert_eq!(sys.len(), 2);
    // Destroying a stale key is an error, consistently
    assert!(matches!(
        sys.destroy(a),
        Err(NetlistError::UnknownEntity { .. })
    ));
    // The null key is distinguishable from every live entity
    assert!(CellKey::null().is_null());
    assert!(!sys.is_valid(CellKey::null()));
    Ok(())
}

#[test]
fn property_map_backfill_and_teardown() -> NetlistResult<()> {
    let mut sys = EntitySystem::<NetKey>::new(EntityKind::Net);
    let before = sys.create()?;
    let weights = Ptr::new(PropertyMap::<NetKey, u32>::new(1));
    sys.register(&weights)?;
    // Entities live at registration time are backfilled with the default
    assert_eq!(*weights.read()?.get(before), 1);
    let after = sys.create()?;
    weights.write()?.set(after, 7);
    assert_eq!(*weights.read()?.get(after), 7);
    sys.destroy(after)?;
    // The slot is reclaimed with the entity; the stale key reads the default
    assert_eq!(*weights.read()?.get(after), 1);
    Ok(())
}

#[test]
fn stdcell_get_or_create() -> NetlistResult<()> {
    let mut lib = StdCellLib::new();
    let inv = lib.cell_create("INV_X1")?;
    assert_eq!(lib.cell_create("INV_X1")?, inv);
    assert_eq!(lib.cell_count(), 1);
    let a = lib.pin_create(inv, "a")?;
    assert_eq!(lib.pin_create(inv, "a")?, a);
    lib.pin_create(inv, "o")?;
    assert_eq!(lib.pin_count(inv)?, 2);
    // Owned pin names are stored qualified
    assert_eq!(lib.pin_name(a)?, "INV_X1:a");
    assert_eq!(lib.pin_find("INV_X1:a")?, a);
    assert_eq!(lib.pin_owner(a)?, inv);
    assert_eq!(lib.cell_name(inv)?, "INV_X1");
    assert!(matches!(
        lib.cell_find("DFF_X1"),
        Err(NetlistError::NotFound { .. })
    ));
    Ok(())
}

#[test]
fn cell_insert_allocates_type_pins() -> NetlistResult<()> {
    let lib = sample_lib()?;
    let mut nl = Netlist::new(lib);
    let u1 = nl.cell_insert("u1", "INV_X1")?;
    assert_eq!(nl.cell_count(), 1);
    assert_eq!(nl.cell_name(u1)?, "u1");
    assert_eq!(nl.cell_find("u1")?, u1);

    // One owned pin per declared type pin, in declaration order
    let pins = nl.cell_pins(u1)?.to_vec();
    assert_eq!(pins.len(), 2);
    assert_eq!(nl.pin_count(), 2);
    assert_eq!(nl.pin_name(pins[0])?, "u1:a");
    assert_eq!(nl.pin_name(pins[1])?, "u1:o");
    for &pin in &pins {
        assert_eq!(nl.pin_owner(pin)?, u1);
        assert!(nl.pin_net(pin)?.is_null());
    }
    assert_eq!(nl.pin_by_name("u1:a")?, pins[0]);

    // The type binding points back into the library
    let ty = nl.cell_std_cell(u1)?;
    assert_eq!(nl.std_cells().read()?.cell_name(ty)?, "INV_X1");
    assert_eq!(nl.std_cells().read()?.pin_name(nl.pin_std_cell(pins[0])?)?, "INV_X1:a");
    Ok(())
}

#[test]
fn cell_insert_name_conflict_mutates_nothing() -> NetlistResult<()> {
    let lib = sample_lib()?;
    let mut nl = Netlist::new(lib);
    nl.cell_insert("u1", "INV_X1")?;
    let err = nl.cell_insert("u1", "NAND2_X1");
    assert!(matches!(err, Err(NetlistError::NameConflict { .. })));
    assert_eq!(nl.cell_count(), 1);
    assert_eq!(nl.pin_count(), 2);
    Ok(())
}

#[test]
fn cell_insert_unknown_type() -> NetlistResult<()> {
    let lib = sample_lib()?;
    let mut nl = Netlist::new(lib);
    let err = nl.cell_insert("u1", "DFF_X1");
    assert!(matches!(err, Err(NetlistError::UnknownType { .. })));
    assert_eq!(nl.cell_count(), 0);
    assert_eq!(nl.pin_count(), 0);
    Ok(())
}

#[test]
fn owned_pin_insert_checks_declared_type_pins() -> NetlistResult<()> {
    let lib = sample_lib()?;
    let mut nl = Netlist::new(lib);
    let u1 = nl.cell_insert("u1", "INV_X1")?;
    // Only pins declared by the cell's type may be inserted
    assert!(matches!(
        nl.pin_insert(u1, "zz"),
        Err(NetlistError::UnknownType { .. })
    ));
    // The declared pins already exist under their derived names
    assert!(matches!(
        nl.pin_insert(u1, "a"),
        Err(NetlistError::NameConflict { .. })
    ));
    assert_eq!(nl.pin_count(), 2);
    assert_eq!(nl.cell_pins(u1)?.len(), 2);
    Ok(())
}

#[test]
fn connect_disconnect_inverse() -> NetlistResult<()> {
    let lib = sample_lib()?;
    let mut nl = Netlist::new(lib);
    let u1 = nl.cell_insert("u1", "INV_X1")?;
    let p0 = nl.cell_pins(u1)?[0];
    let n1 = nl.net_insert("n1")?;

    nl.connect(n1, p0)?;
    assert_eq!(nl.net_pins(n1)?, &[p0]);
    assert_eq!(nl.pin_net(p0)?, n1);

    nl.disconnect(p0)?;
    assert_eq!(nl.net_pins(n1)?, &[] as &[PinKey]);
    assert!(nl.pin_net(p0)?.is_null());

    // Disconnecting an already-disconnected pin is a benign no-op
    nl.disconnect(p0)?;
    assert!(nl.pin_net(p0)?.is_null());
    Ok(())
}

#[test]
fn connect_preserves_insertion_order() -> NetlistResult<()> {
    let lib = sample_lib()?;
    let mut nl = Netlist::new(lib);
    let u1 = nl.cell_insert("u1", "NAND2_X1")?;
    let pins = nl.cell_pins(u1)?.to_vec();
    let n1 = nl.net_insert("n1")?;
    nl.connect(n1, pins[0])?;
    nl.connect(n1, pins[1])?;
    nl.connect(n1, pins[2])?;
    assert_eq!(nl.net_pins(n1)?, &[pins[0], pins[1], pins[2]]);
    // Removing from the middle keeps the rest in order
    nl.disconnect(pins[1])?;
    assert_eq!(nl.net_pins(n1)?, &[pins[0], pins[2]]);
    Ok(())
}

#[test]
fn connect_twice_is_rejected() -> NetlistResult<()> {
    let lib = sample_lib()?;
    let mut nl = Netlist::new(lib);
    let u1 = nl.cell_insert("u1", "INV_X1")?;
    let p0 = nl.cell_pins(u1)?[0];
    let n1 = nl.net_insert("n1")?;
    let n2 = nl.net_insert("n2")?;
    nl.connect(n1, p0)?;
    // No silent reassignment
    assert!(matches!(
        nl.connect(n2, p0),
        Err(NetlistError::InvalidState(_))
    ));
    assert_eq!(nl.pin_net(p0)?, n1);
    assert_eq!(nl.net_pins(n1)?, &[p0]);
    assert_eq!(nl.net_pins(n2)?, &[] as &[PinKey]);
    Ok(())
}

#[test]
fn net_insert_name_conflict() -> NetlistResult<()> {
    let lib = sample_lib()?;
    let mut nl = Netlist::new(lib);
    nl.net_insert("n1")?;
    assert!(matches!(
        nl.net_insert("n1"),
        Err(NetlistError::NameConflict { .. })
    ));
    assert_eq!(nl.net_count(), 1);
    Ok(())
}

#[test]
fn net_remove_rejects_connected_net() -> NetlistResult<()> {
    let lib = sample_lib()?;
    let mut nl = Netlist::new(lib);
    let u1 = nl.cell_insert("u1", "INV_X1")?;
    let p0 = nl.cell_pins(u1)?[0];
    let n1 = nl.net_insert("n1")?;
    nl.connect(n1, p0)?;
    assert!(matches!(
        nl.net_remove(n1),
        Err(NetlistError::InvalidState(_))
    ));
    assert_eq!(nl.net_count(), 1);
    nl.disconnect(p0)?;
    nl.net_remove(n1)?;
    assert_eq!(nl.net_count(), 0);
    assert!(nl.net_by_name("n1").is_err());
    // The name is freed; a fresh insert yields a distinct net
    let n1b = nl.net_insert("n1")?;
    assert_ne!(n1, n1b);
    Ok(())
}

#[test]
fn cell_remove_rejects_connected_pins() -> NetlistResult<()> {
    let lib = sample_lib()?;
    let mut nl = Netlist::new(lib);
    let u1 = nl.cell_insert("u1", "INV_X1")?;
    let p0 = nl.cell_pins(u1)?[0];
    let n1 = nl.net_insert("n1")?;
    nl.connect(n1, p0)?;
    assert!(matches!(
        nl.cell_remove(u1),
        Err(NetlistError::InvalidState(_))
    ));
    assert_eq!(nl.cell_count(), 1);
    assert_eq!(nl.pin_count(), 2);

    nl.disconnect(p0)?;
    nl.cell_remove(u1)?;
    assert_eq!(nl.cell_count(), 0);
    assert_eq!(nl.pin_count(), 0);
    assert!(nl.cell_find("u1").is_err());
    assert!(nl.pin_by_name("u1:a").is_err());
    assert!(!nl.cell_system().is_valid(u1));
    Ok(())
}

#[test]
fn cell_name_reusable_after_remove() -> NetlistResult<()> {
    let lib = sample_lib()?;
    let mut nl = Netlist::new(lib);
    let u1 = nl.cell_insert("u1", "INV_X1")?;
    nl.cell_remove(u1)?;
    let u1b = nl.cell_insert("u1", "NAND2_X1")?;
    assert_ne!(u1, u1b);
    assert_eq!(nl.cell_find("u1")?, u1b);
    assert_eq!(nl.cell_pins(u1b)?.len(), 3);
    Ok(())
}

#[test]
fn cell_type_change_checks_pin_arity() -> NetlistResult<()> {
    let lib = sample_lib()?;
    let mut nl = Netlist::new(lib);
    let u1 = nl.cell_insert("u1", "INV_X1")?;
    let pins_before = nl.cell_pins(u1)?.to_vec();
    let ty_before = nl.cell_std_cell(u1)?;

    // NAND2_X1 declares three pins; the change is rejected with no mutation
    let err = nl.cell_std_cell_set_by_name(u1, "NAND2_X1");
    assert!(matches!(
        err,
        Err(NetlistError::TypeMismatch { have: 2, want: 3 })
    ));
    assert_eq!(nl.cell_std_cell(u1)?, ty_before);
    assert_eq!(nl.cell_pins(u1)?, pins_before.as_slice());
    assert_eq!(nl.pin_by_name("u1:a")?, pins_before[0]);

    // BUF_X1 declares two pins; the change re-binds each pin by position
    nl.cell_std_cell_set_by_name(u1, "BUF_X1")?;
    let buf = nl.std_cells().read()?.cell_find("BUF_X1")?;
    assert_eq!(nl.cell_std_cell(u1)?, buf);
    assert_eq!(nl.cell_pins(u1)?, pins_before.as_slice());
    // Derived names are computed on demand and the index is refreshed
    assert_eq!(nl.pin_name(pins_before[0])?, "u1:i");
    assert_eq!(nl.pin_name(pins_before[1])?, "u1:z");
    assert_eq!(nl.pin_by_name("u1:i")?, pins_before[0]);
    assert!(nl.pin_by_name("u1:a").is_err());
    Ok(())
}

#[test]
fn primary_io_insert_remove() -> NetlistResult<()> {
    let lib = sample_lib()?;
    let mut nl = Netlist::new(lib);
    let a = nl.pi_insert("inp0")?;
    let b = nl.pi_insert("inp1")?;
    let c = nl.pi_insert("inp2")?;
    assert_eq!(nl.pi_count(), 3);
    assert_eq!(nl.primary_inputs(), &[a, b, c]);
    assert!(nl.pin_owner(a)?.is_null());
    // Owner-less pins take the bare type-pin name
    assert_eq!(nl.pin_name(a)?, "inp0");
    assert_eq!(nl.pin_by_name("inp1")?, b);

    // Swap-with-last-and-pop: the last element fills the freed slot
    nl.pi_remove(b)?;
    assert_eq!(nl.pi_count(), 2);
    assert_eq!(nl.primary_inputs(), &[a, c]);
    assert!(nl.pin_by_name("inp1").is_err());
    assert!(!nl.pin_system().is_valid(b));

    let z = nl.po_insert("out0")?;
    assert_eq!(nl.po_count(), 1);
    assert_eq!(nl.primary_outputs(), &[z]);
    nl.po_remove(z)?;
    assert_eq!(nl.po_count(), 0);
    Ok(())
}

#[test]
fn primary_input_remove_rejects_connected() -> NetlistResult<()> {
    let lib = sample_lib()?;
    let mut nl = Netlist::new(lib);
    let a = nl.pi_insert("inp0")?;
    let n1 = nl.net_insert("n1")?;
    nl.connect(n1, a)?;
    assert!(matches!(
        nl.pi_remove(a),
        Err(NetlistError::InvalidState(_))
    ));
    assert_eq!(nl.pi_count(), 1);
    nl.disconnect(a)?;
    nl.pi_remove(a)?;
    assert_eq!(nl.pi_count(), 0);
    Ok(())
}

#[test]
fn pi_name_conflict() -> NetlistResult<()> {
    let lib = sample_lib()?;
    let mut nl = Netlist::new(lib);
    nl.pi_insert("inp0")?;
    assert!(matches!(
        nl.pi_insert("inp0"),
        Err(NetlistError::NameConflict { .. })
    ));
    assert_eq!(nl.pi_count(), 1);
    assert_eq!(nl.pin_count(), 1);
    Ok(())
}

#[test]
fn register_cell_property_via_netlist() -> NetlistResult<()> {
    let lib = sample_lib()?;
    let mut nl = Netlist::new(lib);
    let u1 = nl.cell_insert("u1", "INV_X1")?;

    // e.g. a placement engine attaching positions to cells
    let positions = Ptr::new(PropertyMap::<CellKey, (i64, i64)>::new((0, 0)));
    nl.register_cell_property(&positions)?;
    assert_eq!(*positions.read()?.get(u1), (0, 0));

    let u2 = nl.cell_insert("u2", "INV_X1")?;
    positions.write()?.set(u2, (400, 200));
    assert_eq!(*positions.read()?.get(u2), (400, 200));

    nl.cell_remove(u2)?;
    assert_eq!(*positions.read()?.get(u2), (0, 0));
    Ok(())
}

#[test]
fn module_name_and_net_names() -> NetlistResult<()> {
    let lib = sample_lib()?;
    let mut nl = Netlist::new(lib);
    assert_eq!(nl.module_name(), "");
    nl.set_module_name("top");
    assert_eq!(nl.module_name(), "top");

    nl.net_insert("n1")?;
    nl.net_insert("n2")?;
    let mut names: Vec<&str> = nl.net_names().collect();
    names.sort_unstable();
    assert_eq!(names, vec!["n1", "n2"]);
    Ok(())
}

/// The end-to-end scenario: a library type, a cell, a net, connect and disconnect
#[test]
fn inverter_scenario() -> NetlistResult<()> {
    let mut lib = StdCellLib::new();
    let inv = lib.cell_create("INV_X1")?;
    lib.pin_create(inv, "a")?;
    lib.pin_create(inv, "o")?;
    assert_eq!(lib.pin_count(inv)?, 2);

    let mut nl = Netlist::new(Ptr::new(lib));
    let u1 = nl.cell_insert("u1", "INV_X1")?;
    assert_eq!(nl.cell_pins(u1)?.len(), 2);
    for &pin in nl.cell_pins(u1)? {
        assert!(nl.pin_name(pin)?.starts_with("u1:"));
    }

    let n1 = nl.net_insert("n1")?;
    let pin0 = nl.cell_pins(u1)?[0];
    nl.connect(n1, pin0)?;
    assert_eq!(nl.net_pins(n1)?, &[pin0]);
    assert_eq!(nl.pin_net(pin0)?, n1);

    nl.disconnect(pin0)?;
    assert_eq!(nl.net_pins(n1)?, &[] as &[PinKey]);
    assert!(nl.pin_net(pin0)?.is_null());
    Ok(())
}
