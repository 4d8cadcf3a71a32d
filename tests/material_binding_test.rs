use glowgate::scene::{
    BAKED_NODE, MaterialBindings, MaterialKind, NodeTable, POLE_LIGHT_L_NODE, POLE_LIGHT_R_NODE,
    PORTAL_NODE,
};

fn full_table() -> NodeTable {
    // The export also carries unnamed clutter; an extra node must not
    // influence the binding.
    NodeTable::from_names([
        BAKED_NODE,
        POLE_LIGHT_L_NODE,
        POLE_LIGHT_R_NODE,
        PORTAL_NODE,
        "grass",
    ])
}

#[test]
fn should_assign_each_expected_node_exactly_one_material() {
    let table = full_table();
    let mut bindings = MaterialBindings::default();
    bindings.bind(&table).unwrap();

    assert_eq!(bindings.assignments().len(), 4);
    assert_eq!(
        bindings.kind_of(table.index_of(BAKED_NODE).unwrap()),
        Some(MaterialKind::Baked)
    );
    assert_eq!(
        bindings.kind_of(table.index_of(POLE_LIGHT_L_NODE).unwrap()),
        Some(MaterialKind::PoleLight)
    );
    assert_eq!(
        bindings.kind_of(table.index_of(POLE_LIGHT_R_NODE).unwrap()),
        Some(MaterialKind::PoleLight)
    );
    assert_eq!(
        bindings.kind_of(table.index_of(PORTAL_NODE).unwrap()),
        Some(MaterialKind::Portal)
    );
    assert_eq!(bindings.kind_of(table.index_of("grass").unwrap()), None);
}

#[test]
fn should_be_idempotent_when_bound_twice() {
    let table = full_table();
    let mut bindings = MaterialBindings::default();
    bindings.bind(&table).unwrap();
    let first = bindings.clone();

    bindings.bind(&table).unwrap();

    assert_eq!(bindings, first);
}

#[test]
fn should_fail_loudly_when_the_portal_node_is_missing() {
    let table = NodeTable::from_names([BAKED_NODE, POLE_LIGHT_L_NODE, POLE_LIGHT_R_NODE]);
    let mut bindings = MaterialBindings::default();

    let err = bindings.bind(&table).unwrap_err();

    assert!(err.to_string().contains(PORTAL_NODE));
    // A failed bind must not leave a partial assignment behind.
    assert!(bindings.is_empty());
}

#[test]
fn should_name_every_missing_node_in_the_error() {
    let table = NodeTable::from_names([BAKED_NODE, POLE_LIGHT_L_NODE]);
    let mut bindings = MaterialBindings::default();

    let err = bindings.bind(&table).unwrap_err().to_string();

    assert!(err.contains(POLE_LIGHT_R_NODE));
    assert!(err.contains(PORTAL_NODE));
    assert!(bindings.is_empty());
}

#[test]
fn should_resolve_duplicate_names_to_the_first_occurrence() {
    let table = NodeTable::from_names([PORTAL_NODE, BAKED_NODE, PORTAL_NODE]);

    assert_eq!(table.index_of(PORTAL_NODE), Some(0));
    assert_eq!(table.index_of(BAKED_NODE), Some(1));
}
