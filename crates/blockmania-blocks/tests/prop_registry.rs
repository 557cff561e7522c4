use blockmania_blocks::config::{BlockDef, BlocksConfig};
use blockmania_blocks::{BlockForm, BlockRegistry};
use proptest::prelude::*;

fn def(name: &str, id: Option<u8>) -> BlockDef {
    BlockDef {
        name: name.into(),
        id,
        translucent: None,
        invisible: None,
        form: None,
        luminance: None,
    }
}

#[test]
fn auto_ids_follow_highest_explicit_id() {
    let cfg = BlocksConfig {
        blocks: vec![def("stone", Some(4)), def("dirt", None), def("clay", None)],
    };
    let reg = BlockRegistry::from_config(cfg).expect("registry");
    assert_eq!(reg.id_by_name("stone"), Some(4));
    assert_eq!(reg.id_by_name("dirt"), Some(5));
    assert_eq!(reg.id_by_name("clay"), Some(6));
}

#[test]
fn invisible_defaults_to_translucent() {
    let mut ghost = def("ghost", Some(3));
    ghost.invisible = Some(true);
    let reg = BlockRegistry::from_config(BlocksConfig { blocks: vec![ghost] }).unwrap();
    assert!(reg.is_translucent(3));
    assert!(!reg.get(3).covers_sky());
}

#[test]
fn billboard_form_parses_from_toml() {
    let reg = BlockRegistry::from_toml_str(
        r#"
        [[blocks]]
        name = "fern"
        id = 12
        translucent = true
        form = "billboard"
    "#,
    )
    .unwrap();
    assert_eq!(reg.form(12), BlockForm::Billboard);
    assert!(!reg.get(12).covers_sky());
}

#[test]
fn duplicate_names_with_different_ids_are_rejected() {
    let cfg = BlocksConfig {
        blocks: vec![def("stone", Some(1)), def("stone", Some(2))],
    };
    assert!(BlockRegistry::from_config(cfg).is_err());
}

proptest! {
    // Every id resolves, defined or not
    #[test]
    fn every_id_resolves(id in any::<u8>()) {
        let reg = BlockRegistry::builtin();
        prop_assert_eq!(reg.get(id).id, id);
    }

    // Luminance in range is kept verbatim
    #[test]
    fn luminance_round_trips(l in 0u8..=15) {
        let mut d = def("lamp", Some(20));
        d.luminance = Some(l);
        let reg = BlockRegistry::from_config(BlocksConfig { blocks: vec![d] }).unwrap();
        prop_assert_eq!(reg.luminance(20), l);
    }
}
