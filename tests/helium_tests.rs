use deco_planner::{DecoModel, Depth, Gas, Supersaturation, Time};
pub mod fixtures;

#[test]
fn test_trimix_ceiling() {
    let mut model = fixtures::model_default();
    let tmx = Gas::new(0.21, 0.35).unwrap();
    model
        .record(Depth::from_meters(45.), Time::from_minutes(25.), &tmx)
        .unwrap();
    assert_close_to_percent!(model.ceiling().as_meters(), 9.428811607799242, 0.5);
}

#[test]
fn test_trimix_supersaturation() {
    let mut model = fixtures::model_default();
    let tmx = Gas::new(0.21, 0.35).unwrap();
    model
        .record(Depth::from_meters(45.), Time::from_minutes(25.), &tmx)
        .unwrap();
    let Supersaturation { gf_surf, .. } = model.supersaturation();
    assert_close_to_abs!(gf_surf, 201.54031640051807, 0.1);
}

#[test]
fn test_helium_loading() {
    let mut model = fixtures::model_default();
    let tmx = Gas::new(0.21, 0.35).unwrap();
    model
        .record(Depth::from_meters(45.), Time::from_minutes(25.), &tmx)
        .unwrap();

    // helium builds up fast in the faster compartments
    let tissues = model.tissue_pressures();
    assert_close_to_abs!(tissues[3].he, 1.7477069158638463, 1e-6);
    assert_close_to_abs!(tissues[3].n2, 1.7524770988592007, 1e-6);
    for tissue in &tissues {
        assert!(tissue.he > 0.);
        assert_eq!(tissue.total, tissue.n2 + tissue.he);
    }
}

#[test]
fn test_helium_offgassing_faster_than_nitrogen() {
    let mut model = fixtures::model_default();
    let tmx = Gas::new(0.21, 0.35).unwrap();
    model
        .record(Depth::from_meters(45.), Time::from_minutes(25.), &tmx)
        .unwrap();
    let loaded = model.tissue_pressures();

    let air = fixtures::gas_air();
    model
        .record(Depth::from_meters(6.), Time::from_minutes(30.), &air)
        .unwrap();
    let rested = model.tissue_pressures();

    // relative helium washout outpaces nitrogen in every compartment
    for (before, after) in loaded.iter().zip(rested.iter()) {
        let he_ratio = after.he / before.he;
        let n2_ratio = after.n2 / before.n2;
        assert!(he_ratio < n2_ratio);
    }
}
