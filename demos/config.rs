use deco_planner::{BuhlmannConfig, BuhlmannModel, CeilingType, DecoModel, Depth, Gas, NDLType, Time};

fn main() {
    let config = BuhlmannConfig::new()
        .with_gradient_factors(30, 70)
        .with_surface_pressure(1013)
        .with_deco_ascent_rate(9.)
        .with_ceiling_type(CeilingType::Adaptive)
        .with_round_ceiling(true)
        .with_ndl_type(NDLType::ByCeiling);

    let mut model = match BuhlmannModel::new(config) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };

    let air = Gas::air();
    model
        .record(Depth::from_meters(30.), Time::from_minutes(25.), &air)
        .unwrap();

    println!("config: {:?}", model.config());
    println!("adaptive ceiling (rounded): {}", model.ceiling());
    println!("NDL: {} min", model.ndl().as_minutes());
}
