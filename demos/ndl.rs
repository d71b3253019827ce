use deco_planner::{BuhlmannModel, DecoModel, Depth, Gas, Time};

fn main() {
    let mut model = BuhlmannModel::default();

    let air = Gas::air();
    let depth = Depth::from_meters(30.);

    model.record(depth, Time::zero(), &air).unwrap();
    println!("NDL at {}: {} min", depth, model.ndl().as_minutes());

    model.record(depth, Time::from_minutes(10.), &air).unwrap();
    println!(
        "NDL after 10 min bottom time: {} min",
        model.ndl().as_minutes()
    );
}
