use deco_planner::{BuhlmannModel, DecoModel, Depth, Gas, Time};

fn main() {
    let mut model = BuhlmannModel::default();
    let air = Gas::air();
    let tmx = Gas::new(0.21, 0.35).unwrap();

    model
        .record(Depth::from_meters(40.), Time::from_minutes(30.), &air)
        .unwrap();
    println!("ceiling after air segment: {}", model.ceiling());

    model
        .record(Depth::from_meters(40.), Time::from_minutes(10.), &tmx)
        .unwrap();
    println!("ceiling after trimix segment: {}", model.ceiling());
    println!("in deco: {}", model.in_deco());
    println!("supersaturation: {:?}", model.supersaturation());
}
