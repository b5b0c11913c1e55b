use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal_macros::dec;

use debt_engine::{simulate, Debt, HybridWeights, Strategy};

fn portfolio() -> Vec<Debt> {
    vec![
        Debt::new("Visa", dec!(5200), dec!(0.199), dec!(156)).with_stress_score(dec!(6)),
        Debt::new("Mastercard", dec!(3100), dec!(0.224), dec!(93)).with_stress_score(dec!(4)),
        Debt::new("Car loan", dec!(14500), dec!(0.064), dec!(310)),
        Debt::new("Student loan", dec!(22000), dec!(0.049), dec!(260)),
        Debt::new("Personal loan", dec!(8000), dec!(0.112), dec!(210)).with_variable_rate(),
        Debt::new("Medical", dec!(1900), dec!(0.0), dec!(60)).with_stress_score(dec!(8)),
        Debt::new("Store card", dec!(750), dec!(0.269), dec!(35)),
        Debt::new("Furniture", dec!(2400), dec!(0.159), dec!(85)),
        Debt::new("Family loan", dec!(4000), dec!(0.02), dec!(100)).with_stress_score(dec!(9)),
        Debt::new("Line of credit", dec!(6300), dec!(0.131), dec!(170)).with_variable_rate(),
    ]
}

fn bench_strategies(c: &mut Criterion) {
    let debts = portfolio();
    let weights = HybridWeights::default();

    let mut group = c.benchmark_group("simulate");
    for strategy in Strategy::ALL {
        group.bench_function(format!("{strategy:?}"), |b| {
            b.iter(|| simulate(black_box(strategy), black_box(&debts), dec!(400), &weights))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_strategies);
criterion_main!(benches);
