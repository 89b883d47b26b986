use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_validator::{CategoricalField, PaintCondition, VehicleAttributes};
use feature_engine::FeatureAssembler;
use reference_data::ReferenceVocabulary;

fn vocabulary() -> ReferenceVocabulary {
    let models: Vec<String> = (0..1000).map(|i| format!("model-{:04}", i)).collect();
    ReferenceVocabulary::default()
        .with_values(CategoricalField::Brand, ["Toyota", "Renault", "Fiat", "BMW"])
        .with_values(CategoricalField::Series, ["Corolla", "Clio", "Egea", "3 Serisi"])
        .with_values(CategoricalField::Model, &models)
        .with_values(CategoricalField::BodyType, ["Sedan", "Hatchback", "SUV"])
        .with_values(CategoricalField::DrivetrainType, ["Önden Çekiş", "Arkadan İtiş"])
        .with_values(CategoricalField::Color, ["Beyaz", "Siyah", "Gri", "Kırmızı", "Mavi"])
}

fn bench_assemble(c: &mut Criterion) {
    let assembler = FeatureAssembler::fit(&vocabulary());
    let attributes = VehicleAttributes {
        mileage_km: 85_000,
        model_year: 2018,
        engine_displacement_cc: 1598,
        engine_power_hp: 132,
        annual_tax_amount: 2500.0,
        damage_compensation_amount: 12_000.0,
        brand: "Toyota".into(),
        series: "Corolla".into(),
        model: "model-0500".into(),
        transmission_type: "Otomatik".into(),
        fuel_type: "Benzin".into(),
        body_type: "Sedan".into(),
        color: "Gri".into(),
        drivetrain_type: "Önden Çekiş".into(),
        paint_condition: PaintCondition::LocalPaint,
    };

    c.bench_function("assemble_feature_vector", |b| {
        b.iter(|| assembler.assemble(black_box(&attributes)))
    });
}

criterion_group!(benches, bench_assemble);
criterion_main!(benches);
