use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use vialeve_core::model::{AnswerRecord, Excipient, OrganFunction, YesNo};
use vialeve_core::rules::{evaluate, RuleConfig};

fn reference() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, 30).unwrap()
}

fn clear_record() -> AnswerRecord {
    AnswerRecord {
        full_name: Some("Maria da Silva".into()),
        email: Some("maria@exemplo.com".into()),
        birth_date: NaiveDate::from_ymd_opt(1985, 6, 1),
        weight_kg: Some(90.0),
        height_m: Some(1.70),
        has_comorbidities: Some(YesNo::No),
        excipient_allergies: vec![Excipient::NoKnownAllergy],
        ..Default::default()
    }
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    let config = RuleConfig::default();

    group.bench_function("all_clear", |b| {
        let answers = clear_record();
        b.iter(|| {
            let mut answers = answers.clone();
            evaluate(black_box(&mut answers), black_box(reference()), &config)
        })
    });

    group.bench_function("every_rule_fires", |b| {
        let answers = AnswerRecord {
            birth_date: NaiveDate::from_ymd_opt(2010, 5, 1),
            weight_kg: Some(70.0),
            height_m: Some(1.80),
            has_comorbidities: Some(YesNo::No),
            pregnancy: Some(YesNo::Yes),
            breastfeeding: Some(YesNo::Yes),
            cancer_treatment: Some(YesNo::Yes),
            severe_gi_disease: Some(YesNo::Yes),
            gastroparesis: Some(YesNo::Yes),
            prior_pancreatitis: Some(YesNo::Yes),
            mtc_men2_history: Some(YesNo::Yes),
            cholecystitis_12m: Some(YesNo::Yes),
            renal_function: Some(OrganFunction::Severe),
            hepatic_function: Some(OrganFunction::Moderate),
            eating_disorder: Some(YesNo::Yes),
            chronic_corticosteroid: Some(YesNo::Yes),
            antipsychotic_use: Some(YesNo::Yes),
            glp1_allergy: Some(YesNo::Yes),
            excipient_allergies: vec![Excipient::PolyethyleneGlycol],
            ..Default::default()
        };
        b.iter(|| {
            let mut answers = answers.clone();
            evaluate(black_box(&mut answers), black_box(reference()), &config)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
