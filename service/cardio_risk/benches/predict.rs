use cardio_model::{
    ArtifactError, ArtifactSource, Artifacts, LogisticRegression, ModelLoader, StandardScaler,
};
use cardio_risk::{FeatureVector, RiskPredictor, FEATURE_COUNT};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

struct BenchSource;

impl ArtifactSource for BenchSource {
    fn load(&self) -> Result<Artifacts, ArtifactError> {
        let weights: Vec<f64> = (0..FEATURE_COUNT).map(|i| (i as f64 - 10.0) / 20.0).collect();
        Artifacts::new(
            Box::new(LogisticRegression::binary(["0", "1"], weights, -0.25)),
            Box::new(StandardScaler::new(
                vec![40.0; FEATURE_COUNT],
                vec![15.0; FEATURE_COUNT],
            )),
        )
    }

    fn describe(&self) -> String {
        "bench".into()
    }
}

fn bench_predict(c: &mut Criterion) {
    let predictor = RiskPredictor::new(ModelLoader::new(BenchSource));
    let mut values = [0.0; FEATURE_COUNT];
    for (i, v) in values.iter_mut().enumerate() {
        *v = 10.0 + i as f64 * 3.5;
    }
    let params = FeatureVector::new(values).to_parameters();

    // warm the loader so the loop measures scoring only
    predictor.predict(&params);

    c.bench_function("predict_scored", |b| {
        b.iter(|| predictor.predict(black_box(&params)))
    });

    let mut incomplete = params.clone();
    incomplete.remove("age");
    c.bench_function("predict_fallback", |b| {
        b.iter(|| predictor.predict(black_box(&incomplete)))
    });
}

criterion_group!(benches, bench_predict);
criterion_main!(benches);
