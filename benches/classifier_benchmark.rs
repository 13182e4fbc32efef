use criterion::{black_box, criterion_group, criterion_main, Criterion};
use faq_intent::dataset::seed_records;
use faq_intent::{Classifier, TrainingConfig};

fn setup_benchmark_classifier() -> Classifier {
    Classifier::builder()
        .add_examples(seed_records())
        .unwrap()
        .build()
        .unwrap()
}

fn bench_vectorization(c: &mut Criterion) {
    let classifier = setup_benchmark_classifier();
    let vectorizer = classifier.vectorizer();
    let mut group = c.benchmark_group("Vectorization");

    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    group.bench_function("short_text", |b| b.iter(|| {
        vectorizer.transform(black_box("hostel fees"))
    }));

    group.bench_function("long_text", |b| b.iter(|| {
        vectorizer.transform(black_box(
            "I would like to know what courses are offered, how the admission \
             process works, what the fee structure looks like and whether a \
             hostel is available for first year students. Also, what are the \
             college timings and how good are the placements?"
        ))
    }));

    group.finish();
}

fn bench_prediction(c: &mut Criterion) {
    let classifier = setup_benchmark_classifier();
    let mut group = c.benchmark_group("Prediction");
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    group.bench_function("predict", |b| b.iter(|| {
        classifier.predict(black_box("What is the fee for the hostel?")).unwrap()
    }));

    group.finish();
}

fn bench_training(c: &mut Criterion) {
    let records = seed_records();
    let mut group = c.benchmark_group("Training");
    group.sample_size(10);

    group.bench_function("seed_dataset", |b| b.iter(|| {
        faq_intent::training::run_training(black_box(&records), &TrainingConfig::default()).unwrap()
    }));

    group.finish();
}

fn bench_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("Scaling");
    group.sample_size(20);
    group.warm_up_time(std::time::Duration::from_secs(1));

    // Prediction cost against the number of intents
    let intent_counts = [2, 5, 10, 20, 50];
    for &count in &intent_counts {
        let mut builder = Classifier::builder();
        for i in 0..count {
            let intent = format!("intent_{}", i);
            builder = builder
                .add_example(&format!("question about topic{} please", i), &intent)
                .unwrap()
                .add_example(&format!("tell me more on topic{}", i), &intent)
                .unwrap();
        }

        let classifier = builder.build().unwrap();

        group.bench_function(format!("intents_{}", count), |b| b.iter(|| {
            classifier.predict(black_box("question about topic3")).unwrap()
        }));
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_vectorization,
    bench_prediction,
    bench_training,
    bench_scaling
);
criterion_main!(benches);
