use faq_intent::dataset::seed_records;
use faq_intent::{Classifier, TrainingConfig};
use std::sync::Arc;
use std::thread;

fn setup_test_classifier() -> Classifier {
    Classifier::builder()
        .with_training_config(TrainingConfig {
            c: 10.0,
            ..TrainingConfig::default()
        })
        .add_examples(seed_records())
        .unwrap()
        .build()
        .expect("Failed to create classifier")
}

#[test]
fn test_end_to_end_classification() -> Result<(), Box<dyn std::error::Error>> {
    let classifier = setup_test_classifier();

    let (intent, scores) = classifier.predict("Is there a hostel for students?")?;
    assert_eq!(intent, "hostel");
    assert_eq!(scores.len(), 6);
    assert!(scores.values().all(|&p| (0.0..=1.0).contains(&p)));
    assert!((scores.values().sum::<f32>() - 1.0).abs() < 1e-4);
    Ok(())
}

#[test]
fn test_recovers_seed_intents() -> Result<(), Box<dyn std::error::Error>> {
    let classifier = setup_test_classifier();
    let records = seed_records();
    let correct = records
        .iter()
        .filter(|r| classifier.predict_intent(&r.question).ok().as_deref() == Some(r.intent.as_str()))
        .count();
    assert!(
        correct as f32 / records.len() as f32 >= 0.9,
        "only {} of {} seed questions recovered",
        correct,
        records.len()
    );
    Ok(())
}

#[test]
fn test_case_and_punctuation_insensitive() -> Result<(), Box<dyn std::error::Error>> {
    let classifier = setup_test_classifier();
    let (a, _) = classifier.predict("WHICH COMPANIES VISIT FOR PLACEMENTS???")?;
    let (b, _) = classifier.predict("which companies visit for placements")?;
    assert_eq!(a, b);
    assert_eq!(a, "placements");
    Ok(())
}

#[test]
fn test_unknown_vocabulary_still_predicts() -> Result<(), Box<dyn std::error::Error>> {
    let classifier = setup_test_classifier();
    let (intent, scores) = classifier.predict("zzz qqq xyzzy")?;
    assert!(classifier.info().class_labels.contains(&intent));
    assert!((scores.values().sum::<f32>() - 1.0).abs() < 1e-4);
    Ok(())
}

#[test]
fn test_concurrent_predictions() -> Result<(), Box<dyn std::error::Error>> {
    let classifier = Arc::new(setup_test_classifier());
    let questions = [
        "What is the fee structure?",
        "Is hostel facility available?",
        "What are the college timings?",
    ];

    let handles: Vec<_> = questions
        .iter()
        .map(|&question| {
            let classifier = Arc::clone(&classifier);
            thread::spawn(move || classifier.predict_intent(question).unwrap())
        })
        .collect();

    let results: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec!["fees", "hostel", "timings"]);
    Ok(())
}
