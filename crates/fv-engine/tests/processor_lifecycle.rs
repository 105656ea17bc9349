//! Processor lifecycle tests against real stores

use fv_core::{HeuristicRequest, Request, Response, Uuid};
use fv_engine::{
    DeleteCause, EngineConfig, EngineError, FileStore, LoadCause, MemoryStore, ProcessorStore,
    RequestDispatcher, RequestProcessor,
};
use fv_heuristics::integer::{
    BIT_FLIPS, BOUNDARY_NUMBERS, NUMERICAL_VARIANCE, RANDOM_NUMBERS,
};
use fv_heuristics::string::{LONG_STRINGS, MAX_STRING_LENGTH, RANDOM_STRINGS};
use fv_heuristics::{IntegerKind, IntegerSpec, StringKind, StringSpec};

fn raw<T: Clone>(response: &Response<T>) -> Vec<T> {
    response.raw_values().cloned().collect()
}

fn continued_request(max_values: usize) -> Request<IntegerSpec> {
    Request::new("ports", max_values)
        .with_seed(1234)
        .with_generator(HeuristicRequest::new(RANDOM_NUMBERS).with_parameter("2"))
        .with_generator(HeuristicRequest::new(BOUNDARY_NUMBERS))
}

#[test]
fn test_same_seed_same_values() {
    let request = Request::<IntegerSpec>::new("ports", 40)
        .with_seed(99)
        .with_valid_values(["80", "443"]);

    let mut first = RequestProcessor::<IntegerKind>::new(request.clone(), Uuid::new_v4());
    let mut second = RequestProcessor::<IntegerKind>::new(request, Uuid::new_v4());

    assert_eq!(
        first.build_response().values,
        second.build_response().values
    );
}

#[test]
fn test_bound_respected_for_every_bound() {
    for max_values in [0, 1, 7, 25, 500] {
        let request = Request::<IntegerSpec>::new("ports", max_values).with_valid_values(["3"]);
        let mut processor = RequestProcessor::<IntegerKind>::new(request, Uuid::new_v4());
        assert!(processor.build_response().values.len() <= max_values);
    }
}

#[test]
fn test_unknown_names_are_tolerated() {
    let request = Request::<IntegerSpec>::new("ports", 10)
        .with_generator(HeuristicRequest::new("Imaginary"))
        .with_generator(HeuristicRequest::new(BOUNDARY_NUMBERS))
        .with_valid_values(["5"])
        .with_operator(HeuristicRequest::new("Phantom"));

    let mut processor = RequestProcessor::<IntegerKind>::new(request, Uuid::new_v4());
    let response = processor.build_response();

    assert_eq!(response.warnings.illegal_generators.len(), 1);
    assert_eq!(response.warnings.illegal_generators[0].name, "Imaginary");
    assert_eq!(response.warnings.illegal_operators.len(), 1);
    assert_eq!(response.warnings.illegal_operators[0].reason, "unknown operator");
    assert!(!response.values.is_empty());
    assert!(
        response
            .values
            .iter()
            .all(|v| v.source_name() == BOUNDARY_NUMBERS)
    );
}

#[test]
fn test_operators_need_valid_values() {
    let without = Request::<IntegerSpec>::new("ports", 1000).without_generators();
    let mut processor = RequestProcessor::<IntegerKind>::new(without, Uuid::new_v4());
    assert_eq!(processor.heuristic_count(), 0);
    assert!(processor.build_response().values.is_empty());

    let with = Request::<IntegerSpec>::new("ports", 1000)
        .without_generators()
        .with_valid_values(["100"]);
    let mut processor = RequestProcessor::<IntegerKind>::new(with, Uuid::new_v4());
    let response = processor.build_response();
    assert!(!response.values.is_empty());
    assert!(
        response
            .values
            .iter()
            .any(|v| v.source_name() == NUMERICAL_VARIANCE)
    );
}

#[test]
fn test_no_generators_still_runs_named_ones() {
    let request = Request::<IntegerSpec>::new("ports", 10)
        .with_generator(HeuristicRequest::new(BOUNDARY_NUMBERS))
        .with_generator(HeuristicRequest::new("Nope"))
        .without_generators();
    let mut processor = RequestProcessor::<IntegerKind>::new(request, Uuid::new_v4());
    assert_eq!(processor.heuristic_count(), 1);

    let response = processor.build_response();
    assert!(!response.values.is_empty());
    assert!(
        response
            .values
            .iter()
            .all(|v| v.source_name() == BOUNDARY_NUMBERS)
    );
    assert_eq!(response.warnings.illegal_generators.len(), 1);
    assert_eq!(response.warnings.illegal_generators[0].name, "Nope");
    assert!(response.warnings.request_warnings.is_empty());
}

#[test]
fn test_malformed_valid_values_are_skipped() {
    let request = Request::<IntegerSpec>::new("ports", 10)
        .with_valid_values(["10", "notanumber", "20"]);
    let mut processor = RequestProcessor::<IntegerKind>::new(request, Uuid::new_v4());

    assert_eq!(processor.valid_values(), [10, 20]);
    assert!(processor.build_response().warnings.is_empty());
}

#[test]
fn test_continuation_matches_single_request() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    let id = Uuid::new_v4();

    let mut processor = RequestProcessor::<IntegerKind>::new(continued_request(3), id);
    let mut values = raw(processor.build_response());
    assert_eq!(values.len(), 3);
    processor.serialize(&store).unwrap();
    drop(processor);

    let mut resumed = RequestProcessor::<IntegerKind>::load(&store, id).unwrap();
    resumed
        .continue_request(continued_request(6).with_id(id))
        .unwrap();
    values.extend(raw(resumed.build_response()));

    let mut single = RequestProcessor::<IntegerKind>::new(continued_request(6), Uuid::new_v4());
    assert_eq!(values, raw(single.build_response()));
}

#[test]
fn test_continuation_resumes_inside_random_stream() {
    let request = |max_values| {
        Request::<IntegerSpec>::new("ports", max_values)
            .with_seed(77)
            .with_generator(HeuristicRequest::new(RANDOM_NUMBERS).with_parameter("10"))
    };
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    let id = Uuid::new_v4();

    let mut processor = RequestProcessor::<IntegerKind>::new(request(3), id);
    let first = processor.build_response().clone();
    processor.serialize(&store).unwrap();
    drop(processor);

    let mut resumed = RequestProcessor::<IntegerKind>::load(&store, id).unwrap();
    resumed.continue_request(request(6).with_id(id)).unwrap();
    let second = resumed.build_response().clone();

    let mut single = RequestProcessor::<IntegerKind>::new(request(6), Uuid::new_v4());
    let single = single.build_response().clone();

    let mut values = first.values;
    values.extend(second.values);
    assert_eq!(values.len(), 6);
    assert!(values.iter().all(|v| v.source_name() == RANDOM_NUMBERS));
    assert_eq!(values, single.values);
}

#[test]
fn test_continuation_through_dispatcher() {
    let dispatcher = RequestDispatcher::new(MemoryStore::new(), EngineConfig::default());

    let first = dispatcher
        .process::<StringKind>(Request::<StringSpec>::new("names", 4).with_seed(8))
        .unwrap();
    let second = dispatcher
        .process::<StringKind>(
            Request::<StringSpec>::new("names", 10)
                .with_seed(8)
                .with_id(first.id),
        )
        .unwrap();
    assert_eq!(second.id, first.id);

    let mut values = raw(&first);
    values.extend(raw(&second));

    let single = dispatcher
        .process::<StringKind>(Request::<StringSpec>::new("names", 10).with_seed(8))
        .unwrap();
    assert_eq!(values, raw(&single));
}

#[test]
fn test_mismatched_continuation_leaves_state() {
    let store = MemoryStore::new();
    let id = Uuid::new_v4();
    let mut processor = RequestProcessor::<IntegerKind>::new(continued_request(3), id);
    let first = processor.build_response().clone();
    processor.serialize(&store).unwrap();

    let err = processor
        .continue_request(continued_request(6).with_id(Uuid::new_v4()))
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidContinuation { .. }));

    assert_eq!(processor.max_values(), 3);
    assert_eq!(processor.emitted(), 3);
    assert_eq!(processor.response(), Some(&first));

    // The persisted copy is untouched too
    let reloaded = RequestProcessor::<IntegerKind>::load(&store, id).unwrap();
    assert_eq!(reloaded.max_values(), 3);
}

#[test]
fn test_delete_fails_when_nothing_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    let processor = RequestProcessor::<IntegerKind>::new(continued_request(3), Uuid::new_v4());

    let err = processor.delete(&store).unwrap_err();
    assert!(matches!(
        err,
        EngineError::DeleteFailed {
            cause: DeleteCause::NotFound,
            ..
        }
    ));
}

#[test]
fn test_double_delete_fails() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    let processor = RequestProcessor::<IntegerKind>::new(continued_request(3), Uuid::new_v4());

    processor.serialize(&store).unwrap();
    processor.delete(&store).unwrap();
    assert!(!store.path_for(&processor.id()).exists());
    assert!(processor.delete(&store).unwrap_err().is_not_found());
}

#[test]
fn test_load_distinguishes_missing_and_wrong_kind() {
    let store = MemoryStore::new();
    let missing = Uuid::new_v4();
    let err = RequestProcessor::<IntegerKind>::load(&store, missing)
        .err()
        .unwrap();
    assert!(matches!(
        err,
        EngineError::LoadFailed {
            cause: LoadCause::NotFound,
            ..
        }
    ));

    // A string processor cannot be resumed as an integer one
    let id = Uuid::new_v4();
    RequestProcessor::<StringKind>::new(Request::new("names", 2), id)
        .serialize(&store)
        .unwrap();
    let err = RequestProcessor::<IntegerKind>::load(&store, id).err().unwrap();
    assert!(matches!(
        err,
        EngineError::LoadFailed {
            cause: LoadCause::WrongKind { .. },
            ..
        }
    ));
    assert!(err.to_string().contains("holds string values, not integer"));
}

#[test]
fn test_record_with_unknown_heuristic_is_corrupt() {
    let store = MemoryStore::new();
    let id = Uuid::new_v4();
    RequestProcessor::<IntegerKind>::new(continued_request(3), id)
        .serialize(&store)
        .unwrap();

    let blob = store.get(&id).unwrap().unwrap();
    let tampered = String::from_utf8(blob)
        .unwrap()
        .replace(BOUNDARY_NUMBERS, "Forgotten");
    store.put(&id, tampered.as_bytes()).unwrap();

    let err = RequestProcessor::<IntegerKind>::load(&store, id).err().unwrap();
    assert!(matches!(
        err,
        EngineError::LoadFailed {
            cause: LoadCause::Corrupt(_),
            ..
        }
    ));
}

#[test]
fn test_pretty_records_load() {
    let dir = tempfile::tempdir().unwrap();
    let config = EngineConfig::default()
        .with_store_dir(dir.path())
        .with_record_extension("json")
        .with_pretty_records(true);
    let dispatcher = RequestDispatcher::new(FileStore::from_config(&config), config);

    let response = dispatcher
        .process::<IntegerKind>(Request::new("ports", 2))
        .unwrap();
    let path = dispatcher.store().path_for(&response.id);
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("json"));

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("\n  \"formatVersion\": 1"));
    RequestProcessor::<IntegerKind>::load(dispatcher.store(), response.id).unwrap();
}

#[test]
fn test_huge_string_length_is_rejected_not_fatal() {
    let request = Request::<StringSpec>::new("names", 1)
        .with_generator(HeuristicRequest::new(LONG_STRINGS))
        .with_specification(StringSpec::new(0, usize::MAX));
    let mut processor = RequestProcessor::<StringKind>::new(request, Uuid::new_v4());
    let response = processor.build_response();

    assert!(response.values.is_empty());
    assert!(
        response
            .warnings
            .request_warnings
            .iter()
            .any(|w| w.contains("maxLength"))
    );
}

#[test]
fn test_largest_string_length() {
    let request = Request::<StringSpec>::new("names", 200)
        .with_seed(5)
        .with_generator(HeuristicRequest::new(LONG_STRINGS))
        .with_generator(HeuristicRequest::new(RANDOM_STRINGS).with_parameter("2"))
        .with_specification(StringSpec::new(MAX_STRING_LENGTH - 4, MAX_STRING_LENGTH));
    let mut processor = RequestProcessor::<StringKind>::new(request, Uuid::new_v4());
    let response = processor.build_response();

    assert!(response.warnings.is_empty());
    assert_eq!(response.values[0].source_name(), LONG_STRINGS);
    assert_eq!(response.values[0].value().len(), MAX_STRING_LENGTH + 1);

    let random: Vec<_> = response
        .values
        .iter()
        .filter(|v| v.source_name() == RANDOM_STRINGS)
        .collect();
    assert_eq!(random.len(), 2);
    for value in random {
        let length = value.value().chars().count();
        assert!((MAX_STRING_LENGTH - 4..=MAX_STRING_LENGTH).contains(&length));
    }
}

#[test]
fn test_full_width_integers() {
    let min = i64::MIN.to_string();
    let max = i64::MAX.to_string();
    let request = Request::<IntegerSpec>::new("offsets", 1000)
        .with_seed(21)
        .with_generator(HeuristicRequest::new(BOUNDARY_NUMBERS))
        .with_generator(HeuristicRequest::new(RANDOM_NUMBERS).with_parameter("50"))
        .with_valid_values([min.as_str(), max.as_str()])
        .with_operator(HeuristicRequest::new(BIT_FLIPS))
        .with_operator(HeuristicRequest::new(NUMERICAL_VARIANCE).with_parameter(min.as_str()))
        .with_specification(IntegerSpec::signed(64));
    let mut processor = RequestProcessor::<IntegerKind>::new(request, Uuid::new_v4());
    let response = processor.build_response();

    assert!(response.warnings.is_empty());
    let count = |name: &str| {
        response
            .values
            .iter()
            .filter(|v| v.source_name() == name)
            .count()
    };
    assert_eq!(count(RANDOM_NUMBERS), 50);
    assert_eq!(count(BIT_FLIPS), 2 * 64);
    assert_eq!(count(NUMERICAL_VARIANCE), 8);

    let raw = raw(response);
    assert!(raw.contains(&i64::MIN));
    assert!(raw.contains(&i64::MAX));
}

#[test]
fn test_unsigned_64_bit_random_numbers() {
    let request = Request::<IntegerSpec>::new("sizes", 30)
        .with_generator(HeuristicRequest::new(RANDOM_NUMBERS).with_parameter("30"))
        .with_specification(IntegerSpec::unsigned(64));
    let mut processor = RequestProcessor::<IntegerKind>::new(request, Uuid::new_v4());
    let response = processor.build_response();

    assert_eq!(response.values.len(), 30);
    assert!(response.raw_values().all(|&v| v >= 0));
    // Values above i64::MAX cannot be produced, which the request is told
    assert_eq!(response.warnings.request_warnings.len(), 1);
}
