//! Full-battery integration tests against the in-process mock gateway
//!
//! These run the exact probe list a real comparison run executes, assert
//! the cross-client contract values, and check the artifact end to end.

use std::net::TcpListener;

use serde_json::Value;

use rs4j_compare::gateway::Gateway;
use rs4j_compare::harness::{self, battery, report, runner, Outcome, ResultSet};
use rs4j_compare::mock::MockGateway;
use rs4j_compare::JValue;

fn battery_names() -> Vec<&'static str> {
    battery::battery()
        .iter()
        .flat_map(|group| group.probes.iter().map(|probe| probe.name))
        .collect()
}

async fn run_against_mock() -> ResultSet {
    let mock = MockGateway::spawn(0).await.expect("bind mock gateway");
    let mut gateway = Gateway::connect(mock.addr()).await.expect("connect");
    let groups = battery::battery();
    let results = runner::run_battery(&mut gateway, &groups).await;
    mock.shutdown();
    results
}

fn expect_ok<'a>(results: &'a ResultSet, name: &str) -> &'a JValue {
    match results.get(name) {
        Some(Outcome::Ok(value)) => value,
        other => panic!("{name}: expected ok, got {other:?}"),
    }
}

fn expect_java_error<'a>(results: &'a ResultSet, name: &str) -> &'a str {
    match results.get(name) {
        Some(Outcome::JavaError(message)) => message,
        other => panic!("{name}: expected java_error, got {other:?}"),
    }
}

#[tokio::test]
async fn every_probe_records_exactly_one_outcome_in_order() {
    let results = run_against_mock().await;
    let recorded: Vec<&str> = results.iter().map(|(name, _)| name).collect();
    assert_eq!(recorded, battery_names());
}

#[tokio::test]
async fn arithmetic_and_string_probes_match_the_contract() {
    let results = run_against_mock().await;

    assert_eq!(expect_ok(&results, "add_int"), &JValue::Int(7));
    assert_eq!(expect_ok(&results, "add_negative"), &JValue::Int(-5));
    assert_eq!(expect_ok(&results, "add_doubles"), &JValue::Double(4.0));
    assert_eq!(expect_ok(&results, "multiply"), &JValue::Int(42));
    assert_eq!(expect_ok(&results, "divide"), &JValue::Double(2.5));

    assert_eq!(
        expect_ok(&results, "greet"),
        &JValue::Str("Hello, World!".to_string())
    );
    assert_eq!(
        expect_ok(&results, "concatenate"),
        &JValue::Str("foobar".to_string())
    );
    assert_eq!(expect_ok(&results, "string_length"), &JValue::Int(5));
    assert_eq!(
        expect_ok(&results, "to_upper_case"),
        &JValue::Str("HELLO".to_string())
    );
    assert_eq!(expect_ok(&results, "contains_true"), &JValue::Bool(true));
    assert_eq!(expect_ok(&results, "contains_false"), &JValue::Bool(false));
    assert_eq!(
        expect_ok(&results, "repeat_string"),
        &JValue::Str("ababab".to_string())
    );
}

#[tokio::test]
async fn boolean_and_null_probes_match_the_contract() {
    let results = run_against_mock().await;

    assert_eq!(expect_ok(&results, "and_true"), &JValue::Bool(true));
    assert_eq!(expect_ok(&results, "and_false"), &JValue::Bool(false));
    assert_eq!(expect_ok(&results, "or_true"), &JValue::Bool(true));
    assert_eq!(expect_ok(&results, "or_false"), &JValue::Bool(false));
    assert_eq!(expect_ok(&results, "not_true"), &JValue::Bool(false));
    assert_eq!(expect_ok(&results, "not_false"), &JValue::Bool(true));

    assert_eq!(expect_ok(&results, "maybe_null_returns_null"), &JValue::Null);
    assert_eq!(
        expect_ok(&results, "maybe_null_returns_str"),
        &JValue::Str("not null".to_string())
    );
}

#[tokio::test]
async fn collection_probes_check_boundaries_and_membership() {
    let results = run_against_mock().await;

    assert_eq!(expect_ok(&results, "list_size"), &JValue::Int(3));
    assert_eq!(
        expect_ok(&results, "list_get_0"),
        &JValue::Str("alpha".to_string())
    );
    assert_eq!(
        expect_ok(&results, "list_get_2"),
        &JValue::Str("gamma".to_string())
    );

    assert_eq!(expect_ok(&results, "int_list_get_0"), &JValue::Int(1));
    assert_eq!(expect_ok(&results, "int_list_get_4"), &JValue::Int(5));
    assert_eq!(expect_ok(&results, "int_list_size"), &JValue::Int(5));

    assert_eq!(expect_ok(&results, "set_size"), &JValue::Int(3));
    assert_eq!(expect_ok(&results, "set_contains_one"), &JValue::Bool(true));
    assert_eq!(expect_ok(&results, "set_contains_xxx"), &JValue::Bool(false));

    assert_eq!(expect_ok(&results, "map_size"), &JValue::Int(3));
    assert_eq!(expect_ok(&results, "map_get_a"), &JValue::Int(1));
    assert_eq!(expect_ok(&results, "map_get_c"), &JValue::Int(3));
    assert_eq!(expect_ok(&results, "map_contains_key_a"), &JValue::Bool(true));
    assert_eq!(expect_ok(&results, "map_contains_key_z"), &JValue::Bool(false));
}

#[tokio::test]
async fn echo_probes_round_trip_every_scalar_type() {
    let results = run_against_mock().await;

    assert_eq!(expect_ok(&results, "echo_int_pos"), &JValue::Int(42));
    assert_eq!(expect_ok(&results, "echo_int_neg"), &JValue::Int(-99));
    assert_eq!(
        expect_ok(&results, "echo_long"),
        &JValue::Int(1_000_000_000_000)
    );
    assert_eq!(expect_ok(&results, "echo_double"), &JValue::Double(3.14));
    assert_eq!(expect_ok(&results, "echo_bool_true"), &JValue::Bool(true));
    assert_eq!(expect_ok(&results, "echo_bool_false"), &JValue::Bool(false));
    assert_eq!(
        expect_ok(&results, "echo_string"),
        &JValue::Str("js4j".to_string())
    );
}

#[tokio::test]
async fn counter_probes_start_from_fresh_objects() {
    let results = run_against_mock().await;

    assert_eq!(expect_ok(&results, "counter_initial"), &JValue::Int(10));
    assert_eq!(expect_ok(&results, "counter_increment"), &JValue::Int(6));
    assert_eq!(expect_ok(&results, "counter_add"), &JValue::Int(10));
}

#[tokio::test]
async fn failure_probes_classify_as_java_errors() {
    let results = run_against_mock().await;

    assert_eq!(
        expect_java_error(&results, "throw_exception"),
        "java.lang.RuntimeException: boom"
    );
    let division = expect_java_error(&results, "divide_by_zero");
    assert!(division.contains("java.lang.ArithmeticException"));
    assert!(division.contains("/ by zero"));

    // Those two are the only expected non-ok outcomes.
    assert_eq!(results.ok_count(), results.len() - 2);
}

#[tokio::test]
async fn jvm_namespace_probes_match_the_contract() {
    let results = run_against_mock().await;

    assert_eq!(expect_ok(&results, "Math_abs"), &JValue::Int(42));
    assert_eq!(expect_ok(&results, "Math_max"), &JValue::Int(7));
    assert_eq!(expect_ok(&results, "Math_min"), &JValue::Int(3));
    assert_eq!(
        expect_ok(&results, "Math_PI"),
        &JValue::Double(std::f64::consts::PI)
    );
    assert_eq!(expect_ok(&results, "Integer_MAX"), &JValue::Int(2_147_483_647));
    assert_eq!(
        expect_ok(&results, "String_valueOf_int"),
        &JValue::Str("123".to_string())
    );
    assert_eq!(
        expect_ok(&results, "stringbuilder_basic"),
        &JValue::Str("Hello World".to_string())
    );
    assert_eq!(expect_ok(&results, "arraylist_add_size"), &JValue::Int(2));
}

#[tokio::test]
async fn run_comparison_writes_the_artifact() {
    let mock = MockGateway::spawn(0).await.expect("bind mock gateway");
    let dir = tempfile::tempdir().expect("tempdir");
    let artifact = dir.path().join("results.json");

    let results = harness::run_comparison(mock.addr(), &artifact)
        .await
        .expect("comparison run");
    mock.shutdown();

    let on_disk = std::fs::read_to_string(&artifact).expect("read artifact");
    assert_eq!(on_disk, report::render(&results).expect("render"));

    let json: Value = serde_json::from_str(&on_disk).expect("parse artifact");
    let map = json.as_object().expect("top-level object");

    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    assert_eq!(keys, battery_names());

    assert_eq!(map["add_int"]["status"], "ok");
    assert_eq!(map["add_int"]["value"], 7);
    assert_eq!(map["add_doubles"]["value"], 4.0);
    assert_eq!(map["maybe_null_returns_null"]["value"], Value::Null);
    assert_eq!(map["echo_long"]["value"], 1_000_000_000_000i64);
    assert_eq!(map["throw_exception"]["status"], "java_error");
    assert_eq!(
        map["throw_exception"]["value"],
        "java.lang.RuntimeException: boom"
    );
    assert_eq!(map["Math_PI"]["value"], std::f64::consts::PI);
}

#[tokio::test]
async fn unreachable_gateway_fails_before_writing_anything() {
    // Bind and drop to get a port nobody is listening on.
    let unused = TcpListener::bind("127.0.0.1:0").expect("probe port");
    let addr = unused.local_addr().expect("local addr");
    drop(unused);

    let dir = tempfile::tempdir().expect("tempdir");
    let artifact = dir.path().join("results.json");

    let err = harness::run_comparison(addr, &artifact)
        .await
        .expect_err("connect must fail");
    assert!(matches!(
        err,
        rs4j_compare::Error::GatewayUnreachable { .. }
    ));
    assert!(!artifact.exists());
}
