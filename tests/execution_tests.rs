// End-to-end runs of test classes: parameter sources, expected exceptions,
// method and file faults, selection.

use assay::runtime::dispatch::Dispatcher;
use assay::runtime::outcome::Status;
use assay::runtime::sink::{Event, EventLog};
use assay::testing::discovery::MethodFilter;
use assay::testing::runner::SuiteRunner;
use assay::testing::summary::{MethodState, RunSummary};
use assay::{values, Fault, Suite, TestClass, TestFile, TestMethodSpec};

const ANNOTATED: &str = r#"
/**
 * Single parameter
 * a: $this->getArgs()
 */
public function testSource($a) {}

/**
 * throws: Exception::class
 * a: $this->getArgs()
 */
public function testExceptionWithSource($a) {}

/**
 * throws: Exception::class
 * message: {$a}
 * a: $this->getArgs()
 */
public function testExceptionWithSourceAndMessage($a) {}
"#;

fn my_class() -> TestClass<()> {
    TestClass::new("MyClassTest", || Ok(()))
        .test_with("testSource", &[], |_, cx, args| {
            cx.assert_not("Null", args.to_vec());
            Ok(())
        })
        .test_with("testExceptionWithSource", &[], |_, _, args| {
            Err(Fault::exception(args[0].to_string()))
        })
        .test_with("testExceptionWithSourceAndMessage", &[], |_, _, args| {
            Err(Fault::exception(args[0].to_string()))
        })
        .test("testMethodSkip", |_, cx| {
            cx.is_true(true);
            Err(Fault::exception("method throws an exception, it must be skipped"))
        })
        .test("testSkip", |_, cx| {
            cx.call("assertEquals", values!["1"]);
            Ok(())
        })
        .source("getArgs", |_| Ok(values!["a", "b", "c"]))
        .annotated(ANNOTATED)
}

fn run(suite: &Suite, path: &str, filter: MethodFilter) -> (RunSummary, EventLog) {
    let dispatcher = Dispatcher::with_defaults().unwrap();
    let mut log = EventLog::new();
    let summary = SuiteRunner::new(&dispatcher, &mut log, filter).run(suite, path);
    (summary, log)
}

fn suite() -> Suite {
    Suite::new().file(TestFile::new("tests/MyClassTest.rs", my_class))
}

fn method<'a>(summary: &'a RunSummary, name: &str) -> &'a assay::testing::summary::MethodSummary {
    summary.files[0]
        .methods
        .iter()
        .find(|m| m.method == name)
        .unwrap()
}

#[test]
fn source_runs_once_per_value() {
    let (summary, _) = run(&suite(), "tests", MethodFilter::new(None, Some("source")).unwrap());
    let m = method(&summary, "testSource");
    assert_eq!(m.invocations, 3);
    assert_eq!(m.counters.passed, 3);
}

#[test]
fn expected_exception_with_source_checks_each_invocation() {
    let (summary, _) = run(&suite(), "tests", MethodFilter::all());
    assert_eq!(method(&summary, "testExceptionWithSource").counters.passed, 3);

    let with_message = method(&summary, "testExceptionWithSourceAndMessage");
    assert_eq!(with_message.counters.passed, 6);
    assert_eq!(with_message.counters.failed, 0);
    assert_eq!(with_message.state, MethodState::Completed);
}

#[test]
fn unexpected_fault_skips_the_method_but_keeps_earlier_outcomes() {
    let (summary, log) = run(&suite(), "tests", MethodFilter::new(None, Some("MethodSkip")).unwrap());
    let m = method(&summary, "testMethodSkip");
    assert_eq!(m.state, MethodState::MethodFaulted);
    assert_eq!(m.counters.passed, 1);
    assert_eq!(summary.files[0].skipped_methods, 1);
    assert_eq!(log.statuses(), [Status::Passed, Status::MethodFaulted]);

    let fault = log
        .events
        .iter()
        .find_map(|e| match e {
            Event::MethodFaulted(f) => Some(f),
            _ => None,
        })
        .unwrap();
    assert_eq!(fault.fault_class, "Exception");
    assert_eq!(fault.message, "method throws an exception, it must be skipped");
    assert!(fault.location.as_ref().unwrap().file.ends_with("execution_tests.rs"));
}

#[test]
fn misuse_counts_as_skipped_not_failed() {
    let (summary, _) = run(&suite(), "tests", MethodFilter::new(Some("^testSkip$"), None).unwrap());
    let totals = summary.totals();
    assert_eq!((totals.passed, totals.failed, totals.skipped), (0, 0, 1));
    assert!(!totals.is_clean());
}

#[test]
fn file_totals_add_up() {
    let (summary, log) = run(&suite(), "tests", MethodFilter::all());
    let totals = summary.totals();
    // 3 + 3 + 6 + 1 passed; testSkip misuses once; testMethodSkip faults.
    assert_eq!(totals.passed, 13);
    assert_eq!(totals.skipped, 1);
    assert_eq!(totals.skipped_methods, 1);
    assert_eq!(totals.methods, 5);
    assert_eq!((log.captures, log.releases), (5, 5));
}

#[test]
fn wrong_message_is_a_failed_assertion() {
    let class = || {
        TestClass::new("MessageTest", || Ok(()))
            .test("testMessage", |_, _| Err(Fault::runtime("actual")))
            .spec(
                "testMessage",
                TestMethodSpec::new().throws("Exception").message("expected"),
            )
    };
    let suite = Suite::new().file(TestFile::new("tests/MessageTest.rs", class));
    let (summary, log) = run(&suite, "tests/MessageTest.rs", MethodFilter::all());
    assert_eq!(log.statuses(), [Status::Passed, Status::Failed]);
    let failed = log.outcomes().find(|o| o.status == Status::Failed).unwrap();
    assert_eq!(failed.method, "assertEquals");
    assert_eq!(failed.arguments.as_ref().unwrap(), &values!["expected", "actual"]);
    assert_eq!(summary.totals().failed, 1);
}

#[test]
fn wrong_exception_class_fails_without_message_check() {
    let class = || {
        TestClass::new("ClassTest", || Ok(()))
            .test("testClass", |_, _| Err(Fault::type_error("actual")))
            .spec(
                "testClass",
                TestMethodSpec::new().throws("Exception").message("actual"),
            )
    };
    let suite = Suite::new().file(TestFile::new("tests/ClassTest.rs", class));
    let (_, log) = run(&suite, "tests", MethodFilter::all());
    assert_eq!(log.statuses(), [Status::Failed, Status::Passed]);
}

#[test]
fn faulting_loader_skips_only_that_file() {
    let suite = Suite::new()
        .file(TestFile::new("tests/BrokenTest.rs", || {
            TestClass::<()>::new("BrokenTest", || Err(Fault::runtime("no database")))
                .test("testNever", |_, cx| {
                    cx.is_true(false);
                    Ok(())
                })
        }))
        .file(TestFile::new("tests/MyClassTest.rs", my_class));
    let (summary, log) = run(&suite, "tests", MethodFilter::new(None, Some("source")).unwrap());

    assert!(summary.files[0].file_skipped);
    assert_eq!(summary.files[1].passed, 3);
    assert_eq!(summary.totals().skipped_files, 1);
    assert!(matches!(&log.events[1], Event::FileSkipped(f) if f.message == "no database"));
}

#[test]
fn missing_file_is_reported() {
    let (summary, log) = run(&suite(), "tests/NoSuchTest.rs", MethodFilter::all());
    assert_eq!(summary.totals().skipped_files, 1);
    assert!(log.events.iter().any(|e| matches!(
        e,
        Event::FileSkipped(f) if f.message == "File: tests/NoSuchTest.rs, does not exist"
    )));
}

#[test]
fn glob_selects_matching_files() {
    let suite = Suite::new()
        .file(TestFile::new("tests/unit/MyClassTest.rs", my_class))
        .file(TestFile::new("tests/other/OtherTest.rs", my_class));
    let (summary, _) = run(&suite, "tests/unit/*", MethodFilter::new(None, Some("source")).unwrap());
    assert_eq!(summary.files.len(), 1);
    assert_eq!(summary.files[0].path, "tests/unit/MyClassTest.rs");
}
