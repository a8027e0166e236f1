//! Expected exceptions, message templates and parameter sources. The
//! metadata comes from annotated source text for some methods and from the
//! builder for others.

use assay::{values, Fault, TestClass, TestMethodSpec};

const ANNOTATED: &str = r#"
/// throws: Exception::class
fn testExceptionThrown() {}

/// throws: Exception::class
/// message: method throws an exception
fn testExceptionThrownWithMessage() {}

/// Single parameter
/// a: $this->letters()
fn testSource($a) {}

/**
 * throws: Exception::class
 * message: {$a}
 * a: $this->letters()
 */
fn testExceptionWithSourceAndMessage($a) {}
"#;

pub fn class() -> TestClass<()> {
    TestClass::new("ExceptionsTest", || Ok(()))
        .test("testExceptionThrown", |_, _| {
            Err(Fault::exception("method throws an exception"))
        })
        .test("testExceptionThrownWithMessage", |_, _| {
            Err(Fault::exception("method throws an exception"))
        })
        .test_with("testSource", &[], |_, cx, args| {
            cx.assert_not("Null", args.to_vec());
            cx.assert("String", args.to_vec());
            Ok(())
        })
        .test_with("testExceptionWithSourceAndMessage", &[], |_, _, args| {
            Err(Fault::exception(args[0].to_string()))
        })
        .test_with("testRejectsNegatives", &["n"], |_, cx, args| {
            cx.assert("Int", args.to_vec());
            Err(Fault::named("InvalidArgumentException", format!("{} is negative", args[0])))
        })
        .test_with("testPairs", &["a", "n"], |_, cx, args| {
            cx.assert("String", values![args[0].clone()]);
            cx.assert("Int", values![args[1].clone()]);
            Ok(())
        })
        .source("letters", |_| Ok(values!["a", "b", "c"]))
        .source("negatives", |_| Ok(values![-1, -2]))
        .source("counts", |_| Ok(values![1, 2, 3]))
        .annotated(ANNOTATED)
        .spec(
            "testRejectsNegatives",
            TestMethodSpec::new()
                .throws("LogicException")
                .message("{$n} is negative")
                .bind("n", "negatives"),
        )
        .spec(
            "testPairs",
            TestMethodSpec::new().bind("a", "letters").bind("n", "counts"),
        )
}
