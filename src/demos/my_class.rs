//! Deliberate failures. Run `assay demos -vvv` to see every kind of report
//! line.

use assay::value::{Callable, Object, Value};
use assay::{values, Fault, TestClass, TestMethodSpec};

use super::some_class;

pub struct MyClass {
    some: Value,
}

pub fn class() -> TestClass<MyClass> {
    TestClass::new("MyClassTest", || {
        Ok(MyClass {
            some: Value::from(Object::new(&some_class())),
        })
    })
    .test("testExamples", |t, cx| {
        cx.equals(t.some.clone(), Object::new(&some_class()));
        cx.assert_not("Same", values![t.some.clone(), Object::new(&some_class())]);
        cx.assert("Implements", values!["SomeInterface", t.some.clone()]);

        cx.assert_not("Zero", values![0.0]);
        cx.equals(values!["hello"], values![]);
        cx.equals(
            "Too few arguments to function\nMyClass::f(), 0 passed",
            "Too few arguments to function\nMyClass::f(), 1 passed",
        );
        Ok(())
    })
    .test("testSkip", |_, cx| {
        cx.call("assertEquals", values!["1"]);
        cx.call("assertSomething", values![1]);
        cx.call("checkEquals", values![1, 1]);
        let raises = Callable::new("raises", || Err(Fault::runtime("raised while evaluating")));
        cx.assert("RaiseException", values![raises]);
        cx.assert("Nan", values!["not a number"]);
        Ok(())
    })
    .test("testMethodSkip", |_, cx| {
        cx.is_true(true);
        Err(Fault::exception("method throws an exception, it must be skipped"))
    })
    .test("testPanic", |_, cx| {
        cx.is_true(true);
        panic!("index out of range")
    })
    .test("testExceptionThrown", |_, _| {
        Err(Fault::exception("method throws an exception"))
    })
    .test("testWrongMessage", |_, _| {
        Err(Fault::exception("what was raised"))
    })
    .spec("testExceptionThrown", TestMethodSpec::new().throws("Exception"))
    .spec(
        "testWrongMessage",
        TestMethodSpec::new().throws("Exception").message("what was expected"),
    )
}

/// A class whose constructor fails; its file is skipped.
pub fn broken() -> TestClass<()> {
    TestClass::new("BrokenTest", || Err(Fault::runtime("could not connect to the database")))
        .test("testNeverRuns", |_, cx| {
            cx.is_true(false);
            Ok(())
        })
}
