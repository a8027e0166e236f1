//! Test classes.
//!
//! A [`TestClass`] registers a constructor, an optional setup hook, test
//! methods, parameter sources and metadata:
//!
//! ```rust
//! use assay::testing::{class::TestClass, metadata::TestMethodSpec};
//! use assay::{fault::Fault, values};
//!
//! #[derive(Default)]
//! struct Counter { hits: i64 }
//!
//! let class = TestClass::new("CounterTest", || Ok(Counter::default()))
//!     .setup(|t| { t.hits = 0; Ok(()) })
//!     .test("testStartsAtZero", |t, cx| {
//!         cx.equals(0, t.hits);
//!         Ok(())
//!     })
//!     .test_with("testRejects", &["n"], |_, _, args| {
//!         Err(Fault::value_error(format!("{} rejected", args[0])))
//!     })
//!     .source("bad", |_| Ok(values![-1, -2]))
//!     .spec("testRejects", TestMethodSpec::new()
//!         .throws("ValueError")
//!         .message("{$n} rejected")
//!         .bind("n", "bad"));
//! assert_eq!(class.name(), "CounterTest");
//! ```
//!
//! Methods run in registration order. Only names starting with `test` are
//! run; other registered methods are helpers.

use std::collections::HashMap;

use crate::fault::Fault;
use crate::testing::assertions::Assertions;
use crate::testing::metadata::{MetadataParser, TestMethodSpec};
use crate::value::Value;

type Constructor<T> = Box<dyn Fn() -> Result<T, Fault>>;
type SetupHook<T> = Box<dyn Fn(&mut T) -> Result<(), Fault>>;
type TestBody<T> = Box<dyn Fn(&mut T, &mut Assertions<'_>, &[Value]) -> Result<(), Fault>>;
type SourceFn<T> = Box<dyn Fn(&mut T) -> Result<Vec<Value>, Fault>>;

/// A loaded test class, as the executor sees it.
pub trait TestInstance {
    fn class_name(&self) -> &str;

    /// Registered method names, in registration order.
    fn method_names(&self) -> Vec<String>;

    /// Declared parameters of `method`.
    fn params(&self, method: &str) -> Vec<String>;

    /// Metadata for `method`; empty when there is none.
    fn spec(&self, method: &str) -> TestMethodSpec;

    fn setup(&mut self) -> Result<(), Fault>;

    /// Produces the values of a parameter source.
    fn source(&mut self, name: &str) -> Result<Vec<Value>, Fault>;

    fn invoke(&mut self, method: &str, cx: &mut Assertions<'_>, args: &[Value]) -> Result<(), Fault>;
}

struct TestMethod<T> {
    name: String,
    params: Vec<String>,
    body: TestBody<T>,
}

pub struct TestClass<T> {
    name: String,
    constructor: Constructor<T>,
    setup: Option<SetupHook<T>>,
    methods: Vec<TestMethod<T>>,
    sources: Vec<(String, SourceFn<T>)>,
    specs: HashMap<String, TestMethodSpec>,
    annotated: HashMap<String, (Vec<String>, TestMethodSpec)>,
}

impl<T: 'static> TestClass<T> {
    pub fn new(name: impl Into<String>, constructor: impl Fn() -> Result<T, Fault> + 'static) -> Self {
        Self {
            name: name.into(),
            constructor: Box::new(constructor),
            setup: None,
            methods: Vec::new(),
            sources: Vec::new(),
            specs: HashMap::new(),
            annotated: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs before every test method.
    pub fn setup(mut self, hook: impl Fn(&mut T) -> Result<(), Fault> + 'static) -> Self {
        self.setup = Some(Box::new(hook));
        self
    }

    /// A method without parameters.
    pub fn test(
        self,
        name: impl Into<String>,
        body: impl Fn(&mut T, &mut Assertions<'_>) -> Result<(), Fault> + 'static,
    ) -> Self {
        self.test_with(name, &[], move |t, cx, _| body(t, cx))
    }

    /// A method with declared parameters; `args` are bound in that order.
    pub fn test_with(
        mut self,
        name: impl Into<String>,
        params: &[&str],
        body: impl Fn(&mut T, &mut Assertions<'_>, &[Value]) -> Result<(), Fault> + 'static,
    ) -> Self {
        self.methods.push(TestMethod {
            name: name.into(),
            params: params.iter().map(|p| p.to_string()).collect(),
            body: Box::new(body),
        });
        self
    }

    /// A zero-argument method producing parameter values.
    pub fn source(
        mut self,
        name: impl Into<String>,
        source: impl Fn(&mut T) -> Result<Vec<Value>, Fault> + 'static,
    ) -> Self {
        self.sources.push((name.into(), Box::new(source)));
        self
    }

    /// Attaches metadata to a method. Fields set here win over annotated ones.
    pub fn spec(mut self, method: impl Into<String>, spec: TestMethodSpec) -> Self {
        self.specs.insert(method.into(), spec);
        self
    }

    /// Reads metadata blocks (and parameter lists) from annotated source text.
    pub fn annotated(mut self, source: &str) -> Self {
        for decl in MetadataParser::declarations(source) {
            self.annotated.insert(decl.name, (decl.params, decl.spec));
        }
        self
    }

    /// Constructs the class state and returns the runnable instance.
    pub fn instantiate(self) -> Result<Box<dyn TestInstance>, Fault> {
        let state = Fault::catch(|| (self.constructor)())?;
        Ok(Box::new(Instance { class: self, state }))
    }

    fn method(&self, name: &str) -> Option<&TestMethod<T>> {
        self.methods.iter().find(|m| m.name == name)
    }
}

struct Instance<T> {
    class: TestClass<T>,
    state: T,
}

impl<T: 'static> TestInstance for Instance<T> {
    fn class_name(&self) -> &str {
        &self.class.name
    }

    fn method_names(&self) -> Vec<String> {
        self.class.methods.iter().map(|m| m.name.clone()).collect()
    }

    fn params(&self, method: &str) -> Vec<String> {
        match self.class.method(method) {
            Some(m) if !m.params.is_empty() => m.params.clone(),
            _ => self
                .class
                .annotated
                .get(method)
                .map(|(params, _)| params.clone())
                .unwrap_or_default(),
        }
    }

    fn spec(&self, method: &str) -> TestMethodSpec {
        let builder = self.class.specs.get(method).cloned().unwrap_or_default();
        let parsed = self
            .class
            .annotated
            .get(method)
            .map(|(_, spec)| spec.clone())
            .unwrap_or_default();
        builder.or(parsed)
    }

    fn setup(&mut self) -> Result<(), Fault> {
        match &self.class.setup {
            Some(hook) => hook(&mut self.state),
            None => Ok(()),
        }
    }

    fn source(&mut self, name: &str) -> Result<Vec<Value>, Fault> {
        let Some((_, source)) = self.class.sources.iter().find(|(n, _)| n == name) else {
            return Err(Fault::exception(format!("Source {} not defined!", name)));
        };
        source(&mut self.state)
    }

    fn invoke(&mut self, method: &str, cx: &mut Assertions<'_>, args: &[Value]) -> Result<(), Fault> {
        let Some(m) = self.class.method(method) else {
            return Err(Fault::error(format!(
                "Call to undefined method {}::{}()",
                self.class.name, method
            )));
        };
        let expected = self.params(method).len();
        if args.len() < expected {
            return Err(Fault::argument_count(format!(
                "Too few arguments to function {}::{}(), {} passed and exactly {} expected",
                self.class.name,
                method,
                args.len(),
                expected
            )));
        }
        (m.body)(&mut self.state, cx, args)
    }
}
