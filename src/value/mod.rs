//! # Values
//!
//! The dynamic values assertions and test methods operate on.
//!
//! ## Module Structure
//!
//! - [`class`]: nominal classes and interfaces, plus the built-in throwables
//! - [`compare`]: loose and strict equality
//!
//! Objects, callables and faults are reference-counted and compare by identity
//! under strict equality. Everything here is single-threaded.

pub mod class;
pub mod compare;

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use im::HashMap;

use crate::fault::Fault;

pub use class::{Class, ClassKind};
pub use compare::Number;

/// String-keyed map used for `Map` values and object fields.
pub type ValueMap = HashMap<String, Value>;

/// A dynamic value.
///
/// # Examples
///
/// ```rust
/// use assay::value::Value;
/// let n = Value::from(3);
/// assert_eq!(n.type_name(), "int");
/// assert!(Value::Null.is_null());
/// assert!(!Value::from("").truthy());
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(ValueMap),
    Object(Rc<Object>),
    Callable(Callable),
    Resource(Resource),
    Fault(Rc<Fault>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) | Value::Map(_) => "array",
            Value::Object(_) | Value::Fault(_) => "object",
            Value::Callable(_) => "callable",
            Value::Resource(_) => "resource",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// `bool`, `int`, `float` or `string`.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::String(_)
        )
    }

    /// Numbers and numeric strings.
    pub fn is_numeric(&self) -> bool {
        self.as_number().is_some()
            || matches!(self, Value::String(s) if compare::numeric_string(s).is_some())
    }

    /// Boolean conversion.
    ///
    /// ```rust
    /// use assay::value::Value;
    /// assert!(!Value::from("0").truthy());
    /// assert!(Value::from("0.0").truthy());
    /// assert!(!Value::from(Vec::<Value>::new()).truthy());
    /// ```
    pub fn truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => !(s.is_empty() || s == "0"),
            Value::List(items) => !items.is_empty(),
            Value::Map(map) => !map.is_empty(),
            Value::Resource(_) | Value::Object(_) | Value::Callable(_) | Value::Fault(_) => true,
        }
    }

    /// The number held by an `Int` or `Float`. Strings are not converted.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Int(i) => Some(Number::Int(*i)),
            Value::Float(f) => Some(Number::Float(*f)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The class of an object or a fault.
    pub fn class(&self) -> Option<&Arc<Class>> {
        match self {
            Value::Object(object) => Some(object.class()),
            Value::Fault(fault) => Some(fault.class()),
            _ => None,
        }
    }

    /// True if the value is an object or fault whose class is `class_name`
    /// or descends from it.
    pub fn is_a(&self, class_name: &str) -> bool {
        self.class().is_some_and(|class| class.is_a(class_name))
    }

    pub fn loose_eq(&self, other: &Value) -> bool {
        compare::loose_eq(self, other)
    }

    pub fn strict_eq(&self, other: &Value) -> bool {
        compare::strict_eq(self, other)
    }

    /// Like `Display`, but strings are quoted. Used in argument dumps.
    pub fn render(&self) -> String {
        match self {
            Value::String(s) => format!("'{}'", s.replace('\'', "\\'")),
            other => other.to_string(),
        }
    }

    fn fmt_list(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
        write!(f, "[")?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", item.render())?;
        }
        write!(f, "]")
    }

    fn fmt_map(f: &mut fmt::Formatter<'_>, map: &ValueMap) -> fmt::Result {
        let mut entries: Vec<_> = map.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        write!(f, "[")?;
        for (i, (k, v)) in entries.into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{}' => {}", k, v.render())?;
        }
        write!(f, "]")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(n) => {
                if n.is_finite() && n.fract() == 0.0 {
                    write!(f, "{:.1}", n)
                } else if n.is_nan() {
                    write!(f, "NAN")
                } else if n.is_infinite() {
                    write!(f, "{}INF", if *n < 0.0 { "-" } else { "" })
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::String(s) => write!(f, "{}", s),
            Value::List(items) => Value::fmt_list(f, items),
            Value::Map(map) => Value::fmt_map(f, map),
            Value::Object(object) => write!(f, "{}", object),
            Value::Callable(callable) => write!(f, "callable({})", callable.name()),
            Value::Resource(resource) => {
                write!(f, "resource({}) of type ({})", resource.id(), resource.kind())
            }
            Value::Fault(fault) => write!(f, "{}", fault),
        }
    }
}

/// Loose equality, so `Value::from(1) == Value::from("1")`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.loose_eq(other)
    }
}

// ============================================================================
// OBJECTS, CALLABLES, RESOURCES
// ============================================================================

/// An instance of a [`Class`] with named fields.
#[derive(Debug)]
pub struct Object {
    class: Arc<Class>,
    fields: ValueMap,
}

impl Object {
    pub fn new(class: &Arc<Class>) -> Self {
        Self {
            class: Arc::clone(class),
            fields: ValueMap::new(),
        }
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn class(&self) -> &Arc<Class> {
        &self.class
    }

    pub fn fields(&self) -> &ValueMap {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class.name())?;
        if !self.fields.is_empty() {
            write!(f, " ")?;
            Value::fmt_map(f, &self.fields)?;
        }
        Ok(())
    }
}

type CallableFn = dyn Fn() -> Result<Value, Fault>;

/// A zero-argument closure that may raise.
#[derive(Clone)]
pub struct Callable {
    name: String,
    f: Rc<CallableFn>,
}

impl Callable {
    pub fn new(name: impl Into<String>, f: impl Fn() -> Result<Value, Fault> + 'static) -> Self {
        Self {
            name: name.into(),
            f: Rc::new(f),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invokes the closure; panics are converted into faults.
    pub fn invoke(&self) -> Result<Value, Fault> {
        Fault::catch(|| (self.f)())
    }

    pub fn same_as(&self, other: &Callable) -> bool {
        Rc::ptr_eq(&self.f, &other.f)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable").field("name", &self.name).finish()
    }
}

static NEXT_RESOURCE_ID: AtomicU64 = AtomicU64::new(1);

/// A handle that stays open until closed. Clones share the open flag.
#[derive(Debug, Clone)]
pub struct Resource {
    id: u64,
    kind: String,
    open: Rc<Cell<bool>>,
}

impl Resource {
    pub fn open(kind: impl Into<String>) -> Self {
        Self {
            id: NEXT_RESOURCE_ID.fetch_add(1, Ordering::Relaxed),
            kind: kind.into(),
            open: Rc::new(Cell::new(true)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    pub fn close(&self) {
        self.open.set(false);
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<ValueMap> for Value {
    fn from(map: ValueMap) -> Self {
        Value::Map(map)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(Rc::new(object))
    }
}

impl From<Callable> for Value {
    fn from(callable: Callable) -> Self {
        Value::Callable(callable)
    }
}

impl From<Resource> for Value {
    fn from(resource: Resource) -> Self {
        Value::Resource(resource)
    }
}

impl From<Fault> for Value {
    fn from(fault: Fault) -> Self {
        Value::Fault(Rc::new(fault))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Builds a `Vec<Value>` from anything convertible into [`Value`].
///
/// ```rust
/// use assay::{values, value::Value};
/// let args = values![1, "two", 3.0];
/// assert_eq!(args[1], Value::from("two"));
/// ```
#[macro_export]
macro_rules! values {
    () => { ::std::vec::Vec::<$crate::value::Value>::new() };
    ($($item:expr),+ $(,)?) => {
        vec![$($crate::value::Value::from($item)),+]
    };
}
