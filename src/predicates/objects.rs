//! Object, callable and resource predicates.
//!
//! ## Predicates Provided
//!
//! - **Kinds**: `Callable`, `Object`, `Resource`
//! - **Membership**: `InstanceOf`, `Implements`, `SubclassOf` (all take the
//!   class first, then the object)
//! - **Methods**: `Method`
//!
//! A class argument may be a class name (`"Exception"`, `"\\Exception"`) or an
//! object, whose class is used.

use crate::errors::Result;
use crate::predicates::{
    helpers::{class_name_arg, method_name_arg},
    AssertionDefinition, PredicateFn, PredicateRegistry,
};
use crate::value::Value;

/// A closure, or an `[object, "method"]` pair naming an existing method.
///
/// Usage: assertCallable(object)
pub const PRED_CALLABLE: PredicateFn = |b| {
    Ok(match b.get("object")? {
        Value::Callable(_) => true,
        Value::List(pair) => match pair.as_slice() {
            [target, Value::String(method)] => target
                .class()
                .is_some_and(|class| class.has_method(method)),
            _ => false,
        },
        _ => false,
    })
};

pub const PRED_OBJECT: PredicateFn =
    |b| Ok(matches!(b.get("value")?, Value::Object(_) | Value::Fault(_)));

/// Holds for resources that have not been closed.
pub const PRED_RESOURCE: PredicateFn =
    |b| Ok(matches!(b.get("value")?, Value::Resource(r) if r.is_open()));

/// Usage: assertInstanceOf(class, object)
///
/// Example:
///   assertInstanceOf("Exception", new InvalidArgumentException)   ; => passes
///   assertInstanceOf("Exception", null)                           ; => fails
pub const PRED_INSTANCE_OF: PredicateFn = |b| {
    let class = class_name_arg(b.get("class")?, "is_a")?;
    Ok(b.get("object")?.is_a(&class))
};

/// The class names an interface somewhere in the object's ancestry.
pub const PRED_IMPLEMENTS: PredicateFn = |b| {
    let class = class_name_arg(b.get("class")?, "is_subclass_of")?;
    Ok(b.get("object")?
        .class()
        .is_some_and(|c| c.implements_interface(&class)))
};

/// Strict descendant or implementor; the class itself does not count.
pub const PRED_SUBCLASS_OF: PredicateFn = |b| {
    let class = class_name_arg(b.get("class")?, "is_subclass_of")?;
    Ok(b.get("object")?
        .class()
        .is_some_and(|c| c.is_subclass_of(&class)))
};

/// Usage: assertMethod(object, method_name)
pub const PRED_METHOD: PredicateFn = |b| {
    let object = b.get("object")?;
    match object.class() {
        Some(class) => {
            let method = method_name_arg(b.get("method_name")?, "method_exists")?;
            Ok(class.has_method(&method))
        }
        None => Ok(false),
    }
};

pub fn register_object_predicates(registry: &mut PredicateRegistry) -> Result<()> {
    registry.register(AssertionDefinition::inferred(
        "Callable",
        "is_callable($object)",
        PRED_CALLABLE,
    ))?;
    registry.register(AssertionDefinition::explicit(
        "InstanceOf",
        &["class", "object"],
        "is_a($object, $class)",
        PRED_INSTANCE_OF,
    ))?;
    registry.register(AssertionDefinition::explicit(
        "Implements",
        &["class", "object"],
        "interface_exists($class) && is_subclass_of($object, $class)",
        PRED_IMPLEMENTS,
    ))?;
    registry.register(AssertionDefinition::inferred("Object", "is_object($value)", PRED_OBJECT))?;
    registry.register(AssertionDefinition::inferred(
        "Resource",
        "is_resource($value)",
        PRED_RESOURCE,
    ))?;
    registry.register(AssertionDefinition::explicit(
        "SubclassOf",
        &["class", "object"],
        "is_subclass_of($object, $class)",
        PRED_SUBCLASS_OF,
    ))?;
    registry.register(AssertionDefinition::inferred(
        "Method",
        "is_object($object) && method_exists($object, $method_name)",
        PRED_METHOD,
    ))?;
    Ok(())
}
