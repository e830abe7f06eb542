//! Mock gateway semantics
//!
//! Behavioral twin of the Java-side entry point the comparison runs drive:
//! same method names, same values, same exceptions. Objects handed out
//! (collections, counters, builders, raised exceptions) live in a registry
//! keyed by the ids that cross the wire.

use std::collections::HashMap;

/// A value the mock can receive, compute with and send back.
#[derive(Debug, Clone, PartialEq)]
pub enum MockValue {
    Null,
    Void,
    Bool(bool),
    Int(i64),
    Long(i64),
    Double(f64),
    Str(String),
    Bytes(Vec<u8>),
    /// Id of an object in the registry.
    Ref(String),
}

/// One object living in the registry.
#[derive(Debug, Clone, PartialEq)]
pub enum MockObject {
    Counter(i64),
    Builder(String),
    List(Vec<MockValue>),
    Set(Vec<MockValue>),
    Map(Vec<(MockValue, MockValue)>),
    /// A raised exception, pre-rendered to its toString form.
    Exception(String),
}

/// Outcome of one mock invocation, before wire encoding.
#[derive(Debug, PartialEq)]
pub enum MockReply {
    Value(MockValue),
    /// Member lookup resolved to a method rather than a field.
    Method,
    /// An exception on the Java side of the fence; the server registers it
    /// so the client can toString it.
    Throw {
        class: &'static str,
        message: String,
    },
    /// A gateway-level failure with no exception object behind it.
    Fail(String),
}

/// What a dotted name resolves to in the mock's JVM namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Class(&'static str),
    Package,
}

/// The gateway-side object table. Ids are handed out in creation order, and
/// several ids may bind the same object, exactly as methods returning
/// `this` produce fresh bindings on the real gateway.
#[derive(Debug, Default)]
pub struct Registry {
    objects: Vec<MockObject>,
    bindings: HashMap<String, usize>,
    next_id: usize,
}

impl Registry {
    /// Register a fresh object and hand out its binding id.
    pub fn put(&mut self, object: MockObject) -> String {
        self.objects.push(object);
        self.bind(self.objects.len() - 1)
    }

    /// Bind a new id to an already registered object.
    pub fn alias(&mut self, index: usize) -> String {
        self.bind(index)
    }

    fn bind(&mut self, index: usize) -> String {
        let id = format!("o{}", self.next_id);
        self.next_id += 1;
        self.bindings.insert(id.clone(), index);
        id
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.bindings.get(id).copied()
    }

    pub fn object(&self, index: usize) -> Option<&MockObject> {
        self.objects.get(index)
    }

    pub fn object_mut(&mut self, index: usize) -> Option<&mut MockObject> {
        self.objects.get_mut(index)
    }

    /// Drop one binding. The object stays reachable through other ids.
    pub fn unbind(&mut self, id: &str) -> bool {
        self.bindings.remove(id).is_some()
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }
}

fn value(v: MockValue) -> MockReply {
    MockReply::Value(v)
}

fn fresh(registry: &mut Registry, object: MockObject) -> MockReply {
    let id = registry.put(object);
    value(MockValue::Ref(id))
}

fn unknown_method(target: &str, method: &str, argc: usize) -> MockReply {
    MockReply::Fail(format!(
        "method {method} with {argc} argument(s) does not exist on {target}"
    ))
}

fn strings(items: &[&str]) -> Vec<MockValue> {
    items.iter().map(|s| MockValue::Str(s.to_string())).collect()
}

fn ints(items: &[i64]) -> Vec<MockValue> {
    items.iter().map(|v| MockValue::Int(*v)).collect()
}

/// Dispatch a call on the entry point object.
pub fn call_entry(registry: &mut Registry, method: &str, args: &[MockValue]) -> MockReply {
    use MockValue::*;
    match (method, args) {
        // Arithmetic.
        ("add", [Int(a), Int(b)]) => value(Int(a + b)),
        ("addDoubles", [Double(a), Double(b)]) => value(Double(a + b)),
        ("addLongs", [Int(a) | Long(a), Int(b) | Long(b)]) => value(Long(a + b)),
        ("multiply", [Int(a), Int(b)]) => value(Int(a * b)),
        ("divide", [Double(a), Double(b)]) => value(Double(a / b)),

        // Strings.
        ("greet", [Str(name)]) => value(Str(format!("Hello, {name}!"))),
        ("concatenate", [Str(a), Str(b)]) => value(Str(format!("{a}{b}"))),
        ("stringLength", [Str(s)]) => value(Int(s.chars().count() as i64)),
        ("toUpperCase", [Str(s)]) => value(Str(s.to_uppercase())),
        ("containsSubstring", [Str(haystack), Str(needle)]) => {
            value(Bool(haystack.contains(needle.as_str())))
        }
        ("repeatString", [Str(s), Int(times)]) => {
            value(Str(s.repeat((*times).max(0) as usize)))
        }

        // Booleans.
        ("andBool", [Bool(a), Bool(b)]) => value(Bool(*a && *b)),
        ("orBool", [Bool(a), Bool(b)]) => value(Bool(*a || *b)),
        ("notBool", [Bool(a)]) => value(Bool(!a)),

        // Null handling.
        ("maybeNull", [Bool(return_null)]) => {
            if *return_null {
                value(Null)
            } else {
                value(Str("not null".to_string()))
            }
        }
        ("isNull", [arg]) => value(Bool(matches!(arg, Null))),

        // Collections.
        ("getStringList", []) => fresh(
            registry,
            MockObject::List(strings(&["alpha", "beta", "gamma"])),
        ),
        ("getIntList", []) => fresh(registry, MockObject::List(ints(&[1, 2, 3, 4, 5]))),
        ("getStringSet", []) => fresh(
            registry,
            MockObject::Set(strings(&["one", "two", "three"])),
        ),
        ("getStringIntMap", []) => fresh(
            registry,
            MockObject::Map(vec![
                (Str("a".to_string()), Int(1)),
                (Str("b".to_string()), Int(2)),
                (Str("c".to_string()), Int(3)),
            ]),
        ),

        // Type round-trips.
        ("echoInt", [Int(v)]) => value(Int(*v)),
        ("echoLong", [Int(v) | Long(v)]) => value(Long(*v)),
        ("echoDouble", [Double(v)]) => value(Double(*v)),
        ("echoBool", [Bool(v)]) => value(Bool(*v)),
        ("echoString", [Str(v)]) => value(Str(v.clone())),
        ("echoBytes", [Bytes(v)]) => value(Bytes(v.clone())),

        // Stateful objects.
        ("createCounter", [Int(initial)]) => fresh(registry, MockObject::Counter(*initial)),

        // Exceptions.
        ("throwException", [Str(message)]) => MockReply::Throw {
            class: "java.lang.RuntimeException",
            message: message.clone(),
        },
        ("divideInts", [Int(a), Int(b)]) => {
            if *b == 0 {
                MockReply::Throw {
                    class: "java.lang.ArithmeticException",
                    message: "/ by zero".to_string(),
                }
            } else {
                value(Int(a / b))
            }
        }

        (method, args) => unknown_method("the entry point", method, args.len()),
    }
}

/// Dispatch a call on a registered object.
pub fn call_object(
    registry: &mut Registry,
    id: &str,
    method: &str,
    args: &[MockValue],
) -> MockReply {
    use MockValue::*;
    let Some(index) = registry.index_of(id) else {
        return MockReply::Fail(format!("object {id} does not exist on the gateway"));
    };

    // append returns `this`, which the gateway binds under a fresh id.
    if method == "append" {
        if let (Some(MockObject::Builder(text)), [Str(part)]) =
            (registry.object_mut(index), args)
        {
            text.push_str(part);
            return value(Ref(registry.alias(index)));
        }
    }

    let Some(object) = registry.object_mut(index) else {
        return MockReply::Fail(format!("object {id} does not exist on the gateway"));
    };

    match (object, method, args) {
        (MockObject::Counter(v), "getValue", []) => value(Int(*v)),
        (MockObject::Counter(v), "increment", []) => {
            *v += 1;
            value(Void)
        }
        (MockObject::Counter(v), "decrement", []) => {
            *v -= 1;
            value(Void)
        }
        (MockObject::Counter(v), "add", [Int(n)]) => {
            *v += n;
            value(Void)
        }
        (MockObject::Counter(v), "reset", []) => {
            *v = 0;
            value(Void)
        }
        (MockObject::Counter(v), "toString", []) => value(Str(format!("Counter({v})"))),

        (MockObject::Builder(text), "toString", []) => value(Str(text.clone())),

        (MockObject::List(items), "size", []) => value(Int(items.len() as i64)),
        (MockObject::List(items), "get", [Int(i)]) => {
            match usize::try_from(*i).ok().and_then(|i| items.get(i)) {
                Some(item) => value(item.clone()),
                None => MockReply::Throw {
                    class: "java.lang.IndexOutOfBoundsException",
                    message: format!("Index {i} out of bounds for length {}", items.len()),
                },
            }
        }
        (MockObject::List(items), "contains", [needle]) => value(Bool(items.contains(needle))),
        (MockObject::List(items), "add", [item]) => {
            items.push(item.clone());
            value(Bool(true))
        }

        (MockObject::Set(items), "size", []) => value(Int(items.len() as i64)),
        (MockObject::Set(items), "contains", [needle]) => value(Bool(items.contains(needle))),

        (MockObject::Map(entries), "size", []) => value(Int(entries.len() as i64)),
        (MockObject::Map(entries), "get", [key]) => value(
            entries
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
                .unwrap_or(Null),
        ),
        (MockObject::Map(entries), "containsKey", [key]) => {
            value(Bool(entries.iter().any(|(k, _)| k == key)))
        }

        (MockObject::Exception(rendered), "toString", []) => value(Str(rendered.clone())),

        (_, method, args) => unknown_method(&format!("object {id}"), method, args.len()),
    }
}

/// Dispatch a static method call on a class.
pub fn call_static(class: &str, method: &str, args: &[MockValue]) -> MockReply {
    use MockValue::*;
    match (class, method, args) {
        ("java.lang.Math", "abs", [Int(v)]) => value(Int(v.abs())),
        ("java.lang.Math", "max", [Int(a), Int(b)]) => value(Int(*a.max(b))),
        ("java.lang.Math", "min", [Int(a), Int(b)]) => value(Int(*a.min(b))),
        ("java.lang.String", "valueOf", [Int(v)]) => value(Str(v.to_string())),
        (class, method, args) => {
            unknown_method(&format!("class {class}"), method, args.len())
        }
    }
}

/// Construct an instance of a class.
pub fn construct(registry: &mut Registry, class: &str, args: &[MockValue]) -> MockReply {
    use MockValue::*;
    match (class, args) {
        ("java.lang.StringBuilder", []) => fresh(registry, MockObject::Builder(String::new())),
        ("java.lang.StringBuilder", [Str(initial)]) => {
            fresh(registry, MockObject::Builder(initial.clone()))
        }
        ("java.util.ArrayList", []) => fresh(registry, MockObject::List(Vec::new())),
        (class, args) => MockReply::Fail(format!(
            "no constructor for {class} taking {} argument(s)",
            args.len()
        )),
    }
}

const KNOWN_CLASSES: &[&str] = &[
    "java.lang.Math",
    "java.lang.Integer",
    "java.lang.String",
    "java.lang.StringBuilder",
    "java.util.ArrayList",
];

const KNOWN_PACKAGES: &[&str] = &["java", "java.lang", "java.util"];

/// Resolve a dotted name in the JVM namespace.
pub fn resolve(name: &str) -> Option<Resolution> {
    if let Some(class) = KNOWN_CLASSES.iter().find(|c| **c == name) {
        return Some(Resolution::Class(class));
    }
    if KNOWN_PACKAGES.contains(&name) {
        return Some(Resolution::Package);
    }
    None
}

/// Look up a static member: fields answer with their value, methods with a
/// method marker.
pub fn reflect_member(class: &str, member: &str) -> MockReply {
    use MockValue::*;
    match (class, member) {
        ("java.lang.Math", "PI") => value(Double(std::f64::consts::PI)),
        ("java.lang.Math", "E") => value(Double(std::f64::consts::E)),
        ("java.lang.Integer", "MAX_VALUE") => value(Int(i32::MAX as i64)),
        ("java.lang.Integer", "MIN_VALUE") => value(Int(i32::MIN as i64)),
        ("java.lang.Math", "abs" | "max" | "min") => MockReply::Method,
        ("java.lang.String", "valueOf") => MockReply::Method,
        (class, member) => MockReply::Fail(format!("{class}.{member} does not exist")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use MockValue::*;

    fn entry(registry: &mut Registry, method: &str, args: Vec<MockValue>) -> MockReply {
        call_entry(registry, method, &args)
    }

    #[test]
    fn arithmetic_matches_the_entry_point() {
        let mut reg = Registry::default();
        assert_eq!(entry(&mut reg, "add", vec![Int(3), Int(4)]), MockReply::Value(Int(7)));
        assert_eq!(
            entry(&mut reg, "add", vec![Int(-10), Int(5)]),
            MockReply::Value(Int(-5))
        );
        assert_eq!(
            entry(&mut reg, "addDoubles", vec![Double(1.5), Double(2.5)]),
            MockReply::Value(Double(4.0))
        );
        assert_eq!(
            entry(&mut reg, "divide", vec![Double(10.0), Double(4.0)]),
            MockReply::Value(Double(2.5))
        );
    }

    #[test]
    fn string_methods_match_the_entry_point() {
        let mut reg = Registry::default();
        assert_eq!(
            entry(&mut reg, "greet", vec![Str("World".to_string())]),
            MockReply::Value(Str("Hello, World!".to_string()))
        );
        assert_eq!(
            entry(
                &mut reg,
                "repeatString",
                vec![Str("ab".to_string()), Int(3)]
            ),
            MockReply::Value(Str("ababab".to_string()))
        );
        assert_eq!(
            entry(
                &mut reg,
                "containsSubstring",
                vec![Str("foobar".to_string()), Str("oba".to_string())]
            ),
            MockReply::Value(Bool(true))
        );
    }

    #[test]
    fn maybe_null_switches_on_its_flag() {
        let mut reg = Registry::default();
        assert_eq!(
            entry(&mut reg, "maybeNull", vec![Bool(true)]),
            MockReply::Value(Null)
        );
        assert_eq!(
            entry(&mut reg, "maybeNull", vec![Bool(false)]),
            MockReply::Value(Str("not null".to_string()))
        );
    }

    #[test]
    fn echo_long_accepts_both_integer_widths() {
        let mut reg = Registry::default();
        assert_eq!(
            entry(&mut reg, "echoLong", vec![Long(1_000_000_000_000)]),
            MockReply::Value(Long(1_000_000_000_000))
        );
        assert_eq!(
            entry(&mut reg, "echoLong", vec![Int(5)]),
            MockReply::Value(Long(5))
        );
        // echoInt is declared for 32-bit values only.
        assert!(matches!(
            entry(&mut reg, "echoInt", vec![Long(1_000_000_000_000)]),
            MockReply::Fail(_)
        ));
    }

    #[test]
    fn counters_mutate_through_the_registry() {
        let mut reg = Registry::default();
        let MockReply::Value(Ref(id)) = entry(&mut reg, "createCounter", vec![Int(5)]) else {
            panic!("expected a reference");
        };
        assert_eq!(call_object(&mut reg, &id, "increment", &[]), MockReply::Value(Void));
        assert_eq!(call_object(&mut reg, &id, "getValue", &[]), MockReply::Value(Int(6)));
        assert_eq!(call_object(&mut reg, &id, "add", &[Int(7)]), MockReply::Value(Void));
        assert_eq!(call_object(&mut reg, &id, "getValue", &[]), MockReply::Value(Int(13)));
        assert_eq!(
            call_object(&mut reg, &id, "toString", &[]),
            MockReply::Value(Str("Counter(13)".to_string()))
        );
        assert_eq!(call_object(&mut reg, &id, "reset", &[]), MockReply::Value(Void));
        assert_eq!(call_object(&mut reg, &id, "getValue", &[]), MockReply::Value(Int(0)));
    }

    #[test]
    fn list_get_throws_out_of_bounds() {
        let mut reg = Registry::default();
        let MockReply::Value(Ref(id)) = entry(&mut reg, "getStringList", vec![]) else {
            panic!("expected a reference");
        };
        assert_eq!(
            call_object(&mut reg, &id, "get", &[Int(0)]),
            MockReply::Value(Str("alpha".to_string()))
        );
        assert_eq!(
            call_object(&mut reg, &id, "get", &[Int(3)]),
            MockReply::Throw {
                class: "java.lang.IndexOutOfBoundsException",
                message: "Index 3 out of bounds for length 3".to_string(),
            }
        );
    }

    #[test]
    fn map_get_returns_null_for_absent_keys() {
        let mut reg = Registry::default();
        let MockReply::Value(Ref(id)) = entry(&mut reg, "getStringIntMap", vec![]) else {
            panic!("expected a reference");
        };
        assert_eq!(
            call_object(&mut reg, &id, "get", &[Str("c".to_string())]),
            MockReply::Value(Int(3))
        );
        assert_eq!(
            call_object(&mut reg, &id, "get", &[Str("z".to_string())]),
            MockReply::Value(Null)
        );
        assert_eq!(
            call_object(&mut reg, &id, "containsKey", &[Str("z".to_string())]),
            MockReply::Value(Bool(false))
        );
    }

    #[test]
    fn exceptions_carry_class_and_message() {
        let mut reg = Registry::default();
        assert_eq!(
            entry(&mut reg, "throwException", vec![Str("boom".to_string())]),
            MockReply::Throw {
                class: "java.lang.RuntimeException",
                message: "boom".to_string(),
            }
        );
        assert_eq!(
            entry(&mut reg, "divideInts", vec![Int(10), Int(0)]),
            MockReply::Throw {
                class: "java.lang.ArithmeticException",
                message: "/ by zero".to_string(),
            }
        );
        assert_eq!(
            entry(&mut reg, "divideInts", vec![Int(10), Int(3)]),
            MockReply::Value(Int(3))
        );
    }

    #[test]
    fn builder_append_aliases_the_same_object() {
        let mut reg = Registry::default();
        let MockReply::Value(Ref(id)) =
            construct(&mut reg, "java.lang.StringBuilder", &[Str("Hello".to_string())])
        else {
            panic!("expected a reference");
        };
        let MockReply::Value(Ref(alias)) =
            call_object(&mut reg, &id, "append", &[Str(" World".to_string())])
        else {
            panic!("expected a reference");
        };
        assert_ne!(id, alias);
        // Both ids see the appended text.
        assert_eq!(
            call_object(&mut reg, &id, "toString", &[]),
            MockReply::Value(Str("Hello World".to_string()))
        );
        assert_eq!(
            call_object(&mut reg, &alias, "toString", &[]),
            MockReply::Value(Str("Hello World".to_string()))
        );
    }

    #[test]
    fn statics_and_members_resolve() {
        assert_eq!(
            call_static("java.lang.Math", "abs", &[Int(-42)]),
            MockReply::Value(Int(42))
        );
        assert_eq!(
            call_static("java.lang.Math", "max", &[Int(3), Int(7)]),
            MockReply::Value(Int(7))
        );
        assert_eq!(
            call_static("java.lang.String", "valueOf", &[Int(123)]),
            MockReply::Value(Str("123".to_string()))
        );
        assert_eq!(
            reflect_member("java.lang.Math", "PI"),
            MockReply::Value(Double(std::f64::consts::PI))
        );
        assert_eq!(
            reflect_member("java.lang.Integer", "MAX_VALUE"),
            MockReply::Value(Int(2_147_483_647))
        );
        assert_eq!(reflect_member("java.lang.Math", "abs"), MockReply::Method);
        assert_eq!(resolve("java.lang.Math"), Some(Resolution::Class("java.lang.Math")));
        assert_eq!(resolve("java.lang"), Some(Resolution::Package));
        assert_eq!(resolve("no.such.Thing"), None);
    }

    #[test]
    fn unbinding_keeps_other_aliases_alive() {
        let mut reg = Registry::default();
        let id = reg.put(MockObject::Counter(1));
        let index = reg.index_of(&id).unwrap();
        let alias = reg.alias(index);
        assert_eq!(reg.binding_count(), 2);

        assert!(reg.unbind(&id));
        assert!(!reg.unbind(&id));
        assert_eq!(
            call_object(&mut reg, &alias, "getValue", &[]),
            MockReply::Value(Int(1))
        );
        assert!(matches!(
            call_object(&mut reg, &id, "getValue", &[]),
            MockReply::Fail(_)
        ));
    }

    #[test]
    fn unknown_targets_and_methods_fail_without_throwing() {
        let mut reg = Registry::default();
        assert!(matches!(
            entry(&mut reg, "noSuchMethod", vec![]),
            MockReply::Fail(_)
        ));
        assert!(matches!(
            call_object(&mut reg, "o99", "getValue", &[]),
            MockReply::Fail(_)
        ));
        assert!(matches!(
            call_static("java.lang.Math", "noSuch", &[]),
            MockReply::Fail(_)
        ));
        assert!(matches!(
            construct(&mut reg, "java.lang.Thread", &[]),
            MockReply::Fail(_)
        ));
    }
}
