//! The fixed probe battery
//!
//! Probe names, arguments and literals are the cross-client contract: the
//! sibling py4j and js4j harnesses run this exact list, and diffing the
//! artifacts is only meaningful while every client keeps them identical.
//! Do not rename, reorder or change arguments without changing all three.

use futures_util::future::BoxFuture;

use crate::common::Result;
use crate::gateway::{Gateway, JValue};

type ProbeFn = for<'a> fn(&'a mut Gateway) -> BoxFuture<'a, Result<JValue>>;

/// One named unit of work against the gateway.
pub struct Probe {
    pub name: &'static str,
    run: ProbeFn,
}

impl Probe {
    fn new(name: &'static str, run: ProbeFn) -> Self {
        Self { name, run }
    }

    /// Execute the probe's remote calls.
    pub async fn run(&self, gateway: &mut Gateway) -> Result<JValue> {
        (self.run)(gateway).await
    }
}

/// A labeled section of the battery, printed as a header during the run.
pub struct ProbeGroup {
    pub label: &'static str,
    pub probes: Vec<Probe>,
}

impl ProbeGroup {
    fn new(label: &'static str, probes: Vec<Probe>) -> Self {
        Self { label, probes }
    }
}

/// Build the full battery, in execution order.
pub fn battery() -> Vec<ProbeGroup> {
    vec![
        ProbeGroup::new(
            "Arithmetic",
            vec![
                Probe::new("add_int", |gw| {
                    Box::pin(async move { gw.invoke_entry("add", vec![3.into(), 4.into()]).await })
                }),
                Probe::new("add_negative", |gw| {
                    Box::pin(async move {
                        gw.invoke_entry("add", vec![(-10).into(), 5.into()]).await
                    })
                }),
                Probe::new("add_doubles", |gw| {
                    Box::pin(async move {
                        gw.invoke_entry("addDoubles", vec![1.5.into(), 2.5.into()]).await
                    })
                }),
                Probe::new("multiply", |gw| {
                    Box::pin(async move {
                        gw.invoke_entry("multiply", vec![6.into(), 7.into()]).await
                    })
                }),
                Probe::new("divide", |gw| {
                    Box::pin(async move {
                        gw.invoke_entry("divide", vec![10.0.into(), 4.0.into()]).await
                    })
                }),
            ],
        ),
        ProbeGroup::new(
            "Strings",
            vec![
                Probe::new("greet", |gw| {
                    Box::pin(async move { gw.invoke_entry("greet", vec!["World".into()]).await })
                }),
                Probe::new("concatenate", |gw| {
                    Box::pin(async move {
                        gw.invoke_entry("concatenate", vec!["foo".into(), "bar".into()]).await
                    })
                }),
                Probe::new("string_length", |gw| {
                    Box::pin(async move {
                        gw.invoke_entry("stringLength", vec!["hello".into()]).await
                    })
                }),
                Probe::new("to_upper_case", |gw| {
                    Box::pin(async move {
                        gw.invoke_entry("toUpperCase", vec!["hello".into()]).await
                    })
                }),
                Probe::new("contains_true", |gw| {
                    Box::pin(async move {
                        gw.invoke_entry("containsSubstring", vec!["foobar".into(), "oba".into()])
                            .await
                    })
                }),
                Probe::new("contains_false", |gw| {
                    Box::pin(async move {
                        gw.invoke_entry("containsSubstring", vec!["foobar".into(), "xyz".into()])
                            .await
                    })
                }),
                Probe::new("repeat_string", |gw| {
                    Box::pin(async move {
                        gw.invoke_entry("repeatString", vec!["ab".into(), 3.into()]).await
                    })
                }),
            ],
        ),
        ProbeGroup::new(
            "Booleans",
            vec![
                Probe::new("and_true", |gw| {
                    Box::pin(async move {
                        gw.invoke_entry("andBool", vec![true.into(), true.into()]).await
                    })
                }),
                Probe::new("and_false", |gw| {
                    Box::pin(async move {
                        gw.invoke_entry("andBool", vec![true.into(), false.into()]).await
                    })
                }),
                Probe::new("or_true", |gw| {
                    Box::pin(async move {
                        gw.invoke_entry("orBool", vec![false.into(), true.into()]).await
                    })
                }),
                Probe::new("or_false", |gw| {
                    Box::pin(async move {
                        gw.invoke_entry("orBool", vec![false.into(), false.into()]).await
                    })
                }),
                Probe::new("not_true", |gw| {
                    Box::pin(async move { gw.invoke_entry("notBool", vec![true.into()]).await })
                }),
                Probe::new("not_false", |gw| {
                    Box::pin(async move { gw.invoke_entry("notBool", vec![false.into()]).await })
                }),
            ],
        ),
        ProbeGroup::new(
            "Null handling",
            vec![
                Probe::new("maybe_null_returns_null", |gw| {
                    Box::pin(async move { gw.invoke_entry("maybeNull", vec![true.into()]).await })
                }),
                Probe::new("maybe_null_returns_str", |gw| {
                    Box::pin(async move { gw.invoke_entry("maybeNull", vec![false.into()]).await })
                }),
            ],
        ),
        ProbeGroup::new(
            "Collections",
            vec![
                Probe::new("list_size", |gw| {
                    Box::pin(async move {
                        let list = gw.invoke_entry("getStringList", vec![]).await?.into_object()?;
                        gw.invoke(&list, "size", vec![]).await
                    })
                }),
                Probe::new("list_get_0", |gw| {
                    Box::pin(async move {
                        let list = gw.invoke_entry("getStringList", vec![]).await?.into_object()?;
                        gw.invoke(&list, "get", vec![0.into()]).await
                    })
                }),
                Probe::new("list_get_2", |gw| {
                    Box::pin(async move {
                        let list = gw.invoke_entry("getStringList", vec![]).await?.into_object()?;
                        gw.invoke(&list, "get", vec![2.into()]).await
                    })
                }),
                Probe::new("int_list_get_0", |gw| {
                    Box::pin(async move {
                        let list = gw.invoke_entry("getIntList", vec![]).await?.into_object()?;
                        gw.invoke(&list, "get", vec![0.into()]).await
                    })
                }),
                Probe::new("int_list_get_4", |gw| {
                    Box::pin(async move {
                        let list = gw.invoke_entry("getIntList", vec![]).await?.into_object()?;
                        gw.invoke(&list, "get", vec![4.into()]).await
                    })
                }),
                Probe::new("int_list_size", |gw| {
                    Box::pin(async move {
                        let list = gw.invoke_entry("getIntList", vec![]).await?.into_object()?;
                        gw.invoke(&list, "size", vec![]).await
                    })
                }),
                Probe::new("set_size", |gw| {
                    Box::pin(async move {
                        let set = gw.invoke_entry("getStringSet", vec![]).await?.into_object()?;
                        gw.invoke(&set, "size", vec![]).await
                    })
                }),
                Probe::new("set_contains_one", |gw| {
                    Box::pin(async move {
                        let set = gw.invoke_entry("getStringSet", vec![]).await?.into_object()?;
                        gw.invoke(&set, "contains", vec!["one".into()]).await
                    })
                }),
                Probe::new("set_contains_xxx", |gw| {
                    Box::pin(async move {
                        let set = gw.invoke_entry("getStringSet", vec![]).await?.into_object()?;
                        gw.invoke(&set, "contains", vec!["xxx".into()]).await
                    })
                }),
                Probe::new("map_size", |gw| {
                    Box::pin(async move {
                        let map =
                            gw.invoke_entry("getStringIntMap", vec![]).await?.into_object()?;
                        gw.invoke(&map, "size", vec![]).await
                    })
                }),
                Probe::new("map_get_a", |gw| {
                    Box::pin(async move {
                        let map =
                            gw.invoke_entry("getStringIntMap", vec![]).await?.into_object()?;
                        gw.invoke(&map, "get", vec!["a".into()]).await
                    })
                }),
                Probe::new("map_get_c", |gw| {
                    Box::pin(async move {
                        let map =
                            gw.invoke_entry("getStringIntMap", vec![]).await?.into_object()?;
                        gw.invoke(&map, "get", vec!["c".into()]).await
                    })
                }),
                Probe::new("map_contains_key_a", |gw| {
                    Box::pin(async move {
                        let map =
                            gw.invoke_entry("getStringIntMap", vec![]).await?.into_object()?;
                        gw.invoke(&map, "containsKey", vec!["a".into()]).await
                    })
                }),
                Probe::new("map_contains_key_z", |gw| {
                    Box::pin(async move {
                        let map =
                            gw.invoke_entry("getStringIntMap", vec![]).await?.into_object()?;
                        gw.invoke(&map, "containsKey", vec!["z".into()]).await
                    })
                }),
            ],
        ),
        ProbeGroup::new(
            "Type round-trips",
            vec![
                Probe::new("echo_int_pos", |gw| {
                    Box::pin(async move { gw.invoke_entry("echoInt", vec![42.into()]).await })
                }),
                Probe::new("echo_int_neg", |gw| {
                    Box::pin(async move { gw.invoke_entry("echoInt", vec![(-99).into()]).await })
                }),
                Probe::new("echo_long", |gw| {
                    Box::pin(async move {
                        gw.invoke_entry("echoLong", vec![1_000_000_000_000i64.into()]).await
                    })
                }),
                Probe::new("echo_double", |gw| {
                    Box::pin(async move { gw.invoke_entry("echoDouble", vec![3.14.into()]).await })
                }),
                Probe::new("echo_bool_true", |gw| {
                    Box::pin(async move { gw.invoke_entry("echoBool", vec![true.into()]).await })
                }),
                Probe::new("echo_bool_false", |gw| {
                    Box::pin(async move { gw.invoke_entry("echoBool", vec![false.into()]).await })
                }),
                Probe::new("echo_string", |gw| {
                    Box::pin(async move {
                        gw.invoke_entry("echoString", vec!["js4j".into()]).await
                    })
                }),
            ],
        ),
        ProbeGroup::new(
            "Counter object",
            vec![
                Probe::new("counter_initial", |gw| {
                    Box::pin(async move {
                        let counter =
                            gw.invoke_entry("createCounter", vec![10.into()]).await?.into_object()?;
                        gw.invoke(&counter, "getValue", vec![]).await
                    })
                }),
                Probe::new("counter_increment", |gw| {
                    Box::pin(async move {
                        let counter =
                            gw.invoke_entry("createCounter", vec![5.into()]).await?.into_object()?;
                        gw.invoke(&counter, "increment", vec![]).await?;
                        gw.invoke(&counter, "getValue", vec![]).await
                    })
                }),
                Probe::new("counter_add", |gw| {
                    Box::pin(async move {
                        let counter =
                            gw.invoke_entry("createCounter", vec![3.into()]).await?.into_object()?;
                        gw.invoke(&counter, "add", vec![7.into()]).await?;
                        gw.invoke(&counter, "getValue", vec![]).await
                    })
                }),
            ],
        ),
        ProbeGroup::new(
            "Exceptions",
            vec![
                Probe::new("throw_exception", |gw| {
                    Box::pin(async move {
                        gw.invoke_entry("throwException", vec!["boom".into()]).await
                    })
                }),
                Probe::new("divide_by_zero", |gw| {
                    Box::pin(async move {
                        gw.invoke_entry("divideInts", vec![10.into(), 0.into()]).await
                    })
                }),
            ],
        ),
        ProbeGroup::new(
            "JVM namespace",
            vec![
                Probe::new("Math_abs", |gw| {
                    Box::pin(async move {
                        let math = gw.jvm_class("java.lang.Math").await?;
                        gw.call_static(&math, "abs", vec![(-42).into()]).await
                    })
                }),
                Probe::new("Math_max", |gw| {
                    Box::pin(async move {
                        let math = gw.jvm_class("java.lang.Math").await?;
                        gw.call_static(&math, "max", vec![3.into(), 7.into()]).await
                    })
                }),
                Probe::new("Math_min", |gw| {
                    Box::pin(async move {
                        let math = gw.jvm_class("java.lang.Math").await?;
                        gw.call_static(&math, "min", vec![3.into(), 7.into()]).await
                    })
                }),
                Probe::new("Math_PI", |gw| {
                    Box::pin(async move {
                        let math = gw.jvm_class("java.lang.Math").await?;
                        gw.static_field(&math, "PI").await
                    })
                }),
                Probe::new("Integer_MAX", |gw| {
                    Box::pin(async move {
                        let integer = gw.jvm_class("java.lang.Integer").await?;
                        gw.static_field(&integer, "MAX_VALUE").await
                    })
                }),
                Probe::new("String_valueOf_int", |gw| {
                    Box::pin(async move {
                        let string = gw.jvm_class("java.lang.String").await?;
                        gw.call_static(&string, "valueOf", vec![123.into()]).await
                    })
                }),
            ],
        ),
        ProbeGroup::new(
            "StringBuilder (constructor via JVM)",
            vec![Probe::new("stringbuilder_basic", |gw| {
                Box::pin(async move {
                    let class = gw.jvm_class("java.lang.StringBuilder").await?;
                    let builder = gw.construct(&class, vec!["Hello".into()]).await?;
                    gw.invoke(&builder, "append", vec![" World".into()]).await?;
                    gw.invoke(&builder, "toString", vec![]).await
                })
            })],
        ),
        ProbeGroup::new(
            "ArrayList (constructor via JVM)",
            vec![Probe::new("arraylist_add_size", |gw| {
                Box::pin(async move {
                    let class = gw.jvm_class("java.util.ArrayList").await?;
                    let list = gw.construct(&class, vec![]).await?;
                    gw.invoke(&list, "add", vec!["x".into()]).await?;
                    gw.invoke(&list, "add", vec!["y".into()]).await?;
                    gw.invoke(&list, "size", vec![]).await
                })
            })],
        ),
    ]
}

/// Total number of probes across all groups.
pub fn probe_count(groups: &[ProbeGroup]) -> usize {
    groups.iter().map(|g| g.probes.len()).sum()
}
