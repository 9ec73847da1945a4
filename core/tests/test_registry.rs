// Registry: reserved tags, composite tag assignment, idempotent resolution,
// recursive types, lookup-only vs resolving encoders and the schema dump.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use cryo_core::codec::I32Codec;
    use cryo_core::constants::{PrimitiveTag, FIRST_COMPOSITE_TAG};
    use cryo_core::prelude::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Counter {
        count: i32,
    }
    typed_struct!(Counter { count });

    #[derive(Debug, Clone, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }
    typed_struct!(Point { x, y });

    #[derive(Debug, Clone, PartialEq)]
    struct Node {
        value: i32,
        next: Option<Box<Node>>,
    }
    typed_struct!(Node { value, next });

    #[derive(Debug, Clone, PartialEq)]
    struct Tree {
        name: String,
        children: Vec<Tree>,
    }
    typed_struct!(Tree { name, children });

    #[derive(Debug, Clone, PartialEq)]
    struct Chain {
        next: Option<Box<Chain>>,
        x: i32,
    }
    typed_struct!(Chain { next, x });

    #[derive(Debug, Clone, PartialEq)]
    struct Labeled {
        at: Point,
        label: String,
    }
    typed_struct!(Labeled { at, label });

// # 1. Reserved tags

    #[test]
    fn primitives_bind_reserved_tags() {
        let registry = Registry::with_primitives();

        assert_eq!(registry.tag_of(&TypeDesc::I32), Some(1));
        assert_eq!(registry.tag_of(&TypeDesc::I64), Some(2));
        assert_eq!(registry.tag_of(&TypeDesc::String), Some(12));
        assert_eq!(registry.tag_of(&TypeDesc::Any), Some(15));
        assert_eq!(registry.tag_of(&TypeDesc::map(TypeDesc::String, TypeDesc::Any)), Some(16));
        assert_eq!(registry.tag_of(&Zone::type_desc()), Some(PrimitiveTag::Zone.tag()));
        assert_eq!(registry.len(), 17);
    }

    #[test]
    #[should_panic]
    fn primitive_tag_collision_panics() {
        let mut registry = Registry::with_primitives();
        registry.register_primitive(1, I32Codec, TypeDesc::I64);
    }

    #[test]
    #[should_panic]
    fn rebinding_a_type_panics() {
        let mut registry = Registry::with_primitives();
        registry.register_primitive(19, I32Codec, TypeDesc::I32);
    }

// # 2. Composite tags start at 200 and grow

    #[test]
    fn struct_gets_first_composite_tag() {
        let mut registry = Registry::with_primitives();

        let tag = registry.register_struct::<Counter>().unwrap();
        assert_eq!(tag, FIRST_COMPOSITE_TAG);
        assert_eq!(registry.desc(tag).unwrap(), &Counter::type_desc());
    }

    #[test]
    fn field_types_are_bound_before_the_struct() {
        let mut registry = Registry::with_primitives();

        #[derive(Debug, Clone, PartialEq)]
        struct Polygon {
            points: Vec<Point>,
        }
        typed_struct!(Polygon { points });

        let polygon = registry.register_struct::<Polygon>().unwrap();
        let point = registry.tag_of(&Point::type_desc()).unwrap();
        let points = registry.tag_of(&Vec::<Point>::type_desc()).unwrap();

        assert_eq!((point, points, polygon), (200, 201, 202));
    }

    #[test]
    fn register_struct_rejects_non_structs() {
        let mut registry = Registry::with_primitives();
        let err = registry.register_struct::<Vec<i32>>().unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch { .. }));
    }

// # 3. Tag stability

    #[test]
    fn resolution_is_idempotent() {
        let mut registry = Registry::with_primitives();

        let a = registry.register_type::<HashMap<String, Vec<i64>>>().unwrap();
        let bound = registry.len();
        let b = registry.register_type::<HashMap<String, Vec<i64>>>().unwrap();

        assert_eq!(a, b);
        assert_eq!(registry.len(), bound);
        let first = registry.register_struct::<Point>().unwrap();
        assert_eq!(registry.register_struct::<Point>().unwrap(), first);
    }

    #[test]
    fn map_of_string_to_any_reuses_reserved_tag() {
        let mut registry = Registry::with_primitives();
        let tag = registry.register_type::<HashMap<String, Dynamic>>().unwrap();
        assert_eq!(tag, PrimitiveTag::DynMap.tag());
    }

// # 4. Resolution failures

    #[test]
    fn unbound_scalar_is_unresolvable() {
        let mut registry = Registry::new();
        let err = registry.register_type::<i32>().unwrap_err();
        assert!(matches!(err, CodecError::UnresolvableType(ref name) if name == "i32"));
    }

    #[test]
    fn unresolvable_field_names_the_field() {
        let mut registry = Registry::new();
        let err = registry.register_struct::<Counter>().unwrap_err();

        assert!(matches!(err, CodecError::Field { field: "count", .. }));
        assert!(matches!(err.root_cause(), CodecError::UnresolvableType(_)));
        assert!(registry.tag_of(&Counter::type_desc()).is_none());
    }

    #[test]
    fn failed_recursive_struct_is_rolled_back() {
        let mut registry = Registry::new();

        // `next` reserves 200 for Chain and binds its pointer at 201, then `x` fails.
        let err = registry.register_struct::<Chain>().unwrap_err();
        assert!(matches!(err, CodecError::Field { field: "x", .. }));
        assert!(registry.tag_of(&Option::<Box<Chain>>::type_desc()).is_none());
        assert!(registry.tag_of(&Chain::type_desc()).is_none());
        assert!(registry.is_empty());

        registry.register_primitives();
        let chain = registry.register_struct::<Chain>().unwrap();
        let next = registry.tag_of(&Option::<Box<Chain>>::type_desc()).unwrap();
        assert_eq!((chain, next), (202, 203));
        assert!(matches!(registry.codec(200), Err(CodecError::UnknownTag(200))));
        assert!(matches!(registry.codec(201), Err(CodecError::UnknownTag(201))));

        let value = Chain { next: Some(Box::new(Chain { next: None, x: 2 })), x: 1 };
        let frame = Encoder::new(&registry).encode(&value).unwrap();
        let decoded: Chain = Decoder::new(&registry, frame.as_slice()).decode_as().unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn failed_struct_keeps_bindings_made_before_it() {
        let mut registry = Registry::new();
        registry.register_primitive(PrimitiveTag::I32.tag(), I32Codec, TypeDesc::I32);
        let point = registry.register_struct::<Point>().unwrap();

        let err = registry.register_struct::<Labeled>().unwrap_err();
        assert!(matches!(err, CodecError::Field { field: "label", .. }));
        assert_eq!(registry.tag_of(&Point::type_desc()), Some(point));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn unknown_tag_lookup() {
        let registry = Registry::with_primitives();
        assert!(matches!(registry.codec(250), Err(CodecError::UnknownTag(250))));
    }

    #[test]
    fn composite_tag_space_is_finite() {
        let mut registry = Registry::with_primitives();

        let mut last = Ok(0);
        for len in 0..=60 {
            last = registry.resolve_type(&TypeDesc::array(TypeDesc::U8, len));
            if last.is_err() {
                break;
            }
        }
        assert!(matches!(last, Err(CodecError::TagSpaceExhausted)));
    }

// # 5. Recursive types

    #[test]
    fn self_referential_struct_through_pointer() {
        let mut registry = Registry::with_primitives();

        let node = registry.register_struct::<Node>().unwrap();
        let next = registry.tag_of(&Option::<Box<Node>>::type_desc()).unwrap();
        assert_eq!(node, 200);
        assert_eq!(next, 201);

        let list = Node {
            value: 1,
            next: Some(Box::new(Node {
                value: 2,
                next: Some(Box::new(Node { value: 3, next: None })),
            })),
        };
        let frame = Encoder::new(&registry).encode(&list).unwrap();
        let decoded: Node = Decoder::new(&registry, frame.as_slice()).decode_as().unwrap();
        assert_eq!(decoded, list);
    }

    #[test]
    fn self_referential_struct_through_slice() {
        let mut registry = Registry::with_primitives();
        registry.register_struct::<Tree>().unwrap();

        let tree = Tree {
            name: "root".into(),
            children: vec![
                Tree { name: "a".into(), children: vec![] },
                Tree {
                    name: "b".into(),
                    children: vec![Tree { name: "c".into(), children: vec![] }],
                },
            ],
        };
        let frame = Encoder::new(&registry).encode(&tree).unwrap();
        let decoded: Tree = Decoder::new(&registry, frame.as_slice()).decode_as().unwrap();
        assert_eq!(decoded, tree);
    }

// # 6. Lookup-only vs resolving encoders

    #[test]
    fn lookup_only_encoder_reports_unregistered_types() {
        let registry = Registry::with_primitives();
        let err = Encoder::new(&registry).encode(&Point { x: 1, y: 2 }).unwrap_err();
        assert!(matches!(err, CodecError::NotRegistered(_)));
    }

    #[test]
    fn resolving_encoder_registers_on_first_use() {
        let mut registry = Registry::with_primitives();
        let frame = Encoder::resolving(&mut registry).encode(&Point { x: 1, y: 2 }).unwrap();

        assert_eq!(frame[1], 200);
        assert_eq!(registry.tag_of(&Point::type_desc()), Some(200));
    }

    #[test]
    fn resolving_encoder_registers_types_held_in_any_slots() {
        let mut registry = Registry::with_primitives();
        let mut map = HashMap::new();
        map.insert("p".to_string(), Dynamic::new(&Point { x: 3, y: 4 }));

        Encoder::resolving(&mut registry).encode(&map).unwrap();
        assert!(registry.tag_of(&Point::type_desc()).is_some());
    }

    #[test]
    fn frozen_registry_is_shared_across_threads() {
        let mut registry = Registry::with_primitives();
        registry.register_struct::<Point>().unwrap();
        let shared = registry.freeze();

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let shared = SharedRegistry::clone(&shared);
                std::thread::spawn(move || {
                    let p = Point { x: i, y: -i };
                    let frame = Encoder::new(&shared).encode(&p).unwrap();
                    let back: Point = Decoder::new(&shared, frame.as_slice()).decode_as().unwrap();
                    back == p
                })
            })
            .collect();

        for h in handles {
            assert!(h.join().unwrap());
        }
    }

// # 7. Schema dump

    #[test]
    fn schema_lists_struct_fields_in_wire_order() {
        let mut registry = Registry::with_primitives();
        let tag = registry.register_struct::<Point>().unwrap();

        let schema = registry.schema();
        let entry = schema.iter().find(|e| e.tag == tag).unwrap();
        assert!(entry.type_name.ends_with("Point"));
        assert_eq!(entry.codec, "struct");
        let fields: Vec<_> = entry.fields.iter().map(|f| (f.name, f.tag)).collect();
        assert_eq!(fields, [("x", 1), ("y", 1)]);

        let json = registry.schema_json().unwrap();
        assert!(json.contains("\"codec\": \"struct\""));
        assert!(json.contains("\"tag\": 200"));
    }

    #[test]
    fn lenient_config_is_reported() {
        let config = RegistryConfig { field_order: FieldOrder::Lenient };
        let registry = Registry::with_primitives_and_config(config);
        assert_eq!(registry.config().field_order, FieldOrder::Lenient);
        assert_eq!(Registry::new().config().field_order, FieldOrder::Strict);
    }
}
