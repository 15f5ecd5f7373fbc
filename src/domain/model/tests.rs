// Unit tests for domain models

#[cfg(test)]
mod tests {
    use crate::domain::model::*;

    #[test]
    fn test_class_name_of_full_name() {
        let name = ClassName::of_full_name("java.lang.Object").unwrap();
        assert_eq!(name.module(), None);
        assert_eq!(name.full_name(), "java.lang.Object");
        assert_eq!(name.simple_name(), "Object");
        assert_eq!(name.internal_name(), "java/lang/Object");
        assert_eq!(name.relative_file(), "java/lang/Object.class");
    }

    #[test]
    fn test_class_name_with_module_prefix() {
        let name = ClassName::of_full_name("java.base/java.lang.String").unwrap();
        assert_eq!(name.module(), Some("java.base"));
        assert_eq!(name.full_name(), "java.lang.String");
        assert_eq!(name.to_string(), "java.base/java.lang.String");
    }

    #[test]
    fn test_class_name_of_internal_name() {
        let name = ClassName::of_internal_name("java/lang/Thread$State").unwrap();
        assert_eq!(name.full_name(), "java.lang.Thread$State");
        assert_eq!(name.flat_name(), "java_lang_Thread_State");
    }

    #[test]
    fn test_class_name_invalid() {
        assert!(ClassName::of_full_name("").is_err());
        assert!(ClassName::of_full_name("a..b").is_err());
        assert!(ClassName::of_full_name("a.b.").is_err());
        assert!(ClassName::of_full_name("mod/pkg/Cls").is_err());
        assert!(ClassName::of_internal_name("java//lang").is_err());
    }

    #[test]
    fn test_class_name_parse() {
        assert_eq!(
            ClassName::parse("java/lang/Object").unwrap().full_name(),
            "java.lang.Object"
        );
        assert_eq!(
            ClassName::parse("java.base/java.lang.Object")
                .unwrap()
                .module(),
            Some("java.base")
        );
        assert_eq!(ClassName::parse("Object").unwrap().full_name(), "Object");
    }

    #[test]
    fn test_java_type_parse_primitives() {
        assert_eq!(JavaType::parse("I").unwrap(), JavaType::Int);
        assert_eq!(JavaType::parse("J").unwrap(), JavaType::Long);
        assert_eq!(JavaType::parse("V").unwrap(), JavaType::Void);
    }

    #[test]
    fn test_java_type_parse_object_and_array() {
        assert_eq!(
            JavaType::parse("Ljava/lang/String;").unwrap(),
            JavaType::Object("java/lang/String".to_string())
        );
        assert_eq!(
            JavaType::parse("[[I").unwrap(),
            JavaType::Array(Box::new(JavaType::Array(Box::new(JavaType::Int))))
        );
    }

    #[test]
    fn test_java_type_parse_invalid() {
        assert!(JavaType::parse("").is_err());
        assert!(JavaType::parse("L;").is_err());
        assert!(JavaType::parse("Ljava/lang/String").is_err());
        assert!(JavaType::parse("II").is_err()); // trailing garbage
        assert!(JavaType::parse("[V").is_err());
        assert!(JavaType::parse("Q").is_err());
    }

    #[test]
    fn test_java_type_descriptor_round_trip() {
        for desc in ["Z", "Ljava/util/Map$Entry;", "[[Ljava/lang/Object;", "[D"] {
            assert_eq!(JavaType::parse(desc).unwrap().descriptor(), desc);
        }
    }

    #[test]
    fn test_method_descriptor_parse() {
        let desc = MethodDescriptor::parse("(Ljava/lang/String;I)V").unwrap();
        assert_eq!(desc.params.len(), 2);
        assert_eq!(desc.ret, JavaType::Void);
        assert_eq!(desc.descriptor(), "(Ljava/lang/String;I)V");

        let desc = MethodDescriptor::parse("()I").unwrap();
        assert!(desc.params.is_empty());
        assert_eq!(desc.ret, JavaType::Int);
    }

    #[test]
    fn test_method_descriptor_invalid() {
        assert!(MethodDescriptor::parse("()").is_err()); // no return type
        assert!(MethodDescriptor::parse("Ljava/lang/String;").is_err());
        assert!(MethodDescriptor::parse("(V)V").is_err()); // void parameter
        assert!(MethodDescriptor::parse("(I)VV").is_err());
        assert!(MethodDescriptor::parse("(I").is_err());
    }

    #[test]
    fn test_native_method_of() {
        assert!(NativeMethod::of("method0", "()I", false).is_ok());
        assert!(NativeMethod::of("method1", "(Ljava/lang/String;)I", true).is_ok());

        assert!(NativeMethod::of("method2", "Ljava/lang/String;", false).is_err());
        assert!(NativeMethod::of("method3", "()", false).is_err());
        assert!(NativeMethod::of("a.b", "()V", false).is_err());
    }

    #[test]
    fn test_constant_c_literal() {
        assert_eq!(ConstantValue::Int(42).c_literal(), "42L");
        assert_eq!(ConstantValue::Int(-1).c_literal(), "-1L");
        assert_eq!(ConstantValue::Long(1 << 40).c_literal(), "1099511627776LL");
        assert_eq!(ConstantValue::Float(1.0).c_literal(), "1.0f");
        assert_eq!(ConstantValue::Double(2.5).c_literal(), "2.5");
        assert_eq!(ConstantValue::Float(f32::NAN).c_literal(), "NaNf");
        assert_eq!(
            ConstantValue::Double(f64::NEG_INFINITY).c_literal(),
            "-Infinity"
        );
    }

    #[test]
    fn test_method_groups_order() {
        let meta = ClassMetaInfo {
            name: ClassName::of_internal_name("p/C").unwrap(),
            super_name: None,
            constants: vec![],
            methods: vec![
                NativeMethod::of("f", "()I", false).unwrap(),
                NativeMethod::of("g", "()V", true).unwrap(),
                NativeMethod::of("f", "(I)I", false).unwrap(),
            ],
        };
        let groups = meta.method_groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "f");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "g");
    }
}
