/// Registers a struct as a record.
///
/// Each listed field is paired with its tag: a bare JSON name such as
/// `"user_id,omitempty"`, or struct-tag pairs such as
/// `r#"name:"id" json:"user_id""#`. An empty tag leaves the field unnamed,
/// which flattens a nested record into its parent. Fields not listed are
/// invisible to the dynamic layer.
///
/// ```
/// use abi_dynamic::{record, get, Value};
///
/// #[derive(Debug, Clone, Default)]
/// struct Point {
///     x: i64,
///     y: i64,
/// }
///
/// record!(Point { x: "x", y: "y,omitempty" });
///
/// let p = Point { x: 3, y: 4 };
/// assert_eq!(get(&p, "x").map(|r| r.into_value()), Some(Value::Int(3)));
/// ```
#[macro_export]
macro_rules! record {
    ($ty:ty { $($field:ident : $tag:expr),* $(,)? }) => {
        impl $crate::Record for $ty {
            fn schema() -> &'static $crate::RecordSchema<Self> {
                static SCHEMA: ::std::sync::OnceLock<$crate::RecordSchema<$ty>> =
                    ::std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    $crate::RecordSchema::new(::std::stringify!($ty))
                    $(
                        .field(
                            ::std::stringify!($field),
                            $tag,
                            {
                                fn get(record: &$ty) -> &dyn $crate::Dynamic {
                                    &record.$field
                                }
                                get
                            },
                            {
                                fn get_mut(record: &mut $ty) -> &mut dyn $crate::Dynamic {
                                    &mut record.$field
                                }
                                get_mut
                            },
                        )
                    )*
                })
            }
        }

        impl $crate::Dynamic for $ty {
            fn kind(&self) -> $crate::Kind {
                $crate::Kind::Record
            }

            fn to_value(&self) -> $crate::Value {
                $crate::record::to_value(self)
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn clone_dyn(&self) -> ::std::boxed::Box<dyn $crate::Dynamic> {
                ::std::boxed::Box::new(::std::clone::Clone::clone(self))
            }

            fn is_nil(&self) -> bool {
                false
            }

            fn get(&self, key: &str) -> ::std::option::Option<$crate::Ref<'_>> {
                $crate::record::get(self, key)
            }

            fn get_mut(
                &mut self,
                key: &str,
                autocreate: bool,
            ) -> ::std::option::Option<&mut dyn $crate::Dynamic> {
                $crate::record::get_mut(self, key, autocreate)
            }

            fn set(&mut self, key: &str, value: $crate::Value) {
                $crate::record::set(self, key, value)
            }

            fn each<'a>(
                &'a self,
                visit: &mut $crate::Visitor<'a, '_>,
            ) -> ::std::ops::ControlFlow<()> {
                $crate::record::each(self, visit)
            }

            fn each_field<'a>(
                &'a self,
                naming: &$crate::Naming<'_>,
                visit: &mut $crate::FieldVisitor<'a, '_>,
            ) -> ::std::ops::ControlFlow<()> {
                $crate::record::each_field(self, naming, visit)
            }

            fn assign(&mut self, value: &$crate::Value) {
                $crate::record::assign(self, value)
            }
        }
    };
}
