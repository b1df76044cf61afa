use crate::value::Value;
use std::any::Any;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// A user-defined value with a class identity, readable properties and
/// zero-argument methods.
///
/// Implementors only need `class_name` and `as_any`; the rest have defaults.
/// `properties` doubles as the source for property lookups, whole-object
/// comparison and snapshots, so list them in a stable order.
///
/// # Examples
///
/// ```
/// use sovran_collections::{Object, ObjectRef, Value};
/// use std::any::Any;
///
/// #[derive(Debug)]
/// struct Person {
///     name: String,
/// }
///
/// impl Object for Person {
///     fn class_name(&self) -> &str {
///         "Person"
///     }
///
///     fn properties(&self) -> Vec<(String, Value)> {
///         vec![("name".to_string(), Value::from(self.name.as_str()))]
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
///
/// let person = ObjectRef::new(Person { name: "Ada".to_string() });
/// assert_eq!(person.property("name"), Some(Value::from("Ada")));
/// assert_eq!(person.downcast_ref::<Person>().map(|p| p.name.as_str()), Some("Ada"));
/// ```
pub trait Object: Any + Send + Sync + fmt::Debug {
    /// The name this object's class is known by
    fn class_name(&self) -> &str;

    /// Whether this object is an instance of, or implements, `type_name`
    fn is_instance_of(&self, type_name: &str) -> bool {
        same_type_name(self.class_name(), type_name)
    }

    /// Readable properties in declaration order
    fn properties(&self) -> Vec<(String, Value)> {
        Vec::new()
    }

    fn property(&self, name: &str) -> Option<Value> {
        self.properties()
            .into_iter()
            .find(|(property, _)| property == name)
            .map(|(_, value)| value)
    }

    /// Invokes a zero-argument method, or `None` when there is no such method
    fn call(&self, method: &str) -> Option<Value> {
        let _ = method;
        None
    }

    /// A custom string form, used by diagnostics when present
    fn to_display_string(&self) -> Option<String> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}

/// Type names match ASCII case-insensitively and ignore a leading `\`
pub fn same_type_name(a: &str, b: &str) -> bool {
    a.trim_start_matches('\\')
        .eq_ignore_ascii_case(b.trim_start_matches('\\'))
}

/// Shared handle to an [`Object`]; clones refer to the same object
#[derive(Clone)]
pub struct ObjectRef(Arc<dyn Object>);

impl ObjectRef {
    pub fn new<T: Object>(object: T) -> Self {
        Self(Arc::new(object))
    }

    /// True when both handles refer to the same object
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }

    /// Get a reference to the object if it is of type T
    pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// Check if the object is of type T
    pub fn is<T: Object>(&self) -> bool {
        self.0.as_any().is::<T>()
    }
}

impl Deref for ObjectRef {
    type Target = dyn Object;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl From<Arc<dyn Object>> for ObjectRef {
    fn from(object: Arc<dyn Object>) -> Self {
        Self(object)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

type Method = Arc<dyn Fn(&Record) -> Value + Send + Sync>;

/// A dynamic object built at runtime: a class name, the interfaces it
/// claims, ordered fields and zero-argument methods.
///
/// ```
/// use sovran_collections::{Object, Record, Value};
///
/// let bar = Record::new("Bar")
///     .implements("Named")
///     .with_field("id", 1)
///     .with_field("name", "a")
///     .with_method("getName", |r| r.field("name").cloned().unwrap_or(Value::Null));
///
/// assert!(bar.is_instance_of("named"));
/// assert_eq!(bar.call("getName"), Some(Value::from("a")));
/// ```
#[derive(Clone)]
pub struct Record {
    class: String,
    interfaces: Vec<String>,
    fields: Vec<(String, Value)>,
    methods: Vec<(String, Method)>,
}

impl Record {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Sets a field, replacing an existing field of the same name in place
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(field, _)| *field == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
        self
    }

    pub fn with_method<F>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(&Record) -> Value + Send + Sync + 'static,
    {
        self.methods.push((name.into(), Arc::new(method)));
        self
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn into_ref(self) -> ObjectRef {
        ObjectRef::new(self)
    }
}

impl Object for Record {
    fn class_name(&self) -> &str {
        &self.class
    }

    fn is_instance_of(&self, type_name: &str) -> bool {
        same_type_name(&self.class, type_name)
            || self
                .interfaces
                .iter()
                .any(|interface| same_type_name(interface, type_name))
    }

    fn properties(&self) -> Vec<(String, Value)> {
        self.fields.clone()
    }

    fn property(&self, name: &str) -> Option<Value> {
        self.field(name).cloned()
    }

    fn call(&self, method: &str) -> Option<Value> {
        self.methods
            .iter()
            .find(|(name, _)| name == method)
            .map(|(_, method)| method(self))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct(&self.class);
        for (name, value) in &self.fields {
            debug.field(name, value);
        }
        debug.finish()
    }
}
