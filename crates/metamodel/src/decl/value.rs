use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

/// Declared type of a field, parameter, or method return.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
	Unit,
	Bool,
	Int,
	Text,
	Optional(Box<ValueType>),
	List(Box<ValueType>),
	/// Reference to another declared type, by name.
	Object(Arc<str>),
}

impl ValueType {
	pub fn optional(inner: ValueType) -> Self {
		Self::Optional(Box::new(inner))
	}

	pub fn list(element: ValueType) -> Self {
		Self::List(Box::new(element))
	}

	pub fn object(type_name: impl Into<Arc<str>>) -> Self {
		Self::Object(type_name.into())
	}

	/// Strips one level of `Optional`.
	pub fn required(&self) -> &ValueType {
		match self {
			Self::Optional(inner) => inner,
			other => other,
		}
	}

	pub fn is_list(&self) -> bool {
		matches!(self.required(), Self::List(_))
	}

	pub fn is_text(&self) -> bool {
		matches!(self.required(), Self::Text)
	}

	/// Name of the declared type this type refers to, looking through
	/// optionals and lists.
	pub fn referenced_type(&self) -> Option<&str> {
		match self {
			Self::Optional(inner) | Self::List(inner) => inner.referenced_type(),
			Self::Object(name) => Some(name),
			_ => None,
		}
	}

	/// Returns true if `value` inhabits this type.
	pub fn accepts(&self, value: &Value) -> bool {
		match (self, value) {
			(Self::Unit, Value::Nothing) => true,
			(Self::Bool, Value::Bool(_)) => true,
			(Self::Int, Value::Int(_)) => true,
			(Self::Text, Value::Text(_)) => true,
			(Self::Optional(_), Value::Nothing) => true,
			(Self::Optional(inner), v) => inner.accepts(v),
			(Self::List(elem), Value::List(items)) => items.iter().all(|v| elem.accepts(v)),
			(Self::Object(name), Value::Object(obj)) => **name == *obj.type_name(),
			_ => false,
		}
	}
}

impl fmt::Display for ValueType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Unit => f.write_str("unit"),
			Self::Bool => f.write_str("bool"),
			Self::Int => f.write_str("int"),
			Self::Text => f.write_str("text"),
			Self::Optional(inner) => write!(f, "{inner}?"),
			Self::List(elem) => write!(f, "[{elem}]"),
			Self::Object(name) => f.write_str(name),
		}
	}
}

/// Dynamic value passed to and returned from bound methods.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	Nothing,
	Bool(bool),
	Int(i64),
	Text(String),
	List(Vec<Value>),
	Object(ObjectState),
}

impl Value {
	pub fn is_nothing(&self) -> bool {
		matches!(self, Self::Nothing)
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(b) => Some(*b),
			_ => None,
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			Self::Int(n) => Some(*n),
			_ => None,
		}
	}

	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_list(&self) -> Option<&[Value]> {
		match self {
			Self::List(items) => Some(items),
			_ => None,
		}
	}

	/// Short label of the runtime shape, for error messages.
	pub fn label(&self) -> String {
		match self {
			Self::Nothing => "nothing".into(),
			Self::Bool(_) => "bool".into(),
			Self::Int(_) => "int".into(),
			Self::Text(_) => "text".into(),
			Self::List(_) => "list".into(),
			Self::Object(obj) => obj.type_name().to_string(),
		}
	}
}

impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Self::Bool(b)
	}
}

impl From<i64> for Value {
	fn from(n: i64) -> Self {
		Self::Int(n)
	}
}

impl From<i32> for Value {
	fn from(n: i32) -> Self {
		Self::Int(n.into())
	}
}

impl From<&str> for Value {
	fn from(s: &str) -> Self {
		Self::Text(s.to_string())
	}
}

impl From<String> for Value {
	fn from(s: String) -> Self {
		Self::Text(s)
	}
}

impl From<ObjectState> for Value {
	fn from(obj: ObjectState) -> Self {
		Self::Object(obj)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(opt: Option<T>) -> Self {
		opt.map_or(Self::Nothing, Into::into)
	}
}

impl<T: Into<Value>> From<Vec<T>> for Value {
	fn from(items: Vec<T>) -> Self {
		Self::List(items.into_iter().map(Into::into).collect())
	}
}

/// Field values of one instance of a declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectState {
	type_name: Arc<str>,
	fields: IndexMap<String, Value>,
}

impl ObjectState {
	pub fn new(type_name: impl Into<Arc<str>>) -> Self {
		Self {
			type_name: type_name.into(),
			fields: IndexMap::new(),
		}
	}

	/// Builder-style field assignment.
	pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
		self.set(field, value);
		self
	}

	pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
		self.fields.insert(field.into(), value.into());
	}

	pub fn get(&self, field: &str) -> Option<&Value> {
		self.fields.get(field)
	}

	pub fn type_name(&self) -> &str {
		&self.type_name
	}
}
