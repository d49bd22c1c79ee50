//! Raw declarations of application-defined types.
//!
//! Declarations are the input of the build. The host describes each candidate
//! type as data: its attributes, fields, and methods with their callable
//! bodies. Nothing here is interpreted; discovery units decide what the
//! attributes and method names mean.

mod method;
mod value;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

pub use self::method::{BoundMethod, MethodBody, Signature};
pub use self::value::{ObjectState, Value, ValueType};
use crate::error::InvokeError;

/// Ordered annotation pairs attached to a declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(IndexMap<Arc<str>, Arc<str>>);

impl Attributes {
	pub fn insert(&mut self, name: impl Into<Arc<str>>, value: impl Into<Arc<str>>) {
		self.0.insert(name.into(), value.into());
	}

	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.get(name).map(|v| &**v)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.0.contains_key(name)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (&**k, &**v))
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

/// A declared field. List-typed fields become collections.
#[derive(Debug, Clone)]
pub struct FieldDecl {
	name: Arc<str>,
	value_type: ValueType,
	attributes: Attributes,
}

impl FieldDecl {
	pub fn new(name: impl Into<Arc<str>>, value_type: ValueType) -> Self {
		Self {
			name: name.into(),
			value_type,
			attributes: Attributes::default(),
		}
	}

	pub fn attr(mut self, name: impl Into<Arc<str>>, value: impl Into<Arc<str>>) -> Self {
		self.attributes.insert(name, value);
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn value_type(&self) -> &ValueType {
		&self.value_type
	}

	pub fn attributes(&self) -> &Attributes {
		&self.attributes
	}

	pub fn is_collection(&self) -> bool {
		self.value_type.is_list()
	}
}

/// A declared method parameter.
#[derive(Debug, Clone)]
pub struct ParamDecl {
	name: Arc<str>,
	value_type: ValueType,
	attributes: Attributes,
}

impl ParamDecl {
	pub fn new(name: impl Into<Arc<str>>, value_type: ValueType) -> Self {
		Self {
			name: name.into(),
			value_type,
			attributes: Attributes::default(),
		}
	}

	pub fn attr(mut self, name: impl Into<Arc<str>>, value: impl Into<Arc<str>>) -> Self {
		self.attributes.insert(name, value);
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn value_type(&self) -> &ValueType {
		&self.value_type
	}

	pub fn attributes(&self) -> &Attributes {
		&self.attributes
	}
}

/// A declared method with its callable body.
#[derive(Clone)]
pub struct MethodDecl {
	name: Arc<str>,
	params: Vec<ParamDecl>,
	returns: ValueType,
	attributes: Attributes,
	body: MethodBody,
}

impl MethodDecl {
	pub fn new<F>(name: impl Into<Arc<str>>, returns: ValueType, body: F) -> Self
	where
		F: Fn(&ObjectState, &[Value]) -> Result<Value, InvokeError> + Send + Sync + 'static,
	{
		Self {
			name: name.into(),
			params: Vec::new(),
			returns,
			attributes: Attributes::default(),
			body: Arc::new(body),
		}
	}

	pub fn param(self, name: impl Into<Arc<str>>, value_type: ValueType) -> Self {
		self.param_decl(ParamDecl::new(name, value_type))
	}

	pub fn param_decl(mut self, param: ParamDecl) -> Self {
		self.params.push(param);
		self
	}

	pub fn attr(mut self, name: impl Into<Arc<str>>, value: impl Into<Arc<str>>) -> Self {
		self.attributes.insert(name, value);
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn params(&self) -> &[ParamDecl] {
		&self.params
	}

	pub fn returns(&self) -> &ValueType {
		&self.returns
	}

	pub fn attributes(&self) -> &Attributes {
		&self.attributes
	}

	pub fn signature(&self) -> Signature {
		Signature::new(
			self.params.iter().map(|p| p.value_type.clone()).collect(),
			self.returns.clone(),
		)
	}

	/// Resolves this declaration against its owning type.
	pub fn bind(&self, owner: &Arc<str>) -> BoundMethod {
		BoundMethod::new(owner.clone(), self.name.clone(), self.signature(), self.body.clone())
	}
}

impl fmt::Debug for MethodDecl {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MethodDecl")
			.field("name", &self.name)
			.field("signature", &self.signature().to_string())
			.field("attributes", &self.attributes)
			.finish_non_exhaustive()
	}
}

/// Index of a method within its declaring [`TypeDecl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodIdx(pub(crate) usize);

impl MethodIdx {
	pub fn index(self) -> usize {
		self.0
	}
}

/// A candidate type declaration.
#[derive(Debug, Clone)]
pub struct TypeDecl {
	name: Arc<str>,
	attributes: Attributes,
	fields: Vec<FieldDecl>,
	methods: Vec<MethodDecl>,
}

impl TypeDecl {
	pub fn new(name: impl Into<Arc<str>>) -> Self {
		Self {
			name: name.into(),
			attributes: Attributes::default(),
			fields: Vec::new(),
			methods: Vec::new(),
		}
	}

	pub fn attr(mut self, name: impl Into<Arc<str>>, value: impl Into<Arc<str>>) -> Self {
		self.attributes.insert(name, value);
		self
	}

	pub fn field(mut self, field: FieldDecl) -> Self {
		self.fields.push(field);
		self
	}

	pub fn method(mut self, method: MethodDecl) -> Self {
		self.methods.push(method);
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn name_arc(&self) -> &Arc<str> {
		&self.name
	}

	pub fn attributes(&self) -> &Attributes {
		&self.attributes
	}

	pub fn fields(&self) -> &[FieldDecl] {
		&self.fields
	}

	pub fn methods(&self) -> &[MethodDecl] {
		&self.methods
	}

	pub fn method_at(&self, idx: MethodIdx) -> Option<&MethodDecl> {
		self.methods.get(idx.0)
	}

	pub fn method_indices(&self) -> impl Iterator<Item = (MethodIdx, &MethodDecl)> {
		self.methods.iter().enumerate().map(|(i, m)| (MethodIdx(i), m))
	}
}
