use std::fmt;
use std::sync::Arc;

use super::value::{ObjectState, Value, ValueType};
use crate::error::InvokeError;

/// Callable body of a declared method.
pub type MethodBody = Arc<dyn Fn(&ObjectState, &[Value]) -> Result<Value, InvokeError> + Send + Sync>;

/// Parameter and return types of a method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
	params: Vec<ValueType>,
	returns: ValueType,
}

impl Signature {
	pub fn new(params: Vec<ValueType>, returns: ValueType) -> Self {
		Self { params, returns }
	}

	/// Signature of a method taking no arguments.
	pub fn returning(returns: ValueType) -> Self {
		Self::new(Vec::new(), returns)
	}

	pub fn params(&self) -> &[ValueType] {
		&self.params
	}

	pub fn returns(&self) -> &ValueType {
		&self.returns
	}

	pub fn arity(&self) -> usize {
		self.params.len()
	}
}

impl fmt::Display for Signature {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("(")?;
		for (i, p) in self.params.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{p}")?;
		}
		write!(f, ") -> {}", self.returns)
	}
}

/// A declared method resolved against its owning type.
///
/// Produced once at build time and invoked many times at interaction time.
/// Equality is by owner, name and signature; two bindings of the same
/// declaration are the same capability regardless of which unit produced them.
#[derive(Clone)]
pub struct BoundMethod {
	owner: Arc<str>,
	name: Arc<str>,
	signature: Signature,
	body: MethodBody,
}

impl BoundMethod {
	pub(crate) fn new(owner: Arc<str>, name: Arc<str>, signature: Signature, body: MethodBody) -> Self {
		Self {
			owner,
			name,
			signature,
			body,
		}
	}

	pub fn owner(&self) -> &str {
		&self.owner
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn signature(&self) -> &Signature {
		&self.signature
	}

	fn qualified(&self) -> String {
		format!("{}::{}", self.owner, self.name)
	}

	/// Invokes the method on `target`.
	///
	/// Runs synchronously on the caller's thread. Errors raised by the body
	/// propagate unchanged.
	pub fn invoke(&self, target: &ObjectState, args: &[Value]) -> Result<Value, InvokeError> {
		if target.type_name() != &*self.owner {
			return Err(InvokeError::WrongTarget {
				method: self.qualified(),
				expected: self.owner.to_string(),
				found: target.type_name().to_string(),
			});
		}
		if args.len() != self.signature.arity() {
			return Err(InvokeError::Arity {
				method: self.qualified(),
				expected: self.signature.arity(),
				found: args.len(),
			});
		}
		let out = (self.body)(target, args)?;
		if !self.signature.returns().accepts(&out) {
			return Err(InvokeError::UnexpectedReturn {
				method: self.qualified(),
				expected: self.signature.returns().to_string(),
				found: out.label(),
			});
		}
		Ok(out)
	}

	/// Invokes a method returning text or nothing.
	pub fn invoke_text(&self, target: &ObjectState, args: &[Value]) -> Result<Option<String>, InvokeError> {
		match self.invoke(target, args)? {
			Value::Text(s) => Ok(Some(s)),
			_ => Ok(None),
		}
	}

	/// Invokes a method returning a boolean; nothing reads as `false`.
	pub fn invoke_bool(&self, target: &ObjectState, args: &[Value]) -> Result<bool, InvokeError> {
		Ok(self.invoke(target, args)?.as_bool().unwrap_or(false))
	}
}

impl PartialEq for BoundMethod {
	fn eq(&self, other: &Self) -> bool {
		self.owner == other.owner && self.name == other.name && self.signature == other.signature
	}
}

impl Eq for BoundMethod {}

impl fmt::Debug for BoundMethod {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "BoundMethod({}::{}{})", self.owner, self.name, self.signature)
	}
}
