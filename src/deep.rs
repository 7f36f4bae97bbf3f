//! Structure-preserving remapping of nested values.
//!
//! Lists, sets and maps are shared (`Rc<RefCell<..>>`) so a value graph may
//! contain the same container more than once, or contain itself. `deep_apply`
//! copies such a graph while keeping that shape: each input container maps to
//! exactly one output container.

use crate::error::Result;
use crate::remap::{PrefixRemapper, is_clean};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::rc::Rc;

pub type SharedList = Rc<RefCell<Vec<Value>>>;
pub type SharedSet = Rc<RefCell<BTreeSet<Key>>>;
pub type SharedMap = Rc<RefCell<BTreeMap<Key, Value>>>;

/// A hashable, immutable value usable as a set member or map key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
	Null,
	Bool(bool),
	Int(i64),
	Str(String),
	Tuple(Vec<Key>),
}

/// A node in a possibly cyclic value graph.
#[derive(Clone)]
pub enum Value {
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	/// A JSON number that does not fit an `Int`, kept as parsed.
	Number(serde_json::Number),
	Str(String),
	/// Immutable sequence; copied, never shared.
	Tuple(Vec<Value>),
	List(SharedList),
	Set(SharedSet),
	Map(SharedMap),
}

impl Value {
	pub fn list(items: Vec<Value>) -> Self {
		Value::List(Rc::new(RefCell::new(items)))
	}

	pub fn set(items: impl IntoIterator<Item = Key>) -> Self {
		Value::Set(Rc::new(RefCell::new(items.into_iter().collect())))
	}

	pub fn map(items: impl IntoIterator<Item = (Key, Value)>) -> Self {
		Value::Map(Rc::new(RefCell::new(items.into_iter().collect())))
	}

	pub fn str(s: impl Into<String>) -> Self {
		Value::Str(s.into())
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Str(s) => Some(s),
			_ => None,
		}
	}

	/// Identity of a shared container, if this is one.
	pub fn identity(&self) -> Option<*const ()> {
		match self {
			Value::List(rc) => Some(Rc::as_ptr(rc) as *const ()),
			Value::Set(rc) => Some(Rc::as_ptr(rc) as *const ()),
			Value::Map(rc) => Some(Rc::as_ptr(rc) as *const ()),
			_ => None,
		}
	}

	/// True if both values are the same shared container.
	pub fn ptr_eq(&self, other: &Value) -> bool {
		matches!((self.identity(), other.identity()), (Some(a), Some(b)) if a == b)
	}
}

impl fmt::Debug for Value {
	// Containers print shallowly; a cyclic graph would never finish otherwise.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Null => f.write_str("Null"),
			Value::Bool(b) => write!(f, "Bool({b})"),
			Value::Int(i) => write!(f, "Int({i})"),
			Value::Float(x) => write!(f, "Float({x})"),
			Value::Number(n) => write!(f, "Number({n})"),
			Value::Str(s) => write!(f, "Str({s:?})"),
			Value::Tuple(items) => f.debug_tuple("Tuple").field(items).finish(),
			Value::List(rc) => write!(f, "List(<{} items @{:p}>)", rc.borrow().len(), Rc::as_ptr(rc)),
			Value::Set(rc) => write!(f, "Set({:?})", rc.borrow()),
			Value::Map(rc) => write!(f, "Map(<{} entries @{:p}>)", rc.borrow().len(), Rc::as_ptr(rc)),
		}
	}
}

/// Options for [`deep_apply`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DeepOptions {
	/// Also rewrite string map keys (and strings inside tuple keys).
	pub dict_keys: bool,
}

/// Copy `value`, passing every string leaf through `f`.
///
/// Shared containers are memoized by identity. The empty replacement is
/// registered before its children are visited, so a container that reaches
/// itself maps to a container that reaches itself.
pub fn deep_apply<F>(value: &Value, options: DeepOptions, mut f: F) -> Result<Value>
where
	F: FnMut(&str) -> Result<String>,
{
	let mut walker = Walker {
		options,
		memo: HashMap::new(),
		f: &mut f,
	};
	walker.value(value)
}

struct Walker<'f> {
	options: DeepOptions,
	memo: HashMap<*const (), Value>,
	f: &'f mut dyn FnMut(&str) -> Result<String>,
}

impl Walker<'_> {
	fn value(&mut self, value: &Value) -> Result<Value> {
		if let Some(id) = value.identity()
			&& let Some(done) = self.memo.get(&id)
		{
			return Ok(done.clone());
		}

		match value {
			Value::Str(s) => Ok(Value::Str((self.f)(s.as_str())?)),
			Value::Tuple(items) => Ok(Value::Tuple(
				items
					.iter()
					.map(|item| self.value(item))
					.collect::<Result<_>>()?,
			)),
			Value::List(rc) => {
				let new: SharedList = Rc::default();
				self.memo.insert(Rc::as_ptr(rc) as *const (), Value::List(new.clone()));
				for item in rc.borrow().iter() {
					let item = self.value(item)?;
					new.borrow_mut().push(item);
				}
				Ok(Value::List(new))
			}
			Value::Set(rc) => {
				let new: SharedSet = Rc::default();
				self.memo.insert(Rc::as_ptr(rc) as *const (), Value::Set(new.clone()));
				for key in rc.borrow().iter() {
					let key = self.key(key)?;
					new.borrow_mut().insert(key);
				}
				Ok(Value::Set(new))
			}
			Value::Map(rc) => {
				let new: SharedMap = Rc::default();
				self.memo.insert(Rc::as_ptr(rc) as *const (), Value::Map(new.clone()));
				for (key, item) in rc.borrow().iter() {
					let key = if self.options.dict_keys {
						self.key(key)?
					} else {
						key.clone()
					};
					let item = self.value(item)?;
					new.borrow_mut().insert(key, item);
				}
				Ok(Value::Map(new))
			}
			Value::Null | Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Number(_) => {
				Ok(value.clone())
			}
		}
	}

	fn key(&mut self, key: &Key) -> Result<Key> {
		Ok(match key {
			Key::Str(s) => Key::Str((self.f)(s.as_str())?),
			Key::Tuple(items) => Key::Tuple(
				items
					.iter()
					.map(|item| self.key(item))
					.collect::<Result<_>>()?,
			),
			Key::Null | Key::Bool(_) | Key::Int(_) => key.clone(),
		})
	}
}

impl PrefixRemapper {
	/// Remap every path string inside `value`.
	///
	/// Strings that are not clean absolute paths are left untouched.
	pub fn deep_remap(&self, value: &Value, options: DeepOptions) -> Result<Value> {
		deep_apply(value, options, |s| {
			if is_clean(s, self.separator()) {
				self.remap(s)
			} else {
				Ok(s.to_string())
			}
		})
	}
}

impl From<&serde_json::Value> for Value {
	fn from(json: &serde_json::Value) -> Self {
		match json {
			serde_json::Value::Null => Value::Null,
			serde_json::Value::Bool(b) => Value::Bool(*b),
			serde_json::Value::Number(n) => match n.as_i64() {
				Some(i) => Value::Int(i),
				None => Value::Number(n.clone()),
			},
			serde_json::Value::String(s) => Value::Str(s.clone()),
			serde_json::Value::Array(items) => Value::list(items.iter().map(Value::from).collect()),
			serde_json::Value::Object(fields) => Value::map(
				fields
					.iter()
					.map(|(k, v)| (Key::Str(k.clone()), Value::from(v))),
			),
		}
	}
}

impl Value {
	/// Convert back to JSON.
	///
	/// JSON cannot express sharing, so shared containers are expanded; a
	/// container that reaches itself is written as `null` at the point of
	/// recursion. Sets become arrays and non-string keys are stringified.
	pub fn to_json(&self) -> serde_json::Value {
		self.to_json_guarded(&mut Vec::new())
	}

	fn to_json_guarded(&self, active: &mut Vec<*const ()>) -> serde_json::Value {
		if let Some(id) = self.identity() {
			if active.contains(&id) {
				return serde_json::Value::Null;
			}
			active.push(id);
		}

		let json = match self {
			Value::Null => serde_json::Value::Null,
			Value::Bool(b) => serde_json::Value::Bool(*b),
			Value::Int(i) => serde_json::Value::from(*i),
			Value::Float(x) => serde_json::Number::from_f64(*x)
				.map(serde_json::Value::Number)
				.unwrap_or(serde_json::Value::Null),
			Value::Number(n) => serde_json::Value::Number(n.clone()),
			Value::Str(s) => serde_json::Value::String(s.clone()),
			Value::Tuple(items) => serde_json::Value::Array(
				items.iter().map(|item| item.to_json_guarded(active)).collect(),
			),
			Value::List(rc) => serde_json::Value::Array(
				rc.borrow()
					.iter()
					.map(|item| item.to_json_guarded(active))
					.collect(),
			),
			Value::Set(rc) => serde_json::Value::Array(rc.borrow().iter().map(Key::to_json).collect()),
			Value::Map(rc) => serde_json::Value::Object(
				rc.borrow()
					.iter()
					.map(|(k, v)| (k.to_json_key(), v.to_json_guarded(active)))
					.collect(),
			),
		};

		if self.identity().is_some() {
			active.pop();
		}
		json
	}
}

impl Key {
	fn to_json(&self) -> serde_json::Value {
		match self {
			Key::Null => serde_json::Value::Null,
			Key::Bool(b) => serde_json::Value::Bool(*b),
			Key::Int(i) => serde_json::Value::from(*i),
			Key::Str(s) => serde_json::Value::String(s.clone()),
			Key::Tuple(items) => serde_json::Value::Array(items.iter().map(Key::to_json).collect()),
		}
	}

	fn to_json_key(&self) -> String {
		match self {
			Key::Str(s) => s.clone(),
			other => other.to_json().to_string(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn remapper() -> PrefixRemapper {
		PrefixRemapper::from_pairs([("/src", "/dst"), ("/old", "/new")]).unwrap()
	}

	fn list_items(value: &Value) -> Vec<Value> {
		match value {
			Value::List(rc) => rc.borrow().clone(),
			other => panic!("Expected list, got {other:?}"),
		}
	}

	#[test]
	fn test_leaves_are_remapped() {
		let input = Value::list(vec![
			Value::str("/src/a"),
			Value::Int(3),
			Value::str("not a path"),
			Value::Tuple(vec![Value::str("/old/b"), Value::Float(1.5)]),
		]);

		let output = remapper().deep_remap(&input, DeepOptions::default()).unwrap();
		let items = list_items(&output);

		assert_eq!(items[0].as_str(), Some("/dst/a"));
		assert!(matches!(items[1], Value::Int(3)));
		assert_eq!(items[2].as_str(), Some("not a path"));
		match &items[3] {
			Value::Tuple(parts) => {
				assert_eq!(parts[0].as_str(), Some("/new/b"));
				assert!(matches!(parts[1], Value::Float(x) if x == 1.5));
			}
			other => panic!("Expected tuple, got {other:?}"),
		}
		assert!(!output.ptr_eq(&input));
	}

	#[test]
	fn test_self_referential_list_stays_cyclic() {
		let input = Value::list(vec![Value::str("/src/x")]);
		if let Value::List(rc) = &input {
			rc.borrow_mut().push(input.clone());
		}

		let output = remapper().deep_remap(&input, DeepOptions::default()).unwrap();
		let items = list_items(&output);

		assert_eq!(items.len(), 2);
		assert_eq!(items[0].as_str(), Some("/dst/x"));
		assert!(items[1].ptr_eq(&output));
		assert!(!items[1].ptr_eq(&input));
	}

	#[test]
	fn test_shared_substructure_stays_shared() {
		let shared = Value::list(vec![Value::str("/old/file")]);
		let input = Value::map([
			(Key::Str("first".into()), shared.clone()),
			(Key::Str("second".into()), shared.clone()),
		]);

		let output = remapper().deep_remap(&input, DeepOptions::default()).unwrap();
		let Value::Map(rc) = &output else {
			panic!("Expected map");
		};
		let map = rc.borrow();
		let first = &map[&Key::Str("first".into())];
		let second = &map[&Key::Str("second".into())];

		assert!(first.ptr_eq(second));
		assert_eq!(list_items(first)[0].as_str(), Some("/new/file"));
	}

	#[test]
	fn test_map_keys_only_when_requested() {
		let input = Value::map([(Key::Str("/src/key".into()), Value::str("/src/value"))]);
		let map = remapper();

		let output = map.deep_remap(&input, DeepOptions::default()).unwrap();
		let Value::Map(rc) = &output else {
			panic!("Expected map");
		};
		assert_eq!(
			rc.borrow()[&Key::Str("/src/key".into())].as_str(),
			Some("/dst/value")
		);

		let output = map
			.deep_remap(&input, DeepOptions { dict_keys: true })
			.unwrap();
		let Value::Map(rc) = &output else {
			panic!("Expected map");
		};
		assert!(rc.borrow().contains_key(&Key::Str("/dst/key".into())));
	}

	#[test]
	fn test_sets_are_remapped() {
		let input = Value::set([
			Key::Str("/src/a".into()),
			Key::Tuple(vec![Key::Str("/old".into()), Key::Int(1)]),
		]);

		let output = remapper().deep_remap(&input, DeepOptions::default()).unwrap();
		let Value::Set(rc) = &output else {
			panic!("Expected set");
		};
		let set = rc.borrow();
		assert!(set.contains(&Key::Str("/dst/a".into())));
		assert!(set.contains(&Key::Tuple(vec![Key::Str("/new".into()), Key::Int(1)])));
	}

	#[test]
	fn test_errors_propagate() {
		let input = Value::list(vec![Value::str("anything")]);
		let result = deep_apply(&input, DeepOptions::default(), |_| {
			Err(crate::error::DirmapError::HomeDirectoryNotFound)
		});
		assert!(result.is_err());
	}

	#[test]
	fn test_json_conversion() {
		let json = serde_json::json!({
			"scene": "/src/shots/a.mb",
			"refs": ["/old/tex.png", 4, null, true, 2.5],
		});

		let value = Value::from(&json);
		let output = remapper().deep_remap(&value, DeepOptions::default()).unwrap();

		assert_eq!(
			output.to_json(),
			serde_json::json!({
				"scene": "/dst/shots/a.mb",
				"refs": ["/new/tex.png", 4, null, true, 2.5],
			})
		);
	}

	#[test]
	fn test_json_numbers_pass_through_unchanged() {
		let json = serde_json::json!({
			"id": u64::MAX,
			"offset": i64::MIN,
			"scale": 0.1,
			"path": "/src/a",
		});

		let value = Value::from(&json);
		let output = remapper().deep_remap(&value, DeepOptions::default()).unwrap();

		assert_eq!(
			output.to_json(),
			serde_json::json!({
				"id": 18446744073709551615u64,
				"offset": i64::MIN,
				"scale": 0.1,
				"path": "/dst/a",
			})
		);
		assert_eq!(
			output.to_json()["id"].to_string(),
			"18446744073709551615"
		);
	}

	#[test]
	fn test_cyclic_to_json_terminates() {
		let input = Value::list(vec![Value::Int(1)]);
		if let Value::List(rc) = &input {
			rc.borrow_mut().push(input.clone());
		}
		assert_eq!(input.to_json(), serde_json::json!([1, null]));
	}
}
