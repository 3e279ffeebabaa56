//! Descriptor source: the parsed configuration tree registries are built from.
//!
//! A source is a set of named groups (`rarities`, `ammo`, `guns`, ...). Each group
//! holds one child node per content instance; the child's table key is the
//! instance key. Group order and child order follow the source document.

use tracing::debug;

use crate::error::{RegistryError, Result};

/// Shape errors raised while splitting a document into groups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
	/// A group or child entry is not a table.
	#[error("descriptor entry {path:?} must be a table")]
	NotATable { path: String },
}

/// One child descriptor: an instance key and its field table.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptorNode {
	pub key: String,
	pub fields: toml::Table,
}

impl DescriptorNode {
	pub fn new(key: impl Into<String>, fields: toml::Table) -> Self {
		Self { key: key.into(), fields }
	}

	/// Resolves a dotted field path, e.g. `stats.damage`.
	pub fn get(&self, path: &str) -> Option<&toml::Value> {
		let mut segments = path.split('.');
		let mut value = self.fields.get(segments.next()?)?;
		for segment in segments {
			value = value.as_table()?.get(segment)?;
		}
		Some(value)
	}
}

/// A named list of child descriptors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescriptorGroup {
	pub name: String,
	pub nodes: Vec<DescriptorNode>,
}

impl DescriptorGroup {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			nodes: Vec::new(),
		}
	}

	/// Appends a child. Keys are not checked here; the registry rejects duplicates.
	pub fn push(&mut self, node: DescriptorNode) -> &mut Self {
		self.nodes.push(node);
		self
	}

	pub fn with(mut self, node: DescriptorNode) -> Self {
		self.nodes.push(node);
		self
	}
}

/// All descriptor groups of one configuration document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescriptorSource {
	groups: Vec<DescriptorGroup>,
}

impl DescriptorSource {
	pub fn new() -> Self {
		Self::default()
	}

	/// Splits a TOML table into groups of child nodes.
	pub fn from_table(table: toml::Table) -> std::result::Result<Self, DescriptorError> {
		let mut source = Self::new();
		for (group_name, group_value) in table {
			let toml::Value::Table(children) = group_value else {
				return Err(DescriptorError::NotATable { path: group_name });
			};
			let mut group = DescriptorGroup::new(&group_name);
			for (key, child) in children {
				let toml::Value::Table(fields) = child else {
					return Err(DescriptorError::NotATable {
						path: format!("{group_name}.{key}"),
					});
				};
				group.push(DescriptorNode::new(key, fields));
			}
			debug!(group = %group_name, children = group.nodes.len(), "Descriptor group parsed");
			source.insert_group(group);
		}
		Ok(source)
	}

	pub fn group(&self, name: &str) -> Option<&DescriptorGroup> {
		self.groups.iter().find(|g| g.name == name)
	}

	/// Adds a group, replacing any existing group of the same name.
	pub fn insert_group(&mut self, group: DescriptorGroup) {
		match self.groups.iter_mut().find(|g| g.name == group.name) {
			Some(existing) => *existing = group,
			None => self.groups.push(group),
		}
	}

	pub fn with_group(mut self, group: DescriptorGroup) -> Self {
		self.insert_group(group);
		self
	}

	pub fn group_names(&self) -> impl Iterator<Item = &str> + '_ {
		self.groups.iter().map(|g| g.name.as_str())
	}
}

/// Typed field access for one child descriptor.
///
/// Every accessor reports failures against the node's `kind` and `key`. A field
/// that exists with the wrong shape is treated as missing.
#[derive(Debug, Clone, Copy)]
pub struct NodeReader<'a> {
	node: &'a DescriptorNode,
	kind: &'a str,
}

impl<'a> NodeReader<'a> {
	pub fn new(node: &'a DescriptorNode, kind: &'a str) -> Self {
		Self { node, kind }
	}

	pub fn key(&self) -> &'a str {
		&self.node.key
	}

	pub fn kind(&self) -> &'a str {
		self.kind
	}

	pub fn node(&self) -> &'a DescriptorNode {
		self.node
	}

	pub fn has(&self, path: &str) -> bool {
		self.node.get(path).is_some()
	}

	pub fn missing(&self, path: &str) -> RegistryError {
		RegistryError::missing_field(path, self.kind, &self.node.key)
	}

	/// Builds an [`RegistryError::InvalidField`] for this node.
	pub fn invalid(&self, path: &str, reason: impl Into<String>) -> RegistryError {
		RegistryError::InvalidField {
			path: path.to_owned(),
			kind: self.kind.to_owned(),
			key: self.node.key.clone(),
			reason: reason.into(),
		}
	}

	/// Wraps a kind-specific build failure of this node.
	pub fn construction(&self, source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> RegistryError {
		RegistryError::construction(self.kind, &self.node.key, source)
	}

	pub fn optional_str(&self, path: &str) -> Result<Option<&'a str>> {
		self.optional(path, toml::Value::as_str)
	}

	pub fn optional_i64(&self, path: &str) -> Result<Option<i64>> {
		self.optional(path, toml::Value::as_integer)
	}

	/// Reads a float; integer literals are accepted and widened.
	pub fn optional_f64(&self, path: &str) -> Result<Option<f64>> {
		self.optional(path, |v| v.as_float().or_else(|| v.as_integer().map(|i| i as f64)))
	}

	pub fn optional_bool(&self, path: &str) -> Result<Option<bool>> {
		self.optional(path, toml::Value::as_bool)
	}

	pub fn require_str(&self, path: &str) -> Result<&'a str> {
		self.optional_str(path)?.ok_or_else(|| self.missing(path))
	}

	pub fn require_i64(&self, path: &str) -> Result<i64> {
		self.optional_i64(path)?.ok_or_else(|| self.missing(path))
	}

	pub fn require_f64(&self, path: &str) -> Result<f64> {
		self.optional_f64(path)?.ok_or_else(|| self.missing(path))
	}

	pub fn require_bool(&self, path: &str) -> Result<bool> {
		self.optional_bool(path)?.ok_or_else(|| self.missing(path))
	}

	/// Reads a non-negative integer that fits in `u32`.
	pub fn require_u32(&self, path: &str) -> Result<u32> {
		let raw = self.require_i64(path)?;
		u32::try_from(raw).map_err(|_| self.invalid(path, format!("{raw} is out of range 0..={}", u32::MAX)))
	}

	fn optional<T>(&self, path: &str, extract: impl FnOnce(&'a toml::Value) -> Option<T>) -> Result<Option<T>> {
		match self.node.get(path) {
			None => Ok(None),
			Some(value) => extract(value).map(Some).ok_or_else(|| self.missing(path)),
		}
	}
}
