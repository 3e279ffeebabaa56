//! Event subscription and dispatch.
//!
//! Each [`KindDef`] lists its handlers. Registering an instance walks its kind
//! chain up to [`ROOT_KIND`](crate::item::ROOT_KIND) and subscribes every level's
//! handlers, bound to that instance. A level is subscribed once; later instances
//! of the same kind are no-ops unless the caller forces a refresh.
//!
//! Dispatch matches the event's concrete type exactly. Handlers run synchronously
//! and the first error aborts delivery to the remaining subscriptions.

use std::any::{Any, TypeId, type_name};
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::error::Result;
use crate::index::ItemManager;
use crate::item::{Item, KindDef};

/// A host notification that handlers can subscribe to.
pub trait Event: Any {
	/// Name used in logs and errors.
	fn event_name() -> &'static str
	where
		Self: Sized,
	{
		type_name::<Self>()
	}
}

/// Failure raised by a handler.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
	/// The bound instance is not of the kind the handler was written for.
	#[error("handler {handler} expects a {expected} instance, {found:?} is not one")]
	BindingMismatch {
		handler: &'static str,
		expected: &'static str,
		found: String,
	},

	/// The handler was invoked with an event of another type.
	#[error("handler {handler} received an event it is not subscribed to")]
	EventMismatch { handler: &'static str },

	#[error(transparent)]
	Failed(Box<dyn StdError + Send + Sync>),
}

impl HandlerError {
	pub fn failed(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
		Self::Failed(source.into())
	}
}

pub type HandlerResult = std::result::Result<(), HandlerError>;

/// A handler error surfaced from [`EventManager::dispatch`].
#[derive(Debug, thiserror::Error)]
#[error("handler {handler} of {kind} failed on {event}")]
pub struct DispatchError {
	pub handler: &'static str,
	pub kind: &'static str,
	pub event: &'static str,
	#[source]
	pub source: HandlerError,
}

type HandlerFn = dyn Fn(&(dyn Item + 'static), &mut dyn Any, &ItemManager) -> HandlerResult + Send + Sync;

/// One event handler declared by a kind.
#[derive(Clone)]
pub struct Handler {
	name: &'static str,
	event: TypeId,
	event_name: &'static str,
	call: Arc<HandlerFn>,
}

impl Handler {
	/// Handler receiving the bound instance as `&dyn Item`.
	///
	/// Use this on shared base kinds whose handlers apply to every derived kind.
	pub fn for_item<E: Event>(name: &'static str, f: fn(&dyn Item, &mut E, &ItemManager) -> HandlerResult) -> Self {
		Self {
			name,
			event: TypeId::of::<E>(),
			event_name: E::event_name(),
			call: Arc::new(move |item: &(dyn Item + 'static), event: &mut dyn Any, items: &ItemManager| {
				let event = event
					.downcast_mut::<E>()
					.ok_or(HandlerError::EventMismatch { handler: name })?;
				f(item, event, items)
			}),
		}
	}

	/// Handler receiving the bound instance downcast to the concrete kind `I`.
	pub fn for_kind<I: Item, E: Event>(name: &'static str, f: fn(&I, &mut E, &ItemManager) -> HandlerResult) -> Self {
		Self {
			name,
			event: TypeId::of::<E>(),
			event_name: E::event_name(),
			call: Arc::new(move |item: &(dyn Item + 'static), event: &mut dyn Any, items: &ItemManager| {
				let any: &dyn Any = item;
				let bound = any.downcast_ref::<I>().ok_or_else(|| HandlerError::BindingMismatch {
					handler: name,
					expected: type_name::<I>(),
					found: item.key().to_owned(),
				})?;
				let event = event
					.downcast_mut::<E>()
					.ok_or(HandlerError::EventMismatch { handler: name })?;
				f(bound, event, items)
			}),
		}
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	pub fn event_type(&self) -> TypeId {
		self.event
	}

	pub fn event_name(&self) -> &'static str {
		self.event_name
	}
}

impl fmt::Debug for Handler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Handler")
			.field("name", &self.name)
			.field("event", &self.event_name)
			.finish_non_exhaustive()
	}
}

/// A handler bound to the instance it was registered through.
#[derive(Clone)]
pub struct Subscription {
	pub handler: Handler,
	pub declaring: &'static KindDef,
	pub bound: Arc<dyn Item>,
}

impl fmt::Debug for Subscription {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Subscription")
			.field("handler", &self.handler)
			.field("declaring", &self.declaring.tag)
			.field("bound", &self.bound.key())
			.finish()
	}
}

#[derive(Default)]
struct EventTable {
	by_event: FxHashMap<TypeId, Vec<Subscription>>,
	/// Kinds whose handlers are subscribed, by identity.
	registered: Vec<&'static KindDef>,
}

impl EventTable {
	fn is_registered(&self, kind: &KindDef) -> bool {
		self.registered.iter().any(|registered| std::ptr::eq(*registered, kind))
	}
}

/// Subscription table of one generation.
#[derive(Default)]
pub struct EventManager {
	table: RwLock<EventTable>,
}

impl EventManager {
	pub fn new() -> Self {
		Self::default()
	}

	/// Subscribes `declaring`'s own handlers, bound to `bound`.
	///
	/// Returns false without changes if the kind is already registered and
	/// `force` is not set. Forcing replaces the kind's previous subscriptions.
	pub fn register_handlers(&self, declaring: &'static KindDef, bound: Arc<dyn Item>, force: bool) -> bool {
		let handlers = (declaring.handlers)();
		let mut table = self.table.write();
		let registered = table.is_registered(declaring);
		if registered && !force {
			return false;
		}
		if registered {
			for subscriptions in table.by_event.values_mut() {
				subscriptions.retain(|s| !std::ptr::eq(s.declaring, declaring));
			}
		}
		for handler in handlers {
			debug!(
				kind = declaring.tag,
				handler = handler.name,
				event = handler.event_name,
				bound = bound.key(),
				"Handler subscribed"
			);
			table.by_event.entry(handler.event).or_default().push(Subscription {
				handler,
				declaring,
				bound: Arc::clone(&bound),
			});
		}
		if !registered {
			table.registered.push(declaring);
		}
		true
	}

	/// Registers the handlers of `instance`'s kind and of every ancestor kind.
	///
	/// Returns the number of kinds that were newly subscribed.
	pub fn register_handler_chain(&self, instance: Arc<dyn Item>, force: bool) -> Result<usize> {
		let mut subscribed = 0;
		for kind in instance.kind_def().chain()? {
			if self.register_handlers(kind, Arc::clone(&instance), force) {
				subscribed += 1;
			}
		}
		Ok(subscribed)
	}

	/// Delivers `event` to every subscription for its exact type.
	///
	/// Returns how many handlers ran. The first handler error stops delivery.
	pub fn dispatch<E: Event>(&self, event: &mut E, items: &ItemManager) -> std::result::Result<usize, DispatchError> {
		let subscriptions = self
			.table
			.read()
			.by_event
			.get(&TypeId::of::<E>())
			.cloned()
			.unwrap_or_default();
		trace!(event = E::event_name(), subscriptions = subscriptions.len(), "Dispatching");

		for subscription in &subscriptions {
			(subscription.handler.call)(&*subscription.bound, &mut *event, items).map_err(|source| DispatchError {
				handler: subscription.handler.name,
				kind: subscription.declaring.tag,
				event: E::event_name(),
				source,
			})?;
		}
		Ok(subscriptions.len())
	}

	pub fn is_registered(&self, kind: &KindDef) -> bool {
		self.table.read().is_registered(kind)
	}

	/// Number of subscriptions for events of type `E`.
	pub fn subscriptions_for<E: Event>(&self) -> usize {
		self.table.read().by_event.get(&TypeId::of::<E>()).map_or(0, Vec::len)
	}

	pub fn subscription_count(&self) -> usize {
		self.table.read().by_event.values().map(Vec::len).sum()
	}
}
