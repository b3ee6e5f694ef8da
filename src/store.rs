//! Cart store: owns one context's cart state and keeps it in step with
//! the shared storage.
//!
//! Every local mutation is written to the storage key as a full JSON
//! snapshot. Snapshots written by other contexts arrive through the
//! storage's change notifications. Only the newest one is kept, and
//! [`CartStore::sync_external_changes`] adopts its lines and coupon but keeps
//! this context's drawer state.
//!
//! Writes are wholesale and last-write-wins. Two contexts mutating at the
//! same time can lose one side's change.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::actions::{CartAction, CartCommand};
use crate::domain::aggregates::{CartState, ProductSnapshot};
use crate::domain::value_objects::{CouponCode, ProductId};
use crate::storage::{ChangeNotifier, ContextId, KeyValueStore, Listener, StorageEvent, SubscriptionId};
use crate::Result;

/// Storage key used by the storefront when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "octocat-cart";

pub struct CartStore<S: KeyValueStore + ChangeNotifier> {
    context: ContextId,
    key: String,
    storage: S,
    state: CartState,
    subscription: SubscriptionId,
    latest_foreign: watch::Receiver<Option<StorageEvent>>,
}

impl<S: KeyValueStore + ChangeNotifier> std::fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("context", &self.context)
            .field("key", &self.key)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<S: KeyValueStore + ChangeNotifier> CartStore<S> {
    /// Opens the cart for a new context, restoring the last snapshot under
    /// `key` if it is readable. The restored cart always starts closed.
    pub fn open(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let context = ContextId::new();
        let state = match storage.get_item(&key).map(|raw| CartState::restore(&raw)) {
            Some(Ok(state)) => state.with_open(false),
            Some(Err(err)) => {
                warn!(key = %key, error = %err, "ignoring unreadable cart snapshot");
                CartState::empty()
            }
            None => CartState::empty(),
        };

        let (tx, latest_foreign) = watch::channel(None);
        let watched = key.clone();
        let listener: Listener = Arc::new(move |event: &StorageEvent| {
            if event.key == watched {
                tx.send_replace(Some(event.clone()));
            }
        });
        let subscription = storage.subscribe(context, listener);

        info!(context = %context, key = %key, lines = state.line_count(), "cart store opened");
        Self { context, key, storage, state, subscription, latest_foreign }
    }

    pub fn context(&self) -> ContextId { self.context }
    pub fn key(&self) -> &str { &self.key }
    pub fn state(&self) -> &CartState { &self.state }
    pub fn storage(&self) -> &S { &self.storage }
    pub fn total_items(&self) -> u64 { self.state.total_items() }

    /// Applies `action` and persists the result. The write supersedes any
    /// foreign snapshot not yet synced, so that snapshot is discarded.
    pub fn dispatch(&mut self, action: CartAction) -> &CartState {
        debug!(context = %self.context, ?action, "cart action");
        let current = std::mem::take(&mut self.state);
        self.state = current.apply(action);
        self.persist();
        let _ = self.latest_foreign.borrow_and_update();
        &self.state
    }

    /// Validates a wire command and dispatches it.
    pub fn dispatch_command(&mut self, command: CartCommand) -> Result<&CartState> {
        let action = CartAction::try_from(command)?;
        Ok(self.dispatch(action))
    }

    pub fn add_item(&mut self, product: ProductSnapshot, quantity: u32) -> &CartState {
        self.dispatch(CartAction::AddItem { product, quantity })
    }

    pub fn remove_item(&mut self, product_id: ProductId) -> &CartState {
        self.dispatch(CartAction::RemoveItem { product_id })
    }

    pub fn update_quantity(&mut self, product_id: ProductId, quantity: u32) -> &CartState {
        self.dispatch(CartAction::UpdateQuantity { product_id, quantity })
    }

    pub fn apply_coupon(&mut self, code: impl Into<CouponCode>) -> &CartState {
        self.dispatch(CartAction::ApplyCoupon { code: code.into() })
    }

    pub fn clear_cart(&mut self) -> &CartState { self.dispatch(CartAction::ClearCart) }
    pub fn toggle_cart(&mut self) -> &CartState { self.dispatch(CartAction::ToggleCart) }
    pub fn set_cart_open(&mut self, is_open: bool) -> &CartState { self.dispatch(CartAction::SetCartOpen { is_open }) }

    /// Adopts the newest snapshot written by another context since the last
    /// sync. Returns whether one was adopted; removals and unreadable
    /// snapshots leave the cart as it is.
    pub fn sync_external_changes(&mut self) -> bool {
        if !self.latest_foreign.has_changed().unwrap_or(false) {
            return false;
        }
        let Some(event) = self.latest_foreign.borrow_and_update().clone() else {
            return false;
        };
        let Some(raw) = event.new_value else {
            return false;
        };
        match CartState::restore(&raw) {
            Ok(state) => {
                self.state = state.with_open(self.state.is_open());
                debug!(context = %self.context, origin = %event.origin, "adopted cart from another context");
                true
            }
            Err(err) => {
                warn!(context = %self.context, origin = %event.origin, error = %err, "ignoring unreadable cart snapshot");
                false
            }
        }
    }

    fn persist(&self) {
        match self.state.to_json() {
            Ok(raw) => self.storage.set_item(self.context, &self.key, raw),
            Err(err) => warn!(context = %self.context, error = %err, "failed to serialize cart"),
        }
    }
}

impl<S: KeyValueStore + ChangeNotifier> Drop for CartStore<S> {
    fn drop(&mut self) {
        self.storage.unsubscribe(self.subscription);
    }
}
