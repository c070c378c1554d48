//! Process-wide handles, built once in `main` and passed to each component.

use std::sync::Arc;

/// The store, the remote API and the delivery channel.
pub struct Context<S, A, N> {
  pub store:    Arc<S>,
  pub api:      Arc<A>,
  pub notifier: Arc<N>,
}

impl<S, A, N> Context<S, A, N> {
  pub fn new(store: S, api: A, notifier: N) -> Self {
    Self {
      store:    Arc::new(store),
      api:      Arc::new(api),
      notifier: Arc::new(notifier),
    }
  }
}

// Only the `Arc`s are cloned; `S`, `A` and `N` need not be `Clone`.
impl<S, A, N> Clone for Context<S, A, N> {
  fn clone(&self) -> Self {
    Self {
      store:    self.store.clone(),
      api:      self.api.clone(),
      notifier: self.notifier.clone(),
    }
  }
}
