//! Async orchestration around the controller
//!
//! The session owns the controller behind a mutex together with the catalog
//! source and the chat relay. The lock is never held across network I/O:
//! a relay call locks to begin, releases while waiting, and locks again to
//! complete. The HTTP handlers only wait for the begin step and leave the
//! delivery running in the background, so the pending notice is visible
//! while the relay works.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::catalog::{CatalogSource, FilterState, ProductId};
use crate::conversation::Message;
use crate::relay::ChatRelay;
use crate::views::Screen;

use super::controller::{Controller, Refusal};

pub struct Session {
    controller: Mutex<Controller>,
    catalog: CatalogSource,
    relay: Arc<dyn ChatRelay>,
}

impl Session {
    pub fn new(controller: Controller, catalog: CatalogSource, relay: Arc<dyn ChatRelay>) -> Self {
        Self {
            controller: Mutex::new(controller),
            catalog,
            relay,
        }
    }

    /// Re-fetch the catalog and recompute both panels
    pub async fn refresh(&self) {
        let result = self.catalog.load().await;
        self.controller.lock().await.apply_catalog(result);
    }

    pub async fn set_filter(&self, filter: FilterState) {
        self.controller.lock().await.set_filter(filter);
        self.refresh().await;
    }

    /// Resolve a URL path segment against the current catalog snapshot
    pub async fn resolve_id(&self, segment: &str) -> ProductId {
        self.controller.lock().await.resolve_id(segment)
    }

    pub async fn toggle(&self, id: ProductId) -> bool {
        self.controller.lock().await.toggle(id)
    }

    pub async fn toggle_details(&self, id: ProductId) -> bool {
        self.controller.lock().await.toggle_details(id)
    }

    pub async fn remove(&self, id: &ProductId) {
        self.controller.lock().await.remove(id);
    }

    pub async fn clear(&self) {
        self.controller.lock().await.clear();
    }

    /// Reload the catalog, seed the transcript and enter `Sending`
    ///
    /// Returns the transcript to hand to [`Session::deliver`].
    pub async fn begin_routine(&self) -> Result<Vec<Message>, Refusal> {
        let catalog = self.catalog.load().await;
        self.controller.lock().await.begin_routine(catalog)
    }

    /// Append a follow-up question and enter `Sending`
    pub async fn begin_question(&self, question: &str) -> Result<Vec<Message>, Refusal> {
        self.controller.lock().await.begin_question(question)
    }

    /// Send a begun transcript to the relay and record the outcome
    pub async fn deliver(&self, messages: Vec<Message>) {
        let reply = self.relay.send(&messages).await;
        self.controller.lock().await.complete(reply);
    }

    /// Begin a relay call and finish it on a background task
    pub async fn spawn_routine(self: &Arc<Self>) -> Result<(), Refusal> {
        let messages = self.begin_routine().await?;
        self.spawn_delivery(messages);
        Ok(())
    }

    pub async fn spawn_question(self: &Arc<Self>, question: &str) -> Result<(), Refusal> {
        let messages = self.begin_question(question).await?;
        self.spawn_delivery(messages);
        Ok(())
    }

    fn spawn_delivery(self: &Arc<Self>, messages: Vec<Message>) {
        let session = Arc::clone(self);
        tokio::spawn(async move {
            session.deliver(messages).await;
        });
    }

    /// Seed the transcript with the current selection and wait for a routine
    pub async fn generate_routine(&self) -> Result<(), Refusal> {
        let messages = self.begin_routine().await?;
        self.deliver(messages).await;
        Ok(())
    }

    /// Append a follow-up question and wait for the answer
    pub async fn ask(&self, question: &str) -> Result<(), Refusal> {
        let messages = self.begin_question(question).await?;
        self.deliver(messages).await;
        Ok(())
    }

    /// Current panels and filter, for the page shell
    pub async fn snapshot(&self) -> (Screen, FilterState) {
        let controller = self.controller.lock().await;
        (controller.screen().clone(), controller.filter().clone())
    }

    /// Run `f` against the controller
    pub async fn inspect<R>(&self, f: impl FnOnce(&Controller) -> R) -> R {
        f(&*self.controller.lock().await)
    }
}
