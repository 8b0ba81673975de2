//! Single owner of the picker state
//!
//! Every mutator ends with `notify()`, which re-renders the screen through
//! the configured presenter. The controller itself never performs I/O apart
//! from the synchronous selection mirror; catalog loads and relay calls are
//! driven by [`super::Session`] and fed back in.

use std::collections::HashSet;

use thiserror::Error;

use crate::catalog::{CatalogError, FilterState, Product, ProductId};
use crate::conversation::{Message, Transcript};
use crate::relay::RelayError;
use crate::selection::SelectionStore;
use crate::views::{Presenter, Screen, ViewState};

/// The single placeholder line shown under the chat bubbles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Generating,
    Thinking,
    EmptySelection,
    RoutineFailed,
    AnswerFailed,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::Generating => "Generating your routine...",
            Notice::Thinking => "Thinking...",
            Notice::EmptySelection => "Please select at least one product to generate a routine.",
            Notice::RoutineFailed => "There was an error generating your routine. Please try again later.",
            Notice::AnswerFailed => "Sorry, I couldn't answer that. Please try again.",
        }
    }
}

/// What an in-flight relay call was started for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayPurpose {
    Routine,
    Question,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    Idle,
    Sending(RelayPurpose),
}

/// Why a relay call was not started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Refusal {
    #[error("A relay call is already in flight")]
    Busy,

    #[error("No selected product is in the catalog")]
    EmptySelection,

    #[error("Question is empty")]
    EmptyQuestion,

    #[error("Catalog could not be loaded")]
    CatalogUnavailable,
}

pub struct Controller {
    filter: FilterState,
    catalog: Vec<Product>,
    visible: Vec<Product>,
    catalog_failed: bool,
    selection: SelectionStore,
    expanded: HashSet<ProductId>,
    transcript: Transcript,
    notice: Option<Notice>,
    relay_state: RelayState,
    presenter: Box<dyn Presenter>,
    screen: Screen,
}

impl Controller {
    pub fn new(selection: SelectionStore, primer: &str, presenter: Box<dyn Presenter>) -> Self {
        let mut controller = Self {
            filter: FilterState::default(),
            catalog: Vec::new(),
            visible: Vec::new(),
            catalog_failed: false,
            selection,
            expanded: HashSet::new(),
            transcript: Transcript::new(primer),
            notice: None,
            relay_state: RelayState::Idle,
            presenter,
            screen: Screen::default(),
        };
        controller.notify();
        controller
    }

    // ========== Catalog and filters ==========

    /// Replace the filter. The caller is expected to reload the catalog.
    pub fn set_filter(&mut self, filter: FilterState) {
        tracing::debug!(
            "Filter changed: category={:?} search={:?}",
            filter.category,
            filter.search
        );
        self.filter = filter;
    }

    /// Install the result of a catalog load and recompute the grid
    ///
    /// A failed load drops the previous snapshot rather than showing stale data.
    pub fn apply_catalog(&mut self, result: Result<Vec<Product>, CatalogError>) {
        match result {
            Ok(products) => self.install_catalog(products),
            Err(e) => {
                tracing::warn!("Catalog load failed: {}", e);
                self.drop_catalog();
            }
        }
        self.notify();
    }

    fn drop_catalog(&mut self) {
        self.catalog.clear();
        self.visible.clear();
        self.catalog_failed = true;
    }

    fn install_catalog(&mut self, products: Vec<Product>) {
        self.visible = self.filter.apply(&products);
        self.catalog = products;
        self.catalog_failed = false;
    }

    // ========== Selection ==========

    /// Map a URL path segment back to a product id
    ///
    /// Ids render the same whether they are numbers or strings, so the
    /// segment is matched against the catalog snapshot first, then against
    /// the stored selection. Unknown segments parse integer-first.
    pub fn resolve_id(&self, segment: &str) -> ProductId {
        self.catalog
            .iter()
            .map(|p| &p.id)
            .chain(self.selection.ids())
            .find(|id| id.to_string() == segment)
            .cloned()
            .unwrap_or_else(|| ProductId::from_segment(segment))
    }

    /// Toggle a product in or out of the selection. Returns whether it is now selected.
    pub fn toggle(&mut self, id: ProductId) -> bool {
        let selected = self.selection.toggle(id);
        self.notify();
        selected
    }

    pub fn remove(&mut self, id: &ProductId) {
        self.selection.remove(id);
        self.notify();
    }

    pub fn clear(&mut self) {
        self.selection.clear();
        self.notify();
    }

    /// Flip the description visibility of one card. Selection is untouched.
    pub fn toggle_details(&mut self, id: ProductId) -> bool {
        let expanded = if self.expanded.remove(&id) {
            false
        } else {
            self.expanded.insert(id);
            true
        };
        self.notify();
        expanded
    }

    // ========== Conversation ==========

    /// Seed the transcript with the selected products and enter `Sending`
    ///
    /// `catalog` is a fresh load used to resolve the selection. Returns the
    /// transcript to send.
    pub fn begin_routine(
        &mut self,
        catalog: Result<Vec<Product>, CatalogError>,
    ) -> Result<Vec<Message>, Refusal> {
        self.ensure_idle()?;

        let products = match catalog {
            Ok(products) => products,
            Err(e) => {
                tracing::warn!("Catalog load failed before routine generation: {}", e);
                self.drop_catalog();
                self.notice = Some(Notice::RoutineFailed);
                self.notify();
                return Err(Refusal::CatalogUnavailable);
            }
        };
        self.install_catalog(products);

        let selected = self.selection.resolve(&self.catalog);
        let count = selected.len();
        if !self.transcript.seed(&selected) {
            self.notice = Some(Notice::EmptySelection);
            self.notify();
            return Err(Refusal::EmptySelection);
        }

        tracing::info!("Generating routine for {} product(s)", count);
        self.start(RelayPurpose::Routine, Notice::Generating)
    }

    /// Append a follow-up question and enter `Sending`
    pub fn begin_question(&mut self, text: &str) -> Result<Vec<Message>, Refusal> {
        if text.trim().is_empty() {
            return Err(Refusal::EmptyQuestion);
        }
        self.ensure_idle()?;

        self.transcript.append_user(text);
        tracing::info!("Sending follow-up question ({} turns)", self.transcript.len());
        self.start(RelayPurpose::Question, Notice::Thinking)
    }

    /// Finish the in-flight relay call and return to `Idle`
    ///
    /// On failure the transcript is left exactly as it was sent.
    pub fn complete(&mut self, reply: Result<String, RelayError>) {
        let RelayState::Sending(purpose) = self.relay_state else {
            tracing::warn!("Relay reply arrived with no call in flight; ignoring");
            return;
        };

        match reply {
            Ok(text) => {
                tracing::debug!("Relay replied with {} chars", text.len());
                self.transcript.append_assistant(&text);
                self.notice = None;
            }
            Err(e) => {
                tracing::warn!("Relay call failed: {}", e);
                self.notice = Some(match purpose {
                    RelayPurpose::Routine => Notice::RoutineFailed,
                    RelayPurpose::Question => Notice::AnswerFailed,
                });
            }
        }

        self.relay_state = RelayState::Idle;
        self.notify();
    }

    fn ensure_idle(&self) -> Result<(), Refusal> {
        match self.relay_state {
            RelayState::Idle => Ok(()),
            RelayState::Sending(purpose) => {
                tracing::debug!("Rejecting relay call; {:?} call still in flight", purpose);
                Err(Refusal::Busy)
            }
        }
    }

    fn start(&mut self, purpose: RelayPurpose, notice: Notice) -> Result<Vec<Message>, Refusal> {
        self.relay_state = RelayState::Sending(purpose);
        self.notice = Some(notice);
        self.notify();
        Ok(self.transcript.messages().to_vec())
    }

    // ========== Rendering ==========

    /// Re-render every panel from the current state
    pub fn notify(&mut self) {
        let screen = self.presenter.present(&ViewState {
            visible: &self.visible,
            catalog: &self.catalog,
            catalog_failed: self.catalog_failed,
            selection: &self.selection,
            expanded: &self.expanded,
            transcript: &self.transcript,
            notice: self.notice,
            pending: matches!(self.relay_state, RelayState::Sending(_)),
        });
        self.screen = screen;
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn visible(&self) -> &[Product] {
        &self.visible
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    pub fn is_expanded(&self, id: &ProductId) -> bool {
        self.expanded.contains(id)
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    pub fn relay_state(&self) -> RelayState {
        self.relay_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Role;
    use crate::selection::{KeyValueStore, MemoryStore, SELECTION_KEY};
    use crate::views::HtmlPresenter;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingPresenter(Arc<AtomicUsize>);

    impl Presenter for CountingPresenter {
        fn present(&self, _state: &ViewState<'_>) -> Screen {
            self.0.fetch_add(1, Ordering::SeqCst);
            Screen::default()
        }
    }

    fn product(id: i64, category: &str, name: &str) -> Product {
        Product {
            id: ProductId::Number(id),
            name: name.to_string(),
            brand: "Brand".to_string(),
            category: category.to_string(),
            image: format!("{}.png", id),
            description: None,
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "Hair", "Hair Oil"),
            product(2, "Hair", "Shampoo"),
            product(3, "Skin", "Facial Oil"),
        ]
    }

    fn controller() -> (Arc<MemoryStore>, Controller) {
        let storage = Arc::new(MemoryStore::new());
        let selection = SelectionStore::restore(storage.clone(), SELECTION_KEY);
        let mut controller = Controller::new(selection, "primer", Box::new(HtmlPresenter));
        controller.apply_catalog(Ok(catalog()));
        (storage, controller)
    }

    #[test]
    fn test_every_mutation_notifies() {
        let renders = Arc::new(AtomicUsize::new(0));
        let selection = SelectionStore::restore(Arc::new(MemoryStore::new()), SELECTION_KEY);
        let mut controller =
            Controller::new(selection, "primer", Box::new(CountingPresenter(renders.clone())));
        assert_eq!(renders.load(Ordering::SeqCst), 1);

        controller.apply_catalog(Ok(catalog()));
        controller.toggle(ProductId::Number(1));
        controller.toggle_details(ProductId::Number(1));
        controller.remove(&ProductId::Number(1));
        controller.clear();
        assert_eq!(renders.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn test_filter_recomputes_grid_but_not_selection_panel() {
        let (_, mut controller) = controller();
        controller.toggle(ProductId::Number(3));

        controller.set_filter(FilterState::new(Some("Hair".to_string()), "oil"));
        controller.apply_catalog(Ok(catalog()));

        let visible: Vec<_> = controller.visible().iter().map(|p| p.id.clone()).collect();
        assert_eq!(visible, vec![ProductId::Number(1)]);
        // Facial Oil is filtered out of the grid but still listed as selected
        assert!(!controller.screen().catalog.contains("Facial Oil"));
        assert!(controller.screen().selection.contains("Facial Oil"));
    }

    #[test]
    fn test_toggle_persists_and_renders() {
        let (storage, mut controller) = controller();

        assert!(controller.toggle(ProductId::Number(2)));
        assert_eq!(storage.get(SELECTION_KEY).as_deref(), Some("[2]"));
        assert!(controller.screen().catalog.contains(r#"class="product-card selected" data-id="2""#));
        assert_eq!(controller.screen().selection.matches("id=\"clearSelectedProducts\"").count(), 1);

        assert!(!controller.toggle(ProductId::Number(2)));
        assert_eq!(storage.get(SELECTION_KEY).as_deref(), Some("[]"));
        assert!(!controller.screen().selection.contains("clearSelectedProducts"));
    }

    #[test]
    fn test_toggle_details_leaves_selection_alone() {
        let (storage, mut controller) = controller();

        assert!(controller.toggle_details(ProductId::Number(1)));
        assert!(controller.is_expanded(&ProductId::Number(1)));
        assert!(controller.selection().is_empty());
        assert!(storage.get(SELECTION_KEY).is_none());

        assert!(!controller.toggle_details(ProductId::Number(1)));
        assert!(!controller.is_expanded(&ProductId::Number(1)));
    }

    #[test]
    fn test_catalog_failure_drops_snapshot() {
        let (_, mut controller) = controller();
        controller.apply_catalog(Err(CatalogError::Invalid("boom".to_string())));

        assert!(controller.visible().is_empty());
        assert!(controller.screen().catalog.contains("Unable to load products"));
    }

    #[test]
    fn test_routine_with_empty_selection_is_refused() {
        let (_, mut controller) = controller();

        assert_eq!(controller.begin_routine(Ok(catalog())), Err(Refusal::EmptySelection));
        assert_eq!(controller.transcript().len(), 1);
        assert_eq!(controller.relay_state(), RelayState::Idle);
        assert_eq!(controller.notice(), Some(Notice::EmptySelection));
        assert!(controller.screen().chat.contains("Please select at least one product"));
    }

    #[test]
    fn test_routine_with_only_stale_ids_is_refused() {
        let (_, mut controller) = controller();
        controller.toggle(ProductId::Number(99));

        assert_eq!(controller.begin_routine(Ok(catalog())), Err(Refusal::EmptySelection));
    }

    #[test]
    fn test_routine_round_trip() {
        let (_, mut controller) = controller();
        controller.toggle(ProductId::Number(2));

        let sent = controller.begin_routine(Ok(catalog())).unwrap();
        assert_eq!(sent.len(), 2);
        assert!(sent[1].content.contains("Shampoo"));
        assert_eq!(controller.relay_state(), RelayState::Sending(RelayPurpose::Routine));
        assert!(controller.screen().chat.contains("Generating your routine..."));

        controller.complete(Ok("Use X then Y".to_string()));
        assert_eq!(controller.relay_state(), RelayState::Idle);
        assert_eq!(controller.transcript().len(), 3);
        assert_eq!(controller.transcript().messages()[2].role, Role::Assistant);
        assert_eq!(controller.notice(), None);
        assert!(controller.screen().chat.contains("Use X then Y"));
        assert!(!controller.screen().chat.contains("placeholder-message"));
    }

    #[test]
    fn test_second_call_rejected_while_sending() {
        let (_, mut controller) = controller();
        controller.toggle(ProductId::Number(1));
        controller.begin_routine(Ok(catalog())).unwrap();

        assert_eq!(controller.begin_question("And then?"), Err(Refusal::Busy));
        assert_eq!(controller.begin_routine(Ok(catalog())), Err(Refusal::Busy));
        assert_eq!(controller.transcript().len(), 2);
    }

    #[test]
    fn test_failed_question_keeps_user_turn() {
        let (_, mut controller) = controller();
        controller.toggle(ProductId::Number(1));
        controller.begin_routine(Ok(catalog())).unwrap();
        controller.complete(Ok("Routine".to_string()));

        let sent = controller.begin_question("  What next?  ").unwrap();
        assert_eq!(sent.last().unwrap().content, "What next?");
        assert!(controller.screen().chat.contains("Thinking..."));

        controller.complete(Err(RelayError::InvalidResponse("{}".to_string())));
        assert_eq!(controller.transcript().len(), 4);
        assert_eq!(controller.transcript().messages()[3].role, Role::User);
        assert_eq!(controller.notice(), Some(Notice::AnswerFailed));

        let chat = &controller.screen().chat;
        assert!(chat.contains("What next?"));
        assert_eq!(chat.matches("placeholder-message").count(), 1);
    }

    #[test]
    fn test_blank_question_is_a_no_op() {
        let (_, mut controller) = controller();
        assert_eq!(controller.begin_question("   "), Err(Refusal::EmptyQuestion));
        assert_eq!(controller.transcript().len(), 1);
        assert_eq!(controller.relay_state(), RelayState::Idle);
    }

    #[test]
    fn test_catalog_failure_before_routine() {
        let (_, mut controller) = controller();
        controller.toggle(ProductId::Number(1));

        let result = controller.begin_routine(Err(CatalogError::Invalid("offline".to_string())));
        assert_eq!(result, Err(Refusal::CatalogUnavailable));
        assert_eq!(controller.notice(), Some(Notice::RoutineFailed));
        assert_eq!(controller.relay_state(), RelayState::Idle);

        // The grid must not keep showing the previous snapshot
        assert!(controller.visible().is_empty());
        assert!(controller.screen().catalog.contains("Unable to load products"));
        assert!(!controller.screen().catalog.contains("Hair Oil"));
    }

    #[test]
    fn test_resolve_id_prefers_catalog_type() {
        let (_, mut controller) = controller();
        let mut text_id = product(0, "Hair", "Serum");
        text_id.id = ProductId::from("101");
        let mut products = catalog();
        products.push(text_id);
        controller.apply_catalog(Ok(products));

        assert_eq!(controller.resolve_id("101"), ProductId::from("101"));
        assert_eq!(controller.resolve_id("2"), ProductId::Number(2));
        assert_eq!(controller.resolve_id("77"), ProductId::Number(77));
        assert_eq!(controller.resolve_id("kit-9"), ProductId::from("kit-9"));
    }

    #[test]
    fn test_resolve_id_falls_back_to_stored_selection() {
        let (_, mut controller) = controller();
        controller.toggle(ProductId::from("404"));
        controller.apply_catalog(Err(CatalogError::Invalid("offline".to_string())));

        assert_eq!(controller.resolve_id("404"), ProductId::from("404"));
    }

    #[test]
    fn test_screen_pending_while_sending() {
        let (_, mut controller) = controller();
        controller.toggle(ProductId::Number(1));
        assert!(!controller.screen().pending);

        controller.begin_routine(Ok(catalog())).unwrap();
        assert!(controller.screen().pending);

        controller.complete(Ok("Routine".to_string()));
        assert!(!controller.screen().pending);
    }

    #[test]
    fn test_stray_reply_is_ignored() {
        let (_, mut controller) = controller();
        controller.complete(Ok("unexpected".to_string()));
        assert_eq!(controller.transcript().len(), 1);
    }
}
