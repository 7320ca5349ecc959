//! Order submission.
//!
//! [`OrderComposer::submit_order`] runs checkout in a fixed order:
//!
//! 1. validate the name and the cart; nothing changes on failure
//! 2. snapshot the cart and customer fields into an [`OrderDraft`]
//! 3. clear the cart, reset the form, close the cart and notify
//! 4. save the draft in a supervised background task
//! 5. compose the message from the snapshot and open the deep link,
//!    falling back to in-place navigation
//! 6. schedule a session reload after a short delay
//!
//! The WhatsApp message is the order channel. The stored record is an
//! audit copy, so a failed save is logged and never undoes step 3.

use super::link::{DeepLink, DEFAULT_MESSAGING_HOST};
use super::order::OrderDraft;
use super::supervisor::{TaskReport, TaskSupervisor};
use super::template::{compose_for_draft, ComposedMessage};
use crate::cart::CartStore;
use crate::error::{CommerceError, PersistenceError, ValidationError};
use crate::money::Currency;
use crate::notify::Notifier;
use crate::settings::SettingsService;
use crate::store::OrderStore;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Shown right after a successful submit.
pub const REDIRECT_NOTICE: &str = "Redirecionando para o WhatsApp...";

/// Default delay before the session reload.
pub const DEFAULT_RELOAD_DELAY: Duration = Duration::from_millis(1000);

/// Why a link could not be opened in a new context.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LaunchError {
    #[error("Opening a new window was blocked")]
    Blocked,

    #[error("No way to open links: {0}")]
    Unavailable(String),
}

/// Opens deep links.
pub trait Launcher: Send + Sync {
    /// Open `url` in a new browsing context (window, tab, external app).
    fn open_new_context(&self, url: &str) -> Result<(), LaunchError>;

    /// Replace the current context with `url`.
    fn navigate_in_place(&self, url: &str);
}

/// Restores a fresh session after checkout.
#[async_trait]
pub trait SessionReloader: Send + Sync {
    async fn reload(&self) -> Result<(), PersistenceError>;
}

#[async_trait]
impl SessionReloader for SettingsService {
    async fn reload(&self) -> Result<(), PersistenceError> {
        SettingsService::reload(self).await.map(|_| ())
    }
}

/// How the deep link ended up being opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkOpening {
    NewContext,
    InPlace,
}

/// Customer contact fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerForm {
    pub name: String,
    /// Free text; may already be display-formatted.
    pub phone: String,
}

impl CustomerForm {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
        }
    }

    pub fn reset(&mut self) {
        self.name.clear();
        self.phone.clear();
    }
}

/// State owned by one storefront session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorefrontSession {
    pub cart: CartStore,
    pub form: CustomerForm,
    /// Whether the cart drawer is showing.
    pub cart_open: bool,
}

impl StorefrontSession {
    pub fn new(currency: Currency) -> Self {
        Self {
            cart: CartStore::new(currency),
            form: CustomerForm::default(),
            cart_open: false,
        }
    }
}

/// Checkout knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOptions {
    pub messaging_host: String,
    pub reload_delay: Duration,
}

impl Default for CheckoutOptions {
    fn default() -> Self {
        Self {
            messaging_host: DEFAULT_MESSAGING_HOST.to_string(),
            reload_delay: DEFAULT_RELOAD_DELAY,
        }
    }
}

/// Result of a successful submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutReceipt {
    pub draft: OrderDraft,
    pub message: ComposedMessage,
    pub link: DeepLink,
    pub opened: LinkOpening,
}

/// Check the customer name, then the cart. First failure wins.
pub fn validate_checkout(customer_name: &str, cart: &CartStore) -> Result<(), ValidationError> {
    if customer_name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if cart.is_empty() {
        return Err(ValidationError::EmptyCart);
    }
    Ok(())
}

/// Turns a session's cart into an order and a WhatsApp message.
pub struct OrderComposer {
    orders: Arc<dyn OrderStore>,
    settings: Arc<SettingsService>,
    launcher: Arc<dyn Launcher>,
    notifier: Arc<dyn Notifier>,
    reloader: Option<Arc<dyn SessionReloader>>,
    options: CheckoutOptions,
    supervisor: TaskSupervisor,
}

impl OrderComposer {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        settings: Arc<SettingsService>,
        launcher: Arc<dyn Launcher>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            orders,
            settings,
            launcher,
            notifier,
            reloader: None,
            options: CheckoutOptions::default(),
            supervisor: TaskSupervisor::new(),
        }
    }

    pub fn with_reloader(mut self, reloader: Arc<dyn SessionReloader>) -> Self {
        self.reloader = Some(reloader);
        self
    }

    pub fn with_options(mut self, options: CheckoutOptions) -> Self {
        self.options = options;
        self
    }

    /// Submit the session's cart.
    ///
    /// Returns as soon as the link has been opened; the order save and the
    /// reload keep running under the supervisor. Must be called from within
    /// a tokio runtime.
    pub fn submit_order(
        &mut self,
        session: &mut StorefrontSession,
    ) -> Result<CheckoutReceipt, CommerceError> {
        if let Err(e) = validate_checkout(&session.form.name, &session.cart) {
            warn!(code = e.code(), "Checkout rejected");
            self.notifier.error(&e.to_string());
            return Err(e.into());
        }

        let phone = session.form.phone.trim();
        let draft = OrderDraft::from_cart(
            &session.cart,
            &session.form.name,
            (!phone.is_empty()).then_some(phone),
        );

        session.cart.clear();
        session.form.reset();
        session.cart_open = false;
        self.notifier.success(REDIRECT_NOTICE);
        info!(
            customer = %draft.customer_name,
            items = draft.item_count(),
            total = %draft.total,
            "Order submitted"
        );

        let orders = Arc::clone(&self.orders);
        let pending = draft.clone();
        self.supervisor.spawn("save-order", async move {
            let receipt = orders.create_order(&pending).await?;
            info!(order_id = %receipt.id, "Order saved");
            Ok::<(), PersistenceError>(())
        });

        let settings = self.settings.snapshot();
        let message = compose_for_draft(&draft, Some(&settings.message_template));
        let link = DeepLink::from_encoded(
            &self.options.messaging_host,
            &settings.whatsapp_number,
            message.encoded.clone(),
        );
        let url = link.url();
        let opened = match self.launcher.open_new_context(&url) {
            Ok(()) => LinkOpening::NewContext,
            Err(e) => {
                warn!(error = %e, "Falling back to in-place navigation");
                self.launcher.navigate_in_place(&url);
                LinkOpening::InPlace
            }
        };

        if let Some(reloader) = self.reloader.clone() {
            let delay = self.options.reload_delay;
            self.supervisor.spawn("reload-session", async move {
                tokio::time::sleep(delay).await;
                reloader.reload().await
            });
        }

        Ok(CheckoutReceipt {
            draft,
            message,
            link,
            opened,
        })
    }

    /// Background tasks not yet collected.
    pub fn pending_tasks(&self) -> usize {
        self.supervisor.pending()
    }

    /// Wait for all background work spawned so far.
    pub async fn join_background(&mut self) -> Vec<TaskReport> {
        self.supervisor.join_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Product;
    use crate::checkout::{Order, OrderReceipt, OrderStatus, TaskOutcome};
    use crate::ids::OrderId;
    use crate::money::Money;
    use crate::notify::{NoticeLevel, RecordingNotifier};
    use crate::settings::{SettingsPatch, StoreSettings};
    use crate::store::{MemoryStore, SettingsStore};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::sync::Notify;

    #[derive(Default)]
    struct RecordingLauncher {
        block_new_context: bool,
        opened: Mutex<Vec<(LinkOpening, String)>>,
    }

    impl Launcher for RecordingLauncher {
        fn open_new_context(&self, url: &str) -> Result<(), LaunchError> {
            if self.block_new_context {
                return Err(LaunchError::Blocked);
            }
            self.opened.lock().unwrap().push((LinkOpening::NewContext, url.to_string()));
            Ok(())
        }

        fn navigate_in_place(&self, url: &str) {
            self.opened.lock().unwrap().push((LinkOpening::InPlace, url.to_string()));
        }
    }

    /// Fails every save.
    struct BrokenOrders;

    #[async_trait]
    impl OrderStore for BrokenOrders {
        async fn list_orders(&self) -> Result<Vec<Order>, PersistenceError> {
            Ok(Vec::new())
        }

        async fn create_order(&self, _draft: &OrderDraft) -> Result<OrderReceipt, PersistenceError> {
            Err(PersistenceError::Unavailable("connection refused".into()))
        }

        async fn update_order_status(&self, _id: &OrderId, _status: OrderStatus) -> Result<(), PersistenceError> {
            Ok(())
        }

        async fn delete_order(&self, _id: &OrderId) -> Result<(), PersistenceError> {
            Ok(())
        }
    }

    /// Holds every save until released.
    struct GatedOrders {
        gate: Arc<Notify>,
        inner: MemoryStore,
    }

    #[async_trait]
    impl OrderStore for GatedOrders {
        async fn list_orders(&self) -> Result<Vec<Order>, PersistenceError> {
            self.inner.list_orders().await
        }

        async fn create_order(&self, draft: &OrderDraft) -> Result<OrderReceipt, PersistenceError> {
            self.gate.notified().await;
            self.inner.create_order(draft).await
        }

        async fn update_order_status(&self, id: &OrderId, status: OrderStatus) -> Result<(), PersistenceError> {
            self.inner.update_order_status(id, status).await
        }

        async fn delete_order(&self, id: &OrderId) -> Result<(), PersistenceError> {
            self.inner.delete_order(id).await
        }
    }

    #[derive(Default)]
    struct CountingReloader {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SessionReloader for CountingReloader {
        async fn reload(&self) -> Result<(), PersistenceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn filled_session() -> StorefrontSession {
        let mut session = StorefrontSession::new(Currency::BRL);
        let a = Product::new("a", "A", Money::new(1000, Currency::BRL), "insumos");
        let b = Product::new("b", "B", Money::new(550, Currency::BRL), "insumos");
        session.cart.add_item(a.clone());
        session.cart.add_item(a);
        session.cart.add_item(b);
        session.form = CustomerForm::new("Maria", "11999998888");
        session.cart_open = true;
        session
    }

    struct Harness {
        composer: OrderComposer,
        launcher: Arc<RecordingLauncher>,
        notifier: Arc<RecordingNotifier>,
    }

    fn harness(orders: Arc<dyn OrderStore>, launcher: RecordingLauncher) -> Harness {
        let settings = Arc::new(SettingsService::with_settings(
            Arc::new(MemoryStore::new()),
            StoreSettings::default(),
        ));
        let launcher = Arc::new(launcher);
        let notifier = Arc::new(RecordingNotifier::new());
        let composer = OrderComposer::new(orders, settings, launcher.clone(), notifier.clone())
            .with_options(CheckoutOptions {
                reload_delay: Duration::from_millis(10),
                ..Default::default()
            });
        Harness {
            composer,
            launcher,
            notifier,
        }
    }

    #[test]
    fn test_validation_order() {
        let empty = CartStore::new(Currency::BRL);
        assert_eq!(validate_checkout("  ", &empty), Err(ValidationError::EmptyName));
        assert_eq!(validate_checkout("Maria", &empty), Err(ValidationError::EmptyCart));
    }

    #[tokio::test]
    async fn test_empty_name_leaves_session_untouched() {
        let store = Arc::new(MemoryStore::new());
        let mut h = harness(store.clone(), RecordingLauncher::default());
        let mut session = filled_session();
        session.form.name = "   ".into();
        let before = session.clone();

        let err = h.composer.submit_order(&mut session).unwrap_err();

        assert_eq!(err, CommerceError::Validation(ValidationError::EmptyName));
        assert_eq!(session, before);
        assert_eq!(session.cart.total_items(), 3);
        assert_eq!(h.composer.pending_tasks(), 0);
        assert!(h.launcher.opened.lock().unwrap().is_empty());
        assert_eq!(h.notifier.last().unwrap().message, "Por favor, informe seu nome");
        assert!(store.list_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_cart_is_rejected() {
        let mut h = harness(Arc::new(MemoryStore::new()), RecordingLauncher::default());
        let mut session = StorefrontSession::new(Currency::BRL);
        session.form.name = "Maria".into();

        let err = h.composer.submit_order(&mut session).unwrap_err();
        assert_eq!(err, CommerceError::Validation(ValidationError::EmptyCart));
    }

    #[tokio::test]
    async fn test_submit_clears_before_save_resolves() {
        let gate = Arc::new(Notify::new());
        let orders = Arc::new(GatedOrders {
            gate: gate.clone(),
            inner: MemoryStore::new(),
        });
        let mut h = harness(orders.clone(), RecordingLauncher::default());
        let mut session = filled_session();

        let receipt = h.composer.submit_order(&mut session).unwrap();

        assert_eq!(session.cart.total_items(), 0);
        assert!(session.form.name.is_empty());
        assert!(session.form.phone.is_empty());
        assert!(!session.cart_open);
        assert!(orders.list_orders().await.unwrap().is_empty());
        assert_eq!(h.notifier.notices()[0].level, NoticeLevel::Success);
        assert_eq!(h.notifier.notices()[0].message, REDIRECT_NOTICE);

        assert_eq!(receipt.draft.total.display(), "R$ 25,50");
        assert_eq!(receipt.opened, LinkOpening::NewContext);
        assert!(receipt
            .link
            .url()
            .starts_with("https://wa.me/5511999999999?text="));
        assert!(receipt.message.text.contains("- 2x A - R$ 20,00\n- 1x B - R$ 5,50"));

        gate.notify_one();
        let reports = h.composer.join_background().await;
        assert!(reports.iter().all(|r| r.outcome.is_success()));

        let stored = orders.list_orders().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].status, OrderStatus::Pending);
        assert_eq!(stored[0].customer_phone, "11999998888");
    }

    #[tokio::test]
    async fn test_failed_save_does_not_restore_cart() {
        let mut h = harness(Arc::new(BrokenOrders), RecordingLauncher::default());
        let mut session = filled_session();

        let receipt = h.composer.submit_order(&mut session);
        assert!(receipt.is_ok());
        assert!(session.cart.is_empty());

        let reports = h.composer.join_background().await;
        assert_eq!(reports[0].name, "save-order");
        assert!(matches!(reports[0].outcome, TaskOutcome::Failed(_)));
        assert!(session.cart.is_empty());
        assert!(h
            .notifier
            .notices()
            .iter()
            .all(|n| n.level == NoticeLevel::Success));
    }

    #[tokio::test]
    async fn test_blocked_window_falls_back_to_navigation() {
        let launcher = RecordingLauncher {
            block_new_context: true,
            ..Default::default()
        };
        let mut h = harness(Arc::new(MemoryStore::new()), launcher);
        let mut session = filled_session();

        let receipt = h.composer.submit_order(&mut session).unwrap();

        assert_eq!(receipt.opened, LinkOpening::InPlace);
        let opened = h.launcher.opened.lock().unwrap().clone();
        assert_eq!(opened, vec![(LinkOpening::InPlace, receipt.link.url())]);
    }

    #[tokio::test]
    async fn test_reload_runs_after_delay() {
        let reloader = Arc::new(CountingReloader::default());
        let h = harness(Arc::new(MemoryStore::new()), RecordingLauncher::default());
        let mut composer = h.composer.with_reloader(reloader.clone());
        let mut session = filled_session();

        composer.submit_order(&mut session).unwrap();
        assert_eq!(composer.pending_tasks(), 2);

        let reports = composer.join_background().await;
        assert_eq!(reports[1].name, "reload-session");
        assert_eq!(reloader.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_second_submit_finds_empty_cart() {
        let mut h = harness(Arc::new(MemoryStore::new()), RecordingLauncher::default());
        let mut session = filled_session();
        h.composer.submit_order(&mut session).unwrap();

        session.form.name = "Maria".into();
        let err = h.composer.submit_order(&mut session).unwrap_err();
        assert_eq!(err, CommerceError::Validation(ValidationError::EmptyCart));
    }

    #[tokio::test]
    async fn test_message_uses_configured_number_and_template() {
        let settings_store = Arc::new(MemoryStore::new());
        settings_store
            .save_settings(&SettingsPatch {
                whatsapp_number: Some("5521988887777".into()),
                message_template: Some("{{cliente}}: {{total}}".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        let settings = SettingsService::load(settings_store).await;
        let mut composer = OrderComposer::new(
            Arc::new(MemoryStore::new()),
            settings,
            Arc::new(RecordingLauncher::default()),
            Arc::new(RecordingNotifier::new()),
        );
        let mut session = filled_session();
        session.form.phone = "+55 (11) 99999-8888".into();

        let receipt = composer.submit_order(&mut session).unwrap();

        assert_eq!(receipt.message.text, "Maria: R$ 25,50");
        assert_eq!(receipt.link.phone_digits(), "5521988887777");
        assert_eq!(
            receipt.link.url(),
            "https://wa.me/5521988887777?text=Maria%3A%20R%24%2025%2C50"
        );
        assert_eq!(receipt.draft.customer_phone.as_deref(), Some("+55 (11) 99999-8888"));
    }
}
