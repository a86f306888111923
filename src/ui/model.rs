//! Root state machine: the model, the page router, and global event
//! handling.
//!
//! `Model::update` consumes the model and returns the next one plus any
//! async commands; handlers never mutate shared state and never block.
//! Global concerns (quit, the error overlay, resize, wholesale collection
//! replacement, the cart's stale-result guard) are handled here before the
//! event reaches the active page's handler.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::text::Text;

use crate::api::{
    find_variant, Address, Card, Cart, CartItem, Order, Product, SessionSnapshot, Subscription,
    User, Variant,
};
use crate::ui::command::Command;
use crate::ui::layout::{Screen, Viewport};
use crate::ui::msg::{Fault, Msg};
use crate::ui::page::Page;
use crate::ui::pages;
use crate::ui::pages::account::AccountState;
use crate::ui::pages::cart::CartState;
use crate::ui::pages::confirm::ConfirmState;
use crate::ui::pages::orders::OrdersState;
use crate::ui::pages::payment::PaymentState;
use crate::ui::pages::receipt::ReceiptState;
use crate::ui::pages::shipping::ShippingState;
use crate::ui::pages::shop::ShopState;
use crate::ui::pages::splash::SplashState;
use crate::ui::pages::subscribe::SubscribeState;
use crate::ui::pages::subscriptions::SubscriptionsState;
use crate::ui::theme::Theme;

/// One footer key hint ("enter select").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hint {
    pub key: &'static str,
    pub action: &'static str,
}

/// Per-page sub-state. Pages own only their slot; switching away keeps the
/// state around unless the target page's `enter` resets it.
#[derive(Debug, Clone, Default)]
pub struct PageStates {
    pub splash: SplashState,
    pub shop: ShopState,
    pub cart: CartState,
    pub shipping: ShippingState,
    pub payment: PaymentState,
    pub confirm: ConfirmState,
    pub receipt: ReceiptState,
    pub account: AccountState,
    pub orders: OrdersState,
    pub subscriptions: SubscriptionsState,
    pub subscribe: SubscribeState,
}

#[derive(Debug, Clone)]
pub struct Model {
    pub page: Page,
    pub(crate) switched: bool,
    pub screen: Screen,
    pub viewport: Viewport,
    pub theme: Theme,
    pub signed_in: bool,
    pub user: User,
    pub products: Vec<Product>,
    pub cart: Cart,
    pub addresses: Vec<Address>,
    pub cards: Vec<Card>,
    pub subscriptions: Vec<Subscription>,
    pub orders: Vec<Order>,
    /// Sub-pages listed in the account menu.
    pub account_pages: Vec<Page>,
    pub state: PageStates,
    /// Global error overlay; esc dismisses it.
    pub overlay: Option<Fault>,
    pub footer: Vec<Hint>,
    /// Frame counter driving the loading animations.
    pub frame: u64,
    pub should_quit: bool,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            page: Page::Splash,
            switched: false,
            screen: Screen::default(),
            viewport: Viewport::default(),
            theme: Theme::default(),
            signed_in: false,
            user: User::default(),
            products: Vec::new(),
            cart: Cart::default(),
            addresses: Vec::new(),
            cards: Vec::new(),
            subscriptions: Vec::new(),
            orders: Vec::new(),
            account_pages: vec![Page::Orders, Page::Subscriptions],
            state: PageStates::default(),
            overlay: None,
            footer: Vec::new(),
            frame: 0,
            should_quit: false,
        }
    }
}

impl Model {
    /// Fresh model plus the commands that boot the session.
    pub fn new() -> (Model, Vec<Command>) {
        (Model::default(), vec![Command::Authenticate])
    }

    pub fn update(mut self, msg: &Msg) -> (Model, Vec<Command>) {
        match msg {
            Msg::Key(key) => {
                if is_quit(key) {
                    self.should_quit = true;
                    return (self, Vec::new());
                }
                if key.code == KeyCode::Esc && self.overlay.is_some() {
                    self.overlay = None;
                    return (self, Vec::new());
                }
                if self.page != Page::Splash {
                    match key.code {
                        KeyCode::PageUp => {
                            self.viewport.scroll_up(self.viewport.page());
                            return (self, Vec::new());
                        }
                        KeyCode::PageDown => {
                            self.viewport.scroll_down(self.viewport.page());
                            return (self, Vec::new());
                        }
                        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            self.viewport.scroll_up(self.viewport.half_page());
                            return (self, Vec::new());
                        }
                        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            self.viewport.scroll_down(self.viewport.half_page());
                            return (self, Vec::new());
                        }
                        // arrow keys move cursors and nudge the viewport
                        KeyCode::Up => self.viewport.scroll_up(1),
                        KeyCode::Down => self.viewport.scroll_down(1),
                        _ => {}
                    }
                }
            }
            Msg::Resize { width, height } => {
                self.screen = Screen::new(*width, *height);
                self.refresh_viewport();
                return (self, Vec::new());
            }
            Msg::Tick => {
                self.frame = self.frame.wrapping_add(1);
                return (self, Vec::new());
            }
            Msg::SignedIn { .. } => {
                self.signed_in = true;
            }
            Msg::SessionLoaded(snapshot) => {
                self.apply_snapshot(snapshot);
            }
            Msg::CartUpdated { seq, cart } => {
                // only the latest issued update may land; stale results from
                // rapid-fire quantity changes are dropped
                if self.state.cart.last_seq == *seq {
                    self.cart = cart.clone();
                    self.clamp_cart_cursor();
                }
            }
            Msg::CartReplaced(cart) => {
                self.cart = cart.clone();
                self.clamp_cart_cursor();
            }
            Msg::AddressesReplaced(addresses) => {
                self.addresses = addresses.clone();
                let max = self.addresses.len();
                let selected = &mut self.state.shipping.selected;
                *selected = (*selected).min(max);
            }
            Msg::CardsReplaced(cards) => {
                self.cards = cards.clone();
                let max = self.cards.len();
                let selected = &mut self.state.payment.selected;
                *selected = (*selected).min(max);
            }
            Msg::SubscriptionsReplaced(subscriptions) => {
                self.subscriptions = subscriptions.clone();
                let max = self.subscriptions.len().saturating_sub(1);
                let selected = &mut self.state.subscriptions.selected;
                *selected = (*selected).min(max);
            }
            Msg::OrdersReplaced(orders) => {
                self.orders = orders.clone();
                let max = self.orders.len().saturating_sub(1);
                let selected = &mut self.state.orders.selected;
                *selected = (*selected).min(max);
            }
            Msg::ProfileUpdated(user) => {
                self.user = user.clone();
            }
            Msg::Failed(fault) => {
                if !self.page.handles_faults() {
                    tracing::warn!(message = %fault.message, page = ?self.page, "unrouted fault");
                    self.overlay = Some(fault.clone());
                    return (self, Vec::new());
                }
            }
            _ => {}
        }

        let (mut next, commands) = match self.page {
            Page::Splash => pages::splash::update(self, msg),
            Page::Shop => pages::shop::update(self, msg),
            Page::Cart => pages::cart::update(self, msg),
            Page::Shipping => pages::shipping::update(self, msg),
            Page::Payment => pages::payment::update(self, msg),
            Page::Confirm => pages::confirm::update(self, msg),
            Page::Receipt => pages::receipt::update(self, msg),
            Page::Account | Page::Orders | Page::Subscriptions => pages::account::update(self, msg),
            Page::Subscribe => pages::subscribe::update(self, msg),
        };

        if next.switched {
            next.switched = false;
            next.refresh_viewport();
        } else {
            next.sync_viewport();
        }
        (next, commands)
    }

    /// Make `page` the active page. The caller (a page's `enter`) is
    /// responsible for any state resets the target specifies.
    pub(crate) fn switch(mut self, page: Page) -> Model {
        self.page = page;
        self.switched = true;
        self
    }

    /// Rendered content of the active page.
    pub fn content(&self) -> Text<'static> {
        match self.page {
            Page::Splash => pages::splash::view(self),
            Page::Shop => pages::shop::view(self),
            Page::Cart => pages::cart::view(self),
            Page::Shipping => pages::shipping::view(self),
            Page::Payment => pages::payment::view(self),
            Page::Confirm => pages::confirm::view(self),
            Page::Receipt => pages::receipt::view(self),
            Page::Account | Page::Orders | Page::Subscriptions => pages::account::view(self),
            Page::Subscribe => pages::subscribe::view(self),
        }
    }

    /// Columns available to the active page.
    pub fn content_width(&self) -> usize {
        self.screen.content_width(self.viewport.has_scroll()) as usize
    }

    /// Reinitialize the viewport for fresh content (page switch, resize).
    fn refresh_viewport(&mut self) {
        let visible = self.screen.content_height() as usize;
        let total = self.content().lines.len();
        self.viewport.reset(visible, total);
    }

    /// Re-measure content without losing the scroll position.
    fn sync_viewport(&mut self) {
        let visible = self.screen.content_height() as usize;
        let total = self.content().lines.len();
        self.viewport.resize(visible, total);
    }

    fn apply_snapshot(&mut self, snapshot: &SessionSnapshot) {
        self.user = snapshot.user.clone();
        self.products = snapshot.products.clone();
        self.cart = snapshot.cart.clone();
        self.addresses = snapshot.addresses.clone();
        self.cards = snapshot.cards.clone();
        self.subscriptions = snapshot.subscriptions.clone();
        self.orders = snapshot.orders.clone();
        self.reorder_products();
    }

    /// Featured products first, relative order preserved within each group.
    fn reorder_products(&mut self) {
        let (featured, staples): (Vec<_>, Vec<_>) = self
            .products
            .drain(..)
            .partition(|p: &Product| p.is_featured());
        self.products = featured;
        self.products.extend(staples);
        if !self.products.is_empty() {
            self.state.shop.selected = 0;
        }
        self.apply_product_accent();
    }

    /// Retint the theme for the product under the shop cursor.
    pub(crate) fn apply_product_accent(&mut self) {
        let accent = self
            .products
            .get(self.state.shop.selected)
            .and_then(|p| p.accent())
            .and_then(Theme::parse_hex);
        self.theme = match accent {
            Some(color) => Theme::with_accent(color),
            None => Theme::default(),
        };
    }

    fn clamp_cart_cursor(&mut self) {
        let max = self.cart.items.len().saturating_sub(1);
        let selected = &mut self.state.cart.selected;
        *selected = (*selected).min(max);
    }

    /// Optimistically mirror a quantity change so the UI tracks the
    /// keypress; the server's echo replaces the cart when it lands.
    pub(crate) fn apply_local_quantity(&mut self, variant_id: &str, quantity: u32) {
        let price = find_variant(&self.products, variant_id)
            .map(|(_, v)| v.price)
            .unwrap_or(0);
        if let Some(pos) = self
            .cart
            .items
            .iter()
            .position(|i| i.product_variant_id == variant_id)
        {
            if quantity == 0 {
                self.cart.items.remove(pos);
            } else {
                let item = &mut self.cart.items[pos];
                item.quantity = quantity;
                item.subtotal = price * quantity as u64;
            }
        } else if quantity > 0 {
            self.cart.items.push(CartItem {
                // placeholder until the server echoes the real item
                id: format!("local-{variant_id}"),
                product_variant_id: variant_id.to_string(),
                quantity,
                subtotal: price * quantity as u64,
            });
        }
        self.cart.amount.subtotal = self.cart.items.iter().map(|i| i.subtotal).sum();
        self.clamp_cart_cursor();
    }

    /// Whether the checkout chain is buying a subscription instead of the
    /// cart.
    pub fn is_subscribing(&self) -> bool {
        self.state.subscribe.target.is_some()
    }

    /// Product and variant the subscribe flow is targeting.
    pub fn subscribe_selection(&self) -> Option<(&Product, &Variant)> {
        let target = self.state.subscribe.target.as_ref()?;
        let product = self.products.iter().find(|p| p.id == target.product_id)?;
        let variant = match &target.variant_id {
            Some(id) => product.variants.iter().find(|v| v.id == *id)?,
            None => product.variants.get(self.state.subscribe.selected)?,
        };
        Some((product, variant))
    }

    /// Address the checkout will ship to, if chosen.
    pub fn selected_address(&self) -> Option<&Address> {
        let id: &str = if self.is_subscribing() {
            self.state
                .subscribe
                .target
                .as_ref()?
                .address_id
                .as_deref()?
        } else {
            self.cart.address_id.as_deref()?
        };
        self.addresses.iter().find(|a| a.id == id)
    }

    /// Card the checkout will charge, if chosen.
    pub fn selected_card(&self) -> Option<&Card> {
        let id: &str = if self.is_subscribing() {
            self.state.subscribe.target.as_ref()?.card_id.as_deref()?
        } else {
            self.cart.card_id.as_deref()?
        };
        self.cards.iter().find(|c| c.id == id)
    }

    /// (subtotal, shipping) for the active checkout, in cents.
    pub fn checkout_amounts(&self) -> (u64, u64) {
        match self.subscribe_selection() {
            Some((_, variant)) => (variant.price, 0),
            None => (self.cart.amount.subtotal, self.cart.amount.shipping),
        }
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn product(id: &str, featured: bool) -> Product {
        let mut tags = HashMap::new();
        if featured {
            tags.insert("featured".to_string(), "true".to_string());
        }
        Product {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            variants: vec![Variant {
                id: format!("var_{id}"),
                name: "12oz".to_string(),
                price: 2000,
            }],
            subscription: Default::default(),
            tags,
        }
    }

    #[test]
    fn test_reorder_puts_featured_first() {
        let mut model = Model::default();
        model.products = vec![product("a", false), product("b", true), product("c", false)];
        model.reorder_products();
        let ids: Vec<&str> = model.products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert_eq!(model.state.shop.selected, 0);
    }

    #[test]
    fn test_local_quantity_inserts_updates_and_removes() {
        let mut model = Model::default();
        model.products = vec![product("a", false)];
        model.apply_local_quantity("var_a", 2);
        assert_eq!(model.cart.quantity_of("var_a"), 2);
        assert_eq!(model.cart.amount.subtotal, 4000);
        model.apply_local_quantity("var_a", 1);
        assert_eq!(model.cart.amount.subtotal, 2000);
        model.apply_local_quantity("var_a", 0);
        assert!(model.cart.is_empty());
    }

    #[test]
    fn test_esc_dismisses_overlay() {
        let mut model = Model::default();
        model.page = Page::Shop;
        model.overlay = Some(Fault::new("boom"));
        let (model, commands) = model.update(&Msg::Key(KeyEvent::new(
            KeyCode::Esc,
            KeyModifiers::NONE,
        )));
        assert!(model.overlay.is_none());
        assert!(commands.is_empty());
    }

    #[test]
    fn test_fault_on_plain_page_raises_overlay() {
        let mut model = Model::default();
        model.page = Page::Shop;
        let (model, commands) = model.update(&Msg::Failed(Fault::new("boom")));
        assert_eq!(model.overlay.as_ref().map(|f| f.message.as_str()), Some("boom"));
        assert!(commands.is_empty());
    }
}
