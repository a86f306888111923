//! Application events.
//!
//! Everything the event loop processes is one [`Msg`]: terminal input,
//! resizes, the frame tick, and the terminal results of async commands.
//! Handlers ignore variants they don't recognize.

use crossterm::event::KeyEvent;

use crate::api::{Address, Card, Cart, Order, SessionSnapshot, Subscription, User};

/// A user-facing failure from an async command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    pub message: String,
}

impl Fault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Terminal key press
    Key(KeyEvent),

    /// Terminal dimensions changed
    Resize { width: u16, height: u16 },

    /// Frame tick for animations
    Tick,

    /// Device sign-in finished; the client gets installed with this token
    SignedIn { access_token: String },

    /// Initial data load finished
    SessionLoaded(SessionSnapshot),

    /// The splash screen has been up for its minimum time
    SplashDelayElapsed,

    /// Cart quantity update came back; `seq` is the sequence token the
    /// issuing handler attached (stale results carry an old one)
    CartUpdated { seq: u64, cart: Cart },

    /// Plain cart refetch
    CartReplaced(Cart),

    /// The cart now ships to this address
    CartAddressSet { address_id: String },

    /// The cart now charges this card
    CartCardSet { card_id: String },

    AddressesReplaced(Vec<Address>),
    AddressCreated {
        address_id: String,
        addresses: Vec<Address>,
    },
    AddressDeleted { address_id: String },

    CardsReplaced(Vec<Card>),
    /// Payment tokenizer produced an opaque card token
    CardTokenized { token: String },
    CardCreated { card_id: String, cards: Vec<Card> },
    CardDeleted { card_id: String },

    SubscriptionsReplaced(Vec<Subscription>),
    SubscriptionCreated(Subscription),
    SubscriptionCancelled { subscription_id: String },

    OrdersReplaced(Vec<Order>),
    OrderPlaced(Order),

    ProfileUpdated(User),

    /// An async command failed with a displayable message
    Failed(Fault),
}
