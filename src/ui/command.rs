//! Async command queue.
//!
//! Page handlers never do I/O; they return [`Command`] values. The
//! [`CommandRunner`] executes each one as a detached tokio task posting
//! exactly one terminal [`Msg`] (success or [`Msg::Failed`]) back onto the
//! event channel. Commands batched from one handler invocation run
//! concurrently with no ordering guarantee, and nothing is cancelled on a
//! page switch; stale results are the handlers' problem (see the cart's
//! sequence token).

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::api::{
    sign_in, AddressDraft, ApiError, CardDraft, CommerceApi, PaymentTokenizer, SubscriptionDraft,
};
use crate::ui::msg::{Fault, Msg};

/// Minimum time the splash screen stays up.
const SPLASH_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Authenticate,
    SplashDelay,
    LoadSession,

    FetchCart,
    SetCartItem {
        variant_id: String,
        quantity: u32,
        seq: u64,
    },
    SetCartAddress { address_id: String },
    SetCartCard { card_id: String },
    PlaceOrder,

    FetchAddresses,
    CreateAddress(AddressDraft),
    DeleteAddress { address_id: String },

    FetchCards,
    TokenizeCard(CardDraft),
    CreateCard { token: String },
    DeleteCard { card_id: String },

    FetchSubscriptions,
    CreateSubscription(SubscriptionDraft),
    CancelSubscription { subscription_id: String },

    FetchOrders,
    UpdateProfile { name: String, email: String },
}

/// Executes commands off the input path. Holds the service handles so the
/// state machine itself stays free of I/O types.
pub struct CommandRunner {
    tx: mpsc::UnboundedSender<Msg>,
    api_url: String,
    fingerprint: String,
    client: Option<Arc<dyn CommerceApi>>,
    tokenizer: Option<Arc<dyn PaymentTokenizer>>,
}

impl CommandRunner {
    pub fn new(tx: mpsc::UnboundedSender<Msg>, api_url: String, fingerprint: String) -> Self {
        Self {
            tx,
            api_url,
            fingerprint,
            client: None,
            tokenizer: None,
        }
    }

    pub fn install_client(&mut self, client: Arc<dyn CommerceApi>) {
        self.client = Some(client);
    }

    pub fn install_tokenizer(&mut self, tokenizer: Arc<dyn PaymentTokenizer>) {
        self.tokenizer = Some(tokenizer);
    }

    pub fn dispatch_all(&self, commands: Vec<Command>) {
        for command in commands {
            self.dispatch(command);
        }
    }

    pub fn dispatch(&self, command: Command) {
        tracing::debug!(?command, "dispatching command");
        match command {
            Command::Authenticate => {
                let tx = self.tx.clone();
                let api_url = self.api_url.clone();
                let fingerprint = self.fingerprint.clone();
                tokio::spawn(async move {
                    let msg = match sign_in(&api_url, &fingerprint).await {
                        Ok(access_token) => Msg::SignedIn { access_token },
                        Err(err) => fail(err),
                    };
                    let _ = tx.send(msg);
                });
            }
            Command::SplashDelay => {
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(SPLASH_DELAY).await;
                    let _ = tx.send(Msg::SplashDelayElapsed);
                });
            }
            Command::LoadSession => self.with_client(|c| async move {
                Ok(Msg::SessionLoaded(c.init_session().await?))
            }),
            Command::FetchCart => {
                self.with_client(|c| async move { Ok(Msg::CartReplaced(c.get_cart().await?)) })
            }
            Command::SetCartItem {
                variant_id,
                quantity,
                seq,
            } => self.with_client(move |c| async move {
                let cart = c.set_cart_item(&variant_id, quantity).await?;
                Ok(Msg::CartUpdated { seq, cart })
            }),
            Command::SetCartAddress { address_id } => self.with_client(move |c| async move {
                c.set_cart_address(&address_id).await?;
                Ok(Msg::CartAddressSet { address_id })
            }),
            Command::SetCartCard { card_id } => self.with_client(move |c| async move {
                c.set_cart_card(&card_id).await?;
                Ok(Msg::CartCardSet { card_id })
            }),
            Command::PlaceOrder => {
                self.with_client(|c| async move { Ok(Msg::OrderPlaced(c.convert_cart().await?)) })
            }
            Command::FetchAddresses => self.with_client(|c| async move {
                Ok(Msg::AddressesReplaced(c.list_addresses().await?))
            }),
            Command::CreateAddress(draft) => self.with_client(move |c| async move {
                let address_id = c.create_address(&draft).await?;
                let addresses = c.list_addresses().await?;
                Ok(Msg::AddressCreated {
                    address_id,
                    addresses,
                })
            }),
            Command::DeleteAddress { address_id } => self.with_client(move |c| async move {
                c.delete_address(&address_id).await?;
                Ok(Msg::AddressDeleted { address_id })
            }),
            Command::FetchCards => {
                self.with_client(|c| async move { Ok(Msg::CardsReplaced(c.list_cards().await?)) })
            }
            Command::TokenizeCard(card) => self.with_tokenizer(move |t| async move {
                Ok(Msg::CardTokenized {
                    token: t.tokenize(&card).await?,
                })
            }),
            Command::CreateCard { token } => self.with_client(move |c| async move {
                let card_id = c.create_card(&token).await?;
                let cards = c.list_cards().await?;
                Ok(Msg::CardCreated { card_id, cards })
            }),
            Command::DeleteCard { card_id } => self.with_client(move |c| async move {
                c.delete_card(&card_id).await?;
                Ok(Msg::CardDeleted { card_id })
            }),
            Command::FetchSubscriptions => self.with_client(|c| async move {
                Ok(Msg::SubscriptionsReplaced(c.list_subscriptions().await?))
            }),
            Command::CreateSubscription(draft) => self.with_client(move |c| async move {
                Ok(Msg::SubscriptionCreated(c.create_subscription(&draft).await?))
            }),
            Command::CancelSubscription { subscription_id } => {
                self.with_client(move |c| async move {
                    c.cancel_subscription(&subscription_id).await?;
                    Ok(Msg::SubscriptionCancelled { subscription_id })
                })
            }
            Command::FetchOrders => {
                self.with_client(|c| async move { Ok(Msg::OrdersReplaced(c.list_orders().await?)) })
            }
            Command::UpdateProfile { name, email } => self.with_client(move |c| async move {
                Ok(Msg::ProfileUpdated(c.update_profile(&name, &email).await?))
            }),
        }
    }

    fn with_client<F, Fut>(&self, run: F)
    where
        F: FnOnce(Arc<dyn CommerceApi>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Msg, ApiError>> + Send + 'static,
    {
        let tx = self.tx.clone();
        let Some(client) = self.client.clone() else {
            tracing::warn!("command dropped: no client installed");
            let _ = tx.send(Msg::Failed(Fault::new("not signed in yet")));
            return;
        };
        tokio::spawn(async move {
            let msg = run(client).await.unwrap_or_else(fail);
            let _ = tx.send(msg);
        });
    }

    fn with_tokenizer<F, Fut>(&self, run: F)
    where
        F: FnOnce(Arc<dyn PaymentTokenizer>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Msg, ApiError>> + Send + 'static,
    {
        let tx = self.tx.clone();
        let Some(tokenizer) = self.tokenizer.clone() else {
            tracing::warn!("command dropped: no tokenizer installed");
            let _ = tx.send(Msg::Failed(Fault::new("not signed in yet")));
            return;
        };
        tokio::spawn(async move {
            let msg = run(tokenizer).await.unwrap_or_else(fail);
            let _ = tx.send(msg);
        });
    }
}

fn fail(err: ApiError) -> Msg {
    tracing::warn!(error = %err, "command failed");
    Msg::Failed(Fault::new(err.user_message()))
}
