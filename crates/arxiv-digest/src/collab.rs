//! Collaborators outside the view layer: login modal, payment checkout and
//! the rendering surface.

/// Shows the login modal.
pub trait LoginPrompt: Send + Sync {
    fn prompt_login(&self);
}

/// Hands a checkout session to the payment processor.
#[async_trait::async_trait]
pub trait CheckoutRedirect: Send + Sync {
    /// Redirect to the hosted checkout page. `Err` carries the processor's message.
    async fn redirect_to_checkout(&self, session_id: &str) -> Result<(), String>;
}

/// A replaceable region of the page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Region {
    /// The whole paper list.
    Papers,
    /// One paper card, by id.
    Card(String),
    /// Inline notices above the list.
    Notices,
    /// Plan cards and discount form.
    Subscription,
}

/// Receives rendered markup.
pub trait Surface: Send + Sync {
    /// Replace the contents of `region` with `markup`.
    fn replace(&self, region: &Region, markup: &str);

    /// Show or hide the global loading indicator.
    fn set_loading(&self, visible: bool);
}

/// Login prompt that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLoginPrompt;

impl LoginPrompt for NoopLoginPrompt {
    fn prompt_login(&self) {
        tracing::info!("login required");
    }
}

/// Checkout that refuses every session.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCheckout;

#[async_trait::async_trait]
impl CheckoutRedirect for NoopCheckout {
    async fn redirect_to_checkout(&self, session_id: &str) -> Result<(), String> {
        tracing::warn!(session_id, "no checkout configured");
        Err("checkout is not available".to_string())
    }
}

/// Surface that discards everything; callers read state through `App::render_page`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn replace(&self, _region: &Region, _markup: &str) {}

    fn set_loading(&self, _visible: bool) {}
}
