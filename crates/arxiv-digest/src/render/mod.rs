//! HTML templates for the digest page.
//!
//! Every function here is pure: it takes records and view state and returns
//! markup. All interpolated text goes through [`escape`], and only `http` or
//! `https` URLs become links. Interactive elements carry `data-action` and
//! `data-paper-id` attributes instead of inline handlers; the application maps
//! them back to events with [`crate::App::bind`].

mod card;
mod html;
mod page;
mod subscription;

pub use card::render_card;
pub use html::{escape, safe_url};
pub use page::{
    CATEGORIES, EMPTY_STATE_MESSAGE, PAGE_SIZES, render_empty_state, render_error_banner, render_filters,
    render_list, render_loading, render_notice, render_page,
};
pub use subscription::{render_discount_section, render_plan_card, render_subscription};
