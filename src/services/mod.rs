//! Cross-page services, one concern each: theme, notifications, search,
//! assistant chat, bookmarks and the health blog.

pub mod assistant;
pub mod blog;
pub mod bookmarks;
pub mod notify;
pub mod search;
pub mod theme;

pub use assistant::Assistant;
pub use blog::{BlogFeed, NewsletterForm, TipCarousel};
pub use bookmarks::Bookmarks;
pub use notify::{Notice, NoticeKind, NotificationService};
pub use theme::{Theme, ThemeService};
