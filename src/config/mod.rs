//! Configuration module

mod site;

pub use site::FeedConfig;
pub use site::ImageConfig;
pub use site::SiteConfig;
pub use site::SitemapConfig;
pub use site::SlugConfig;
pub use site::ValidateConfig;
pub use site::MAX_FEED_LIMIT;
