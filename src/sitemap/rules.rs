//! Priority and change-frequency rules, first match wins

use std::fmt;

use crate::config::SitemapConfig;

/// Sitemap `<changefreq>` values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFreq::Always => "always",
            ChangeFreq::Hourly => "hourly",
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
            ChangeFreq::Yearly => "yearly",
            ChangeFreq::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
enum Matcher {
    Exact(String),
    Contains(String),
}

impl Matcher {
    fn matches(&self, path: &str) -> bool {
        match self {
            Matcher::Exact(s) => path == s,
            Matcher::Contains(s) => path.contains(s.as_str()),
        }
    }
}

#[derive(Debug, Clone)]
struct Rule {
    matcher: Matcher,
    priority: f32,
    changefreq: ChangeFreq,
}

/// Ordered rule chain applied to a URL path
#[derive(Debug, Clone)]
pub struct RuleChain {
    rules: Vec<Rule>,
    fallback: (f32, ChangeFreq),
}

impl RuleChain {
    /// Home, then category hubs, then feed posts, then a flat default
    pub fn from_config(config: &SitemapConfig, post_prefix: &str) -> Self {
        let mut rules = vec![Rule {
            matcher: Matcher::Exact("/".to_string()),
            priority: 1.0,
            changefreq: ChangeFreq::Daily,
        }];

        rules.extend(config.hubs.iter().map(|hub| Rule {
            matcher: Matcher::Exact(hub.clone()),
            priority: 0.9,
            changefreq: ChangeFreq::Weekly,
        }));

        let post_prefix = post_prefix.trim_end_matches('/');
        if !post_prefix.is_empty() {
            rules.push(Rule {
                matcher: Matcher::Contains(format!("{}/", post_prefix)),
                priority: 0.7,
                changefreq: ChangeFreq::Monthly,
            });
        }

        Self {
            rules,
            fallback: (0.5, ChangeFreq::Monthly),
        }
    }

    /// Priority and change frequency for a URL path
    pub fn classify(&self, path: &str) -> (f32, ChangeFreq) {
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(path))
            .map(|rule| (rule.priority, rule.changefreq))
            .unwrap_or(self.fallback)
    }
}
