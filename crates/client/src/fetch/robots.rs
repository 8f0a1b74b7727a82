//! robots.txt compliance.
//!
//! Fetches a site's robots.txt and decides whether autonomous fetching of a
//! target URL is permitted. Nothing is cached: every check is one request.

use fetchmcp_core::Error;
use reqwest::{Client, StatusCode};
use robotstxt_rs::RobotsTxt;
use url::Url;

use super::FetchConfig;
use super::url::{robots_match_target, robots_txt_url};

/// Outcome of a robots.txt evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RobotsDecision {
    /// The ruleset permits the user agent to fetch the URL.
    Allowed,
    /// Fetching is not permitted; carries the reason reported to callers.
    Denied(String),
    /// The site has no enforceable policy (robots.txt answered with a 4xx other than 401/403).
    Inapplicable,
}

/// Evaluates robots.txt for a single invocation using its HTTP client.
pub struct RobotsChecker<'a> {
    http: &'a Client,
    config: &'a FetchConfig,
}

impl<'a> RobotsChecker<'a> {
    pub fn new(http: &'a Client, config: &'a FetchConfig) -> Self {
        Self { http, config }
    }

    /// Fetch robots.txt for `url` and evaluate it for the configured user agent.
    ///
    /// Transport failures are returned as [`Error::RobotsFetch`]; callers treat
    /// them as a denial.
    pub async fn check(&self, url: &Url) -> Result<RobotsDecision, Error> {
        let robots_url = robots_txt_url(url);

        let response = self
            .http
            .get(robots_url.as_str())
            .header(reqwest::header::USER_AGENT, &self.config.user_agent)
            .timeout(self.config.robots_timeout)
            .send()
            .await
            .map_err(|e| {
                tracing::debug!("robots.txt request to {} failed: {}", robots_url, e);
                Error::RobotsFetch(format!("Failed to fetch robots.txt {robots_url} due to a connection issue"))
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Ok(RobotsDecision::Denied(format!(
                "When fetching robots.txt ({robots_url}), received status {} so assuming that autonomous fetching is not allowed",
                status.as_u16()
            )));
        }
        if status.is_client_error() {
            tracing::debug!("robots.txt not found for {} ({}), allowing all", robots_url, status);
            return Ok(RobotsDecision::Inapplicable);
        }

        let body = response.text().await.map_err(|e| {
            tracing::debug!("reading robots.txt from {} failed: {}", robots_url, e);
            Error::RobotsFetch(format!("Failed to fetch robots.txt {robots_url} due to a connection issue"))
        })?;

        if evaluate(&body, &self.config.user_agent, url) {
            Ok(RobotsDecision::Allowed)
        } else {
            Ok(RobotsDecision::Denied(format!(
                "The sites robots.txt ({robots_url}), specifies that autonomous fetching of this page is not allowed"
            )))
        }
    }
}

/// Drop every line whose trimmed content starts with `#`.
pub fn strip_comment_lines(robots_txt: &str) -> String {
    robots_txt
        .lines()
        .filter(|line| !line.trim().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Product token of a User-Agent header: the text before the first `/` or whitespace.
pub fn product_token(user_agent: &str) -> &str {
    user_agent
        .trim()
        .split(|c: char| c == '/' || c.is_whitespace())
        .next()
        .unwrap_or_default()
}

/// One record: the agents named by consecutive `User-agent` lines and the rules that follow.
#[derive(Debug, Default)]
struct Group {
    agents: Vec<String>,
    rules: Vec<String>,
}

fn parse_groups(robots_txt: &str) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    let mut reading_agents = false;

    for line in robots_txt.lines() {
        let line = line.split_once('#').map_or(line, |(before, _)| before);
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim();

        match key.as_str() {
            "user-agent" => {
                if !reading_agents {
                    groups.push(Group::default());
                    reading_agents = true;
                }
                if let Some(group) = groups.last_mut() {
                    group.agents.push(value.to_ascii_lowercase());
                }
            }
            "allow" | "disallow" => {
                reading_agents = false;
                if let Some(group) = groups.last_mut() {
                    group.rules.push(format!("{key}: {value}"));
                }
            }
            _ => {}
        }
    }

    groups
}

/// Rules of every group naming `token` (case-insensitive), or of the `*` groups when none does.
fn applicable_rules<'a>(groups: &'a [Group], token: &str) -> Vec<&'a str> {
    let token = token.to_ascii_lowercase();
    let wanted = if groups.iter().any(|g| g.agents.contains(&token)) { token.as_str() } else { "*" };

    groups
        .iter()
        .filter(|g| g.agents.iter().any(|a| a == wanted))
        .flat_map(|g| g.rules.iter().map(String::as_str))
        .collect()
}

/// Evaluate a robots.txt body for `user_agent` fetching `url`.
///
/// The group is chosen by the agent's product token, so `User-agent: ModelContextProtocol`
/// applies to `ModelContextProtocol/1.0 (...)`. Path matching is left to robotstxt-rs.
pub fn evaluate(robots_txt: &str, user_agent: &str, url: &Url) -> bool {
    let groups = parse_groups(&strip_comment_lines(robots_txt));
    let rules = applicable_rules(&groups, product_token(user_agent));
    let ruleset = format!("User-agent: *\n{}", rules.join("\n"));
    RobotsTxt::parse(&ruleset).can_fetch("*", &robots_match_target(url))
}

#[cfg(test)]
mod tests {
    use super::*;

    const UA: &str = fetchmcp_core::config::DEFAULT_USER_AGENT;

    #[test]
    fn test_strip_comment_lines() {
        let input = "# top comment\nUser-agent: *\n   # indented comment\nDisallow: /private";
        assert_eq!(strip_comment_lines(input), "User-agent: *\nDisallow: /private");
    }

    #[test]
    fn test_strip_comment_lines_keeps_rules() {
        let input = "User-agent: *\nAllow: /";
        assert_eq!(strip_comment_lines(input), input);
    }

    #[test]
    fn test_evaluate_disallowed_path() {
        let robots = "User-agent: *\nDisallow: /private";
        let url = Url::parse("https://site.example/private/x").unwrap();
        assert!(!evaluate(robots, UA, &url));
    }

    #[test]
    fn test_evaluate_allowed_path() {
        let robots = "User-agent: *\nDisallow: /private";
        let url = Url::parse("https://site.example/public").unwrap();
        assert!(evaluate(robots, UA, &url));
    }

    #[test]
    fn test_evaluate_empty_ruleset_allows() {
        let url = Url::parse("https://site.example/anything").unwrap();
        assert!(evaluate("", UA, &url));
    }

    #[test]
    fn test_evaluate_commented_out_rule_is_ignored() {
        let robots = "User-agent: *\n# Disallow: /private\nDisallow: /admin";
        let url = Url::parse("https://site.example/private/x").unwrap();
        assert!(evaluate(robots, UA, &url));
    }

    fn page(path: &str) -> Url {
        Url::parse(&format!("https://site.example{path}")).unwrap()
    }

    #[test]
    fn test_product_token() {
        assert_eq!(product_token(UA), "ModelContextProtocol");
        assert_eq!(product_token("curl/8.0"), "curl");
        assert_eq!(product_token("  Bot "), "Bot");
    }

    #[test]
    fn test_evaluate_named_group_denies() {
        let robots = "User-agent: ModelContextProtocol\nDisallow: /\n\nUser-agent: *\nAllow: /";
        assert!(!evaluate(robots, UA, &page("/page")));
    }

    #[test]
    fn test_evaluate_named_group_is_case_insensitive() {
        let robots = "User-agent: modelcontextprotocol\nDisallow: /private";
        assert!(!evaluate(robots, UA, &page("/private/x")));
        assert!(evaluate(robots, UA, &page("/public")));
    }

    #[test]
    fn test_evaluate_named_group_overrides_wildcard() {
        let robots = "User-agent: *\nDisallow: /\n\nUser-agent: ModelContextProtocol\nAllow: /";
        assert!(evaluate(robots, UA, &page("/page")));
    }

    #[test]
    fn test_evaluate_named_group_does_not_inherit_later_wildcard_rules() {
        let robots = "User-agent: ModelContextProtocol\nAllow: /\n\nUser-agent: *\nDisallow: /";
        assert!(evaluate(robots, UA, &page("/page")));
    }

    #[test]
    fn test_evaluate_other_agents_groups_are_ignored() {
        let robots = "User-agent: BadBot\nDisallow: /\n\nUser-agent: *\nDisallow: /private";
        assert!(evaluate(robots, UA, &page("/page")));
        assert!(!evaluate(robots, UA, &page("/private/x")));
    }

    #[test]
    fn test_evaluate_group_with_several_agents() {
        let robots = "User-agent: OtherBot\nUser-agent: ModelContextProtocol\nDisallow: /docs";
        assert!(!evaluate(robots, UA, &page("/docs/a")));
    }

    #[test]
    fn test_evaluate_inline_comment() {
        let robots = "User-agent: *\nDisallow: /private # keep out";
        assert!(!evaluate(robots, UA, &page("/private/x")));
    }
}
