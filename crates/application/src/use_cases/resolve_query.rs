use crate::hostname_cache::HostnameCache;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::debug;

/// TTL of synthesized local answers.
pub const LOCAL_TTL_SECS: u32 = 60;

/// Address every local container name resolves to.
pub const LOCAL_ADDRESS: Ipv4Addr = Ipv4Addr::LOCALHOST;

/// A synthesized address record for one matched question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalRecord {
    /// The exact queried name, as decoded by the transport.
    pub name: String,
    pub address: Ipv4Addr,
    pub ttl: u32,
}

/// Outcome of the per-query decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// At least one question named a local container; answer with
    /// these records and do not consult upstream at all.
    Local(Vec<LocalRecord>),
    /// No question matched; delegate the entire original query to the
    /// upstream resolver.
    Forward,
}

/// Per-query decision logic. Stateless between queries; all state
/// lives in the shared hostname cache.
pub struct ResolveQueryUseCase {
    cache: Arc<HostnameCache>,
}

impl ResolveQueryUseCase {
    pub fn new(cache: Arc<HostnameCache>) -> Self {
        Self { cache }
    }

    /// Decide a whole query at once. `questions` holds the decoded,
    /// dot-joined name of every question in arrival order.
    ///
    /// One match short-circuits the whole query: questions that did
    /// not match contribute no records, and upstream is not consulted
    /// for them either.
    pub fn resolve<S: AsRef<str>>(&self, questions: &[S]) -> Resolution {
        let mut records = Vec::new();

        for question in questions {
            let name = question.as_ref();
            if self.cache.contains(name) {
                debug!(name, "Query matches a running container");
                records.push(LocalRecord {
                    name: name.to_string(),
                    address: LOCAL_ADDRESS,
                    ttl: LOCAL_TTL_SECS,
                });
            }
        }

        if records.is_empty() {
            Resolution::Forward
        } else {
            Resolution::Local(records)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn use_case_with(names: &[&str]) -> ResolveQueryUseCase {
        let cache = Arc::new(HostnameCache::new());
        cache.replace(names.iter().map(|s| s.to_string()).collect::<HashSet<_>>());
        ResolveQueryUseCase::new(cache)
    }

    #[test]
    fn cached_name_gets_loopback_record_with_fixed_ttl() {
        let resolver = use_case_with(&["web"]);
        match resolver.resolve(&["web"]) {
            Resolution::Local(records) => {
                assert_eq!(
                    records,
                    vec![LocalRecord {
                        name: "web".to_string(),
                        address: Ipv4Addr::LOCALHOST,
                        ttl: 60,
                    }]
                );
            }
            Resolution::Forward => panic!("expected a local answer"),
        }
    }

    #[test]
    fn unknown_name_is_forwarded() {
        let resolver = use_case_with(&["web"]);
        assert_eq!(resolver.resolve(&["example.com"]), Resolution::Forward);
    }

    #[test]
    fn one_match_short_circuits_a_multi_question_query() {
        let resolver = use_case_with(&["web"]);
        match resolver.resolve(&["web", "example.com"]) {
            Resolution::Local(records) => {
                assert_eq!(records.len(), 1);
                assert_eq!(records[0].name, "web");
            }
            Resolution::Forward => panic!("matched question must suppress forwarding"),
        }
    }

    #[test]
    fn empty_question_list_is_forwarded() {
        let resolver = use_case_with(&["web"]);
        assert_eq!(resolver.resolve::<&str>(&[]), Resolution::Forward);
    }

    #[test]
    fn match_is_exact_not_suffix() {
        let resolver = use_case_with(&["web"]);
        assert_eq!(resolver.resolve(&["web.example.com"]), Resolution::Forward);
        assert_eq!(resolver.resolve(&["Web"]), Resolution::Forward);
    }
}
