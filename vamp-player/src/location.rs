//! Location sync
//!
//! Mirrors the current track into the page's addressable location as a
//! 1-based `track` query parameter, and seeds the initial track from it.
//! The controller only ever talks to the [`LocationSync`] trait; the
//! location itself is not ambient state.

use tokio::sync::watch;
use tracing::debug;
use url::Url;

/// Query parameter holding the 1-based track number
pub const TRACK_PARAM: &str = "track";

/// Narrow read/write interface around a 1-based track number
pub trait LocationSync: Send + 'static {
    /// Track number currently held by the location, if any
    fn track_number(&self) -> Option<i64>;

    /// Rewrite the track number in place (no new history entry)
    fn replace_track_number(&mut self, number: usize);

    /// Initial playlist position: the held number when within `[1, len]`, else 0
    fn initial_index(&self, len: usize) -> usize {
        match self.track_number() {
            Some(n) if n >= 1 && (n as u64) <= len as u64 => (n - 1) as usize,
            _ => 0,
        }
    }

    /// Mirror a playlist position
    fn sync_index(&mut self, index: usize) {
        self.replace_track_number(index + 1);
    }
}

/// No location: always starts at the first track, ignores writes
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

impl LocationSync for NoLocation {
    fn track_number(&self) -> Option<i64> {
        None
    }

    fn replace_track_number(&mut self, _number: usize) {}
}

/// URL-backed location with replace semantics
///
/// Readers observe the current URL through a watch channel.
#[derive(Debug)]
pub struct QueryLocation {
    tx: watch::Sender<Url>,
}

impl QueryLocation {
    pub fn new(url: Url) -> Self {
        let (tx, _) = watch::channel(url);
        Self { tx }
    }

    /// Current URL
    pub fn current(&self) -> Url {
        self.tx.borrow().clone()
    }

    /// Observe rewrites
    pub fn subscribe(&self) -> watch::Receiver<Url> {
        self.tx.subscribe()
    }
}

impl LocationSync for QueryLocation {
    fn track_number(&self) -> Option<i64> {
        track_param(&self.tx.borrow())
    }

    fn replace_track_number(&mut self, number: usize) {
        let mut url = self.current();
        set_query_param(&mut url, TRACK_PARAM, &number.to_string());
        debug!("Location rewritten to {}", url);
        self.tx.send_replace(url);
    }
}

/// Track number held by a URL's first `track` parameter
pub fn track_param(url: &Url) -> Option<i64> {
    let value = url
        .query_pairs()
        .find(|(key, _)| key == TRACK_PARAM)
        .map(|(_, value)| value.into_owned())?;
    parse_leading_int(&value)
}

/// Set `key=value`, replacing the first occurrence in place and dropping
/// any later duplicates; appends when the key is absent
pub fn set_query_param(url: &mut Url, key: &str, value: &str) {
    let mut replaced = false;
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter_map(|(k, v)| {
            if k != key {
                return Some((k.into_owned(), v.into_owned()));
            }
            if replaced {
                return None;
            }
            replaced = true;
            Some((k.into_owned(), value.to_string()))
        })
        .collect();

    let mut query = url.query_pairs_mut();
    query.clear().extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    if !replaced {
        query.append_pair(key, value);
    }
}

/// Parse the leading integer of a string: "2" → 2, " 3rd" → 3, "abc" → None
pub fn parse_leading_int(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(url: &str) -> QueryLocation {
        QueryLocation::new(Url::parse(url).unwrap())
    }

    #[test]
    fn test_seed_within_range() {
        let loc = location("http://localhost/?track=2");
        assert_eq!(loc.initial_index(3), 1);
    }

    #[test]
    fn test_seed_out_of_range_defaults_to_first() {
        assert_eq!(location("http://localhost/?track=0").initial_index(3), 0);
        assert_eq!(location("http://localhost/?track=4").initial_index(3), 0);
        assert_eq!(location("http://localhost/?track=-1").initial_index(3), 0);
        assert_eq!(location("http://localhost/?track=abc").initial_index(3), 0);
        assert_eq!(location("http://localhost/").initial_index(3), 0);
    }

    #[test]
    fn test_seed_uses_leading_integer() {
        assert_eq!(location("http://localhost/?track=3abc").initial_index(3), 2);
    }

    #[test]
    fn test_sync_replaces_in_place() {
        let mut loc = location("http://localhost/page?a=1&track=9&b=2&track=7");
        let mut rx = loc.subscribe();

        loc.sync_index(0);

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().as_str(), "http://localhost/page?a=1&track=1&b=2");
        assert_eq!(loc.track_number(), Some(1));
    }

    #[test]
    fn test_sync_appends_when_absent() {
        let mut loc = location("http://localhost/?x=y");
        loc.sync_index(2);
        assert_eq!(loc.current().as_str(), "http://localhost/?x=y&track=3");
    }

    #[test]
    fn test_no_location() {
        let mut loc = NoLocation;
        loc.sync_index(5);
        assert_eq!(loc.initial_index(3), 0);
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("12"), Some(12));
        assert_eq!(parse_leading_int("  7 "), Some(7));
        assert_eq!(parse_leading_int("2.5"), Some(2));
        assert_eq!(parse_leading_int("-3"), Some(-3));
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("x1"), None);
    }
}
