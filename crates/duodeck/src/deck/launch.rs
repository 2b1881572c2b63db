//! Window addresses and launch parameters.
//!
//! A window is launched at an address such as `file:///talks/intro.md`. The
//! presenter window gets the same address with a single `presenter=true`
//! query flag and reads it back on load to find out what it is.

use std::path::Path;

pub const PRESENTER_FLAG: &str = "presenter";

pub fn deck_address(path: &Path) -> String {
    format!("file://{}", path.display())
}

/// The deck address with any existing query or fragment replaced by the
/// presenter flag.
pub fn presenter_address(address: &str) -> String {
    let base = strip_query(address);
    format!("{base}?{PRESENTER_FLAG}=true")
}

fn strip_query(address: &str) -> &str {
    let end = address.find(['?', '#']).unwrap_or(address.len());
    &address[..end]
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaunchParams {
    pub presenter: bool,
}

impl LaunchParams {
    pub fn from_address(address: &str) -> Self {
        let query = address
            .split_once('?')
            .map(|(_, rest)| rest.split('#').next().unwrap_or_default())
            .unwrap_or_default();
        let presenter = query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .any(|(key, value)| key == PRESENTER_FLAG && value == "true");
        Self { presenter }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presenter_address_appends_flag() {
        assert_eq!(
            presenter_address("file:///talks/intro.md"),
            "file:///talks/intro.md?presenter=true"
        );
    }

    #[test]
    fn test_presenter_address_replaces_query() {
        assert_eq!(
            presenter_address("file:///talks/intro.md?slide=4#top"),
            "file:///talks/intro.md?presenter=true"
        );
    }

    #[test]
    fn test_launch_params_detect_flag() {
        let params = LaunchParams::from_address("file:///a.md?presenter=true");
        assert!(params.presenter);
        let params = LaunchParams::from_address("file:///a.md?x=1&presenter=true#end");
        assert!(params.presenter);
    }

    #[test]
    fn test_launch_params_without_flag() {
        assert!(!LaunchParams::from_address("file:///a.md").presenter);
        assert!(!LaunchParams::from_address("file:///a.md?presenter=false").presenter);
        assert!(!LaunchParams::from_address("file:///a.md?presenter").presenter);
        assert!(!LaunchParams::from_address("file:///a.md#presenter=true").presenter);
    }

    #[test]
    fn test_round_trip_through_address() {
        let address = presenter_address(&deck_address(Path::new("/talks/intro.md")));
        assert!(LaunchParams::from_address(&address).presenter);
    }
}
