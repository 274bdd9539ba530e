//! The navigation collaborator seam.
//!
//! The core only decides that a region with a fixed destination identity was
//! activated; performing the transition is the collaborator's job.

/// Receives exactly one call per activation, carrying the opaque destination
/// identifier of the activated region.
pub trait Navigator {
    fn navigate(&mut self, destination: &str);
}

/// Collects navigation requests; used by tests and as a demo sink.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    pub requests: Vec<String>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&mut self, destination: &str) {
        self.requests.push(destination.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_navigator_keeps_requests_in_order() {
        let mut nav = RecordingNavigator::default();
        nav.navigate("about");
        nav.navigate("photos");
        assert_eq!(nav.requests, vec!["about", "photos"]);
    }
}
