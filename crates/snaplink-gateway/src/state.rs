use std::sync::Arc;

use snaplink_redirector::Redirector;
use snaplink_reporter::Reporter;
use snaplink_shortener::Shortener;

#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    redirector: Arc<dyn Redirector>,
    reporter: Arc<dyn Reporter>,
}

impl AppState {
    pub fn new(
        shortener: Arc<dyn Shortener>,
        redirector: Arc<dyn Redirector>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            shortener,
            redirector,
            reporter,
        }
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    pub fn redirector(&self) -> &dyn Redirector {
        self.redirector.as_ref()
    }

    pub fn reporter(&self) -> &dyn Reporter {
        self.reporter.as_ref()
    }
}
