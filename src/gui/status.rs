/// State shown in the status label
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppStatus {
    #[default]
    Idle,
    Fetching,
    /// Last search succeeded; holds the request URL
    Ready(String),
    /// Last search failed; holds the reason
    Failed(String),
}

impl AppStatus {
    pub fn message(&self) -> &str {
        match self {
            AppStatus::Idle => "Type in a term, select a media type, then click the button",
            AppStatus::Fetching => "Getting images...",
            AppStatus::Ready(location) => location,
            AppStatus::Failed(_) => "Last attempt to get images failed...",
        }
    }

    /// Failure reason, shown as hover text
    pub fn reason(&self) -> Option<&str> {
        match self {
            AppStatus::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            AppStatus::default().message(),
            "Type in a term, select a media type, then click the button"
        );
        assert_eq!(AppStatus::Fetching.message(), "Getting images...");

        let url = "https://itunes.apple.com/search?term=cat&limit=200&media=music";
        assert_eq!(AppStatus::Ready(url.to_string()).message(), url);

        let failed = AppStatus::Failed("Request failed: connection refused".to_string());
        assert_eq!(failed.message(), "Last attempt to get images failed...");
        assert_eq!(failed.reason(), Some("Request failed: connection refused"));
        assert_eq!(AppStatus::Idle.reason(), None);
    }
}
