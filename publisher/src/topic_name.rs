use crate::errors::ConfigError;
use lazy_regex::{lazy_regex, Lazy};
use regex::Regex;
use std::fmt::Display;

const RESERVED_PREFIX: &str = "goog";
// Lowercase letter first, 6-30 chars of [a-z0-9-], no trailing hyphen
static PROJECT_REGEX: Lazy<Regex> = lazy_regex!(r"^[a-z][a-z0-9-]{4,28}[a-z0-9]$");
// Letter first, 3-255 chars of [A-Za-z0-9-_.~+%]
static TOPIC_REGEX: Lazy<Regex> = lazy_regex!(r"^[A-Za-z][A-Za-z0-9_\-.~+%]{2,254}$");
static PATH_REGEX: Lazy<Regex> = lazy_regex!(r"^projects/([^/]+)/topics/([^/]+)$");

/// A fully qualified topic path of the form `projects/{project}/topics/{topic}`.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct TopicName {
    project: String,
    topic: String,
}

impl TopicName {
    pub fn create(project: &str, topic: &str) -> Result<Self, ConfigError> {
        let s = Self {
            project: project.to_owned(),
            topic: topic.to_owned(),
        };

        if s.topic.starts_with(RESERVED_PREFIX) {
            return Err(ConfigError::ReservedTopicName);
        }

        if s.is_valid() {
            Ok(s)
        } else {
            Err(ConfigError::InvalidTopicName(s.to_string()))
        }
    }

    pub fn is_valid(&self) -> bool {
        PROJECT_REGEX.is_match(&self.project)
            && TOPIC_REGEX.is_match(&self.topic)
            && !self.topic.starts_with(RESERVED_PREFIX)
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

impl TryFrom<&str> for TopicName {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let captures = PATH_REGEX
            .captures(value)
            .ok_or_else(|| ConfigError::InvalidTopicName(value.to_owned()))?;

        let (_, [project, topic]) = captures.extract();
        Self::create(project, topic)
    }
}

impl Display for TopicName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "projects/{}/topics/{}", self.project, self.topic)
    }
}
