use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TopicId(u64);

impl TopicId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TopicId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| format!("Topic ID must be a non-negative integer: {s:?}"))
    }
}

impl From<u64> for TopicId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_index_members() {
        assert_eq!("42".parse::<TopicId>().unwrap(), TopicId::new(42));
        assert_eq!(" 7 ".parse::<TopicId>().unwrap().value(), 7);
        assert!("-1".parse::<TopicId>().is_err());
        assert!("abc".parse::<TopicId>().is_err());
    }

    #[test]
    fn displays_as_plain_number() {
        assert_eq!(TopicId::new(9).to_string(), "9");
    }
}
