use std::{borrow::Borrow, f64::consts, fmt::Display};

/// A variable or function name: a letter or `_` followed by letters, digits or `_`.
#[derive(PartialEq, Eq, Hash, Clone, Debug, PartialOrd, Ord)]
pub struct Identifier(String);

impl Identifier {
    pub fn is_start(c: char) -> bool {
        c.is_alphabetic() || c == '_'
    }

    pub fn is_continue(c: char) -> bool {
        c.is_alphanumeric() || c == '_'
    }

    pub fn is_keyword(s: &str) -> bool {
        matches!(s, "to" | "in")
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        if !Self::is_start(chars.next()?) || !chars.all(Self::is_continue) || Self::is_keyword(s) {
            return None;
        }
        Some(Identifier(s.to_owned()))
    }

    pub(crate) fn new_unchecked(s: String) -> Self {
        Identifier(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn associated_value(&self) -> Option<f64> {
        match self.as_str() {
            "pi" | "PI" => Some(consts::PI),
            "e" | "E" => Some(consts::E),
            "tau" => Some(consts::TAU),
            "phi" => Some(1.618_033_988_749_895),
            _ => None,
        }
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_names() {
        assert!(Identifier::from_str("x").is_some());
        assert!(Identifier::from_str("total_cost2").is_some());
        assert!(Identifier::from_str("_tmp").is_some());
        assert!(Identifier::from_str("λ").is_some());
        assert!(Identifier::from_str("2x").is_none());
        assert!(Identifier::from_str("a-b").is_none());
        assert!(Identifier::from_str("").is_none());
        assert!(Identifier::from_str("to").is_none());
    }

    #[test]
    fn constants() {
        assert_eq!(
            Identifier::from_str("pi").unwrap().associated_value(),
            Some(consts::PI)
        );
        assert_eq!(Identifier::from_str("x").unwrap().associated_value(), None);
    }
}
